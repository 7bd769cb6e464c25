use crate::{StudioError, StudioResult};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

const OPEN: &str = "{{{";
const CLOSE: &str = "}}}";

/// A fixed natural-language template with `{{{slot}}}` placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptTemplate {
    pub name: &'static str,
    pub body: &'static str,
}

/// Rendered instruction text sent to the provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PromptText(String);

impl PromptText {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for PromptText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

enum Segment<'a> {
    Literal(&'a str),
    Slot(&'a str),
}

impl PromptTemplate {
    #[must_use]
    pub const fn new(name: &'static str, body: &'static str) -> Self {
        Self { name, body }
    }

    /// Placeholder names in order of first appearance.
    pub fn placeholders(&self) -> StudioResult<Vec<&'static str>> {
        let mut names = Vec::new();
        for segment in self.segments()? {
            if let Segment::Slot(name) = segment {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        Ok(names)
    }

    /// Substitute every placeholder with the string field of `input` that
    /// serializes under the same name. Values are inserted verbatim and never
    /// re-scanned, so a brief that itself contains `{{{...}}}` cannot reach
    /// other slots.
    pub fn render(&self, input: &impl Serialize) -> StudioResult<PromptText> {
        let slots = self.slots(input)?;
        let mut rendered = String::with_capacity(self.body.len());

        for segment in self.segments()? {
            match segment {
                Segment::Literal(text) => rendered.push_str(text),
                Segment::Slot(name) => {
                    let value = slots.get(name).and_then(Value::as_str).ok_or_else(|| {
                        StudioError::Invariant(format!(
                            "template {} references unknown slot '{name}'",
                            self.name
                        ))
                    })?;
                    rendered.push_str(value);
                }
            }
        }

        Ok(PromptText(rendered))
    }

    fn slots(&self, input: &impl Serialize) -> StudioResult<Map<String, Value>> {
        match serde_json::to_value(input) {
            Ok(Value::Object(slots)) => Ok(slots),
            Ok(_) => Err(StudioError::Invariant(format!(
                "template {} needs an input that serializes to an object",
                self.name
            ))),
            Err(error) => Err(StudioError::Invariant(error.to_string())),
        }
    }

    fn segments(&self) -> StudioResult<Vec<Segment<'static>>> {
        let mut segments = Vec::new();
        let mut rest = self.body;

        while let Some(start) = rest.find(OPEN) {
            segments.push(Segment::Literal(&rest[..start]));
            let after_open = &rest[start + OPEN.len()..];
            let end = after_open.find(CLOSE).ok_or_else(|| {
                StudioError::Invariant(format!("template {} has an unclosed placeholder", self.name))
            })?;
            let name = after_open[..end].trim();
            if name.is_empty() {
                return Err(StudioError::Invariant(format!(
                    "template {} has an empty placeholder",
                    self.name
                )));
            }
            segments.push(Segment::Slot(name));
            rest = &after_open[end + CLOSE.len()..];
        }
        segments.push(Segment::Literal(rest));

        Ok(segments)
    }
}
