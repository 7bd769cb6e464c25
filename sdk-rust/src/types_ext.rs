use crate::{AssistantMessage, Message, ModelResponse, Part, TextPart, UserMessage};

impl TextPart {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl From<&str> for TextPart {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TextPart {
    fn from(value: String) -> Self {
        Self { text: value }
    }
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(TextPart::new(text))
    }
}

impl Message {
    pub fn user(content: Vec<Part>) -> Self {
        Self::User(UserMessage { content })
    }

    pub fn assistant(content: Vec<Part>) -> Self {
        Self::Assistant(AssistantMessage { content })
    }

    /// A user message carrying a single text part.
    pub fn user_text(text: impl Into<String>) -> Self {
        Self::user(vec![Part::text(text)])
    }
}

impl ModelResponse {
    /// Concatenate every text part of the response.
    #[must_use]
    pub fn text(&self) -> String {
        self.content
            .iter()
            .map(|part| match part {
                Part::Text(text_part) => text_part.text.as_str(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_text_joins_parts_in_order() {
        let response = ModelResponse {
            content: vec![Part::text("{\"a\":"), Part::text("1}")],
            usage: None,
        };
        assert_eq!(response.text(), "{\"a\":1}");
    }

    #[test]
    fn user_text_builds_single_part_message() {
        let message = Message::user_text("hello");
        assert_eq!(
            message,
            Message::User(UserMessage {
                content: vec![Part::Text(TextPart::new("hello"))],
            })
        );
    }
}
