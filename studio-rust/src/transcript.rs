use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

/// One request or response in the chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationTurn {
    pub text: String,
    pub sender: Sender,
    /// Set while the turn is a placeholder or still being revealed.
    pub is_typing: bool,
}

impl ConversationTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::User,
            is_typing: false,
        }
    }

    pub fn ai(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::Ai,
            is_typing: false,
        }
    }

    #[must_use]
    pub fn placeholder() -> Self {
        Self {
            text: String::new(),
            sender: Sender::Ai,
            is_typing: true,
        }
    }

    #[must_use]
    pub fn rendered(&self) -> RenderedMessage {
        format_message(&self.text)
    }
}

/// Ordered turns of one session. Only the turn orchestrator appends or
/// rewrites turns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    turns: Vec<ConversationTurn>,
}

impl Transcript {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConversationTurn> {
        self.turns.iter()
    }

    #[must_use]
    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    #[must_use]
    pub fn last(&self) -> Option<&ConversationTurn> {
        self.turns.last()
    }

    pub(crate) fn push(&mut self, turn: ConversationTurn) -> usize {
        self.turns.push(turn);
        self.turns.len() - 1
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut ConversationTurn> {
        self.turns.get_mut(index)
    }

    pub(crate) fn remove(&mut self, index: usize) -> Option<ConversationTurn> {
        (index < self.turns.len()).then(|| self.turns.remove(index))
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a ConversationTurn;
    type IntoIter = std::slice::Iter<'a, ConversationTurn>;

    fn into_iter(self) -> Self::IntoIter {
        self.turns.iter()
    }
}

/// How a chat message is displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedMessage {
    /// A bold title paragraph followed by the body.
    Titled { title: String, body: String },
    Inline(Vec<InlineSpan>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineSpan {
    Plain(String),
    Strong(String),
}

/// Split a message for display. A first paragraph wrapped in `**` becomes the
/// title when more paragraphs follow; otherwise `**` toggles strong text.
#[must_use]
pub fn format_message(text: &str) -> RenderedMessage {
    let paragraphs: Vec<&str> = text.split("\n\n").collect();
    if let [first, rest @ ..] = paragraphs.as_slice() {
        if !rest.is_empty() && first.starts_with("**") && first.ends_with("**") {
            return RenderedMessage::Titled {
                title: first.replace("**", ""),
                body: rest.join("\n\n"),
            };
        }
    }

    RenderedMessage::Inline(
        text.split("**")
            .enumerate()
            .map(|(index, part)| {
                if index % 2 == 1 {
                    InlineSpan::Strong(part.to_string())
                } else {
                    InlineSpan::Plain(part.to_string())
                }
            })
            .collect(),
    )
}
