use crate::{
    artifacts::{ContentKind, MarketingContent},
    briefs::StoryModificationRequest,
    gateway::ContentGateway,
    StudioError, StudioResult,
};

/// Holds the latest generated content and applies story edits to it.
pub struct StoryWorkspace {
    gateway: ContentGateway,
    content: Option<MarketingContent>,
}

impl StoryWorkspace {
    pub fn new(gateway: ContentGateway) -> Self {
        Self {
            gateway,
            content: None,
        }
    }

    /// Replace the held content, typically with the answer of the last turn.
    pub fn hold(&mut self, content: MarketingContent) {
        self.content = Some(content);
    }

    #[must_use]
    pub fn content(&self) -> Option<&MarketingContent> {
        self.content.as_ref()
    }

    /// Editing is offered for stories only; captions are regenerated instead.
    #[must_use]
    pub fn can_modify(&self) -> bool {
        self.content
            .as_ref()
            .is_some_and(|content| content.kind() == ContentKind::Story)
    }

    /// Rewrite the held story according to `instruction`. Only `story_text`
    /// changes; title, tone and hashtags are kept. On failure the held
    /// content is left untouched.
    pub async fn apply_modification(&mut self, instruction: &str) -> StudioResult<&MarketingContent> {
        if instruction.trim().is_empty() {
            return Err(StudioError::InvalidInput(
                "instruction must not be empty".to_string(),
            ));
        }
        let Some(content) = self.content.as_mut() else {
            return Err(StudioError::InvalidInput(
                "there is no story to modify".to_string(),
            ));
        };

        let request = StoryModificationRequest::new(content.story_text.clone(), instruction);
        let result = self.gateway.modify_story(&request).await?;
        content.story_text = result.modified_story;
        Ok(content)
    }
}
