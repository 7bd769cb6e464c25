use crate::schema::not_blank;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// The user's raw request for the marketing-content flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Validate)]
pub struct CreativeBrief {
    #[schemars(description = "A brief description of the marketing content needed.")]
    #[validate(
        length(
            min = 10,
            max = 500,
            message = "description must be between 10 and 500 characters"
        ),
        custom(function = "not_blank")
    )]
    pub description: String,
}

/// Description of the content that captions, headlines, image prompts,
/// palettes or hashtags are generated for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContentBrief {
    #[schemars(description = "A brief description of the content.")]
    #[validate(custom(function = "not_blank"))]
    pub content_description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StoryModificationRequest {
    #[schemars(description = "The original story text to be modified.")]
    #[validate(custom(function = "not_blank"))]
    pub original_story: String,
    #[schemars(description = "The instruction describing the desired changes.")]
    #[validate(custom(function = "not_blank"))]
    pub instruction: String,
}

impl CreativeBrief {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

impl ContentBrief {
    pub fn new(content_description: impl Into<String>) -> Self {
        Self {
            content_description: content_description.into(),
        }
    }
}

impl StoryModificationRequest {
    pub fn new(original_story: impl Into<String>, instruction: impl Into<String>) -> Self {
        Self {
            original_story: original_story.into(),
            instruction: instruction.into(),
        }
    }
}
