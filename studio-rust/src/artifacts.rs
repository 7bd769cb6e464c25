//! Creative artifacts returned by the flows, and classification of raw
//! provider output into them.

use crate::{flows::UseCase, schema, StudioError, StudioResult};
use schemars::JsonSchema;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use validator::{Validate, ValidationErrors};

/// Stories with more words than this are presented as a story, shorter ones
/// as a caption.
const STORY_WORD_THRESHOLD: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Validate)]
pub struct MarketingContent {
    #[schemars(description = "A 2-4 word title or a catchy headline.")]
    pub story_title: String,
    #[schemars(description = "A story of at least 100 words, or a short caption if requested.")]
    pub story_text: String,
    #[schemars(description = "The overall tone of the story.")]
    pub tone: String,
    #[schemars(description = "Exactly 3 relevant hashtags.")]
    #[validate(length(equal = 3, message = "exactly 3 hashtags are required"))]
    pub hashtags: Vec<String>,
}

/// The length bucket of a caption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum CaptionLength {
    Short,
    Medium,
    Long,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CaptionVariant {
    pub length: CaptionLength,
    #[schemars(description = "The caption text.")]
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct CaptionVariantSet(pub Vec<CaptionVariant>);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct HeadlineVariant {
    #[schemars(description = "The tone of the headline.")]
    pub tone: String,
    #[schemars(description = "The headline text.")]
    pub catchy_line: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct HeadlineVariantSet(pub Vec<HeadlineVariant>);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Validate)]
pub struct ImagePromptBundle {
    #[schemars(description = "One punchy headline or caption under 15 words.")]
    pub catchy_line: String,
    #[schemars(description = "A detailed image generation prompt.")]
    pub image_prompt: String,
    #[schemars(description = "A 2-3 sentence explanation of the concept.")]
    pub creative_description: String,
    #[schemars(description = "Alternative headlines with distinct tones.")]
    pub variants: HeadlineVariantSet,
    #[schemars(description = "Relevant hashtags.")]
    pub hashtags: Vec<String>,
    #[schemars(description = "Hex color codes.")]
    pub color_palette: Vec<String>,
}

/// Hex color codes. The entries are not checked syntactically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Validate)]
pub struct ColorPalette {
    #[serde(rename = "colorPalette")]
    #[schemars(description = "A list of hex color codes.")]
    pub colors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Validate)]
pub struct HashtagSet {
    #[schemars(description = "A list of relevant hashtags.")]
    pub hashtags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Validate)]
pub struct StoryModificationResult {
    #[serde(rename = "modifiedStory")]
    #[schemars(description = "The modified story text.")]
    pub modified_story: String,
}

/// How a piece of marketing content is presented to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Story,
    Caption,
}

impl ContentKind {
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Story => "Your Story",
            Self::Caption => "Your Caption",
        }
    }
}

impl MarketingContent {
    /// The chat message shown for this content: the title in bold, a blank
    /// line, then the story.
    #[must_use]
    pub fn rendered_message(&self) -> String {
        format!("**{}**\n\n{}", self.story_title, self.story_text)
    }

    #[must_use]
    pub fn kind(&self) -> ContentKind {
        if self.story_text.split(' ').count() > STORY_WORD_THRESHOLD {
            ContentKind::Story
        } else {
            ContentKind::Caption
        }
    }
}

impl CaptionLength {
    pub const ALL: [Self; 3] = [Self::Short, Self::Medium, Self::Long];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Medium => "medium",
            Self::Long => "long",
        }
    }
}

impl fmt::Display for CaptionLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl CaptionVariantSet {
    pub fn iter(&self) -> impl Iterator<Item = &CaptionVariant> {
        self.0.iter()
    }

    /// Captions of one length bucket, in the order they were generated.
    pub fn with_length(&self, length: CaptionLength) -> impl Iterator<Item = &str> {
        self.0
            .iter()
            .filter(move |variant| variant.length == length)
            .map(|variant| variant.caption.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl HeadlineVariantSet {
    /// Tones requested by the headline and image-prompt templates.
    pub const CANONICAL_TONES: [&'static str; 3] = ["funny", "emotional", "aesthetic"];

    pub fn iter(&self) -> impl Iterator<Item = &HeadlineVariant> {
        self.0.iter()
    }

    #[must_use]
    pub fn find_tone(&self, tone: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|variant| variant.tone == tone)
            .map(|variant| variant.catchy_line.as_str())
    }

    /// Whether the set holds exactly the canonical tones, in order.
    #[must_use]
    pub fn is_canonical(&self) -> bool {
        self.0
            .iter()
            .map(|variant| variant.tone.as_str())
            .eq(Self::CANONICAL_TONES)
    }
}

// Variant sets carry no bounds of their own.
impl Validate for CaptionVariantSet {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Ok(())
    }
}

impl Validate for HeadlineVariantSet {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Ok(())
    }
}

/// Raw output of a flow, classified against the shape its use case declares.
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratedArtifact {
    MarketingContent(MarketingContent),
    CaptionVariants(CaptionVariantSet),
    HeadlineVariants(HeadlineVariantSet),
    ImagePrompts(ImagePromptBundle),
    ColorPalette(ColorPalette),
    Hashtags(HashtagSet),
    ModifiedStory(StoryModificationResult),
    Malformed {
        use_case: UseCase,
        raw: String,
        reason: String,
    },
}

impl GeneratedArtifact {
    /// Classify raw provider text. Never fails: output that does not match the
    /// declared shape becomes [`GeneratedArtifact::Malformed`].
    #[must_use]
    pub fn from_raw(use_case: UseCase, raw: &str) -> Self {
        let decoded = match use_case {
            UseCase::MarketingContent => decode(use_case, raw).map(Self::MarketingContent),
            UseCase::CaptionVariants => decode(use_case, raw).map(Self::CaptionVariants),
            UseCase::HeadlineVariants => decode(use_case, raw).map(Self::HeadlineVariants),
            UseCase::ImagePrompts => decode(use_case, raw).map(Self::ImagePrompts),
            UseCase::ColorPalette => decode(use_case, raw).map(Self::ColorPalette),
            UseCase::RelevantHashtags => decode(use_case, raw).map(Self::Hashtags),
            UseCase::ModifyStory => decode(use_case, raw).map(Self::ModifiedStory),
        };
        decoded.unwrap_or_else(|error| Self::Malformed {
            use_case,
            raw: raw.to_string(),
            reason: match error {
                StudioError::MalformedGenerationOutput { reason, .. } => reason,
                other => other.to_string(),
            },
        })
    }

    #[must_use]
    pub fn use_case(&self) -> UseCase {
        match self {
            Self::MarketingContent(_) => UseCase::MarketingContent,
            Self::CaptionVariants(_) => UseCase::CaptionVariants,
            Self::HeadlineVariants(_) => UseCase::HeadlineVariants,
            Self::ImagePrompts(_) => UseCase::ImagePrompts,
            Self::ColorPalette(_) => UseCase::ColorPalette,
            Self::Hashtags(_) => UseCase::RelevantHashtags,
            Self::ModifiedStory(_) => UseCase::ModifyStory,
            Self::Malformed { use_case, .. } => *use_case,
        }
    }

    pub fn into_result(self) -> StudioResult<Self> {
        match self {
            Self::Malformed {
                use_case, reason, ..
            } => Err(StudioError::malformed(use_case, reason)),
            artifact => Ok(artifact),
        }
    }

    /// The artifact as the JSON value its output shape describes.
    pub fn into_json(self) -> StudioResult<Value> {
        let value = match self {
            Self::MarketingContent(content) => serde_json::to_value(content),
            Self::CaptionVariants(set) => serde_json::to_value(set),
            Self::HeadlineVariants(set) => serde_json::to_value(set),
            Self::ImagePrompts(bundle) => serde_json::to_value(bundle),
            Self::ColorPalette(palette) => serde_json::to_value(palette),
            Self::Hashtags(set) => serde_json::to_value(set),
            Self::ModifiedStory(result) => serde_json::to_value(result),
            Self::Malformed {
                use_case, reason, ..
            } => return Err(StudioError::malformed(use_case, reason)),
        };
        value.map_err(|error| StudioError::Invariant(error.to_string()))
    }
}

/// Parse and validate raw provider text as the output type of `use_case`.
pub(crate) fn decode<T>(use_case: UseCase, raw: &str) -> StudioResult<T>
where
    T: DeserializeOwned + Validate,
{
    schema::decode_str(extract_json(raw))
        .map_err(|error| StudioError::malformed(use_case, error.to_string()))
}

/// Strip surrounding whitespace and a single markdown code fence
/// (optionally tagged `json`). Nothing else is repaired.
#[must_use]
pub fn extract_json(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(fenced) = trimmed
        .strip_prefix("```")
        .and_then(|rest| rest.strip_suffix("```"))
    else {
        return trimmed;
    };
    fenced.strip_prefix("json").unwrap_or(fenced).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTENT: &str = r##"{
        "story_title": "Sweet Relief",
        "story_text": "Warm cookies.",
        "tone": "hopeful",
        "hashtags": ["#bakesale", "#shelter", "#givingback"]
    }"##;

    #[test]
    fn extracts_fenced_json() {
        assert_eq!(extract_json("  ```json\n{\"a\":1}\n```  "), "{\"a\":1}");
        assert_eq!(extract_json("```\n[1]\n```"), "[1]");
        assert_eq!(extract_json("\n{\"a\":1}\n"), "{\"a\":1}");
    }

    #[test]
    fn prose_around_json_is_not_repaired() {
        let artifact = GeneratedArtifact::from_raw(
            UseCase::RelevantHashtags,
            "Here you go: {\"hashtags\": [\"#a\"]}",
        );
        assert!(matches!(artifact, GeneratedArtifact::Malformed { .. }));
    }

    #[test]
    fn classifies_marketing_content() {
        let artifact = GeneratedArtifact::from_raw(UseCase::MarketingContent, CONTENT);
        let GeneratedArtifact::MarketingContent(content) = artifact else {
            panic!("expected marketing content, got {artifact:?}");
        };
        assert_eq!(content.story_title, "Sweet Relief");
        assert_eq!(content.rendered_message(), "**Sweet Relief**\n\nWarm cookies.");
        assert_eq!(content.kind(), ContentKind::Caption);
    }

    #[test]
    fn missing_hashtags_is_malformed() {
        let raw = r#"{"story_title": "T", "story_text": "S", "tone": "calm"}"#;
        let artifact = GeneratedArtifact::from_raw(UseCase::MarketingContent, raw);
        let GeneratedArtifact::Malformed { reason, raw: kept, .. } = &artifact else {
            panic!("expected malformed, got {artifact:?}");
        };
        assert!(reason.contains("missing field `hashtags`"), "{reason}");
        assert_eq!(kept, raw);
        assert!(matches!(
            artifact.into_result(),
            Err(StudioError::MalformedGenerationOutput { use_case, .. }) if use_case == "marketing-content"
        ));
    }

    #[test]
    fn wrong_hashtag_count_is_malformed() {
        let raw = r##"{"story_title": "T", "story_text": "S", "tone": "calm", "hashtags": ["#a", "#b"]}"##;
        let GeneratedArtifact::Malformed { reason, .. } =
            GeneratedArtifact::from_raw(UseCase::MarketingContent, raw)
        else {
            panic!("expected malformed");
        };
        assert!(reason.contains("exactly 3 hashtags"), "{reason}");
    }

    #[test]
    fn caption_lengths_are_strict() {
        let raw = r#"[{"length": "short", "caption": "Hi"}, {"length": "Medium", "caption": "Hello"}]"#;
        let artifact = GeneratedArtifact::from_raw(UseCase::CaptionVariants, raw);
        let GeneratedArtifact::Malformed { reason, .. } = artifact else {
            panic!("expected malformed");
        };
        assert!(reason.contains("unknown variant `Medium`"), "{reason}");
    }

    #[test]
    fn groups_captions_by_length() {
        let raw = r#"[
            {"length": "short", "caption": "One"},
            {"length": "long", "caption": "Three"},
            {"length": "short", "caption": "Two"}
        ]"#;
        let GeneratedArtifact::CaptionVariants(set) =
            GeneratedArtifact::from_raw(UseCase::CaptionVariants, raw)
        else {
            panic!("expected captions");
        };
        assert_eq!(set.len(), 3);
        assert_eq!(
            set.with_length(CaptionLength::Short).collect::<Vec<_>>(),
            vec!["One", "Two"]
        );
        assert_eq!(set.with_length(CaptionLength::Medium).count(), 0);
    }

    #[test]
    fn headline_set_permits_any_tone() {
        let raw = r#"[{"tone": "sarcastic", "catchy_line": "Sure."}]"#;
        let GeneratedArtifact::HeadlineVariants(set) =
            GeneratedArtifact::from_raw(UseCase::HeadlineVariants, raw)
        else {
            panic!("expected headlines");
        };
        assert!(!set.is_canonical());
        assert_eq!(set.find_tone("sarcastic"), Some("Sure."));
    }

    #[test]
    fn image_prompt_bundle_checks_nested_variants() {
        let raw = r##"{
            "catchy_line": "Bake it better",
            "image_prompt": "A table of pastries",
            "creative_description": "Warm and inviting.",
            "variants": [{"tone": "funny"}],
            "hashtags": ["#bake"],
            "color_palette": ["#FFAA00"]
        }"##;
        let GeneratedArtifact::Malformed { reason, .. } =
            GeneratedArtifact::from_raw(UseCase::ImagePrompts, raw)
        else {
            panic!("expected malformed");
        };
        assert!(reason.contains("missing field `catchy_line`"), "{reason}");
    }

    #[test]
    fn into_json_uses_wire_field_names() {
        let artifact =
            GeneratedArtifact::from_raw(UseCase::ColorPalette, r##"{"colorPalette": ["#FFF"]}"##);
        assert_eq!(
            artifact.into_json().unwrap(),
            serde_json::json!({ "colorPalette": ["#FFF"] })
        );
    }

    #[test]
    fn long_story_is_presented_as_story() {
        let content = MarketingContent {
            story_title: "T".into(),
            story_text: "word ".repeat(31),
            tone: "calm".into(),
            hashtags: vec![],
        };
        assert_eq!(content.kind(), ContentKind::Story);
        assert_eq!(content.kind().title(), "Your Story");
    }

    #[test]
    fn declared_schema_follows_serde_names() {
        let palette = schema::schema_for::<ColorPalette>();
        assert_eq!(schema::property_names(&palette), vec!["colorPalette"]);

        let story = schema::schema_for::<StoryModificationResult>();
        assert_eq!(story["required"], serde_json::json!(["modifiedStory"]));

        let captions = schema::schema_for::<CaptionVariantSet>();
        assert_eq!(captions["type"], "array");
        assert_eq!(
            captions["items"]["properties"]["length"]["enum"],
            serde_json::json!(["short", "medium", "long"])
        );
    }
}
