//! The use-case registry. Every flow binds an input shape, an output shape
//! and a prompt template; the registry holds one type-erased definition per
//! use case for dynamic invocation by id.

use crate::{
    artifacts::{
        CaptionVariantSet, ColorPalette, GeneratedArtifact, HashtagSet, HeadlineVariantSet,
        ImagePromptBundle, MarketingContent, StoryModificationResult,
    },
    briefs::{ContentBrief, CreativeBrief, StoryModificationRequest},
    prompt::{PromptTemplate, PromptText},
    schema, templates, StudioError, StudioResult,
};
use schemars::JsonSchema;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::{collections::BTreeMap, fmt, str::FromStr};
use validator::Validate;
use vynce_llm::{JSONSchema, ResponseFormatJson, ResponseFormatOption};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UseCase {
    MarketingContent,
    CaptionVariants,
    HeadlineVariants,
    ImagePrompts,
    ColorPalette,
    RelevantHashtags,
    ModifyStory,
}

impl UseCase {
    pub const ALL: [Self; 7] = [
        Self::MarketingContent,
        Self::CaptionVariants,
        Self::HeadlineVariants,
        Self::ImagePrompts,
        Self::ColorPalette,
        Self::RelevantHashtags,
        Self::ModifyStory,
    ];

    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::MarketingContent => "marketing-content",
            Self::CaptionVariants => "caption-variants",
            Self::HeadlineVariants => "headline-variants",
            Self::ImagePrompts => "image-prompts",
            Self::ColorPalette => "color-palette",
            Self::RelevantHashtags => "relevant-hashtags",
            Self::ModifyStory => "modify-story",
        }
    }
}

impl fmt::Display for UseCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for UseCase {
    type Err = StudioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|use_case| use_case.id() == s)
            .ok_or_else(|| StudioError::InvalidInput(format!("unknown use case '{s}'")))
    }
}

/// A schema-bound prompt invocation.
pub trait Flow: Send + Sync + 'static {
    const USE_CASE: UseCase;
    const TEMPLATE: PromptTemplate;
    type Input: JsonSchema + Serialize + DeserializeOwned + Validate + Send + Sync;
    type Output: JsonSchema + DeserializeOwned + Validate + Send;
}

pub struct MarketingContentFlow;
pub struct CaptionVariantsFlow;
pub struct HeadlineVariantsFlow;
pub struct ImagePromptsFlow;
pub struct ColorPaletteFlow;
pub struct RelevantHashtagsFlow;
pub struct ModifyStoryFlow;

impl Flow for MarketingContentFlow {
    const USE_CASE: UseCase = UseCase::MarketingContent;
    const TEMPLATE: PromptTemplate = templates::MARKETING_CONTENT;
    type Input = CreativeBrief;
    type Output = MarketingContent;
}

impl Flow for CaptionVariantsFlow {
    const USE_CASE: UseCase = UseCase::CaptionVariants;
    const TEMPLATE: PromptTemplate = templates::CAPTION_VARIANTS;
    type Input = ContentBrief;
    type Output = CaptionVariantSet;
}

impl Flow for HeadlineVariantsFlow {
    const USE_CASE: UseCase = UseCase::HeadlineVariants;
    const TEMPLATE: PromptTemplate = templates::HEADLINE_VARIANTS;
    type Input = ContentBrief;
    type Output = HeadlineVariantSet;
}

impl Flow for ImagePromptsFlow {
    const USE_CASE: UseCase = UseCase::ImagePrompts;
    const TEMPLATE: PromptTemplate = templates::IMAGE_PROMPTS;
    type Input = ContentBrief;
    type Output = ImagePromptBundle;
}

impl Flow for ColorPaletteFlow {
    const USE_CASE: UseCase = UseCase::ColorPalette;
    const TEMPLATE: PromptTemplate = templates::COLOR_PALETTE;
    type Input = ContentBrief;
    type Output = ColorPalette;
}

impl Flow for RelevantHashtagsFlow {
    const USE_CASE: UseCase = UseCase::RelevantHashtags;
    const TEMPLATE: PromptTemplate = templates::RELEVANT_HASHTAGS;
    type Input = ContentBrief;
    type Output = HashtagSet;
}

impl Flow for ModifyStoryFlow {
    const USE_CASE: UseCase = UseCase::ModifyStory;
    const TEMPLATE: PromptTemplate = templates::MODIFY_STORY;
    type Input = StoryModificationRequest;
    type Output = StoryModificationResult;
}

/// Check a typed flow input against its declared bounds.
pub(crate) fn check_input<F: Flow>(input: &F::Input) -> StudioResult<()> {
    input.validate().map_err(StudioError::from)
}

/// Parse a JSON flow input and check its declared bounds.
pub(crate) fn parse_input<F: Flow>(input: &Value) -> StudioResult<F::Input> {
    schema::decode_value(input).map_err(|error| StudioError::InvalidInput(error.to_string()))
}

fn render_json<F: Flow>(input: &Value) -> StudioResult<PromptText> {
    F::TEMPLATE.render(&parse_input::<F>(input)?)
}

/// Everything the gateway needs to run a use case without knowing its types.
#[derive(Debug, Clone)]
pub struct FlowDefinition {
    pub use_case: UseCase,
    pub template: PromptTemplate,
    pub input_schema: JSONSchema,
    pub output_schema: JSONSchema,
    response_format: ResponseFormatOption,
    render: fn(&Value) -> StudioResult<PromptText>,
}

impl FlowDefinition {
    /// Build the definition of `F`, rejecting a template whose placeholders
    /// differ from the slots its input provides.
    pub fn of<F: Flow>() -> StudioResult<Self> {
        let input_schema = schema::schema_for::<F::Input>();
        let output_schema = schema::schema_for::<F::Output>();

        let mut placeholders = F::TEMPLATE.placeholders()?;
        let mut slots = schema::property_names(&input_schema);
        placeholders.sort_unstable();
        slots.sort_unstable();
        if placeholders != slots {
            return Err(StudioError::Invariant(format!(
                "template {} uses placeholders {placeholders:?} but {} provides {slots:?}",
                F::TEMPLATE.name,
                F::USE_CASE
            )));
        }

        let response_format = if schema::is_object(&output_schema) {
            ResponseFormatOption::Json(ResponseFormatJson {
                name: F::USE_CASE.id().replace('-', "_"),
                description: Some(format!("Output of the {} flow", F::USE_CASE)),
                schema: Some(output_schema.clone()),
            })
        } else {
            // Strict structured output requires an object at the root; array
            // results rely on the example in the prompt.
            ResponseFormatOption::Text
        };

        Ok(Self {
            use_case: F::USE_CASE,
            template: F::TEMPLATE,
            input_schema,
            output_schema,
            response_format,
            render: render_json::<F>,
        })
    }

    /// The expected-output declaration sent along with the prompt.
    #[must_use]
    pub fn response_format(&self) -> &ResponseFormatOption {
        &self.response_format
    }

    /// Validate a JSON input and render the template with it.
    pub fn render(&self, input: &Value) -> StudioResult<PromptText> {
        (self.render)(input)
    }

    #[must_use]
    pub fn classify(&self, raw: &str) -> GeneratedArtifact {
        GeneratedArtifact::from_raw(self.use_case, raw)
    }
}

#[derive(Debug, Clone, Default)]
pub struct FlowRegistry {
    flows: BTreeMap<UseCase, FlowDefinition>,
}

impl FlowRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with every use case registered once.
    pub fn standard() -> StudioResult<Self> {
        let mut registry = Self::new();
        registry.register::<MarketingContentFlow>()?;
        registry.register::<CaptionVariantsFlow>()?;
        registry.register::<HeadlineVariantsFlow>()?;
        registry.register::<ImagePromptsFlow>()?;
        registry.register::<ColorPaletteFlow>()?;
        registry.register::<RelevantHashtagsFlow>()?;
        registry.register::<ModifyStoryFlow>()?;
        Ok(registry)
    }

    pub fn register<F: Flow>(&mut self) -> StudioResult<&mut Self> {
        if self.flows.contains_key(&F::USE_CASE) {
            return Err(StudioError::Invariant(format!(
                "use case {} is already registered",
                F::USE_CASE
            )));
        }
        self.flows.insert(F::USE_CASE, FlowDefinition::of::<F>()?);
        Ok(self)
    }

    #[must_use]
    pub fn get(&self, use_case: UseCase) -> Option<&FlowDefinition> {
        self.flows.get(&use_case)
    }

    pub fn lookup(&self, id: &str) -> StudioResult<&FlowDefinition> {
        let use_case: UseCase = id.parse()?;
        self.get(use_case).ok_or_else(|| {
            StudioError::InvalidInput(format!("use case '{use_case}' is not registered"))
        })
    }

    pub fn use_cases(&self) -> impl Iterator<Item = UseCase> + '_ {
        self.flows.keys().copied()
    }
}
