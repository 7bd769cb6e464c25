use crate::{
    artifacts::{
        self, CaptionVariantSet, ColorPalette, GeneratedArtifact, HashtagSet, HeadlineVariantSet,
        ImagePromptBundle, MarketingContent, StoryModificationResult,
    },
    briefs::{ContentBrief, CreativeBrief, StoryModificationRequest},
    client::{GenerationClient, GenerationRequest},
    flows::{self, Flow, FlowDefinition, FlowRegistry, UseCase},
    opentelemetry::trace_flow,
    StudioError, StudioResult,
};
use serde_json::Value;
use std::sync::Arc;
use vynce_llm::ModelUsage;

/// Typed entry point to every registered flow.
///
/// A call validates its input, renders the flow's template, sends the prompt
/// through the [`GenerationClient`] and checks the raw output against the
/// flow's output shape. Input that fails validation never reaches the client.
#[derive(Clone)]
pub struct ContentGateway {
    registry: Arc<FlowRegistry>,
    client: Arc<dyn GenerationClient>,
}

impl ContentGateway {
    pub fn new(registry: FlowRegistry, client: impl GenerationClient + 'static) -> Self {
        Self {
            registry: Arc::new(registry),
            client: Arc::new(client),
        }
    }

    /// A gateway over [`FlowRegistry::standard`].
    pub fn standard(client: impl GenerationClient + 'static) -> StudioResult<Self> {
        Ok(Self::new(FlowRegistry::standard()?, client))
    }

    #[must_use]
    pub fn registry(&self) -> &FlowRegistry {
        &self.registry
    }

    /// Run flow `F` with a typed input.
    pub async fn run<F: Flow>(&self, input: &F::Input) -> StudioResult<F::Output> {
        trace_flow(F::USE_CASE, self.run_untraced::<F>(input)).await
    }

    async fn run_untraced<F: Flow>(
        &self,
        input: &F::Input,
    ) -> (Option<ModelUsage>, StudioResult<F::Output>) {
        let request = match self.typed_request::<F>(input) {
            Ok(request) => request,
            Err(error) => return (None, Err(error)),
        };
        let raw = match self.client.generate(request).await {
            Ok(raw) => raw,
            Err(error) => return (None, Err(error)),
        };
        let output = artifacts::decode::<F::Output>(F::USE_CASE, &raw.text)
            .inspect_err(|error| log_malformed(F::USE_CASE, error));
        (raw.usage, output)
    }

    fn typed_request<F: Flow>(&self, input: &F::Input) -> StudioResult<GenerationRequest> {
        let definition = self.definition(F::USE_CASE)?;
        flows::check_input::<F>(input).inspect_err(|error| log_rejected(F::USE_CASE, error))?;
        Ok(GenerationRequest {
            use_case: F::USE_CASE,
            prompt: F::TEMPLATE.render(input)?,
            response_format: definition.response_format().clone(),
        })
    }

    fn definition(&self, use_case: UseCase) -> StudioResult<&FlowDefinition> {
        self.registry
            .get(use_case)
            .ok_or_else(|| StudioError::Invariant(format!("use case {use_case} is not registered")))
    }

    /// Run a use case by id with a JSON input and return the JSON output.
    pub async fn invoke(&self, use_case_id: &str, input: &Value) -> StudioResult<Value> {
        self.invoke_artifact(use_case_id, input).await?.into_json()
    }

    /// Run a use case by id and return the classified artifact. Output that
    /// fails its shape is an error, never a partial artifact.
    pub async fn invoke_artifact(
        &self,
        use_case_id: &str,
        input: &Value,
    ) -> StudioResult<GeneratedArtifact> {
        let definition = self.registry.lookup(use_case_id)?;
        trace_flow(definition.use_case, async move {
            let prompt = match definition.render(input) {
                Ok(prompt) => prompt,
                Err(error) => {
                    log_rejected(definition.use_case, &error);
                    return (None, Err(error));
                }
            };
            let request = GenerationRequest {
                use_case: definition.use_case,
                prompt,
                response_format: definition.response_format().clone(),
            };
            let raw = match self.client.generate(request).await {
                Ok(raw) => raw,
                Err(error) => return (None, Err(error)),
            };
            let artifact = definition
                .classify(&raw.text)
                .into_result()
                .inspect_err(|error| log_malformed(definition.use_case, error));
            (raw.usage, artifact)
        })
        .await
    }

    pub async fn generate_marketing_content(
        &self,
        brief: &CreativeBrief,
    ) -> StudioResult<MarketingContent> {
        self.run::<flows::MarketingContentFlow>(brief).await
    }

    pub async fn generate_caption_variants(
        &self,
        brief: &ContentBrief,
    ) -> StudioResult<CaptionVariantSet> {
        self.run::<flows::CaptionVariantsFlow>(brief).await
    }

    pub async fn generate_headline_variants(
        &self,
        brief: &ContentBrief,
    ) -> StudioResult<HeadlineVariantSet> {
        self.run::<flows::HeadlineVariantsFlow>(brief).await
    }

    pub async fn generate_image_prompts(
        &self,
        brief: &ContentBrief,
    ) -> StudioResult<ImagePromptBundle> {
        self.run::<flows::ImagePromptsFlow>(brief).await
    }

    pub async fn suggest_color_palette(&self, brief: &ContentBrief) -> StudioResult<ColorPalette> {
        self.run::<flows::ColorPaletteFlow>(brief).await
    }

    pub async fn suggest_relevant_hashtags(
        &self,
        brief: &ContentBrief,
    ) -> StudioResult<HashtagSet> {
        self.run::<flows::RelevantHashtagsFlow>(brief).await
    }

    pub async fn modify_story(
        &self,
        request: &StoryModificationRequest,
    ) -> StudioResult<StoryModificationResult> {
        self.run::<flows::ModifyStoryFlow>(request).await
    }
}

fn log_rejected(use_case: UseCase, error: &StudioError) {
    tracing::warn!(%use_case, %error, "rejected flow input");
}

fn log_malformed(use_case: UseCase, error: &StudioError) {
    tracing::warn!(%use_case, %error, "generation output failed its shape");
}
