use crate::{flows::UseCase, prompt::PromptText, StudioError, StudioResult};
use async_trait::async_trait;
use std::sync::Arc;
use vynce_llm::{LanguageModel, LanguageModelInput, Message, ModelUsage, ResponseFormatOption};

/// One rendered prompt on its way to the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub use_case: UseCase,
    pub prompt: PromptText,
    /// The expected-output declaration for the provider.
    pub response_format: ResponseFormatOption,
}

/// Provider text before it is checked against any shape.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawModelOutput {
    pub text: String,
    pub usage: Option<ModelUsage>,
}

impl RawModelOutput {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            usage: None,
        }
    }
}

/// Sends a rendered prompt to the hosted model and returns its raw output.
/// Provider and network failures surface as `GenerationUnavailable`.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> StudioResult<RawModelOutput>;
}

#[async_trait]
impl<T> GenerationClient for Arc<T>
where
    T: GenerationClient + ?Sized,
{
    async fn generate(&self, request: GenerationRequest) -> StudioResult<RawModelOutput> {
        (**self).generate(request).await
    }
}

/// Sampling parameters applied to every request.
#[derive(Debug, Clone, Default)]
pub struct SamplingParams {
    pub max_tokens: Option<u32>,
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
    pub seed: Option<i64>,
}

/// [`GenerationClient`] backed by a [`LanguageModel`]. The rendered prompt is
/// sent as a single user message.
#[derive(Clone)]
pub struct ModelGenerationClient {
    model: Arc<dyn LanguageModel>,
    params: SamplingParams,
}

impl ModelGenerationClient {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self {
            model,
            params: SamplingParams::default(),
        }
    }

    #[must_use]
    pub fn with_params(mut self, params: SamplingParams) -> Self {
        self.params = params;
        self
    }

    fn to_input(&self, request: GenerationRequest) -> LanguageModelInput {
        LanguageModelInput {
            system_prompt: None,
            messages: vec![Message::user_text(request.prompt.into_string())],
            response_format: Some(request.response_format),
            max_tokens: self.params.max_tokens,
            temperature: self.params.temperature,
            top_p: self.params.top_p,
            seed: self.params.seed,
        }
    }
}

#[async_trait]
impl GenerationClient for ModelGenerationClient {
    async fn generate(&self, request: GenerationRequest) -> StudioResult<RawModelOutput> {
        let use_case = request.use_case;
        let response = self
            .model
            .generate(self.to_input(request))
            .await
            .map_err(|error| StudioError::from_model(use_case, error))?;
        tracing::debug!(
            %use_case,
            provider = self.model.provider(),
            model_id = %self.model.model_id(),
            "received model response"
        );
        Ok(RawModelOutput {
            text: response.text(),
            usage: response.usage,
        })
    }
}
