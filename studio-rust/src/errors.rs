use crate::flows::UseCase;
use thiserror::Error;
use vynce_llm::LanguageModelError;

#[derive(Debug, Error)]
pub enum StudioError {
    /// The request failed its declared shape or bounds. The user must change
    /// the input; no call to the provider was made.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// The provider could not be reached or failed to answer. Retrying the
    /// same prompt may succeed.
    #[error("Generation unavailable: {0}")]
    GenerationUnavailable(#[source] BoxedError),
    /// The provider answered but the output violated the declared shape.
    #[error("Malformed generation output for {use_case}: {reason}")]
    MalformedGenerationOutput { use_case: String, reason: String },
    /// The turn was cancelled before the provider answered.
    #[error("Generation cancelled")]
    Cancelled,
    #[error("Invariant: {0}")]
    Invariant(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

pub type StudioResult<T> = Result<T, StudioError>;

impl StudioError {
    pub fn unavailable(error: impl Into<BoxedError>) -> Self {
        Self::GenerationUnavailable(error.into())
    }

    pub fn malformed(use_case: impl ToString, reason: impl Into<String>) -> Self {
        Self::MalformedGenerationOutput {
            use_case: use_case.to_string(),
            reason: reason.into(),
        }
    }

    /// Only transport and provider availability failures are worth repeating
    /// with the same prompt. A provider error that is known to be permanent
    /// (a rejected API key) is not.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::GenerationUnavailable(source) => source
                .downcast_ref::<LanguageModelError>()
                .is_none_or(LanguageModelError::is_transient),
            _ => false,
        }
    }

    /// Classify a provider failure for the flow that made the call. A refusal
    /// or an unexpected provider answer is malformed output of `use_case`;
    /// everything else means the provider was unavailable.
    pub fn from_model(use_case: UseCase, error: LanguageModelError) -> Self {
        match error {
            LanguageModelError::Refusal(reason) => Self::malformed(use_case, reason),
            LanguageModelError::Invariant(provider, reason) => {
                Self::malformed(use_case, format!("{provider}: {reason}"))
            }
            other @ (LanguageModelError::Transport(_)
            | LanguageModelError::StatusCode(..)
            | LanguageModelError::InvalidInput(_)) => Self::GenerationUnavailable(Box::new(other)),
        }
    }
}

impl From<validator::ValidationErrors> for StudioError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::InvalidInput(errors.to_string())
    }
}
