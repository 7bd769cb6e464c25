use crate::{
    client::ModelGenerationClient,
    gateway::ContentGateway,
    orchestrator::OrchestratorOptions,
    policy::{GenerationPolicy, PolicyClient},
    StudioError, StudioResult,
};
use std::{str::FromStr, sync::Arc, time::Duration};
use vynce_llm::openai::{OpenAIChatModel, OpenAIChatModelOptions};

const DEFAULT_MODEL_ID: &str = "gpt-4o-mini";
const DEFAULT_REVEAL_CADENCE_MS: u64 = 50;

/// Studio configuration loaded from environment variables.
#[derive(Clone)]
pub struct StudioConfig {
    pub api_key: String,
    pub base_url: Option<String>,
    pub model_id: String,
    pub reveal_cadence: Duration,
    pub max_attempts: u32,
    pub generation_timeout: Option<Duration>,
}

impl std::fmt::Debug for StudioConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StudioConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model_id", &self.model_id)
            .field("reveal_cadence", &self.reveal_cadence)
            .field("max_attempts", &self.max_attempts)
            .field("generation_timeout", &self.generation_timeout)
            .finish()
    }
}

impl StudioConfig {
    /// Load `.env` if present, then read the process environment.
    ///
    /// | Env Var                       | Default                 |
    /// |-------------------------------|-------------------------|
    /// | `OPENAI_API_KEY`              | required                |
    /// | `OPENAI_BASE_URL`             | the OpenAI API          |
    /// | `VYNCE_MODEL_ID`              | `gpt-4o-mini`           |
    /// | `VYNCE_REVEAL_CADENCE_MS`     | `50`                    |
    /// | `VYNCE_MAX_ATTEMPTS`          | `1`                     |
    /// | `VYNCE_GENERATION_TIMEOUT_MS` | no timeout              |
    pub fn from_env() -> StudioResult<Self> {
        if let Err(error) = dotenvy::dotenv() {
            if !error.not_found() {
                return Err(StudioError::Config(format!("failed to load .env: {error}")));
            }
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> StudioResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let api_key = get("OPENAI_API_KEY")
            .ok_or_else(|| StudioError::Config("OPENAI_API_KEY must be set".to_string()))?;
        let model_id = get("VYNCE_MODEL_ID").unwrap_or_else(|| DEFAULT_MODEL_ID.to_string());
        let reveal_cadence_ms: u64 =
            parse(get("VYNCE_REVEAL_CADENCE_MS"), "VYNCE_REVEAL_CADENCE_MS")?
                .unwrap_or(DEFAULT_REVEAL_CADENCE_MS);
        let max_attempts: u32 = parse(get("VYNCE_MAX_ATTEMPTS"), "VYNCE_MAX_ATTEMPTS")?.unwrap_or(1);
        if max_attempts == 0 {
            return Err(StudioError::Config(
                "VYNCE_MAX_ATTEMPTS must be at least 1".to_string(),
            ));
        }
        let generation_timeout = parse::<u64>(
            get("VYNCE_GENERATION_TIMEOUT_MS"),
            "VYNCE_GENERATION_TIMEOUT_MS",
        )?
        .map(Duration::from_millis);

        Ok(Self {
            api_key,
            base_url: get("OPENAI_BASE_URL"),
            model_id,
            reveal_cadence: Duration::from_millis(reveal_cadence_ms),
            max_attempts,
            generation_timeout,
        })
    }

    #[must_use]
    pub fn policy(&self) -> GenerationPolicy {
        GenerationPolicy::default()
            .with_max_attempts(self.max_attempts)
            .with_timeout(self.generation_timeout)
    }

    #[must_use]
    pub fn orchestrator_options(&self) -> OrchestratorOptions {
        OrchestratorOptions {
            reveal_cadence: self.reveal_cadence,
        }
    }

    /// Wire the OpenAI chat model through the retry policy into a gateway
    /// over the standard flows.
    pub fn build_gateway(&self) -> StudioResult<ContentGateway> {
        let model = OpenAIChatModel::new(
            self.model_id.clone(),
            OpenAIChatModelOptions {
                base_url: self.base_url.clone(),
                api_key: self.api_key.clone(),
                ..OpenAIChatModelOptions::default()
            },
        );
        let client = PolicyClient::new(ModelGenerationClient::new(Arc::new(model)), self.policy());
        ContentGateway::standard(client)
    }
}

fn parse<T: FromStr>(value: Option<String>, key: &str) -> StudioResult<Option<T>>
where
    T::Err: std::fmt::Display,
{
    value
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|error| StudioError::Config(format!("{key} is invalid ({raw}): {error}")))
        })
        .transpose()
}
