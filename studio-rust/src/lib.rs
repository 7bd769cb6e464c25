pub mod artifacts;
pub mod briefs;
mod client;
mod config;
mod errors;
pub mod flows;
mod gateway;
mod opentelemetry;
mod orchestrator;
mod policy;
pub mod prompt;
pub mod reveal;
pub mod schema;
mod session;
pub mod templates;
pub mod transcript;
mod workspace;

pub use artifacts::{GeneratedArtifact, MarketingContent};
pub use briefs::{ContentBrief, CreativeBrief, StoryModificationRequest};
pub use client::{
    GenerationClient, GenerationRequest, ModelGenerationClient, RawModelOutput, SamplingParams,
};
pub use config::StudioConfig;
pub use errors::{BoxedError, StudioError, StudioResult};
pub use flows::{Flow, FlowRegistry, UseCase};
pub use gateway::ContentGateway;
pub use orchestrator::{
    CancelHandle, OrchestratorOptions, TurnEvent, TurnOrchestrator, TurnOutcome, TurnPhase,
    ERROR_MESSAGE,
};
pub use policy::{GenerationPolicy, GenerationTimeout, PolicyClient};
pub use session::{AuthUser, SessionContext};
pub use transcript::{ConversationTurn, Sender, Transcript};
pub use workspace::StoryWorkspace;
