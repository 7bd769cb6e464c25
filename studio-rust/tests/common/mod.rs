#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::json;
use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};
use tokio::sync::Notify;
use vynce_llm::{llm_sdk_test::MockLanguageModel, Message, Part};
use vynce_studio::{
    ContentGateway, GenerationClient, GenerationRequest, ModelGenerationClient,
    OrchestratorOptions, RawModelOutput, SessionContext, StudioError, StudioResult,
    TurnOrchestrator,
};

pub const BAKE_SALE: &str = "A bake sale for the local animal shelter.";

/// A story of exactly 120 words.
pub fn bake_sale_story() -> String {
    let sentence = "Warm cinnamon drifted across the school gym as neighbors lined up, \
                    coins in hand, for a shelter dog's second chance.";
    let words: Vec<&str> = sentence.split(' ').collect();
    assert_eq!(words.len(), 20);
    vec![sentence; 6].join(" ")
}

pub fn marketing_json(title: &str, story: &str) -> String {
    json!({
        "story_title": title,
        "story_text": story,
        "tone": "hopeful",
        "hashtags": ["#bakesale", "#shelter", "#givingback"]
    })
    .to_string()
}

pub fn no_reveal_delay() -> OrchestratorOptions {
    OrchestratorOptions {
        reveal_cadence: Duration::ZERO,
    }
}

pub fn mock_gateway(model: &Arc<MockLanguageModel>) -> ContentGateway {
    ContentGateway::standard(ModelGenerationClient::new(model.clone())).unwrap()
}

pub fn orchestrator(gateway: ContentGateway) -> TurnOrchestrator {
    TurnOrchestrator::new(gateway, SessionContext::anonymous(), no_reveal_delay())
}

/// Text of the single user message the model received.
pub fn prompt_text(message: &Message) -> &str {
    let Message::User(user) = message else {
        panic!("expected a user message, got {message:?}");
    };
    let Part::Text(text) = &user.content[0];
    &text.text
}

pub enum Reply {
    Text(String),
    Unavailable(&'static str),
    Malformed(&'static str),
}

/// Answers from a fixed script and records every request.
#[derive(Default)]
pub struct ScriptedClient {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedClient {
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().collect()),
            requests: Mutex::default(),
        })
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationClient for ScriptedClient {
    async fn generate(&self, request: GenerationRequest) -> StudioResult<RawModelOutput> {
        self.requests.lock().unwrap().push(request.clone());
        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(Reply::Text(text)) => Ok(RawModelOutput::new(text)),
            Some(Reply::Unavailable(reason)) => Err(StudioError::unavailable(reason)),
            Some(Reply::Malformed(reason)) => Err(StudioError::malformed(request.use_case, reason)),
            None => Err(StudioError::unavailable("script exhausted")),
        }
    }
}

/// Signals when a call arrives and holds it until released.
pub struct GatedClient {
    pub entered: Notify,
    pub release: Notify,
    reply: String,
    calls: AtomicUsize,
}

impl GatedClient {
    pub fn new(reply: String) -> Arc<Self> {
        Arc::new(Self {
            entered: Notify::new(),
            release: Notify::new(),
            reply,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerationClient for GatedClient {
    async fn generate(&self, _request: GenerationRequest) -> StudioResult<RawModelOutput> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.entered.notify_one();
        self.release.notified().await;
        Ok(RawModelOutput::new(self.reply.clone()))
    }
}

/// Never answers within any reasonable test timeout.
pub struct StalledClient;

#[async_trait]
impl GenerationClient for StalledClient {
    async fn generate(&self, _request: GenerationRequest) -> StudioResult<RawModelOutput> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(RawModelOutput::default())
    }
}
