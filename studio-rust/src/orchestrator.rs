//! Drives one conversational turn: lock the input, call the marketing-content
//! flow, reveal the answer word by word and recover to a readable error turn
//! on failure.
//!
//! A turn moves `Idle -> Pending -> Revealing -> Idle` on success and
//! `Idle -> Pending -> Idle` on failure. Submitting while a turn is Pending or
//! Revealing is a no-op, so a transcript never holds two turns in flight.

use crate::{
    artifacts::MarketingContent,
    briefs::CreativeBrief,
    gateway::ContentGateway,
    reveal::{reveal, RevealFrame},
    session::SessionContext,
    transcript::{ConversationTurn, Transcript},
    StudioError,
};
use async_stream::stream;
use futures::{
    future::{AbortHandle, Abortable},
    pin_mut, Stream, StreamExt,
};
use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

/// Text of the turn appended when a turn fails.
pub const ERROR_MESSAGE: &str = "I'm sorry, I couldn't generate a response. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestratorOptions {
    /// Delay before each revealed word.
    pub reveal_cadence: Duration,
}

impl Default for OrchestratorOptions {
    fn default() -> Self {
        Self {
            reveal_cadence: Duration::from_millis(50),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    Idle,
    Pending,
    Revealing,
}

/// Progress of a turn driven through [`TurnOrchestrator::submit_stream`].
#[derive(Debug)]
pub enum TurnEvent {
    /// The submission was blank or another turn was in flight.
    Ignored,
    /// The user turn and the typing placeholder were appended.
    Pending,
    Frame(RevealFrame),
    Answered(MarketingContent),
    Failed(StudioError),
}

#[derive(Debug)]
pub enum TurnOutcome {
    Answered(MarketingContent),
    Failed(StudioError),
    Ignored,
}

/// Aborts the Pending turn of the orchestrator it came from. The turn then
/// fails with [`StudioError::Cancelled`].
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    current: Arc<Mutex<Option<AbortHandle>>>,
}

impl CancelHandle {
    /// Returns whether a turn was waiting on the provider.
    pub fn cancel(&self) -> bool {
        match self.slot().take() {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    fn arm(&self, handle: AbortHandle) {
        *self.slot() = Some(handle);
    }

    fn disarm(&self) {
        self.slot().take();
    }

    fn slot(&self) -> MutexGuard<'_, Option<AbortHandle>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

struct SessionState {
    transcript: Transcript,
    phase: TurnPhase,
    latest: Option<MarketingContent>,
}

pub struct TurnOrchestrator {
    gateway: ContentGateway,
    context: SessionContext,
    options: OrchestratorOptions,
    state: Mutex<SessionState>,
    cancel: CancelHandle,
}

impl TurnOrchestrator {
    pub fn new(
        gateway: ContentGateway,
        context: SessionContext,
        options: OrchestratorOptions,
    ) -> Self {
        Self {
            gateway,
            context,
            options,
            state: Mutex::new(SessionState {
                transcript: Transcript::new(),
                phase: TurnPhase::Idle,
                latest: None,
            }),
            cancel: CancelHandle::default(),
        }
    }

    #[must_use]
    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    #[must_use]
    pub fn gateway(&self) -> &ContentGateway {
        &self.gateway
    }

    #[must_use]
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// A snapshot of the transcript.
    #[must_use]
    pub fn transcript(&self) -> Transcript {
        self.lock().transcript.clone()
    }

    #[must_use]
    pub fn phase(&self) -> TurnPhase {
        self.lock().phase
    }

    /// The content of the most recent answered turn.
    #[must_use]
    pub fn latest_content(&self) -> Option<MarketingContent> {
        self.lock().latest.clone()
    }

    /// End the session and hand back its transcript.
    #[must_use]
    pub fn finish(self) -> Transcript {
        self.cancel.cancel();
        self.state
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .transcript
    }

    /// Run a turn to completion.
    pub async fn submit(&self, brief: &str) -> TurnOutcome {
        let events = self.submit_stream(brief);
        pin_mut!(events);

        let mut outcome = TurnOutcome::Ignored;
        while let Some(event) = events.next().await {
            match event {
                TurnEvent::Answered(content) => outcome = TurnOutcome::Answered(content),
                TurnEvent::Failed(error) => outcome = TurnOutcome::Failed(error),
                TurnEvent::Ignored | TurnEvent::Pending | TurnEvent::Frame(_) => {}
            }
        }
        outcome
    }

    /// Run a turn, yielding every transition. Dropping the stream while the
    /// turn is Pending fails the turn; dropping it mid-reveal completes the
    /// placeholder with the full answer.
    pub fn submit_stream<'a>(&'a self, brief: &str) -> impl Stream<Item = TurnEvent> + Send + 'a {
        let brief = brief.to_string();
        stream! {
            if let Some(mut turn) = self.begin(&brief) {
                yield TurnEvent::Pending;

                let (handle, registration) = AbortHandle::new_pair();
                self.cancel.arm(handle);
                let request = CreativeBrief::new(brief);
                let result = Abortable::new(
                    self.gateway.generate_marketing_content(&request),
                    registration,
                )
                .await
                .unwrap_or_else(|_aborted| Err(StudioError::Cancelled));
                self.cancel.disarm();

                match result {
                    Ok(content) => {
                        let frames = reveal(turn.start_reveal(&content), self.options.reveal_cadence);
                        pin_mut!(frames);
                        while let Some(frame) = frames.next().await {
                            turn.show(&frame);
                            yield TurnEvent::Frame(frame);
                        }
                        turn.complete();
                        yield TurnEvent::Answered(content);
                    }
                    Err(error) => {
                        turn.fail(&error);
                        yield TurnEvent::Failed(error);
                    }
                }
            } else {
                yield TurnEvent::Ignored;
            }
        }
    }

    fn begin(&self, brief: &str) -> Option<ActiveTurn<'_>> {
        if brief.trim().is_empty() {
            tracing::debug!("ignored blank submission");
            return None;
        }

        let mut state = self.lock();
        if state.phase != TurnPhase::Idle {
            tracing::debug!(phase = ?state.phase, "ignored submission while a turn is in flight");
            return None;
        }
        state.transcript.push(ConversationTurn::user(brief));
        let placeholder = state.transcript.push(ConversationTurn::placeholder());
        state.phase = TurnPhase::Pending;
        tracing::debug!(placeholder, "turn pending");

        Some(ActiveTurn {
            state: &self.state,
            cancel: &self.cancel,
            placeholder,
            answer: None,
            settled: false,
        })
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        lock_state(&self.state)
    }
}

fn lock_state(state: &Mutex<SessionState>) -> MutexGuard<'_, SessionState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The turn currently in flight. Settles the transcript exactly once, on
/// completion, failure or drop.
struct ActiveTurn<'a> {
    state: &'a Mutex<SessionState>,
    cancel: &'a CancelHandle,
    placeholder: usize,
    answer: Option<String>,
    settled: bool,
}

impl ActiveTurn<'_> {
    fn start_reveal(&mut self, content: &MarketingContent) -> String {
        let text = content.rendered_message();
        let mut state = lock_state(self.state);
        state.phase = TurnPhase::Revealing;
        state.latest = Some(content.clone());
        tracing::debug!(words = crate::reveal::frame_count(&text), "turn revealing");
        self.answer = Some(text.clone());
        text
    }

    fn show(&self, frame: &RevealFrame) {
        let mut state = lock_state(self.state);
        if let Some(turn) = state.transcript.get_mut(self.placeholder) {
            turn.text.clone_from(&frame.text);
            turn.is_typing = !frame.is_final;
        }
    }

    fn complete(&mut self) {
        let Some(answer) = self.answer.take() else {
            return;
        };
        let mut state = lock_state(self.state);
        if let Some(turn) = state.transcript.get_mut(self.placeholder) {
            turn.text = answer;
            turn.is_typing = false;
        }
        state.phase = TurnPhase::Idle;
        self.settled = true;
        tracing::debug!("turn answered");
    }

    fn fail(&mut self, error: &StudioError) {
        let mut state = lock_state(self.state);
        state.transcript.remove(self.placeholder);
        state.transcript.push(ConversationTurn::ai(ERROR_MESSAGE));
        state.phase = TurnPhase::Idle;
        self.settled = true;
        tracing::debug!(%error, "turn failed");
    }
}

impl Drop for ActiveTurn<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        self.cancel.disarm();
        if self.answer.is_some() {
            self.complete();
        } else {
            self.fail(&StudioError::Cancelled);
        }
    }
}
