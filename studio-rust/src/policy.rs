//! Retry and timeout policy around a [`GenerationClient`].
//!
//! The default policy makes a single attempt with no timeout, so wrapping a
//! client in [`PolicyClient`] changes nothing until the policy is tuned.

use crate::{
    client::{GenerationClient, GenerationRequest, RawModelOutput},
    StudioError, StudioResult,
};
use async_trait::async_trait;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationPolicy {
    /// Total attempts, including the first. Values below 1 behave as 1.
    pub max_attempts: u32,
    /// Delay before the second attempt. Doubles after every failure.
    pub backoff: Duration,
    /// Upper bound on the delay between attempts.
    pub max_backoff: Duration,
    /// Bound on each attempt. Expiry counts as `GenerationUnavailable`.
    pub timeout: Option<Duration>,
}

impl Default for GenerationPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(30),
            timeout: None,
        }
    }
}

impl GenerationPolicy {
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    #[must_use]
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Delay that follows `current`, clamped to `max_backoff`.
    #[must_use]
    pub fn next_delay(&self, current: Duration) -> Duration {
        current.saturating_mul(2).min(self.max_backoff)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("generation timed out after {0:?}")]
pub struct GenerationTimeout(pub Duration);

/// Applies a [`GenerationPolicy`] to every call of the wrapped client.
pub struct PolicyClient<C> {
    inner: C,
    policy: GenerationPolicy,
}

impl<C: GenerationClient> PolicyClient<C> {
    pub fn new(inner: C, policy: GenerationPolicy) -> Self {
        Self { inner, policy }
    }

    #[must_use]
    pub fn policy(&self) -> &GenerationPolicy {
        &self.policy
    }

    async fn attempt(&self, request: GenerationRequest) -> StudioResult<RawModelOutput> {
        match self.policy.timeout {
            Some(limit) => tokio::time::timeout(limit, self.inner.generate(request))
                .await
                .map_err(|_| StudioError::unavailable(GenerationTimeout(limit)))?,
            None => self.inner.generate(request).await,
        }
    }
}

#[async_trait]
impl<C: GenerationClient> GenerationClient for PolicyClient<C> {
    async fn generate(&self, request: GenerationRequest) -> StudioResult<RawModelOutput> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut delay = self.policy.backoff;
        let mut attempt = 1;

        loop {
            match self.attempt(request.clone()).await {
                Err(error) if error.is_retryable() && attempt < max_attempts => {
                    tracing::warn!(
                        use_case = %request.use_case,
                        attempt,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        %error,
                        "generation attempt failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    delay = self.policy.next_delay(delay);
                    attempt += 1;
                }
                result => return result,
            }
        }
    }
}
