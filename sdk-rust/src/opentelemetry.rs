use crate::{LanguageModelInput, LanguageModelResult, ModelResponse, ModelUsage};
use opentelemetry::trace::Status;
use std::{future::Future, time::Instant};
use tracing::{info_span, Span};
use tracing_futures::Instrument;
use tracing_opentelemetry::OpenTelemetrySpanExt;

/// Sampling settings copied off the input so the span can report them after
/// the input has been moved into the provider call.
struct RequestSettings {
    max_tokens: Option<u32>,
    temperature: Option<f64>,
    top_p: Option<f64>,
    seed: Option<i64>,
}

impl RequestSettings {
    fn of(input: &LanguageModelInput) -> Self {
        Self {
            max_tokens: input.max_tokens,
            temperature: input.temperature,
            top_p: input.top_p,
            seed: input.seed,
        }
    }

    fn record(&self, span: &Span) {
        if let Some(max_tokens) = self.max_tokens {
            span.set_attribute("gen_ai.request.max_tokens", i64::from(max_tokens));
        }
        if let Some(temperature) = self.temperature {
            span.set_attribute("gen_ai.request.temperature", temperature);
        }
        if let Some(top_p) = self.top_p {
            span.set_attribute("gen_ai.request.top_p", top_p);
        }
        if let Some(seed) = self.seed {
            span.set_attribute("gen_ai.request.seed", seed);
        }
    }
}

/// Span around a single provider call. Attributes are flushed once, either
/// explicitly or on drop when the call future is abandoned.
pub struct LmSpan {
    span: Span,
    settings: RequestSettings,
    usage: Option<ModelUsage>,
    started: Instant,
    closed: bool,
}

impl LmSpan {
    pub fn new(provider: &str, model_id: &str, input: &LanguageModelInput) -> Self {
        let span = info_span!("vynce_llm.generate", provider, model_id);
        span.set_attribute("gen_ai.operation.name", "generate_content");
        span.set_attribute("gen_ai.provider.name", provider.to_string());
        span.set_attribute("gen_ai.request.model", model_id.to_string());

        Self {
            span,
            settings: RequestSettings::of(input),
            usage: None,
            started: Instant::now(),
            closed: false,
        }
    }

    pub async fn instrument_future<F: Future>(&self, future: F) -> F::Output {
        future.instrument(self.span.clone()).await
    }

    pub fn record_result(&mut self, result: &LanguageModelResult<ModelResponse>) {
        match result {
            Ok(response) => self.usage.clone_from(&response.usage),
            Err(error) => {
                let message = error.to_string();
                self.span.set_attribute("exception.message", message.clone());
                self.span.set_status(Status::error(message));
            }
        }
    }

    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        if let Some(usage) = &self.usage {
            self.span
                .set_attribute("gen_ai.usage.input_tokens", i64::from(usage.input_tokens));
            self.span
                .set_attribute("gen_ai.usage.output_tokens", i64::from(usage.output_tokens));
        }
        self.settings.record(&self.span);
        self.span.set_attribute(
            "vynce_llm.duration_seconds",
            self.started.elapsed().as_secs_f64(),
        );
    }
}

impl Drop for LmSpan {
    fn drop(&mut self) {
        self.close();
    }
}

pub async fn trace_generate<F, Fut>(
    provider: &str,
    model_id: &str,
    input: LanguageModelInput,
    f: F,
) -> LanguageModelResult<ModelResponse>
where
    F: FnOnce(LanguageModelInput) -> Fut,
    Fut: Future<Output = LanguageModelResult<ModelResponse>>,
{
    let mut span = LmSpan::new(provider, model_id, &input);
    let result = span.instrument_future(f(input)).await;

    if let Err(error) = &result {
        tracing::warn!(provider, model_id, %error, "provider call failed");
    }
    span.record_result(&result);
    span.close();
    result
}
