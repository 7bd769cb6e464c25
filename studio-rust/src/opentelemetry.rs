use crate::{flows::UseCase, StudioResult};
use opentelemetry::trace::Status;
use std::{future::Future, time::Instant};
use tracing::{info_span, Span};
use tracing_futures::Instrument;
use tracing_opentelemetry::OpenTelemetrySpanExt;
use vynce_llm::ModelUsage;

pub struct FlowSpan {
    span: Span,
    usage: Option<ModelUsage>,
    start_time: Instant,
    ended: bool,
}

impl FlowSpan {
    pub fn new(use_case: UseCase) -> Self {
        let span = info_span!("vynce_studio.flow", use_case = %use_case);
        span.set_attribute("gen_ai.operation.name", "invoke_flow");
        span.set_attribute("vynce_studio.use_case", use_case.id());

        Self {
            span,
            usage: None,
            start_time: Instant::now(),
            ended: false,
        }
    }

    pub fn span(&self) -> Span {
        self.span.clone()
    }

    pub fn on_usage(&mut self, usage: Option<&ModelUsage>) {
        if let Some(usage) = usage {
            self.usage = Some(usage.clone());
        }
    }

    pub fn on_error(&mut self, error: &(dyn std::error::Error + 'static)) {
        self.span
            .set_attribute("exception.message", error.to_string());
        self.span.set_status(Status::error(error.to_string()));
    }

    pub fn on_end(&mut self) {
        if self.ended {
            return;
        }
        self.ended = true;

        if let Some(usage) = &self.usage {
            self.span
                .set_attribute("gen_ai.usage.input_tokens", i64::from(usage.input_tokens));
            self.span
                .set_attribute("gen_ai.usage.output_tokens", i64::from(usage.output_tokens));
        }
        self.span.set_attribute(
            "vynce_studio.duration_seconds",
            self.start_time.elapsed().as_secs_f64(),
        );
    }
}

impl Drop for FlowSpan {
    fn drop(&mut self) {
        self.on_end();
    }
}

/// Run one flow inside a `vynce_studio.flow` span. The future reports the
/// provider usage it observed alongside its result.
pub async fn trace_flow<T, Fut>(use_case: UseCase, future: Fut) -> StudioResult<T>
where
    Fut: Future<Output = (Option<ModelUsage>, StudioResult<T>)>,
{
    let mut span = FlowSpan::new(use_case);
    let (usage, result) = future.instrument(span.span()).await;
    span.on_usage(usage.as_ref());

    if let Err(error) = &result {
        span.on_error(error);
    }

    span.on_end();
    result
}
