use std::sync::Arc;
use std::time::Duration;

use reqwest::{Response, StatusCode};
use tokio::time::Instant;

use crate::report::{Reporter, success_message};

/// Per-request scratch state. Consumed by [`LatencyTracer::end`], so each
/// request gets exactly one start/end pair.
#[derive(Debug)]
pub struct TraceContext {
    start: Instant,
}

/// What the end hook saw. A non-200 status is handed back to the caller
/// instead of being logged here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceOutcome {
    Success { elapsed: Duration },
    UnexpectedStatus { elapsed: Duration, status: u16 },
}

/// Measures time to response head and classifies the status.
#[derive(Clone)]
pub struct LatencyTracer {
    reporter: Arc<dyn Reporter>,
}

impl LatencyTracer {
    pub fn new(reporter: Arc<dyn Reporter>) -> Self {
        Self { reporter }
    }

    pub fn start(&self) -> TraceContext {
        TraceContext {
            start: Instant::now(),
        }
    }

    pub fn end(&self, ctx: TraceContext, response: &Response) -> TraceOutcome {
        self.finish(ctx, response.url().as_str(), response.status())
    }

    fn finish(&self, ctx: TraceContext, url: &str, status: StatusCode) -> TraceOutcome {
        let elapsed = ctx.start.elapsed();

        if status == StatusCode::OK {
            self.reporter
                .info(success_message(url, elapsed, status.as_u16()));
            return TraceOutcome::Success { elapsed };
        }

        TraceOutcome::UnexpectedStatus {
            elapsed,
            status: status.as_u16(),
        }
    }
}
