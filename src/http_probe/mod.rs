pub mod error;
pub mod pool;
pub mod probe;
pub mod result;
pub mod trace;

pub mod prelude {
    pub use super::error::ProbeError;
    pub use super::pool::{CONCURRENCY_LIMIT, ConnectionPool};
    pub use super::probe::{Prober, probe_target};
    pub use super::result::{ProbeOutcome, ProbeStatus};
    pub use super::trace::{LatencyTracer, TraceContext, TraceOutcome};
}
