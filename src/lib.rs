//! Scheduled availability prober.
//!
//! Repeatedly probes a fixed list of HTTP endpoints within a global time
//! budget, logging latency, unexpected statuses, timeouts and content-size
//! drift for every target in every batch.

pub mod config;
pub mod http_probe;
pub mod report;
pub mod scheduler;
