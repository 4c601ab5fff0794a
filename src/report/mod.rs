//! Log records emitted by the probing core.
//!
//! The probing code never writes to a sink directly: it hands each record to a
//! [`Reporter`]. In production that is [`LogReporter`], which forwards to the
//! `log` facade set up by [`logger::init_file_logger`].

use std::fmt::Write;
use std::time::Duration;

use log::Level;

pub mod logger;

const PROBE_LOG_TARGET: &str = "webcheck::probe";

/// Receives the one-line records produced for every probe.
pub trait Reporter: Send + Sync {
    fn record(&self, level: Level, message: String);

    fn info(&self, message: String) {
        self.record(Level::Info, message);
    }

    fn warn(&self, message: String) {
        self.record(Level::Warn, message);
    }

    fn error(&self, message: String) {
        self.record(Level::Error, message);
    }
}

/// Forwards records to whatever logger is installed behind the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn record(&self, level: Level, message: String) {
        log::log!(target: PROBE_LOG_TARGET, level, "{message}");
    }
}

pub fn success_message(url: &str, elapsed: Duration, status: u16) -> String {
    format!(
        "{url} elapsed in {:.3} with status: {status}",
        elapsed.as_secs_f64()
    )
}

pub fn size_drift_message(url: &str, expected: u64, actual: u64) -> String {
    format!("Content size for {url} changed from {expected} to {actual} bytes")
}

pub fn timeout_message(url: &str) -> String {
    format!("Timeout occurred for {url}")
}

pub fn unexpected_status_message(url: &str, status: u16) -> String {
    format!("{url} got unexpected status: {status}")
}

pub fn failure_message(url: &str, err: &(dyn std::error::Error + 'static)) -> String {
    format!("Request to {url} failed: {}", error_chain(err))
}

/// Flattens an error and its sources into a single line.
pub fn error_chain(mut err: &(dyn std::error::Error + 'static)) -> String {
    let mut s = format!("{}", err);
    while let Some(src) = err.source() {
        let _ = write!(s, ": {}", src);
        err = src;
    }
    s
}
