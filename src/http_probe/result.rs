use std::time::Duration;

/// How a single probe ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeStatus {
    Success,
    Timeout,
    UnexpectedStatus(u16),
    OtherError(String),
}

/// The transient result of one fetch attempt. Only ever surfaced through the log.
#[derive(Debug, Clone)]
pub struct ProbeOutcome {
    pub url: String,
    pub elapsed: Duration,
    pub status: ProbeStatus,
    /// Observed minus expected body size, when a body was read.
    pub size_delta: Option<i64>,
}

impl ProbeOutcome {
    pub fn is_success(&self) -> bool {
        self.status == ProbeStatus::Success
    }
}
