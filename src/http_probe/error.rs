use std::time::Duration;

use thiserror::Error;

/// Why a single probe did not complete cleanly.
/// These never escape the probe runner; each one ends up as a log record.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("no response within {0:?}")]
    Timeout(Duration),

    #[error("{url} got unexpected status: {status}")]
    UnexpectedStatus {
        url: String,
        status: u16,
        elapsed: Duration,
    },

    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// Only reachable if the pool's semaphore is closed, which `ConnectionPool` never does.
    #[error("connection pool is closed")]
    PoolClosed,
}
