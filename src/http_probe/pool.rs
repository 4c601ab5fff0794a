use reqwest::Client;
use tokio::sync::{Semaphore, SemaphorePermit};

use super::error::ProbeError;

/// Maximum number of probes allowed on the network at once.
pub const CONCURRENCY_LIMIT: usize = 10;

const USER_AGENT: &str = concat!("webcheck/", env!("CARGO_PKG_VERSION"));

/// A shared HTTP client whose outbound requests are capped by a slot count.
/// Callers over the limit wait in FIFO order until a slot is released.
pub struct ConnectionPool {
    client: Client,
    slots: Semaphore,
    limit: usize,
}

impl ConnectionPool {
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_limit(CONCURRENCY_LIMIT)
    }

    pub fn with_limit(limit: usize) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .pool_max_idle_per_host(limit)
            .build()?;

        Ok(Self {
            client,
            slots: Semaphore::new(limit),
            limit,
        })
    }

    /// Wait for a free slot. The slot is held until the returned permit is dropped.
    pub async fn acquire(&self) -> Result<SemaphorePermit<'_>, ProbeError> {
        self.slots.acquire().await.map_err(|_| ProbeError::PoolClosed)
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn available(&self) -> usize {
        self.slots.available_permits()
    }
}
