use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use super::prelude::*;
use crate::config::ProbeTarget;
use crate::report::{
    Reporter, error_chain, failure_message, size_drift_message, timeout_message,
    unexpected_status_message,
};

/// The state shared by every probe in a run: one connection pool, one tracer
/// configuration and the reporter both of them write to.
pub struct Prober {
    pool: ConnectionPool,
    tracer: LatencyTracer,
    reporter: Arc<dyn Reporter>,
}

impl Prober {
    pub fn new(reporter: Arc<dyn Reporter>) -> Result<Self, reqwest::Error> {
        Ok(Self::with_pool(ConnectionPool::new()?, reporter))
    }

    pub fn with_pool(pool: ConnectionPool, reporter: Arc<dyn Reporter>) -> Self {
        Self {
            pool,
            tracer: LatencyTracer::new(reporter.clone()),
            reporter,
        }
    }

    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    pub fn reporter(&self) -> &dyn Reporter {
        self.reporter.as_ref()
    }
}

struct Fetched {
    url: String,
    elapsed: Duration,
    size: u64,
}

async fn fetch(prober: &Prober, target: &ProbeTarget) -> Result<Fetched, ProbeError> {
    // Latency includes the wait for a slot; the slot stays taken until the body has been read.
    let trace = prober.tracer.start();
    let _slot = prober.pool.acquire().await?;

    let response = prober.pool.client().get(&target.url).send().await?;

    let elapsed = match prober.tracer.end(trace, &response) {
        TraceOutcome::Success { elapsed } => elapsed,
        TraceOutcome::UnexpectedStatus { elapsed, status } => {
            return Err(ProbeError::UnexpectedStatus {
                url: response.url().to_string(),
                status,
                elapsed,
            });
        }
    };

    let url = response.url().to_string();
    let body = response.bytes().await?;

    Ok(Fetched {
        url,
        elapsed,
        size: body.len() as u64,
    })
}

/// Probe one target within `timeout` and log how it went.
///
/// The timeout covers waiting for a pool slot, the request and the body read.
/// Every path ends in at least one record on the prober's reporter; nothing is
/// returned as an error.
pub async fn probe_target(prober: &Prober, target: &ProbeTarget, timeout: Duration) -> ProbeOutcome {
    let started = Instant::now();
    let result = match tokio::time::timeout(timeout, fetch(prober, target)).await {
        Ok(result) => result,
        Err(_) => Err(ProbeError::Timeout(timeout)),
    };

    let reporter = prober.reporter();
    let outcome = |elapsed: Duration, status: ProbeStatus, delta: Option<i64>| ProbeOutcome {
        url: target.url.clone(),
        elapsed,
        status,
        size_delta: delta,
    };

    match result {
        Ok(fetched) => {
            let expected = target.expected_content_size;
            if fetched.size != expected {
                reporter.warn(size_drift_message(&fetched.url, expected, fetched.size));
            }
            let delta = size_delta(fetched.size, expected);
            outcome(fetched.elapsed, ProbeStatus::Success, Some(delta))
        }
        Err(ProbeError::UnexpectedStatus {
            url,
            status,
            elapsed,
        }) => {
            reporter.error(unexpected_status_message(&url, status));
            outcome(elapsed, ProbeStatus::UnexpectedStatus(status), None)
        }
        Err(ProbeError::Timeout(_)) => {
            reporter.error(timeout_message(&target.url));
            outcome(started.elapsed(), ProbeStatus::Timeout, None)
        }
        Err(err) => {
            reporter.error(failure_message(&target.url, &err));
            outcome(started.elapsed(), ProbeStatus::OtherError(error_chain(&err)), None)
        }
    }
}

/// Observed minus expected size, clamped to the `i64` range.
fn size_delta(actual: u64, expected: u64) -> i64 {
    let delta = i128::from(actual) - i128::from(expected);
    i64::try_from(delta).unwrap_or(if delta > 0 { i64::MAX } else { i64::MIN })
}

#[cfg(test)]
mod tests {
    use log::Level;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::report::testing::RecordingReporter;

    const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

    fn prober() -> (Prober, Arc<RecordingReporter>) {
        let reporter = Arc::new(RecordingReporter::default());
        let prober = Prober::new(reporter.clone()).expect("client builds");
        (prober, reporter)
    }

    async fn serve(server: &MockServer, route: &str, response: ResponseTemplate) -> ProbeTarget {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(response)
            .mount(server)
            .await;

        ProbeTarget {
            url: format!("{}{route}", server.uri()),
            expected_content_size: 100,
        }
    }

    #[tokio::test]
    async fn test_matching_size_logs_only_info() {
        let server = MockServer::start().await;
        let target = serve(
            &server,
            "/health",
            ResponseTemplate::new(200).set_body_bytes(vec![b'a'; 100]),
        )
        .await;
        let (prober, reporter) = prober();

        let outcome = probe_target(&prober, &target, REQUEST_TIMEOUT).await;

        assert!(outcome.is_success());
        assert_eq!(outcome.size_delta, Some(0));
        let info = reporter.at(Level::Info);
        assert_eq!(info.len(), 1);
        assert!(info[0].starts_with(&format!("{} elapsed in ", target.url)));
        assert!(info[0].ends_with("with status: 200"));
        assert_eq!(reporter.records().len(), 1);
    }

    #[tokio::test]
    async fn test_size_drift_logs_info_and_warning() {
        let server = MockServer::start().await;
        let target = serve(
            &server,
            "/health",
            ResponseTemplate::new(200).set_body_bytes(vec![b'a'; 120]),
        )
        .await;
        let (prober, reporter) = prober();

        let outcome = probe_target(&prober, &target, REQUEST_TIMEOUT).await;

        assert!(outcome.is_success());
        assert_eq!(outcome.size_delta, Some(20));
        assert_eq!(reporter.at(Level::Info).len(), 1);
        assert_eq!(
            reporter.at(Level::Warn),
            vec![format!(
                "Content size for {} changed from 100 to 120 bytes",
                target.url
            )]
        );
        assert!(reporter.at(Level::Error).is_empty());
    }

    #[tokio::test]
    async fn test_server_error_logs_only_error() {
        let server = MockServer::start().await;
        let target = serve(&server, "/health", ResponseTemplate::new(500)).await;
        let (prober, reporter) = prober();

        let outcome = probe_target(&prober, &target, REQUEST_TIMEOUT).await;

        assert_eq!(outcome.status, ProbeStatus::UnexpectedStatus(500));
        assert_eq!(outcome.size_delta, None);
        assert!(reporter.at(Level::Info).is_empty());
        assert!(reporter.at(Level::Warn).is_empty());
        assert_eq!(
            reporter.at(Level::Error),
            vec![format!("{} got unexpected status: 500", target.url)]
        );
    }

    #[tokio::test]
    async fn test_slow_server_logs_timeout() {
        let server = MockServer::start().await;
        let target = serve(
            &server,
            "/slow",
            ResponseTemplate::new(200)
                .set_body_bytes(vec![b'a'; 100])
                .set_delay(Duration::from_secs(3)),
        )
        .await;
        let (prober, reporter) = prober();

        let outcome = probe_target(&prober, &target, Duration::from_millis(200)).await;

        assert_eq!(outcome.status, ProbeStatus::Timeout);
        assert!(outcome.elapsed < Duration::from_secs(3));
        assert_eq!(
            reporter.records(),
            vec![(Level::Error, format!("Timeout occurred for {}", target.url))]
        );
    }

    #[tokio::test]
    async fn test_connection_failure_logs_error() {
        // Nothing listens on the discard port.
        let target = ProbeTarget {
            url: "http://127.0.0.1:9/".to_string(),
            expected_content_size: 100,
        };
        let (prober, reporter) = prober();

        let outcome = probe_target(&prober, &target, REQUEST_TIMEOUT).await;

        assert!(matches!(outcome.status, ProbeStatus::OtherError(_)));
        let errors = reporter.at(Level::Error);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("Request to http://127.0.0.1:9/ failed: "));
        assert_eq!(reporter.records().len(), 1);
    }

    #[tokio::test]
    async fn test_latency_includes_wait_for_slot() {
        let server = MockServer::start().await;
        let target = serve(
            &server,
            "/health",
            ResponseTemplate::new(200).set_body_bytes(vec![b'a'; 100]),
        )
        .await;
        let reporter = Arc::new(RecordingReporter::default());
        let pool = ConnectionPool::with_limit(1).expect("client builds");
        let prober = Prober::with_pool(pool, reporter.clone());

        let held = prober.pool().acquire().await.expect("pool open");
        let (outcome, ()) = tokio::join!(probe_target(&prober, &target, REQUEST_TIMEOUT), async {
            tokio::time::sleep(Duration::from_millis(500)).await;
            drop(held);
        });

        assert!(outcome.is_success());
        assert!(outcome.elapsed >= Duration::from_millis(500));
        assert_eq!(reporter.at(Level::Info).len(), 1);
    }

    #[tokio::test]
    async fn test_truncated_body_logs_info_then_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind listener");
        let url = format!("http://{}/", listener.local_addr().expect("local addr"));
        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut request = [0u8; 1024];
                let _ = socket.read(&mut request).await;
                let _ = socket
                    .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 100\r\n\r\nshort")
                    .await;
                let _ = socket.shutdown().await;
            }
        });
        let target = ProbeTarget {
            url: url.clone(),
            expected_content_size: 100,
        };
        let (prober, reporter) = prober();

        let outcome = probe_target(&prober, &target, REQUEST_TIMEOUT).await;

        assert!(matches!(outcome.status, ProbeStatus::OtherError(_)));
        assert_eq!(reporter.at(Level::Info).len(), 1);
        assert!(reporter.at(Level::Warn).is_empty());
        let errors = reporter.at(Level::Error);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with(&format!("Request to {url} failed:")));
    }

    #[test]
    fn test_size_delta_saturates() {
        assert_eq!(size_delta(120, 100), 20);
        assert_eq!(size_delta(100, 120), -20);
        assert_eq!(size_delta(u64::MAX, 0), i64::MAX);
        assert_eq!(size_delta(0, u64::MAX), i64::MIN);
    }

    #[tokio::test]
    async fn test_repeated_probes_are_independent() {
        let server = MockServer::start().await;
        let target = serve(
            &server,
            "/health",
            ResponseTemplate::new(200).set_body_bytes(vec![b'a'; 100]),
        )
        .await;
        let (prober, reporter) = prober();

        let first = probe_target(&prober, &target, REQUEST_TIMEOUT).await;
        let second = probe_target(&prober, &target, REQUEST_TIMEOUT).await;

        assert!(first.is_success() && second.is_success());
        assert_eq!(reporter.at(Level::Info).len(), 2);
        assert_eq!(prober.pool().available(), CONCURRENCY_LIMIT);
    }
}
