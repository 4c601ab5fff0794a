use std::sync::Arc;
use std::time::Duration;

use log::debug;

use crate::config::ProbeTarget;
use crate::http_probe::prelude::*;
use crate::report::error_chain;

/// Probe every target concurrently and wait until all of them have reported.
///
/// Outcomes come back in target order, whatever order the probes finished in.
pub async fn run_batch(
    prober: &Arc<Prober>,
    targets: &[ProbeTarget],
    request_timeout: Duration,
) -> Vec<ProbeOutcome> {
    let mut handles = vec![];

    for target in targets {
        let prober = prober.clone();
        let target = target.clone();

        let handle = tokio::spawn(async move { probe_target(&prober, &target, request_timeout).await });
        handles.push(handle);
    }

    let mut outcomes = Vec::with_capacity(handles.len());
    for (handle, target) in handles.into_iter().zip(targets) {
        match handle.await {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => {
                let cause = error_chain(&e);
                prober
                    .reporter()
                    .error(format!("Probe task for {} aborted: {cause}", target.url));
                outcomes.push(ProbeOutcome {
                    url: target.url.clone(),
                    elapsed: Duration::ZERO,
                    status: ProbeStatus::OtherError(cause),
                    size_delta: None,
                });
            }
        }
    }

    let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
    let drifted = outcomes
        .iter()
        .filter(|o| o.size_delta.is_some_and(|d| d != 0))
        .count();
    let slowest = outcomes.iter().map(|o| o.elapsed).max().unwrap_or_default();
    debug!(
        "batch finished: {succeeded} succeeded, {} failed, {drifted} drifted, slowest {:.3}s",
        outcomes.len() - succeeded,
        slowest.as_secs_f64()
    );

    outcomes
}
