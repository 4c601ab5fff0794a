use std::future::Future;

use log::debug;
use tokio::time::sleep;

use crate::config::DurationConfig;

/// Run batches until the global budget is spent.
///
/// After each batch the remaining budget shrinks by one interval and the loop
/// pauses for that interval, including after the last batch. A budget that is
/// not a multiple of the interval therefore overruns by up to one interval.
/// Returns the number of batches run.
pub async fn run_until_exhausted<F, Fut>(durations: &DurationConfig, mut run_batch: F) -> u32
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = ()>,
{
    let mut remaining = durations.global();
    let mut batches = 0;

    while !remaining.is_zero() {
        batches += 1;
        run_batch(batches).await;

        remaining = remaining.saturating_sub(durations.interval());
        debug!("batch {batches} done, {:.3}s of budget left", remaining.as_secs_f64());

        sleep(durations.interval()).await;
    }

    batches
}
