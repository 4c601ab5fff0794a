use std::sync::Arc;

use anyhow::Context;
use log::{info, warn};

use webcheck::config::load_config;
use webcheck::http_probe::probe::Prober;
use webcheck::report::{LogReporter, logger::init_file_logger};
use webcheck::scheduler::{run_batch, run_until_exhausted};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app_config = load_config().context("failed to load configuration")?;
    init_file_logger(&app_config.log_file)?;

    let settings = app_config.settings;
    let durations = settings.durations;
    let targets: Arc<[_]> = settings.targets.into();

    if targets.is_empty() {
        warn!("No targets configured in {}", app_config.config_file.display());
    }

    let prober = Arc::new(
        Prober::new(Arc::new(LogReporter)).context("failed to create HTTP client")?,
    );

    println!(
        "\nRunning web check... \nTime estimated: {} seconds",
        durations.global().as_secs_f64()
    );

    let batches = run_until_exhausted(&durations, |_| {
        let prober = prober.clone();
        let targets = targets.clone();
        async move {
            run_batch(&prober, &targets, durations.request()).await;
        }
    })
    .await;

    info!("Run completed after {batches} batches");
    println!(
        "\nRun completed. \nResults: {}\n",
        app_config.log_file.display()
    );

    Ok(())
}
