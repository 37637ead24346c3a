// SPDX-License-Identifier: GPL-3.0-only
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info, warn};

use smb_notifier::cli::Cli;
use smb_notifier::config::Config;
use smb_notifier::logging::setup_logging;
use smb_notifier::{ConsoleHandler, MountedShareLister, Notifier};

/// How long shutdown waits for an in-flight tick
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_or_exit();

    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(run(cli));

    // A read on a stale mount runs on a blocking thread that cannot be
    // cancelled; do not wait for it forever.
    runtime.shutdown_timeout(SHUTDOWN_GRACE);
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Load configuration
    let config = Config::load()?;

    // Initialize logging
    setup_logging(&config.log_level, config.log_format)?;

    info!("Starting smb-notifier v{}", env!("CARGO_PKG_VERSION"));

    let interval = cli
        .interval_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| config.poll_interval());

    let lister = MountedShareLister::new(config.mount_root.clone()).with_timeout(config.list_timeout());
    let notifier = Notifier::builder()
        .target(cli.url.clone())
        .credentials(cli.credentials())
        .handler(Arc::new(ConsoleHandler::new()))
        .connect(&lister)
        .await?;

    notifier.start(interval)?;
    info!(
        url = %notifier.target(),
        interval_ms = interval.as_millis() as u64,
        "Watching directory. Press Ctrl+C to stop."
    );

    // Wait for shutdown signal
    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Received shutdown signal (Ctrl+C)");
        }
        Err(err) => {
            error!(error = %err, "Unable to listen for shutdown signal");
        }
    }

    notifier.stop();
    if !notifier.join_timeout(SHUTDOWN_GRACE).await {
        warn!(grace_ms = SHUTDOWN_GRACE.as_millis() as u64, "Poll loop did not finish in time, abandoning it");
    }

    info!("Shutdown complete");
    Ok(())
}
