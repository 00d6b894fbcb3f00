use std::process::ExitCode;

use anyhow::Context;

use stock_watch::config::{self, Config};
use stock_watch::services::{
    AlertMonitor, CsvWatchList, KabutanClient, LineNotifier, TracingLog, event_log,
};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let settings = config::load();

    event_log::init(&settings.log_path)
        .with_context(|| format!("cannot open log file {}", settings.log_path.display()))?;

    let config = Config::open(&settings.config_path).inspect_err(|e| tracing::error!("{e}"))?;
    let notifier = LineNotifier::from_config(&config).inspect_err(|e| tracing::error!("{e}"))?;
    let watch_list =
        CsvWatchList::open(&settings.watch_list_path).inspect_err(|e| tracing::error!("{e}"))?;

    let monitor = AlertMonitor::new(watch_list, KabutanClient::new(), notifier, TracingLog);

    tracing::info!(dispatch = ?settings.dispatch, "stock check started");
    let outcome = monitor.run(settings.dispatch).await;

    if outcome.is_completed() {
        Ok(ExitCode::SUCCESS)
    } else {
        tracing::error!("stock check aborted");
        Ok(ExitCode::FAILURE)
    }
}
