use crate::config::Dispatch;
use crate::models::{AlertOutcome, Code, RunOutcome};
use crate::services::event_log::EventLog;
use crate::services::kabutan::PriceSource;
use crate::services::line::Notifier;
use crate::services::watch_list::WatchList;

pub const END_MESSAGE: &str = "Stock price check completed.";
pub const FAIL_GET_CODES: &str = "Failed to load watch-list codes.";
pub const NO_TARGETS: &str = "No alert targets.";

/// One pass over the watch list: fetch, compare, notify.
///
/// Failures are isolated per code. A failed price fetch or an unusable
/// watch-list row sends that code's failure message right away and the
/// pass moves on. Delivery failures are logged and never abort the pass.
/// Only a watch list that cannot list its codes ends the run early.
pub struct AlertMonitor<W, P, N, L> {
    watch_list: W,
    prices: P,
    notifier: N,
    log: L,
}

impl<W, P, N, L> AlertMonitor<W, P, N, L>
where
    W: WatchList,
    P: PriceSource,
    N: Notifier,
    L: EventLog,
{
    pub fn new(watch_list: W, prices: P, notifier: N, log: L) -> Self {
        Self {
            watch_list,
            prices,
            notifier,
            log,
        }
    }

    pub async fn run(&self, dispatch: Dispatch) -> RunOutcome {
        match dispatch {
            Dispatch::Grouped => self.run_grouped().await,
            Dispatch::PerCode => self.run_per_code().await,
        }
    }

    /// One aggregated notification per group, then the completion message.
    pub async fn run_grouped(&self) -> RunOutcome {
        let groups = match self.watch_list.grouped_codes() {
            Ok(groups) => groups,
            Err(e) => return self.abort(&e).await,
        };

        let mut outcomes = Vec::new();
        for group in groups {
            let mut messages = Vec::new();

            for code in group {
                let (outcome, message) = self.check(code).await;
                messages.extend(message);
                outcomes.push(outcome);
            }

            let text = if messages.is_empty() {
                NO_TARGETS.to_string()
            } else {
                messages.join("\n")
            };
            self.send_message(&text).await;
        }

        self.finish(outcomes).await
    }

    /// Every triggered code is notified on its own as soon as it triggers.
    pub async fn run_per_code(&self) -> RunOutcome {
        let codes = match self.watch_list.distinct_codes() {
            Ok(codes) => codes,
            Err(e) => return self.abort(&e).await,
        };

        let mut outcomes = Vec::with_capacity(codes.len());
        for code in codes {
            let (outcome, message) = self.check(code).await;
            if let Some(message) = message {
                self.send_message(&message).await;
            }
            outcomes.push(outcome);
        }

        self.finish(outcomes).await
    }

    /// Fetch the price and compare it with the code's threshold. Returns the
    /// alert text when triggered; failure messages are sent from here.
    async fn check(&self, code: Code) -> (AlertOutcome, Option<String>) {
        let price = match self.prices.fetch(code).await {
            Ok(price) => price,
            Err(e) => {
                tracing::warn!(code, error = %e, "price fetch failed");
                self.fail(code).await;
                return (AlertOutcome::FetchFailed(code), None);
            }
        };

        let threshold = match self.watch_list.threshold_predicate(code) {
            Ok(threshold) => threshold,
            Err(e) => {
                self.log.error(&e.to_string());
                self.fail(code).await;
                return (AlertOutcome::DataInvalid(code), None);
            }
        };

        if !threshold.is_triggered(price) {
            tracing::debug!(code, %price, threshold = %threshold.price, "not triggered");
            return (AlertOutcome::NotTriggered(code), None);
        }

        match self.watch_list.build_success_message(code) {
            Ok(message) => {
                tracing::info!(code, %price, direction = %threshold.direction, "triggered");
                (AlertOutcome::Triggered(code), Some(message))
            }
            Err(e) => {
                self.log.error(&e.to_string());
                self.fail(code).await;
                (AlertOutcome::DataInvalid(code), None)
            }
        }
    }

    async fn fail(&self, code: Code) {
        let message = self.watch_list.build_failure_message(code);
        self.send_message(&message).await;
    }

    async fn abort(&self, err: &dyn std::error::Error) -> RunOutcome {
        self.log.error(&err.to_string());
        self.send_message(FAIL_GET_CODES).await;
        RunOutcome::Aborted
    }

    async fn finish(&self, outcomes: Vec<AlertOutcome>) -> RunOutcome {
        let triggered = outcomes.iter().filter(|o| o.is_triggered()).count();
        self.log.info(&format!(
            "checked {} codes, {} triggered",
            outcomes.len(),
            triggered
        ));

        self.send_message(END_MESSAGE).await;
        RunOutcome::Completed { outcomes }
    }

    async fn send_message(&self, text: &str) {
        if let Err(e) = self.notifier.send(text).await {
            self.log.exception(&e);
        }
    }
}
