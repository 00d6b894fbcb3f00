pub mod alert_monitor;
pub mod event_log;
pub mod kabutan;
pub mod line;
pub mod watch_list;

pub use alert_monitor::AlertMonitor;
pub use event_log::{EventLog, TracingLog};
pub use kabutan::{KabutanClient, PriceSource};
pub use line::{LineNotifier, Notifier};
pub use watch_list::{CsvWatchList, WatchList};
