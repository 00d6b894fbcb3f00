pub mod outcome;
pub mod watch;

pub use outcome::{AlertOutcome, RunOutcome};
pub use watch::{Code, Direction, Threshold, WatchEntry};
