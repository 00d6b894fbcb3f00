//! Library entrypoint for stock-watch.
//!
//! The binary wires the production collaborators together; integration
//! tests under `tests/` drive the same monitor with fakes.

pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use config::{Config, Dispatch, Settings};
pub use error::{AlertError, ConfigError, DataError, PriceError};
pub use models::{AlertOutcome, Code, Direction, RunOutcome, Threshold, WatchEntry};
