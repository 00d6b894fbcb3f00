use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// How triggered alerts are delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// One aggregated message per group.
    Grouped,
    /// One message per triggered code, sent as soon as it triggers.
    PerCode,
}

impl Dispatch {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "grouped" => Some(Dispatch::Grouped),
            "per-code" | "per_code" => Some(Dispatch::PerCode),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub config_path: PathBuf,
    pub watch_list_path: PathBuf,
    pub log_path: PathBuf,
    pub dispatch: Dispatch,
}

pub fn load() -> Settings {
    // Loads .env if present (no crash if missing)
    dotenvy::dotenv().ok();

    let config_path = env::var("STOCK_WATCH_CONFIG")
        .unwrap_or_else(|_| "config/config.env".to_string());

    let watch_list_path = env::var("STOCK_WATCH_WATCH_LIST")
        .unwrap_or_else(|_| "config/alert.csv".to_string());

    let log_path = env::var("STOCK_WATCH_LOG_FILE")
        .unwrap_or_else(|_| "stock.log".to_string());

    let dispatch = env::var("STOCK_WATCH_DISPATCH")
        .ok()
        .and_then(|s| Dispatch::parse(&s))
        .unwrap_or(Dispatch::Grouped);

    Settings {
        config_path: config_path.into(),
        watch_list_path: watch_list_path.into(),
        log_path: log_path.into(),
        dispatch,
    }
}

/// Credentials for the push endpoint, read from a `KEY=value` file.
#[derive(Debug, Clone)]
pub struct Config {
    values: HashMap<String, String>,
}

impl Config {
    pub const USER_ID: &'static str = "user_id";
    pub const CHANNEL_ACCESS_TOKEN: &'static str = "channel_access_token";

    pub fn open(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::MissingFile(path.to_path_buf()));
        }

        let mut values = HashMap::new();
        for item in dotenvy::from_path_iter(path)? {
            let (key, value) = item?;
            values.insert(key, value);
        }

        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Result<&str, ConfigError> {
        self.values
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| ConfigError::MissingKey(key.to_string()))
    }

    pub fn user_id(&self) -> Result<&str, ConfigError> {
        self.get(Self::USER_ID)
    }

    pub fn channel_access_token(&self) -> Result<&str, ConfigError> {
        self.get(Self::CHANNEL_ACCESS_TOKEN)
    }
}
