use std::path::PathBuf;

use thiserror::Error;

use crate::models::Code;

/// The watch list is unreadable, malformed, or missing a code.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("watch list could not be read: {0}")]
    Unreadable(String),

    #[error("watch-list code {0:?} is not an integer")]
    InvalidCode(String),

    #[error("no watch-list entry for code: {0}")]
    NotFound(Code),

    #[error("duplicate watch-list entries for code: {0}")]
    Duplicate(Code),

    #[error("unrecognized trigger {trigger:?} for code: {code}")]
    InvalidTrigger { code: Code, trigger: String },

    #[error("threshold price {price:?} is not a non-negative integer for code: {code}")]
    InvalidPrice { code: Code, price: String },
}

impl DataError {
    /// The code the error refers to, if it is about a single entry.
    pub fn code(&self) -> Option<Code> {
        match self {
            DataError::Unreadable(_) | DataError::InvalidCode(_) => None,
            DataError::NotFound(code) | DataError::Duplicate(code) => Some(*code),
            DataError::InvalidTrigger { code, .. } | DataError::InvalidPrice { code, .. } => {
                Some(*code)
            }
        }
    }
}

/// Fetching or extracting the current price of one code failed.
#[derive(Debug, Error)]
pub enum PriceError {
    #[error("price request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("price page returned status {0}")]
    Status(u16),

    #[error("price pattern is invalid: {0}")]
    Pattern(regex::Error),

    #[error("price element not found in page")]
    MissingElement,

    #[error("price text {text:?} is not a number: {source}")]
    Parse {
        text: String,
        #[source]
        source: rust_decimal::Error,
    },
}

/// The notification push was not accepted.
#[derive(Debug, Error)]
pub enum AlertError {
    #[error("api error: status_code => {status_code} message => {message}")]
    Api { status_code: u16, message: String },

    #[error("push request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("config file could not be parsed: {0}")]
    Parse(#[from] dotenvy::Error),

    #[error("config key is missing: {0}")]
    MissingKey(String),
}
