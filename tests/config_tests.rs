use std::io::Write;

use stock_watch::config::{Config, Dispatch};
use stock_watch::ConfigError;
use stock_watch::services::LineNotifier;

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn missing_file_fails_on_open() {
    let err = Config::open("config_not_existing.env").unwrap_err();

    assert!(matches!(err, ConfigError::MissingFile(_)));
    assert_eq!(err.to_string(), "config file not found: config_not_existing.env");
}

#[test]
fn reads_user_id() {
    let config = Config::open(fixture("config.env")).unwrap();
    assert_eq!(config.user_id().unwrap(), "uuuu_iii_ddd");
}

#[test]
fn reads_channel_access_token() {
    let config = Config::open(fixture("config.env")).unwrap();
    assert_eq!(config.channel_access_token().unwrap(), "9432jdf912");
}

#[test]
fn missing_user_id_names_the_key() {
    let config = Config::open(fixture("config_empty.env")).unwrap();
    let err = config.user_id().unwrap_err();

    assert!(matches!(err, ConfigError::MissingKey(ref k) if k == "user_id"));
    assert_eq!(err.to_string(), "config key is missing: user_id");
}

#[test]
fn missing_channel_access_token_names_the_key() {
    let config = Config::open(fixture("config_empty.env")).unwrap();
    let err = config.channel_access_token().unwrap_err();

    assert_eq!(err.to_string(), "config key is missing: channel_access_token");
}

#[test]
fn notifier_needs_both_keys() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "user_id=someone").unwrap();

    let config = Config::open(file.path()).unwrap();
    let err = LineNotifier::from_config(&config).err().unwrap();
    assert!(matches!(err, ConfigError::MissingKey(ref k) if k == "channel_access_token"));
}

#[test]
fn quoted_values_are_unquoted() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "user_id=\"U123\"").unwrap();
    writeln!(file, "channel_access_token='tok en'").unwrap();

    let config = Config::open(file.path()).unwrap();
    assert_eq!(config.user_id().unwrap(), "U123");
    assert_eq!(config.channel_access_token().unwrap(), "tok en");
}

#[test]
fn dispatch_parsing() {
    assert_eq!(Dispatch::parse("grouped"), Some(Dispatch::Grouped));
    assert_eq!(Dispatch::parse(" Per-Code "), Some(Dispatch::PerCode));
    assert_eq!(Dispatch::parse("per_code"), Some(Dispatch::PerCode));
    assert_eq!(Dispatch::parse("batch"), None);
}
