use super::*;
use crate::config::LogFormat;
use crate::error::ConfigError;
use std::collections::HashMap;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

fn overrides(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_empty_loader_returns_defaults() {
    let config = ConfigLoader::new().load().unwrap();
    assert_eq!(config, crate::config::KeelConfig::default());
}

#[test]
fn test_overrides_apply_on_top_of_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(
        &path,
        "[logging]\nlevel = \"info\"\nformat = \"compact\"\n[agent]\nheartbeat_interval = \"10s\"\n",
    )
    .unwrap();

    let config = ConfigLoader::new()
        .with_defaults()
        .with_file(&path)
        .with_overrides(overrides(&[("KEEL_LOG_LEVEL", "debug")]))
        .load()
        .unwrap();

    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, LogFormat::Compact);
    assert_eq!(config.agent.heartbeat_interval, Duration::from_secs(10));
}

#[test]
fn test_later_file_replaces_earlier_overrides() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(&path, "[watch]\nrecursive = true\n").unwrap();

    let config = ConfigLoader::new()
        .with_overrides(overrides(&[("KEEL_SHUTDOWN_CHANNEL_CAPACITY", "4")]))
        .with_file(&path)
        .load()
        .unwrap();

    assert!(config.watch.recursive);
    assert_eq!(config.shutdown.channel_capacity, 1);
}

#[test]
fn test_missing_file_is_not_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let config = ConfigLoader::new()
        .with_defaults()
        .with_file(temp_dir.path().join("nope.toml"))
        .load()
        .unwrap();
    assert_eq!(config.shutdown.channel_capacity, 1);
}

#[test]
fn test_invalid_merge_fails_validation() {
    let result = ConfigLoader::new()
        .with_defaults()
        .with_overrides(overrides(&[("KEEL_SHUTDOWN_CHANNEL_CAPACITY", "0")]))
        .load();
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}
