//! Environment variable-based configuration overrides

use super::logging_config::LogFormat;
use super::model::KeelConfig;
use crate::error::ConfigError;
use humantime_serde::re::humantime;
use std::time::Duration;

pub const LOG_LEVEL: &str = "KEEL_LOG_LEVEL";
pub const LOG_FORMAT: &str = "KEEL_LOG_FORMAT";
pub const SHUTDOWN_CHANNEL_CAPACITY: &str = "KEEL_SHUTDOWN_CHANNEL_CAPACITY";
pub const SCOPED_LISTENERS: &str = "KEEL_SCOPED_LISTENERS";
pub const AGENT_HEARTBEAT: &str = "KEEL_AGENT_HEARTBEAT";
pub const AGENT_GRACEFUL_TIMEOUT: &str = "KEEL_AGENT_GRACEFUL_TIMEOUT";
pub const WATCH_RECURSIVE: &str = "KEEL_WATCH_RECURSIVE";

/// Apply overrides from the process environment
pub fn apply_env(config: &mut KeelConfig) -> Result<(), ConfigError> {
    apply_vars(config, std::env::vars())
}

/// Apply `KEEL_*` overrides from arbitrary key/value pairs.
///
/// Unknown keys are ignored; known keys with unusable values fail.
pub fn apply_vars<I, K, V>(config: &mut KeelConfig, vars: I) -> Result<(), ConfigError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    for (key, value) in vars {
        let (key, value) = (key.as_ref(), value.as_ref().trim());
        match key {
            LOG_LEVEL => config.logging.level = value.to_string(),
            LOG_FORMAT => {
                config.logging.format = value
                    .parse::<LogFormat>()
                    .map_err(|e| ConfigError::env(key, e))?;
            }
            SHUTDOWN_CHANNEL_CAPACITY => {
                config.shutdown.channel_capacity = value
                    .parse()
                    .map_err(|_| ConfigError::env(key, format!("'{value}' is not a number")))?;
            }
            SCOPED_LISTENERS => config.shutdown.scoped_listeners = parse_bool(key, value)?,
            AGENT_HEARTBEAT => config.agent.heartbeat_interval = parse_duration(key, value)?,
            AGENT_GRACEFUL_TIMEOUT => config.agent.graceful_timeout = parse_duration(key, value)?,
            WATCH_RECURSIVE => config.watch.recursive = parse_bool(key, value)?,
            _ => {}
        }
    }
    Ok(())
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::env(key, format!("'{value}' is not a boolean"))),
    }
}

fn parse_duration(key: &str, value: &str) -> Result<Duration, ConfigError> {
    humantime::parse_duration(value).map_err(|e| ConfigError::env(key, e.to_string()))
}
