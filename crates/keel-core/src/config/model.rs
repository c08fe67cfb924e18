//! Configuration model

use super::logging_config::LoggingConfig;
use crate::error::ConfigError;
use crate::shutdown::DEFAULT_CHANNEL_CAPACITY;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Top-level Keel configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeelConfig {
    pub logging: LoggingConfig,
    pub shutdown: ShutdownConfig,
    pub agent: AgentConfig,
    pub watch: WatchConfig,
}

/// Shutdown channel settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShutdownConfig {
    /// Buffer of each shutdown channel
    pub channel_capacity: usize,
    /// Tear listeners down when the dispatched command returns instead of
    /// leaving them for the rest of the process
    pub scoped_listeners: bool,
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            scoped_listeners: false,
        }
    }
}

/// Settings for the `agent` command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Interval between heartbeat lines
    #[serde(with = "humantime_serde")]
    pub heartbeat_interval: Duration,
    /// Upper bound on the drain after the first shutdown signal
    #[serde(with = "humantime_serde")]
    pub graceful_timeout: Duration,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            heartbeat_interval: Duration::from_secs(30),
            graceful_timeout: Duration::from_secs(5),
        }
    }
}

/// Settings for the `watch` command
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Watch subdirectories as well
    pub recursive: bool,
}

impl KeelConfig {
    /// Validate the merged configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.logging.validate()?;

        if self.shutdown.channel_capacity == 0 {
            return Err(ConfigError::invalid(
                "shutdown.channel_capacity must be at least 1",
            ));
        }
        if self.agent.heartbeat_interval.is_zero() {
            return Err(ConfigError::invalid(
                "agent.heartbeat_interval must be greater than zero",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = KeelConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.shutdown.channel_capacity, 1);
        assert!(!config.shutdown.scoped_listeners);
        assert_eq!(config.agent.heartbeat_interval, Duration::from_secs(30));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let mut config = KeelConfig::default();
        config.shutdown.channel_capacity = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_zero_heartbeat_rejected() {
        let mut config = KeelConfig::default();
        config.agent.heartbeat_interval = Duration::ZERO;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: KeelConfig = toml::from_str(
            r#"
            [agent]
            heartbeat_interval = "250ms"
            "#,
        )
        .unwrap();

        assert_eq!(config.agent.heartbeat_interval, Duration::from_millis(250));
        assert_eq!(config.agent.graceful_timeout, Duration::from_secs(5));
        assert_eq!(config.shutdown, ShutdownConfig::default());
    }
}
