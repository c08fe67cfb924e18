//! Configuration loader builder

use super::loading::apply_source;
use super::types::ConfigSource;
use crate::config::model::KeelConfig;
use crate::error::ConfigError;
use std::collections::HashMap;
use std::path::Path;

/// Configuration loader with support for multiple sources
#[derive(Debug, Default)]
pub struct ConfigLoader {
    sources: Vec<ConfigSource>,
}

impl ConfigLoader {
    /// Create a new config loader
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a configuration source
    pub fn add_source(mut self, source: ConfigSource) -> Self {
        self.sources.push(source);
        self
    }

    /// Add default configuration source
    pub fn with_defaults(self) -> Self {
        self.add_source(ConfigSource::Default)
    }

    /// Add a file source
    pub fn with_file<P: AsRef<Path>>(self, path: P) -> Self {
        self.add_source(ConfigSource::File(path.as_ref().to_path_buf()))
    }

    /// Add environment variables source
    pub fn with_env(self) -> Self {
        self.add_source(ConfigSource::Environment)
    }

    /// Add explicit `KEEL_*` overrides
    pub fn with_overrides(self, vars: HashMap<String, String>) -> Self {
        self.add_source(ConfigSource::Overrides(vars))
    }

    /// Load configuration from all sources
    pub fn load(self) -> Result<KeelConfig, ConfigError> {
        let mut config = KeelConfig::default();
        for source in &self.sources {
            apply_source(&mut config, source)?;
        }

        config.validate()?;
        tracing::debug!(?config, "Configuration loaded");
        Ok(config)
    }
}
