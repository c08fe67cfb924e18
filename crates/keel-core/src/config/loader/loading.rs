//! Configuration source loading logic

use super::types::ConfigSource;
use crate::config::env_loader;
use crate::config::file_loader;
use crate::config::model::KeelConfig;
use crate::error::ConfigError;

/// Apply a single source to the configuration being built
pub(super) fn apply_source(config: &mut KeelConfig, source: &ConfigSource) -> Result<(), ConfigError> {
    match source {
        ConfigSource::Default => {
            tracing::debug!("Loading default config");
            *config = KeelConfig::default();
        }
        ConfigSource::File(path) => {
            tracing::debug!("Loading config from file: {}", path.display());
            *config = file_loader::load_from_file(path)?;
        }
        ConfigSource::Environment => {
            tracing::debug!("Loading config overrides from environment");
            env_loader::apply_env(config)?;
        }
        ConfigSource::Overrides(vars) => {
            tracing::debug!("Applying {} config overrides", vars.len());
            env_loader::apply_vars(config, vars)?;
        }
    }
    Ok(())
}
