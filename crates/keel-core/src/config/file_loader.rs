//! File-based configuration loading

use super::model::KeelConfig;
use crate::error::ConfigError;
use std::fs;
use std::path::Path;

/// Load configuration from a file
///
/// Supports TOML, JSON and YAML based on file extension (TOML when the
/// extension is missing or unknown). Returns the default config if the file
/// doesn't exist.
pub fn load_from_file(path: &Path) -> Result<KeelConfig, ConfigError> {
    if !path.exists() {
        tracing::debug!("Config file {} not found, using defaults", path.display());
        return Ok(KeelConfig::default());
    }

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let parse_error = |message: String| ConfigError::Parse {
        path: path.to_path_buf(),
        message,
    };

    match path.extension().and_then(|s| s.to_str()) {
        Some("json") => serde_json::from_str(&content).map_err(|e| parse_error(e.to_string())),
        Some("yaml") | Some("yml") => {
            serde_yaml::from_str(&content).map_err(|e| parse_error(e.to_string()))
        }
        _ => toml::from_str(&content).map_err(|e| parse_error(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogFormat;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_load_from_toml_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
            [logging]
            level = "debug"
            format = "json"

            [shutdown]
            channel_capacity = 3
            scoped_listeners = true
            "#,
        )
        .unwrap();

        let config = load_from_file(&path).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.shutdown.channel_capacity, 3);
        assert!(config.shutdown.scoped_listeners);
    }

    #[test]
    fn test_load_from_json_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, r#"{"agent": {"graceful_timeout": "2s"}}"#).unwrap();

        let config = load_from_file(&path).unwrap();
        assert_eq!(config.agent.graceful_timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_load_from_yaml_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yml");
        fs::write(&path, "watch:\n  recursive: true\n").unwrap();

        let config = load_from_file(&path).unwrap();
        assert!(config.watch.recursive);
    }

    #[test]
    fn test_missing_file_returns_default() {
        let temp_dir = TempDir::new().unwrap();
        let config = load_from_file(&temp_dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, KeelConfig::default());
    }

    #[test]
    fn test_malformed_file_reports_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.toml");
        fs::write(&path, "[shutdown\nchannel_capacity = ").unwrap();

        let error = load_from_file(&path).unwrap_err();
        assert!(matches!(error, ConfigError::Parse { .. }));
        assert!(error.to_string().contains("broken.toml"));
    }
}
