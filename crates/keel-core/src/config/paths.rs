//! Config file location

use std::path::PathBuf;

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "KEEL_CONFIG";

/// `<config_dir>/keel/config.toml`
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("~/.config"))
        .join("keel")
        .join("config.toml")
}

/// Resolve the config file to load.
///
/// An explicitly configured path wins (with `~` expanded); otherwise the
/// default location is used.
pub fn resolve_config_path(configured: Option<&str>) -> PathBuf {
    match configured.map(str::trim).filter(|path| !path.is_empty()) {
        Some(path) => PathBuf::from(shellexpand::tilde(path).into_owned()),
        None => default_config_path(),
    }
}
