//! Configuration loading and management
//!
//! Keel reads an optional config file (TOML, JSON or YAML by extension) and
//! then applies `KEEL_*` environment overrides:
//!
//! ```toml
//! [logging]
//! level = "info"
//! format = "compact"
//!
//! [shutdown]
//! channel_capacity = 1
//! scoped_listeners = false
//!
//! [agent]
//! heartbeat_interval = "30s"
//! graceful_timeout = "5s"
//!
//! [watch]
//! recursive = false
//! ```

pub mod env_loader;
pub mod file_loader;
pub mod loader;
mod logging_config;
mod model;
mod paths;

pub use loader::{ConfigLoader, ConfigSource};
pub use logging_config::{LogFormat, LoggingConfig};
pub use model::{AgentConfig, KeelConfig, ShutdownConfig, WatchConfig};
pub use paths::{CONFIG_PATH_ENV, default_config_path, resolve_config_path};
