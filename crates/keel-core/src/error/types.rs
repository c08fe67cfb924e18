//! Core error types for Keel

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Keel start-up and dispatch operations
pub type KeelResult<T> = Result<T, KeelError>;

/// Exit code reported when a command name does not resolve
pub const EXIT_NOT_FOUND: i32 = 127;

/// Exit code reported for every other failure
pub const EXIT_FAILURE: i32 = 1;

/// A factory declined to build its command.
///
/// The message is shown to the user verbatim; the command name is kept
/// separately so the dispatcher can prefix it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ConstructionError {
    /// Registered name of the command being constructed
    pub command: String,
    /// Human-readable reason
    pub message: String,
}

/// Errors from the command registry
#[derive(Error, Debug)]
pub enum RegistryError {
    /// No entry matches the requested name exactly
    #[error("unknown command '{name}'")]
    NotFound { name: String },

    /// A second registration tried to reuse an existing name
    #[error("command '{name}' is already registered")]
    Duplicate { name: String },

    /// The factory ran and reported a failure
    #[error(transparent)]
    Construction(ConstructionError),
}

/// Errors from the shutdown broadcaster
#[derive(Error, Debug)]
pub enum ShutdownError {
    /// The OS refused to install the signal handlers
    #[error("failed to register signal handlers: {0}")]
    Register(#[source] std::io::Error),

    /// Listener tasks need a tokio runtime to be spawned on
    #[error("shutdown listeners require a running tokio runtime")]
    NoRuntime,
}

/// Errors from configuration loading and validation
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file exists but could not be read
    #[error("failed to read config file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file could not be deserialized
    #[error("failed to parse config file '{}': {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// An environment override held an unusable value
    #[error("invalid value for {key}: {message}")]
    Env { key: String, message: String },

    /// The merged configuration failed validation
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Unified error type for the binary's start-up path
#[derive(Error, Debug)]
pub enum KeelError {
    #[error(transparent)]
    Registry(RegistryError),

    #[error(transparent)]
    Shutdown(ShutdownError),

    #[error(transparent)]
    Config(ConfigError),

    #[error("IO error: {0}")]
    Io(String),
}

impl ConstructionError {
    /// Create a new construction error for the named command
    pub fn new(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            message: message.into(),
        }
    }

    /// A long-running command could not obtain its shutdown channel
    pub fn from_shutdown(command: impl Into<String>, error: &ShutdownError) -> Self {
        Self::new(command, format!("shutdown notification unavailable: {error}"))
    }
}

impl RegistryError {
    /// Exit code the dispatcher reports for this failure
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound { .. } => EXIT_NOT_FOUND,
            Self::Duplicate { .. } | Self::Construction(_) => EXIT_FAILURE,
        }
    }

    /// Whether this is a lookup miss
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl ConfigError {
    /// Create a new validation error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }

    /// Create a new environment override error
    pub fn env(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Env {
            key: key.into(),
            message: message.into(),
        }
    }
}

impl KeelError {
    /// Exit code the binary reports for this failure
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Registry(error) => error.exit_code(),
            _ => EXIT_FAILURE,
        }
    }
}
