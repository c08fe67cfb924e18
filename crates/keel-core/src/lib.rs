//! Keel Core Library
//!
//! This crate provides the two mechanisms every Keel subcommand is built on:
//! a lazy command registry that maps names to factories, and a shutdown
//! broadcaster that relays interrupt and termination signals to any number of
//! long-running commands. It also carries the process-scoped pieces handed to
//! every factory: the shared UI sink and the loaded configuration.

pub mod commands;
pub mod config;
pub mod error;
pub mod shutdown;
pub mod ui;

/// Version of the Keel workspace, shared by every crate and the binary
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Re-export commonly used types
pub use commands::{
    Command, CommandContext, CommandDescriptor, CommandFactory, CommandRegistry, RUN_RESULT_HELP,
};
pub use config::{ConfigLoader, ConfigSource, KeelConfig};
pub use error::{ConfigError, ConstructionError, KeelError, KeelResult, RegistryError, ShutdownError};
pub use shutdown::{
    ListenerLifetime, ManualSignalSource, OsSignalSource, ShutdownBroadcaster, ShutdownReceiver,
    ShutdownSignal, SignalSource,
};
pub use ui::{BasicUi, BufferUi, NoopUi, Ui};
