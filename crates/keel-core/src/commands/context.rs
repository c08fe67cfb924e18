//! CommandContext - process-scoped state handed to every factory

use crate::config::KeelConfig;
use crate::error::ConstructionError;
use crate::shutdown::{ShutdownBroadcaster, ShutdownReceiver};
use crate::ui::Ui;
use std::fmt;
use std::sync::Arc;

/// Shared state captured by command factories.
///
/// Built once at start-up. Cloning shares the same UI sink, broadcaster and
/// configuration, so every command constructed in the process writes through
/// one sink.
#[derive(Clone)]
pub struct CommandContext {
    ui: Arc<dyn Ui>,
    shutdown: ShutdownBroadcaster,
    config: Arc<KeelConfig>,
}

impl CommandContext {
    /// Create a context from its parts
    pub fn new(ui: Arc<dyn Ui>, shutdown: ShutdownBroadcaster, config: Arc<KeelConfig>) -> Self {
        Self {
            ui,
            shutdown,
            config,
        }
    }

    /// The shared UI sink
    pub fn ui(&self) -> Arc<dyn Ui> {
        self.ui.clone()
    }

    /// The shutdown broadcaster
    pub fn broadcaster(&self) -> &ShutdownBroadcaster {
        &self.shutdown
    }

    /// The loaded configuration
    pub fn config(&self) -> &KeelConfig {
        &self.config
    }

    /// Request a fresh shutdown channel on behalf of a long-running command
    pub fn shutdown_channel(&self, command: &str) -> Result<ShutdownReceiver, ConstructionError> {
        self.shutdown
            .new_shutdown_channel()
            .map_err(|e| ConstructionError::from_shutdown(command, &e))
    }
}

impl fmt::Debug for CommandContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandContext")
            .field("shutdown", &self.shutdown)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
