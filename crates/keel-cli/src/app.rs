//! Start-up wiring
//!
//! Builds the process-scoped state once (UI sink, shutdown broadcaster,
//! configuration), registers the command table against it and hands argv to
//! the router.

use crate::{commands, router};
use keel_core::config::{CONFIG_PATH_ENV, resolve_config_path};
use keel_core::error::KeelResult;
use keel_core::shutdown::{OsSignalSource, ShutdownBroadcaster, SignalSource};
use keel_core::ui::{BasicUi, Ui};
use keel_core::{CommandContext, CommandRegistry, ConfigLoader, KeelConfig};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Load defaults, the config file and `KEEL_*` overrides
pub fn load_config() -> KeelResult<KeelConfig> {
    let configured = std::env::var(CONFIG_PATH_ENV).ok();
    let path = resolve_config_path(configured.as_deref());

    let config = ConfigLoader::new()
        .with_defaults()
        .with_file(path)
        .with_env()
        .load()?;
    Ok(config)
}

/// A fully wired Keel process, ready to dispatch one command line
pub struct App {
    registry: CommandRegistry,
    context: CommandContext,
    scope: Option<CancellationToken>,
}

impl App {
    /// Wire the real process: stdio UI and OS signals
    pub fn bootstrap(config: KeelConfig) -> KeelResult<Self> {
        Self::with_parts(config, Arc::new(BasicUi::stdio()), OsSignalSource::new())
    }

    /// Wire with an explicit UI sink and signal source
    pub fn with_parts(
        config: KeelConfig,
        ui: Arc<dyn Ui>,
        source: impl SignalSource + 'static,
    ) -> KeelResult<Self> {
        let scope = config
            .shutdown
            .scoped_listeners
            .then(CancellationToken::new);

        let mut broadcaster =
            ShutdownBroadcaster::new(source).with_capacity(config.shutdown.channel_capacity);
        if let Some(token) = &scope {
            broadcaster = broadcaster.scoped(token.clone());
        }

        let context = CommandContext::new(ui, broadcaster, Arc::new(config));
        let registry = commands::table(&context)?;
        tracing::debug!(commands = registry.len(), "Command table registered");

        Ok(Self {
            registry,
            context,
            scope,
        })
    }

    /// The registered command table
    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// The shared process context
    pub fn context(&self) -> &CommandContext {
        &self.context
    }

    /// Dispatch one command line and return its exit code.
    ///
    /// With scoped listeners, every listener spawned during the run is torn
    /// down once the command returns.
    pub async fn run(self, args: Vec<String>) -> i32 {
        let ui = self.context.ui();
        let code = router::dispatch(&self.registry, ui.as_ref(), args).await;

        if let Some(scope) = &self.scope {
            scope.cancel();
        }
        code
    }
}
