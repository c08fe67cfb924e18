//! `keel agent` - long-running node process
//!
//! Emits a heartbeat until the first shutdown event, then leaves gracefully
//! within `agent.graceful_timeout`. A second event during the leave forces an
//! immediate exit with status 1.

use super::{parse_args, usage};
use async_trait::async_trait;
use chrono::Local;
use clap::Parser;
use keel_core::config::AgentConfig;
use keel_core::error::ConstructionError;
use keel_core::{Command, CommandContext, ShutdownReceiver, Ui};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{self, Instant};

pub const SYNOPSIS: &str = "Runs a Keel agent";

/// Time the agent needs to announce that it is leaving
const LEAVE_DELAY: Duration = Duration::from_millis(100);

#[derive(Parser, Debug)]
#[command(about = SYNOPSIS)]
struct AgentArgs {
    /// Name this node reports in its heartbeat
    #[arg(long, env = "KEEL_NODE_NAME", default_value = "keel-agent")]
    node: String,
}

pub struct AgentCommand {
    ui: Arc<dyn Ui>,
    config: AgentConfig,
    shutdown: ShutdownReceiver,
}

impl AgentCommand {
    pub fn new(ctx: &CommandContext) -> Result<Self, ConstructionError> {
        Ok(Self {
            ui: ctx.ui(),
            config: ctx.config().agent.clone(),
            shutdown: ctx.shutdown_channel("agent")?,
        })
    }

    /// Heartbeat until a shutdown event arrives or the channel closes
    async fn serve(&mut self, node: &str) {
        let period = self.config.heartbeat_interval;
        let mut heartbeat = time::interval_at(Instant::now() + period, period);
        let mut beats: u64 = 0;

        loop {
            tokio::select! {
                _ = heartbeat.tick() => {
                    beats += 1;
                    self.ui.output(&format!(
                        "{} [INFO] agent: heartbeat #{beats} from {node}",
                        Local::now().format("%Y/%m/%d %H:%M:%S")
                    ));
                }
                event = self.shutdown.recv() => {
                    if event.is_none() {
                        tracing::warn!("Shutdown channel closed, stopping agent");
                    }
                    return;
                }
            }
        }
    }

    async fn leave(ui: &dyn Ui, node: &str) {
        ui.output(&format!("==> Node {node} leaving"));
        time::sleep(LEAVE_DELAY).await;
    }
}

#[async_trait]
impl Command for AgentCommand {
    fn synopsis(&self) -> String {
        SYNOPSIS.to_string()
    }

    fn help(&self) -> String {
        usage::<AgentArgs>("agent")
    }

    async fn run(&mut self, args: Vec<String>) -> i32 {
        let args = match parse_args::<AgentArgs>("agent", args, self.ui.as_ref()) {
            Ok(args) => args,
            Err(code) => return code,
        };

        self.ui.output("==> Keel agent running!");
        self.ui.output(&format!("         Node name: '{}'", args.node));
        self.ui.output(&format!(
            "         Heartbeat: {:?}",
            self.config.heartbeat_interval
        ));
        tracing::info!(node = %args.node, "Agent started");

        self.serve(&args.node).await;

        self.ui
            .output("==> Caught signal, gracefully leaving (signal again to force exit)");
        let ui = self.ui.clone();
        let grace = self.config.graceful_timeout;

        tokio::select! {
            left = time::timeout(grace, Self::leave(ui.as_ref(), &args.node)) => match left {
                Ok(()) => {
                    self.ui.output("==> Graceful leave complete");
                    tracing::info!(node = %args.node, "Agent stopped");
                    0
                }
                Err(_) => {
                    self.ui.error(&format!("==> Graceful leave timed out after {grace:?}"));
                    1
                }
            },
            Some(()) = self.shutdown.recv() => {
                self.ui.error("==> Second signal received, forcing exit");
                1
            }
        }
    }
}
