//! `keel monitor` - periodic status lines until shutdown

use super::{parse_args, usage};
use async_trait::async_trait;
use chrono::Local;
use clap::Parser;
use keel_core::error::ConstructionError;
use keel_core::shutdown::ShutdownBroadcaster;
use keel_core::{Command, CommandContext, ShutdownReceiver, Ui};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{self, Instant, MissedTickBehavior};

pub const SYNOPSIS: &str = "Streams process status until interrupted";

#[derive(Parser, Debug)]
#[command(about = SYNOPSIS)]
struct MonitorArgs {
    /// Milliseconds between status lines
    #[arg(long = "interval-ms", default_value_t = 1000, value_parser = clap::value_parser!(u64).range(1..))]
    interval_ms: u64,
}

pub struct MonitorCommand {
    ui: Arc<dyn Ui>,
    broadcaster: ShutdownBroadcaster,
    shutdown: ShutdownReceiver,
}

impl MonitorCommand {
    pub fn new(ctx: &CommandContext) -> Result<Self, ConstructionError> {
        Ok(Self {
            ui: ctx.ui(),
            broadcaster: ctx.broadcaster().clone(),
            shutdown: ctx.shutdown_channel("monitor")?,
        })
    }

    fn status_line(&self, started: Instant) -> String {
        format!(
            "{} uptime={:.1}s shutdown_listeners={}",
            Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z"),
            started.elapsed().as_secs_f64(),
            self.broadcaster.active_listeners()
        )
    }
}

#[async_trait]
impl Command for MonitorCommand {
    fn synopsis(&self) -> String {
        SYNOPSIS.to_string()
    }

    fn help(&self) -> String {
        usage::<MonitorArgs>("monitor")
    }

    async fn run(&mut self, args: Vec<String>) -> i32 {
        let args = match parse_args::<MonitorArgs>("monitor", args, self.ui.as_ref()) {
            Ok(args) => args,
            Err(code) => return code,
        };

        let started = Instant::now();
        let mut ticker = time::interval(Duration::from_millis(args.interval_ms));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => self.ui.output(&self.status_line(started)),
                _ = self.shutdown.recv() => break,
            }
        }

        self.ui.output("==> Monitor stopped");
        0
    }
}
