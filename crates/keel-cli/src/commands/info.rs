//! `keel info` - build and runtime details

use super::{parse_args, usage};
use async_trait::async_trait;
use clap::Parser;
use keel_core::error::ConstructionError;
use keel_core::shutdown::ListenerLifetime;
use keel_core::{Command, CommandContext, VERSION};

pub const SYNOPSIS: &str = "Provides debugging information for operators";

#[derive(Parser, Debug)]
#[command(about = SYNOPSIS)]
struct InfoArgs {}

pub struct InfoCommand {
    ctx: CommandContext,
}

impl InfoCommand {
    pub fn new(ctx: &CommandContext) -> Result<Self, ConstructionError> {
        Ok(Self { ctx: ctx.clone() })
    }

    fn report(&self) -> Vec<(&'static str, String)> {
        let broadcaster = self.ctx.broadcaster();
        let lifetime = match broadcaster.lifetime() {
            ListenerLifetime::Process => "process",
            ListenerLifetime::Scoped(_) => "scoped",
        };

        vec![
            ("version", VERSION.to_string()),
            ("os", std::env::consts::OS.to_string()),
            ("arch", std::env::consts::ARCH.to_string()),
            ("pid", std::process::id().to_string()),
            ("shutdown_listeners", broadcaster.active_listeners().to_string()),
            ("listener_lifetime", lifetime.to_string()),
            ("channel_capacity", broadcaster.capacity().to_string()),
            ("log_level", self.ctx.config().logging.level.clone()),
        ]
    }
}

#[async_trait]
impl Command for InfoCommand {
    fn synopsis(&self) -> String {
        SYNOPSIS.to_string()
    }

    fn help(&self) -> String {
        usage::<InfoArgs>("info")
    }

    async fn run(&mut self, args: Vec<String>) -> i32 {
        let ui = self.ctx.ui();
        if let Err(code) = parse_args::<InfoArgs>("info", args, ui.as_ref()) {
            return code;
        }

        ui.output("keel:");
        for (key, value) in self.report() {
            ui.output(&format!("\t{key} = {value}"));
        }
        0
    }
}
