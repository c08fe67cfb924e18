//! `keel version`

use super::{parse_args, usage};
use async_trait::async_trait;
use clap::Parser;
use keel_core::error::ConstructionError;
use keel_core::{Command, CommandContext, Ui, VERSION};
use std::sync::Arc;

pub const SYNOPSIS: &str = "Prints the Keel version";

#[derive(Parser, Debug)]
#[command(about = SYNOPSIS)]
struct VersionArgs {}

pub struct VersionCommand {
    ui: Arc<dyn Ui>,
}

impl VersionCommand {
    pub fn new(ctx: &CommandContext) -> Result<Self, ConstructionError> {
        Ok(Self { ui: ctx.ui() })
    }
}

#[async_trait]
impl Command for VersionCommand {
    fn synopsis(&self) -> String {
        SYNOPSIS.to_string()
    }

    fn help(&self) -> String {
        usage::<VersionArgs>("version")
    }

    async fn run(&mut self, args: Vec<String>) -> i32 {
        if let Err(code) = parse_args::<VersionArgs>("version", args, self.ui.as_ref()) {
            return code;
        }
        self.ui.output(&format!("Keel v{VERSION}"));
        0
    }
}
