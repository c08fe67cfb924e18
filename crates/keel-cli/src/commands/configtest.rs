//! `keel configtest` - validate a configuration file without starting anything

use super::{parse_args, usage};
use async_trait::async_trait;
use clap::Parser;
use keel_core::config::{CONFIG_PATH_ENV, resolve_config_path};
use keel_core::error::ConstructionError;
use keel_core::{Command, CommandContext, ConfigLoader, Ui};
use std::path::PathBuf;
use std::sync::Arc;

pub const SYNOPSIS: &str = "Validates a configuration file";

#[derive(Parser, Debug)]
#[command(about = SYNOPSIS)]
struct ConfigTestArgs {
    /// Configuration file to check (defaults to $KEEL_CONFIG or the user config path)
    #[arg(short = 'c', long = "config-file", value_name = "PATH")]
    config_file: Option<String>,
}

pub struct ConfigTestCommand {
    ui: Arc<dyn Ui>,
}

impl ConfigTestCommand {
    pub fn new(ctx: &CommandContext) -> Result<Self, ConstructionError> {
        Ok(Self { ui: ctx.ui() })
    }

    fn target(args: &ConfigTestArgs) -> PathBuf {
        let configured = args
            .config_file
            .clone()
            .or_else(|| std::env::var(CONFIG_PATH_ENV).ok());
        resolve_config_path(configured.as_deref())
    }
}

#[async_trait]
impl Command for ConfigTestCommand {
    fn synopsis(&self) -> String {
        SYNOPSIS.to_string()
    }

    fn help(&self) -> String {
        usage::<ConfigTestArgs>("configtest")
    }

    async fn run(&mut self, args: Vec<String>) -> i32 {
        let args = match parse_args::<ConfigTestArgs>("configtest", args, self.ui.as_ref()) {
            Ok(args) => args,
            Err(code) => return code,
        };

        let path = Self::target(&args);
        if !path.is_file() {
            self.ui.error(&format!(
                "Config validation failed: '{}' is not a file",
                path.display()
            ));
            return 1;
        }

        match ConfigLoader::new().with_defaults().with_file(&path).load() {
            Ok(_) => {
                self.ui.output("Configuration is valid!");
                0
            }
            Err(e) => {
                self.ui.error(&format!("Config validation failed: {e}"));
                1
            }
        }
    }
}
