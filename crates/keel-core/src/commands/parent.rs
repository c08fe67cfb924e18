//! Placeholder command for the root of a command family

use super::types::{Command, RUN_RESULT_HELP};
use async_trait::async_trait;

/// A command that only groups its children.
///
/// Running it always asks the dispatcher for help output.
#[derive(Debug, Clone)]
pub struct ParentCommand {
    synopsis: String,
    help: String,
}

impl ParentCommand {
    pub fn new(synopsis: impl Into<String>, help: impl Into<String>) -> Self {
        Self {
            synopsis: synopsis.into(),
            help: help.into(),
        }
    }
}

#[async_trait]
impl Command for ParentCommand {
    fn synopsis(&self) -> String {
        self.synopsis.clone()
    }

    fn help(&self) -> String {
        self.help.clone()
    }

    async fn run(&mut self, _args: Vec<String>) -> i32 {
        RUN_RESULT_HELP
    }
}
