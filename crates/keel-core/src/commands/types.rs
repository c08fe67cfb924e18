//! Command capability and registry entry types

use crate::error::ConstructionError;
use async_trait::async_trait;
use std::fmt;

/// Exit code a command returns to ask the dispatcher to print its help.
///
/// Bare parent commands such as `snapshot` return this so the dispatcher can
/// list their children, which the command itself does not know about.
pub const RUN_RESULT_HELP: i32 = -18511;

/// An executable unit produced by a factory
#[async_trait]
pub trait Command: Send {
    /// One-line description
    fn synopsis(&self) -> String;

    /// Full usage text
    fn help(&self) -> String;

    /// Run with the arguments following the command name and return the
    /// process exit code
    async fn run(&mut self, args: Vec<String>) -> i32;
}

/// Deferred constructor for a command.
///
/// Each call must produce a fresh, independent instance.
pub type CommandFactory =
    Box<dyn Fn() -> Result<Box<dyn Command>, ConstructionError> + Send + Sync>;

/// A name, its factory and an optional synopsis for help listings
pub struct CommandDescriptor {
    name: String,
    synopsis: Option<String>,
    factory: CommandFactory,
}

impl CommandDescriptor {
    /// Create a descriptor from a name and a factory closure
    pub fn new<F>(name: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Result<Box<dyn Command>, ConstructionError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            synopsis: None,
            factory: Box::new(factory),
        }
    }

    /// Attach the synopsis shown in help listings
    pub fn with_synopsis(mut self, synopsis: impl Into<String>) -> Self {
        self.synopsis = Some(synopsis.into());
        self
    }

    /// Registered name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Synopsis, if one was attached
    pub fn synopsis(&self) -> Option<&str> {
        self.synopsis.as_deref()
    }

    /// The factory
    pub fn factory(&self) -> &CommandFactory {
        &self.factory
    }
}

impl fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("name", &self.name)
            .field("synopsis", &self.synopsis)
            .finish_non_exhaustive()
    }
}
