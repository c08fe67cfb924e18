//! Lazy command registry
//!
//! Commands are registered as factories: nothing is constructed until the
//! dispatcher resolves a name and asks for it. A factory may fail, e.g. when
//! a long-running command cannot obtain its shutdown channel.
//!
//! # Hierarchical names
//!
//! Names may contain spaces (`"snapshot"`, `"snapshot save"`). Each name is
//! an independent entry and lookups match the whole string exactly; the
//! registry never matches prefixes.
//!
//! # Example
//!
//! ```rust,ignore
//! use keel_core::commands::{CommandDescriptor, CommandRegistry};
//!
//! let mut registry = CommandRegistry::new();
//! registry.register("version", || Ok(Box::new(VersionCommand::default())))?;
//! registry.add(
//!     CommandDescriptor::new("snapshot", || Ok(Box::new(SnapshotCommand)))
//!         .with_synopsis("Saves, restores and inspects snapshots"),
//! )?;
//!
//! let mut command = registry.construct("version")?;
//! let code = command.run(Vec::new()).await;
//! ```

mod context;
mod parent;
mod registry;
mod types;

pub use context::CommandContext;
pub use parent::ParentCommand;
pub use registry::CommandRegistry;
pub use types::{Command, CommandDescriptor, CommandFactory, RUN_RESULT_HELP};
