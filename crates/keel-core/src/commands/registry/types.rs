//! Command registry types and core implementation

use super::super::types::{Command, CommandDescriptor, CommandFactory};
use crate::error::{ConstructionError, RegistryError};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fmt;

/// Table of command factories keyed by exact name.
///
/// Filled once at start-up and read-only afterwards. Lookups never construct
/// anything; only [`construct`](Self::construct) runs a factory.
#[derive(Default)]
pub struct CommandRegistry {
    commands: BTreeMap<String, CommandDescriptor>,
}

impl CommandRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under `name`.
    ///
    /// Fails with [`RegistryError::Duplicate`] if the name is taken; the
    /// existing entry is left untouched.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> Result<(), RegistryError>
    where
        F: Fn() -> Result<Box<dyn Command>, ConstructionError> + Send + Sync + 'static,
    {
        self.add(CommandDescriptor::new(name, factory))
    }

    /// Register a prepared descriptor
    pub fn add(&mut self, descriptor: CommandDescriptor) -> Result<(), RegistryError> {
        match self.commands.entry(descriptor.name().to_string()) {
            Entry::Occupied(entry) => Err(RegistryError::Duplicate {
                name: entry.key().clone(),
            }),
            Entry::Vacant(entry) => {
                entry.insert(descriptor);
                Ok(())
            }
        }
    }

    /// Find the factory registered under exactly `name`
    pub fn lookup(&self, name: &str) -> Result<&CommandFactory, RegistryError> {
        self.commands
            .get(name)
            .map(CommandDescriptor::factory)
            .ok_or_else(|| RegistryError::NotFound {
                name: name.to_string(),
            })
    }

    /// Run the factory for `name` and return the new command
    pub fn construct(&self, name: &str) -> Result<Box<dyn Command>, RegistryError> {
        let factory = self.lookup(name)?;
        tracing::debug!("Constructing command '{}'", name);
        factory().map_err(RegistryError::from)
    }

    /// Synopsis registered alongside the factory
    pub fn synopsis(&self, name: &str) -> Option<&str> {
        self.commands.get(name).and_then(CommandDescriptor::synopsis)
    }

    /// Check if a name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Get command count
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// All registered names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    /// Names without a parent, in sorted order
    pub fn top_level_names(&self) -> Vec<&str> {
        self.names().filter(|name| !name.contains(' ')).collect()
    }

    /// Names exactly one level below `parent`, in sorted order
    pub fn children(&self, parent: &str) -> Vec<&str> {
        let prefix = format!("{parent} ");
        self.names()
            .filter(|name| {
                name.strip_prefix(&prefix)
                    .is_some_and(|rest| !rest.is_empty() && !rest.contains(' '))
            })
            .collect()
    }
}

impl fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("commands", &self.commands.keys().collect::<Vec<_>>())
            .finish()
    }
}
