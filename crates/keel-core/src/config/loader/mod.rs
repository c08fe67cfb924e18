//! Configuration loading
//!
//! Sources are applied in the order they are added:
//! - [`ConfigSource::Default`] resets to built-in defaults
//! - [`ConfigSource::File`] replaces the configuration with the file's
//!   contents (missing keys fall back to defaults, a missing file is ignored)
//! - [`ConfigSource::Environment`] and [`ConfigSource::Overrides`] patch
//!   individual `KEEL_*` keys on top
//!
//! The merged result is validated before it is returned.

mod builder;
mod loading;
mod types;

#[cfg(test)]
mod tests;

pub use builder::ConfigLoader;
pub use types::ConfigSource;
