//! Error types for Keel
//!
//! Each subsystem reports its own error enum so callers can match on the
//! failure kinds they care about:
//! - [`RegistryError`]: name resolution and command construction
//! - [`ConstructionError`]: a factory refused to build its command
//! - [`ShutdownError`]: signal subscription failures
//! - [`ConfigError`]: configuration loading and validation
//!
//! [`KeelError`] unifies them for start-up code in the binary.

mod conversions;
mod types;

pub use types::{
    ConfigError, ConstructionError, EXIT_FAILURE, EXIT_NOT_FOUND, KeelError, KeelResult,
    RegistryError, ShutdownError,
};
