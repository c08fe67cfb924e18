//! From trait implementations for Keel error conversions

use super::types::{ConfigError, ConstructionError, KeelError, RegistryError, ShutdownError};

impl From<ConstructionError> for RegistryError {
    fn from(error: ConstructionError) -> Self {
        Self::Construction(error)
    }
}

impl From<RegistryError> for KeelError {
    fn from(error: RegistryError) -> Self {
        Self::Registry(error)
    }
}

impl From<ConstructionError> for KeelError {
    fn from(error: ConstructionError) -> Self {
        Self::Registry(RegistryError::Construction(error))
    }
}

impl From<ShutdownError> for KeelError {
    fn from(error: ShutdownError) -> Self {
        Self::Shutdown(error)
    }
}

impl From<ConfigError> for KeelError {
    fn from(error: ConfigError) -> Self {
        Self::Config(error)
    }
}

impl From<std::io::Error> for KeelError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}
