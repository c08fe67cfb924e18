//! Configuration source types

use std::collections::HashMap;
use std::path::PathBuf;

/// Source of configuration data
#[derive(Debug, Clone)]
pub enum ConfigSource {
    /// Built-in defaults
    Default,
    /// Configuration from a file
    File(PathBuf),
    /// `KEEL_*` variables from the process environment
    Environment,
    /// `KEEL_*` keys supplied directly
    Overrides(HashMap<String, String>),
}
