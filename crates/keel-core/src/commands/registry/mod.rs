//! Command registry
//!
//! This module provides the name-to-factory table consulted by the
//! dispatcher.

mod types;


pub use types::CommandRegistry;
