//! Keel CLI
//!
//! The binary's pieces, exposed as a library so integration tests can drive
//! the dispatcher with an in-memory UI and a manual signal source.
//!
//! - [`app`]: start-up wiring (config, UI, broadcaster, command table)
//! - [`router`]: resolves argv against the registry and runs the command
//! - [`commands`]: the built-in command table
//! - [`logging`]: tracing subscriber set-up

pub mod app;
pub mod commands;
pub mod logging;
pub mod router;

pub use app::App;
