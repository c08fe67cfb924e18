//! Shared UI sink
//!
//! Every command constructed in a process writes through the same [`Ui`]
//! instance, created once at start-up and handed to each factory through the
//! [`CommandContext`](crate::commands::CommandContext). From the registry's
//! point of view the sink only accepts lines of text.
//!
//! - [`BasicUi`]: writes to a pair of writers (stdout/stderr by default)
//! - [`BufferUi`]: captures lines in memory, used by tests and embedding hosts
//! - [`NoopUi`]: discards everything

mod basic;
mod buffer;
mod sink;

pub use basic::BasicUi;
pub use buffer::{BufferUi, UiLine};
pub use sink::{NoopUi, Ui};

#[cfg(test)]
pub use sink::MockUi;
