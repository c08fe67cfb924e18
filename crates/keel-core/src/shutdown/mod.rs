//! Shutdown signal broadcasting
//!
//! Long-running commands learn that the process should stop by reading from a
//! [`ShutdownReceiver`]. Each call to
//! [`ShutdownBroadcaster::new_shutdown_channel`] subscribes a fresh listener
//! task to the signal source, so every outstanding channel receives its own
//! copy of every interrupt or termination signal (fan-out, not a shared
//! queue).
//!
//! # Listener life-cycle
//!
//! ```text
//!   Armed ──signal──▶ Delivering ──send completes──▶ Armed
//! ```
//!
//! Under [`ListenerLifetime::Process`] there is no terminal state: listeners
//! live until the process exits. [`ListenerLifetime::Scoped`] adds an exit
//! when its cancellation token fires or the receiver is dropped.
//!
//! # Example
//!
//! ```rust,ignore
//! use keel_core::shutdown::{ManualSignalSource, ShutdownBroadcaster, ShutdownSignal};
//!
//! let source = ManualSignalSource::new();
//! let broadcaster = ShutdownBroadcaster::new(source.clone());
//! let mut shutdown = broadcaster.new_shutdown_channel()?;
//!
//! source.raise(ShutdownSignal::Interrupt);
//! shutdown.recv().await;
//! ```

mod broadcaster;
mod listener;
mod receiver;
mod source;


pub use broadcaster::{DEFAULT_CHANNEL_CAPACITY, ListenerLifetime, ShutdownBroadcaster};
pub use receiver::ShutdownReceiver;
pub use source::{ManualSignalSource, OsSignalSource, ShutdownSignal, SignalSource, SignalStream};
