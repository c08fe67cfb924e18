//! Shutdown broadcaster - creates independent shutdown channels on demand

use super::listener::Listener;
use super::receiver::ShutdownReceiver;
use super::source::{OsSignalSource, SignalSource};
use crate::error::ShutdownError;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Default buffer of each shutdown channel
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1;

/// How long a listener task lives
#[derive(Debug, Clone, Default)]
pub enum ListenerLifetime {
    /// Until the process exits. Listeners are never cancelled and keep their
    /// signal registration even after their receiver is dropped.
    #[default]
    Process,
    /// Until the token is cancelled or the receiver is dropped, whichever
    /// comes first. Intended for long-lived hosts that construct commands
    /// repeatedly.
    Scoped(CancellationToken),
}

/// Hands out shutdown channels fed by a shared signal source.
///
/// Cloning is cheap; clones share the signal source and the active-listener
/// count.
///
/// # Resource accumulation
///
/// With [`ListenerLifetime::Process`] (the default) every call to
/// [`new_shutdown_channel`](Self::new_shutdown_channel) leaves one task
/// running for the rest of the process, whether or not its receiver is ever
/// read again. That is fine for a single-shot CLI invocation. Hosts that
/// construct long-running commands in a loop must use
/// [`ListenerLifetime::Scoped`] or they accumulate one idle listener per
/// construction.
#[derive(Debug, Clone)]
pub struct ShutdownBroadcaster {
    source: Arc<dyn SignalSource>,
    capacity: usize,
    lifetime: ListenerLifetime,
    active: Arc<AtomicUsize>,
    next_id: Arc<AtomicU64>,
}

impl ShutdownBroadcaster {
    /// Create a broadcaster over the given signal source
    pub fn new(source: impl SignalSource + 'static) -> Self {
        Self {
            source: Arc::new(source),
            capacity: DEFAULT_CHANNEL_CAPACITY,
            lifetime: ListenerLifetime::default(),
            active: Arc::new(AtomicUsize::new(0)),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Broadcaster over the process's SIGINT and SIGTERM
    pub fn os() -> Self {
        Self::new(OsSignalSource::new())
    }

    /// Set the buffer of each new channel (minimum 1)
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    /// Set the lifetime of listeners spawned from now on
    pub fn with_lifetime(mut self, lifetime: ListenerLifetime) -> Self {
        self.lifetime = lifetime;
        self
    }

    /// Scope every listener to the given token
    pub fn scoped(self, token: CancellationToken) -> Self {
        self.with_lifetime(ListenerLifetime::Scoped(token))
    }

    /// Buffer of each new channel
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Lifetime applied to new listeners
    pub fn lifetime(&self) -> &ListenerLifetime {
        &self.lifetime
    }

    /// Number of listener tasks currently running
    pub fn active_listeners(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// Create a fresh shutdown channel.
    ///
    /// Subscribes one new listener to the signal source and spawns it on the
    /// current tokio runtime. Every signal received after this call produces
    /// exactly one event on the returned channel, independently of any other
    /// channel. The listener task is detached; see the type-level docs for
    /// how long it lives.
    pub fn new_shutdown_channel(&self) -> Result<ShutdownReceiver, ShutdownError> {
        let runtime =
            tokio::runtime::Handle::try_current().map_err(|_| ShutdownError::NoRuntime)?;

        // Subscribe before returning so no signal raised after this call is missed.
        let signals = self.source.subscribe()?;
        let (sender, receiver) = mpsc::channel(self.capacity);
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        let listener = Listener::new(
            id,
            signals,
            sender,
            self.lifetime.clone(),
            self.active.clone(),
        );
        runtime.spawn(listener.run());

        tracing::debug!(
            listener = id,
            active = self.active_listeners(),
            "Spawned shutdown listener"
        );
        Ok(ShutdownReceiver::new(id, receiver))
    }
}
