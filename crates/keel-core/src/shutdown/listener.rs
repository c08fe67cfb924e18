//! Background relay from a signal subscription to one shutdown channel

use super::broadcaster::ListenerLifetime;
use super::source::{ShutdownSignal, SignalStream};
use futures::StreamExt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::mpsc;
use tracing::debug;

/// Counts a listener as active from creation until its task ends
struct ActiveGuard(Arc<AtomicUsize>);

impl ActiveGuard {
    fn new(active: Arc<AtomicUsize>) -> Self {
        active.fetch_add(1, Ordering::SeqCst);
        Self(active)
    }
}

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

pub(super) struct Listener {
    id: u64,
    signals: SignalStream,
    sender: mpsc::Sender<()>,
    lifetime: ListenerLifetime,
    _active: ActiveGuard,
}

impl Listener {
    pub(super) fn new(
        id: u64,
        signals: SignalStream,
        sender: mpsc::Sender<()>,
        lifetime: ListenerLifetime,
        active: Arc<AtomicUsize>,
    ) -> Self {
        Self {
            id,
            signals,
            sender,
            lifetime,
            _active: ActiveGuard::new(active),
        }
    }

    /// Relay loop: Armed -> Delivering -> Armed.
    pub(super) async fn run(mut self) {
        debug!(listener = self.id, "Shutdown listener armed");

        while let Some(signal) = self.wait_for_signal().await {
            debug!(listener = self.id, %signal, "Delivering shutdown event");
            if !self.deliver().await {
                break;
            }
        }

        debug!(listener = self.id, "Shutdown listener stopped");
    }

    /// Armed state. `None` ends the listener.
    async fn wait_for_signal(&mut self) -> Option<ShutdownSignal> {
        match &self.lifetime {
            ListenerLifetime::Process => {
                let signal = self.signals.next().await;
                if signal.is_none() {
                    debug!(listener = self.id, "Signal source closed");
                }
                signal
            }
            ListenerLifetime::Scoped(token) => tokio::select! {
                _ = token.cancelled() => None,
                _ = self.sender.closed() => None,
                signal = self.signals.next() => signal,
            },
        }
    }

    /// Delivering state. Returns whether to re-arm.
    async fn deliver(&mut self) -> bool {
        match &self.lifetime {
            ListenerLifetime::Process => {
                if self.sender.send(()).await.is_err() {
                    // Process listeners never exit; the event has nowhere to go.
                    debug!(listener = self.id, "Shutdown receiver dropped, event discarded");
                }
                true
            }
            ListenerLifetime::Scoped(token) => tokio::select! {
                _ = token.cancelled() => false,
                result = self.sender.send(()) => result.is_ok(),
            },
        }
    }
}
