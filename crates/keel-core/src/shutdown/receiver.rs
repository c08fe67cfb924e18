//! Receiving end of a shutdown channel

use futures::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;

/// Receive-only handle yielding one `()` per shutdown signal.
///
/// Events are delivered in the order the listener received the signals.
/// A listener waits for this receiver to make room before delivering the
/// next event, so a slow reader still observes every signal.
#[derive(Debug)]
pub struct ShutdownReceiver {
    id: u64,
    receiver: mpsc::Receiver<()>,
}

impl ShutdownReceiver {
    pub(super) fn new(id: u64, receiver: mpsc::Receiver<()>) -> Self {
        Self { id, receiver }
    }

    /// Identifier of the listener feeding this channel
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Wait for the next shutdown event.
    ///
    /// Returns `None` only after the listener has stopped, which happens for
    /// scoped listeners or when the signal source itself goes away.
    pub async fn recv(&mut self) -> Option<()> {
        self.receiver.recv().await
    }

    /// Take a pending event without waiting
    pub fn try_recv(&mut self) -> Option<()> {
        self.receiver.try_recv().ok()
    }
}

impl Stream for ShutdownReceiver {
    type Item = ();

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<()>> {
        self.get_mut().receiver.poll_recv(cx)
    }
}
