//! Signal sources the broadcaster subscribes to

use crate::error::ShutdownError;
use futures::stream::{self, Stream};
use std::fmt;
use std::pin::Pin;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

/// Stream of signals produced by one subscription
pub type SignalStream = Pin<Box<dyn Stream<Item = ShutdownSignal> + Send>>;

/// Default buffer of the manual source's broadcast channel
const MANUAL_SOURCE_BUFFER: usize = 64;

/// Kind of shutdown request received by the process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShutdownSignal {
    /// Ctrl-C / SIGINT
    Interrupt,
    /// SIGTERM
    Terminate,
}

impl ShutdownSignal {
    #[cfg(unix)]
    fn from_raw(signal: i32) -> Option<Self> {
        use signal_hook::consts::{SIGINT, SIGTERM};

        match signal {
            SIGINT => Some(Self::Interrupt),
            SIGTERM => Some(Self::Terminate),
            _ => None,
        }
    }
}

impl fmt::Display for ShutdownSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Interrupt => write!(f, "interrupt"),
            Self::Terminate => write!(f, "terminate"),
        }
    }
}

/// Something listeners can subscribe to for shutdown signals.
///
/// Every call to `subscribe` must return an independent stream: a signal is
/// delivered once to each live subscription.
pub trait SignalSource: Send + Sync + fmt::Debug {
    /// Register a new subscription
    fn subscribe(&self) -> Result<SignalStream, ShutdownError>;
}

/// The process's interrupt and termination signals.
///
/// On Unix each subscription installs its own `signal-hook` registration for
/// SIGINT and SIGTERM. Registrations are never removed while the stream is
/// alive, and once installed the default "terminate on Ctrl-C" disposition no
/// longer applies to the process.
///
/// Identical signals that arrive before a subscription is polled again are
/// coalesced by `signal-hook`, so a burst of real SIGINTs can yield fewer
/// events than were sent. Distinct signals (SIGINT then SIGTERM) are each
/// reported.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsSignalSource;

impl OsSignalSource {
    /// Create the OS signal source
    pub fn new() -> Self {
        Self
    }
}

impl SignalSource for OsSignalSource {
    fn subscribe(&self) -> Result<SignalStream, ShutdownError> {
        // The signal pipes are registered with the tokio reactor.
        tokio::runtime::Handle::try_current().map_err(|_| ShutdownError::NoRuntime)?;
        subscribe_os()
    }
}

#[cfg(unix)]
fn subscribe_os() -> Result<SignalStream, ShutdownError> {
    use futures::StreamExt;
    use signal_hook::consts::{SIGINT, SIGTERM};
    use signal_hook_tokio::Signals;

    let signals = Signals::new([SIGINT, SIGTERM]).map_err(ShutdownError::Register)?;
    Ok(Box::pin(signals.filter_map(|signal| async move {
        ShutdownSignal::from_raw(signal)
    })))
}

#[cfg(windows)]
fn subscribe_os() -> Result<SignalStream, ShutdownError> {
    let ctrl_c = tokio::signal::windows::ctrl_c().map_err(ShutdownError::Register)?;
    Ok(Box::pin(stream::unfold(ctrl_c, |mut ctrl_c| async move {
        ctrl_c
            .recv()
            .await
            .map(|()| (ShutdownSignal::Interrupt, ctrl_c))
    })))
}

#[cfg(not(any(unix, windows)))]
fn subscribe_os() -> Result<SignalStream, ShutdownError> {
    Err(ShutdownError::Register(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "signals are not supported on this platform",
    )))
}

/// A signal source driven by hand.
///
/// Used by tests and by hosts that translate their own stop requests into
/// shutdown events. Only subscriptions that exist when [`raise`](Self::raise)
/// is called receive the signal.
///
/// Each subscription buffers at most `buffer` undelivered signals (see
/// [`with_buffer`](Self::with_buffer)). A subscription whose listener is
/// parked delivering to a full channel while more than `buffer` signals are
/// raised loses the oldest ones; the loss is logged at `warn`.
#[derive(Debug, Clone)]
pub struct ManualSignalSource {
    sender: broadcast::Sender<ShutdownSignal>,
}

impl ManualSignalSource {
    /// Create a source with no subscribers
    pub fn new() -> Self {
        Self::with_buffer(MANUAL_SOURCE_BUFFER)
    }

    /// Create a source whose subscriptions each buffer up to `buffer`
    /// undelivered signals (minimum 1)
    pub fn with_buffer(buffer: usize) -> Self {
        let (sender, _) = broadcast::channel(buffer.max(1));
        Self { sender }
    }

    /// Deliver a signal to every current subscription.
    ///
    /// Returns the number of subscriptions it reached. Subscriptions that
    /// already hold `buffer` undelivered signals drop their oldest one.
    pub fn raise(&self, signal: ShutdownSignal) -> usize {
        self.sender.send(signal).unwrap_or(0)
    }

    /// Shorthand for raising [`ShutdownSignal::Interrupt`]
    pub fn interrupt(&self) -> usize {
        self.raise(ShutdownSignal::Interrupt)
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ManualSignalSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalSource for ManualSignalSource {
    fn subscribe(&self) -> Result<SignalStream, ShutdownError> {
        let receiver = self.sender.subscribe();
        Ok(Box::pin(stream::unfold(receiver, |mut receiver| async move {
            loop {
                match receiver.recv().await {
                    Ok(signal) => return Some((signal, receiver)),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!("Signal subscription lagged, {} signals dropped", skipped);
                    }
                    Err(RecvError::Closed) => return None,
                }
            }
        })))
    }
}
