//! Ui trait - the write-only output sink shared by all commands

/// Line-oriented output sink.
///
/// Implementations must be safe to share across every command and listener
/// in the process, so all methods take `&self`.
#[cfg_attr(test, mockall::automock)]
pub trait Ui: Send + Sync {
    /// Write one line of regular output
    fn output(&self, line: &str);

    /// Write one line of error output
    ///
    /// Sinks without a separate error stream fold errors into `output`.
    fn error(&self, line: &str) {
        self.output(line);
    }
}

/// A sink that discards every line
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopUi;

impl Ui for NoopUi {
    fn output(&self, _line: &str) {}
}
