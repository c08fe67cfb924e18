//! Writer-backed UI sink

use super::sink::Ui;
use colored::Colorize;
use parking_lot::Mutex;
use std::fmt;
use std::io::{self, IsTerminal, Write};

type SharedWriter = Mutex<Box<dyn Write + Send>>;

/// UI sink writing regular output and errors to two writers.
///
/// Each line is written and flushed under the writer's lock so output from
/// concurrent commands never interleaves within a line.
pub struct BasicUi {
    writer: SharedWriter,
    error_writer: SharedWriter,
    color: bool,
}

impl BasicUi {
    /// Create a sink over arbitrary writers
    pub fn new(writer: impl Write + Send + 'static, error_writer: impl Write + Send + 'static) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
            error_writer: Mutex::new(Box::new(error_writer)),
            color: false,
        }
    }

    /// Sink over the process's stdout and stderr
    ///
    /// Error lines are colored when stderr is a terminal.
    pub fn stdio() -> Self {
        let color = io::stderr().is_terminal();
        Self::new(io::stdout(), io::stderr()).with_color(color)
    }

    /// Enable or disable colored error lines
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    fn write_line(writer: &SharedWriter, line: &str) {
        let mut writer = writer.lock();
        if let Err(e) = writeln!(writer, "{line}").and_then(|_| writer.flush()) {
            tracing::debug!("UI write failed: {}", e);
        }
    }
}

impl Ui for BasicUi {
    fn output(&self, line: &str) {
        Self::write_line(&self.writer, line);
    }

    fn error(&self, line: &str) {
        if self.color {
            Self::write_line(&self.error_writer, &line.red().to_string());
        } else {
            Self::write_line(&self.error_writer, line);
        }
    }
}

impl fmt::Debug for BasicUi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicUi")
            .field("color", &self.color)
            .finish_non_exhaustive()
    }
}
