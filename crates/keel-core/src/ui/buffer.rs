//! In-memory UI sink

use super::sink::Ui;
use parking_lot::Mutex;

/// A captured line and the stream it was written to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiLine {
    Output(String),
    Error(String),
}

/// UI sink that records every line in order
#[derive(Debug, Default)]
pub struct BufferUi {
    lines: Mutex<Vec<UiLine>>,
}

impl BufferUi {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured lines in write order
    pub fn lines(&self) -> Vec<UiLine> {
        self.lines.lock().clone()
    }

    /// Lines written through `output`
    pub fn output_lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .iter()
            .filter_map(|line| match line {
                UiLine::Output(text) => Some(text.clone()),
                UiLine::Error(_) => None,
            })
            .collect()
    }

    /// Lines written through `error`
    pub fn error_lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .iter()
            .filter_map(|line| match line {
                UiLine::Error(text) => Some(text.clone()),
                UiLine::Output(_) => None,
            })
            .collect()
    }

    /// Regular output joined with newlines
    pub fn output_text(&self) -> String {
        self.output_lines().join("\n")
    }

    /// Error output joined with newlines
    pub fn error_text(&self) -> String {
        self.error_lines().join("\n")
    }

    /// Drop everything captured so far
    pub fn clear(&self) {
        self.lines.lock().clear();
    }
}

impl Ui for BufferUi {
    fn output(&self, line: &str) {
        self.lines.lock().push(UiLine::Output(line.to_string()));
    }

    fn error(&self, line: &str) {
        self.lines.lock().push(UiLine::Error(line.to_string()));
    }
}
