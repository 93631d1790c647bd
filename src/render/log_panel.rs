//! Log panel state

use serde::Serialize;

/// Identifier of the log display surface
pub const LOG_SURFACE_ID: &str = "logBox";

/// Lines shown in the log panel, one entry per line, verbatim
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LogPanel {
    lines: Vec<String>,
    revision: u64,
}

impl LogPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the displayed content
    pub fn replace(&mut self, lines: Vec<String>) {
        self.lines = lines;
        self.revision += 1;
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Displayed text, lines joined by newlines
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}
