//! TUI App State
//!
//! Top-level state for the terminal editor: the collector plus what the
//! screen needs around it.

use std::path::PathBuf;

use tracing::warn;

use crate::collector::{Completion, ConversionOutcome, InputCollector};

pub const SAMPLE_DOCUMENT: &str = "# Hello, Markdown!\n\nThis is a sample text.\n\n- List item 1\n- List item 2\n\n```javascript\nconsole.log(\"Hello World!\");\n```\n";

pub struct AppState {
    pub collector: InputCollector,
    pub server_url: String,
    pub output_path: PathBuf,
    /// One-line feedback that isn't a conversion error (e.g. "Saved to ...").
    pub notice: Option<String>,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(document: impl Into<String>, server_url: String, output_path: PathBuf) -> Self {
        Self {
            collector: InputCollector::with_document(document),
            server_url,
            output_path,
            notice: None,
            should_quit: false,
        }
    }

    pub fn insert_char(&mut self, c: char) {
        let mut text = self.collector.document().to_string();
        text.push(c);
        self.replace_document(text);
    }

    pub fn insert_str(&mut self, s: &str) {
        let mut text = self.collector.document().to_string();
        text.push_str(s);
        self.replace_document(text);
    }

    pub fn backspace(&mut self) {
        let mut text = self.collector.document().to_string();
        if text.pop().is_some() {
            self.replace_document(text);
        }
    }

    pub fn clear(&mut self) {
        self.notice = None;
        self.collector.clear();
    }

    /// Writes the current PDF to the configured output path.
    pub fn save_download(&mut self) {
        let Some(handle) = self.collector.download() else {
            self.notice = Some("Nothing to save yet. Press Ctrl+S to convert.".into());
            return;
        };
        self.notice = Some(match handle.save_to(&self.output_path) {
            Ok(path) => format!("Saved {} bytes to {}", handle.len(), path.display()),
            Err(e) => {
                warn!(error = %e, path = %self.output_path.display(), "Failed to save PDF");
                format!("Could not save to {}: {e}", self.output_path.display())
            }
        });
    }

    pub fn finish_conversion(&mut self, ticket_id: u64, outcome: ConversionOutcome) -> Completion {
        self.collector.complete(ticket_id, outcome)
    }

    fn replace_document(&mut self, text: String) {
        self.notice = None;
        self.collector.set_document(text);
    }
}
