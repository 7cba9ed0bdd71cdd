//! Input Collector
//!
//! Owns the Markdown document and the lifecycle of one conversion at a time.
//! The HTTP call itself happens elsewhere: [`InputCollector::convert`] hands
//! out a ticket, and the caller reports back through
//! [`InputCollector::complete`].
//!
//! Every `set_document`/`clear` bumps an epoch. A completion whose ticket was
//! issued under an older epoch is discarded, so a late response can never
//! attach a PDF to text it wasn't rendered from.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::download::DownloadHandle;

pub const INVALID_FILE_MESSAGE: &str = "Please drop a valid .md file.";
pub const FILE_READ_MESSAGE: &str = "Failed to read the file.";
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to convert markdown to PDF.";

const MARKDOWN_EXTENSION: &str = "md";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Busy,
    Succeeded,
    Failed,
}

#[derive(Debug, Error)]
pub enum CollectorError {
    #[error("not a markdown file: {0}")]
    InvalidInputFile(PathBuf),

    #[error("failed to read {path}: {reason}")]
    FileRead { path: PathBuf, reason: String },
}

impl CollectorError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidInputFile(_) => INVALID_FILE_MESSAGE,
            Self::FileRead { .. } => FILE_READ_MESSAGE,
        }
    }
}

/// A conversion the caller must run and report back.
#[derive(Debug, Clone)]
pub struct ConversionTicket {
    pub id: u64,
    pub markdown: String,
}

/// Result of a conversion as reported by the caller. Errors are already
/// user-facing messages.
pub type ConversionOutcome = Result<Vec<u8>, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The outcome is now the live result.
    Applied,
    /// The document changed after the request went out; the outcome was dropped.
    Stale,
    /// No conversion with this id is in flight.
    Unknown,
}

#[derive(Debug, Clone, Copy)]
struct InFlight {
    id: u64,
    epoch: u64,
}

#[derive(Debug, Default)]
pub struct InputCollector {
    document: String,
    result_phase: Option<Phase>,
    error: Option<String>,
    download: Option<DownloadHandle>,
    in_flight: Option<InFlight>,
    epoch: u64,
    next_ticket: u64,
}

impl InputCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(document: impl Into<String>) -> Self {
        Self { document: document.into(), ..Self::default() }
    }

    pub fn document(&self) -> &str {
        &self.document
    }

    pub fn phase(&self) -> Phase {
        if self.in_flight.is_some() {
            Phase::Busy
        } else {
            self.result_phase.unwrap_or(Phase::Idle)
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn download(&self) -> Option<&DownloadHandle> {
        self.download.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Whether the convert trigger is enabled.
    pub fn can_convert(&self) -> bool {
        !self.is_busy() && !self.document.trim().is_empty()
    }

    /// Replaces the document and drops any result or error shown for the old one.
    pub fn set_document(&mut self, text: impl Into<String>) {
        self.document = text.into();
        self.invalidate();
    }

    /// Loads a `.md` file as the new document. On failure the document is
    /// left untouched and the error message is shown instead.
    pub fn load_from_file(&mut self, path: &Path) -> Result<(), CollectorError> {
        match read_markdown_file(path) {
            Ok(text) => {
                info!(path = %path.display(), bytes = text.len(), "Loaded markdown file");
                self.set_document(text);
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "Rejected file");
                self.error = Some(err.user_message().to_string());
                Err(err)
            }
        }
    }

    /// A drop carrying several files only considers the first.
    pub fn load_dropped<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<(), CollectorError> {
        match paths.first() {
            Some(first) => {
                if paths.len() > 1 {
                    debug!(ignored = paths.len() - 1, "Ignoring extra dropped files");
                }
                self.load_from_file(first.as_ref())
            }
            None => Ok(()),
        }
    }

    pub fn clear(&mut self) {
        self.document.clear();
        self.invalidate();
    }

    /// Starts a conversion of the current document. Returns `None` when the
    /// trigger is disabled (empty document or already busy).
    pub fn convert(&mut self) -> Option<ConversionTicket> {
        if !self.can_convert() {
            return None;
        }

        self.download = None;
        self.error = None;
        self.result_phase = None;

        let id = self.next_ticket;
        self.next_ticket += 1;
        self.in_flight = Some(InFlight { id, epoch: self.epoch });

        debug!(ticket = id, bytes = self.document.len(), "Conversion started");
        Some(ConversionTicket { id, markdown: self.document.clone() })
    }

    /// Reports the outcome of ticket `ticket_id`.
    pub fn complete(&mut self, ticket_id: u64, outcome: ConversionOutcome) -> Completion {
        let Some(in_flight) = self.in_flight.filter(|f| f.id == ticket_id) else {
            return Completion::Unknown;
        };
        self.in_flight = None;

        if in_flight.epoch != self.epoch {
            debug!(ticket = ticket_id, "Discarding result for a replaced document");
            return Completion::Stale;
        }

        match outcome.and_then(|pdf| {
            DownloadHandle::create(&pdf).map_err(|e| {
                warn!(error = %e, "Failed to store PDF");
                GENERIC_FAILURE_MESSAGE.to_string()
            })
        }) {
            Ok(handle) => {
                info!(ticket = ticket_id, bytes = handle.len(), "Conversion succeeded");
                self.download = Some(handle);
                self.result_phase = Some(Phase::Succeeded);
            }
            Err(message) => {
                info!(ticket = ticket_id, %message, "Conversion failed");
                self.error = Some(message);
                self.result_phase = Some(Phase::Failed);
            }
        }
        Completion::Applied
    }

    fn invalidate(&mut self) {
        self.epoch += 1;
        self.download = None;
        self.error = None;
        self.result_phase = None;
    }
}

fn read_markdown_file(path: &Path) -> Result<String, CollectorError> {
    if !has_markdown_extension(path) {
        return Err(CollectorError::InvalidInputFile(path.to_path_buf()));
    }
    let bytes = std::fs::read(path).map_err(|e| CollectorError::FileRead {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    String::from_utf8(bytes).map_err(|e| CollectorError::FileRead {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

pub fn has_markdown_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(MARKDOWN_EXTENSION))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PDF: &[u8] = b"%PDF-1.7 sample";

    #[test]
    fn happy_path_transitions() {
        let mut c = InputCollector::with_document("# Hi");
        assert_eq!(c.phase(), Phase::Idle);

        let ticket = c.convert().unwrap();
        assert_eq!(c.phase(), Phase::Busy);
        assert!(!c.can_convert());
        assert_eq!(ticket.markdown, "# Hi");

        assert_eq!(c.complete(ticket.id, Ok(PDF.to_vec())), Completion::Applied);
        assert_eq!(c.phase(), Phase::Succeeded);
        assert_eq!(c.download().unwrap().read().unwrap(), PDF);
        assert_eq!(c.document(), "# Hi");
    }

    #[test]
    fn failure_keeps_message() {
        let mut c = InputCollector::with_document("text");
        let ticket = c.convert().unwrap();
        c.complete(ticket.id, Err("Failed to generate PDF".into()));
        assert_eq!(c.phase(), Phase::Failed);
        assert_eq!(c.error(), Some("Failed to generate PDF"));
        assert!(c.download().is_none());
    }

    #[test]
    fn whitespace_document_does_not_convert() {
        let mut c = InputCollector::with_document("  \n\t ");
        assert!(c.convert().is_none());
        assert_eq!(c.phase(), Phase::Idle);
        assert!(InputCollector::new().convert().is_none());
    }

    #[test]
    fn second_convert_while_busy_is_ignored() {
        let mut c = InputCollector::with_document("text");
        let first = c.convert().unwrap();
        assert!(c.convert().is_none());
        assert_eq!(c.complete(first.id, Ok(PDF.to_vec())), Completion::Applied);
    }

    #[test]
    fn clear_during_flight_discards_result() {
        let mut c = InputCollector::with_document("text");
        let ticket = c.convert().unwrap();
        c.clear();
        assert_eq!(c.phase(), Phase::Busy);

        assert_eq!(c.complete(ticket.id, Ok(PDF.to_vec())), Completion::Stale);
        assert_eq!(c.phase(), Phase::Idle);
        assert!(c.download().is_none());
        assert_eq!(c.document(), "");
    }

    #[test]
    fn edit_during_flight_discards_result() {
        let mut c = InputCollector::with_document("old");
        let ticket = c.convert().unwrap();
        c.set_document("new");
        assert_eq!(c.complete(ticket.id, Err("boom".into())), Completion::Stale);
        assert!(c.error().is_none());
        assert!(c.can_convert());
    }

    #[test]
    fn unknown_ticket_is_ignored() {
        let mut c = InputCollector::with_document("text");
        let ticket = c.convert().unwrap();
        assert_eq!(c.complete(ticket.id + 7, Ok(PDF.to_vec())), Completion::Unknown);
        assert!(c.is_busy());
    }

    #[test]
    fn new_conversion_releases_previous_handle() {
        let mut c = InputCollector::with_document("text");
        let t = c.convert().unwrap();
        c.complete(t.id, Ok(PDF.to_vec()));
        let old_path = c.download().unwrap().path().to_path_buf();

        let t = c.convert().unwrap();
        assert!(!old_path.exists());
        assert!(c.download().is_none());
        c.complete(t.id, Ok(PDF.to_vec()));
        assert_ne!(c.download().unwrap().path(), old_path);
    }

    #[test]
    fn edit_and_teardown_release_handle() {
        let mut c = InputCollector::with_document("text");
        let t = c.convert().unwrap();
        c.complete(t.id, Ok(PDF.to_vec()));
        let path = c.download().unwrap().path().to_path_buf();
        c.set_document("changed");
        assert!(!path.exists());
        assert_eq!(c.phase(), Phase::Idle);

        let t = c.convert().unwrap();
        c.complete(t.id, Ok(PDF.to_vec()));
        let path = c.download().unwrap().path().to_path_buf();
        drop(c);
        assert!(!path.exists());
    }

    #[test]
    fn loads_markdown_file_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.MD");
        let text = "# Title\r\n\nünïcödé body\n";
        std::fs::write(&path, text).unwrap();

        let mut c = InputCollector::new();
        c.load_from_file(&path).unwrap();
        assert_eq!(c.document(), text);
        assert!(c.error().is_none());
    }

    #[test]
    fn rejects_wrong_extension_without_touching_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "hello").unwrap();

        let mut c = InputCollector::with_document("keep me");
        let err = c.load_from_file(&path).unwrap_err();
        assert!(matches!(err, CollectorError::InvalidInputFile(_)));
        assert_eq!(c.document(), "keep me");
        assert_eq!(c.error(), Some(INVALID_FILE_MESSAGE));
    }

    #[test]
    fn unreadable_file_reports_read_failure() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone.md");
        let binary = dir.path().join("binary.md");
        std::fs::write(&binary, [0xff, 0xfe, 0x00]).unwrap();

        let mut c = InputCollector::with_document("keep me");
        for path in [missing, binary] {
            assert!(matches!(c.load_from_file(&path), Err(CollectorError::FileRead { .. })));
            assert_eq!(c.error(), Some(FILE_READ_MESSAGE));
            assert_eq!(c.document(), "keep me");
        }
    }

    #[test]
    fn drop_uses_first_file_only() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("a.md");
        let second = dir.path().join("b.md");
        std::fs::write(&first, "first").unwrap();
        std::fs::write(&second, "second").unwrap();

        let mut c = InputCollector::new();
        c.load_dropped(&[first, second]).unwrap();
        assert_eq!(c.document(), "first");
    }
}
