//! Download Handle
//!
//! The PDF from the last successful conversion, parked in a temp file until
//! the user saves it. The file is deleted when the handle is dropped.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use inkforge_core::PDF_FILENAME;
use tempfile::NamedTempFile;
use tracing::debug;

#[derive(Debug)]
pub struct DownloadHandle {
    file: NamedTempFile,
    len: usize,
}

impl DownloadHandle {
    pub fn create(pdf: &[u8]) -> io::Result<Self> {
        let mut file = tempfile::Builder::new().prefix("inkforge-").suffix(".pdf").tempfile()?;
        file.write_all(pdf)?;
        file.flush()?;
        debug!(path = %file.path().display(), bytes = pdf.len(), "Created download handle");
        Ok(Self { file, len: pdf.len() })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn suggested_filename(&self) -> &'static str {
        PDF_FILENAME
    }

    pub fn read(&self) -> io::Result<Vec<u8>> {
        std::fs::read(self.path())
    }

    /// Copies the PDF to `dest`. A directory gets `output.pdf` inside it.
    pub fn save_to(&self, dest: &Path) -> io::Result<PathBuf> {
        let target =
            if dest.is_dir() { dest.join(self.suggested_filename()) } else { dest.to_path_buf() };
        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::copy(self.path(), &target)?;
        Ok(target)
    }
}

impl Drop for DownloadHandle {
    fn drop(&mut self) {
        debug!(path = %self.file.path().display(), "Released download handle");
    }
}
