//! Render Context
//!
//! Owns everything one conversion acquires: the HTML file handed to Chrome
//! and the Chrome process itself. Dropping the context releases both, which
//! happens on every exit path of a render, including errors and panics.

use std::io::Write;
use std::path::Path;
use std::time::Instant;

use headless_chrome::Browser;
use inkforge_core::ConvertError;
use tempfile::NamedTempFile;
use tracing::debug;
use url::Url;

use crate::launcher::{self, BrowserOptions};

pub struct RenderContext {
    // Field order matters: Chrome must exit before its input file is removed.
    browser: Browser,
    document: NamedTempFile,
    started: Instant,
}

impl RenderContext {
    /// Persists `html` and launches a dedicated browser for it.
    pub fn acquire(html: &str, options: &BrowserOptions) -> Result<Self, ConvertError> {
        let document = persist_html(html)?;
        let browser = launcher::launch(options)?;
        Ok(Self { browser, document, started: Instant::now() })
    }

    pub fn browser(&self) -> &Browser {
        &self.browser
    }

    /// `file://` URL of the persisted document.
    pub fn document_url(&self) -> Result<String, ConvertError> {
        file_url(self.document.path())
    }
}

impl Drop for RenderContext {
    fn drop(&mut self) {
        debug!(
            elapsed_ms = self.started.elapsed().as_millis() as u64,
            "Render context torn down"
        );
    }
}

fn persist_html(html: &str) -> Result<NamedTempFile, ConvertError> {
    let mut file = tempfile::Builder::new()
        .prefix("inkforge-")
        .suffix(".html")
        .tempfile()?;
    file.write_all(html.as_bytes())?;
    file.flush()?;
    Ok(file)
}

pub(crate) fn file_url(path: &Path) -> Result<String, ConvertError> {
    Url::from_file_path(path)
        .map(String::from)
        .map_err(|_| ConvertError::Render(format!("not an absolute path: {}", path.display())))
}
