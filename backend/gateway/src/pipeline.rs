//! Conversion Pipeline
//!
//! Runs the three stages in order: Markdown to HTML, document composition,
//! then the injected PDF renderer. Holds no per-request state.

use std::sync::Arc;

use inkforge_core::{ConvertError, PdfOptions, PdfRenderer};
use tracing::debug;

#[derive(Clone)]
pub struct ConversionService {
    renderer: Arc<dyn PdfRenderer>,
    pdf_options: PdfOptions,
}

impl ConversionService {
    pub fn new(renderer: Arc<dyn PdfRenderer>, pdf_options: PdfOptions) -> Self {
        Self { renderer, pdf_options }
    }

    pub fn renderer_name(&self) -> &str {
        self.renderer.name()
    }

    /// Parse and compose stages: the full HTML document handed to the renderer.
    pub async fn compose_html(&self, markdown: &str) -> Result<String, ConvertError> {
        let markdown = markdown.to_owned();
        // Highlighting large documents is CPU-bound; keep it off the reactor.
        tokio::task::spawn_blocking(move || markdown::render_document(&markdown))
            .await
            .map_err(|e| ConvertError::Markdown(format!("markdown task failed: {e}")))?
            .map_err(|e| ConvertError::Markdown(format!("{e:#}")))
    }

    /// All three stages.
    pub async fn convert(&self, markdown: &str) -> Result<Vec<u8>, ConvertError> {
        let html = self.compose_html(markdown).await?;
        debug!(html_bytes = html.len(), renderer = self.renderer.name(), "Composed HTML document");
        self.renderer.render(&html, &self.pdf_options).await
    }
}
