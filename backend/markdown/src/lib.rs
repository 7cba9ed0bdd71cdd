//! Markdown to HTML pipeline for PDF rendering.
//!
//! Parses GitHub-Flavored Markdown into an HTML fragment with highlighted
//! code blocks, then composes the fragment into a standalone, styled HTML
//! document ready for the browser render stage.

pub mod autolink;
pub mod code_block;
pub mod document;
pub mod renderer;

pub use code_block::CodeBlockHighlighter;
pub use document::{compose_document, DOCUMENT_TITLE, STYLESHEET};
pub use renderer::MarkdownRenderer;

use anyhow::Result;

/// Parse `markdown` and compose the full HTML document in one step.
pub fn render_document(markdown: &str) -> Result<String> {
    let fragment = MarkdownRenderer::new().to_html(markdown)?;
    Ok(compose_document(&fragment))
}
