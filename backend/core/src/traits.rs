use async_trait::async_trait;

use crate::error::ConvertError;
use crate::types::PdfOptions;

/// Turns a complete HTML document into PDF bytes.
///
/// Implementations must not share rendering state between calls: every call
/// acquires its own rendering context and releases it before returning,
/// on success and on every error path.
#[async_trait]
pub trait PdfRenderer: Send + Sync {
    /// Renderer name for logs (e.g., "chrome").
    fn name(&self) -> &str;

    /// Render `html` into a paginated PDF laid out according to `options`.
    async fn render(&self, html: &str, options: &PdfOptions) -> Result<Vec<u8>, ConvertError>;
}
