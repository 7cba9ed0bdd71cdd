//! PDF Printing
//!
//! Maps [`PdfOptions`] onto the DevTools `Page.printToPDF` parameters.

use headless_chrome::types::PrintToPdfOptions;
use headless_chrome::Tab;
use inkforge_core::{ConvertError, PdfOptions};
use tracing::info;

const PDF_MAGIC: &[u8] = b"%PDF";

/// Translates page layout into print parameters (inches).
pub fn print_options(options: &PdfOptions) -> PrintToPdfOptions {
    let margin = options.margin_in();
    PrintToPdfOptions {
        landscape: Some(options.landscape),
        display_header_footer: Some(false),
        print_background: Some(options.print_background),
        paper_width: Some(options.paper_width_in()),
        paper_height: Some(options.paper_height_in()),
        margin_top: Some(margin),
        margin_bottom: Some(margin),
        margin_left: Some(margin),
        margin_right: Some(margin),
        prefer_css_page_size: Some(false),
        ..Default::default()
    }
}

/// Prints the loaded page and checks the result really is a PDF.
pub fn print(tab: &Tab, options: &PdfOptions) -> Result<Vec<u8>, ConvertError> {
    let bytes = tab
        .print_to_pdf(Some(print_options(options)))
        .map_err(|e| ConvertError::Render(format!("printToPDF failed: {e}")))?;
    ensure_pdf(&bytes)?;
    info!(bytes = bytes.len(), "Printed PDF");
    Ok(bytes)
}

pub(crate) fn ensure_pdf(bytes: &[u8]) -> Result<(), ConvertError> {
    if bytes.starts_with(PDF_MAGIC) {
        Ok(())
    } else {
        Err(ConvertError::Render(format!(
            "browser returned {} bytes without a PDF header",
            bytes.len()
        )))
    }
}
