//! HTML Document Composition
//!
//! Wraps a rendered fragment in a standalone HTML page carrying the static
//! stylesheet. The stylesheet is compiled into the binary and never changes
//! at runtime.

/// Stylesheet approximating GitHub's rendered Markdown.
pub const STYLESHEET: &str = include_str!("../assets/markdown.css");

/// `<title>` of every composed document.
pub const DOCUMENT_TITLE: &str = "Markdown to PDF";

/// Builds the full HTML document around `fragment`.
pub fn compose_document(fragment: &str) -> String {
    let mut page = String::with_capacity(fragment.len() + STYLESHEET.len() + 256);
    page.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    page.push_str("<meta charset=\"UTF-8\">\n");
    page.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    page.push_str("<title>");
    page.push_str(DOCUMENT_TITLE);
    page.push_str("</title>\n<style>\n");
    page.push_str(STYLESHEET);
    page.push_str("</style>\n</head>\n<body>\n");
    page.push_str(fragment);
    page.push_str("</body>\n</html>\n");
    page
}
