//! Render stage for InkForge.
//!
//! Every conversion launches its own headless Chrome, prints the composed
//! HTML to PDF, and tears the browser down before returning.

pub mod context;
pub mod deadline;
pub mod launcher;
pub mod page_control;
pub mod pdf;
pub mod renderer;

pub use context::RenderContext;
pub use deadline::{Deadline, run_blocking};
pub use launcher::{BrowserOptions, resolve_executable};
pub use renderer::ChromeRenderer;
