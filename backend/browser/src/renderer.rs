//! Chrome PDF Renderer
//!
//! [`PdfRenderer`] backed by one headless Chrome per call. The blocking
//! DevTools work runs on the blocking pool, and both sides honour the same
//! render timeout.

use async_trait::async_trait;
use inkforge_core::{ConvertError, PdfOptions, PdfRenderer};
use tracing::{info, instrument};

use crate::context::RenderContext;
use crate::deadline::{self, Deadline};
use crate::launcher::BrowserOptions;
use crate::{page_control, pdf};

pub struct ChromeRenderer {
    options: BrowserOptions,
}

impl ChromeRenderer {
    pub fn new(options: BrowserOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &BrowserOptions {
        &self.options
    }

    /// Synchronous render under `options.timeout`.
    ///
    /// Page work runs on a worker thread so a hung load or print cannot hold
    /// Chrome past the deadline: the context is dropped, and Chrome shut
    /// down, as soon as this function returns, whichever way it returns.
    pub fn render_blocking(
        html: &str,
        pdf_options: &PdfOptions,
        options: &BrowserOptions,
    ) -> Result<Vec<u8>, ConvertError> {
        let deadline = Deadline::after(options.timeout);
        let context = RenderContext::acquire(html, options)?;
        let tab = page_control::open_tab(context.browser(), deadline.remaining()?)?;
        let url = context.document_url()?;
        let disable_javascript = options.disable_javascript;
        let pdf_options = pdf_options.clone();

        deadline.run(move || {
            if disable_javascript {
                page_control::disable_scripts(&tab)?;
            }
            page_control::load(&tab, &url)?;
            pdf::print(&tab, &pdf_options)
        })
    }
}

#[async_trait]
impl PdfRenderer for ChromeRenderer {
    fn name(&self) -> &str {
        "chrome"
    }

    #[instrument(skip_all, fields(html_bytes = html.len()))]
    async fn render(&self, html: &str, options: &PdfOptions) -> Result<Vec<u8>, ConvertError> {
        let html = html.to_owned();
        let pdf_options = options.clone();
        let browser_options = self.options.clone();

        let pdf = deadline::run_blocking(self.options.timeout, move || {
            Self::render_blocking(&html, &pdf_options, &browser_options)
        })
        .await?;
        info!("Chrome render finished");
        Ok(pdf)
    }
}
