//! CLI UI Command
//!
//! Launches the terminal editor against a running conversion service.

use std::path::PathBuf;

use anyhow::{Context, Result};
use inkforge_config::InkForgeConfig;
use tui::{InputCollector, SAMPLE_DOCUMENT, UiOptions};

pub async fn run(config: &InkForgeConfig, file: Option<PathBuf>, server: Option<String>) -> Result<()> {
    let document = match file {
        Some(path) => {
            // Same acceptance rules as a file dropped into the editor.
            let mut collector = InputCollector::new();
            collector
                .load_from_file(&path)
                .map_err(|e| anyhow::anyhow!("{} ({e})", e.user_message()))
                .with_context(|| format!("Cannot open {}", path.display()))?;
            collector.document().to_string()
        }
        None => SAMPLE_DOCUMENT.to_string(),
    };

    tui::run_ui(UiOptions {
        server_url: server.unwrap_or_else(|| config.server_url().to_string()),
        output_path: config.output_path(),
        document,
        request_timeout: tui::request_timeout_for(config.render_timeout()),
    })
    .await
}
