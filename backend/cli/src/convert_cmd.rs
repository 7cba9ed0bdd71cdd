//! CLI Convert Command
//!
//! One-shot conversion through the service, driven by the same collector the
//! terminal editor uses.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use inkforge_config::InkForgeConfig;
use tui::{Completion, ConvertClient, InputCollector};

use crate::terminal_output::note_success;

pub async fn run(
    config: &InkForgeConfig,
    input: &Path,
    output: Option<PathBuf>,
    server: Option<String>,
) -> Result<()> {
    let server_url = server.unwrap_or_else(|| config.server_url().to_string());
    let output = output.unwrap_or_else(|| config.output_path());
    let client = ConvertClient::new(&server_url, tui::request_timeout_for(config.render_timeout()))?;

    let saved = convert_file(&client, input, &output).await?;
    note_success(&format!("Wrote {}", saved.display()));
    Ok(())
}

pub async fn convert_file(client: &ConvertClient, input: &Path, output: &Path) -> Result<PathBuf> {
    let mut collector = InputCollector::new();
    collector
        .load_from_file(input)
        .map_err(|e| anyhow!("{} ({e})", e.user_message()))?;

    let Some(ticket) = collector.convert() else {
        bail!("{} is empty; nothing to convert", input.display());
    };

    let outcome = client.convert(&ticket.markdown).await.map_err(|e| e.user_message());
    if collector.complete(ticket.id, outcome) != Completion::Applied {
        bail!("Conversion result was discarded");
    }
    if let Some(error) = collector.error() {
        bail!("{error}");
    }

    let handle = collector.download().context("Service returned no PDF")?;
    handle
        .save_to(output)
        .with_context(|| format!("Failed to write {}", output.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn rejects_non_markdown_before_any_request() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("notes.txt");
        std::fs::write(&input, "# Hi").unwrap();

        // Nothing listens on port 9; a request would fail with a network error instead.
        let client = ConvertClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        let err = convert_file(&client, &input, &dir.path().join("out.pdf")).await.unwrap_err();
        assert!(err.to_string().contains("Please drop a valid .md file."));
    }

    #[tokio::test]
    async fn empty_file_is_not_sent() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("empty.md");
        std::fs::write(&input, "  \n").unwrap();

        let client = ConvertClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        let err = convert_file(&client, &input, &dir.path().join("out.pdf")).await.unwrap_err();
        assert!(err.to_string().contains("nothing to convert"));
    }
}
