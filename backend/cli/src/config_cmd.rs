//! CLI Config Command

use std::path::Path;

use anyhow::{Context, Result, bail};
use inkforge_config::InkForgeConfig;

use crate::terminal_output::note_success;

pub fn show(config: &InkForgeConfig) -> Result<()> {
    let yaml = serde_yaml::to_string(config).context("Failed to render config")?;
    print!("{yaml}");
    Ok(())
}

pub async fn init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    let config = inkforge_config::apply_all_defaults(InkForgeConfig::default());
    inkforge_config::write_config(&config, path).await?;
    note_success(&format!("Wrote default config to {}", path.display()));
    Ok(())
}
