//! CLI Doctor Command
//!
//! Checks that everything a conversion needs is in place.

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use inkforge_config::InkForgeConfig;
use tui::ConvertClient;

use crate::serve_cmd::browser_options;
use crate::terminal_output::{note_error, note_info, note_success, note_warn};

pub async fn run(config_path: &Path) -> Result<()> {
    println!("\nRunning InkForge doctor...\n");

    let Some(config) = check_config(config_path).await else {
        return Ok(());
    };
    let chrome_ok = check_chrome(&config);
    check_service(&config).await;

    println!();
    if chrome_ok {
        note_success("This machine can serve conversions.");
    } else {
        note_error("Conversions will fail until Chrome is available.");
    }
    Ok(())
}

async fn check_config(path: &Path) -> Option<InkForgeConfig> {
    if !path.exists() {
        note_info(&format!("No config at {}; using defaults", path.display()));
    }
    let raw = match inkforge_config::load_config(path).await {
        Ok(raw) => raw,
        Err(e) => {
            note_error(&format!("{e:#}"));
            return None;
        }
    };
    let config = match inkforge_config::apply_env_overrides(raw) {
        Ok(config) => inkforge_config::apply_all_defaults(config),
        Err(e) => {
            note_error(&format!("{e:#}"));
            return None;
        }
    };

    let report = inkforge_config::validate(&config);
    for warning in &report.warnings {
        note_warn(&warning.to_string());
    }
    for error in &report.errors {
        note_error(&error.to_string());
    }
    if report.is_valid() {
        note_success("Config is valid");
        Some(config)
    } else {
        None
    }
}

fn check_chrome(config: &InkForgeConfig) -> bool {
    match inkforge_browser::resolve_executable(&browser_options(config)) {
        Ok(path) => {
            note_success(&format!("Chrome found at {}", path.display()));
            if !config.sandbox() {
                note_warn("Chrome sandbox is disabled");
            }
            true
        }
        Err(e) => {
            note_error(&e.to_string());
            false
        }
    }
}

async fn check_service(config: &InkForgeConfig) {
    let url = config.server_url();
    let client = match ConvertClient::new(url, Duration::from_secs(3)) {
        Ok(client) => client,
        Err(e) => {
            note_error(&e.to_string());
            return;
        }
    };
    match client.health().await {
        Ok(_) => note_success(&format!("Service responding at {url}")),
        Err(_) => note_info(&format!("No service running at {url} (start one with `inkforge serve`)")),
    }
}
