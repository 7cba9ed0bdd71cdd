//! CLI Status Command
//!
//! Reports whether the conversion service is up.

use anyhow::Result;
use inkforge_config::InkForgeConfig;
use serde_json::Value;
use tui::ConvertClient;

use crate::terminal_output::{Column, note_error, note_success, render_table};

pub async fn run(config: &InkForgeConfig, server: Option<String>) -> Result<()> {
    let server_url = server.unwrap_or_else(|| config.server_url().to_string());
    let client = ConvertClient::new(&server_url, std::time::Duration::from_secs(5))?;

    match client.health().await {
        Ok(body) => {
            note_success(&format!("InkForge is running at {server_url}"));
            print!("{}", health_table(&body));
        }
        Err(e) => {
            note_error(&format!("InkForge is not reachable at {server_url}: {e}"));
        }
    }
    Ok(())
}

fn health_table(body: &Value) -> String {
    let rows: Vec<Vec<String>> = match body.as_object() {
        Some(map) => map
            .iter()
            .map(|(key, value)| {
                let value = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                vec![key.clone(), value]
            })
            .collect(),
        None => vec![vec!["response".to_string(), body.to_string()]],
    };
    render_table(&[Column::left("Field"), Column::left("Value")], &rows)
}
