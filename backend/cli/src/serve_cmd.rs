//! CLI Serve Command
//!
//! Wires config into the Chrome renderer and starts the gateway.

use std::sync::Arc;

use anyhow::{Context, Result};
use inkforge_browser::{BrowserOptions, ChromeRenderer};
use inkforge_config::InkForgeConfig;
use inkforge_core::PdfOptions;
use inkforge_gateway::{GatewayOptions, GatewayState};
use tracing::info;

pub async fn run(mut config: InkForgeConfig, port: Option<u16>, bind: Option<String>) -> Result<()> {
    let gateway = config.gateway.get_or_insert_with(Default::default);
    if let Some(port) = port {
        gateway.port = Some(port);
    }
    if let Some(bind) = bind {
        gateway.bind = Some(bind);
    }
    let addr = config.gateway_addr().context("Invalid listen address")?;

    let renderer = ChromeRenderer::new(browser_options(&config));
    info!(
        %addr,
        timeout_secs = config.render_timeout().as_secs(),
        sandbox = config.sandbox(),
        chrome_path = ?config.chrome_path(),
        "Starting InkForge conversion service"
    );

    let state = GatewayState::new(Arc::new(renderer), PdfOptions::a4());
    let options = GatewayOptions { max_body_bytes: config.max_body_bytes(), cors: config.cors() };
    inkforge_gateway::start_server(addr, state, options).await
}

pub fn browser_options(config: &InkForgeConfig) -> BrowserOptions {
    BrowserOptions {
        chrome_path: config.chrome_path().cloned(),
        sandbox: config.sandbox(),
        disable_javascript: config.disable_javascript(),
        timeout: config.render_timeout(),
    }
}
