//! InkForge runtime configuration schema.
//!
//! Every field is optional on disk; [`crate::apply_all_defaults`] fills the
//! gaps and the accessor methods fall back to the same defaults.

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use crate::defaults::{
    DEFAULT_BIND, DEFAULT_LOG_LEVEL, DEFAULT_MAX_BODY_BYTES, DEFAULT_OUTPUT_PATH, DEFAULT_PORT,
    DEFAULT_RENDER_TIMEOUT_SECS, DEFAULT_SERVER_URL,
};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InkForgeConfig {
    /// Conversion service HTTP settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway: Option<GatewayConfig>,

    /// Headless browser rendering
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub render: Option<RenderConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,

    /// Terminal client and one-shot `convert` command
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<ClientConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// Request bodies above this size are answered with 413.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_body_bytes: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cors: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Chrome/Chromium binary; auto-detected when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chrome_path: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sandbox: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_javascript: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    /// Directory for rotated NDJSON log files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,

    /// JSON console output instead of plain lines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_url: Option<String>,

    /// Where the terminal client saves the downloaded PDF.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_path: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Resolved accessors
// ---------------------------------------------------------------------------

impl InkForgeConfig {
    pub fn bind(&self) -> &str {
        self.gateway.as_ref().and_then(|g| g.bind.as_deref()).unwrap_or(DEFAULT_BIND)
    }

    pub fn port(&self) -> u16 {
        self.gateway.as_ref().and_then(|g| g.port).unwrap_or(DEFAULT_PORT)
    }

    /// Socket address the gateway listens on.
    pub fn gateway_addr(&self) -> anyhow::Result<SocketAddr> {
        let ip: IpAddr = self
            .bind()
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid gateway.bind '{}': {e}", self.bind()))?;
        Ok(SocketAddr::new(ip, self.port()))
    }

    pub fn max_body_bytes(&self) -> usize {
        self.gateway.as_ref().and_then(|g| g.max_body_bytes).unwrap_or(DEFAULT_MAX_BODY_BYTES)
    }

    pub fn cors(&self) -> bool {
        self.gateway.as_ref().and_then(|g| g.cors).unwrap_or(true)
    }

    pub fn chrome_path(&self) -> Option<&PathBuf> {
        self.render.as_ref().and_then(|r| r.chrome_path.as_ref())
    }

    pub fn render_timeout(&self) -> Duration {
        let secs = self
            .render
            .as_ref()
            .and_then(|r| r.timeout_secs)
            .unwrap_or(DEFAULT_RENDER_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }

    pub fn sandbox(&self) -> bool {
        self.render.as_ref().and_then(|r| r.sandbox).unwrap_or(true)
    }

    pub fn disable_javascript(&self) -> bool {
        self.render.as_ref().and_then(|r| r.disable_javascript).unwrap_or(true)
    }

    pub fn log_level(&self) -> &str {
        self.logging.as_ref().and_then(|l| l.level.as_deref()).unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_dir(&self) -> Option<&PathBuf> {
        self.logging.as_ref().and_then(|l| l.dir.as_ref())
    }

    pub fn log_json(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }

    pub fn server_url(&self) -> &str {
        self.client.as_ref().and_then(|c| c.server_url.as_deref()).unwrap_or(DEFAULT_SERVER_URL)
    }

    pub fn output_path(&self) -> PathBuf {
        self.client
            .as_ref()
            .and_then(|c| c.output_path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_PATH))
    }
}
