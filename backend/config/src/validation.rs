//! Config validation: checks with user-friendly error messages.

use crate::schema::InkForgeConfig;
use std::net::IpAddr;
use thiserror::Error;

/// Upper bound past which a render timeout is almost certainly a typo.
const MAX_SENSIBLE_TIMEOUT_SECS: u64 = 600;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError { path: path.into(), message: message.into() });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError { path: path.into(), message: message.into() });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &InkForgeConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_gateway(config, &mut report);
    validate_render(config, &mut report);
    validate_logging(config, &mut report);
    validate_client(config, &mut report);
    report
}

fn validate_gateway(config: &InkForgeConfig, report: &mut ValidationReport) {
    let Some(gw) = &config.gateway else { return };
    if let Some(bind) = &gw.bind {
        if bind.parse::<IpAddr>().is_err() {
            report.error("gateway.bind", format!("'{bind}' is not an IP address"));
        }
    }
    match gw.port {
        Some(0) => report.error("gateway.port", "Port must be > 0"),
        Some(port) if port < 1024 => report.warn(
            "gateway.port",
            format!("Port {port} requires elevated privileges; consider using a port >= 1024"),
        ),
        _ => {}
    }
    if gw.max_body_bytes == Some(0) {
        report.error("gateway.max_body_bytes", "Body limit must be > 0");
    }
}

fn validate_render(config: &InkForgeConfig, report: &mut ValidationReport) {
    let Some(render) = &config.render else { return };
    match render.timeout_secs {
        Some(0) => report.error("render.timeout_secs", "Render timeout must be > 0"),
        Some(secs) if secs > MAX_SENSIBLE_TIMEOUT_SECS => report.warn(
            "render.timeout_secs",
            format!("{secs}s is a very long render timeout; stuck renders will hold a browser"),
        ),
        _ => {}
    }
    if let Some(path) = &render.chrome_path {
        if !path.exists() {
            report.warn(
                "render.chrome_path",
                format!("{} does not exist; rendering will fail", path.display()),
            );
        }
    }
    if render.sandbox == Some(false) {
        report.warn("render.sandbox", "Chrome sandbox is disabled");
    }
}

fn validate_logging(config: &InkForgeConfig, report: &mut ValidationReport) {
    let Some(level) = config.logging.as_ref().and_then(|l| l.level.as_deref()) else { return };
    // Directive lists like "info,inkforge_gateway=debug" are passed through.
    if !level.contains('=') && !level.contains(',') && !LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
        report.error("logging.level", format!("Unknown log level '{level}'"));
    }
}

fn validate_client(config: &InkForgeConfig, report: &mut ValidationReport) {
    let Some(url) = config.client.as_ref().and_then(|c| c.server_url.as_deref()) else { return };
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        report.error("client.server_url", format!("'{url}' must start with http:// or https://"));
    }
}
