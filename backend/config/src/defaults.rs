//! Config defaults: applies default values to parsed config.

use crate::schema::{ClientConfig, GatewayConfig, InkForgeConfig, LoggingConfig, RenderConfig};

pub const DEFAULT_BIND: &str = "127.0.0.1";

pub const DEFAULT_PORT: u16 = 3000;

/// 5 MiB request body limit.
pub const DEFAULT_MAX_BODY_BYTES: usize = 5 * 1024 * 1024;

pub const DEFAULT_RENDER_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_LOG_LEVEL: &str = "info";

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3000";

pub const DEFAULT_OUTPUT_PATH: &str = "output.pdf";

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: InkForgeConfig) -> InkForgeConfig {
    let config = apply_gateway_defaults(config);
    let config = apply_render_defaults(config);
    let config = apply_logging_defaults(config);
    apply_client_defaults(config)
}

fn apply_gateway_defaults(mut config: InkForgeConfig) -> InkForgeConfig {
    let gateway = config.gateway.get_or_insert_with(GatewayConfig::default);
    gateway.bind.get_or_insert_with(|| DEFAULT_BIND.to_string());
    gateway.port.get_or_insert(DEFAULT_PORT);
    gateway.max_body_bytes.get_or_insert(DEFAULT_MAX_BODY_BYTES);
    gateway.cors.get_or_insert(true);
    config
}

/// Chrome path stays unset so `headless_chrome` can auto-detect it.
fn apply_render_defaults(mut config: InkForgeConfig) -> InkForgeConfig {
    let render = config.render.get_or_insert_with(RenderConfig::default);
    render.timeout_secs.get_or_insert(DEFAULT_RENDER_TIMEOUT_SECS);
    render.sandbox.get_or_insert(true);
    render.disable_javascript.get_or_insert(true);
    config
}

fn apply_logging_defaults(mut config: InkForgeConfig) -> InkForgeConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    logging.level.get_or_insert_with(|| DEFAULT_LOG_LEVEL.to_string());
    logging.json.get_or_insert(false);
    config
}

fn apply_client_defaults(mut config: InkForgeConfig) -> InkForgeConfig {
    let client = config.client.get_or_insert_with(ClientConfig::default);
    client.server_url.get_or_insert_with(|| DEFAULT_SERVER_URL.to_string());
    client.output_path.get_or_insert_with(|| DEFAULT_OUTPUT_PATH.into());
    config
}
