//! Environment handling for config values.
//!
//! Two mechanisms:
//! - `${VAR_NAME}` references inside string values, resolved at load time
//!   (`$${VAR}` escapes to a literal `${VAR}`).
//! - `INKFORGE_*` overrides that replace individual settings outright.

use anyhow::{Context, Result, bail};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;

use crate::schema::{ClientConfig, GatewayConfig, InkForgeConfig, LoggingConfig, RenderConfig};

pub const ENV_CONFIG_DIR: &str = "INKFORGE_CONFIG_DIR";
pub const ENV_BIND: &str = "INKFORGE_BIND";
pub const ENV_PORT: &str = "INKFORGE_PORT";
pub const ENV_CHROME_PATH: &str = "INKFORGE_CHROME_PATH";
pub const ENV_RENDER_TIMEOUT_SECS: &str = "INKFORGE_RENDER_TIMEOUT_SECS";
pub const ENV_SERVER_URL: &str = "INKFORGE_SERVER_URL";
pub const ENV_LOG_LEVEL: &str = "INKFORGE_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "INKFORGE_LOG_DIR";

/// `${VAR}` or `$${VAR}`; group 1 holds the escape, group 2 the name.
static ENV_REF_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\$?)\$\{([A-Z_][A-Z0-9_]*)\}").expect("valid env ref pattern"));

#[derive(Debug, thiserror::Error)]
#[error("Missing env var \"{var_name}\" referenced at config path: {config_path}")]
pub struct MissingEnvVarError {
    pub var_name: String,
    pub config_path: String,
}

/// Substitute `${VAR}` references in a config value tree from the process env.
pub fn resolve_env_vars(value: &Value) -> Result<Value> {
    resolve_env_vars_with(value, &std::env::vars().collect())
}

/// Substitute `${VAR}` references using `env`. Unset or empty variables are errors.
pub fn resolve_env_vars_with(value: &Value, env: &HashMap<String, String>) -> Result<Value> {
    substitute_value(value, env, "")
}

fn substitute_value(value: &Value, env: &HashMap<String, String>, path: &str) -> Result<Value> {
    match value {
        Value::String(s) => Ok(Value::String(substitute_string(s, env, path)?)),
        Value::Array(arr) => arr
            .iter()
            .enumerate()
            .map(|(i, v)| substitute_value(v, env, &format!("{path}[{i}]")))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        Value::Object(map) => {
            let mut result = serde_json::Map::new();
            for (k, v) in map {
                let child_path = if path.is_empty() { k.clone() } else { format!("{path}.{k}") };
                result.insert(k.clone(), substitute_value(v, env, &child_path)?);
            }
            Ok(Value::Object(result))
        }
        other => Ok(other.clone()),
    }
}

fn substitute_string(s: &str, env: &HashMap<String, String>, path: &str) -> Result<String> {
    if !s.contains('$') {
        return Ok(s.to_string());
    }

    let mut out = String::with_capacity(s.len());
    let mut last = 0;
    for caps in ENV_REF_PATTERN.captures_iter(s) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(2)) else { continue };
        out.push_str(&s[last..whole.start()]);
        last = whole.end();

        let escaped = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
        if escaped {
            out.push_str(&whole.as_str()[1..]);
            continue;
        }
        match env.get(name.as_str()) {
            Some(val) if !val.is_empty() => out.push_str(val),
            _ => bail!(MissingEnvVarError {
                var_name: name.as_str().to_string(),
                config_path: path.to_string(),
            }),
        }
    }
    out.push_str(&s[last..]);
    Ok(out)
}

/// Apply `INKFORGE_*` overrides from the process environment.
pub fn apply_env_overrides(config: InkForgeConfig) -> Result<InkForgeConfig> {
    apply_env_overrides_with(config, &std::env::vars().collect())
}

/// Apply `INKFORGE_*` overrides from `env`. Empty values are ignored.
pub fn apply_env_overrides_with(
    mut config: InkForgeConfig,
    env: &HashMap<String, String>,
) -> Result<InkForgeConfig> {
    let get = |key: &str| env.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

    if let Some(bind) = get(ENV_BIND) {
        config.gateway.get_or_insert_with(GatewayConfig::default).bind = Some(bind.to_string());
    }
    if let Some(port) = get(ENV_PORT) {
        let port: u16 = port.parse().with_context(|| format!("{ENV_PORT}={port} is not a port"))?;
        config.gateway.get_or_insert_with(GatewayConfig::default).port = Some(port);
    }
    if let Some(path) = get(ENV_CHROME_PATH) {
        config.render.get_or_insert_with(RenderConfig::default).chrome_path = Some(path.into());
    }
    if let Some(secs) = get(ENV_RENDER_TIMEOUT_SECS) {
        let secs: u64 = secs
            .parse()
            .with_context(|| format!("{ENV_RENDER_TIMEOUT_SECS}={secs} is not a number of seconds"))?;
        config.render.get_or_insert_with(RenderConfig::default).timeout_secs = Some(secs);
    }
    if let Some(url) = get(ENV_SERVER_URL) {
        config.client.get_or_insert_with(ClientConfig::default).server_url = Some(url.to_string());
    }
    if let Some(level) = get(ENV_LOG_LEVEL) {
        config.logging.get_or_insert_with(LoggingConfig::default).level = Some(level.to_string());
    }
    if let Some(dir) = get(ENV_LOG_DIR) {
        config.logging.get_or_insert_with(LoggingConfig::default).dir = Some(dir.into());
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn substitutes_nested_reference() {
        let v = json!({"render": {"chrome_path": "${CHROME_HOME}/chrome"}});
        let result = resolve_env_vars_with(&v, &env(&[("CHROME_HOME", "/opt/google")])).unwrap();
        assert_eq!(result["render"]["chrome_path"], "/opt/google/chrome");
    }

    #[test]
    fn error_on_missing_var() {
        let v = json!({"client": {"server_url": "${MISSING_VAR}"}});
        let err = resolve_env_vars_with(&v, &HashMap::new()).unwrap_err();
        assert!(err.to_string().contains("MISSING_VAR"));
        assert!(err.to_string().contains("client.server_url"));
    }

    #[test]
    fn escaped_reference_is_kept_literal() {
        let v = json!({"a": "$${NOT_A_VAR} and ${REAL}"});
        let result = resolve_env_vars_with(&v, &env(&[("REAL", "yes")])).unwrap();
        assert_eq!(result["a"], "${NOT_A_VAR} and yes");
    }

    #[test]
    fn overrides_replace_file_values() {
        let cfg = InkForgeConfig {
            gateway: Some(GatewayConfig { port: Some(3000), ..Default::default() }),
            ..Default::default()
        };
        let cfg = apply_env_overrides_with(
            cfg,
            &env(&[
                (ENV_PORT, "8081"),
                (ENV_RENDER_TIMEOUT_SECS, "5"),
                (ENV_SERVER_URL, "http://pdf.internal:8081"),
                (ENV_LOG_DIR, ""),
            ]),
        )
        .unwrap();
        assert_eq!(cfg.port(), 8081);
        assert_eq!(cfg.render_timeout(), Duration::from_secs(5));
        assert_eq!(cfg.server_url(), "http://pdf.internal:8081");
        assert!(cfg.log_dir().is_none());
    }

    #[test]
    fn invalid_port_override_is_rejected() {
        let result = apply_env_overrides_with(InkForgeConfig::default(), &env(&[(ENV_PORT, "http")]));
        assert!(result.unwrap_err().to_string().contains(ENV_PORT));
    }
}
