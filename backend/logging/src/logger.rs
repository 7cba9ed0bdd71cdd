//! Structured Logger
//!
//! Wraps `tracing` to provide console output, daily-rotated NDJSON files,
//! and environment-based level control.

use std::path::PathBuf;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Base name of rotated log files: `inkforge.log.YYYY-MM-DD`.
pub const LOG_FILE_PREFIX: &str = "inkforge.log";

#[derive(Debug, Clone)]
pub struct LogOptions {
    /// Filter used when `RUST_LOG` is unset (e.g. "info", "inkforge_gateway=debug").
    pub level: String,
    /// Directory for rotated NDJSON files; no file output when `None`.
    pub dir: Option<PathBuf>,
    /// Write to stdout. Terminal UIs turn this off so logs don't corrupt the screen.
    pub console: bool,
    /// Emit JSON on the console instead of human-readable lines.
    pub json_console: bool,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self { level: "info".to_string(), dir: None, console: true, json_console: false }
    }
}

/// Initialize the global structured logger.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logger(options: &LogOptions) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&options.level))?;

    let console_layer = options.console.then(|| {
        if options.json_console {
            fmt::layer().json().with_writer(std::io::stdout).boxed()
        } else {
            fmt::layer().with_writer(std::io::stdout).with_target(false).with_ansi(true).boxed()
        }
    });

    let file_layer = match &options.dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let appender = RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE_PREFIX);
            Some(fmt::layer().json().with_writer(appender).with_ansi(false))
        }
        None => None,
    };

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();
    Ok(())
}
