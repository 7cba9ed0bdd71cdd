//! Chrome Launcher
//!
//! Builds launch options for a short-lived headless Chrome process.

use std::path::PathBuf;
use std::time::Duration;

use headless_chrome::{Browser, LaunchOptions};
use inkforge_core::ConvertError;
use tracing::{debug, info};

/// How each per-request browser is launched.
#[derive(Debug, Clone)]
pub struct BrowserOptions {
    /// Explicit Chrome/Chromium executable; auto-detected when `None`.
    pub chrome_path: Option<PathBuf>,
    /// Keep Chrome's OS-level sandbox on. Only disable inside containers
    /// that cannot provide the required namespaces.
    pub sandbox: bool,
    /// Turn off script execution in the rendered page.
    pub disable_javascript: bool,
    /// Upper bound for one render, launch to PDF.
    pub timeout: Duration,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            chrome_path: None,
            sandbox: true,
            disable_javascript: true,
            timeout: Duration::from_secs(30),
        }
    }
}

impl BrowserOptions {
    pub(crate) fn launch_options(&self) -> Result<LaunchOptions<'static>, ConvertError> {
        LaunchOptions::default_builder()
            .headless(true)
            .sandbox(self.sandbox)
            .path(self.chrome_path.clone())
            .idle_browser_timeout(self.timeout)
            .build()
            .map_err(|e| ConvertError::BrowserLaunch(e.to_string()))
    }
}

/// The executable a launch would use: the configured path, or whatever
/// `headless_chrome` finds on this machine.
pub fn resolve_executable(options: &BrowserOptions) -> Result<PathBuf, ConvertError> {
    match &options.chrome_path {
        Some(path) if path.is_file() => Ok(path.clone()),
        Some(path) => Err(ConvertError::BrowserLaunch(format!(
            "configured Chrome path {} does not exist",
            path.display()
        ))),
        None => headless_chrome::browser::default_executable().map_err(ConvertError::BrowserLaunch),
    }
}

/// Starts a fresh headless Chrome. The process exits when the returned
/// [`Browser`] is dropped.
pub fn launch(options: &BrowserOptions) -> Result<Browser, ConvertError> {
    let launch_options = options.launch_options()?;
    debug!(
        chrome_path = ?options.chrome_path,
        sandbox = options.sandbox,
        "Launching headless Chrome"
    );
    let browser =
        Browser::new(launch_options).map_err(|e| ConvertError::BrowserLaunch(e.to_string()))?;
    info!("Headless Chrome launched");
    Ok(browser)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_locked_down() {
        let opts = BrowserOptions::default();
        assert!(opts.sandbox);
        assert!(opts.disable_javascript);
        assert_eq!(opts.timeout, Duration::from_secs(30));
    }

    #[test]
    fn launch_options_carry_settings() {
        let opts = BrowserOptions {
            chrome_path: Some(PathBuf::from("/usr/bin/chromium")),
            sandbox: false,
            disable_javascript: true,
            timeout: Duration::from_secs(5),
        };
        let launch = opts.launch_options().unwrap();
        assert!(launch.headless);
        assert!(!launch.sandbox);
        assert_eq!(launch.path, Some(PathBuf::from("/usr/bin/chromium")));
        assert_eq!(launch.idle_browser_timeout, Duration::from_secs(5));
    }

    #[test]
    fn missing_configured_executable_is_reported() {
        let opts = BrowserOptions {
            chrome_path: Some(PathBuf::from("/nonexistent/inkforge/chrome")),
            ..Default::default()
        };
        let err = resolve_executable(&opts).unwrap_err();
        assert!(matches!(err, ConvertError::BrowserLaunch(_)));
        assert!(err.to_string().contains("/nonexistent/inkforge/chrome"));
    }
}
