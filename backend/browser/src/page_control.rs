//! Page Control
//!
//! Opens a tab, applies the untrusted-content restrictions, and loads the
//! document until the page and its subresources have finished loading.

use std::sync::Arc;
use std::time::Duration;

use headless_chrome::protocol::cdp::Emulation;
use headless_chrome::{Browser, Tab};
use inkforge_core::ConvertError;
use tracing::{debug, info};

/// Opens a new tab whose waits are bounded by `timeout`.
pub fn open_tab(browser: &Browser, timeout: Duration) -> Result<Arc<Tab>, ConvertError> {
    let tab = browser
        .new_tab()
        .map_err(|e| ConvertError::Render(format!("failed to open tab: {e}")))?;
    tab.set_default_timeout(timeout);
    Ok(tab)
}

/// Blocks page scripts. Must run before navigation to cover inline scripts.
pub fn disable_scripts(tab: &Tab) -> Result<(), ConvertError> {
    tab.call_method(Emulation::SetScriptExecutionDisabled { value: true })
        .map_err(|e| ConvertError::Render(format!("failed to disable scripts: {e}")))?;
    debug!("Script execution disabled for render tab");
    Ok(())
}

/// Navigates to `url` and waits until loading has stopped, so images and
/// stylesheets are in place before printing.
pub fn load(tab: &Tab, url: &str) -> Result<(), ConvertError> {
    info!(url, "Loading document into render tab");
    tab.navigate_to(url)
        .map_err(|e| ConvertError::Render(format!("navigation failed: {e}")))?
        .wait_until_navigated()
        .map_err(|e| ConvertError::Render(format!("page did not finish loading: {e}")))?;
    Ok(())
}
