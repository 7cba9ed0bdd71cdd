use std::time::Duration;

use thiserror::Error;

/// Top-level error type for a Markdown-to-PDF conversion.
///
/// Only [`ConvertError::InvalidInput`] is caused by the caller; every other
/// variant is a conversion failure whose detail stays server-side.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("invalid markdown input")]
    InvalidInput,

    #[error("markdown rendering failed: {0}")]
    Markdown(String),

    #[error("failed to launch browser: {0}")]
    BrowserLaunch(String),

    #[error("PDF rendering failed: {0}")]
    Render(String),

    #[error("rendering timed out after {0:?}")]
    Timeout(Duration),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ConvertError {
    /// The pipeline stage the error originated from, for structured logs.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::InvalidInput => "input",
            Self::Markdown(_) => "parse",
            Self::BrowserLaunch(_) | Self::Render(_) | Self::Timeout(_) => "render",
            Self::Io(_) | Self::Other(_) => "compose",
        }
    }

    /// Whether the caller is at fault (maps to a 400-class response).
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidInput)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_invalid_input_is_a_client_error() {
        assert!(ConvertError::InvalidInput.is_client_error());
        assert!(!ConvertError::Render("boom".into()).is_client_error());
        assert!(!ConvertError::Timeout(Duration::from_secs(1)).is_client_error());
    }

    #[test]
    fn stages_are_reported() {
        assert_eq!(ConvertError::Markdown("x".into()).stage(), "parse");
        assert_eq!(ConvertError::BrowserLaunch("x".into()).stage(), "render");
        assert_eq!(ConvertError::Timeout(Duration::from_secs(30)).stage(), "render");
    }

    #[test]
    fn timeout_message_includes_duration() {
        let msg = ConvertError::Timeout(Duration::from_secs(30)).to_string();
        assert!(msg.contains("30s"));
    }
}
