//! Conversion Client
//!
//! Thin `reqwest` wrapper around the gateway's convert and health endpoints.

use std::time::Duration;

use inkforge_core::{CONVERT_PATH, ConvertRequest, ErrorBody, HEALTH_PATH};
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::collector::GENERIC_FAILURE_MESSAGE;

/// Headroom over the server's render timeout so the server's own 500 arrives
/// before the client gives up.
const REQUEST_GRACE: Duration = Duration::from_secs(15);

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30 + REQUEST_GRACE.as_secs());

/// Client timeout for a server configured with `render_timeout`.
pub fn request_timeout_for(render_timeout: Duration) -> Duration {
    render_timeout + REQUEST_GRACE
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("server responded {status}")]
    Server { status: u16, message: Option<String> },

    #[error("request failed: {0}")]
    Network(String),
}

impl ClientError {
    /// The text shown to the user: the server's own `error` field when it sent
    /// one, a generic message otherwise.
    pub fn user_message(&self) -> String {
        match self {
            Self::Server { message: Some(message), .. } => message.clone(),
            Self::Server { message: None, .. } => GENERIC_FAILURE_MESSAGE.to_string(),
            Self::Network(detail) => format!("{GENERIC_FAILURE_MESSAGE} ({detail})"),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        let detail = if err.is_timeout() {
            "request timed out".to_string()
        } else if err.is_connect() {
            "could not reach the conversion service".to_string()
        } else {
            err.to_string()
        };
        Self::Network(detail)
    }
}

#[derive(Debug, Clone)]
pub struct ConvertClient {
    http: Client,
    base_url: String,
}

impl ConvertClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_string() })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends `markdown` for conversion and returns the PDF bytes.
    pub async fn convert(&self, markdown: &str) -> Result<Vec<u8>, ClientError> {
        let url = format!("{}{CONVERT_PATH}", self.base_url);
        let request = ConvertRequest { markdown: markdown.to_string() };
        let response = self.http.post(&url).json(&request).send().await?;

        let status = response.status();
        if status.is_success() {
            let pdf = response.bytes().await?;
            debug!(bytes = pdf.len(), "Received PDF");
            return Ok(pdf.to_vec());
        }

        let message = response.json::<ErrorBody>().await.ok().map(|body| body.error);
        Err(ClientError::Server { status: status.as_u16(), message })
    }

    pub async fn health(&self) -> Result<Value, ClientError> {
        let url = format!("{}{HEALTH_PATH}", self.base_url);
        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Server { status: status.as_u16(), message: None });
        }
        Ok(response.json().await?)
    }
}
