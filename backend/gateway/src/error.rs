//! API Error Responses
//!
//! Every failure leaves the gateway as `{"error": "..."}` with a fixed,
//! caller-safe message. Causes are logged, never returned.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use inkforge_core::{CONVERSION_FAILED_MESSAGE, ConvertError, ErrorBody, INVALID_INPUT_MESSAGE};
use thiserror::Error;

pub const PAYLOAD_TOO_LARGE_MESSAGE: &str = "Markdown input is too large";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("{INVALID_INPUT_MESSAGE}")]
    InvalidInput,

    #[error("{PAYLOAD_TOO_LARGE_MESSAGE}")]
    PayloadTooLarge,

    #[error("{CONVERSION_FAILED_MESSAGE}")]
    ConversionFailed,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidInput => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::ConversionFailed => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<&ConvertError> for ApiError {
    fn from(err: &ConvertError) -> Self {
        if err.is_client_error() { Self::InvalidInput } else { Self::ConversionFailed }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(ErrorBody::new(self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_convert_errors() {
        assert_eq!(ApiError::from(&ConvertError::InvalidInput), ApiError::InvalidInput);
        assert_eq!(
            ApiError::from(&ConvertError::Render("crashed".into())),
            ApiError::ConversionFailed
        );
    }

    #[test]
    fn messages_are_fixed() {
        assert_eq!(ApiError::InvalidInput.to_string(), "Invalid markdown input");
        assert_eq!(ApiError::ConversionFailed.to_string(), "Failed to generate PDF");
        assert_eq!(ApiError::ConversionFailed.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
