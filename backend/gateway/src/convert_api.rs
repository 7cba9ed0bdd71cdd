//! Conversion Endpoint (`POST /api/convert`).
//!
//! Accepts `{"markdown": "<string>"}` and answers with the PDF as an
//! attachment, or a JSON error.

use std::time::Instant;

use axum::{
    body::Bytes,
    extract::{State, rejection::BytesRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use inkforge_core::{PDF_CONTENT_TYPE, PDF_FILENAME};
use logging::{ConversionEvent, EventLogger};
use serde_json::Value;
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::server::GatewayState;

/// Handler for `POST /api/convert`.
///
/// The body is parsed by hand so that malformed JSON, a missing field, and
/// a non-string field all produce the same 400 response.
#[instrument(skip_all, fields(request_id = tracing::field::Empty))]
pub async fn convert(
    State(state): State<GatewayState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ApiError> {
    let request_id = Uuid::new_v4();
    tracing::Span::current().record("request_id", tracing::field::display(request_id));

    let body = body.map_err(|rejection| {
        let reason = rejection.body_text();
        EventLogger::log_event(request_id, ConversionEvent::Rejected { reason });
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge
        } else {
            ApiError::InvalidInput
        }
    })?;

    let Some(markdown) = markdown_field(&body) else {
        EventLogger::log_event(
            request_id,
            ConversionEvent::Rejected { reason: "missing or non-string markdown field".into() },
        );
        return Err(ApiError::InvalidInput);
    };

    EventLogger::log_event(request_id, ConversionEvent::Received { markdown_bytes: markdown.len() });
    let started = Instant::now();

    match state.service.convert(&markdown).await {
        Ok(pdf) => {
            let elapsed_ms = started.elapsed().as_millis() as u64;
            EventLogger::log_event(
                request_id,
                ConversionEvent::Completed { pdf_bytes: pdf.len(), elapsed_ms },
            );
            info!(pdf_bytes = pdf.len(), elapsed_ms, "PDF generated");
            Ok(pdf_response(pdf))
        }
        Err(err) => {
            let elapsed_ms = started.elapsed().as_millis() as u64;
            error!(stage = err.stage(), error = %err, "Failed to generate PDF");
            EventLogger::log_event(
                request_id,
                ConversionEvent::Failed {
                    stage: err.stage().to_string(),
                    error_msg: err.to_string(),
                    elapsed_ms,
                },
            );
            Err(ApiError::from(&err))
        }
    }
}

/// Extracts `markdown` when the body is a JSON object holding a string there.
pub fn markdown_field(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    match value.get("markdown")? {
        Value::String(markdown) => Some(markdown.clone()),
        _ => None,
    }
}

fn pdf_response(pdf: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, PDF_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename={PDF_FILENAME}")),
        ],
        pdf,
    )
        .into_response()
}
