//! Gateway Health API
//!
//! Liveness probe used by `inkforge status` and the terminal client.

use axum::{Json, extract::State};
use serde::Serialize;

use crate::server::GatewayState;

pub const SERVICE_NAME: &str = "inkforge";

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub renderer: String,
    pub uptime_seconds: u64,
}

/// Handler for `GET /api/health`
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthReport> {
    Json(HealthReport {
        status: "ok",
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        renderer: state.service.renderer_name().to_string(),
        uptime_seconds: state.started.elapsed().as_secs(),
    })
}
