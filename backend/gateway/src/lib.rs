//! InkForge Conversion Gateway
//!
//! HTTP front of the Markdown-to-PDF pipeline: request validation, stage
//! orchestration, and the JSON error contract.

pub mod convert_api;
pub mod error;
pub mod health_api;
pub mod pipeline;
pub mod server;

pub use error::ApiError;
pub use pipeline::ConversionService;
pub use server::{build_router, start_server, GatewayOptions, GatewayState};
