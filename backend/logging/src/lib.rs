//! Telemetry and structured logging components for InkForge.
//!
//! Handles subscriber setup (console and rolling NDJSON file) and the
//! per-request conversion event log.

pub mod event_logger;
pub mod logger;

pub use event_logger::{ConversionEvent, EventLogEntry, EventLogger};
pub use logger::{LogOptions, init_logger};
