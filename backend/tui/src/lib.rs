//! TUI (Terminal User Interface) for InkForge.
//!
//! The Input Collector state machine, the download handle, the HTTP client
//! for the conversion service, and the ratatui front end behind `inkforge ui`.

pub mod app;
pub mod client;
pub mod collector;
pub mod download;
pub mod input;
pub mod render;
pub mod runner;

pub use app::{AppState, SAMPLE_DOCUMENT};
pub use client::{ClientError, ConvertClient, DEFAULT_REQUEST_TIMEOUT, request_timeout_for};
pub use collector::{
    CollectorError, Completion, ConversionOutcome, ConversionTicket, InputCollector, Phase,
};
pub use download::DownloadHandle;
pub use input::handle_event;
pub use render::draw_ui;
pub use runner::{UiOptions, run_ui};
