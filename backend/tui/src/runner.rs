//! Event Loop
//!
//! Owns the terminal, multiplexes keyboard events with conversion results,
//! and runs each conversion on its own task so typing never blocks.

use std::io::{self, Stdout};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste, EventStream},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures_util::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::app::AppState;
use crate::client::ConvertClient;
use crate::collector::{ConversionOutcome, ConversionTicket};
use crate::render::draw_ui;

pub struct UiOptions {
    pub server_url: String,
    pub output_path: PathBuf,
    pub document: String,
    pub request_timeout: Duration,
}

/// Restores the terminal on every exit path, including panics unwinding
/// through the loop.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen, EnableBracketedPaste) {
            let _ = disable_raw_mode();
            return Err(e).context("Failed to enter alternate screen");
        }
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), DisableBracketedPaste, LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Runs the terminal UI until the user quits.
pub async fn run_ui(options: UiOptions) -> Result<()> {
    let client = ConvertClient::new(&options.server_url, options.request_timeout)?;
    let mut state = AppState::new(options.document, options.server_url, options.output_path);
    let (tx, mut rx) = mpsc::unbounded_channel::<(u64, ConversionOutcome)>();

    let mut guard = TerminalGuard::enter()?;
    let mut events = EventStream::new();
    info!(server = client.base_url(), "Terminal UI started");

    while !state.should_quit {
        guard.terminal.draw(|f| draw_ui(f, &state))?;

        tokio::select! {
            event = events.next() => match event {
                Some(Ok(event)) => {
                    if let Some(ticket) = crate::input::handle_event(event, &mut state) {
                        spawn_conversion(&client, ticket, tx.clone());
                    }
                }
                Some(Err(e)) => return Err(e).context("Failed to read terminal event"),
                None => break,
            },
            Some((ticket_id, outcome)) = rx.recv() => {
                let completion = state.finish_conversion(ticket_id, outcome);
                info!(ticket = ticket_id, ?completion, "Conversion finished");
            }
        }
    }

    info!("Terminal UI stopped");
    Ok(())
}

fn spawn_conversion(
    client: &ConvertClient,
    ticket: ConversionTicket,
    tx: mpsc::UnboundedSender<(u64, ConversionOutcome)>,
) {
    let client = client.clone();
    tokio::spawn(async move {
        let outcome = client.convert(&ticket.markdown).await.map_err(|e| {
            warn!(error = %e, "Conversion request failed");
            e.user_message()
        });
        // The receiver is gone once the UI has quit.
        let _ = tx.send((ticket.id, outcome));
    });
}
