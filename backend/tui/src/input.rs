//! Keyboard Input Handler
//!
//! Processes crossterm events and updates `AppState`. Terminals deliver a
//! dragged-in file as a bracketed paste of its path, so a paste naming an
//! existing file is handled as a file drop.

use std::path::PathBuf;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::AppState;
use crate::collector::ConversionTicket;

/// Handles one terminal event. Returns a ticket when a conversion should start.
pub fn handle_event(event: Event, state: &mut AppState) -> Option<ConversionTicket> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key_event(key, state),
        Event::Paste(text) => {
            handle_paste(&text, state);
            None
        }
        _ => None,
    }
}

pub fn handle_key_event(key: KeyEvent, state: &mut AppState) -> Option<ConversionTicket> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') if ctrl => state.should_quit = true,
        KeyCode::Esc => state.should_quit = true,
        KeyCode::Char('s') if ctrl => {
            state.notice = None;
            return state.collector.convert();
        }
        KeyCode::Char('l') if ctrl => state.clear(),
        KeyCode::Char('w') if ctrl => state.save_download(),
        KeyCode::Enter => state.insert_char('\n'),
        KeyCode::Tab => state.insert_str("    "),
        KeyCode::Backspace => state.backspace(),
        KeyCode::Char(_) if ctrl => {}
        KeyCode::Char(c) => state.insert_char(c),
        _ => {}
    }
    None
}

fn handle_paste(text: &str, state: &mut AppState) {
    let dropped = dropped_paths(text);
    if dropped.is_empty() {
        state.insert_str(&text.replace("\r\n", "\n"));
    } else {
        state.notice = None;
        // The collector records the user-facing message on failure.
        let _ = state.collector.load_dropped(&dropped);
    }
}

/// Paths in a paste, if every non-empty line names an existing file.
pub fn dropped_paths(text: &str) -> Vec<PathBuf> {
    let lines: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
    let paths: Vec<PathBuf> = lines.iter().map(|line| PathBuf::from(unquote(line))).collect();
    if paths.is_empty() || !paths.iter().all(|p| p.is_file()) {
        return Vec::new();
    }
    paths
}

fn unquote(line: &str) -> String {
    let line = line.strip_prefix("file://").unwrap_or(line);
    let line = line
        .strip_prefix('\'')
        .and_then(|l| l.strip_suffix('\''))
        .or_else(|| line.strip_prefix('"').and_then(|l| l.strip_suffix('"')))
        .unwrap_or(line);
    line.replace("\\ ", " ")
}
