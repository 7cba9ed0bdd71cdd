//! TUI Rendering
//!
//! Translates `AppState` into Ratatui widgets and draws to the terminal frame.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::app::AppState;
use crate::collector::Phase;

const HELP: &str = "Ctrl+S convert  Ctrl+W save PDF  Ctrl+L clear  Esc quit  (paste a .md path to load it)";

pub fn draw_ui(f: &mut Frame, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Min(3),    // Editor
            Constraint::Length(3), // Status
            Constraint::Length(1), // Help
        ])
        .split(f.size());

    let document = state.collector.document();
    let visible = chunks[0].height.saturating_sub(2);
    let editor = Paragraph::new(format!("{document}\u{2588}"))
        .scroll((editor_scroll(document, visible), 0))
        .block(Block::default().title(" Markdown ").borders(Borders::ALL));
    f.render_widget(editor, chunks[0]);

    let status = Paragraph::new(status_line(state))
        .wrap(Wrap { trim: true })
        .block(Block::default().title(format!(" {} ", state.server_url)).borders(Borders::ALL));
    f.render_widget(status, chunks[1]);

    let help = Paragraph::new(HELP).style(Style::default().fg(Color::DarkGray));
    f.render_widget(help, chunks[2]);
}

/// Rows to scroll so the cursor line stays in view. Saturates on documents
/// longer than the widget can address.
fn editor_scroll(document: &str, visible: u16) -> u16 {
    let line_count = u16::try_from(document.lines().count()).unwrap_or(u16::MAX);
    line_count.saturating_sub(visible.saturating_sub(1))
}

fn status_line(state: &AppState) -> Line<'static> {
    let collector = &state.collector;
    let (label, color) = match collector.phase() {
        Phase::Idle => ("Ready", Color::Gray),
        Phase::Busy => ("Converting...", Color::Yellow),
        Phase::Succeeded => ("PDF ready", Color::Green),
        Phase::Failed => ("Error", Color::Red),
    };
    let mut spans =
        vec![Span::styled(label, Style::default().fg(color).add_modifier(Modifier::BOLD))];

    let detail = if let Some(error) = collector.error() {
        Some(Span::styled(error.to_string(), Style::default().fg(Color::Red)))
    } else if let Some(notice) = &state.notice {
        Some(Span::raw(notice.clone()))
    } else if let Some(handle) = collector.download() {
        Some(Span::raw(format!(
            "{} ({} bytes). Ctrl+W saves to {}",
            handle.suggested_filename(),
            handle.len(),
            state.output_path.display()
        )))
    } else if !collector.can_convert() && collector.phase() != Phase::Busy {
        Some(Span::styled("Type or paste some Markdown", Style::default().fg(Color::DarkGray)))
    } else {
        None
    };

    if let Some(detail) = detail {
        spans.push(Span::raw("  "));
        spans.push(detail);
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_documents_do_not_scroll() {
        assert_eq!(editor_scroll("# Title\nbody", 10), 0);
        assert_eq!(editor_scroll("", 10), 0);
    }

    #[test]
    fn long_documents_keep_the_last_line_visible() {
        let document = "line\n".repeat(30);
        assert_eq!(editor_scroll(&document, 10), 21);
    }

    #[test]
    fn huge_documents_saturate_instead_of_wrapping() {
        let document = "x\n".repeat(70_000);
        assert_eq!(editor_scroll(&document, 10), u16::MAX - 9);
    }
}
