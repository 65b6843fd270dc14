use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::app::{Model, ToastLevel};

use super::style::Palette;

/// One-line summary of the session state.
pub fn status_text(model: &Model) -> String {
    let name = model.source_name.as_deref().unwrap_or("untitled");
    let cursor = model.buffer.cursor();
    let line_text = model.buffer.line(cursor.line).unwrap_or_default();
    let column = line_text[..cursor.col.min(line_text.len())].width() + 1;

    let render_state = if model.rendered.fallback {
        "render error"
    } else if model.render_pending() {
        "updating"
    } else {
        "up to date"
    };

    format!(
        " {}  {}  Ln {}, Col {}  rev {}  [{}]  {}  F1:help",
        model.view.mode.as_str().to_uppercase(),
        name,
        cursor.line + 1,
        column,
        model.buffer.revision(),
        render_state,
        model.view.theme.as_str(),
    )
}

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect, palette: &Palette) {
    let style = if model.rendered.fallback {
        palette.error
    } else {
        palette.status
    };
    frame.render_widget(Paragraph::new(status_text(model)).style(style), area);
}

pub fn render_toast_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some((message, level)) = model.active_toast() else {
        return;
    };
    let (prefix, style) = match level {
        ToastLevel::Info => (
            "[info]",
            Style::default().bg(Color::DarkGray).fg(Color::White),
        ),
        ToastLevel::Warning => (
            "[warn]",
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ),
        ToastLevel::Error => ("[error]", Style::default().bg(Color::Red).fg(Color::White)),
    };
    let toast = Paragraph::new(format!("{prefix} {message}")).style(style);
    frame.render_widget(toast, area);
}
