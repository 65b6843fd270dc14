use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};

use crate::app::Model;
use crate::templates::Template;

/// Key column width in the help listing.
const KEY_WIDTH: usize = 20;

fn binding(keys: &str, action: &str) -> Line<'static> {
    Line::raw(format!("  {keys:<KEY_WIDTH$}{action}"))
}

pub fn help_lines(model: &Model) -> Vec<Line<'static>> {
    let global_cfg = model
        .config_global_path
        .as_ref()
        .map_or_else(|| "<unknown>".to_string(), |p| p.display().to_string());
    let local_cfg = model
        .config_local_path
        .as_ref()
        .map_or_else(|| "<none>".to_string(), |p| p.display().to_string());

    let section_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let mut lines = vec![
        Line::styled("Editor", section_style),
        binding("Arrows, Home/End", "Move cursor"),
        binding("Ctrl+Left/Right", "Word movement"),
        binding("Ctrl+Home/End", "Document start / end"),
        binding("PageUp/PageDown", "Page through editor"),
        binding("Ctrl+N", "Reset to sample document"),
        Line::raw(""),
        Line::styled("Templates (Alt+key)", section_style),
    ];
    for (key, template) in [
        ('t', Template::Table),
        ('c', Template::CodeBlock),
        ('q', Template::Quote),
        ('i', Template::Image),
        ('l', Template::Link),
        ('h', Template::Heading),
    ] {
        lines.push(binding(&format!("Alt+{key}"), template.label()));
    }
    lines.extend([
        Line::raw(""),
        Line::styled("Preview", section_style),
        binding("Ctrl+R", "Convert now"),
        binding("Alt+Up/Down", "Scroll preview"),
        binding("j/k, Space/b, g/G", "Scroll (preview mode)"),
        binding("Ctrl+U", "Toggle HTML source"),
        Line::raw(""),
        Line::styled("View", section_style),
        binding("F2", "Cycle edit / split / preview"),
        binding("Alt+1/2/3", "Edit / split / preview"),
        binding("Ctrl+T", "Toggle light / dark theme"),
        binding("F11", "Toggle fullscreen"),
        Line::raw(""),
        Line::styled("Other", section_style),
        binding("Ctrl+Y", "Copy HTML"),
        binding("Alt+Y", "Copy markdown"),
        binding("Ctrl+Q / Ctrl+C", "Quit"),
        binding("F1", "Toggle help"),
        Line::raw(""),
        Line::styled("Config", section_style),
        Line::raw(format!("  Global: {global_cfg}")),
        Line::raw(format!("  Local override: {local_cfg}")),
    ]);
    lines
}

pub fn render_help_overlay(model: &Model, frame: &mut Frame, area: Rect) {
    let popup_width = area.width.saturating_sub(12).max(48);
    let popup_height = area.height.saturating_sub(4).max(12);
    let popup = centered_popup_rect(popup_width, popup_height, area);
    let dim_style = Style::default().fg(Color::Indexed(245));

    let block = Block::default()
        .title("Help")
        .borders(Borders::ALL)
        .padding(Padding::uniform(1))
        .style(Style::default().bg(Color::Black).fg(Color::White));

    frame.render_widget(Clear, popup);
    frame.render_widget(block, popup);

    // Inner area: border(1) + padding(1) on each side = 4
    let inner = Rect::new(
        popup.x + 2,
        popup.y + 2,
        popup.width.saturating_sub(4),
        popup.height.saturating_sub(4),
    );

    // Reserve 1 row at bottom for footer hint
    let content_height = inner.height.saturating_sub(1);
    let content_area = Rect::new(inner.x, inner.y, inner.width, content_height);
    frame.render_widget(Paragraph::new(help_lines(model)), content_area);

    let footer_area = Rect::new(inner.x, inner.y + content_height, inner.width, 1);
    let footer = Line::styled("Any key closes", dim_style);
    frame.render_widget(Paragraph::new(footer), footer_area);
}

fn centered_popup_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w) / 2);
    let y = area.y + (area.height.saturating_sub(h) / 2);
    Rect::new(x, y, w, h)
}
