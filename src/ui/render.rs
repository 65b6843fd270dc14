use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};
use unicode_width::UnicodeWidthChar;

use crate::app::Model;
use crate::view::{ViewMode, ViewState};

use super::style::{self, Palette};
use super::{overlays, preview, status};

/// Screen regions for one frame. Panes are `None` when the view mode hides them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaneAreas {
    pub tabs: Option<Rect>,
    pub editor: Option<Rect>,
    pub preview: Option<Rect>,
    pub status: Option<Rect>,
}

pub fn pane_areas(area: Rect, view: &ViewState) -> PaneAreas {
    let (tabs, body, status) = if view.fullscreen {
        (None, area, None)
    } else {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);
        (Some(rows[0]), rows[1], Some(rows[2]))
    };

    let (editor, preview) = match view.mode {
        ViewMode::Edit => (Some(body), None),
        ViewMode::Preview => (None, Some(body)),
        ViewMode::Split => {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(body);
            (Some(columns[0]), Some(columns[1]))
        }
    };

    PaneAreas {
        tabs,
        editor,
        preview,
        status,
    }
}

/// Text area of a pane, inside its border.
pub fn pane_inner(rect: Rect, view: &ViewState) -> Rect {
    if view.fullscreen {
        rect
    } else {
        Block::default().borders(Borders::ALL).inner(rect)
    }
}

/// Columns used by the line-number gutter, including its trailing space.
pub fn gutter_width(line_count: usize) -> u16 {
    let digits = line_count.max(1).ilog10() + 1;
    u16::try_from(digits.max(3) + 1).unwrap_or(u16::MAX)
}

/// Render the complete UI.
pub fn render(model: &mut Model, frame: &mut Frame) {
    let area = frame.area();
    let palette = style::palette(model.view.theme);
    frame.render_widget(Block::default().style(palette.text), area);

    let panes = pane_areas(area, &model.view);
    if let Some(tabs) = panes.tabs {
        render_tabs(model, frame, tabs, &palette);
    }
    if let Some(rect) = panes.editor {
        render_editor(model, frame, rect, &palette);
    }
    if let Some(rect) = panes.preview {
        render_preview(model, frame, rect, &palette);
    }
    if let Some(rect) = panes.status {
        status::render_status_bar(model, frame, rect, &palette);
    }

    // Toasts sit on the last row above the status bar.
    if model.active_toast().is_some() {
        let bottom = panes.status.map_or(area.bottom(), |rect| rect.y);
        if bottom > area.y {
            let toast_area = Rect::new(area.x, bottom - 1, area.width, 1);
            status::render_toast_bar(model, frame, toast_area);
        }
    }

    if model.help_visible {
        overlays::render_help_overlay(model, frame, area);
    }
}

fn render_tabs(model: &Model, frame: &mut Frame, area: Rect, palette: &Palette) {
    let mut spans = vec![Span::styled(
        " markpane ",
        palette.text.add_modifier(Modifier::BOLD),
    )];
    for (mode, label) in [
        (ViewMode::Edit, " Edit "),
        (ViewMode::Split, " Split "),
        (ViewMode::Preview, " Preview "),
    ] {
        let style = if model.view.mode == mode {
            palette.tab_active
        } else {
            palette.tab_inactive
        };
        spans.push(Span::raw(" "));
        spans.push(Span::styled(label, style));
    }
    if model.view.html_source {
        spans.push(Span::styled("  [HTML source]", palette.muted));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)).style(palette.text), area);
}

fn pane_block<'a>(title: String, view: &ViewState, focused: bool, palette: &Palette) -> Block<'a> {
    if view.fullscreen {
        return Block::default();
    }
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(if focused {
            palette.border_focused
        } else {
            palette.border
        })
}

fn render_editor(model: &mut Model, frame: &mut Frame, area: Rect, palette: &Palette) {
    let inner = pane_inner(area, &model.view);
    let line_count = model.buffer.line_count();
    let gutter = gutter_width(line_count);
    let text_width = usize::from(inner.width.saturating_sub(gutter)).max(1);
    let rows = usize::from(inner.height);

    // Keep the cursor column on screen.
    let cursor = model.buffer.cursor();
    let cursor_text = model.buffer.line(cursor.line).unwrap_or_default();
    let cursor_x = display_width(&cursor_text[..cursor.col.min(cursor_text.len())]);
    if cursor_x < model.editor_hscroll {
        model.editor_hscroll = cursor_x;
    } else if cursor_x >= model.editor_hscroll + text_width {
        model.editor_hscroll = cursor_x + 1 - text_width;
    }
    let hscroll = model.editor_hscroll;

    let scroll = model.editor_scroll.min(line_count.saturating_sub(1));
    let mut in_fence = (0..scroll)
        .filter_map(|idx| model.buffer.line(idx))
        .filter(|line| style::is_fence(line.trim_start()))
        .count()
        % 2
        == 1;

    let mut lines = Vec::with_capacity(rows);
    for idx in scroll..(scroll + rows).min(line_count) {
        let text = model.buffer.line(idx).unwrap_or_default();
        let fence = style::is_fence(text.trim_start());
        let line_style = palette.source_line(&text, in_fence);
        if fence {
            in_fence = !in_fence;
        }
        let number_style = if idx == cursor.line {
            palette.gutter.add_modifier(Modifier::BOLD)
        } else {
            palette.gutter
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!("{:>width$} ", idx + 1, width = usize::from(gutter) - 1),
                number_style,
            ),
            Span::styled(slice_columns(&text, hscroll, text_width), line_style),
        ]));
    }

    let title = format!(
        " Markdown{} ",
        model
            .source_name
            .as_deref()
            .map_or_else(String::new, |name| format!(" - {name}"))
    );
    let block = pane_block(title, &model.view, true, palette);
    frame.render_widget(Paragraph::new(lines).block(block).style(palette.text), area);

    if !model.help_visible && cursor.line >= scroll && cursor.line < scroll + rows {
        let x = inner.x + gutter + u16::try_from(cursor_x - hscroll).unwrap_or(0);
        let y = inner.y + u16::try_from(cursor.line - scroll).unwrap_or(0);
        if x < inner.right() {
            frame.set_cursor_position(Position::new(x, y));
        }
    }
}

fn render_preview(model: &mut Model, frame: &mut Frame, area: Rect, palette: &Palette) {
    let inner = pane_inner(area, &model.view);
    let width = usize::from(inner.width).max(1);
    let lines = if model.view.html_source {
        preview::source_lines(&model.rendered.html, width, palette)
    } else {
        preview::html_to_lines(&model.rendered.html, width, palette)
    };

    let rows = usize::from(inner.height);
    let max_scroll = lines.len().saturating_sub(rows);
    model.preview_scroll = model.preview_scroll.min(max_scroll);

    let visible: Vec<Line> = if lines.is_empty() && model.rendered.is_committed() {
        vec![Line::styled("Nothing to preview", palette.muted)]
    } else {
        lines
            .into_iter()
            .skip(model.preview_scroll)
            .take(rows)
            .collect()
    };

    let kind = if model.view.html_source {
        "HTML"
    } else {
        "Preview"
    };
    let title = if model.render_pending() {
        format!(" {kind} (updating) ")
    } else {
        format!(" {kind} ")
    };
    let focused = !model.view.mode.shows_editor();
    let block = pane_block(title, &model.view, focused, palette);
    frame.render_widget(Paragraph::new(visible).block(block).style(palette.text), area);
}

fn display_width(text: &str) -> usize {
    text.chars().map(|ch| ch.width().unwrap_or(0)).sum()
}

/// The part of `text` between display columns `skip` and `skip + take`.
///
/// A wide character straddling either edge is dropped.
fn slice_columns(text: &str, skip: usize, take: usize) -> String {
    let mut out = String::new();
    let mut col = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if col >= skip && col + w <= skip + take {
            out.push(ch);
        }
        col += w;
        if col >= skip + take {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_mode_halves_body() {
        let panes = pane_areas(Rect::new(0, 0, 80, 24), &ViewState::default());
        let editor = panes.editor.unwrap();
        let preview = panes.preview.unwrap();
        assert_eq!(editor.width + preview.width, 80);
        assert_eq!(editor.height, 22);
        assert_eq!(panes.tabs, Some(Rect::new(0, 0, 80, 1)));
        assert_eq!(panes.status, Some(Rect::new(0, 23, 80, 1)));
    }

    #[test]
    fn test_single_pane_modes() {
        let area = Rect::new(0, 0, 80, 24);
        let edit = pane_areas(
            area,
            &ViewState {
                mode: ViewMode::Edit,
                ..ViewState::default()
            },
        );
        assert!(edit.preview.is_none());
        assert_eq!(edit.editor.unwrap().width, 80);

        let preview = pane_areas(
            area,
            &ViewState {
                mode: ViewMode::Preview,
                ..ViewState::default()
            },
        );
        assert!(preview.editor.is_none());
        assert_eq!(preview.preview.unwrap().width, 80);
    }

    #[test]
    fn test_fullscreen_drops_chrome_and_borders() {
        let view = ViewState {
            mode: ViewMode::Preview,
            fullscreen: true,
            ..ViewState::default()
        };
        let area = Rect::new(0, 0, 80, 24);
        let panes = pane_areas(area, &view);
        assert!(panes.tabs.is_none());
        assert!(panes.status.is_none());
        assert_eq!(panes.preview, Some(area));
        assert_eq!(pane_inner(area, &view), area);
        assert_eq!(
            pane_inner(area, &ViewState::default()),
            Rect::new(1, 1, 78, 22)
        );
    }

    #[test]
    fn test_gutter_width_grows_with_line_count() {
        assert_eq!(gutter_width(0), 4);
        assert_eq!(gutter_width(999), 4);
        assert_eq!(gutter_width(1000), 5);
    }

    #[test]
    fn test_slice_columns() {
        assert_eq!(slice_columns("hello world", 0, 5), "hello");
        assert_eq!(slice_columns("hello world", 6, 10), "world");
        assert_eq!(slice_columns("日本語", 1, 4), "本");
        assert_eq!(slice_columns("", 3, 4), "");
    }
}
