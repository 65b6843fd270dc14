use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;
use unicode_width::UnicodeWidthChar;

use crate::app::{App, Message, Model};
use crate::editor::Direction;
use crate::templates::Template;
use crate::view::ViewMode;

use super::event_loop::ResizeDebouncer;

/// Lines scrolled per mouse wheel notch.
const WHEEL_LINES: usize = 3;

impl App {
    pub(super) fn handle_event(
        event: &Event,
        model: &Model,
        now_ms: u64,
        resize_debouncer: &mut ResizeDebouncer,
    ) -> Option<Message> {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => Self::handle_key(*key, model),
            Event::Mouse(mouse) => Self::handle_mouse(*mouse, model),
            Event::Paste(text) if model.view.mode.shows_editor() => {
                Some(Message::Paste(text.clone()))
            }
            Event::Resize(w, h) => {
                tracing::trace!(width = w, height = h, "resize queued");
                resize_debouncer.queue((*w, *h), now_ms);
                None
            }
            _ => None,
        }
    }

    pub(super) fn handle_key(key: KeyEvent, model: &Model) -> Option<Message> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);

        // Any key dismisses help
        if model.help_visible {
            return match key.code {
                KeyCode::Char('c' | 'q') if ctrl => Some(Message::Quit),
                _ => Some(Message::HideHelp),
            };
        }

        // Global bindings
        match key.code {
            KeyCode::Char('q' | 'c') if ctrl => return Some(Message::Quit),
            KeyCode::F(1) => return Some(Message::ToggleHelp),
            KeyCode::F(2) => return Some(Message::CycleViewMode),
            KeyCode::F(11) => return Some(Message::ToggleFullscreen),
            KeyCode::Char('1') if alt => return Some(Message::SetViewMode(ViewMode::Edit)),
            KeyCode::Char('2') if alt => return Some(Message::SetViewMode(ViewMode::Split)),
            KeyCode::Char('3') if alt => return Some(Message::SetViewMode(ViewMode::Preview)),
            KeyCode::Char('t') if ctrl => return Some(Message::ToggleTheme),
            KeyCode::Char('u') if ctrl => return Some(Message::ToggleHtmlSource),
            KeyCode::Char('r') if ctrl => return Some(Message::ConvertNow),
            KeyCode::Char('y') if ctrl => return Some(Message::CopyHtml),
            KeyCode::Char('y') if alt => return Some(Message::CopyMarkdown),
            _ => {}
        }

        if model.view.mode.shows_editor() {
            Self::handle_editor_key(key, ctrl, alt)
        } else {
            Self::handle_preview_key(key)
        }
    }

    fn handle_editor_key(key: KeyEvent, ctrl: bool, alt: bool) -> Option<Message> {
        if alt {
            return match key.code {
                KeyCode::Char('t') => Some(Message::InsertTemplate(Template::Table)),
                KeyCode::Char('c') => Some(Message::InsertTemplate(Template::CodeBlock)),
                KeyCode::Char('q') => Some(Message::InsertTemplate(Template::Quote)),
                KeyCode::Char('i') => Some(Message::InsertTemplate(Template::Image)),
                KeyCode::Char('l') => Some(Message::InsertTemplate(Template::Link)),
                KeyCode::Char('h') => Some(Message::InsertTemplate(Template::Heading)),
                KeyCode::Up => Some(Message::ScrollPreviewUp(1)),
                KeyCode::Down => Some(Message::ScrollPreviewDown(1)),
                KeyCode::PageUp => Some(Message::PreviewPageUp),
                KeyCode::PageDown => Some(Message::PreviewPageDown),
                _ => None,
            };
        }

        match key.code {
            KeyCode::Char('n') if ctrl => Some(Message::ResetDocument),
            KeyCode::Left if ctrl => Some(Message::MoveWordLeft),
            KeyCode::Right if ctrl => Some(Message::MoveWordRight),
            KeyCode::Home if ctrl => Some(Message::MoveToStart),
            KeyCode::End if ctrl => Some(Message::MoveToEnd),
            KeyCode::Up if ctrl => Some(Message::ScrollEditorUp(1)),
            KeyCode::Down if ctrl => Some(Message::ScrollEditorDown(1)),
            KeyCode::Char(_) if ctrl => None,
            KeyCode::Char(ch) => Some(Message::InsertChar(ch)),
            KeyCode::Enter => Some(Message::SplitLine),
            KeyCode::Tab => Some(Message::InsertTab),
            KeyCode::Backspace => Some(Message::DeleteBack),
            KeyCode::Delete => Some(Message::DeleteForward),
            KeyCode::Left => Some(Message::MoveCursor(Direction::Left)),
            KeyCode::Right => Some(Message::MoveCursor(Direction::Right)),
            KeyCode::Up => Some(Message::MoveCursor(Direction::Up)),
            KeyCode::Down => Some(Message::MoveCursor(Direction::Down)),
            KeyCode::Home => Some(Message::MoveHome),
            KeyCode::End => Some(Message::MoveEnd),
            KeyCode::PageUp => Some(Message::EditorPageUp),
            KeyCode::PageDown => Some(Message::EditorPageDown),
            _ => None,
        }
    }

    /// Pager-style keys while only the preview is shown.
    fn handle_preview_key(key: KeyEvent) -> Option<Message> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => Some(Message::ScrollPreviewDown(1)),
            KeyCode::Char('k') | KeyCode::Up => Some(Message::ScrollPreviewUp(1)),
            KeyCode::Char(' ') | KeyCode::PageDown => Some(Message::PreviewPageDown),
            KeyCode::Char('b') | KeyCode::PageUp => Some(Message::PreviewPageUp),
            KeyCode::Char('g') | KeyCode::Home => Some(Message::PreviewTop),
            KeyCode::Char('G') | KeyCode::End => Some(Message::PreviewBottom),
            KeyCode::Char('?') => Some(Message::ToggleHelp),
            KeyCode::Char('i' | 'e') | KeyCode::Esc => Some(Message::SetViewMode(ViewMode::Edit)),
            KeyCode::Char('q') => Some(Message::Quit),
            _ => None,
        }
    }

    pub(super) fn handle_mouse(mouse: MouseEvent, model: &Model) -> Option<Message> {
        if model.help_visible {
            return None;
        }

        let area = Rect::new(0, 0, model.size.0, model.size.1);
        let panes = crate::ui::pane_areas(area, &model.view);
        let in_editor = panes
            .editor
            .is_some_and(|rect| point_in_rect(mouse.column, mouse.row, rect));
        let in_preview = panes
            .preview
            .is_some_and(|rect| point_in_rect(mouse.column, mouse.row, rect));

        match mouse.kind {
            MouseEventKind::ScrollUp if in_editor => Some(Message::ScrollEditorUp(WHEEL_LINES)),
            MouseEventKind::ScrollDown if in_editor => {
                Some(Message::ScrollEditorDown(WHEEL_LINES))
            }
            MouseEventKind::ScrollUp if in_preview => Some(Message::ScrollPreviewUp(WHEEL_LINES)),
            MouseEventKind::ScrollDown if in_preview => {
                Some(Message::ScrollPreviewDown(WHEEL_LINES))
            }
            MouseEventKind::Down(MouseButton::Left) if in_editor => {
                let inner = crate::ui::pane_inner(panes.editor?, &model.view);
                editor_position(model, inner, mouse.column, mouse.row)
                    .map(|(line, col)| Message::MoveTo(line, col))
            }
            _ => None,
        }
    }
}

/// Map a click inside the editor's text area to a (line, byte column).
fn editor_position(model: &Model, inner: Rect, column: u16, row: u16) -> Option<(usize, usize)> {
    if !point_in_rect(column, row, inner) {
        return None;
    }
    let line_count = model.buffer.line_count();
    let line = (model.editor_scroll + usize::from(row - inner.y)).min(line_count.saturating_sub(1));
    let text_x = inner.x + crate::ui::gutter_width(line_count);
    let display_col = usize::from(column.saturating_sub(text_x)) + model.editor_hscroll;
    let text = model.buffer.line(line)?;
    Some((line, byte_col_for_display(&text, display_col)))
}

/// Byte offset of the character covering display column `target`.
fn byte_col_for_display(text: &str, target: usize) -> usize {
    let mut width = 0;
    for (idx, ch) in text.char_indices() {
        let w = ch.width().unwrap_or(0);
        if width + w > target {
            return idx;
        }
        width += w;
    }
    text.len()
}

fn point_in_rect(col: u16, row: u16, rect: Rect) -> bool {
    col >= rect.x && col < rect.x + rect.width && row >= rect.y && row < rect.y + rect.height
}

#[cfg(test)]
mod tests {
    use super::byte_col_for_display;

    #[test]
    fn test_byte_col_for_display_ascii() {
        assert_eq!(byte_col_for_display("hello", 0), 0);
        assert_eq!(byte_col_for_display("hello", 3), 3);
        assert_eq!(byte_col_for_display("hello", 40), 5);
    }

    #[test]
    fn test_byte_col_for_display_wide_chars() {
        // Each CJK character is two columns and three bytes wide.
        assert_eq!(byte_col_for_display("日本語", 1), 0);
        assert_eq!(byte_col_for_display("日本語", 2), 3);
        assert_eq!(byte_col_for_display("é!", 1), 2);
    }
}
