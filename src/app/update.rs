use crate::app::Model;
use crate::app::model::SAMPLE_DOCUMENT;
use crate::convert::Conversion;
use crate::editor::Direction;
use crate::templates::Template;
use crate::view::ViewMode;

/// Spaces inserted by the Tab key.
const TAB_WIDTH: usize = 4;

/// All possible events and actions in the application.
///
/// These represent user input, system events, and internal actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Editing
    /// Insert a character at the cursor
    InsertChar(char),
    /// Insert spaces up to the next tab stop
    InsertTab,
    /// Insert pasted text at the cursor
    Paste(String),
    /// Delete character before cursor (Backspace)
    DeleteBack,
    /// Delete character at cursor (Delete)
    DeleteForward,
    /// Split line at cursor (Enter)
    SplitLine,
    /// Insert a markdown template at the cursor
    InsertTemplate(Template),
    /// Replace the document with the sample text
    ResetDocument,

    // Cursor
    /// Move cursor in a direction
    MoveCursor(Direction),
    /// Move cursor to beginning of line (Home)
    MoveHome,
    /// Move cursor to end of line (End)
    MoveEnd,
    /// Move cursor one word left (Ctrl+Left)
    MoveWordLeft,
    /// Move cursor one word right (Ctrl+Right)
    MoveWordRight,
    /// Move cursor to start of document (Ctrl+Home)
    MoveToStart,
    /// Move cursor to end of document (Ctrl+End)
    MoveToEnd,
    /// Move cursor to (line, byte column), e.g. from a mouse click
    MoveTo(usize, usize),
    /// Move cursor up one editor page
    EditorPageUp,
    /// Move cursor down one editor page
    EditorPageDown,
    /// Scroll editor viewport up by n lines without moving the cursor
    ScrollEditorUp(usize),
    /// Scroll editor viewport down by n lines without moving the cursor
    ScrollEditorDown(usize),

    // Conversion
    /// Convert immediately, skipping the debounce
    ConvertNow,
    /// A conversion finished
    Rendered(Conversion),

    // Preview
    /// Scroll preview up by n lines
    ScrollPreviewUp(usize),
    /// Scroll preview down by n lines
    ScrollPreviewDown(usize),
    /// Scroll preview up one page
    PreviewPageUp,
    /// Scroll preview down one page
    PreviewPageDown,
    /// Go to beginning of preview
    PreviewTop,
    /// Go to end of preview
    PreviewBottom,

    // View
    /// Edit -> split -> preview -> edit
    CycleViewMode,
    /// Switch to a specific view mode
    SetViewMode(ViewMode),
    /// Switch between light and dark theme
    ToggleTheme,
    /// Show or hide window chrome
    ToggleFullscreen,
    /// Switch the preview between rendered HTML and raw HTML source
    ToggleHtmlSource,

    // Clipboard
    /// Copy the rendered HTML
    CopyHtml,
    /// Copy the markdown source
    CopyMarkdown,

    // Window
    /// Toggle help overlay
    ToggleHelp,
    /// Hide help overlay
    HideHelp,
    /// Terminal resized
    Resize(u16, u16),
    /// Redraw screen
    Redraw,

    // Application
    /// Quit the application
    Quit,
}

impl Message {
    /// Messages that move the cursor or change the text.
    const fn follows_cursor(&self) -> bool {
        matches!(
            self,
            Self::InsertChar(_)
                | Self::InsertTab
                | Self::Paste(_)
                | Self::DeleteBack
                | Self::DeleteForward
                | Self::SplitLine
                | Self::InsertTemplate(_)
                | Self::ResetDocument
                | Self::MoveCursor(_)
                | Self::MoveHome
                | Self::MoveEnd
                | Self::MoveWordLeft
                | Self::MoveWordRight
                | Self::MoveToStart
                | Self::MoveToEnd
                | Self::MoveTo(_, _)
                | Self::EditorPageUp
                | Self::EditorPageDown
                | Self::SetViewMode(_)
                | Self::CycleViewMode
                | Self::ToggleFullscreen
                | Self::Resize(_, _)
        )
    }
}

/// Pure function that updates the model based on a message.
///
/// This is the core of TEA - all state transitions happen here.
/// No side effects should occur in this function.
pub fn update(mut model: Model, msg: Message) -> Model {
    let follow = msg.follows_cursor();

    match msg {
        // Editing
        Message::InsertChar(ch) => model.buffer.insert_char(ch),
        Message::InsertTab => {
            let col = model.buffer.cursor().col;
            let line = model.buffer.line(model.buffer.cursor().line).unwrap_or_default();
            let width = unicode_width::UnicodeWidthStr::width(&line[..col.min(line.len())]);
            let spaces = TAB_WIDTH - width % TAB_WIDTH;
            model.buffer.insert_str(&" ".repeat(spaces));
        }
        Message::Paste(text) => {
            let text = text.replace("\r\n", "\n").replace('\r', "\n");
            model.buffer.insert_str(&text);
        }
        Message::DeleteBack => {
            model.buffer.delete_back();
        }
        Message::DeleteForward => {
            model.buffer.delete_forward();
        }
        Message::SplitLine => model.buffer.split_line(),
        Message::InsertTemplate(template) => {
            template.insert_into(&mut model.buffer);
            model.show_toast(
                crate::app::ToastLevel::Info,
                format!("Inserted {}", template.label()),
            );
        }
        Message::ResetDocument => {
            model.buffer.replace_all(SAMPLE_DOCUMENT);
            model.editor_scroll = 0;
            model.preview_scroll = 0;
            model.show_toast(crate::app::ToastLevel::Info, "Document reset to sample");
        }

        // Cursor
        Message::MoveCursor(direction) => model.buffer.move_cursor(direction),
        Message::MoveHome => model.buffer.move_home(),
        Message::MoveEnd => model.buffer.move_end(),
        Message::MoveWordLeft => model.buffer.move_word_left(),
        Message::MoveWordRight => model.buffer.move_word_right(),
        Message::MoveToStart => model.buffer.move_to_start(),
        Message::MoveToEnd => model.buffer.move_to_end(),
        Message::MoveTo(line, col) => model.buffer.move_to(line, col),
        Message::EditorPageUp => {
            for _ in 0..model.editor_rows().max(1) {
                model.buffer.move_cursor(Direction::Up);
            }
        }
        Message::EditorPageDown => {
            for _ in 0..model.editor_rows().max(1) {
                model.buffer.move_cursor(Direction::Down);
            }
        }
        Message::ScrollEditorUp(n) => {
            model.editor_scroll = model.editor_scroll.saturating_sub(n);
        }
        Message::ScrollEditorDown(n) => {
            model.editor_scroll = model.editor_scroll.saturating_add(n);
            model.clamp_editor_scroll();
        }

        // Conversion
        Message::ConvertNow => {
            // The conversion itself runs in the event loop.
            if !model.view.mode.shows_preview() {
                model.view.mode = ViewMode::Preview;
            }
        }
        Message::Rendered(conversion) => {
            model.rendered.commit(conversion);
        }

        // Preview
        Message::ScrollPreviewUp(n) => {
            model.preview_scroll = model.preview_scroll.saturating_sub(n);
        }
        Message::ScrollPreviewDown(n) => {
            model.preview_scroll = model.preview_scroll.saturating_add(n);
        }
        Message::PreviewPageUp => {
            let page = model.preview_rows().max(1);
            model.preview_scroll = model.preview_scroll.saturating_sub(page);
        }
        Message::PreviewPageDown => {
            let page = model.preview_rows().max(1);
            model.preview_scroll = model.preview_scroll.saturating_add(page);
        }
        Message::PreviewTop => model.preview_scroll = 0,
        // Clamped to the content height when rendered.
        Message::PreviewBottom => model.preview_scroll = usize::MAX,

        // View
        Message::CycleViewMode => model.view.mode = model.view.mode.next(),
        Message::SetViewMode(mode) => model.view.mode = mode,
        Message::ToggleTheme => model.view.theme = model.view.theme.toggled(),
        Message::ToggleFullscreen => model.view.fullscreen = !model.view.fullscreen,
        Message::ToggleHtmlSource => {
            model.view.html_source = !model.view.html_source;
            model.preview_scroll = 0;
        }

        // Window
        Message::ToggleHelp => model.help_visible = !model.help_visible,
        Message::HideHelp => model.help_visible = false,
        Message::Resize(width, height) => model.size = (width, height),
        Message::Quit => model.should_quit = true,

        // CopyHtml/CopyMarkdown: handled in effects (side effect)
        // Redraw: no state change needed
        Message::CopyHtml | Message::CopyMarkdown | Message::Redraw => {}
    }

    if follow && model.view.mode.shows_editor() {
        model.ensure_cursor_visible();
    }

    model
}
