use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::convert::Conversion;
use crate::editor::MarkdownBuffer;
use crate::view::ViewState;

/// Document shown when no file is given.
pub const SAMPLE_DOCUMENT: &str = "# Hello World\n\nThis is a **bold** statement and this is *italic*.\n\n## Lists\n\n- Item 1\n- Item 2\n  - Nested item\n\n## Code\n\n```javascript\nconst greeting = \"Hello, world!\";\nconsole.log(greeting);\n```\n\n## Links\n\n[Visit GitHub](https://github.com)\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// HTML derived from the document by the last committed conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedOutput {
    pub html: String,
    /// Document revision `html` was converted from.
    pub revision: u64,
    /// Whether `html` is the fallback markup.
    pub fallback: bool,
    committed: bool,
}

impl RenderedOutput {
    /// Commit `conversion` unless it is older than what is already shown.
    ///
    /// Returns `true` when the output was replaced.
    pub fn commit(&mut self, conversion: Conversion) -> bool {
        if self.committed && conversion.revision < self.revision {
            tracing::debug!(
                stale = conversion.revision,
                current = self.revision,
                "discarding stale conversion"
            );
            return false;
        }
        self.fallback = conversion.is_fallback();
        self.revision = conversion.revision;
        self.html = conversion.html;
        self.committed = true;
        true
    }

    /// Whether any conversion has been committed yet.
    pub const fn is_committed(&self) -> bool {
        self.committed
    }
}

/// The complete session state.
///
/// All state lives here - no global or scattered state.
pub struct Model {
    /// The markdown being edited
    pub buffer: MarkdownBuffer,
    /// Last committed conversion of `buffer`
    pub rendered: RenderedOutput,
    /// Presentation state
    pub view: ViewState,
    /// First buffer line shown in the editor pane
    pub editor_scroll: usize,
    /// First display column shown in the editor pane (set while rendering)
    pub editor_hscroll: usize,
    /// First rendered line shown in the preview pane
    pub preview_scroll: usize,
    /// Terminal size (columns, rows)
    pub size: (u16, u16),
    /// Name of the file the document was loaded from, if any
    pub source_name: Option<String>,
    /// Global config path shown in help
    pub config_global_path: Option<PathBuf>,
    /// Local override path shown in help
    pub config_local_path: Option<PathBuf>,
    /// Whether help overlay is visible
    pub help_visible: bool,
    /// Whether the app should quit
    pub should_quit: bool,
    toast: Option<Toast>,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("buffer", &self.buffer)
            .field("rendered_revision", &self.rendered.revision)
            .field("view", &self.view)
            .finish_non_exhaustive()
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new("", (80, 24))
    }
}

impl Model {
    /// Create a session editing `text` in a terminal of `terminal_size`.
    pub fn new(text: &str, terminal_size: (u16, u16)) -> Self {
        Self {
            buffer: MarkdownBuffer::from_text(text),
            rendered: RenderedOutput::default(),
            view: ViewState::default(),
            editor_scroll: 0,
            editor_hscroll: 0,
            preview_scroll: 0,
            size: terminal_size,
            source_name: None,
            config_global_path: None,
            config_local_path: None,
            help_visible: false,
            should_quit: false,
            toast: None,
        }
    }

    #[must_use]
    pub const fn with_view(mut self, view: ViewState) -> Self {
        self.view = view;
        self
    }

    #[must_use]
    pub fn with_source_name(mut self, name: Option<String>) -> Self {
        self.source_name = name;
        self
    }

    /// True while the committed output lags behind the document.
    pub fn render_pending(&self) -> bool {
        !self.rendered.is_committed() || self.rendered.revision != self.buffer.revision()
    }

    /// Rows available to the editor pane's text.
    pub fn editor_rows(&self) -> usize {
        let area = ratatui::layout::Rect::new(0, 0, self.size.0, self.size.1);
        crate::ui::pane_areas(area, &self.view)
            .editor
            .map_or(0, |rect| crate::ui::pane_inner(rect, &self.view).height as usize)
    }

    /// Rows available to the preview pane's text.
    pub fn preview_rows(&self) -> usize {
        let area = ratatui::layout::Rect::new(0, 0, self.size.0, self.size.1);
        crate::ui::pane_areas(area, &self.view)
            .preview
            .map_or(0, |rect| crate::ui::pane_inner(rect, &self.view).height as usize)
    }

    /// Scroll the editor so the cursor row is visible.
    pub(super) fn ensure_cursor_visible(&mut self) {
        let rows = self.editor_rows().max(1);
        let line = self.buffer.cursor().line;
        if line < self.editor_scroll {
            self.editor_scroll = line;
        } else if line >= self.editor_scroll + rows {
            self.editor_scroll = line + 1 - rows;
        }
    }

    pub(super) fn clamp_editor_scroll(&mut self) {
        let max = self.buffer.line_count().saturating_sub(1);
        self.editor_scroll = self.editor_scroll.min(max);
    }

    pub(super) fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + Duration::from_secs(3),
        });
    }

    pub(super) fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conversion(revision: u64, html: &str) -> Conversion {
        Conversion {
            revision,
            html: html.to_string(),
            error: None,
        }
    }

    #[test]
    fn test_commit_replaces_output() {
        let mut out = RenderedOutput::default();
        assert!(out.commit(conversion(0, "<p>a</p>")));
        assert!(out.is_committed());
        assert!(out.commit(conversion(3, "<p>b</p>")));
        assert_eq!(out.html, "<p>b</p>");
        assert_eq!(out.revision, 3);
    }

    #[test]
    fn test_commit_rejects_older_revision() {
        let mut out = RenderedOutput::default();
        out.commit(conversion(5, "<p>new</p>"));
        assert!(!out.commit(conversion(4, "<p>old</p>")));
        assert_eq!(out.html, "<p>new</p>");
    }

    #[test]
    fn test_render_pending_tracks_revision() {
        let mut model = Model::new("x", (80, 24));
        assert!(model.render_pending());
        model.rendered.commit(conversion(0, "<p>x</p>"));
        assert!(!model.render_pending());
        model.buffer.insert_char('y');
        assert!(model.render_pending());
    }
}
