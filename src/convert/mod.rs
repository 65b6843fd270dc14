//! Markdown to HTML conversion.
//!
//! The [`Pipeline`] wraps a [`Renderer`] (normally [`ComrakRenderer`]) and
//! guarantees that a conversion always produces markup: when the renderer
//! fails or panics the fixed [`FALLBACK_HTML`] is returned instead.
//!
//! [`LivePreview`] couples the pipeline with a [`RenderDebouncer`] so that a
//! burst of edits results in a single conversion of the final text.

mod debounce;

pub use debounce::{Debouncer, RenderDebouncer};

use std::panic::{self, AssertUnwindSafe};

use comrak::{Options, markdown_to_html};
use thiserror::Error;

/// Default quiet period between the last edit and the conversion.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Markup committed in place of the preview when the renderer fails.
pub const FALLBACK_HTML: &str =
    "<p class=\"render-error\">Error: unable to render markdown preview.</p>\n";

/// Why a renderer did not produce HTML.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// The renderer reported a failure.
    #[error("renderer failed: {0}")]
    Failed(String),
    /// The renderer panicked while converting.
    #[error("renderer panicked: {0}")]
    Panicked(String),
}

/// A markdown to HTML transformation.
pub trait Renderer {
    /// Convert `markdown` into HTML markup.
    ///
    /// # Errors
    /// Returns [`RenderError`] when the markdown cannot be converted.
    fn render(&self, markdown: &str) -> Result<String, RenderError>;
}

/// GitHub flavored markdown renderer backed by comrak.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComrakRenderer {
    unsafe_html: bool,
}

impl ComrakRenderer {
    pub const fn new() -> Self {
        Self { unsafe_html: false }
    }

    /// Pass raw HTML blocks and inlines through instead of omitting them.
    #[must_use]
    pub const fn with_unsafe_html(mut self, enabled: bool) -> Self {
        self.unsafe_html = enabled;
        self
    }
}

impl Renderer for ComrakRenderer {
    fn render(&self, markdown: &str) -> Result<String, RenderError> {
        let mut options = Options::default();

        // GFM extensions
        options.extension.strikethrough = true;
        options.extension.table = true;
        options.extension.autolink = true;
        options.extension.tasklist = true;
        options.extension.footnotes = true;
        options.extension.superscript = true;
        options.extension.header_ids = Some(String::new());
        options.extension.description_lists = true;

        options.render.unsafe_ = self.unsafe_html;

        Ok(markdown_to_html(markdown, &options))
    }
}

/// Result of a single conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    /// Document revision the markdown was taken from.
    pub revision: u64,
    /// Rendered markup, or [`FALLBACK_HTML`].
    pub html: String,
    /// Set when `html` is the fallback markup.
    pub error: Option<RenderError>,
}

impl Conversion {
    pub const fn is_fallback(&self) -> bool {
        self.error.is_some()
    }
}

/// Conversion boundary: failures never escape it.
pub struct Pipeline {
    renderer: Box<dyn Renderer>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline").finish_non_exhaustive()
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(ComrakRenderer::new())
    }
}

impl Pipeline {
    pub fn new(renderer: impl Renderer + 'static) -> Self {
        Self {
            renderer: Box::new(renderer),
        }
    }

    /// Convert `markdown` taken from document `revision`.
    pub fn convert(&self, revision: u64, markdown: &str) -> Conversion {
        let result = panic::catch_unwind(AssertUnwindSafe(|| self.renderer.render(markdown)))
            .unwrap_or_else(|payload| Err(RenderError::Panicked(panic_message(&*payload))));

        match result {
            Ok(html) => {
                tracing::debug!(revision, bytes = html.len(), "markdown converted");
                Conversion {
                    revision,
                    html,
                    error: None,
                }
            }
            Err(err) => {
                tracing::warn!(revision, error = %err, "markdown conversion failed, using fallback");
                Conversion {
                    revision,
                    html: FALLBACK_HTML.to_string(),
                    error: Some(err),
                }
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Debounced conversion driver used by the event loop.
///
/// Edits are reported with [`LivePreview::note_edit`]; [`LivePreview::poll`]
/// runs the conversion once the quiet period after the latest edit elapsed.
#[derive(Debug)]
pub struct LivePreview {
    pipeline: Pipeline,
    debouncer: RenderDebouncer,
    conversions: u64,
}

impl LivePreview {
    pub const fn new(pipeline: Pipeline, debounce_ms: u64) -> Self {
        Self {
            pipeline,
            debouncer: RenderDebouncer::new(debounce_ms),
            conversions: 0,
        }
    }

    /// Schedule a conversion for `revision`, replacing any pending one.
    pub fn note_edit(&mut self, revision: u64, now_ms: u64) {
        if let Some(previous) = self.debouncer.pending() {
            tracing::trace!(previous, revision, "pending conversion superseded");
        }
        self.debouncer.queue(revision, now_ms);
    }

    /// Run the pending conversion if its quiet period has elapsed.
    ///
    /// `revision` is the document's current revision; `text` supplies its
    /// content and is only called when a conversion actually runs.
    pub fn poll(
        &mut self,
        now_ms: u64,
        revision: u64,
        text: impl FnOnce() -> String,
    ) -> Option<Conversion> {
        let queued = self.debouncer.take_ready(now_ms)?;
        if revision != queued {
            tracing::debug!(queued, revision, "document moved on since scheduling");
        }
        Some(self.run(revision, &text()))
    }

    /// Cancel any pending conversion and convert immediately.
    pub fn flush(&mut self, revision: u64, text: &str) -> Conversion {
        self.debouncer.cancel();
        self.run(revision, text)
    }

    fn run(&mut self, revision: u64, text: &str) -> Conversion {
        self.conversions += 1;
        self.pipeline.convert(revision, text)
    }

    pub const fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Milliseconds until the pending conversion is due.
    pub fn due_in(&self, now_ms: u64) -> Option<u64> {
        self.debouncer.due_in(now_ms)
    }

    /// Number of conversions run so far.
    pub const fn conversions(&self) -> u64 {
        self.conversions
    }

    pub const fn debounce_ms(&self) -> u64 {
        self.debouncer.delay_ms()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct FailingRenderer;

    impl Renderer for FailingRenderer {
        fn render(&self, _markdown: &str) -> Result<String, RenderError> {
            Err(RenderError::Failed("boom".to_string()))
        }
    }

    struct PanickingRenderer;

    impl Renderer for PanickingRenderer {
        fn render(&self, _markdown: &str) -> Result<String, RenderError> {
            panic!("renderer exploded");
        }
    }

    /// Records every markdown string it is asked to render.
    #[derive(Clone, Default)]
    struct RecordingRenderer {
        calls: Rc<RefCell<Vec<String>>>,
    }

    impl Renderer for RecordingRenderer {
        fn render(&self, markdown: &str) -> Result<String, RenderError> {
            self.calls.borrow_mut().push(markdown.to_string());
            Ok(format!("<p>{markdown}</p>"))
        }
    }

    #[test]
    fn test_heading_renders_h1() {
        let out = Pipeline::default().convert(1, "# Hello");
        assert!(out.html.contains("<h1"), "got {}", out.html);
        assert!(out.html.contains(">Hello</h1>"), "got {}", out.html);
        assert!(!out.is_fallback());
    }

    #[test]
    fn test_bold_renders_strong() {
        let out = Pipeline::default().convert(1, "**bold**");
        assert!(out.html.contains("<strong>bold</strong>"), "got {}", out.html);
    }

    #[test]
    fn test_empty_input_is_empty_not_fallback() {
        let out = Pipeline::default().convert(0, "");
        assert!(out.html.trim().is_empty());
        assert!(!out.is_fallback());
        assert_ne!(out.html, FALLBACK_HTML);
    }

    #[test]
    fn test_conversion_is_idempotent() {
        let pipeline = Pipeline::default();
        let md = "# Title\n\n- a\n- b\n\n| x | y |\n|---|---|\n| 1 | 2 |\n";
        assert_eq!(pipeline.convert(3, md), pipeline.convert(3, md));
    }

    #[test]
    fn test_gfm_table_and_strikethrough() {
        let out = Pipeline::default().convert(1, "~~gone~~\n\n| a |\n|---|\n| b |\n");
        assert!(out.html.contains("<del>gone</del>"));
        assert!(out.html.contains("<table>"));
    }

    #[test]
    fn test_raw_html_omitted_by_default() {
        let out = Pipeline::default().convert(1, "<script>alert(1)</script>\n");
        assert!(!out.html.contains("<script>"));
    }

    #[test]
    fn test_raw_html_passes_through_when_unsafe() {
        let pipeline = Pipeline::new(ComrakRenderer::new().with_unsafe_html(true));
        let out = pipeline.convert(1, "<div class=\"x\">hi</div>\n");
        assert!(out.html.contains("<div class=\"x\">hi</div>"));
    }

    #[test]
    fn test_failing_renderer_yields_fallback() {
        let out = Pipeline::new(FailingRenderer).convert(7, "# Hello");
        assert_eq!(out.html, FALLBACK_HTML);
        assert_eq!(out.revision, 7);
        assert_eq!(out.error, Some(RenderError::Failed("boom".to_string())));
    }

    #[test]
    fn test_panicking_renderer_yields_fallback() {
        let out = Pipeline::new(PanickingRenderer).convert(2, "text");
        assert_eq!(out.html, FALLBACK_HTML);
        assert!(matches!(out.error, Some(RenderError::Panicked(ref msg)) if msg.contains("exploded")));
    }

    #[test]
    fn test_live_preview_coalesces_keystroke_burst() {
        let renderer = RecordingRenderer::default();
        let calls = Rc::clone(&renderer.calls);
        let mut live = LivePreview::new(Pipeline::new(renderer), 300);

        let mut text = String::new();
        let mut revision = 0;
        for (i, ch) in "hello".chars().enumerate() {
            let now = i as u64 * 50;
            text.push(ch);
            revision += 1;
            live.note_edit(revision, now);
            assert!(live.poll(now, revision, || text.clone()).is_none());
        }

        assert!(live.poll(499, revision, || text.clone()).is_none());
        let out = live
            .poll(500, revision, || text.clone())
            .expect("conversion due");
        assert_eq!(out.revision, 5);
        assert_eq!(out.html, "<p>hello</p>");
        assert_eq!(*calls.borrow(), vec!["hello".to_string()]);
        assert_eq!(live.conversions(), 1);

        assert!(live.poll(10_000, revision, || text.clone()).is_none());
    }

    #[test]
    fn test_live_preview_flush_cancels_pending() {
        let renderer = RecordingRenderer::default();
        let calls = Rc::clone(&renderer.calls);
        let mut live = LivePreview::new(Pipeline::new(renderer), 300);

        live.note_edit(1, 0);
        let out = live.flush(1, "now");
        assert_eq!(out.html, "<p>now</p>");
        assert!(!live.is_pending());
        assert!(live.poll(1_000, 1, || "now".to_string()).is_none());
        assert_eq!(calls.borrow().len(), 1);
    }

    #[test]
    fn test_failed_conversion_is_not_retried_until_next_edit() {
        let mut live = LivePreview::new(Pipeline::new(FailingRenderer), 100);
        live.note_edit(1, 0);
        let first = live.poll(100, 1, || "x".to_string()).expect("due");
        assert!(first.is_fallback());
        assert!(live.poll(500, 1, || "x".to_string()).is_none());

        live.note_edit(2, 600);
        assert!(live.poll(700, 2, || "xy".to_string()).is_some());
        assert_eq!(live.conversions(), 2);
    }
}
