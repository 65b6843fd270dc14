//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering
//!
//! Conversions are driven by the event loop: every message that changes the
//! document revision schedules a debounced conversion, and finished
//! conversions come back into [`update`] as [`Message::Rendered`].

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use model::{Model, RenderedOutput, SAMPLE_DOCUMENT, ToastLevel};
pub use update::{Message, update};

use std::path::PathBuf;

use crate::convert::{ComrakRenderer, DEFAULT_DEBOUNCE_MS, Pipeline};
use crate::view::ViewState;

/// Main application struct that owns the terminal and runs the event loop.
pub struct App {
    initial_text: String,
    source_name: Option<String>,
    view: ViewState,
    debounce_ms: u64,
    unsafe_html: bool,
    config_global_path: Option<PathBuf>,
    config_local_path: Option<PathBuf>,
}

impl App {
    /// Create a new application editing `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            initial_text: text.into(),
            source_name: None,
            view: ViewState::default(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            unsafe_html: false,
            config_global_path: None,
            config_local_path: None,
        }
    }

    /// Name shown in the status bar, usually the file the text came from.
    #[must_use]
    pub fn with_source_name(mut self, name: Option<String>) -> Self {
        self.source_name = name;
        self
    }

    /// Set the initial view mode, theme and fullscreen state.
    #[must_use]
    pub const fn with_view(mut self, view: ViewState) -> Self {
        self.view = view;
        self
    }

    /// Quiet period between the last edit and the conversion.
    #[must_use]
    pub const fn with_debounce_ms(mut self, ms: u64) -> Self {
        self.debounce_ms = ms;
        self
    }

    /// Pass raw HTML in the markdown through to the output.
    #[must_use]
    pub const fn with_unsafe_html(mut self, enabled: bool) -> Self {
        self.unsafe_html = enabled;
        self
    }

    /// Set config paths to show in help.
    #[must_use]
    pub fn with_config_paths(
        mut self,
        global_path: Option<PathBuf>,
        local_path: Option<PathBuf>,
    ) -> Self {
        self.config_global_path = global_path;
        self.config_local_path = local_path;
        self
    }

    fn pipeline(&self) -> Pipeline {
        Pipeline::new(ComrakRenderer::new().with_unsafe_html(self.unsafe_html))
    }
}
