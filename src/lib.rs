// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. convert::ConversionError)
    clippy::module_name_repetitions
)]

//! # Markpane
//!
//! A terminal markdown editor with a live HTML preview.
//!
//! Markpane shows the markdown source and its rendered HTML side by side:
//! - Debounced conversion while typing, with a fixed fallback on failure
//! - Edit, split and preview layouts, light and dark themes, fullscreen
//! - Templates for tables, code blocks, quotes, images, links and headings
//! - Copying the HTML or markdown to the clipboard
//!
//! ## Architecture
//!
//! Markpane uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`app`]: Main application loop and state
//! - [`convert`]: Markdown to HTML pipeline and debounce
//! - [`editor`]: Markdown text buffer
//! - [`templates`]: Snippet insertion
//! - [`view`]: View mode, theme and fullscreen state
//! - [`ui`]: Terminal UI components
//! - [`config`]: Saved defaults

pub mod app;
pub mod config;
pub mod convert;
pub mod editor;
pub mod templates;
pub mod ui;
pub mod view;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::convert::{ComrakRenderer, Conversion, LivePreview, Pipeline, Renderer};
    pub use crate::editor::MarkdownBuffer;
    pub use crate::view::{Theme, ViewMode, ViewState};
}
