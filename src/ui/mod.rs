//! Terminal UI components.
//!
//! This module contains all UI-related code including:
//! - [`preview`]: Turning converted HTML into styled terminal lines
//! - [`style`]: Theming and colors

pub mod preview;
pub mod style;

mod overlays;
mod render;
mod status;

pub use render::{PaneAreas, gutter_width, pane_areas, pane_inner, render};
