//! The editable markdown document.
//!
//! A rope-backed buffer with a single cursor and a revision counter.

mod buffer;

pub use buffer::{Cursor, Direction, MarkdownBuffer};
