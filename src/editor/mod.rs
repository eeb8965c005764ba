//! The WKT text pane.
//!
//! Provides a rope-backed text buffer with cursor management that doubles
//! as the synchronizer's text surface.

mod buffer;

pub use buffer::{Cursor, Direction, EditorBuffer};
