//! Terminal UI components.
//!
//! This module contains all UI-related code including:
//! - the WKT editor pane with soft wrapping
//! - the map canvas with features, fills and vertex handles
//! - status bar, toasts and the help overlay

mod editor_pane;
mod map_pane;
mod overlays;
mod render;
mod status;

pub use editor_pane::{VisualRow, editor_position_at, wrap_rows};
pub use map_pane::polygon_contains;
pub use render::{render, split_main_columns};

pub const EDITOR_WIDTH_PERCENT: u16 = 35;
pub const MAP_WIDTH_PERCENT: u16 = 65;
