// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. map::MapView)
    clippy::module_name_repetitions
)]

//! # wktmap
//!
//! A terminal editor for Well-Known Text with a live, editable map.
//!
//! The editor and the map stay in step:
//! - typing or pasting WKT redraws the map
//! - dragging a vertex on the map rewrites the text
//! - multi-geometries and collections render as one feature per member
//!
//! ## Architecture
//!
//! The interactive app uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`geometry`]: WKT parsing and writing
//! - [`map`]: Map views, events and the terminal map
//! - [`sync`]: Keeping text and map in agreement
//! - [`editor`]: Rope-backed text buffer
//! - [`app`]: Main application loop and state
//! - [`ui`]: Terminal UI components
//! - [`watcher`]: File watching
//! - [`config`]: Saved default flags

pub mod app;
pub mod config;
pub mod editor;
pub mod geometry;
pub mod map;
pub mod perf;
pub mod sync;
pub mod ui;
pub mod watcher;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::geometry::{Geometry, WktError, WktWriter, parse_strict};
    pub use crate::map::{MapEvent, MapListener, MapView};
    pub use crate::sync::{SyncOptions, SyncOutcome, Synchronizer, TextSurface};
}
