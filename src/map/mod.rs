//! The map side of the synchronizer.
//!
//! - [`MapView`]: what the synchronizer needs from a map (add/remove
//!   features, fit, pan)
//! - [`Renderable`]: a parsed geometry split into drawable leaves
//! - [`MapEvent`] / [`MapListener`]: notifications flowing back from the map
//! - [`TerminalMap`]: the ratatui-backed implementation used by the app

mod renderable;
mod terminal;

pub use renderable::Renderable;
pub use terminal::{Camera, DragState, TerminalMap};

use ratatui::style::Color;

use crate::geometry::{Bounds, Coord, Geometry};

/// Opaque handle for a feature placed on a [`MapView`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeatureId(pub(crate) u64);

/// Drawing and interaction options applied to a feature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureStyle {
    pub color: Color,
    /// Stroke weight; weights above 2 draw vertex handles on lines.
    pub weight: u8,
    pub fill_color: Color,
    pub fill_opacity: f32,
    /// Whether the user may drag this feature's vertices.
    pub editable: bool,
}

impl Default for FeatureStyle {
    fn default() -> Self {
        Self {
            color: Color::Rgb(0xAA, 0x00, 0x00),
            weight: 3,
            fill_color: Color::Rgb(0xAA, 0x00, 0x00),
            fill_opacity: 0.2,
            editable: true,
        }
    }
}

impl FeatureStyle {
    #[must_use]
    pub const fn with_editable(mut self, editable: bool) -> Self {
        self.editable = editable;
        self
    }
}

/// Notifications a map raises for its listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapEvent {
    /// The view has a size and drew for the first time.
    Loaded,
    /// The user released the pointer over the map after an interaction.
    EditFinished,
}

/// Receives [`MapEvent`]s from a map.
pub trait MapListener {
    fn on_map_event(&mut self, event: MapEvent);
}

/// The operations the synchronizer drives on a rendered map.
pub trait MapView {
    /// Place `geometry` on the map and return its handle.
    fn add_feature(&mut self, geometry: Geometry, style: &FeatureStyle) -> FeatureId;

    /// Remove a feature. Unknown handles are ignored.
    fn remove_feature(&mut self, id: FeatureId);

    /// The feature's current geometry, including any user edits.
    fn feature_geometry(&self, id: FeatureId) -> Option<&Geometry>;

    /// Adjust center and zoom so `bounds` is fully visible.
    fn fit_bounds(&mut self, bounds: Bounds);

    /// Recenter on `point`, keeping the zoom.
    fn pan_to(&mut self, point: Coord);
}
