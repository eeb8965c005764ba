use std::collections::BTreeMap;

use ratatui::layout::Rect;

use super::{FeatureId, FeatureStyle, MapEvent, MapView};
use crate::geometry::{Bounds, Coord, Geometry, VertexRef};

/// Cells are roughly twice as tall as they are wide.
const CELL_ASPECT: f64 = 2.0;
/// Extra room left around bounds passed to [`MapView::fit_bounds`].
const FIT_MARGIN: f64 = 1.1;
/// Area assumed before the first render reports the real one.
const FALLBACK_AREA: Rect = Rect::new(0, 0, 80, 24);

/// Where the map looks and how far it is zoomed in.
///
/// At zoom 0 the full 360 degrees of longitude span the map width; each zoom
/// step halves that.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub center: Coord,
    pub zoom: f64,
}

impl Camera {
    pub const MIN_ZOOM: f64 = 0.0;
    pub const MAX_ZOOM: f64 = 18.0;

    pub const fn new(center: Coord, zoom: f64) -> Self {
        Self { center, zoom }
    }

    /// World units per cell horizontally and vertically for `area`.
    pub fn cell_size(&self, area: Rect) -> (f64, f64) {
        let span_x = 360.0 / self.zoom.exp2();
        let dx = span_x / f64::from(area.width.max(1));
        (dx, dx * CELL_ASPECT)
    }

    /// The world rectangle visible in `area`.
    pub fn view_bounds(&self, area: Rect) -> Bounds {
        let (dx, dy) = self.cell_size(area);
        let half_w = dx * f64::from(area.width) / 2.0;
        let half_h = dy * f64::from(area.height) / 2.0;
        Bounds {
            min: Coord::new(self.center.x - half_w, self.center.y - half_h),
            max: Coord::new(self.center.x + half_w, self.center.y + half_h),
        }
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(Self::MIN_ZOOM, Self::MAX_ZOOM);
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Coord::new(20.0, 10.0), 2.0)
    }
}

/// An in-progress pointer interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragState {
    Vertex { feature: FeatureId, vertex: VertexRef },
    Pan { col: u16, row: u16 },
}

#[derive(Debug, Clone)]
struct PlacedFeature {
    geometry: Geometry,
    style: FeatureStyle,
}

/// A [`MapView`] drawn on a terminal canvas, with vertex drag editing.
#[derive(Debug, Clone, Default)]
pub struct TerminalMap {
    features: BTreeMap<FeatureId, PlacedFeature>,
    next_id: u64,
    camera: Camera,
    area: Option<Rect>,
    drag: Option<DragState>,
    events: Vec<MapEvent>,
    loaded: bool,
}

impl TerminalMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn camera(&self) -> Camera {
        self.camera
    }

    /// The inner area the map was last drawn in.
    pub const fn area(&self) -> Option<Rect> {
        self.area
    }

    /// Record the drawing area. The first non-empty area fires [`MapEvent::Loaded`].
    pub fn set_area(&mut self, area: Rect) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        self.area = Some(area);
        if !self.loaded {
            self.loaded = true;
            self.events.push(MapEvent::Loaded);
        }
    }

    pub const fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    /// Features in insertion order.
    pub fn features(&self) -> impl Iterator<Item = (FeatureId, &Geometry, &FeatureStyle)> {
        self.features
            .iter()
            .map(|(id, placed)| (*id, &placed.geometry, &placed.style))
    }

    pub const fn drag(&self) -> Option<DragState> {
        self.drag
    }

    /// Take all queued events.
    pub fn drain_events(&mut self) -> Vec<MapEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn contains_cell(&self, col: u16, row: u16) -> bool {
        self.area.is_some_and(|a| {
            col >= a.x && col < a.x + a.width && row >= a.y && row < a.y + a.height
        })
    }

    /// World coordinate at the center of a terminal cell.
    pub fn cell_to_world(&self, col: u16, row: u16) -> Coord {
        let area = self.current_area();
        let view = self.camera.view_bounds(area);
        let (dx, dy) = self.camera.cell_size(area);
        let rel_col = f64::from(col) - f64::from(area.x) + 0.5;
        let rel_row = f64::from(row) - f64::from(area.y) + 0.5;
        Coord::new(view.min.x + rel_col * dx, view.max.y - rel_row * dy)
    }

    /// The cell containing `coord`, or `None` when it is off screen.
    pub fn world_to_cell(&self, coord: Coord) -> Option<(u16, u16)> {
        let area = self.current_area();
        let view = self.camera.view_bounds(area);
        let (dx, dy) = self.camera.cell_size(area);
        let col = ((coord.x - view.min.x) / dx).floor();
        let row = ((view.max.y - coord.y) / dy).floor();
        if col < 0.0 || row < 0.0 || col >= f64::from(area.width) || row >= f64::from(area.height)
        {
            return None;
        }
        Some((area.x + col as u16, area.y + row as u16))
    }

    /// The editable vertex nearest to a cell, within one cell.
    ///
    /// Later features sit on top and win ties.
    pub fn hit_vertex(&self, col: u16, row: u16) -> Option<(FeatureId, VertexRef)> {
        let mut best: Option<(u32, FeatureId, VertexRef)> = None;
        for (id, placed) in self.features.iter().rev() {
            if !placed.style.editable {
                continue;
            }
            for (vertex, coord) in placed.geometry.vertices() {
                let Some((vc, vr)) = self.world_to_cell(coord) else {
                    continue;
                };
                let dist = u32::from(vc.abs_diff(col).max(vr.abs_diff(row)));
                if dist <= 1 && best.is_none_or(|(d, _, _)| dist < d) {
                    best = Some((dist, *id, vertex));
                }
            }
        }
        best.map(|(_, id, vertex)| (id, vertex))
    }

    /// Start dragging a vertex, or panning when no vertex is under the pointer.
    pub fn pointer_down(&mut self, col: u16, row: u16) -> bool {
        if !self.contains_cell(col, row) {
            return false;
        }
        self.drag = Some(match self.hit_vertex(col, row) {
            Some((feature, vertex)) => DragState::Vertex { feature, vertex },
            None => DragState::Pan { col, row },
        });
        true
    }

    pub fn pointer_drag(&mut self, col: u16, row: u16) {
        match self.drag {
            Some(DragState::Vertex { feature, vertex }) => {
                let to = self.cell_to_world(col, row);
                if let Some(placed) = self.features.get_mut(&feature) {
                    placed.geometry.move_vertex(vertex, to);
                }
            }
            Some(DragState::Pan { col: last_col, row: last_row }) => {
                let (dx, dy) = self.camera.cell_size(self.current_area());
                self.camera.center.x -= (f64::from(col) - f64::from(last_col)) * dx;
                self.camera.center.y += (f64::from(row) - f64::from(last_row)) * dy;
                self.drag = Some(DragState::Pan { col, row });
            }
            None => {}
        }
    }

    /// Finish any interaction. Releasing over the map fires [`MapEvent::EditFinished`].
    pub fn pointer_up(&mut self, col: u16, row: u16) -> bool {
        self.drag = None;
        if self.contains_cell(col, row) {
            self.events.push(MapEvent::EditFinished);
            true
        } else {
            false
        }
    }

    pub fn zoom_by(&mut self, delta: f64) {
        self.camera.set_zoom(self.camera.zoom + delta);
    }

    /// Shift the camera by whole cells.
    pub fn pan_cells(&mut self, cols: i32, rows: i32) {
        let (dx, dy) = self.camera.cell_size(self.current_area());
        self.camera.center.x += f64::from(cols) * dx;
        self.camera.center.y -= f64::from(rows) * dy;
    }

    fn current_area(&self) -> Rect {
        self.area.unwrap_or(FALLBACK_AREA)
    }
}

impl MapView for TerminalMap {
    fn add_feature(&mut self, geometry: Geometry, style: &FeatureStyle) -> FeatureId {
        let id = FeatureId(self.next_id);
        self.next_id += 1;
        self.features.insert(
            id,
            PlacedFeature {
                geometry,
                style: *style,
            },
        );
        id
    }

    fn remove_feature(&mut self, id: FeatureId) {
        self.features.remove(&id);
        if matches!(self.drag, Some(DragState::Vertex { feature, .. }) if feature == id) {
            self.drag = None;
        }
    }

    fn feature_geometry(&self, id: FeatureId) -> Option<&Geometry> {
        self.features.get(&id).map(|placed| &placed.geometry)
    }

    fn fit_bounds(&mut self, bounds: Bounds) {
        let area = self.current_area();
        let width = f64::from(area.width.max(1));
        let height = f64::from(area.height.max(1));
        // Horizontal span needed so both dimensions fit.
        let need_x = bounds.width() * FIT_MARGIN;
        let need_y = bounds.height() * FIT_MARGIN * width / (height * CELL_ASPECT);
        let span = need_x.max(need_y);
        let zoom = if span > 0.0 {
            (360.0 / span).log2().floor()
        } else {
            Camera::MAX_ZOOM
        };
        self.camera.center = bounds.center();
        self.camera.set_zoom(zoom);
    }

    fn pan_to(&mut self, point: Coord) {
        self.camera.center = point;
    }
}
