use ratatui::prelude::*;
use ratatui::symbols::Marker;
use ratatui::widgets::canvas::{Canvas, Context, Line as CanvasLine, Map, MapResolution, Points};

use crate::app::Model;
use crate::geometry::{Coord, Geometry};
use crate::map::{DragState, FeatureStyle, TerminalMap};

/// Vertex handles are skipped when a view would show more than this many.
const MAX_HANDLES: usize = 400;
const COASTLINE: Color = Color::Indexed(238);

pub fn render_map(model: &mut Model, frame: &mut Frame, area: Rect) {
    model.map_mut().set_area(area);
    if area.width == 0 || area.height == 0 {
        return;
    }

    let map = model.map();
    let view = map.camera().view_bounds(area);
    let fills: Vec<(Vec<(f64, f64)>, Color)> = map
        .features()
        .filter_map(|(_, geometry, style)| match geometry {
            Geometry::Polygon(rings) => Some((fill_samples(map, area, rings, style), style.fill_color)),
            _ => None,
        })
        .collect();
    let handles = vertex_handles(map);

    let canvas = Canvas::default()
        .marker(Marker::Braille)
        .x_bounds([view.min.x, view.max.x])
        .y_bounds([view.min.y, view.max.y])
        .paint(|ctx| {
            ctx.draw(&Map {
                color: COASTLINE,
                resolution: MapResolution::High,
            });
            ctx.layer();
            for (coords, color) in &fills {
                ctx.draw(&Points {
                    coords,
                    color: *color,
                });
            }
            ctx.layer();
            for (_, geometry, style) in map.features() {
                paint_geometry(ctx, geometry, style);
            }
            for (coord, active) in &handles {
                let style = if *active {
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };
                ctx.print(coord.x, coord.y, Span::styled("•", style));
            }
        });
    frame.render_widget(canvas, area);
}

fn paint_geometry(ctx: &mut Context<'_>, geometry: &Geometry, style: &FeatureStyle) {
    match geometry {
        Geometry::Point(c) => {
            ctx.print(c.x, c.y, Span::styled("●", Style::default().fg(style.color)));
        }
        Geometry::LineString(coords) => paint_path(ctx, coords, style.color),
        Geometry::Polygon(rings) => {
            for ring in rings {
                paint_path(ctx, ring, style.color);
            }
        }
        // The synchronizer only places leaves; draw members if anything else shows up.
        Geometry::MultiPoint(points) => {
            for c in points {
                paint_geometry(ctx, &Geometry::Point(*c), style);
            }
        }
        Geometry::MultiLineString(lines) => {
            for line in lines {
                paint_path(ctx, line, style.color);
            }
        }
        Geometry::MultiPolygon(polygons) => {
            for ring in polygons.iter().flatten() {
                paint_path(ctx, ring, style.color);
            }
        }
        Geometry::GeometryCollection(members) => {
            for member in members {
                paint_geometry(ctx, member, style);
            }
        }
    }
}

fn paint_path(ctx: &mut Context<'_>, coords: &[Coord], color: Color) {
    for pair in coords.windows(2) {
        ctx.draw(&CanvasLine::new(pair[0].x, pair[0].y, pair[1].x, pair[1].y, color));
    }
}

/// Cell centers inside a polygon, thinned to roughly `fill_opacity` of them.
///
/// Terminals have no alpha, so opacity becomes an ordered stipple.
fn fill_samples(
    map: &TerminalMap,
    area: Rect,
    rings: &[Vec<Coord>],
    style: &FeatureStyle,
) -> Vec<(f64, f64)> {
    if style.fill_opacity <= 0.0 {
        return Vec::new();
    }
    let period = (1.0 / style.fill_opacity.min(1.0)).round().clamp(1.0, 10.0) as u32;
    let mut samples = Vec::new();
    for row in area.y..area.y + area.height {
        for col in area.x..area.x + area.width {
            if (u32::from(col) + u32::from(row) * 2) % period != 0 {
                continue;
            }
            let c = map.cell_to_world(col, row);
            if polygon_contains(rings, c) {
                samples.push((c.x, c.y));
            }
        }
    }
    samples
}

/// Even-odd test over all rings, so holes stay empty.
pub fn polygon_contains(rings: &[Vec<Coord>], p: Coord) -> bool {
    let mut inside = false;
    for ring in rings {
        let n = ring.len();
        if n < 3 {
            continue;
        }
        let mut j = n - 1;
        for i in 0..n {
            let (a, b) = (ring[i], ring[j]);
            if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
                inside = !inside;
            }
            j = i;
        }
    }
    inside
}

/// Handles for editable vertices, with the one being dragged flagged.
fn vertex_handles(map: &TerminalMap) -> Vec<(Coord, bool)> {
    let dragged = match map.drag() {
        Some(DragState::Vertex { feature, vertex }) => Some((feature, vertex)),
        _ => None,
    };
    let mut handles = Vec::new();
    for (id, geometry, style) in map.features() {
        if !style.editable || style.weight <= 2 || matches!(geometry, Geometry::Point(_)) {
            continue;
        }
        for (vertex, coord) in geometry.vertices() {
            if map.world_to_cell(coord).is_some() {
                handles.push((coord, dragged == Some((id, vertex))));
            }
        }
    }
    if handles.len() > MAX_HANDLES {
        handles.retain(|(_, active)| *active);
    }
    handles
}
