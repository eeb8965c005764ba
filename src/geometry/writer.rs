use std::fmt::{self, Write as _};

use super::types::{Coord, Geometry};

/// Separator written between the x and y of each coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delimiter {
    #[default]
    Space,
    /// `+`, safe to embed in a URL query parameter.
    UrlSafe,
}

impl Delimiter {
    pub const fn from_url_safe(url_safe: bool) -> Self {
        if url_safe { Self::UrlSafe } else { Self::Space }
    }

    pub const fn as_char(self) -> char {
        match self {
            Self::Space => ' ',
            Self::UrlSafe => '+',
        }
    }
}

/// Serializes geometries to compact uppercase WKT, e.g. `POINT(10 20)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WktWriter {
    delimiter: Delimiter,
}

impl WktWriter {
    pub const fn new(delimiter: Delimiter) -> Self {
        Self { delimiter }
    }

    pub const fn delimiter(&self) -> Delimiter {
        self.delimiter
    }

    pub fn write(&self, geometry: &Geometry) -> String {
        let mut out = String::new();
        self.write_geometry(geometry, &mut out);
        out
    }

    fn write_geometry(&self, geometry: &Geometry, out: &mut String) {
        out.push_str(geometry.kind().keyword());
        match geometry {
            Geometry::Point(c) => {
                out.push('(');
                self.write_coord(*c, out);
                out.push(')');
            }
            Geometry::LineString(coords) => self.write_coords(coords, out),
            Geometry::Polygon(rings) | Geometry::MultiLineString(rings) => {
                self.write_rings(rings, out);
            }
            Geometry::MultiPoint(coords) => {
                out.push('(');
                for (i, c) in coords.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    out.push('(');
                    self.write_coord(*c, out);
                    out.push(')');
                }
                out.push(')');
            }
            Geometry::MultiPolygon(polygons) => {
                out.push('(');
                for (i, rings) in polygons.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    self.write_rings(rings, out);
                }
                out.push(')');
            }
            Geometry::GeometryCollection(members) => {
                out.push('(');
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    self.write_geometry(member, out);
                }
                out.push(')');
            }
        }
    }

    fn write_rings(&self, rings: &[Vec<Coord>], out: &mut String) {
        out.push('(');
        for (i, ring) in rings.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            self.write_coords(ring, out);
        }
        out.push(')');
    }

    fn write_coords(&self, coords: &[Coord], out: &mut String) {
        out.push('(');
        for (i, c) in coords.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            self.write_coord(*c, out);
        }
        out.push(')');
    }

    fn write_coord(&self, coord: Coord, out: &mut String) {
        // Writing into a String cannot fail.
        let _ = write!(out, "{}{}{}", coord.x, self.delimiter.as_char(), coord.y);
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&WktWriter::default().write(self))
    }
}
