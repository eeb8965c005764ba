use std::fmt;

/// A 2D coordinate. On the map `x` is longitude and `y` is latitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coord {
    pub x: f64,
    pub y: f64,
}

impl Coord {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounding rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Coord,
    pub max: Coord,
}

impl Bounds {
    /// Degenerate bounds covering a single coordinate.
    pub const fn from_coord(coord: Coord) -> Self {
        Self {
            min: coord,
            max: coord,
        }
    }

    pub fn extend(&mut self, coord: Coord) {
        self.min.x = self.min.x.min(coord.x);
        self.min.y = self.min.y.min(coord.y);
        self.max.x = self.max.x.max(coord.x);
        self.max.y = self.max.y.max(coord.y);
    }

    #[must_use]
    pub fn union(mut self, other: Self) -> Self {
        self.extend(other.min);
        self.extend(other.max);
        self
    }

    pub const fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub const fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub const fn center(&self) -> Coord {
        Coord::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }

    /// True when the bounds collapse to one coordinate.
    pub fn is_point(&self) -> bool {
        self.width() == 0.0 && self.height() == 0.0
    }
}

/// The WKT geometry type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryKind {
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection,
}

impl GeometryKind {
    /// Uppercase WKT keyword.
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Point => "POINT",
            Self::LineString => "LINESTRING",
            Self::Polygon => "POLYGON",
            Self::MultiPoint => "MULTIPOINT",
            Self::MultiLineString => "MULTILINESTRING",
            Self::MultiPolygon => "MULTIPOLYGON",
            Self::GeometryCollection => "GEOMETRYCOLLECTION",
        }
    }

    /// Case-insensitive keyword lookup.
    pub fn from_keyword(word: &str) -> Option<Self> {
        [
            Self::Point,
            Self::LineString,
            Self::Polygon,
            Self::MultiPoint,
            Self::MultiLineString,
            Self::MultiPolygon,
            Self::GeometryCollection,
        ]
        .into_iter()
        .find(|kind| kind.keyword().eq_ignore_ascii_case(word))
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Addresses one vertex of a single (non-multi) geometry.
///
/// `ring` is always 0 for points and line strings; for polygons it is the
/// ring index (0 = exterior).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexRef {
    pub ring: usize,
    pub index: usize,
}

impl VertexRef {
    pub const fn new(ring: usize, index: usize) -> Self {
        Self { ring, index }
    }
}

/// A parsed 2D geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Coord),
    LineString(Vec<Coord>),
    /// Exterior ring followed by holes.
    Polygon(Vec<Vec<Coord>>),
    MultiPoint(Vec<Coord>),
    MultiLineString(Vec<Vec<Coord>>),
    MultiPolygon(Vec<Vec<Vec<Coord>>>),
    GeometryCollection(Vec<Geometry>),
}

impl Geometry {
    pub const fn kind(&self) -> GeometryKind {
        match self {
            Self::Point(_) => GeometryKind::Point,
            Self::LineString(_) => GeometryKind::LineString,
            Self::Polygon(_) => GeometryKind::Polygon,
            Self::MultiPoint(_) => GeometryKind::MultiPoint,
            Self::MultiLineString(_) => GeometryKind::MultiLineString,
            Self::MultiPolygon(_) => GeometryKind::MultiPolygon,
            Self::GeometryCollection(_) => GeometryKind::GeometryCollection,
        }
    }

    /// Whether this geometry is a container of other shapes.
    pub const fn is_multi(&self) -> bool {
        matches!(
            self,
            Self::MultiPoint(_)
                | Self::MultiLineString(_)
                | Self::MultiPolygon(_)
                | Self::GeometryCollection(_)
        )
    }

    /// Visit every coordinate in document order.
    pub fn for_each_coord<F: FnMut(Coord)>(&self, f: &mut F) {
        match self {
            Self::Point(c) => f(*c),
            Self::LineString(coords) | Self::MultiPoint(coords) => {
                coords.iter().copied().for_each(f);
            }
            Self::Polygon(rings) | Self::MultiLineString(rings) => {
                rings.iter().flatten().copied().for_each(f);
            }
            Self::MultiPolygon(polygons) => {
                polygons.iter().flatten().flatten().copied().for_each(f);
            }
            Self::GeometryCollection(members) => {
                for member in members {
                    member.for_each_coord(f);
                }
            }
        }
    }

    /// Bounding rectangle, or `None` for a geometry with no coordinates.
    pub fn bounds(&self) -> Option<Bounds> {
        let mut bounds: Option<Bounds> = None;
        self.for_each_coord(&mut |c| match bounds.as_mut() {
            Some(b) => b.extend(c),
            None => bounds = Some(Bounds::from_coord(c)),
        });
        bounds
    }

    /// Every vertex of a single geometry. Containers have no editable vertices.
    pub fn vertices(&self) -> Vec<(VertexRef, Coord)> {
        match self {
            Self::Point(c) => vec![(VertexRef::new(0, 0), *c)],
            Self::LineString(coords) => coords
                .iter()
                .enumerate()
                .map(|(i, c)| (VertexRef::new(0, i), *c))
                .collect(),
            Self::Polygon(rings) => rings
                .iter()
                .enumerate()
                .flat_map(|(r, ring)| {
                    ring.iter()
                        .enumerate()
                        .map(move |(i, c)| (VertexRef::new(r, i), *c))
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn vertex(&self, at: VertexRef) -> Option<Coord> {
        match self {
            Self::Point(c) if at.ring == 0 && at.index == 0 => Some(*c),
            Self::LineString(coords) if at.ring == 0 => coords.get(at.index).copied(),
            Self::Polygon(rings) => rings.get(at.ring)?.get(at.index).copied(),
            _ => None,
        }
    }

    /// Move one vertex. Returns `false` when `at` does not address a vertex.
    ///
    /// The first and last vertex of a closed polygon ring move together.
    pub fn move_vertex(&mut self, at: VertexRef, to: Coord) -> bool {
        match self {
            Self::Point(c) if at.ring == 0 && at.index == 0 => {
                *c = to;
                true
            }
            Self::LineString(coords) if at.ring == 0 => match coords.get_mut(at.index) {
                Some(c) => {
                    *c = to;
                    true
                }
                None => false,
            },
            Self::Polygon(rings) => {
                let Some(ring) = rings.get_mut(at.ring) else {
                    return false;
                };
                if at.index >= ring.len() {
                    return false;
                }
                let last = ring.len() - 1;
                let closed = last > 0 && ring[0] == ring[last];
                ring[at.index] = to;
                if closed && at.index == 0 {
                    ring[last] = to;
                } else if closed && at.index == last {
                    ring[0] = to;
                }
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Geometry {
        Geometry::Polygon(vec![vec![
            Coord::new(0.0, 0.0),
            Coord::new(4.0, 0.0),
            Coord::new(4.0, 4.0),
            Coord::new(0.0, 4.0),
            Coord::new(0.0, 0.0),
        ]])
    }

    #[test]
    fn test_bounds_cover_all_members_of_collection() {
        let g = Geometry::GeometryCollection(vec![
            Geometry::Point(Coord::new(-5.0, 2.0)),
            Geometry::LineString(vec![Coord::new(1.0, -3.0), Coord::new(7.0, 9.0)]),
        ]);
        let b = g.bounds().unwrap();
        assert_eq!(b.min, Coord::new(-5.0, -3.0));
        assert_eq!(b.max, Coord::new(7.0, 9.0));
        assert_eq!(b.center(), Coord::new(1.0, 3.0));
    }

    #[test]
    fn test_empty_collection_has_no_bounds() {
        assert!(Geometry::GeometryCollection(Vec::new()).bounds().is_none());
    }

    #[test]
    fn test_point_bounds_are_degenerate() {
        let b = Geometry::Point(Coord::new(10.0, 20.0)).bounds().unwrap();
        assert!(b.is_point());
    }

    #[test]
    fn test_is_multi_distinguishes_containers() {
        assert!(!square().is_multi());
        assert!(Geometry::MultiPoint(vec![Coord::new(1.0, 1.0)]).is_multi());
        assert!(Geometry::GeometryCollection(Vec::new()).is_multi());
    }

    #[test]
    fn test_keyword_lookup_is_case_insensitive() {
        assert_eq!(
            GeometryKind::from_keyword("multiPolygon"),
            Some(GeometryKind::MultiPolygon)
        );
        assert_eq!(GeometryKind::from_keyword("circle"), None);
    }

    #[test]
    fn test_moving_ring_start_keeps_ring_closed() {
        let mut g = square();
        assert!(g.move_vertex(VertexRef::new(0, 0), Coord::new(-1.0, -1.0)));
        let Geometry::Polygon(rings) = &g else {
            panic!("expected polygon");
        };
        assert_eq!(rings[0][0], Coord::new(-1.0, -1.0));
        assert_eq!(rings[0][4], Coord::new(-1.0, -1.0));
    }

    #[test]
    fn test_moving_ring_end_keeps_ring_closed() {
        let mut g = square();
        assert!(g.move_vertex(VertexRef::new(0, 4), Coord::new(1.0, 1.0)));
        assert_eq!(g.vertex(VertexRef::new(0, 0)), Some(Coord::new(1.0, 1.0)));
    }

    #[test]
    fn test_move_vertex_out_of_range_is_rejected() {
        let mut g = Geometry::LineString(vec![Coord::new(0.0, 0.0), Coord::new(1.0, 1.0)]);
        assert!(!g.move_vertex(VertexRef::new(0, 5), Coord::new(2.0, 2.0)));
        assert!(!g.move_vertex(VertexRef::new(1, 0), Coord::new(2.0, 2.0)));
    }

    #[test]
    fn test_containers_expose_no_vertices() {
        let g = Geometry::MultiPoint(vec![Coord::new(1.0, 1.0)]);
        assert!(g.vertices().is_empty());
        assert_eq!(square().vertices().len(), 5);
    }
}
