use crate::geometry::{Bounds, Geometry};

/// A parsed geometry arranged the way a map draws it.
///
/// Points, line strings and polygons are leaves. Multi-geometries become a
/// group of leaves. A collection becomes a group of its members converted
/// the same way, so a multi-geometry nested in a collection shows up as a
/// group inside a group.
#[derive(Debug, Clone, PartialEq)]
pub enum Renderable {
    Leaf(Geometry),
    Group(Vec<Renderable>),
}

impl Renderable {
    pub fn from_geometry(geometry: Geometry) -> Self {
        match geometry {
            Geometry::MultiPoint(points) => {
                Self::Group(points.into_iter().map(|p| Self::Leaf(Geometry::Point(p))).collect())
            }
            Geometry::MultiLineString(lines) => Self::Group(
                lines
                    .into_iter()
                    .map(|l| Self::Leaf(Geometry::LineString(l)))
                    .collect(),
            ),
            Geometry::MultiPolygon(polygons) => Self::Group(
                polygons
                    .into_iter()
                    .map(|p| Self::Leaf(Geometry::Polygon(p)))
                    .collect(),
            ),
            Geometry::GeometryCollection(members) => {
                Self::Group(members.into_iter().map(Self::from_geometry).collect())
            }
            leaf @ (Geometry::Point(_) | Geometry::LineString(_) | Geometry::Polygon(_)) => {
                Self::Leaf(leaf)
            }
        }
    }

    pub const fn is_group(&self) -> bool {
        matches!(self, Self::Group(_))
    }

    /// Leaves directly under this value. Nested groups are skipped, not
    /// descended into.
    pub fn direct_leaves(&self) -> Vec<&Geometry> {
        match self {
            Self::Leaf(geometry) => vec![geometry],
            Self::Group(items) => items
                .iter()
                .filter_map(|item| match item {
                    Self::Leaf(geometry) => Some(geometry),
                    Self::Group(_) => None,
                })
                .collect(),
        }
    }

    /// Combined bounds of [`Self::direct_leaves`].
    pub fn bounds(&self) -> Option<Bounds> {
        self.direct_leaves()
            .into_iter()
            .filter_map(Geometry::bounds)
            .reduce(Bounds::union)
    }
}
