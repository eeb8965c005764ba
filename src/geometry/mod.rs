//! Geometry model and Well-Known-Text codec.
//!
//! - [`Geometry`]: typed 2D geometries (points, lines, polygons, their
//!   multi-part variants and collections)
//! - [`parse_strict`] / [`parse_lenient`]: WKT text to [`Geometry`]
//! - [`WktWriter`]: [`Geometry`] to WKT text with a configurable
//!   coordinate-pair [`Delimiter`]

mod parser;
mod types;
mod writer;

pub use parser::{WktError, parse_lenient, parse_strict};
pub use types::{Bounds, Coord, Geometry, GeometryKind, VertexRef};
pub use writer::{Delimiter, WktWriter};
