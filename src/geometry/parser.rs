//! Recursive-descent WKT parser.
//!
//! Separators are ASCII whitespace and `+`. `+` is what
//! [`Delimiter::UrlSafe`](super::Delimiter::UrlSafe) writes between the
//! ordinates of a pair, so URL-formatted text parses back unchanged.
//! [`parse_lenient`] handles line breaks that land inside a token.
//!
//! Collections nest at most [`MAX_DEPTH`] levels deep.

use thiserror::Error;

use super::types::{Coord, Geometry, GeometryKind};

/// Deepest `GEOMETRYCOLLECTION` nesting accepted.
pub const MAX_DEPTH: usize = 64;

/// Malformed geometry text. Offsets are byte positions in the parsed input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WktError {
    #[error("unexpected end of input at byte {0}")]
    UnexpectedEnd(usize),
    #[error("expected {expected} at byte {offset}, found {found:?}")]
    UnexpectedToken {
        offset: usize,
        expected: &'static str,
        found: String,
    },
    #[error("unknown geometry type {name:?} at byte {offset}")]
    UnknownGeometry { offset: usize, name: String },
    #[error("invalid number {text:?} at byte {offset}")]
    InvalidNumber { offset: usize, text: String },
    #[error("EMPTY geometries have nothing to draw (byte {0})")]
    Empty(usize),
    #[error("{tag} coordinates are not supported (byte {offset})")]
    UnsupportedDimension { offset: usize, tag: String },
    #[error("unexpected trailing input at byte {0}")]
    TrailingInput(usize),
    #[error("collections nested more than {} deep at byte {offset}", MAX_DEPTH)]
    TooDeep { offset: usize },
}

impl WktError {
    /// Byte offset where parsing stopped.
    pub const fn offset(&self) -> usize {
        match self {
            Self::UnexpectedEnd(offset) | Self::Empty(offset) | Self::TrailingInput(offset) => {
                *offset
            }
            Self::UnexpectedToken { offset, .. }
            | Self::UnknownGeometry { offset, .. }
            | Self::InvalidNumber { offset, .. }
            | Self::UnsupportedDimension { offset, .. }
            | Self::TooDeep { offset } => *offset,
        }
    }
}

/// Parse `text` as a single WKT geometry.
///
/// # Errors
///
/// Returns a [`WktError`] describing the first position that does not match
/// the grammar.
pub fn parse_strict(text: &str) -> Result<Geometry, WktError> {
    let mut parser = Parser::new(text);
    let geometry = parser.geometry()?;
    parser.skip_separators();
    if parser.pos < parser.src.len() {
        return Err(WktError::TrailingInput(parser.pos));
    }
    Ok(geometry)
}

/// Strip line breaks and tabs (copy/paste artifacts), then [`parse_strict`].
///
/// This rejoins keywords and numbers a wrapped paste split in two.
///
/// # Errors
///
/// Returns the [`WktError`] of the sanitized text. Offsets refer to the
/// sanitized text, not the original.
pub fn parse_lenient(text: &str) -> Result<Geometry, WktError> {
    let sanitized: String = text
        .chars()
        .filter(|c| !matches!(c, '\n' | '\r' | '\t'))
        .collect();
    parse_strict(&sanitized)
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    const fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            depth: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    /// Skip separators and return how many bytes were skipped.
    fn skip_separators(&mut self) -> usize {
        let start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_whitespace() || b == b'+') {
            self.pos += 1;
        }
        self.pos - start
    }

    /// Text of the token at the cursor, for error messages.
    fn found(&self) -> String {
        let rest = &self.src[self.pos..];
        let end = rest
            .char_indices()
            .find(|(i, c)| *i > 0 && (c.is_whitespace() || "(),".contains(*c)))
            .map_or(rest.len(), |(i, _)| i);
        rest[..end].to_string()
    }

    fn unexpected(&self, expected: &'static str) -> WktError {
        if self.pos >= self.src.len() {
            WktError::UnexpectedEnd(self.pos)
        } else {
            WktError::UnexpectedToken {
                offset: self.pos,
                expected,
                found: self.found(),
            }
        }
    }

    fn expect(&mut self, byte: u8, expected: &'static str) -> Result<(), WktError> {
        self.skip_separators();
        if self.peek() == Some(byte) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.unexpected(expected))
        }
    }

    /// Consume a `,` if present.
    fn comma(&mut self) -> bool {
        self.skip_separators();
        if self.peek() == Some(b',') {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn word(&mut self) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_alphabetic()) {
            self.pos += 1;
        }
        &self.src[start..self.pos]
    }

    fn geometry(&mut self) -> Result<Geometry, WktError> {
        self.skip_separators();
        let start = self.pos;
        let word = self.word();
        if word.is_empty() {
            return Err(self.unexpected("geometry type"));
        }
        let kind = GeometryKind::from_keyword(word).ok_or_else(|| WktError::UnknownGeometry {
            offset: start,
            name: word.to_string(),
        })?;

        self.skip_separators();
        if self.peek().is_some_and(|b| b.is_ascii_alphabetic()) {
            let tag_start = self.pos;
            let tag = self.word();
            return Err(if tag.eq_ignore_ascii_case("EMPTY") {
                WktError::Empty(tag_start)
            } else if ["Z", "M", "ZM"].iter().any(|t| t.eq_ignore_ascii_case(tag)) {
                WktError::UnsupportedDimension {
                    offset: tag_start,
                    tag: tag.to_ascii_uppercase(),
                }
            } else {
                WktError::UnexpectedToken {
                    offset: tag_start,
                    expected: "'('",
                    found: tag.to_string(),
                }
            });
        }

        match kind {
            GeometryKind::Point => {
                self.expect(b'(', "'('")?;
                let coord = self.coord()?;
                self.expect(b')', "')'")?;
                Ok(Geometry::Point(coord))
            }
            GeometryKind::LineString => Ok(Geometry::LineString(self.coord_list()?)),
            GeometryKind::Polygon => Ok(Geometry::Polygon(self.ring_list()?)),
            GeometryKind::MultiPoint => Ok(Geometry::MultiPoint(self.multi_point()?)),
            GeometryKind::MultiLineString => Ok(Geometry::MultiLineString(self.ring_list()?)),
            GeometryKind::MultiPolygon => {
                let polygons = self.list(Self::ring_list)?;
                Ok(Geometry::MultiPolygon(polygons))
            }
            GeometryKind::GeometryCollection => {
                if self.depth >= MAX_DEPTH {
                    return Err(WktError::TooDeep { offset: start });
                }
                self.depth += 1;
                let members = self.list(Self::geometry);
                self.depth -= 1;
                Ok(Geometry::GeometryCollection(members?))
            }
        }
    }

    /// `'(' item (',' item)* ')'`
    fn list<T>(
        &mut self,
        mut item: impl FnMut(&mut Self) -> Result<T, WktError>,
    ) -> Result<Vec<T>, WktError> {
        self.expect(b'(', "'('")?;
        let mut items = vec![item(self)?];
        while self.comma() {
            items.push(item(self)?);
        }
        self.expect(b')', "',' or ')'")?;
        Ok(items)
    }

    fn coord_list(&mut self) -> Result<Vec<Coord>, WktError> {
        self.list(Self::coord)
    }

    fn ring_list(&mut self) -> Result<Vec<Vec<Coord>>, WktError> {
        self.list(Self::coord_list)
    }

    /// MULTIPOINT members may be bare (`1 2`) or wrapped (`(1 2)`).
    fn multi_point(&mut self) -> Result<Vec<Coord>, WktError> {
        self.list(|p| {
            p.skip_separators();
            if p.peek() == Some(b'(') {
                p.pos += 1;
                let coord = p.coord()?;
                p.expect(b')', "')'")?;
                Ok(coord)
            } else {
                p.coord()
            }
        })
    }

    fn coord(&mut self) -> Result<Coord, WktError> {
        self.skip_separators();
        let x = self.number()?;
        if self.skip_separators() == 0 {
            return Err(self.unexpected("separator between ordinates"));
        }
        let y = self.number()?;
        Ok(Coord::new(x, y))
    }

    fn number(&mut self) -> Result<f64, WktError> {
        let start = self.pos;
        if self.peek() == Some(b'-') {
            self.pos += 1;
        }
        let digits_start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_digit() || b == b'.') {
            self.pos += 1;
        }
        if self.pos == digits_start {
            self.pos = start;
            return Err(self.unexpected("number"));
        }
        if matches!(self.peek(), Some(b'e' | b'E')) {
            self.pos += 1;
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            while self.peek().is_some_and(|b| b.is_ascii_digit()) {
                self.pos += 1;
            }
        }
        let text = &self.src[start..self.pos];
        text.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| WktError::InvalidNumber {
                offset: start,
                text: text.to_string(),
            })
    }
}
