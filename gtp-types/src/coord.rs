//! Engine coordinate strings.
//!
//! Engines address points as a column letter followed by a row number counted
//! from the bottom edge, e.g. `D4`. The letter `I` is skipped, which limits
//! boards to [`MAX_BOARD_SIZE`] lines.

use crate::vertex::{Coord, Vertex};

/// Column letters, in order.
pub const ALPHABET: &str = "ABCDEFGHJKLMNOPQRSTUVWXYZ";

/// Largest board side an engine coordinate can address.
pub const MAX_BOARD_SIZE: usize = ALPHABET.len();

/// Parse an engine coordinate for a board of side `size`.
///
/// Returns `None` when no move is described: `resign`, an empty string, an
/// unknown board size, or a coordinate that doesn't address a point.
pub fn parse_coord(coord: &str, size: Option<usize>) -> Option<Coord> {
    let coord = coord.trim();

    if coord.eq_ignore_ascii_case("pass") {
        return Some(Coord::Pass);
    }
    if coord.is_empty() || coord.eq_ignore_ascii_case("resign") {
        return None;
    }

    let size = size?;
    let mut chars = coord.chars();
    let letter = chars.next()?.to_ascii_uppercase();
    let x = ALPHABET.find(letter)?;
    let row: usize = chars.as_str().parse().ok()?;

    if x >= size || row == 0 || row > size {
        return None;
    }

    Some(Coord::Point(Vertex::new(x, size - row)))
}

/// Format a vertex for a board of the given dimensions.
///
/// Returns `None` if the vertex is off the board or beyond the alphabet.
pub fn format_vertex(vertex: Vertex, width: usize, height: usize) -> Option<String> {
    if vertex.x >= width || vertex.y >= height {
        return None;
    }

    let letter = ALPHABET.chars().nth(vertex.x)?;
    Some(format!("{}{}", letter, height - vertex.y))
}
