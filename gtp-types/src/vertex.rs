//! Stone colours and board points.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Colour of a stone, encoded as `+1` (black) / `-1` (white) on sign maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sign {
    /// Black, `+1`.
    Black,
    /// White, `-1`.
    White,
}

impl Sign {
    /// Signed occupancy value.
    pub fn value(self) -> i8 {
        match self {
            Self::Black => 1,
            Self::White => -1,
        }
    }

    /// Convert a signed occupancy value. `0` (empty) has no colour.
    pub fn from_value(value: i8) -> Option<Self> {
        match value.signum() {
            1 => Some(Self::Black),
            -1 => Some(Self::White),
            _ => None,
        }
    }

    /// Interpret a colour argument.
    ///
    /// Only the first letter matters: `w`/`W` is white, anything else black.
    pub fn from_color(color: &str) -> Self {
        match color.chars().next() {
            Some(c) if c.eq_ignore_ascii_case(&'w') => Self::White,
            _ => Self::Black,
        }
    }

    /// Protocol colour letter.
    pub fn letter(self) -> &'static str {
        match self {
            Self::Black => "B",
            Self::White => "W",
        }
    }
}

/// A point on the board, `x` = column from the left, `y` = row from the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Vertex {
    /// Column, 0-based from the left.
    pub x: usize,
    /// Row, 0-based from the top.
    pub y: usize,
}

impl Vertex {
    /// Create a vertex.
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Target of a single move: a board point or a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Coord {
    /// No stone is placed.
    Pass,
    /// A stone is placed at this vertex.
    Point(Vertex),
}

impl Coord {
    /// The vertex, unless this is a pass.
    pub fn vertex(self) -> Option<Vertex> {
        match self {
            Self::Pass => None,
            Self::Point(v) => Some(v),
        }
    }

    /// Check if this is a pass.
    pub fn is_pass(self) -> bool {
        matches!(self, Self::Pass)
    }
}

impl From<Vertex> for Coord {
    fn from(v: Vertex) -> Self {
        Self::Point(v)
    }
}
