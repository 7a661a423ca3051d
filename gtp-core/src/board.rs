//! Board snapshots.
//!
//! A [`Board`] is an immutable occupancy grid: every point holds `+1`
//! (black), `-1` (white) or `0` (empty). Moves produce new snapshots, with
//! captures applied the usual way: enemy chains left without liberties are
//! removed first, then the mover's own chain if it has none (suicide is
//! allowed, not rejected).

use gtpsync_types::{format_vertex, Coord, Sign, Vertex};
use std::collections::HashSet;

/// Immutable occupancy grid for one position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    /// Row-major: `sign_map[y][x]`.
    sign_map: Vec<Vec<i8>>,
}

impl Board {
    /// Create an empty board.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            sign_map: vec![vec![0; width]; height],
        }
    }

    /// Create a board from a row-major sign map.
    ///
    /// Rows shorter than the first row are padded with empty points.
    pub fn from_sign_map(mut sign_map: Vec<Vec<i8>>) -> Self {
        let height = sign_map.len();
        let width = sign_map.first().map_or(0, Vec::len);
        for row in &mut sign_map {
            row.resize(width, 0);
            for value in row.iter_mut() {
                *value = value.signum();
            }
        }
        Self {
            width,
            height,
            sign_map,
        }
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Row-major occupancy grid.
    pub fn sign_map(&self) -> &[Vec<i8>] {
        &self.sign_map
    }

    /// Check if width equals height.
    pub fn is_square(&self) -> bool {
        self.width == self.height
    }

    /// Check if no stone is on the board.
    pub fn is_empty(&self) -> bool {
        self.sign_map.iter().flatten().all(|&s| s == 0)
    }

    /// Check if the vertex lies on the board.
    pub fn has(&self, vertex: Vertex) -> bool {
        vertex.x < self.width && vertex.y < self.height
    }

    /// Occupancy at `vertex`; `0` when empty or off the board.
    pub fn get(&self, vertex: Vertex) -> i8 {
        if self.has(vertex) {
            self.sign_map[vertex.y][vertex.x]
        } else {
            0
        }
    }

    /// Set occupancy directly, without capture handling.
    pub(crate) fn set(&mut self, vertex: Vertex, value: i8) {
        if self.has(vertex) {
            self.sign_map[vertex.y][vertex.x] = value.signum();
        }
    }

    /// Engine coordinate for `vertex`, `None` if it's off the board.
    pub fn stringify_vertex(&self, vertex: Vertex) -> Option<String> {
        format_vertex(vertex, self.width, self.height)
    }

    /// Play a stone and return the resulting board.
    ///
    /// Passes and off-board vertices leave the position unchanged.
    pub fn make_move(&self, sign: Sign, coord: Coord) -> Board {
        let mut next = self.clone();
        let vertex = match coord {
            Coord::Point(v) if self.has(v) => v,
            _ => return next,
        };

        let value = sign.value();
        next.set(vertex, value);

        for neighbor in next.neighbors(vertex) {
            if next.get(neighbor) == -value && !next.has_liberties(neighbor) {
                for v in next.chain(neighbor) {
                    next.set(v, 0);
                }
            }
        }

        if !next.has_liberties(vertex) {
            for v in next.chain(vertex) {
                next.set(v, 0);
            }
        }

        next
    }

    /// Vertices whose occupancy differs between the two boards, row by row.
    ///
    /// Returns `None` if the dimensions differ.
    pub fn diff(&self, other: &Board) -> Option<Vec<Vertex>> {
        if self.width != other.width || self.height != other.height {
            return None;
        }

        let mut result = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                if self.sign_map[y][x] != other.sign_map[y][x] {
                    result.push(Vertex::new(x, y));
                }
            }
        }
        Some(result)
    }

    /// Check that every chain on the board has at least one liberty.
    pub fn is_valid(&self) -> bool {
        let mut checked = HashSet::new();

        for y in 0..self.height {
            for x in 0..self.width {
                let vertex = Vertex::new(x, y);
                if self.get(vertex) == 0 || checked.contains(&vertex) {
                    continue;
                }
                if !self.has_liberties(vertex) {
                    return false;
                }
                checked.extend(self.chain(vertex));
            }
        }

        true
    }

    /// On-board orthogonal neighbours.
    pub fn neighbors(&self, vertex: Vertex) -> Vec<Vertex> {
        let Vertex { x, y } = vertex;
        let mut result = Vec::with_capacity(4);
        if x > 0 {
            result.push(Vertex::new(x - 1, y));
        }
        if x + 1 < self.width {
            result.push(Vertex::new(x + 1, y));
        }
        if y > 0 {
            result.push(Vertex::new(x, y - 1));
        }
        if y + 1 < self.height {
            result.push(Vertex::new(x, y + 1));
        }
        result
    }

    /// All stones connected to `vertex` with the same colour.
    pub fn chain(&self, vertex: Vertex) -> Vec<Vertex> {
        let sign = self.get(vertex);
        if sign == 0 {
            return Vec::new();
        }

        let mut visited = HashSet::from([vertex]);
        let mut stack = vec![vertex];
        let mut result = Vec::new();

        while let Some(v) = stack.pop() {
            result.push(v);
            for n in self.neighbors(v) {
                if self.get(n) == sign && visited.insert(n) {
                    stack.push(n);
                }
            }
        }

        result
    }

    /// Check if the chain at `vertex` touches an empty point.
    pub fn has_liberties(&self, vertex: Vertex) -> bool {
        self.chain(vertex)
            .into_iter()
            .flat_map(|v| self.neighbors(v))
            .any(|n| self.get(n) == 0)
    }
}
