//! The belief model of an engine's board.
//!
//! The engine is never asked what its board looks like. Instead, everything
//! we believe about it is built from the commands it accepted: board size,
//! komi, and the ordered log of stones placed since the last `clear_board`.

use crate::board::Board;
use gtpsync_types::{Command, Coord, Sign, Vertex};
use serde::{Deserialize, Serialize};

/// One accepted placement-affecting command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Move {
    /// A single stone or pass (`play`, `genmove` and friends).
    Placement {
        /// Colour of the mover.
        sign: Sign,
        /// Point played, or pass.
        coord: Coord,
    },
    /// Black stones placed in one handicap command.
    Handicap {
        /// Points in the order the engine was given them.
        vertices: Vec<Vertex>,
    },
}

impl Move {
    /// A placement at a point.
    pub fn play(sign: Sign, vertex: Vertex) -> Self {
        Self::Placement {
            sign,
            coord: Coord::Point(vertex),
        }
    }

    /// A pass.
    pub fn pass(sign: Sign) -> Self {
        Self::Placement {
            sign,
            coord: Coord::Pass,
        }
    }

    /// Apply this move to a synthetic board.
    ///
    /// Handicap stones landing on occupied points are skipped.
    pub fn apply(&self, board: &Board) -> Board {
        match self {
            Self::Placement { sign, coord } => board.make_move(*sign, *coord),
            Self::Handicap { vertices } => {
                let mut next = board.clone();
                for &v in vertices {
                    if next.get(v) == 0 {
                        next = next.make_move(Sign::Black, Coord::Point(v));
                    }
                }
                next
            }
        }
    }

    /// The command that reproduces this move on a board of the given size.
    ///
    /// Off-board placements are sent as passes; off-board handicap points are
    /// left out.
    pub fn to_command(&self, board: &Board) -> Command {
        match self {
            Self::Placement { sign, coord } => {
                let text = coord
                    .vertex()
                    .and_then(|v| board.stringify_vertex(v))
                    .unwrap_or_else(|| "pass".to_string());
                Command::with_args("play", [sign.letter().to_string(), text])
            }
            Self::Handicap { vertices } => Command::with_args(
                "set_free_handicap",
                vertices.iter().filter_map(|&v| board.stringify_vertex(v)),
            ),
        }
    }
}

/// What we believe the engine's board contains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineBelief {
    /// Belief is known to be unusable; a full resync is required.
    pub dirty: bool,
    /// Last komi the engine accepted.
    pub komi: Option<f64>,
    /// Last board size the engine accepted.
    pub size: Option<usize>,
    /// Accepted moves since the last `clear_board`.
    pub moves: Vec<Move>,
}

impl EngineBelief {
    /// The belief held before anything was observed.
    pub fn new() -> Self {
        Self {
            dirty: true,
            komi: None,
            size: None,
            moves: Vec::new(),
        }
    }

    /// Replay the move log onto an empty `width` × `height` board.
    pub fn replay(&self, width: usize, height: usize) -> Board {
        self.moves
            .iter()
            .fold(Board::new(width, height), |board, mv| mv.apply(&board))
    }
}

impl Default for EngineBelief {
    fn default() -> Self {
        Self::new()
    }
}
