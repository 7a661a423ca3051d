//! Sync planning.
//!
//! Bringing an engine to a target position is attempted with a cascade of
//! [`Strategy`] values, cheapest first. Each strategy looks at the current
//! belief and the target and either produces a command batch or declines.
//! The caller executes the batch; if any command fails, it moves on to the
//! next strategy.
//!
//! - [`Strategy::Replay`] replays the tree's move history, reusing whatever
//!   prefix the engine already has (undoing the rest when possible).
//! - [`Strategy::Incremental`] adds the stones the engine is missing. It can
//!   never remove stones.
//! - [`Strategy::Rearrange`] clears the board and places every stone.
//!
//! Everything here is pure: no I/O, no async.

use crate::belief::{EngineBelief, Move};
use crate::board::Board;
use crate::error::PositionError;
use crate::sgf;
use crate::tree::GameTree;
use gtpsync_types::{Command, Coord, Sign, Vertex, MAX_BOARD_SIZE};

/// Node properties replayed as stones, in order.
const PLACEMENT_PROPERTIES: [(&str, Sign); 4] = [
    ("B", Sign::Black),
    ("W", Sign::White),
    ("AB", Sign::Black),
    ("AW", Sign::White),
];

/// Check that a target board can be sent to an engine at all.
pub fn validate(board: &Board) -> Result<(), PositionError> {
    if !board.is_square() {
        return Err(PositionError::NonSquare {
            width: board.width(),
            height: board.height(),
        });
    }
    if !board.is_valid() {
        return Err(PositionError::Invalid);
    }
    if board.width() > MAX_BOARD_SIZE {
        return Err(PositionError::TooLarge {
            size: board.width(),
            max: MAX_BOARD_SIZE,
        });
    }
    Ok(())
}

/// Rebuild the move log that leads from the root to `id`.
///
/// With `free_handicap`, a node adding two or more black stones to an empty
/// board becomes a single handicap move. After every node the replayed
/// position is compared with the tree's own; `None` means the two diverged
/// and the position can't be reached by replay.
pub fn reconstruct<T: GameTree>(tree: &T, id: T::NodeId, free_handicap: bool) -> Option<Vec<Move>> {
    let target = tree.board_at(id)?;
    let mut synthetic = Board::new(target.width(), target.height());
    let mut moves = Vec::new();

    for node in tree.path_to(id) {
        let node_board = tree.board_at(node)?;
        let mut placed_handicap = false;

        if free_handicap && synthetic.is_empty() {
            if let Some(values) = tree.property(node, "AB").filter(|v| v.len() >= 2) {
                let mut vertices: Vec<Vertex> = sgf::expand_all(values)
                    .into_iter()
                    .filter_map(Coord::vertex)
                    .filter(|&v| synthetic.has(v))
                    .collect();
                vertices.sort();
                vertices.dedup();

                if !vertices.is_empty() {
                    let mv = Move::Handicap { vertices };
                    synthetic = mv.apply(&synthetic);
                    moves.push(mv);
                    placed_handicap = true;
                }
            }
        }

        for (key, sign) in PLACEMENT_PROPERTIES {
            if placed_handicap && key == "AB" {
                continue;
            }
            let Some(values) = tree.property(node, key) else {
                continue;
            };

            for coord in sgf::expand_all(values) {
                let coord = match coord {
                    Coord::Point(v) if synthetic.has(v) => {
                        if synthetic.get(v) != 0 {
                            continue;
                        }
                        coord
                    }
                    _ => Coord::Pass,
                };

                let mv = Move::Placement { sign, coord };
                synthetic = mv.apply(&synthetic);
                moves.push(mv);
            }
        }

        if synthetic != node_board {
            return None;
        }
    }

    Some(moves)
}

/// Length of the longest common prefix of two move logs.
pub fn shared_prefix(a: &[Move], b: &[Move]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

/// Everything a strategy may look at.
#[derive(Debug, Clone, Copy)]
pub struct PlanContext<'a> {
    /// Belief after komi and board size have been settled.
    pub belief: &'a EngineBelief,
    /// Target position.
    pub target: &'a Board,
    /// Reconstructed move log, `None` if the target isn't reachable by replay.
    pub moves: Option<&'a [Move]>,
    /// Whether the engine advertises `undo`.
    pub supports_undo: bool,
}

/// One way of bringing the engine to the target position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Replay the tree history, sharing the engine's prefix when possible.
    Replay,
    /// Add missing stones on top of the believed position.
    Incremental,
    /// Clear the board and place every stone.
    Rearrange,
}

impl Strategy {
    /// All strategies, cheapest first.
    pub const CASCADE: [Strategy; 3] = [Self::Replay, Self::Incremental, Self::Rearrange];

    /// Short name for logging.
    pub fn name(self) -> &'static str {
        match self {
            Self::Replay => "replay",
            Self::Incremental => "incremental",
            Self::Rearrange => "rearrange",
        }
    }

    /// Produce the command batch for this strategy, or `None` if it can't
    /// reach the target.
    pub fn plan(self, ctx: &PlanContext<'_>) -> Option<Vec<Command>> {
        match self {
            Self::Replay => plan_replay(ctx),
            Self::Incremental => plan_incremental(ctx),
            Self::Rearrange => plan_rearrange(ctx),
        }
    }
}

fn plan_replay(ctx: &PlanContext<'_>) -> Option<Vec<Command>> {
    let moves = ctx.moves?;
    let believed = &ctx.belief.moves;
    let prefix = shared_prefix(moves, believed);
    let undo_count = believed.len() - prefix;

    let reuse = !ctx.belief.dirty
        && prefix > 0
        && undo_count < prefix
        && (ctx.supports_undo || undo_count == 0);

    let mut commands = Vec::new();
    let start = if reuse {
        commands.extend((0..undo_count).map(|_| Command::new("undo")));
        prefix
    } else {
        commands.push(Command::new("clear_board"));
        0
    };

    commands.extend(moves[start..].iter().map(|mv| mv.to_command(ctx.target)));
    Some(commands)
}

fn plan_incremental(ctx: &PlanContext<'_>) -> Option<Vec<Command>> {
    if ctx.belief.dirty {
        return None;
    }

    let target = ctx.target;
    let mut board = ctx.belief.replay(target.width(), target.height());
    let mut commands = Vec::new();

    for vertex in board.diff(target)? {
        let Some(sign) = Sign::from_value(target.get(vertex)) else {
            continue;
        };
        let mv = Move::play(sign, vertex);
        commands.push(mv.to_command(target));
        board = mv.apply(&board);
    }

    (&board == target).then_some(commands)
}

fn plan_rearrange(ctx: &PlanContext<'_>) -> Option<Vec<Command>> {
    let target = ctx.target;
    let mut board = Board::new(target.width(), target.height());
    let mut commands = vec![Command::new("clear_board")];

    for x in 0..target.width() {
        for y in 0..target.height() {
            let vertex = Vertex::new(x, y);
            let Some(sign) = Sign::from_value(target.get(vertex)) else {
                continue;
            };
            let mv = Move::play(sign, vertex);
            commands.push(mv.to_command(target));
            board = mv.apply(&board);
        }
    }

    (&board == target).then_some(commands)
}
