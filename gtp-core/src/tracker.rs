//! Passive engine state tracking.
//!
//! [`StateTracker`] owns the [`EngineBelief`] and updates it from observed
//! traffic only. Each command is folded in once its outcome is known; a
//! command the engine rejected is treated as if it never happened, except a
//! rejected `boardsize`, which leaves the belief dirty.
//!
//! The analyze variants of `genmove` are the exception: they stream their
//! decision as a `play <coord>` line long before they resolve, so the caller
//! reports the streamed coordinate instead of the final response.

use crate::belief::{EngineBelief, Move};
use gtpsync_types::{parse_coord, Command, Coord, Response, Sign, Vertex};

/// Generate-move commands whose move arrives as a streamed line.
pub const ANALYZE_GENMOVE_COMMANDS: [&str; 2] = ["genmove_analyze", "lz-genmove_analyze"];

/// Check if the command reports its move through a streamed line.
pub fn is_analyze_genmove(name: &str) -> bool {
    ANALYZE_GENMOVE_COMMANDS.contains(&name)
}

/// Extract the coordinate from a streamed `play <coord>` line.
pub fn parse_play_line(line: &str) -> Option<&str> {
    line.trim().strip_prefix("play ")
}

/// Outcome of a command, as far as belief tracking is concerned.
#[derive(Debug, Clone, Copy)]
pub enum Observation<'a> {
    /// The command resolved with this response.
    Response(&'a Response),
    /// An analyze `genmove` streamed this coordinate, or resolved without
    /// streaming one (`None`).
    Streamed(Option<&'a str>),
}

/// Maintains the belief model from observed commands.
#[derive(Debug, Clone, Default)]
pub struct StateTracker {
    belief: EngineBelief,
}

impl StateTracker {
    /// Create a tracker holding the initial belief.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current belief.
    pub fn belief(&self) -> &EngineBelief {
        &self.belief
    }

    /// Forget everything, e.g. after the engine process stopped.
    pub fn reset(&mut self) {
        self.belief = EngineBelief::new();
    }

    /// Fold the outcome of `command` into the belief.
    pub fn observe(&mut self, command: &Command, observation: Observation<'_>) {
        let response = match observation {
            Observation::Response(r) if r.is_error() => {
                // A rejected resize leaves the engine board unknown
                if command.name == "boardsize" {
                    self.belief.dirty = true;
                }
                return;
            }
            Observation::Response(r) => Some(r),
            Observation::Streamed(_) => None,
        };

        if response.is_none() && !is_analyze_genmove(&command.name) {
            return;
        }

        let belief = &mut self.belief;

        match command.name.as_str() {
            "boardsize" => {
                if let Some(size) = command.arg_at(0) {
                    belief.size = size.trim().parse().ok();
                    belief.dirty = true;
                }
            }
            "clear_board" => {
                belief.moves.clear();
                belief.dirty = false;
            }
            "komi" => {
                if let Some(komi) = command.arg_at(0) {
                    belief.komi = komi.trim().parse().ok();
                }
            }
            "fixed_handicap" | "place_free_handicap" => {
                if let Some(response) = response {
                    let vertices = parse_vertices(response.content.split_whitespace(), belief.size);
                    push_handicap(belief, vertices);
                }
            }
            "set_free_handicap" => {
                let vertices = parse_vertices(command.args.iter().map(String::as_str), belief.size);
                push_handicap(belief, vertices);
            }
            "play" => {
                if let (Some(color), Some(coord)) = (command.arg_at(0), command.arg_at(1)) {
                    push_placement(belief, color, Some(coord));
                }
            }
            "genmove" => {
                if let (Some(color), Some(response)) = (command.arg_at(0), response) {
                    push_placement(belief, color, Some(response.content.trim()));
                }
            }
            name if is_analyze_genmove(name) => {
                if let (Some(color), Observation::Streamed(coord)) = (command.arg_at(0), observation)
                {
                    push_placement(belief, color, coord);
                }
            }
            "undo" => {
                belief.moves.pop();
            }
            "loadsgf" => {
                belief.dirty = true;
            }
            _ => {}
        }
    }
}

fn parse_vertices<'a>(coords: impl Iterator<Item = &'a str>, size: Option<usize>) -> Vec<Vertex> {
    coords
        .filter_map(|c| parse_coord(c, size))
        .filter_map(Coord::vertex)
        .collect()
}

fn push_handicap(belief: &mut EngineBelief, vertices: Vec<Vertex>) {
    if !vertices.is_empty() {
        belief.moves.push(Move::Handicap { vertices });
    }
}

fn push_placement(belief: &mut EngineBelief, color: &str, coord: Option<&str>) {
    let sign = Sign::from_color(color);
    if let Some(coord) = coord.and_then(|c| parse_coord(c, belief.size)) {
        belief.moves.push(Move::Placement { sign, coord });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmd(text: &str) -> Command {
        text.parse().unwrap()
    }

    fn accept(tracker: &mut StateTracker, text: &str) {
        tracker.observe(&cmd(text), Observation::Response(&Response::ok("")));
    }

    fn sized(size: usize) -> StateTracker {
        let mut tracker = StateTracker::new();
        accept(&mut tracker, &format!("boardsize {size}"));
        accept(&mut tracker, "clear_board");
        tracker
    }

    #[test]
    fn rejected_boardsize_marks_dirty() {
        let mut tracker = sized(9);
        accept(&mut tracker, "play B C3");

        tracker.observe(
            &cmd("boardsize 19"),
            Observation::Response(&Response::error("unacceptable size")),
        );

        let belief = tracker.belief();
        assert!(belief.dirty);
        assert_eq!(belief.size, Some(9));
        assert_eq!(belief.moves.len(), 1);
    }

    #[test]
    fn boardsize_sets_size_and_dirty() {
        let mut tracker = sized(19);
        assert!(!tracker.belief().dirty);

        accept(&mut tracker, "boardsize 9");
        assert_eq!(tracker.belief().size, Some(9));
        assert!(tracker.belief().dirty);
    }

    #[test]
    fn clear_board_empties_moves() {
        let mut tracker = sized(9);
        accept(&mut tracker, "play B C3");
        accept(&mut tracker, "clear_board");
        assert!(tracker.belief().moves.is_empty());
        assert!(!tracker.belief().dirty);
    }

    #[test]
    fn komi_is_recorded() {
        let mut tracker = StateTracker::new();
        accept(&mut tracker, "komi 7.5");
        assert_eq!(tracker.belief().komi, Some(7.5));
    }

    #[test]
    fn errors_are_ignored() {
        let mut tracker = sized(9);
        tracker.observe(
            &cmd("play B C3"),
            Observation::Response(&Response::error("illegal move")),
        );
        tracker.observe(&cmd("boardsize 13"), Observation::Response(&Response::error("")));
        assert!(tracker.belief().moves.is_empty());
        assert_eq!(tracker.belief().size, Some(9));
    }

    #[test]
    fn play_parses_color_and_coord() {
        let mut tracker = sized(9);
        accept(&mut tracker, "play white c3");
        accept(&mut tracker, "play b pass");
        accept(&mut tracker, "play B resign");
        accept(&mut tracker, "play B Z99");

        assert_eq!(
            tracker.belief().moves,
            vec![
                Move::play(Sign::White, Vertex::new(2, 6)),
                Move::pass(Sign::Black),
            ]
        );
    }

    #[test]
    fn play_without_coord_is_ignored() {
        let mut tracker = sized(9);
        accept(&mut tracker, "play B");
        assert!(tracker.belief().moves.is_empty());
    }

    #[test]
    fn genmove_reads_response() {
        let mut tracker = sized(9);
        tracker.observe(&cmd("genmove W"), Observation::Response(&Response::ok(" E5\n")));
        tracker.observe(&cmd("genmove B"), Observation::Response(&Response::ok("resign")));

        assert_eq!(
            tracker.belief().moves,
            vec![Move::play(Sign::White, Vertex::new(4, 4))]
        );
    }

    #[test]
    fn analyze_genmove_uses_streamed_coord() {
        let mut tracker = sized(9);
        tracker.observe(&cmd("lz-genmove_analyze B 50"), Observation::Streamed(Some("D4")));
        tracker.observe(&cmd("genmove_analyze W 50"), Observation::Streamed(None));

        assert_eq!(
            tracker.belief().moves,
            vec![Move::play(Sign::Black, Vertex::new(3, 5))]
        );
    }

    #[test]
    fn streamed_outcome_ignored_for_plain_commands() {
        let mut tracker = sized(9);
        tracker.observe(&cmd("play B C3"), Observation::Streamed(Some("C3")));
        assert!(tracker.belief().moves.is_empty());
    }

    #[test]
    fn fixed_handicap_reads_response_list() {
        let mut tracker = sized(9);
        tracker.observe(
            &cmd("fixed_handicap 2"),
            Observation::Response(&Response::ok("C7 G3")),
        );
        tracker.observe(&cmd("place_free_handicap 2"), Observation::Response(&Response::ok("")));

        assert_eq!(
            tracker.belief().moves,
            vec![Move::Handicap {
                vertices: vec![Vertex::new(2, 2), Vertex::new(6, 6)]
            }]
        );
    }

    #[test]
    fn set_free_handicap_reads_args() {
        let mut tracker = sized(9);
        accept(&mut tracker, "set_free_handicap C7 G3 pass");
        assert_eq!(
            tracker.belief().moves,
            vec![Move::Handicap {
                vertices: vec![Vertex::new(2, 2), Vertex::new(6, 6)]
            }]
        );
    }

    #[test]
    fn undo_pops_and_clamps() {
        let mut tracker = sized(9);
        accept(&mut tracker, "play B C3");
        accept(&mut tracker, "undo");
        accept(&mut tracker, "undo");
        assert!(tracker.belief().moves.is_empty());
    }

    #[test]
    fn loadsgf_marks_dirty() {
        let mut tracker = sized(9);
        accept(&mut tracker, "loadsgf game.sgf");
        assert!(tracker.belief().dirty);
    }

    #[test]
    fn reset_restores_default() {
        let mut tracker = sized(9);
        accept(&mut tracker, "komi 6.5");
        accept(&mut tracker, "play B C3");
        tracker.reset();
        assert_eq!(tracker.belief(), &EngineBelief::default());
    }

    #[test]
    fn unknown_size_drops_coordinates() {
        let mut tracker = StateTracker::new();
        accept(&mut tracker, "play B C3");
        assert!(tracker.belief().moves.is_empty());
    }

    #[test]
    fn play_line_extraction() {
        assert_eq!(parse_play_line("  play Q16 \n"), Some("Q16"));
        assert_eq!(parse_play_line("info move Q16 visits 3"), None);
        assert!(is_analyze_genmove("lz-genmove_analyze"));
        assert!(!is_analyze_genmove("genmove"));
    }
}
