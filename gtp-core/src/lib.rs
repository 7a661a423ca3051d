//! # gtp-core
//!
//! Pure logic for gtp-sync (no I/O, instant tests).
//!
//! This crate implements belief tracking and sync planning without touching
//! the engine process, enabling fast unit tests.
//!
//! ## Design Philosophy
//!
//! All modules in this crate are **pure** - they take input and produce output
//! without side effects:
//! - [`StateTracker`] folds observed commands into an [`EngineBelief`]
//! - [`Strategy`] turns a belief and a target position into a command batch
//! - [`Board`] and [`MemoryTree`] answer position queries
//!
//! Sending the commands is left to `gtp-client`, which executes the batches
//! produced here and reports every outcome back to the tracker.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod belief;
pub mod board;
pub mod error;
pub mod planner;
pub mod sgf;
pub mod tracker;
pub mod tree;

pub use belief::{EngineBelief, Move};
pub use board::Board;
pub use error::PositionError;
pub use planner::{reconstruct, shared_prefix, validate, PlanContext, Strategy};
pub use tracker::{is_analyze_genmove, parse_play_line, Observation, StateTracker};
pub use tree::{GameTree, MemoryTree, NodeId};
