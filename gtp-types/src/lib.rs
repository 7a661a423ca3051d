//! # gtp-types
//!
//! Protocol types shared by the gtp-sync crates.
//!
//! This crate provides the vocabulary used across all gtp-sync crates:
//! - [`Command`], [`Response`] - One request/response exchange with an engine
//! - [`Sign`], [`Vertex`], [`Coord`] - Stone colours and board points
//! - [`coord`] - Conversion between vertices and engine coordinate strings
//! - [`ProtocolError`] - Error types

#![warn(missing_docs)]
#![warn(clippy::all)]

mod command;
pub mod coord;
mod error;
mod vertex;

pub use command::{Command, Response};
pub use coord::{format_vertex, parse_coord, ALPHABET, MAX_BOARD_SIZE};
pub use error::ProtocolError;
pub use vertex::{Coord, Sign, Vertex};
