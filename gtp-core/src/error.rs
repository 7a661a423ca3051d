//! Error types for gtp-core.

use thiserror::Error;

/// Reasons a position can't be sent to an engine at all.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PositionError {
    /// The node doesn't exist in the tree
    #[error("node not found in game tree")]
    UnknownNode,

    /// Engines only play on square boards
    #[error("engines don't support non-square boards ({width}x{height})")]
    NonSquare {
        /// Board width.
        width: usize,
        /// Board height.
        height: usize,
    },

    /// Some chain on the board has no liberties
    #[error("engines don't support invalid board positions")]
    Invalid,

    /// Board side exceeds what coordinates can address
    #[error("engines only support board sizes up to {max}, got {size}")]
    TooLarge {
        /// Board side length.
        size: usize,
        /// Largest supported side length.
        max: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(
            PositionError::TooLarge { size: 26, max: 25 }.to_string(),
            "engines only support board sizes up to 25, got 26"
        );
        assert_eq!(
            PositionError::NonSquare {
                width: 9,
                height: 13
            }
            .to_string(),
            "engines don't support non-square boards (9x13)"
        );
    }
}
