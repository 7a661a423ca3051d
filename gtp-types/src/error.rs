//! Error types for gtp-sync protocol values.

use thiserror::Error;

/// Errors that can occur while building protocol values from text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// Command text contained no command name
    #[error("empty command")]
    EmptyCommand,

    /// Command name contained characters the protocol does not allow
    #[error("invalid command name: {0}")]
    InvalidName(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ProtocolError::InvalidName("#x".into());
        assert_eq!(err.to_string(), "invalid command name: #x");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ProtocolError>();
    }
}
