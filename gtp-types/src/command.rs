//! Commands sent to an engine and the responses it returns.

use crate::error::ProtocolError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named engine command with string arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Command {
    /// Command name, e.g. `play` or `boardsize`.
    pub name: String,
    /// Positional arguments.
    #[serde(default)]
    pub args: Vec<String>,
}

impl Command {
    /// Create a command without arguments.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Create a command with the given arguments.
    pub fn with_args<I, S>(name: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Get the argument at `index`, if present.
    pub fn arg_at(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

impl FromStr for Command {
    type Err = ProtocolError;

    /// Parse `"[id] name arg arg"` command text.
    ///
    /// A leading numeric id is accepted and discarded.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split_whitespace().peekable();

        if tokens
            .peek()
            .is_some_and(|t| t.chars().all(|c| c.is_ascii_digit()))
        {
            tokens.next();
        }

        let name = tokens.next().ok_or(ProtocolError::EmptyCommand)?;
        if name.starts_with('#') || name.chars().any(char::is_control) {
            return Err(ProtocolError::InvalidName(name.to_string()));
        }

        Ok(Self::with_args(name, tokens))
    }
}

/// The final response to a command.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Response {
    /// Whether the engine reported failure (`?` response).
    pub error: bool,
    /// Response body without the status prefix.
    pub content: String,
}

impl Response {
    /// A successful response.
    pub fn ok(content: impl Into<String>) -> Self {
        Self {
            error: false,
            content: content.into(),
        }
    }

    /// A failure response.
    pub fn error(content: impl Into<String>) -> Self {
        Self {
            error: true,
            content: content.into(),
        }
    }

    /// Check if the engine reported failure.
    pub fn is_error(&self) -> bool {
        self.error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_joins_args() {
        let cmd = Command::new("play").arg("B").arg("D4");
        assert_eq!(cmd.to_string(), "play B D4");
        assert_eq!(Command::new("clear_board").to_string(), "clear_board");
    }

    #[test]
    fn parse_plain_command() {
        let cmd: Command = "  komi   6.5 ".parse().unwrap();
        assert_eq!(cmd, Command::with_args("komi", ["6.5"]));
    }

    #[test]
    fn parse_discards_numeric_id() {
        let cmd: Command = "12 time_settings 0 5 1".parse().unwrap();
        assert_eq!(cmd.name, "time_settings");
        assert_eq!(cmd.args, vec!["0", "5", "1"]);
    }

    #[test]
    fn parse_empty_fails() {
        assert_eq!("   ".parse::<Command>(), Err(ProtocolError::EmptyCommand));
        assert_eq!("7".parse::<Command>(), Err(ProtocolError::EmptyCommand));
    }

    #[test]
    fn parse_comment_fails() {
        assert!(matches!(
            "#comment".parse::<Command>(),
            Err(ProtocolError::InvalidName(_))
        ));
    }

    #[test]
    fn arg_at_bounds() {
        let cmd = Command::with_args("play", ["W", "pass"]);
        assert_eq!(cmd.arg_at(1), Some("pass"));
        assert_eq!(cmd.arg_at(2), None);
    }

    #[test]
    fn response_constructors() {
        assert!(!Response::ok("D4").is_error());
        assert!(Response::error("unknown command").is_error());
    }

    #[test]
    fn command_json_shape() {
        let json = serde_json::to_string(&Command::with_args("boardsize", ["19"])).unwrap();
        assert_eq!(json, r#"{"name":"boardsize","args":["19"]}"#);

        let cmd: Command = serde_json::from_str(r#"{"name":"undo"}"#).unwrap();
        assert!(cmd.args.is_empty());
    }
}
