//! Mock channel for testing.
//!
//! Acts as a scripted engine: records every command it receives, answers
//! from per-command queues, and can be told to reject commands.

use super::{ChannelError, CommandChannel};
use async_trait::async_trait;
use gtpsync_types::{Command, Response};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Commands a [`MockChannel`] supports unless told otherwise.
pub const DEFAULT_COMMANDS: [&str; 14] = [
    "protocol_version",
    "name",
    "version",
    "list_commands",
    "boardsize",
    "clear_board",
    "komi",
    "play",
    "genmove",
    "undo",
    "fixed_handicap",
    "place_free_handicap",
    "set_free_handicap",
    "loadsgf",
];

/// Mock channel for testing.
///
/// Unsupported commands are answered with an error, like a real engine
/// answering `? unknown command`.
#[derive(Debug, Default)]
pub struct MockChannel {
    inner: Arc<Mutex<MockChannelInner>>,
}

#[derive(Debug, Default)]
struct MockChannelInner {
    supported: Vec<String>,
    sent: Vec<Command>,
    responses: HashMap<String, VecDeque<Response>>,
    lines: HashMap<String, VecDeque<Vec<String>>>,
    failing: HashSet<String>,
    fail_next: HashMap<String, usize>,
    closed: bool,
}

impl MockChannel {
    /// Create a mock engine supporting [`DEFAULT_COMMANDS`].
    pub fn new() -> Self {
        Self::with_commands(&DEFAULT_COMMANDS)
    }

    /// Create a mock engine supporting exactly `commands`.
    pub fn with_commands(commands: &[&str]) -> Self {
        let channel = Self::default();
        channel.inner.lock().unwrap().supported =
            commands.iter().map(|c| c.to_string()).collect();
        channel
    }

    /// Queue the response for the next command named `name`.
    pub fn queue_response(&self, name: &str, response: Response) {
        let mut inner = self.inner.lock().unwrap();
        inner
            .responses
            .entry(name.to_string())
            .or_default()
            .push_back(response);
    }

    /// Queue lines streamed by the next command named `name`.
    pub fn queue_lines(&self, name: &str, lines: &[&str]) {
        let mut inner = self.inner.lock().unwrap();
        inner
            .lines
            .entry(name.to_string())
            .or_default()
            .push_back(lines.iter().map(|l| l.to_string()).collect());
    }

    /// Reject every command named `name` from now on.
    pub fn fail_command(&self, name: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.failing.insert(name.to_string());
    }

    /// Reject the next `count` commands named `name`.
    pub fn fail_next(&self, name: &str, count: usize) {
        let mut inner = self.inner.lock().unwrap();
        *inner.fail_next.entry(name.to_string()).or_default() += count;
    }

    /// Make every following send fail with [`ChannelError::Closed`].
    pub fn close(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.closed = true;
    }

    /// Get all commands that were received.
    pub fn sent_commands(&self) -> Vec<Command> {
        let inner = self.inner.lock().unwrap();
        inner.sent.clone()
    }

    /// Get all received commands as text, e.g. `"play B C3"`.
    pub fn sent_lines(&self) -> Vec<String> {
        let inner = self.inner.lock().unwrap();
        inner.sent.iter().map(|c| c.to_string()).collect()
    }

    /// Forget the received commands.
    pub fn clear_sent(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.sent.clear();
    }
}

impl Clone for MockChannel {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl MockChannelInner {
    fn respond(&mut self, command: &Command) -> Response {
        let name = command.name.as_str();

        if !self.supported.iter().any(|c| c == name) {
            return Response::error("unknown command");
        }
        if self.failing.contains(name) {
            return Response::error("command failed");
        }
        if let Some(count) = self.fail_next.get_mut(name).filter(|c| **c > 0) {
            *count -= 1;
            return Response::error("command failed");
        }
        if let Some(response) = self.responses.get_mut(name).and_then(VecDeque::pop_front) {
            return response;
        }

        match name {
            "name" => Response::ok("mock"),
            "version" => Response::ok("1.0"),
            "protocol_version" => Response::ok("2"),
            "list_commands" => Response::ok(self.supported.join("\n")),
            "genmove" => Response::ok("pass"),
            _ => Response::ok(""),
        }
    }
}

#[async_trait]
impl CommandChannel for MockChannel {
    async fn send(
        &self,
        command: &Command,
        lines: mpsc::UnboundedSender<String>,
    ) -> Result<Response, ChannelError> {
        let mut inner = self.inner.lock().unwrap();

        if inner.closed {
            return Err(ChannelError::Closed);
        }

        inner.sent.push(command.clone());

        if let Some(streamed) = inner
            .lines
            .get_mut(&command.name)
            .and_then(VecDeque::pop_front)
        {
            for line in streamed {
                let _ = lines.send(line);
            }
        }

        Ok(inner.respond(command))
    }
}
