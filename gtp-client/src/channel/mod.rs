//! Command channel abstraction for gtp-sync.
//!
//! This module provides a pluggable channel to an engine process that
//! abstracts the wire protocol and process handling away (real engines,
//! [`MockChannel`] for testing).
//!
//! # Design
//!
//! A channel accepts one command at a time per call and resolves with the
//! engine's final [`Response`]. Lines the engine writes before the final
//! response (analysis output, for instance) are pushed into the provided
//! sender as they arrive. Channels are expected to queue concurrent calls
//! and write them to the engine one after another.
//!
//! Everything sent through [`send_observed`] is reported to a
//! [`CommandObserver`], which is how the session keeps its belief up to date.

mod mock;

pub use mock::{MockChannel, DEFAULT_COMMANDS};

use async_trait::async_trait;
use gtpsync_core::{is_analyze_genmove, parse_play_line, Observation};
use gtpsync_types::{Command, Response};
use thiserror::Error;
use tokio::sync::mpsc;

/// Channel errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChannelError {
    /// The engine process is not running.
    #[error("engine not running")]
    NotRunning,

    /// The engine closed the connection before responding.
    #[error("channel closed")]
    Closed,

    /// Writing the command failed.
    #[error("send failed: {0}")]
    SendFailed(String),
}

/// Sends commands to one engine process.
#[async_trait]
pub trait CommandChannel: Send + Sync {
    /// Send `command` and wait for its final response.
    ///
    /// Intermediate lines are pushed into `lines` while the command is
    /// outstanding. The sender is dropped once the command resolves.
    async fn send(
        &self,
        command: &Command,
        lines: mpsc::UnboundedSender<String>,
    ) -> Result<Response, ChannelError>;
}

/// Receives per-command lifecycle callbacks.
pub trait CommandObserver: Send + Sync {
    /// A command is about to be written.
    fn command_sent(&self, command: &Command);

    /// The outcome of a command relevant to belief tracking is known.
    ///
    /// Not called for commands whose channel call failed.
    fn response_received(&self, command: &Command, observation: Observation<'_>);

    /// The command resolved, successfully or not.
    fn command_finished(&self, command: &Command);
}

/// Send a command through `channel`, reporting its lifecycle to `observer`.
///
/// `on_line` sees every streamed line. For the analyze variants of
/// `genmove`, the first `play <coord>` line is reported as soon as it is
/// seen; if the command resolves first, no coordinate is reported.
pub async fn send_observed<C, O, F>(
    channel: &C,
    observer: &O,
    command: &Command,
    mut on_line: F,
) -> Result<Response, ChannelError>
where
    C: CommandChannel + ?Sized,
    O: CommandObserver + ?Sized,
    F: FnMut(&str) + Send,
{
    let analyze = is_analyze_genmove(&command.name);
    let mut played = false;
    let mut handle_line = |line: &str| {
        if analyze && !played {
            if let Some(coord) = parse_play_line(line) {
                played = true;
                observer.response_received(command, Observation::Streamed(Some(coord)));
            }
        }
        on_line(line);
    };

    observer.command_sent(command);

    let (tx, mut rx) = mpsc::unbounded_channel();
    let send = channel.send(command, tx);
    tokio::pin!(send);

    let result = loop {
        tokio::select! {
            biased;
            Some(line) = rx.recv() => handle_line(&line),
            result = &mut send => break result,
        }
    };

    // Lines delivered in the same poll that resolved the command
    while let Ok(line) = rx.try_recv() {
        handle_line(&line);
    }

    if analyze {
        if !played {
            observer.response_received(command, Observation::Streamed(None));
        }
    } else if let Ok(response) = &result {
        observer.response_received(command, Observation::Response(response));
    }

    observer.command_finished(command);
    result
}
