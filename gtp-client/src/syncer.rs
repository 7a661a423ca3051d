//! EngineSyncer - keeps one engine in sync with game tree positions.
//!
//! # Architecture
//!
//! EngineSyncer owns the [`Session`] observing all engine traffic and asks
//! gtp-core to plan command batches, which it then executes through the
//! [`CommandChannel`].
//!
//! ```text
//! Application → EngineSyncer → CommandChannel → Engine
//!                   ↓               ↓
//!              gtp-core planner   Session (belief, busy)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use gtpsync_client::{EngineConfig, EngineSyncer, LifecycleEvent, MockChannel};
//! use gtpsync_core::MemoryTree;
//!
//! let syncer = EngineSyncer::new(EngineConfig::default(), MockChannel::new());
//! syncer.handle_lifecycle(LifecycleEvent::Started).await;
//!
//! let tree = MemoryTree::new(19);
//! syncer.sync(&tree, tree.root()).await?;
//! ```

use crate::channel::{send_observed, ChannelError, CommandChannel};
use crate::config::EngineConfig;
use crate::executor::run_batch;
use crate::session::Session;
use futures_util::future::join_all;
use gtpsync_core::{
    reconstruct, validate, EngineBelief, GameTree, PlanContext, PositionError, Strategy,
};
use gtpsync_types::{Command, Response};
use thiserror::Error;
use tokio::sync::watch;

/// Commands sent right after the engine starts.
const HANDSHAKE_COMMANDS: [&str; 4] = ["name", "version", "protocol_version", "list_commands"];

/// Sync errors.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The target position can't be sent to an engine.
    #[error(transparent)]
    Position(#[from] PositionError),

    /// The engine rejected `komi`.
    #[error("engine doesn't support setting komi")]
    KomiUnsupported,

    /// The engine rejected `boardsize`.
    #[error("engine doesn't support this board size")]
    BoardSizeUnsupported,

    /// Every strategy failed.
    #[error("current board arrangement can't be recreated on the engine")]
    Unrecreatable,

    /// Channel failure while settling komi or board size.
    #[error("channel error: {0}")]
    Channel(#[from] ChannelError),
}

/// Engine process lifecycle notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// The process is up and accepting commands.
    Started,
    /// The process exited.
    Stopped,
}

/// Keeps one engine in sync with game tree positions.
pub struct EngineSyncer<C> {
    config: EngineConfig,
    channel: C,
    session: Session,
}

impl<C: CommandChannel> EngineSyncer<C> {
    /// Create a syncer for an engine reachable through `channel`.
    pub fn new(config: EngineConfig, channel: C) -> Self {
        Self {
            config,
            channel,
            session: Session::new(),
        }
    }

    /// Engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Underlying channel.
    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// Snapshot of what the engine is believed to hold.
    pub fn belief(&self) -> EngineBelief {
        self.session.belief()
    }

    /// Check if the engine advertised `name`.
    pub fn supports(&self, name: &str) -> bool {
        self.session.supports(name)
    }

    /// Commands the engine advertised, sorted.
    pub fn supported_commands(&self) -> Vec<String> {
        self.session.supported_commands()
    }

    /// Whether any command is outstanding.
    pub fn is_busy(&self) -> bool {
        self.session.is_busy()
    }

    /// Subscribe to `busy` changes.
    pub fn subscribe_busy(&self) -> watch::Receiver<bool> {
        self.session.subscribe_busy()
    }

    /// Send a command to the engine.
    ///
    /// The response is observed, so commands like `genmove` or `play` keep
    /// the belief up to date.
    pub async fn send_command(&self, command: &Command) -> Result<Response, ChannelError> {
        self.send_command_with(command, |_| {}).await
    }

    /// Send a command, passing every streamed line to `on_line`.
    pub async fn send_command_with<F>(
        &self,
        command: &Command,
        on_line: F,
    ) -> Result<Response, ChannelError>
    where
        F: FnMut(&str) + Send,
    {
        send_observed(&self.channel, &self.session, command, on_line).await
    }

    /// Send all `commands` concurrently; `true` if every one succeeded.
    pub async fn execute(&self, commands: &[Command]) -> bool {
        run_batch(commands.iter().map(|command| self.send_ok(command))).await
    }

    async fn send_ok(&self, command: &Command) -> bool {
        matches!(self.send_command(command).await, Ok(response) if !response.is_error())
    }

    /// React to the engine process starting or stopping.
    pub async fn handle_lifecycle(&self, event: LifecycleEvent) {
        match event {
            LifecycleEvent::Started => self.start().await,
            LifecycleEvent::Stopped => {
                tracing::info!("Engine {} stopped, resetting belief", self.config.name);
                self.session.reset();
            }
        }
    }

    async fn start(&self) {
        let mut commands: Vec<Command> = HANDSHAKE_COMMANDS.map(Command::new).to_vec();
        for init in self.config.init_commands() {
            match init {
                Ok(command) => commands.push(command),
                Err(e) => tracing::warn!("Skipping initialization command: {}", e),
            }
        }

        let results = join_all(commands.iter().map(|c| self.send_command(c))).await;

        for (command, result) in commands.iter().zip(results) {
            match result {
                Ok(response) if response.is_error() => {
                    tracing::warn!(
                        "Engine {} rejected {}: {}",
                        self.config.name,
                        command,
                        response.content
                    );
                }
                Ok(response) => {
                    if command.name == "list_commands" {
                        self.session.set_supported_commands(&response.content);
                    } else {
                        tracing::debug!("{} {} = {}", self.config.name, command, response.content);
                    }
                }
                Err(e) => tracing::warn!("Failed to send {}: {}", command, e),
            }
        }
    }

    /// Bring the engine to the position at `id`.
    ///
    /// Komi and board size are settled first; failures there are fatal.
    /// Then each [`Strategy`] is tried in order until one of them executes
    /// without error.
    ///
    /// Calls must not overlap.
    pub async fn sync<T: GameTree>(&self, tree: &T, id: T::NodeId) -> Result<(), SyncError> {
        let target = tree.board_at(id).ok_or(PositionError::UnknownNode)?;
        validate(&target)?;

        let komi = tree.komi();
        if self.belief().komi != Some(komi) {
            let command = Command::with_args("komi", [komi.to_string()]);
            if self.send_command(&command).await?.is_error() {
                return Err(SyncError::KomiUnsupported);
            }
        }

        let size = target.width();
        let belief = self.belief();
        if belief.dirty || belief.size != Some(size) {
            let command = Command::with_args("boardsize", [size.to_string()]);
            if self.send_command(&command).await?.is_error() {
                return Err(SyncError::BoardSizeUnsupported);
            }
        }

        let moves = reconstruct(tree, id, self.supports("set_free_handicap"));
        let supports_undo = self.supports("undo");

        for strategy in Strategy::CASCADE {
            let belief = self.belief();
            let ctx = PlanContext {
                belief: &belief,
                target: &target,
                moves: moves.as_deref(),
                supports_undo,
            };

            let Some(batch) = strategy.plan(&ctx) else {
                tracing::debug!("Strategy {} can't reach target", strategy.name());
                continue;
            };

            tracing::debug!(
                "Trying strategy {} ({} commands)",
                strategy.name(),
                batch.len()
            );
            if self.execute(&batch).await {
                tracing::info!(
                    "Synced {} using {} ({} commands)",
                    self.config.name,
                    strategy.name(),
                    batch.len()
                );
                return Ok(());
            }
            tracing::debug!("Strategy {} failed", strategy.name());
        }

        Err(SyncError::Unrecreatable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::MockChannel;
    use gtpsync_core::MemoryTree;

    fn syncer() -> EngineSyncer<MockChannel> {
        EngineSyncer::new(EngineConfig::default(), MockChannel::new())
    }

    async fn started(channel: MockChannel) -> EngineSyncer<MockChannel> {
        let syncer = EngineSyncer::new(EngineConfig::default(), channel);
        syncer.handle_lifecycle(LifecycleEvent::Started).await;
        syncer.channel().clear_sent();
        syncer
    }

    // ===========================================
    // Lifecycle Tests
    // ===========================================

    #[tokio::test]
    async fn start_sends_handshake_and_init_commands() {
        let config = EngineConfig::default().with_commands("time_settings 0 5 1");
        let syncer = EngineSyncer::new(config, MockChannel::new());

        syncer.handle_lifecycle(LifecycleEvent::Started).await;

        assert_eq!(
            syncer.channel().sent_lines(),
            vec![
                "name",
                "version",
                "protocol_version",
                "list_commands",
                "time_settings 0 5 1"
            ]
        );
        assert!(syncer.supports("undo"));
        assert!(!syncer.supports("time_settings"));
        assert!(!syncer.is_busy());
    }

    #[tokio::test]
    async fn start_survives_failures() {
        let channel = MockChannel::with_commands(&["name", "list_commands", "play"]);
        let syncer = EngineSyncer::new(EngineConfig::default().with_commands("#bad"), channel);

        syncer.handle_lifecycle(LifecycleEvent::Started).await;

        assert_eq!(syncer.supported_commands(), vec!["list_commands", "name", "play"]);
        assert_eq!(syncer.channel().sent_commands().len(), 4);
    }

    #[tokio::test]
    async fn start_skips_only_bad_init_commands() {
        let config = EngineConfig::default().with_commands("time_settings 0 5 1; #bad; komi 7.5");
        let syncer = EngineSyncer::new(config, MockChannel::new());

        syncer.handle_lifecycle(LifecycleEvent::Started).await;

        assert_eq!(
            syncer.channel().sent_lines(),
            vec![
                "name",
                "version",
                "protocol_version",
                "list_commands",
                "time_settings 0 5 1",
                "komi 7.5"
            ]
        );
        assert_eq!(syncer.belief().komi, Some(7.5));
    }

    #[tokio::test]
    async fn stop_resets_belief() {
        let syncer = started(MockChannel::new()).await;
        let tree = MemoryTree::new(9);
        syncer.sync(&tree, tree.root()).await.unwrap();
        assert!(!syncer.belief().dirty);

        syncer.handle_lifecycle(LifecycleEvent::Stopped).await;

        assert_eq!(syncer.belief(), EngineBelief::default());
        assert!(!syncer.is_busy());
    }

    // ===========================================
    // Passthrough Tests
    // ===========================================

    #[tokio::test]
    async fn genmove_is_tracked() {
        let syncer = started(MockChannel::new()).await;
        syncer.channel().queue_response("genmove", Response::ok("C3"));

        let tree = MemoryTree::new(9);
        syncer.sync(&tree, tree.root()).await.unwrap();
        let response = syncer
            .send_command(&Command::with_args("genmove", ["B"]))
            .await
            .unwrap();

        assert_eq!(response.content, "C3");
        assert_eq!(syncer.belief().moves.len(), 1);
    }

    #[tokio::test]
    async fn execute_reports_any_failure() {
        let syncer = syncer();
        syncer.channel().fail_next("play", 1);

        let batch = ["play B C3", "play W D4"].map(|c| c.parse::<Command>().unwrap());
        assert!(!syncer.execute(&batch).await);
        assert!(syncer.execute(&batch).await);
        assert!(syncer.execute(&[]).await);
    }

    // ===========================================
    // Sync Tests
    // ===========================================

    #[tokio::test]
    async fn sync_settles_komi_and_size() {
        let syncer = started(MockChannel::new()).await;
        let mut tree = MemoryTree::new(13);
        let root = tree.root();
        tree.set_property(root, "KM", &["6.5"]);

        syncer.sync(&tree, root).await.unwrap();

        assert_eq!(
            syncer.channel().sent_lines(),
            vec!["komi 6.5", "boardsize 13", "clear_board"]
        );
        let belief = syncer.belief();
        assert_eq!(belief.komi, Some(6.5));
        assert_eq!(belief.size, Some(13));
    }

    #[tokio::test]
    async fn sync_rejects_unknown_node() {
        let syncer = syncer();
        let tree = MemoryTree::new(9);
        let other = {
            let mut t = MemoryTree::new(9);
            t.append(t.root(), &[("B", &["aa"])])
        };

        let result = syncer.sync(&tree, other).await;
        assert!(matches!(
            result,
            Err(SyncError::Position(PositionError::UnknownNode))
        ));
        assert!(syncer.channel().sent_commands().is_empty());
    }

    #[tokio::test]
    async fn sync_surfaces_channel_failure() {
        let syncer = syncer();
        syncer.channel().close();
        let tree = MemoryTree::new(9);

        let result = syncer.sync(&tree, tree.root()).await;
        assert!(matches!(result, Err(SyncError::Channel(ChannelError::Closed))));
    }

    #[tokio::test]
    async fn sync_falls_through_failed_stages() {
        let syncer = started(MockChannel::new()).await;
        let mut tree = MemoryTree::new(9);
        let node = tree.append(tree.root(), &[("B", &["cc"])]);

        // Replay and rearrange both start with clear_board
        syncer.channel().fail_command("clear_board");
        let result = syncer.sync(&tree, node).await;

        assert!(matches!(result, Err(SyncError::Unrecreatable)));
    }

    #[test]
    fn error_display() {
        assert_eq!(
            SyncError::Unrecreatable.to_string(),
            "current board arrangement can't be recreated on the engine"
        );
        assert_eq!(
            SyncError::from(PositionError::Invalid).to_string(),
            "engines don't support invalid board positions"
        );
    }
}
