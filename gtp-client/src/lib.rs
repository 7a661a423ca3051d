//! # gtp-client
//!
//! Client library keeping GTP engines in sync with game tree positions.
//!
//! This is the main library that applications use to drive engines.
//!
//! ## Features
//!
//! - **Belief Tracking**: every command and response is observed, so the
//!   library always knows what the engine holds without asking it
//! - **Minimal Resync**: reuses the engine's history, falling back to
//!   rearranging stones only when needed
//! - **Channel Abstraction**: pluggable engine channel (process, mock)
//! - **Pure Planning**: uses gtp-core for side-effect-free logic
//!
//! ## Example
//!
//! ```ignore
//! use gtpsync_client::{EngineConfig, EngineSyncer, LifecycleEvent};
//!
//! let config = EngineConfig::from_file(Path::new("engine.toml"))?;
//! let syncer = EngineSyncer::new(config, channel);
//! syncer.handle_lifecycle(LifecycleEvent::Started).await;
//!
//! // Bring the engine to the current position
//! syncer.sync(&tree, node).await?;
//!
//! // Ask for a move
//! let response = syncer.send_command(&Command::with_args("genmove", ["B"])).await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod channel;
pub mod config;
pub mod executor;
pub mod session;
pub mod syncer;

pub use channel::{
    send_observed, ChannelError, CommandChannel, CommandObserver, MockChannel, DEFAULT_COMMANDS,
};
pub use config::{ConfigError, EngineConfig};
pub use executor::run_batch;
pub use session::Session;
pub use syncer::{EngineSyncer, LifecycleEvent, SyncError};
