//! Engine configuration.
//!
//! Configuration is loaded from a TOML file, e.g.:
//!
//! ```toml
//! name = "KataGo"
//! path = "/usr/local/bin/katago"
//! args = ["gtp", "-model", "model.bin.gz"]
//! commands = "time_settings 0 5 1; kata-set-param maxVisits 400"
//! ```

use gtpsync_types::{Command, ProtocolError};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration for one engine.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EngineConfig {
    /// Display name (default: "engine").
    #[serde(default = "default_name")]
    pub name: String,
    /// Path to the engine executable, used by whatever spawns the process.
    #[serde(default)]
    pub path: PathBuf,
    /// Arguments for the engine executable.
    #[serde(default)]
    pub args: Vec<String>,
    /// Semicolon-separated commands sent once the engine has started.
    #[serde(default)]
    pub commands: String,
}

fn default_name() -> String {
    "engine".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            path: PathBuf::new(),
            args: Vec::new(),
            commands: String::new(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Set the initialization commands.
    pub fn with_commands(mut self, commands: &str) -> Self {
        self.commands = commands.to_string();
        self
    }

    /// Parse the initialization commands one entry at a time, skipping
    /// blank entries.
    ///
    /// An entry that isn't a valid command yields an error naming it; the
    /// other entries are unaffected.
    pub fn init_commands(&self) -> Vec<Result<Command, ConfigError>> {
        self.commands
            .split(';')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(|c| {
                c.parse::<Command>().map_err(|source| ConfigError::InvalidCommand {
                    command: c.to_string(),
                    source,
                })
            })
            .collect()
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Failed to parse configuration file.
    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: toml::de::Error,
    },
    /// An initialization command couldn't be parsed.
    #[error("invalid initialization command {command:?}: {source}")]
    InvalidCommand {
        /// The offending entry.
        command: String,
        /// Why it was rejected.
        source: ProtocolError,
    },
}
