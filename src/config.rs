//! Configuration for keycolval
//!
//! Centralized configuration with sensible defaults.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{KcvError, Result};

/// Main configuration for a keycolval engine
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Store Configuration
    // -------------------------------------------------------------------------
    /// Which column store implementation backs the engine
    pub backend: Backend,

    // -------------------------------------------------------------------------
    // Operation Log Configuration
    // -------------------------------------------------------------------------
    /// Path of the operation log. `None` runs the store purely in memory.
    pub log_path: Option<PathBuf>,

    /// Sync strategy: how often to fsync the operation log
    pub sync_strategy: LogSyncStrategy,
}

/// Column store implementation selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Per-key hash map of columns: fast point access, sorts on ordered reads
    #[default]
    Hash,

    /// Per-key unbalanced binary search tree: ordered reads without sorting
    Tree,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Hash => f.write_str("hash"),
            Backend::Tree => f.write_str("tree"),
        }
    }
}

impl FromStr for Backend {
    type Err = KcvError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "hash" => Ok(Backend::Hash),
            "tree" => Ok(Backend::Tree),
            other => Err(KcvError::Config(format!("unknown backend: {}", other))),
        }
    }
}

/// Operation log sync strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogSyncStrategy {
    /// Never fsync explicitly; rely on the platform's default write behaviour
    #[default]
    OsBuffered,

    /// fsync after every record (safest, slowest)
    EveryWrite,

    /// fsync after N records
    EveryNEntries { count: usize },
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: Backend::Hash,
            log_path: None,
            sync_strategy: LogSyncStrategy::OsBuffered,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Default config persisted to the given log file
    pub fn persistent(log_path: impl Into<PathBuf>) -> Self {
        Self::builder().log_path(log_path).build()
    }

    /// Check the config for values that cannot work
    pub fn validate(&self) -> Result<()> {
        if let LogSyncStrategy::EveryNEntries { count: 0 } = self.sync_strategy {
            return Err(KcvError::Config(
                "EveryNEntries sync strategy requires a count of at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the column store backend
    pub fn backend(mut self, backend: Backend) -> Self {
        self.config.backend = backend;
        self
    }

    /// Persist mutations to the operation log at `path`
    pub fn log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.log_path = Some(path.into());
        self
    }

    /// Set the operation log sync strategy
    pub fn sync_strategy(mut self, strategy: LogSyncStrategy) -> Self {
        self.config.sync_strategy = strategy;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
