//! Engine Module
//!
//! Wires a column store together from a [`Config`] and executes commands
//! against it.
//!
//! ## Responsibilities
//! - Select the store backend
//! - Attach the operation log and replay it on startup
//! - Route commands to store operations
//! - Release the log on controlled shutdown

use std::fs;
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::config::{Backend, Config};
use crate::error::Result;
use crate::protocol::{Command, Response};
use crate::store::{ColumnStore, HashColumnStore, TreeColumnStore};

/// A store plus the configuration it was opened with
///
/// ## Concurrency Model
///
/// The engine itself is single-threaded: every call runs to completion on
/// the caller's thread, including the blocking log append. Use
/// [`Engine::into_shared`] to serialize access from several threads.
pub struct Engine {
    /// Engine configuration
    config: Config,

    /// The selected backend
    store: Box<dyn ColumnStore + Send>,
}

impl Engine {
    /// Open an engine with the given config
    ///
    /// On startup:
    /// 1. Validate the config
    /// 2. Create the log's parent directory if needed
    /// 3. Build the backend, replaying the log if it exists
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;

        let store: Box<dyn ColumnStore + Send> = match &config.log_path {
            Some(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent)?;
                }

                match config.backend {
                    Backend::Hash => Box::new(HashColumnStore::open_with(path, config.sync_strategy)?),
                    Backend::Tree => Box::new(TreeColumnStore::open_with(path, config.sync_strategy)?),
                }
            }
            None => Self::empty_store(config.backend),
        };

        tracing::info!(
            backend = %config.backend,
            persistent = config.log_path.is_some(),
            keys = store.get_keys().len(),
            columns = store.len(),
            "engine opened"
        );

        Ok(Self { config, store })
    }

    /// In-memory engine without a log
    pub fn in_memory(backend: Backend) -> Self {
        Self {
            config: Config::builder().backend(backend).build(),
            store: Self::empty_store(backend),
        }
    }

    fn empty_store(backend: Backend) -> Box<dyn ColumnStore + Send> {
        match backend {
            Backend::Hash => Box::new(HashColumnStore::new()),
            Backend::Tree => Box::new(TreeColumnStore::new()),
        }
    }

    /// Execute a command
    ///
    /// Routes commands to the matching store operation
    pub fn execute(&mut self, command: Command) -> Result<Response> {
        tracing::debug!(op = command.name(), "executing command");

        let response = match command {
            Command::Set { key, column, value } => {
                self.store.set(&key, &column, &value)?;
                Response::Done
            }
            Command::Get { key, column } => {
                Response::Value(self.store.get(&key, &column).map(str::to_string))
            }
            Command::GetKey { key } => Response::Columns(self.store.get_key(&key)),
            Command::GetKeys => {
                let mut keys: Vec<String> = self.store.get_keys().into_iter().collect();
                keys.sort_unstable();
                Response::Keys(keys)
            }
            Command::Delete { key, column } => {
                self.store.delete(&key, &column)?;
                Response::Done
            }
            Command::DeleteKey { key } => {
                self.store.delete_key(&key)?;
                Response::Done
            }
            Command::GetSlice { key, start, end } => Response::Columns(self.store.get_slice(
                &key,
                start.as_deref(),
                end.as_deref(),
            )?),
        };

        Ok(response)
    }

    /// Close the engine gracefully
    ///
    /// Syncs the operation log, if any, and releases its file handle
    pub fn close(mut self) -> Result<()> {
        self.store.close()?;
        tracing::info!(backend = %self.config.backend, "engine closed");
        Ok(())
    }

    /// Wrap the engine in a mutex for use from several threads
    pub fn into_shared(self) -> SharedEngine {
        SharedEngine {
            inner: Arc::new(Mutex::new(self)),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn store(&self) -> &dyn ColumnStore {
        self.store.as_ref()
    }

    pub fn store_mut(&mut self) -> &mut dyn ColumnStore {
        self.store.as_mut()
    }

    pub fn backend(&self) -> Backend {
        self.config.backend
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}

/// An [`Engine`] behind an external mutex
///
/// Clones share the same engine. Each call holds the lock for the whole
/// operation, log append included.
#[derive(Clone)]
pub struct SharedEngine {
    inner: Arc<Mutex<Engine>>,
}

impl SharedEngine {
    /// Execute a command under the lock
    pub fn execute(&self, command: Command) -> Result<Response> {
        self.inner.lock().execute(command)
    }

    /// Lock the engine for a sequence of calls
    pub fn lock(&self) -> MutexGuard<'_, Engine> {
        self.inner.lock()
    }

    /// Recover the engine if this is the last handle
    pub fn try_unwrap(self) -> std::result::Result<Engine, Self> {
        Arc::try_unwrap(self.inner)
            .map(Mutex::into_inner)
            .map_err(|inner| Self { inner })
    }
}
