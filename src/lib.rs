//! # keycolval
//!
//! A small embedded key/column/value store with:
//! - Two interchangeable backends: nested hash maps or a binary search tree per key
//! - Ordered column reads and inclusive, open-ended column slices
//! - An append-only, line-oriented operation log for crash recovery
//! - Replay of that log on startup
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Engine / CLI                             │
//! │              (backend selection, commands)                   │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                  ColumnStore trait                           │
//! │           (validate → append → apply in memory)              │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌──────────────────┐
//!   │ OperationLog│          │ HashColumnStore  │
//!   │  (Append,   │          │ TreeColumnStore  │
//!   │   Replay)   │          │   └ ColumnTree   │
//!   └─────────────┘          └──────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use keycolval::{ColumnStore, TreeColumnStore};
//!
//! let mut store = TreeColumnStore::new();
//! store.set("a", "ab", "x").unwrap();
//! store.set("a", "aa", "y").unwrap();
//!
//! assert_eq!(store.get("a", "aa"), Some("y"));
//! assert_eq!(
//!     store.get_key("a"),
//!     vec![("aa".to_string(), "y".to_string()), ("ab".to_string(), "x".to_string())]
//! );
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod tree;
pub mod store;
pub mod oplog;
pub mod protocol;
pub mod engine;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{KcvError, Result};
pub use config::{Backend, Config, LogSyncStrategy};
pub use store::{ColumnStore, ColumnValue, HashColumnStore, TreeColumnStore};
pub use oplog::{Mutation, OperationLog};
pub use engine::{Engine, SharedEngine};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of keycolval
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
