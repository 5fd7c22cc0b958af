//! Command definitions
//!
//! Represents requests against a store, one per store operation.

use serde::{Deserialize, Serialize};

/// A parsed command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    /// Insert or overwrite a column
    Set {
        key: String,
        column: String,
        value: String,
    },

    /// Get one column's value
    Get { key: String, column: String },

    /// Get all columns of a key, ordered
    GetKey { key: String },

    /// Get every key
    GetKeys,

    /// Delete one column
    Delete { key: String, column: String },

    /// Delete a key and all its columns
    DeleteKey { key: String },

    /// Get an inclusive, optionally open-ended column range
    GetSlice {
        key: String,
        start: Option<String>,
        end: Option<String>,
    },
}

impl Command {
    /// Operation name, as used by the store and the log
    pub fn name(&self) -> &'static str {
        match self {
            Command::Set { .. } => "set",
            Command::Get { .. } => "get",
            Command::GetKey { .. } => "get_key",
            Command::GetKeys => "get_keys",
            Command::Delete { .. } => "delete",
            Command::DeleteKey { .. } => "delete_key",
            Command::GetSlice { .. } => "get_slice",
        }
    }

    /// Whether the command changes store state (and is logged)
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Command::Set { .. } | Command::Delete { .. } | Command::DeleteKey { .. }
        )
    }
}
