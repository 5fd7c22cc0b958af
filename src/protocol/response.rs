//! Response definitions
//!
//! Represents results of executed commands.

use serde::{Deserialize, Serialize};

use crate::store::ColumnValue;

/// The result of a successfully executed command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Response {
    /// A mutation was applied
    Done,

    /// A single value lookup; `None` when the key or column is absent
    Value(Option<String>),

    /// Ordered (column, value) pairs
    Columns(Vec<ColumnValue>),

    /// Key listing, sorted for stable output
    Keys(Vec<String>),
}

impl Response {
    /// True for a value lookup that found nothing
    pub fn is_not_found(&self) -> bool {
        matches!(self, Response::Value(None))
    }
}
