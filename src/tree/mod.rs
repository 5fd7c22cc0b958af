//! Column Tree Module
//!
//! Ordered per-key column storage for the tree-backed store.
//!
//! ## Responsibilities
//! - Insert / overwrite / lookup of a single column
//! - Ascending in-order iteration
//! - Inclusive, optionally open-ended range scans
//! - Deletion that keeps in-order traversal strictly ascending
//!
//! ## Data Structure Choice
//! An unbalanced binary search tree stored in an arena:
//! - Nodes live in a `Vec` and refer to each other by index
//! - Each node keeps its parent index so deletion can splice in O(1)
//! - Freed slots are recycled through a free list
//! - No rebalancing: sorted insertion degenerates to a list, O(n) per operation
//!
//! ```text
//!            ┌──────┐
//!            │  ac  │ root
//!            └┬────┬┘
//!        ┌────▼┐  ┌▼────┐
//!        │ aa  │  │ ae  │
//!        └───┬─┘  └─┬───┘
//!          ┌─▼─┐  ┌─▼─┐
//!          │ab │  │ad │
//!          └───┘  └───┘
//! ```

mod column_tree;
mod iter;

pub use column_tree::ColumnTree;
pub use iter::{Iter, Range};

/// Index of a node slot in the tree's arena
pub(crate) type NodeId = usize;

/// A single column/value node
///
/// Links are arena indices. The parent link is only followed when a node is
/// detached during deletion.
#[derive(Debug, Clone, Default)]
pub(crate) struct Node {
    pub(crate) column: String,
    pub(crate) value: String,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
    pub(crate) parent: Option<NodeId>,
}
