//! ColumnTree implementation
//!
//! Arena-backed unbalanced binary search tree keyed by column name.

use std::cmp::Ordering;
use std::mem;

use super::{Iter, Node, NodeId, Range};

/// Ordered column -> value map for a single key
///
/// In-order traversal always yields columns in strictly ascending order.
#[derive(Debug, Clone, Default)]
pub struct ColumnTree {
    /// Node arena; released slots stay allocated and are listed in `free`
    nodes: Vec<Node>,

    /// Released slots available for reuse
    free: Vec<NodeId>,

    /// Root slot
    root: Option<NodeId>,

    /// Number of live nodes
    len: usize,
}

impl ColumnTree {
    /// Create a new empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of columns in the tree
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the tree holds no columns
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert a column, overwriting the value in place if the column exists
    ///
    /// New columns always become leaves. Returns the previous value, if any.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let column = column.into();
        let value = value.into();

        let Some(mut current) = self.root else {
            let id = self.alloc(column, value, None);
            self.root = Some(id);
            self.len += 1;
            return None;
        };

        loop {
            let node = &mut self.nodes[current];
            let next = match column.as_str().cmp(node.column.as_str()) {
                Ordering::Equal => return Some(mem::replace(&mut node.value, value)),
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
            };

            match next {
                Some(child) => current = child,
                None => {
                    let goes_left = column < self.nodes[current].column;
                    let id = self.alloc(column, value, Some(current));
                    if goes_left {
                        self.nodes[current].left = Some(id);
                    } else {
                        self.nodes[current].right = Some(id);
                    }
                    self.len += 1;
                    return None;
                }
            }
        }
    }

    /// Get the value stored for a column
    pub fn get(&self, column: &str) -> Option<&str> {
        self.find(column).map(|id| self.nodes[id].value.as_str())
    }

    /// Check if a column exists
    pub fn contains(&self, column: &str) -> bool {
        self.find(column).is_some()
    }

    /// Remove a column, returning its value
    ///
    /// - Leaf: detached from its parent
    /// - One child: the child is spliced into the node's position
    /// - Two children: the in-order successor's pair moves into the node and
    ///   the successor (which has no left child) is removed instead
    pub fn remove(&mut self, column: &str) -> Option<String> {
        let target = self.find(column)?;
        let node = &self.nodes[target];

        let value = match (node.left, node.right) {
            (Some(_), Some(right)) => {
                let successor = self.leftmost(right);
                let successor_right = self.nodes[successor].right;
                self.replace_in_parent(successor, successor_right);
                let (column, value) = self.release(successor);

                let node = &mut self.nodes[target];
                node.column = column;
                mem::replace(&mut node.value, value)
            }
            (Some(child), None) | (None, Some(child)) => {
                self.replace_in_parent(target, Some(child));
                self.release(target).1
            }
            (None, None) => {
                self.replace_in_parent(target, None);
                self.release(target).1
            }
        };

        self.len -= 1;
        Some(value)
    }

    /// Remove every column
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free.clear();
        self.root = None;
        self.len = 0;
    }

    /// Iterate over all (column, value) pairs in ascending column order
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self)
    }

    /// Iterate over pairs with `start <= column <= end`
    ///
    /// `None` leaves that side of the range open. An inverted range yields
    /// nothing.
    pub fn range<'a>(&'a self, start: Option<&'a str>, end: Option<&'a str>) -> Range<'a> {
        Range::new(self, start, end)
    }

    /// Collect all pairs in ascending column order
    pub fn entries(&self) -> Vec<(String, String)> {
        self.iter()
            .map(|(column, value)| (column.to_string(), value.to_string()))
            .collect()
    }

    /// Number of nodes on the longest root-to-leaf path
    ///
    /// Equals `len()` when columns were inserted in sorted order.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack: Vec<(NodeId, usize)> = self.root.map(|id| (id, 1)).into_iter().collect();

        while let Some((id, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            let node = &self.nodes[id];
            for child in [node.left, node.right].into_iter().flatten() {
                stack.push((child, depth + 1));
            }
        }

        deepest
    }

    // =========================================================================
    // Arena access (shared with the iterators)
    // =========================================================================

    pub(super) fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub(super) fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    // =========================================================================
    // Internal helpers
    // =========================================================================

    fn find(&self, column: &str) -> Option<NodeId> {
        let mut current = self.root;
        while let Some(id) = current {
            let node = &self.nodes[id];
            current = match column.cmp(node.column.as_str()) {
                Ordering::Equal => return Some(id),
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
            };
        }
        None
    }

    fn leftmost(&self, mut id: NodeId) -> NodeId {
        while let Some(left) = self.nodes[id].left {
            id = left;
        }
        id
    }

    /// Point `node`'s parent (or the root slot) at `replacement`
    fn replace_in_parent(&mut self, node: NodeId, replacement: Option<NodeId>) {
        let parent = self.nodes[node].parent;

        if let Some(child) = replacement {
            self.nodes[child].parent = parent;
        }

        match parent {
            None => self.root = replacement,
            Some(parent) => {
                let parent = &mut self.nodes[parent];
                if parent.left == Some(node) {
                    parent.left = replacement;
                } else {
                    parent.right = replacement;
                }
            }
        }
    }

    fn alloc(&mut self, column: String, value: String, parent: Option<NodeId>) -> NodeId {
        let node = Node {
            column,
            value,
            left: None,
            right: None,
            parent,
        };

        match self.free.pop() {
            Some(id) => {
                self.nodes[id] = node;
                id
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        }
    }

    /// Return a detached slot to the free list, handing back its pair
    fn release(&mut self, id: NodeId) -> (String, String) {
        let node = mem::take(&mut self.nodes[id]);
        self.free.push(id);
        (node.column, node.value)
    }
}

impl<'a> IntoIterator for &'a ColumnTree {
    type Item = (&'a str, &'a str);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
