//! ColumnTree iterators
//!
//! Stack-based in-order traversal, so degenerate trees never recurse deeply.

use std::iter::FusedIterator;

use super::{ColumnTree, NodeId};

/// In-order iterator over a [`ColumnTree`]
pub struct Iter<'a> {
    tree: &'a ColumnTree,

    /// Nodes whose left subtree is done but which are not yet yielded
    stack: Vec<NodeId>,
}

impl<'a> Iter<'a> {
    pub(super) fn new(tree: &'a ColumnTree) -> Self {
        let mut iter = Self {
            tree,
            stack: Vec::new(),
        };
        iter.push_left_spine(tree.root());
        iter
    }

    /// Start at the smallest column `>= start`
    fn seek(tree: &'a ColumnTree, start: &str) -> Self {
        let mut stack = Vec::new();
        let mut current = tree.root();

        while let Some(id) = current {
            let node = tree.node(id);
            if node.column.as_str() < start {
                current = node.right;
            } else {
                stack.push(id);
                current = node.left;
            }
        }

        Self { tree, stack }
    }

    fn push_left_spine(&mut self, mut current: Option<NodeId>) {
        while let Some(id) = current {
            self.stack.push(id);
            current = self.tree.node(id).left;
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = self.tree.node(id);
        self.push_left_spine(node.right);
        Some((node.column.as_str(), node.value.as_str()))
    }
}

impl FusedIterator for Iter<'_> {}

/// Iterator over an inclusive column range of a [`ColumnTree`]
pub struct Range<'a> {
    inner: Iter<'a>,
    end: Option<&'a str>,
    done: bool,
}

impl<'a> Range<'a> {
    pub(super) fn new(tree: &'a ColumnTree, start: Option<&'a str>, end: Option<&'a str>) -> Self {
        let inner = match start {
            Some(start) => Iter::seek(tree, start),
            None => Iter::new(tree),
        };

        Self {
            inner,
            end,
            done: false,
        }
    }
}

impl<'a> Iterator for Range<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let (column, value) = self.inner.next()?;

        // Everything after the first column past `end` is also past it
        if self.end.is_some_and(|end| column > end) {
            self.done = true;
            return None;
        }

        Some((column, value))
    }
}

impl FusedIterator for Range<'_> {}
