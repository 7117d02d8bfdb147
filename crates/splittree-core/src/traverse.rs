// crates/splittree-core/src/traverse.rs

//! Explicit-stack walks over a sealed tree.
//!
//! Both iterators are lazy, finite and single-use: start a fresh one with
//! [`SplitNode::nodes`] / [`SplitNode::leaves`] (or the [`SplitTree`]
//! equivalents) for every pass.
//!
//! [`SplitTree`]: crate::SplitTree

use crate::node::SplitNode;
use std::iter::FusedIterator;

/// Pre-order walk: parent, then left subtree, then right subtree.
#[derive(Clone, Debug)]
pub struct Nodes<'a> {
    stack: Vec<&'a SplitNode>,
}

impl<'a> Nodes<'a> {
    pub(crate) fn new(root: &'a SplitNode) -> Self {
        Self { stack: vec![root] }
    }
}

impl<'a> Iterator for Nodes<'a> {
    type Item = &'a SplitNode;

    #[inline]
    fn next(&mut self) -> Option<&'a SplitNode> {
        let node = self.stack.pop()?;
        if let Some((left, right)) = node.children() {
            self.stack.push(right);
            self.stack.push(left);
        }
        Some(node)
    }
}

impl FusedIterator for Nodes<'_> {}

/// Leaves only, in left-to-right order.
#[derive(Clone, Debug)]
pub struct Leaves<'a> {
    inner: Nodes<'a>,
}

impl<'a> Leaves<'a> {
    pub(crate) fn new(root: &'a SplitNode) -> Self {
        Self {
            inner: Nodes::new(root),
        }
    }
}

impl<'a> Iterator for Leaves<'a> {
    type Item = &'a SplitNode;

    #[inline]
    fn next(&mut self) -> Option<&'a SplitNode> {
        self.inner.find(|n| n.is_leaf())
    }
}

impl FusedIterator for Leaves<'_> {}
