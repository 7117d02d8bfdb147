// crates/splittree-core/src/tree.rs

//! The sealed partition-history tree.

use crate::context::ExecContext;
use crate::node::{NodeBuilder, SplitNode};
use crate::traverse::{Leaves, Nodes};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Immutable record of how a data source was split and merged.
///
/// Produced by the accumulation contract's finisher (see
/// [`SplitCollector`](crate::SplitCollector)); read-only from then on, so
/// it can be shared across threads and rendered concurrently.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SplitTree {
    root: SplitNode,
}

impl SplitTree {
    /// Wrap a sealed root.
    #[must_use]
    pub const fn new(root: SplitNode) -> Self {
        Self { root }
    }

    /// Run `items` through a single, never-split leaf.
    #[must_use]
    pub fn sequential<I>(ctx: &ExecContext<'_>, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: fmt::Display,
    {
        let mut leaf = NodeBuilder::new(ctx);
        for item in items {
            leaf.observe(ctx, &item);
        }
        Self::new(leaf.seal())
    }

    /// The root node.
    #[inline]
    #[must_use]
    pub const fn root(&self) -> &SplitNode {
        &self.root
    }

    /// Unwrap the root node.
    #[must_use]
    pub fn into_root(self) -> SplitNode {
        self.root
    }

    /// Fresh pre-order walk over every node.
    #[must_use]
    pub fn nodes(&self) -> Nodes<'_> {
        self.root.nodes()
    }

    /// Fresh left-to-right walk over the leaves.
    #[must_use]
    pub fn leaves(&self) -> Leaves<'_> {
        self.root.leaves()
    }

    /// Number of nodes (leaves and merges).
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes().count()
    }

    /// Number of leaves.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.leaves().count()
    }

    /// Number of merge nodes.
    #[must_use]
    pub fn internal_count(&self) -> usize {
        self.nodes().filter(|n| !n.is_leaf()).count()
    }

    /// Elements observed across the whole tree.
    #[inline]
    #[must_use]
    pub const fn total_count(&self) -> u64 {
        self.root.count()
    }

    /// Levels from root to the deepest leaf (a lone leaf has depth 1).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.root.fold(|_| 1, |_, l: usize, r: usize| 1 + l.max(r))
    }

    /// Bottom-up fold over the whole tree; see [`SplitNode::fold`].
    pub fn fold<'a, T, L, M>(&'a self, on_leaf: L, on_merge: M) -> T
    where
        L: FnMut(&'a SplitNode) -> T,
        M: FnMut(&'a SplitNode, T, T) -> T,
    {
        self.root.fold(on_leaf, on_merge)
    }
}

impl From<SplitNode> for SplitTree {
    fn from(root: SplitNode) -> Self {
        Self::new(root)
    }
}
