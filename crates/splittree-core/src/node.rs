// crates/splittree-core/src/node.rs

//! Partition nodes: the mutable builder used during accumulation and the
//! sealed, immutable node every renderer reads.
//!
//! ## Lifecycle
//! - A worker starting a fresh sub-sequence creates a [`NodeBuilder`] and
//!   feeds it with [`NodeBuilder::observe`].
//! - Two sibling builders are combined with [`NodeBuilder::merge`], which
//!   consumes both and seals them as the children of a new parent.
//! - [`NodeBuilder::seal`] freezes the final builder into a [`SplitNode`].
//!
//! Ownership does the bookkeeping: a builder used as a merge operand is
//! moved into its parent and cannot be touched again.

use crate::context::{ExecContext, WorkerId};
use crate::summary::Summary;
use crate::traverse::{Leaves, Nodes};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

/// A node still under construction by a single worker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeBuilder {
    summary: Summary,
    children: Option<(Box<SplitNode>, Box<SplitNode>)>,
}

impl NodeBuilder {
    /// Fresh empty leaf owned by the context's worker.
    #[must_use]
    pub fn new(ctx: &ExecContext<'_>) -> Self {
        Self {
            summary: Summary::empty(ctx.worker().clone(), ctx.now()),
            children: None,
        }
    }

    /// Record `element` in this leaf.
    ///
    /// # Panics
    /// Panics if the builder was produced by [`NodeBuilder::merge`]; only
    /// leaves accept elements.
    pub fn observe<T: fmt::Display + ?Sized>(&mut self, ctx: &ExecContext<'_>, element: &T) {
        assert!(
            self.children.is_none(),
            "observe: node {} was produced by merge and no longer accepts elements",
            self.summary
        );
        self.summary.record(element.to_string(), ctx.now());
    }

    /// Combine `self` (left) and `other` (right) into a new parent owned by
    /// the context's worker. Both operands become immutable children.
    #[must_use]
    pub fn merge(self, other: Self, ctx: &ExecContext<'_>) -> Self {
        let summary = Summary::combine(
            &self.summary,
            &other.summary,
            ctx.worker().clone(),
            ctx.now(),
        );
        trace!(
            worker = %ctx.worker(),
            left = %self.summary,
            right = %other.summary,
            "merge"
        );
        Self {
            summary,
            children: Some((Box::new(self.seal()), Box::new(other.seal()))),
        }
    }

    /// Freeze into an immutable node.
    #[must_use]
    pub fn seal(self) -> SplitNode {
        let kind = match self.children {
            None => NodeKind::Leaf,
            Some((left, right)) => NodeKind::Internal { left, right },
        };
        SplitNode {
            summary: self.summary,
            kind,
        }
    }

    /// Summary accumulated so far.
    #[inline]
    #[must_use]
    pub const fn summary(&self) -> &Summary {
        &self.summary
    }

    /// Elements observed so far (including merged children).
    #[inline]
    #[must_use]
    pub const fn count(&self) -> u64 {
        self.summary.count()
    }

    /// `true` until the builder is produced by a merge.
    #[inline]
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        self.children.is_none()
    }
}

impl fmt::Display for NodeBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.summary.fmt(f)
    }
}

/// Shape of a sealed node: either a leaf or a merge of two subtrees.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeKind {
    /// Built purely from observations.
    Leaf,
    /// Built by one merge.
    Internal {
        /// Left-hand merge operand.
        left: Box<SplitNode>,
        /// Right-hand merge operand.
        right: Box<SplitNode>,
    },
}

/// Immutable partition node handed to renderers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitNode {
    summary: Summary,
    kind: NodeKind,
}

impl SplitNode {
    /// The node's summary.
    #[inline]
    #[must_use]
    pub const fn summary(&self) -> &Summary {
        &self.summary
    }

    /// Leaf or internal, with children.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// `(left, right)` for an internal node, `None` for a leaf.
    #[inline]
    #[must_use]
    pub fn children(&self) -> Option<(&Self, &Self)> {
        match &self.kind {
            NodeKind::Leaf => None,
            NodeKind::Internal { left, right } => Some((left, right)),
        }
    }

    /// Left child (`None` for a leaf).
    #[inline]
    #[must_use]
    pub fn left(&self) -> Option<&Self> {
        self.children().map(|(l, _)| l)
    }

    /// Right child (`None` for a leaf).
    #[inline]
    #[must_use]
    pub fn right(&self) -> Option<&Self> {
        self.children().map(|(_, r)| r)
    }

    /// `true` for nodes built only from observations.
    #[inline]
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf)
    }

    /// `true` if the subtree observed no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.summary.count() == 0
    }

    /// Label of the first observed element.
    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<&str> {
        self.summary.first()
    }

    /// Label of the last observed element.
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&str> {
        self.summary.last()
    }

    /// Number of elements in the subtree.
    #[inline]
    #[must_use]
    pub const fn count(&self) -> u64 {
        self.summary.count()
    }

    /// Clock reading at creation.
    #[inline]
    #[must_use]
    pub const fn start_nanos(&self) -> u64 {
        self.summary.start_nanos()
    }

    /// Clock reading at the last mutation.
    #[inline]
    #[must_use]
    pub const fn end_nanos(&self) -> u64 {
        self.summary.end_nanos()
    }

    /// Worker that created (leaf) or merged (internal) this node.
    #[inline]
    #[must_use]
    pub const fn worker(&self) -> &WorkerId {
        self.summary.worker()
    }

    /// `(empty)`, `[x]` or `[first..last]`.
    #[must_use]
    pub fn label(&self) -> String {
        self.summary.to_string()
    }

    /// Lazy pre-order walk over this subtree.
    #[must_use]
    pub fn nodes(&self) -> Nodes<'_> {
        Nodes::new(self)
    }

    /// Lazy walk over the leaves of this subtree, left to right.
    #[must_use]
    pub fn leaves(&self) -> Leaves<'_> {
        Leaves::new(self)
    }

    /// Bottom-up fold: `on_leaf` for every leaf, `on_merge` for every
    /// internal node once both children are folded.
    ///
    /// Runs on an explicit stack, so arbitrarily unbalanced trees are fine.
    pub fn fold<'a, T, L, M>(&'a self, mut on_leaf: L, mut on_merge: M) -> T
    where
        L: FnMut(&'a Self) -> T,
        M: FnMut(&'a Self, T, T) -> T,
    {
        enum Frame<'a> {
            Enter(&'a SplitNode),
            Combine(&'a SplitNode),
        }

        let mut work = vec![Frame::Enter(self)];
        let mut done: Vec<T> = Vec::new();

        while let Some(frame) = work.pop() {
            match frame {
                Frame::Enter(node) => match node.children() {
                    None => done.push(on_leaf(node)),
                    Some((left, right)) => {
                        work.push(Frame::Combine(node));
                        work.push(Frame::Enter(right));
                        work.push(Frame::Enter(left));
                    }
                },
                Frame::Combine(node) => {
                    let (Some(right), Some(left)) = (done.pop(), done.pop()) else {
                        unreachable!("fold: child results missing");
                    };
                    done.push(on_merge(node, left, right));
                }
            }
        }

        match done.pop() {
            Some(root) => root,
            None => unreachable!("fold: no result for root"),
        }
    }
}

impl fmt::Display for SplitNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.summary.fmt(f)
    }
}

// Children are unlinked onto a heap stack so dropping a degenerate chain
// does not recurse once per level.
impl Drop for SplitNode {
    fn drop(&mut self) {
        let mut pending: Vec<Box<Self>> = Vec::new();
        if let NodeKind::Internal { left, right } = std::mem::replace(&mut self.kind, NodeKind::Leaf)
        {
            pending.push(left);
            pending.push(right);
        }
        while let Some(mut node) = pending.pop() {
            if let NodeKind::Internal { left, right } =
                std::mem::replace(&mut node.kind, NodeKind::Leaf)
            {
                pending.push(left);
                pending.push(right);
            }
        }
    }
}
