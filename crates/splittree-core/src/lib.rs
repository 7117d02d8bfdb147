// crates/splittree-core/src/lib.rs

//! splittree-core: partition-history trees for divide-and-conquer reductions.
//!
//! A partitioning engine (rayon, a hand-written splitter, a test harness)
//! reduces a data source through the [`Collector`] contract. This crate
//! records the order and boundaries of those calls as a binary tree:
//! - leaves are runs of directly observed elements,
//! - internal nodes are merges of two sibling runs,
//! - every node tracks first/last element label, count, timestamps and the
//!   worker that created it.
//!
//! ```rust
//! use splittree_core::{ExecContext, ManualClock, NodeBuilder, SplitTree};
//!
//! let clock = ManualClock::ticking(0, 1);
//! let ctx = ExecContext::new("main", &clock);
//! let mut left = NodeBuilder::new(&ctx);
//! left.observe(&ctx, &1);
//! let mut right = NodeBuilder::new(&ctx);
//! right.observe(&ctx, &2);
//!
//! let tree = SplitTree::new(left.merge(right, &ctx).seal());
//! assert_eq!(tree.root().label(), "[1..2]");
//! assert_eq!(tree.leaf_count(), 2);
//! ```
//!
//! Mutation happens only on [`NodeBuilder`]; renderers receive the sealed
//! [`SplitTree`] / [`SplitNode`] types, which expose no mutators.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![deny(missing_docs)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]
#![allow(
    clippy::missing_errors_doc,
    clippy::module_name_repetitions,
    clippy::doc_markdown
)]

/// Fold/combine accumulation contract and its split-tree implementation.
pub mod collector;
/// Worker identity, clocks and the execution-context handle.
pub mod context;
/// JSON persistence of sealed trees.
pub mod io;
/// Builder and sealed node types.
pub mod node;
/// Per-node summary state and the merge rule.
pub mod summary;
/// Sealed tree wrapper.
pub mod tree;
/// Pre-order and leaf iterators.
pub mod traverse;

pub use collector::{Collector, SplitCollector};
pub use context::{Clock, ExecContext, ManualClock, MonotonicClock, WorkerId};
pub use node::{NodeBuilder, NodeKind, SplitNode};
pub use summary::Summary;
pub use traverse::{Leaves, Nodes};
pub use tree::SplitTree;

/// Commonly-used items for quick imports.
///
/// ```rust
/// use splittree_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Clock, Collector, ExecContext, ManualClock, MonotonicClock, NodeBuilder, SplitCollector,
        SplitNode, SplitTree, WorkerId,
    };
}
