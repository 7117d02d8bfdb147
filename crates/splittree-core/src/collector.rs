// crates/splittree-core/src/collector.rs

//! Accumulation contract consumed by partitioning engines.
//!
//! An engine that splits a data source drives four callbacks:
//! - `supplier`: fresh accumulator for a new worker / sub-sequence,
//! - `accumulator`: fold one element into an accumulator,
//! - `combiner`: merge two sibling accumulators (left, right),
//! - `finisher`: turn the final accumulator into the result.
//!
//! [`SplitCollector`] implements the contract over [`NodeBuilder`] and
//! finishes into a sealed [`SplitTree`].
//!
//! ## Invariants (caller side)
//! - An accumulator is owned by exactly one worker while it is fed.
//! - `combiner(left, right)` receives operands covering adjacent runs, left
//!   first; nothing here checks that they do not overlap.

use crate::context::ExecContext;
use crate::node::NodeBuilder;
use crate::tree::SplitTree;
use std::fmt;

/// Fold/combine reduction protocol.
pub trait Collector<T: ?Sized> {
    /// Per-worker partial result.
    type Acc;
    /// Final result.
    type Output;

    /// Fresh accumulator for the worker in `ctx`.
    fn supplier(&self, ctx: &ExecContext<'_>) -> Self::Acc;

    /// Fold `item` into `acc`.
    fn accumulator(&self, acc: &mut Self::Acc, ctx: &ExecContext<'_>, item: &T);

    /// Merge `left` and `right` (in that order) in the worker of `ctx`.
    fn combiner(&self, left: Self::Acc, right: Self::Acc, ctx: &ExecContext<'_>) -> Self::Acc;

    /// Seal the final accumulator.
    fn finisher(&self, acc: Self::Acc) -> Self::Output;
}

/// Records the partition history of a reduction as a [`SplitTree`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SplitCollector;

impl SplitCollector {
    /// Construct a new [`SplitCollector`].
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl<T: fmt::Display + ?Sized> Collector<T> for SplitCollector {
    type Acc = NodeBuilder;
    type Output = SplitTree;

    #[inline]
    fn supplier(&self, ctx: &ExecContext<'_>) -> NodeBuilder {
        NodeBuilder::new(ctx)
    }

    #[inline]
    fn accumulator(&self, acc: &mut NodeBuilder, ctx: &ExecContext<'_>, item: &T) {
        acc.observe(ctx, item);
    }

    #[inline]
    fn combiner(&self, left: NodeBuilder, right: NodeBuilder, ctx: &ExecContext<'_>) -> NodeBuilder {
        left.merge(right, ctx)
    }

    #[inline]
    fn finisher(&self, acc: NodeBuilder) -> SplitTree {
        SplitTree::new(acc.seal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ManualClock;

    #[test]
    fn contract_builds_expected_tree() {
        let clock = ManualClock::ticking(0, 1);
        let ctx = ExecContext::new("main", &clock);
        let c = SplitCollector::new();

        let mut a = Collector::<i32>::supplier(&c, &ctx);
        for i in 1..=3 {
            c.accumulator(&mut a, &ctx, &i);
        }
        let mut b = Collector::<i32>::supplier(&c, &ctx);
        for i in 4..=6 {
            c.accumulator(&mut b, &ctx, &i);
        }
        let e = Collector::<i32>::supplier(&c, &ctx);

        let ab = Collector::<i32>::combiner(&c, a, b, &ctx);
        let tree = Collector::<i32>::finisher(&c, Collector::<i32>::combiner(&c, e, ab, &ctx));

        assert_eq!(tree.total_count(), 6);
        assert_eq!(tree.root().first(), Some("1"));
        assert_eq!(tree.root().last(), Some("6"));
    }
}
