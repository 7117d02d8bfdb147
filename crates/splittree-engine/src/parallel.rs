// crates/splittree-engine/src/parallel.rs

//! Record how rayon actually splits a parallel iterator.
//!
//! rayon's `fold` produces one accumulator per piece it decides not to
//! split further; `reduce_with` joins those pieces pairwise in order. Both
//! steps go through the [`Collector`] contract, so the resulting tree is the
//! real split history of the run. `reduce_with` is used instead of `reduce`
//! because the latter would splice an identity node into every join.
//!
//! Worker identity is the rayon worker index (`worker-N`), or `main` when a
//! callback runs outside the pool.

use rayon::iter::{IntoParallelIterator, ParallelIterator};
use splittree_core::{Clock, Collector, ExecContext, SplitCollector, SplitTree};
use std::fmt;
use tracing::debug;

/// Context for whichever thread is running the current callback.
fn current_ctx(clock: &dyn Clock) -> ExecContext<'_> {
    let worker = rayon::current_thread_index()
        .map_or_else(|| "main".to_owned(), |i| format!("worker-{i}"));
    ExecContext::new(worker, clock)
}

/// Drive `collector` over a rayon parallel iterator.
pub fn run_par<C, I>(collector: &C, iter: I, clock: &dyn Clock) -> C::Output
where
    I: IntoParallelIterator,
    C: Collector<I::Item> + Sync,
    C::Acc: Send,
{
    let root = iter
        .into_par_iter()
        .fold(
            || {
                let ctx = current_ctx(clock);
                let acc = collector.supplier(&ctx);
                (ctx, acc)
            },
            |(ctx, mut acc), item| {
                collector.accumulator(&mut acc, &ctx, &item);
                (ctx, acc)
            },
        )
        .map(|(_, acc)| acc)
        .reduce_with(|left, right| collector.combiner(left, right, &current_ctx(clock)));

    let root = root.unwrap_or_else(|| collector.supplier(&current_ctx(clock)));
    collector.finisher(root)
}

/// Record the rayon partition history of `iter`.
pub fn inspect_par<I>(iter: I, clock: &dyn Clock) -> SplitTree
where
    I: IntoParallelIterator,
    I::Item: fmt::Display,
{
    let tree = run_par(&SplitCollector::new(), iter, clock);
    debug!(
        elements = tree.total_count(),
        leaves = tree.leaf_count(),
        nodes = tree.node_count(),
        "parallel run finished"
    );
    tree
}
