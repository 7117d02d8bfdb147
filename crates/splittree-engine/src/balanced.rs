// crates/splittree-engine/src/balanced.rs

//! Deterministic balanced divide-and-conquer driver.
//!
//! - Midpoint splits on half-open spans `[lo, hi)` until a span holds at
//!   most `leaf_size` items.
//! - Explicit post-order DFS (O(depth) frames, no recursion); leaves fire
//!   left to right, combines fire once both children are done.
//! - Lanes mimic fork-join: the left half stays on the forking lane, the
//!   right half moves to the next lane (round-robin over `workers`), and
//!   the join runs on the forking lane.

use anyhow::{anyhow, Result};
use splittree_core::{Clock, Collector, ExecContext, SplitCollector, SplitTree};
use std::fmt;
use tracing::debug;

/// Half-open interval `[lo, hi)` of item indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span {
    /// inclusive lower bound
    pub lo: usize,
    /// exclusive upper bound
    pub hi: usize,
}

impl Span {
    /// Create a span `[lo, hi)`.
    #[inline]
    #[must_use]
    pub const fn new(lo: usize, hi: usize) -> Self {
        Self { lo, hi }
    }

    /// Number of items covered.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.hi.saturating_sub(self.lo)
    }

    /// Whether the span covers no items.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Balanced split at the midpoint.
    #[inline]
    #[must_use]
    pub const fn split_mid(&self) -> (Self, Self) {
        let mid = self.lo + self.len() / 2;
        (Self::new(self.lo, mid), Self::new(mid, self.hi))
    }
}

/// Split policy of the balanced driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BalancedOptions {
    /// Largest span processed as a single leaf (≥ 1).
    pub leaf_size: usize,
    /// Number of worker lanes (≥ 1).
    pub workers: usize,
}

impl Default for BalancedOptions {
    fn default() -> Self {
        Self {
            leaf_size: 1,
            workers: 4,
        }
    }
}

/// Schedule events, in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// Accumulate every item of `span` into a fresh leaf on `lane`.
    Leaf {
        /// Items of the leaf.
        span: Span,
        /// Lane running it.
        lane: usize,
    },
    /// Merge the two most recent results into the parent covering `span`.
    Combine {
        /// Items of the parent.
        span: Span,
        /// Lane performing the join.
        lane: usize,
    },
}

#[derive(Clone, Copy, Debug)]
struct Frame {
    span: Span,
    lane: usize,
    /// 0 = not visited, 1 = left pushed, 2 = right pushed (emit combine next)
    state: u8,
}

/// Post-order DFS over the balanced split of `[0, n)`.
#[derive(Clone, Debug)]
pub struct BalancedSchedule {
    stack: Vec<Frame>,
    leaf_size: usize,
    workers: usize,
    forks: usize,
}

impl BalancedSchedule {
    /// Schedule for `n` items.
    ///
    /// # Panics
    /// Panics if `leaf_size` or `workers` is zero.
    #[must_use]
    pub fn new(n: usize, opts: BalancedOptions) -> Self {
        assert!(opts.leaf_size > 0, "balanced schedule: leaf_size must be > 0");
        assert!(opts.workers > 0, "balanced schedule: workers must be > 0");
        Self {
            stack: vec![Frame {
                span: Span::new(0, n),
                lane: 0,
                state: 0,
            }],
            leaf_size: opts.leaf_size,
            workers: opts.workers,
            forks: 0,
        }
    }
}

impl Iterator for BalancedSchedule {
    type Item = Event;

    fn next(&mut self) -> Option<Event> {
        loop {
            let top = self.stack.last_mut()?;
            if top.span.len() <= self.leaf_size {
                let Frame { span, lane, .. } = *top;
                self.stack.pop();
                return Some(Event::Leaf { span, lane });
            }

            let (left, right) = top.span.split_mid();
            let lane = top.lane;
            match top.state {
                0 => {
                    // First visit: the forking lane keeps the left half.
                    top.state = 1;
                    self.stack.push(Frame {
                        span: left,
                        lane,
                        state: 0,
                    });
                }
                1 => {
                    top.state = 2;
                    self.forks += 1;
                    let stolen = (lane + self.forks) % self.workers;
                    self.stack.push(Frame {
                        span: right,
                        lane: stolen,
                        state: 0,
                    });
                }
                2 => {
                    let span = top.span;
                    self.stack.pop();
                    return Some(Event::Combine { span, lane });
                }
                _ => unreachable!("invalid frame state"),
            }
        }
    }
}

/// Label of lane `lane`.
#[must_use]
pub fn lane_name(lane: usize) -> String {
    format!("worker-{lane}")
}

/// Drive `collector` over `items` with the balanced schedule.
///
/// Returns an error if the schedule is internally inconsistent.
pub fn run<T, C>(collector: &C, items: &[T], opts: BalancedOptions, clock: &dyn Clock) -> Result<C::Output>
where
    C: Collector<T>,
{
    let base = ExecContext::new(lane_name(0), clock);
    let mut pending: Vec<C::Acc> = Vec::new();
    let (mut leaves, mut combines) = (0usize, 0usize);

    for ev in BalancedSchedule::new(items.len(), opts) {
        match ev {
            Event::Leaf { span, lane } => {
                let ctx = base.for_worker(lane_name(lane));
                let mut acc = collector.supplier(&ctx);
                for item in &items[span.lo..span.hi] {
                    collector.accumulator(&mut acc, &ctx, item);
                }
                pending.push(acc);
                leaves += 1;
            }
            Event::Combine { span, lane } => {
                let right = pending
                    .pop()
                    .ok_or_else(|| anyhow!("missing right operand for [{}, {})", span.lo, span.hi))?;
                let left = pending
                    .pop()
                    .ok_or_else(|| anyhow!("missing left operand for [{}, {})", span.lo, span.hi))?;
                let ctx = base.for_worker(lane_name(lane));
                pending.push(collector.combiner(left, right, &ctx));
                combines += 1;
            }
        }
    }

    let root = pending
        .pop()
        .ok_or_else(|| anyhow!("balanced run produced no root"))?;
    if !pending.is_empty() {
        return Err(anyhow!("{} partial results left unmerged", pending.len()));
    }
    debug!(items = items.len(), leaves, combines, "balanced run finished");
    Ok(collector.finisher(root))
}

/// Record the balanced partition history of `items`.
pub fn inspect_balanced<T: fmt::Display>(
    items: &[T],
    opts: BalancedOptions,
    clock: &dyn Clock,
) -> Result<SplitTree> {
    run(&SplitCollector::new(), items, opts, clock)
}
