// crates/splittree-core/src/context.rs

//! Execution context threaded through every tree mutation.
//!
//! A node records *who* touched it and *when*. Instead of looking both up
//! from ambient state, callers hand an [`ExecContext`] to
//! [`NodeBuilder::observe`](crate::NodeBuilder::observe) and
//! [`NodeBuilder::merge`](crate::NodeBuilder::merge). Engines build one
//! context per worker over a single shared [`Clock`]; tests inject a
//! [`ManualClock`] and fixed worker ids.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Identity of the execution context (thread, task, lane) that touched a node.
///
/// Ordered by label, which is also the row order of the timeline.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkerId(String);

impl WorkerId {
    /// Wrap a worker label.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// The label as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WorkerId {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl From<String> for WorkerId {
    fn from(label: String) -> Self {
        Self(label)
    }
}

/// Monotonic time source shared by all workers of one run.
pub trait Clock: Send + Sync {
    /// Current instant in nanoseconds on this clock's axis.
    fn now(&self) -> u64;
}

/// [`Clock`] backed by [`Instant`]: nanoseconds elapsed since construction.
#[derive(Clone, Copy, Debug)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Start a clock whose zero is "now".
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    #[inline]
    fn now(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_nanos()).unwrap_or(u64::MAX)
    }
}

/// Deterministic clock for tests and replay.
///
/// Every read returns the current value and then advances it by `step`
/// (zero by default, so time only moves through [`ManualClock::advance`]).
#[derive(Debug, Default)]
pub struct ManualClock {
    nanos: AtomicU64,
    step: u64,
}

impl ManualClock {
    /// Frozen clock reading `start` until advanced.
    #[must_use]
    pub const fn new(start: u64) -> Self {
        Self {
            nanos: AtomicU64::new(start),
            step: 0,
        }
    }

    /// Clock that moves forward by `step` nanoseconds after each read.
    #[must_use]
    pub const fn ticking(start: u64, step: u64) -> Self {
        Self {
            nanos: AtomicU64::new(start),
            step,
        }
    }

    /// Move the clock forward by `delta` nanoseconds; returns the new reading.
    pub fn advance(&self, delta: u64) -> u64 {
        self.nanos.fetch_add(delta, Ordering::SeqCst) + delta
    }

    /// Jump to an absolute reading.
    pub fn set(&self, nanos: u64) {
        self.nanos.store(nanos, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    #[inline]
    fn now(&self) -> u64 {
        self.nanos.fetch_add(self.step, Ordering::SeqCst)
    }
}

/// The acting worker plus the shared clock, passed to every mutation.
#[derive(Clone)]
pub struct ExecContext<'c> {
    worker: WorkerId,
    clock: &'c dyn Clock,
}

impl<'c> ExecContext<'c> {
    /// Context for `worker` reading time from `clock`.
    #[must_use]
    pub fn new(worker: impl Into<WorkerId>, clock: &'c dyn Clock) -> Self {
        Self {
            worker: worker.into(),
            clock,
        }
    }

    /// Same clock, different worker.
    #[must_use]
    pub fn for_worker(&self, worker: impl Into<WorkerId>) -> Self {
        Self {
            worker: worker.into(),
            clock: self.clock,
        }
    }

    /// The worker this context acts for.
    #[inline]
    #[must_use]
    pub const fn worker(&self) -> &WorkerId {
        &self.worker
    }

    /// The shared clock.
    #[inline]
    #[must_use]
    pub fn clock(&self) -> &'c dyn Clock {
        self.clock
    }

    /// Sample the shared clock.
    #[inline]
    #[must_use]
    pub fn now(&self) -> u64 {
        self.clock.now()
    }
}

impl fmt::Debug for ExecContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecContext")
            .field("worker", &self.worker)
            .finish_non_exhaustive()
    }
}
