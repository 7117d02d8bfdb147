// crates/splittree-core/src/summary.rs

//! Per-node summary state and its merge rule.
//!
//! A [`Summary`] is the constant-size projection every node carries: the
//! first and last element labels, the element count, the timestamps and the
//! worker that last touched it. Labels are kept in *first-observed* order,
//! never sorted.
//!
//! ## Merge rule
//! For `left.merge(right)`:
//! - `count = left.count + right.count`
//! - `first = left.first`, else `right.first`
//! - `last` = first defined of `[right.last, right.first, left.last, left.first]`
//! - `worker` = the merging context, `start = end = now`

use crate::context::WorkerId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Summary of the elements observed by one subtree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    first: Option<String>,
    last: Option<String>,
    count: u64,
    start_nanos: u64,
    end_nanos: u64,
    worker: WorkerId,
}

impl Summary {
    /// Summary of a node that has observed nothing yet.
    #[must_use]
    pub const fn empty(worker: WorkerId, now: u64) -> Self {
        Self {
            first: None,
            last: None,
            count: 0,
            start_nanos: now,
            end_nanos: now,
            worker,
        }
    }

    /// Record one more element label observed at `now`.
    pub fn record(&mut self, label: String, now: u64) {
        if self.first.is_none() {
            self.first = Some(label);
        } else {
            self.last = Some(label);
        }
        self.count += 1;
        self.end_nanos = now.max(self.start_nanos);
    }

    /// Parent summary for `left.merge(right)` performed by `worker` at `now`.
    #[must_use]
    pub fn combine(left: &Self, right: &Self, worker: WorkerId, now: u64) -> Self {
        let first = left.first.as_ref().or(right.first.as_ref()).cloned();
        let last = [&right.last, &right.first, &left.last, &left.first]
            .into_iter()
            .find_map(Option::as_ref)
            .cloned();
        Self {
            first,
            last,
            count: left.count + right.count,
            start_nanos: now,
            end_nanos: now,
            worker,
        }
    }

    /// Label of the first observed element.
    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<&str> {
        self.first.as_deref()
    }

    /// Label of the last observed element (`None` for fewer than two).
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&str> {
        self.last.as_deref()
    }

    /// Number of observed elements.
    #[inline]
    #[must_use]
    pub const fn count(&self) -> u64 {
        self.count
    }

    /// Clock reading at creation.
    #[inline]
    #[must_use]
    pub const fn start_nanos(&self) -> u64 {
        self.start_nanos
    }

    /// Clock reading at the last mutation.
    #[inline]
    #[must_use]
    pub const fn end_nanos(&self) -> u64 {
        self.end_nanos
    }

    /// Worker that created or merged the node.
    #[inline]
    #[must_use]
    pub const fn worker(&self) -> &WorkerId {
        &self.worker
    }
}

/// `(empty)`, `[x]` or `[first..last]`.
impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.first, &self.last) {
            (None, _) => f.write_str("(empty)"),
            (Some(first), None) => write!(f, "[{first}]"),
            (Some(first), Some(last)) => write!(f, "[{first}..{last}]"),
        }
    }
}
