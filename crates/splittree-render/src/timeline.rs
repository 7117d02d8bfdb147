// crates/splittree-render/src/timeline.rs

//! Per-worker execution timelines.
//!
//! Each leaf's `[start, end]` interval is projected onto a shared axis of
//! `quantum`-sized columns and drawn into its worker's row:
//!
//! ```text
//! worker-0 : [0   ..  3][4 .. 7]
//! worker-1 :      [8    ..    15]
//! ```
//!
//! ## Placement rules
//! - column = `(t - run_start) / quantum`; the axis is
//!   `(run_end - run_start) / quantum + 1` columns wide.
//! - A leaf whose start column is already taken moves right to the next
//!   free column; its end column is never left of its start.
//! - A leaf never paints over another leaf in the same row: its span stops
//!   before the next taken column.
//! - Rows grow past the axis when a crowded tail needs the room, and all
//!   rows are padded to the widest.
//!
//! Spans too narrow for the full label degrade to `[first..]`, `[.]`, `[]`
//! and finally `|`.

use splittree_core::{SplitNode, SplitTree, WorkerId};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// One worker's row of columns.
///
/// `cells` holds glyphs; `taken` marks every column claimed by a placed
/// span, blank padding inside a label included.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Strip {
    cells: Vec<char>,
    taken: Vec<bool>,
    spans: Vec<(usize, usize)>,
}

impl Strip {
    /// Row of `len` blank columns.
    #[must_use]
    pub fn blank(len: usize) -> Self {
        Self {
            cells: vec![' '; len],
            taken: vec![false; len],
            spans: Vec::new(),
        }
    }

    /// Number of columns.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the row has no columns.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether column `col` belongs to a placed span.
    #[inline]
    #[must_use]
    pub fn occupied(&self, col: usize) -> bool {
        self.taken.get(col).copied().unwrap_or(false)
    }

    /// Number of columns claimed by spans.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.taken.iter().filter(|&&t| t).count()
    }

    /// Inclusive column spans in placement order (merged rows included).
    #[must_use]
    pub fn spans(&self) -> &[(usize, usize)] {
        &self.spans
    }

    fn grow(&mut self, len: usize) {
        if self.cells.len() < len {
            self.cells.resize(len, ' ');
            self.taken.resize(len, false);
        }
    }

    /// Claim columns `[start, start + text.len())` and draw `text` there.
    fn paint(&mut self, start: usize, text: &str) {
        let end = start + text.chars().count();
        self.grow(end);
        for (cell, c) in self.cells[start..end].iter_mut().zip(text.chars()) {
            *cell = c;
        }
        self.taken[start..end].fill(true);
    }

    /// Place an interval at `[start, end]` columns by the placement rules.
    /// Returns the columns actually used.
    pub fn place(
        &mut self,
        first: Option<&str>,
        last: Option<&str>,
        start: usize,
        end: usize,
    ) -> (usize, usize) {
        let mut start = start;
        while self.occupied(start) {
            start += 1;
        }
        let mut end = end.max(start);
        if let Some(next_taken) = (start + 1..=end).find(|&c| self.occupied(c)) {
            end = next_taken - 1;
        }
        self.paint(start, &interval_text(first, last, end - start + 1));
        self.spans.push((start, end));
        (start, end)
    }

    /// Copy the columns `other` claims into columns still free here.
    pub fn merge(&mut self, other: &Self) {
        self.grow(other.len());
        for (col, (&src, &claimed)) in other.cells.iter().zip(&other.taken).enumerate() {
            if claimed && !self.taken[col] {
                self.cells[col] = src;
                self.taken[col] = true;
            }
        }
        self.spans.extend_from_slice(&other.spans);
    }

    fn pad_to(&mut self, len: usize) {
        self.grow(len);
    }
}

impl fmt::Display for Strip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.cells.iter().try_for_each(|&c| fmt::Write::write_char(f, c))
    }
}

/// Text for an interval `width` columns wide.
///
/// `[first .. last]` with the dots centred when everything fits (no dots for
/// a single-element leaf); otherwise `[first..]` truncated, `[.]`, `[]`, `|`.
#[must_use]
pub fn interval_text(first: Option<&str>, last: Option<&str>, width: usize) -> String {
    let head = format!("[{}", first.unwrap_or(""));
    let h = head.chars().count();
    if last.is_none() && h < width {
        let rest = width - h;
        return format!("{head}{:>rest$}", "]");
    }
    let mut tail = format!("{}]", last.unwrap_or(""));
    if h + tail.chars().count() + 2 >= width {
        tail = "]".to_owned();
    }
    let t = tail.chars().count();

    if h + t + 2 >= width {
        return match width {
            0 => String::new(),
            1 => "|".to_owned(),
            2 => "[]".to_owned(),
            3 => "[.]".to_owned(),
            _ => head.chars().take(width - 3).chain("..]".chars()).collect(),
        };
    }
    let dots = (width - h - t) / 2 + 2;
    let rest = width - h - dots;
    format!("{head}{:>dots$}{tail:>rest$}", "..")
}

/// Renders leaves of one or more trees onto a shared time axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimelineRenderer {
    quantum: u64,
}

impl TimelineRenderer {
    /// Renderer with one column per `quantum`.
    ///
    /// # Panics
    /// Panics if `quantum` is zero.
    #[must_use]
    pub fn new(quantum: Duration) -> Self {
        let quantum = u64::try_from(quantum.as_nanos()).unwrap_or(u64::MAX);
        assert!(quantum > 0, "timeline: quantum must be non-zero");
        Self { quantum }
    }

    /// Column width as a duration.
    #[must_use]
    pub const fn quantum(&self) -> Duration {
        Duration::from_nanos(self.quantum)
    }

    #[allow(clippy::cast_possible_truncation)]
    const fn column(&self, origin: u64, t: u64) -> usize {
        (t.saturating_sub(origin) / self.quantum) as usize
    }

    /// Strips for every worker of `leaves`, drawn in start order.
    fn tree_strips<'a>(
        &self,
        leaves: impl Iterator<Item = &'a SplitNode>,
        origin: u64,
        axis: usize,
    ) -> BTreeMap<WorkerId, Strip> {
        let mut leaves: Vec<&SplitNode> = leaves.collect();
        leaves.sort_by_key(|n| n.start_nanos());

        let mut rows: BTreeMap<WorkerId, Strip> = BTreeMap::new();
        for leaf in leaves {
            let strip = rows
                .entry(leaf.worker().clone())
                .or_insert_with(|| Strip::blank(axis));
            strip.place(
                leaf.first(),
                leaf.last(),
                self.column(origin, leaf.start_nanos()),
                self.column(origin, leaf.end_nanos()),
            );
        }
        rows
    }

    /// One row per worker, sorted by worker label.
    #[must_use]
    pub fn render(&self, tree: &SplitTree) -> Vec<String> {
        self.render_all(&[tree])
    }

    /// Per-worker strips of several trees on one shared axis; strips of the
    /// same worker are merged without overwriting. Rows are not padded.
    #[must_use]
    pub fn strips(&self, trees: &[&SplitTree]) -> BTreeMap<WorkerId, Strip> {
        let leaves = || trees.iter().copied().flat_map(SplitTree::leaves);
        let (Some(origin), Some(finish)) = (
            leaves().map(SplitNode::start_nanos).min(),
            leaves().map(SplitNode::end_nanos).max(),
        ) else {
            return BTreeMap::new();
        };
        let axis = self.column(origin, finish) + 1;

        let mut rows: BTreeMap<WorkerId, Strip> = BTreeMap::new();
        for tree in trees {
            for (worker, strip) in self.tree_strips(tree.leaves(), origin, axis) {
                match rows.get_mut(&worker) {
                    Some(existing) => existing.merge(&strip),
                    None => {
                        rows.insert(worker, strip);
                    }
                }
            }
        }
        rows
    }

    /// Several trees on one axis, one row per worker sorted by label.
    #[must_use]
    pub fn render_all(&self, trees: &[&SplitTree]) -> Vec<String> {
        let rows = self.strips(trees);
        let width = rows.values().map(Strip::len).max().unwrap_or(0);
        let label_width = rows
            .keys()
            .map(|w| w.as_str().chars().count())
            .max()
            .unwrap_or(0);
        rows.into_iter()
            .map(|(worker, mut strip)| {
                strip.pad_to(width);
                format!("{:>label_width$} : {strip}", worker.as_str())
            })
            .collect()
    }
}
