// crates/splittree-render/src/ascii.rs

//! ASCII tree diagrams.
//!
//! Every subtree renders to a rectangular block of lines. A leaf is its
//! label on one line. An internal node stacks, over the side-by-side
//! blocks of its children:
//!
//! ```text
//! [1..2]      label, centred over both children
//!   _/\       branch: underscores between the child midpoints
//!  |   |      connector: one '|' over each child midpoint
//! [1] [2]     children, separated by one gap column
//! ```
//!
//! ## Ragged subtrees
//! When one child block is taller than the other, the taller side's rows
//! that sit next to the shorter block usually end (or start) in blank
//! margin. That shared margin, minus one column, is discounted from the
//! taller side's width (never more than the other side's width), so the
//! shorter block tucks into the gutter. Rows of the taller block below the
//! shorter one keep their full width.
//!
//! The glyphs used besides labels are `' '`, `'_'`, `'/'`, `'\'` and `'|'`.

use splittree_core::{SplitNode, SplitTree};
use std::fmt;

type Line = Vec<char>;

/// Rendered subtree: equal-width lines.
#[derive(Clone, Debug)]
struct Block {
    lines: Vec<Line>,
    width: usize,
}

impl Block {
    fn leaf(node: &SplitNode) -> Self {
        let line: Line = node.label().chars().collect();
        Self {
            width: line.len(),
            lines: vec![line],
        }
    }

    fn into_strings(self) -> Vec<String> {
        self.lines.into_iter().map(String::from_iter).collect()
    }
}

/// `s` placed at column `left` of a blank line of width `len`.
fn pad(s: &[char], left: usize, len: usize) -> Line {
    if s.len() == len {
        return s.to_vec();
    }
    let mut out = vec![' '; len];
    for (dst, &c) in out.iter_mut().skip(left).zip(s) {
        *dst = c;
    }
    out
}

fn leading_spaces(s: &[char]) -> usize {
    s.iter().take_while(|&&c| c == ' ').count()
}

fn trailing_spaces(s: &[char]) -> usize {
    s.iter().rev().take_while(|&&c| c == ' ').count()
}

/// Blank margin common to the first `rows` lines, as measured by `margin`.
fn shared_margin(lines: &[Line], rows: usize, margin: fn(&[char]) -> usize) -> usize {
    lines[..rows].iter().map(|l| margin(l)).min().unwrap_or(0)
}

fn compose(node: &SplitNode, left: &Block, right: &Block) -> Block {
    let (l, r) = (&left.lines, &right.lines);
    let (mut w1, mut w2) = (left.width, right.width);

    if l.len() > r.len() {
        let margin = shared_margin(l, r.len(), trailing_spaces);
        w1 -= w2.min(margin.saturating_sub(1));
    } else if l.len() < r.len() {
        let margin = shared_margin(r, l.len(), leading_spaces);
        w2 -= w1.min(margin.saturating_sub(1));
    }

    let label: Line = node.label().chars().collect();
    let inner = w1 + w2 + 1;
    let label_len = label.len();
    // a label wider than both children widens the block instead
    let (label_line, total, left_add) = if label_len < inner {
        (pad(&label, (inner - label_len) / 2, inner), inner, 0)
    } else {
        (label, label_len, (label_len - inner) / 2)
    };

    let left_mid = left_add + w1 / 2;
    let right_mid = left_add + w1 + 1 + w2 / 2;
    let mid = total / 2;

    let mut lines = Vec::with_capacity(3 + l.len().max(r.len()));
    lines.push(label_line);

    let mut branch = vec![' '; total];
    for c in &mut branch[left_mid + 1..right_mid] {
        *c = '_';
    }
    branch[mid] = if left_mid == mid { '|' } else { '/' };
    branch[mid + 1] = if right_mid == mid + 1 { '|' } else { '\\' };
    lines.push(branch);

    let mut connector = vec![' '; total];
    connector[left_mid] = '|';
    connector[right_mid] = '|';
    lines.push(connector);

    for i in 0..l.len().max(r.len()) {
        let row = match (l.get(i), r.get(i)) {
            (Some(ls), Some(rs)) => {
                let mut row = ls[..w1].to_vec();
                row.push(' ');
                row.extend_from_slice(&rs[rs.len() - w2..]);
                pad(&row, left_add, total)
            }
            (Some(ls), None) => {
                let mut row = ls.clone();
                row.push(' ');
                pad(&row, left_add, total)
            }
            // right-justified to where the right block ends
            (None, Some(rs)) => pad(rs, left_add + w1 + 1 + w2 - rs.len(), total),
            (None, None) => unreachable!("row {i} beyond both child blocks"),
        };
        lines.push(row);
    }

    Block {
        lines,
        width: total,
    }
}

/// Render the subtree rooted at `node` as equal-width lines.
#[must_use]
pub fn render_node(node: &SplitNode) -> Vec<String> {
    node.fold(Block::leaf, |n, l, r| compose(n, &l, &r))
        .into_strings()
}

/// Render `tree` as equal-width lines, root label first.
#[must_use]
pub fn render_lines(tree: &SplitTree) -> Vec<String> {
    render_node(tree.root())
}

/// Render `tree` as one newline-joined string (no trailing newline).
#[must_use]
pub fn render_string(tree: &SplitTree) -> String {
    render_lines(tree).join("\n")
}

/// `Display` adapter: `format!("{}", AsciiDiagram(&tree))`.
#[derive(Clone, Copy, Debug)]
pub struct AsciiDiagram<'a>(pub &'a SplitTree);

impl fmt::Display for AsciiDiagram<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_string(self.0))
    }
}
