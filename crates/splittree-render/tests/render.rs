//! Rendering fixtures and shape properties of both renderers.

use proptest::prelude::*;
use splittree_core::{ExecContext, ManualClock, NodeBuilder, SplitNode, SplitTree, WorkerId};
use splittree_engine::{inspect_balanced, BalancedOptions};
use splittree_render::{render_lines, AsciiDiagram, TimelineRenderer};
use std::time::Duration;

fn leaf(ctx: &ExecContext<'_>, items: &[i32]) -> NodeBuilder {
    let mut n = NodeBuilder::new(ctx);
    for i in items {
        n.observe(ctx, i);
    }
    n
}

#[test]
fn two_single_element_leaves() {
    let clock = ManualClock::ticking(0, 1);
    let ctx = ExecContext::new("main", &clock);
    let tree = SplitTree::new(leaf(&ctx, &[1]).merge(leaf(&ctx, &[2]), &ctx).seal());
    assert_eq!(render_lines(&tree), ["[1..2] ", "  _/\\  ", " |   | ", "[1] [2]"]);
}

#[test]
fn merged_halves_then_trailing_empty() {
    let clock = ManualClock::ticking(0, 1);
    let ctx = ExecContext::new("main", &clock);
    let tree = SplitTree::new(
        leaf(&ctx, &[1, 2, 3])
            .merge(leaf(&ctx, &[4, 5, 6]), &ctx)
            .merge(leaf(&ctx, &[]), &ctx)
            .seal(),
    );
    let expected = [
        "      [1..6]      ",
        "      ___/\\___    ",
        "     |        |   ",
        "   [1..6]  (empty)",
        "    __/\\__        ",
        "   |      |       ",
        "[1..3] [4..6]     ",
    ];
    assert_eq!(render_lines(&tree), expected);
    assert_eq!(AsciiDiagram(&tree).to_string(), expected.join("\n"));
}

fn assert_all_labels_intact(tree: &SplitTree, lines: &[String]) {
    for node in tree.nodes() {
        let label = node.label();
        assert!(
            lines.iter().any(|l| l.contains(&label)),
            "label {label} missing from diagram"
        );
    }
}

#[test]
fn taller_left_side_tucks_in_by_its_tightest_row() {
    let clock = ManualClock::ticking(0, 1);
    let ctx = ExecContext::new("main", &clock);
    let left = leaf(&ctx, &[1]).merge(leaf(&ctx, &[2]).merge(leaf(&ctx, &[3, 4, 5, 6]), &ctx), &ctx);
    let right = leaf(&ctx, &[7]).merge(leaf(&ctx, &[8]), &ctx);
    let tree = SplitTree::new(left.merge(right, &ctx).seal());

    let lines = render_lines(&tree);
    assert_eq!(
        lines,
        [
            "       [1..8]       ",
            "       ___/\\____    ",
            "      |         |   ",
            "   [1..6]    [7..8] ",
            "  ____/\\       _/\\  ",
            " |      |     |   | ",
            "[1]  [2..6]  [7] [8]",
            "     ___/\\          ",
            "    |     |         ",
            "   [2] [3..6]       ",
        ]
    );
    assert_all_labels_intact(&tree, &lines);
}

#[test]
fn taller_right_side_tucks_in_by_its_tightest_row() {
    let clock = ManualClock::ticking(0, 1);
    let ctx = ExecContext::new("main", &clock);
    let left = leaf(&ctx, &[3]).merge(leaf(&ctx, &[4]), &ctx);
    let right = leaf(&ctx, &[5, 6, 7])
        .merge(leaf(&ctx, &[8]), &ctx)
        .merge(leaf(&ctx, &[9]), &ctx);
    let tree = SplitTree::new(left.merge(right, &ctx).seal());

    let lines = render_lines(&tree);
    assert_eq!(
        lines,
        [
            "       [3..9]       ",
            "    ______/\\__      ",
            "   |          |     ",
            "[3..4]    [5..9]    ",
            "  _/\\       _/\\___  ",
            " |   |     |      | ",
            "[3] [4]  [5..8]  [9]",
            "           _/\\_     ",
            "          |    |    ",
            "       [5..7] [8]   ",
        ]
    );
    assert_all_labels_intact(&tree, &lines);
}

#[test]
fn sequential_run_is_one_label() {
    let clock = ManualClock::new(0);
    let ctx = ExecContext::new("main", &clock);
    let tree = SplitTree::sequential(&ctx, [1, 2, 3]);
    assert_eq!(render_lines(&tree), ["[1..3]"]);
}

#[test]
fn timeline_places_leaves_on_shared_axis() {
    let clock = ManualClock::new(0);
    let w0 = ExecContext::new("worker-0", &clock);
    let w1 = w0.for_worker("worker-1");

    let mut a = NodeBuilder::new(&w0);
    a.observe(&w0, &1);
    clock.set(9);
    a.observe(&w0, &2);

    clock.set(5);
    let mut b = NodeBuilder::new(&w1);
    b.observe(&w1, &3);
    clock.set(14);
    b.observe(&w1, &4);

    clock.set(15);
    let tree = SplitTree::new(a.merge(b, &w0).seal());
    let rows = TimelineRenderer::new(Duration::from_nanos(1)).render(&tree);
    assert_eq!(
        rows,
        ["worker-0 : [1   .. 2]     ", "worker-1 :      [3   .. 4]"]
    );
}

#[test]
fn timeline_of_several_trees_shares_rows() {
    let clock = ManualClock::ticking(0, 4);
    let opts = BalancedOptions {
        leaf_size: 2,
        workers: 2,
    };
    let items: Vec<u32> = (0..8).collect();
    let first = inspect_balanced(&items, opts, &clock).unwrap();
    let second = inspect_balanced(&items, opts, &clock).unwrap();

    let renderer = TimelineRenderer::new(Duration::from_nanos(4));
    let rows = renderer.render_all(&[&first, &second]);
    assert_eq!(rows.len(), 2);
    assert!(rows[0].starts_with("worker-0 : "));
    assert!(rows[1].starts_with("worker-1 : "));
    let width = rows[0].chars().count();
    assert!(rows.iter().all(|r| r.chars().count() == width));
}

#[test]
fn empty_tree_list_renders_nothing() {
    let renderer = TimelineRenderer::new(Duration::from_micros(1));
    assert!(renderer.render_all(&[]).is_empty());
}

fn expected_height(node: &SplitNode) -> usize {
    node.fold(|_| 1, |_, l: usize, r: usize| 3 + l.max(r))
}

/// Single-worker tree whose leaves cover `[start, start + len]` each.
fn one_lane_tree(intervals: &[(u64, u64)]) -> SplitTree {
    let clock = ManualClock::new(0);
    let ctx = ExecContext::new("w", &clock);
    let mut acc: Option<NodeBuilder> = None;
    for (i, &(start, len)) in intervals.iter().enumerate() {
        clock.set(start);
        let mut n = NodeBuilder::new(&ctx);
        n.observe(&ctx, &(2 * i));
        clock.set(start + len);
        n.observe(&ctx, &(2 * i + 1));
        acc = Some(match acc {
            None => n,
            Some(prev) => prev.merge(n, &ctx),
        });
    }
    SplitTree::new(acc.unwrap().seal())
}

#[test]
fn later_leaf_inside_earlier_span_moves_past_it() {
    let tree = one_lane_tree(&[(0, 10), (2, 2), (3, 0)]);
    let renderer = TimelineRenderer::new(Duration::from_nanos(1));
    assert_eq!(renderer.render(&tree), ["w : [0   ..  1]||"]);
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    #[test]
    fn diagram_is_rectangular(
        n in 0usize..120,
        leaf_size in 1usize..9,
        workers in 1usize..5,
    ) {
        let clock = ManualClock::ticking(0, 1);
        let items: Vec<usize> = (0..n).collect();
        let tree = inspect_balanced(&items, BalancedOptions { leaf_size, workers }, &clock).unwrap();

        let lines = render_lines(&tree);
        prop_assert_eq!(lines.len(), expected_height(tree.root()));
        let width = lines[0].chars().count();
        prop_assert!(lines.iter().all(|l| l.chars().count() == width));
        prop_assert_eq!(render_lines(&tree), lines);
    }

    #[test]
    fn timeline_rows_are_aligned_and_stable(
        n in 1usize..120,
        leaf_size in 1usize..9,
        workers in 1usize..5,
        quantum in 1u64..6,
    ) {
        let clock = ManualClock::ticking(0, 3);
        let items: Vec<usize> = (0..n).collect();
        let tree = inspect_balanced(&items, BalancedOptions { leaf_size, workers }, &clock).unwrap();

        let renderer = TimelineRenderer::new(Duration::from_nanos(quantum));
        let rows = renderer.render(&tree);
        let mut lanes: Vec<&str> = tree.leaves().map(|l| l.worker().as_str()).collect();
        lanes.sort_unstable();
        lanes.dedup();
        prop_assert_eq!(rows.len(), lanes.len());

        let width = rows[0].chars().count();
        prop_assert!(rows.iter().all(|r| r.chars().count() == width));
        for (row, lane) in rows.iter().zip(&lanes) {
            prop_assert!(row.trim_start().starts_with(lane));
        }
        prop_assert_eq!(renderer.render(&tree), rows);
    }

    #[test]
    fn one_lane_spans_never_overlap(
        intervals in prop::collection::vec((0u64..60, 0u64..25), 1..14),
        quantum in 1u64..5,
    ) {
        let tree = one_lane_tree(&intervals);
        let renderer = TimelineRenderer::new(Duration::from_nanos(quantum));
        let strips = renderer.strips(&[&tree]);
        prop_assert_eq!(strips.len(), 1);
        let strip = &strips[&WorkerId::new("w")];

        let mut spans = strip.spans().to_vec();
        prop_assert_eq!(spans.len(), intervals.len());
        spans.sort_unstable();
        for pair in spans.windows(2) {
            prop_assert!(pair[0].1 < pair[1].0, "spans {:?} overlap", pair);
        }
        prop_assert!(strip.occupied_count() >= tree.leaf_count());

        let row: Vec<char> = strip.to_string().chars().collect();
        for &(start, end) in &spans {
            prop_assert!(row[start..=end].iter().any(|&c| c != ' '));
        }
    }
}
