// crates/splittree-xgml/src/layout.rs

//! Box placement.
//!
//! Every subtree is laid out with its root box at `x = 0`. For an internal
//! node both child layouts move down one level, then sideways so that the
//! two subtree spans sit `sibling_gap` apart, centred under the parent box.
//! Boxes come out in pre-order, so a box's index doubles as its node id.
//!
//! Two linear passes over the pre-order node list:
//! - bottom-up (reverse pre-order): subtree sizes, the x-span of every
//!   subtree relative to its root, and each child's offset from its parent;
//! - top-down: absolute positions as parent position plus offset.

use crate::config::XgmlConfig;
use splittree_core::{SplitNode, SplitTree};

/// Placed node box.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphBox {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Rendered label text.
    pub label: String,
    /// Ids of the two child boxes, for internal nodes.
    pub children: Option<(usize, usize)>,
}

impl GraphBox {
    /// Whether the box stands for a leaf.
    #[inline]
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        self.children.is_none()
    }
}

/// Lay out every node of `tree`; index `i` of the result is node id `i`.
#[must_use]
pub fn layout(tree: &SplitTree, cfg: &XgmlConfig) -> Vec<GraphBox> {
    let nodes: Vec<&SplitNode> = tree.nodes().collect();
    let n = nodes.len();
    let w = cfg.node_width;

    let mut size = vec![1usize; n];
    // min/max box origin of the subtree, relative to its root box
    let mut span = vec![(0i32, 0i32); n];
    // x offset of a box from its parent box
    let mut dx = vec![0i32; n];
    let mut children: Vec<Option<(usize, usize)>> = vec![None; n];

    for i in (0..n).rev() {
        if nodes[i].is_leaf() {
            continue;
        }
        let l = i + 1;
        let r = l + size[l];
        size[i] = 1 + size[l] + size[r];
        children[i] = Some((l, r));

        let ((left_min, left_max), (right_min, right_max)) = (span[l], span[r]);
        let total = (left_max + w - left_min) + (right_max + w - right_min) + cfg.sibling_gap;
        dx[l] = (w - total) / 2 - left_min;
        dx[r] = (w + total) / 2 - (right_max + w);
        span[i] = (
            0.min(left_min + dx[l]).min(right_min + dx[r]),
            0.max(left_max + dx[l]).max(right_max + dx[r]),
        );
    }

    let mut pos = vec![(0i32, 0i32); n];
    for i in 0..n {
        if let Some((l, r)) = children[i] {
            let (x, y) = pos[i];
            pos[l] = (x + dx[l], y + cfg.level_height);
            pos[r] = (x + dx[r], y + cfg.level_height);
        }
    }

    nodes
        .iter()
        .zip(pos)
        .zip(children)
        .map(|((node, (x, y)), children)| GraphBox {
            x,
            y,
            label: cfg.label_for(node),
            children,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use splittree_core::{ExecContext, ManualClock, NodeBuilder};

    fn pair() -> SplitTree {
        let clock = ManualClock::ticking(0, 1);
        let ctx = ExecContext::new("main", &clock);
        let mut a = NodeBuilder::new(&ctx);
        a.observe(&ctx, &1);
        let mut b = NodeBuilder::new(&ctx);
        b.observe(&ctx, &2);
        SplitTree::new(a.merge(b, &ctx).seal())
    }

    /// Direct construction: lay out both children, then move each whole
    /// subtree into place. Quadratic on deep trees, fine for small ones.
    fn shifted_layout(tree: &SplitTree, cfg: &XgmlConfig) -> Vec<(i32, i32)> {
        tree.fold(
            |_| vec![(0, 0)],
            |_, mut left: Vec<(i32, i32)>, mut right: Vec<(i32, i32)>| {
                let extent = |v: &[(i32, i32)]| {
                    let lo = v.iter().map(|p| p.0).min().unwrap();
                    let hi = v.iter().map(|p| p.0).max().unwrap();
                    (lo, hi + cfg.node_width)
                };
                let ((lmin, lmax), (rmin, rmax)) = (extent(&left), extent(&right));
                let total = (lmax - lmin) + (rmax - rmin) + cfg.sibling_gap;
                let w = cfg.node_width;
                for p in &mut left {
                    *p = (p.0 + (w - total) / 2 - lmin, p.1 + cfg.level_height);
                }
                for p in &mut right {
                    *p = (p.0 + (w + total) / 2 - rmax, p.1 + cfg.level_height);
                }
                let mut out = vec![(0, 0)];
                out.append(&mut left);
                out.append(&mut right);
                out
            },
        )
    }

    /// Contiguous runs merged pairwise in the order given by `picks`.
    fn build(runs: &[usize], picks: &[usize]) -> SplitTree {
        let clock = ManualClock::ticking(0, 1);
        let ctx = ExecContext::new("main", &clock);
        let mut next = 0usize;
        let mut accs: Vec<NodeBuilder> = runs
            .iter()
            .map(|&len| {
                let mut leaf = NodeBuilder::new(&ctx);
                for _ in 0..len {
                    leaf.observe(&ctx, &next);
                    next += 1;
                }
                leaf
            })
            .collect();
        let mut k = 0;
        while accs.len() > 1 {
            let pick = picks.get(k).copied().unwrap_or(0) % (accs.len() - 1);
            k += 1;
            let right = accs.remove(pick + 1);
            let left = accs.remove(pick);
            accs.insert(pick, left.merge(right, &ctx));
        }
        SplitTree::new(accs.pop().unwrap().seal())
    }

    #[test]
    fn children_are_centred_under_parent() {
        let boxes = layout(&pair(), &XgmlConfig::default());
        assert_eq!(boxes.len(), 3);
        let (root, l, r) = (&boxes[0], &boxes[1], &boxes[2]);
        assert_eq!((root.x, root.y), (0, 0));
        // total = 100 + 100 + 30
        assert_eq!((l.x, l.y), (-65, 70));
        assert_eq!((r.x, r.y), (65, 70));
        assert_eq!(root.children, Some((1, 2)));
    }

    #[test]
    fn ids_follow_pre_order() {
        let clock = ManualClock::ticking(0, 1);
        let ctx = ExecContext::new("main", &clock);
        let leaf = |v: i32| {
            let mut n = NodeBuilder::new(&ctx);
            n.observe(&ctx, &v);
            n
        };
        let left = leaf(1).merge(leaf(2), &ctx);
        let tree = SplitTree::new(left.merge(leaf(3), &ctx).seal());

        let boxes = layout(&tree, &XgmlConfig::default());
        let labels: Vec<String> = tree.nodes().map(|n| XgmlConfig::default().label_for(n)).collect();
        let placed: Vec<String> = boxes.iter().map(|b| b.label.clone()).collect();
        assert_eq!(placed, labels);
        assert_eq!(boxes[0].children, Some((1, 4)));
        assert_eq!(boxes[1].children, Some((2, 3)));
        assert!(boxes[4].is_leaf());
        assert_eq!(boxes[2].y, 140);
    }

    #[test]
    fn deep_chain_is_laid_out_level_by_level() {
        const DEPTH: usize = 20_000;
        let clock = ManualClock::new(0);
        let ctx = ExecContext::new("main", &clock);
        let mut acc = NodeBuilder::new(&ctx);
        acc.observe(&ctx, &0);
        for i in 1..=DEPTH {
            let mut leaf = NodeBuilder::new(&ctx);
            leaf.observe(&ctx, &i);
            acc = acc.merge(leaf, &ctx);
        }
        let tree = SplitTree::new(acc.seal());
        let cfg = XgmlConfig::default();

        let boxes = layout(&tree, &cfg);
        assert_eq!(boxes.len(), 2 * DEPTH + 1);
        let deepest = boxes.iter().map(|b| b.y).max().unwrap();
        assert_eq!(deepest, i32::try_from(DEPTH).unwrap() * cfg.level_height);
        let (root_l, root_r) = boxes[0].children.unwrap();
        assert!(boxes[root_l].x < boxes[root_r].x);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 96,
            .. ProptestConfig::default()
        })]

        #[test]
        fn offsets_match_whole_subtree_shifting(
            runs in prop::collection::vec(0usize..4, 1..24),
            picks in prop::collection::vec(any::<usize>(), 0..24),
            gap in 0i32..60,
        ) {
            let tree = build(&runs, &picks);
            let cfg = XgmlConfig { sibling_gap: gap, ..XgmlConfig::default() };
            let placed: Vec<(i32, i32)> = layout(&tree, &cfg).iter().map(|b| (b.x, b.y)).collect();
            prop_assert_eq!(placed, shifted_layout(&tree, &cfg));
        }
    }
}
