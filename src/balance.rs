//! Rotations and the insert/delete fixup rules.
//!
//! The four insert-fixup cases and the four delete-fixup cases are the ones
//! described in `original_source/App/Sources/CoreLib/RBTree.inl`'s
//! `InsertFixup`/`DeleteFixup`, which track an explicit parent-pointer stack
//! and mutate shared nodes through it. That bookkeeping assumes aliased
//! mutable access to nodes that, in this crate, are shared via `Arc` and
//! never mutated in place. The fixups are realized here the way recursive,
//! persistent red-black trees normally are (see e.g. Okasaki's *Red-Black
//! Trees in a Functional Setting*): [`balance`] collapses InsertFixup's three
//! cases into one reconstruction performed on the way back up the call stack
//! in `crate::tree::insert_into`, and [`rebalance_left`]/[`rebalance_right`]
//! do the same for DeleteFixup's four cases on the way back up
//! `crate::tree::remove_from`. Both produce the same recolorings and
//! rotations as the reference algorithm; they just discover where to apply
//! them via recursion instead of an explicit stack.

use std::sync::Arc;

use crate::cloner::{new_node, paint_black};
use crate::node::{is_red, Color, Link, Node};
use crate::stats::MutationStats;

/// Rebuilds a subtree from its pieces, rotating and recoloring away any
/// red-red violation introduced by the most recent insert below it.
///
/// `color`/`left`/`key`/`value`/`right` are exactly what a plain
/// reconstruction of the subtree root would use; if they describe a black
/// node with a red child that itself has a red child, the equivalent of
/// InsertFixup's cases 1-3 is applied instead of a plain allocation.
pub(crate) fn balance<K: Clone, V: Clone>(
    color: Color,
    left: Link<K, V>,
    key: K,
    value: V,
    right: Link<K, V>,
    version: u64,
    stats: &mut MutationStats,
) -> Arc<Node<K, V>> {
    if color == Color::Black {
        if let Some(l) = left.as_ref().filter(|l| l.is_red()) {
            if let Some(ll) = l.left.as_ref().filter(|n| n.is_red()) {
                return new_red(
                    new_node(
                        Color::Black,
                        ll.left.clone(),
                        ll.key.clone(),
                        ll.value.clone(),
                        ll.right.clone(),
                        version,
                        stats,
                    ),
                    l.key.clone(),
                    l.value.clone(),
                    new_node(Color::Black, l.right.clone(), key, value, right, version, stats),
                    version,
                    stats,
                );
            }
            if let Some(lr) = l.right.as_ref().filter(|n| n.is_red()) {
                return new_red(
                    new_node(
                        Color::Black,
                        l.left.clone(),
                        l.key.clone(),
                        l.value.clone(),
                        lr.left.clone(),
                        version,
                        stats,
                    ),
                    lr.key.clone(),
                    lr.value.clone(),
                    new_node(Color::Black, lr.right.clone(), key, value, right, version, stats),
                    version,
                    stats,
                );
            }
        }
        if let Some(r) = right.as_ref().filter(|r| r.is_red()) {
            if let Some(rl) = r.left.as_ref().filter(|n| n.is_red()) {
                return new_red(
                    new_node(Color::Black, left, key, value, rl.left.clone(), version, stats),
                    rl.key.clone(),
                    rl.value.clone(),
                    new_node(
                        Color::Black,
                        rl.right.clone(),
                        r.key.clone(),
                        r.value.clone(),
                        r.right.clone(),
                        version,
                        stats,
                    ),
                    version,
                    stats,
                );
            }
            if let Some(rr) = r.right.as_ref().filter(|n| n.is_red()) {
                return new_red(
                    new_node(Color::Black, left, key, value, r.left.clone(), version, stats),
                    r.key.clone(),
                    r.value.clone(),
                    new_node(
                        Color::Black,
                        rr.left.clone(),
                        rr.key.clone(),
                        rr.value.clone(),
                        rr.right.clone(),
                        version,
                        stats,
                    ),
                    version,
                    stats,
                );
            }
        }
    }
    new_node(color, left, key, value, right, version, stats)
}

fn new_red<K, V>(
    left: Arc<Node<K, V>>,
    key: K,
    value: V,
    right: Arc<Node<K, V>>,
    version: u64,
    stats: &mut MutationStats,
) -> Arc<Node<K, V>> {
    new_node(Color::Red, Some(left), key, value, Some(right), version, stats)
}

/// DeleteFixup for a deficiency in the left subtree: `x` is the (possibly
/// absent) left child that just lost one black node on every path beneath
/// it, `w` is its sibling (the unchanged right child), and `parent_color` is
/// the color the reconstructed node would have had before fixup.
///
/// Returns the rebuilt subtree root and whether *it* is now deficient by one
/// black node (only `case2` with a black parent propagates the deficiency
/// upward; every other case absorbs it).
pub(crate) fn rebalance_left<K: Ord + Clone, V: Clone>(
    x: Link<K, V>,
    key: K,
    value: V,
    w: Arc<Node<K, V>>,
    parent_color: Color,
    version: u64,
    stats: &mut MutationStats,
) -> (Arc<Node<K, V>>, bool) {
    if w.is_red() {
        // Case 1: rotate left around the parent, then resolve the
        // now-black-sibling cases below, which always terminate.
        let w_left = w
            .left
            .clone()
            .expect("a red sibling's children are black and non-nil to balance black-height");
        let (inner, _) = rebalance_left_black_sibling(
            x,
            key,
            value,
            w_left.clone(),
            Color::Red,
            version,
            stats,
        );
        let top = new_node(
            Color::Black,
            Some(inner),
            w.key.clone(),
            w.value.clone(),
            w.right.clone(),
            version,
            stats,
        );
        return (top, false);
    }
    rebalance_left_black_sibling(x, key, value, w, parent_color, version, stats)
}

fn rebalance_left_black_sibling<K: Ord + Clone, V: Clone>(
    x: Link<K, V>,
    key: K,
    value: V,
    w: Arc<Node<K, V>>,
    parent_color: Color,
    version: u64,
    stats: &mut MutationStats,
) -> (Arc<Node<K, V>>, bool) {
    if !is_red(&w.left) && !is_red(&w.right) {
        // Case 2: no red nephew on either side; recolor the sibling red and
        // let the deficiency propagate to the parent unless the parent can
        // absorb it by turning black itself.
        let new_w = new_node(
            Color::Red,
            w.left.clone(),
            w.key.clone(),
            w.value.clone(),
            w.right.clone(),
            version,
            stats,
        );
        // Either way the reconstructed node ends up black: a red parent
        // absorbs the deficiency by turning black, a black parent stays
        // black but passes the deficiency up (`shrunk = true`).
        let node = new_node(Color::Black, x, key, value, Some(new_w), version, stats);
        return (node, parent_color == Color::Black);
    }
    if !is_red(&w.right) {
        // Case 3: near nephew (w.left) red, far nephew black; rotate right
        // around the sibling so the red nephew becomes the new sibling's
        // right child, then fall into case 4.
        let w_left = w.left.clone().expect("case 3 requires a red left nephew");
        let new_sibling_right = new_node(
            Color::Red,
            w_left.right.clone(),
            w.key.clone(),
            w.value.clone(),
            w.right.clone(),
            version,
            stats,
        );
        let new_sibling = new_node(
            Color::Black,
            w_left.left.clone(),
            w_left.key.clone(),
            w_left.value.clone(),
            Some(new_sibling_right),
            version,
            stats,
        );
        return rebalance_left_case4(x, key, value, new_sibling, parent_color, version, stats);
    }
    rebalance_left_case4(x, key, value, w, parent_color, version, stats)
}

fn rebalance_left_case4<K: Clone, V: Clone>(
    x: Link<K, V>,
    key: K,
    value: V,
    w: Arc<Node<K, V>>,
    parent_color: Color,
    version: u64,
    stats: &mut MutationStats,
) -> (Arc<Node<K, V>>, bool) {
    let new_parent = new_node(Color::Black, x, key, value, w.left.clone(), version, stats);
    let new_w_right = paint_black(w.right.clone(), version, stats)
        .expect("case 4 requires a red right nephew");
    let top = new_node(
        parent_color,
        Some(new_parent),
        w.key.clone(),
        w.value.clone(),
        Some(new_w_right),
        version,
        stats,
    );
    (top, false)
}

/// Mirror image of [`rebalance_left`] for a deficiency in the right subtree.
pub(crate) fn rebalance_right<K: Ord + Clone, V: Clone>(
    w: Arc<Node<K, V>>,
    key: K,
    value: V,
    x: Link<K, V>,
    parent_color: Color,
    version: u64,
    stats: &mut MutationStats,
) -> (Arc<Node<K, V>>, bool) {
    if w.is_red() {
        let w_right = w
            .right
            .clone()
            .expect("a red sibling's children are black and non-nil to balance black-height");
        let (inner, _) = rebalance_right_black_sibling(
            w_right.clone(),
            key,
            value,
            x,
            Color::Red,
            version,
            stats,
        );
        let top = new_node(
            Color::Black,
            w.left.clone(),
            w.key.clone(),
            w.value.clone(),
            Some(inner),
            version,
            stats,
        );
        return (top, false);
    }
    rebalance_right_black_sibling(w, key, value, x, parent_color, version, stats)
}

fn rebalance_right_black_sibling<K: Ord + Clone, V: Clone>(
    w: Arc<Node<K, V>>,
    key: K,
    value: V,
    x: Link<K, V>,
    parent_color: Color,
    version: u64,
    stats: &mut MutationStats,
) -> (Arc<Node<K, V>>, bool) {
    if !is_red(&w.left) && !is_red(&w.right) {
        let new_w = new_node(
            Color::Red,
            w.left.clone(),
            w.key.clone(),
            w.value.clone(),
            w.right.clone(),
            version,
            stats,
        );
        let node = new_node(Color::Black, Some(new_w), key, value, x, version, stats);
        return (node, parent_color == Color::Black);
    }
    if !is_red(&w.left) {
        let w_right = w.right.clone().expect("case 3 requires a red right nephew");
        let new_sibling_left = new_node(
            Color::Red,
            w.left.clone(),
            w.key.clone(),
            w.value.clone(),
            w_right.left.clone(),
            version,
            stats,
        );
        let new_sibling = new_node(
            Color::Black,
            Some(new_sibling_left),
            w_right.key.clone(),
            w_right.value.clone(),
            w_right.right.clone(),
            version,
            stats,
        );
        return rebalance_right_case4(new_sibling, key, value, x, parent_color, version, stats);
    }
    rebalance_right_case4(w, key, value, x, parent_color, version, stats)
}

fn rebalance_right_case4<K: Clone, V: Clone>(
    w: Arc<Node<K, V>>,
    key: K,
    value: V,
    x: Link<K, V>,
    parent_color: Color,
    version: u64,
    stats: &mut MutationStats,
) -> (Arc<Node<K, V>>, bool) {
    let new_parent = new_node(Color::Black, w.right.clone(), key, value, x, version, stats);
    let new_w_left =
        paint_black(w.left.clone(), version, stats).expect("case 4 requires a red left nephew");
    let top = new_node(
        parent_color,
        Some(new_w_left),
        w.key.clone(),
        w.value.clone(),
        Some(new_parent),
        version,
        stats,
    );
    (top, false)
}
