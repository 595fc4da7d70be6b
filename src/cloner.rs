//! Path building and cloning primitives.
//!
//! `original_source/App/Sources/CoreLib/RBTree.inl`'s `ClonePath` walks down
//! from the root (or from an arbitrary subtree root, in its two-argument
//! overload), cloning every node it passes through so the caller can mutate
//! the spine in place before publishing it. In safe Rust, a raw pointer spine
//! shared between a `Vec<Node*>` and a live tree isn't available to us, so
//! the clone-as-you-descend behavior is realized instead as recursion:
//! `insert`/`delete` (see `crate::tree` and `crate::balance`) walk the tree
//! top-down via ordinary call frames, and every frame that needs to change
//! something reconstructs its node through [`new_node`] rather than mutating
//! shared state. This module holds the two primitives that do that
//! reconstruction, equivalent to `RBNode::Clone` plus the version stamp
//! written at every field write.

use std::sync::Arc;

use crate::node::{Color, Link, Node};
use crate::stats::MutationStats;

/// Allocates a fresh node stamped with `version`, counting the allocation.
///
/// Every node that exists in a published tree was built by this function (or
/// is shared unchanged from an older version); there is no other way to
/// construct a [`Node`] in this crate.
pub(crate) fn new_node<K, V>(
    color: Color,
    left: Link<K, V>,
    key: K,
    value: V,
    right: Link<K, V>,
    version: u64,
    stats: &mut MutationStats,
) -> Arc<Node<K, V>> {
    stats.record_allocation();
    Arc::new(Node {
        key,
        value,
        color,
        left,
        right,
        create_version: version,
    })
}

/// Ensures a link's root is black, cloning only if it is currently red.
///
/// Used both to force a tree's root black after a mutation and, during
/// delete-fixup, to repaint a lone red child black when it replaces a
/// removed black node (`original_source`'s `DeleteFixup` does the same thing
/// via `SetColor` once the fixup loop terminates).
pub(crate) fn paint_black<K: Clone, V: Clone>(
    link: Link<K, V>,
    version: u64,
    stats: &mut MutationStats,
) -> Link<K, V> {
    link.map(|node| {
        if node.color == Color::Black {
            node
        } else {
            new_node(
                Color::Black,
                node.left.clone(),
                node.key.clone(),
                node.value.clone(),
                node.right.clone(),
                version,
                stats,
            )
        }
    })
}
