//! The map facade: `PersistentMap<K, V>`, a partially-persistent red-black
//! tree supporting point mutation, point/range-free queries, and rewinding
//! to an earlier version.
//!
//! Grounded on `original_source/App/Sources/CoreLib/RBTree.h`/`.inl`'s
//! `ps::RBTree<TKey, TValue>`: the same five operations (`Insert`, `Delete`,
//! `Search`, `GetMin`, `GetMax`) plus `Rollback`, the same invariants, the
//! same O(log n) fresh-allocation bound per mutation. The recursive descent
//! in [`insert_into`] and [`remove_from`] plays the role of `ClonePath`
//! (see `crate::cloner`); [`crate::balance`] plays the role of
//! `InsertFixup`/`DeleteFixup`.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::balance::{balance, rebalance_left, rebalance_right};
use crate::cloner::{new_node, paint_black};
use crate::error::Error;
use crate::node::{Color, Link, Node};
use crate::registry::VersionRegistry;
use crate::stats::MutationStats;

/// A partially-persistent ordered map, implemented as a red-black tree with
/// path copying.
///
/// Every mutation produces a new version without disturbing any version a
/// caller still wants to view (see [`PersistentMap::rewind`]); see the
/// crate-level docs for the full model.
pub struct PersistentMap<K, V> {
    registry: VersionRegistry<K, V>,
    last_mutation: MutationStats,
}

impl<K, V> PersistentMap<K, V> {
    /// Creates an empty map at version 0.
    pub fn new() -> Self {
        Self {
            registry: VersionRegistry::new(),
            last_mutation: MutationStats::default(),
        }
    }

    /// The version the map is currently viewing.
    pub fn version(&self) -> u64 {
        self.registry.version()
    }

    /// Rolls the current view back by `delta` versions.
    ///
    /// `delta` must be at least 1 and at most the current version; the next
    /// mutation after a rewind overwrites whatever used to occupy the
    /// shadowed future versions.
    pub fn rewind(&mut self, delta: u64) -> Result<(), Error> {
        self.registry.rewind(delta)
    }

    /// Allocation count for the most recent `insert`/`delete` call.
    pub fn last_mutation_allocations(&self) -> usize {
        self.last_mutation.allocations()
    }
}

impl<K, V> Default for PersistentMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> PersistentMap<K, V> {
    /// Checks the in-order key sequence of the current version is strictly
    /// increasing, mirroring `original_source`'s `DEBUG_CheckIfSorted`.
    pub fn debug_check_sorted(&self) -> bool {
        let mut last: Option<&K> = None;
        let mut ok = true;
        walk_in_order(self.registry.current_root(), &mut |k, _| {
            if let Some(prev) = last {
                if prev >= k {
                    ok = false;
                }
            }
            last = Some(k);
        });
        ok
    }

    /// Checks the current version satisfies every red-black invariant,
    /// mirroring `original_source`'s `DEBUG_CheckIfRB`.
    pub fn debug_check_red_black(&self) -> bool {
        debug_black_height(self.registry.current_root()).is_ok()
    }

    /// Looks up `key` in the current version.
    pub fn search(&self, key: &K) -> Option<&V> {
        search_in(self.registry.current_root(), key)
    }

    /// The smallest key in the current version, and its value.
    pub fn min(&self) -> Option<(&K, &V)> {
        let mut node = self.registry.current_root().as_ref()?;
        while let Some(left) = &node.left {
            node = left;
        }
        Some((&node.key, &node.value))
    }

    /// The largest key in the current version, and its value.
    pub fn max(&self) -> Option<(&K, &V)> {
        let mut node = self.registry.current_root().as_ref()?;
        while let Some(right) = &node.right {
            node = right;
        }
        Some((&node.key, &node.value))
    }
}

fn walk_in_order<'a, K, V>(link: &'a Link<K, V>, visit: &mut impl FnMut(&'a K, &'a V)) {
    if let Some(node) = link {
        walk_in_order(&node.left, visit);
        visit(&node.key, &node.value);
        walk_in_order(&node.right, visit);
    }
}

/// Checks every path from a subtree's root to a nil child carries the same
/// number of black nodes and that no red node has a red child.
fn debug_black_height<K, V>(link: &Link<K, V>) -> Result<usize, &'static str> {
    match link {
        None => Ok(1),
        Some(node) => {
            if node.is_red() && (crate::node::is_red(&node.left) || crate::node::is_red(&node.right)) {
                return Err("red node has a red child");
            }
            let left = debug_black_height(&node.left)?;
            let right = debug_black_height(&node.right)?;
            if left != right {
                return Err("unequal black heights");
            }
            Ok(left + if node.is_red() { 0 } else { 1 })
        }
    }
}

impl<K: Ord + Clone, V: Default + Clone> PersistentMap<K, V> {
    /// Inserts `key` if absent (with `V::default()`) and returns a handle to
    /// its value in the new version, leaving an existing value untouched.
    ///
    /// Always advances the version by one, even when `key` was already
    /// present, mirroring `original_source`'s `Insert`, which always builds
    /// a fresh path before returning the (possibly pre-existing) node.
    pub fn insert(&mut self, key: K) -> &mut V {
        self.registry.reserve_next_slot();
        let version = self.registry.version();
        let previous = self.registry.previous_root().clone();
        let mut stats = MutationStats::default();
        let mut new_root = Some(insert_into(&previous, &key, version, &mut stats));
        force_black_root(&mut new_root, version, &mut stats);
        *self.registry.current_root_mut() = new_root;
        self.last_mutation = stats;
        value_mut_after_insert(self.registry.current_root_mut(), &key)
    }
}

impl<K: Ord + Clone, V: Clone> PersistentMap<K, V> {
    /// Removes `key`, advancing the version only if it was present.
    pub fn delete(&mut self, key: &K) -> bool {
        let current = self.registry.current_root().clone();
        if search_in(&current, key).is_none() {
            return false;
        }
        self.registry.reserve_next_slot();
        let version = self.registry.version();
        let mut stats = MutationStats::default();
        let (mut new_root, _old_value, _shrunk) =
            remove_from(&current, key, version, &mut stats).expect("key presence was just checked");
        force_black_root(&mut new_root, version, &mut stats);
        *self.registry.current_root_mut() = new_root;
        self.last_mutation = stats;
        true
    }
}

fn search_in<'a, K: Ord, V>(link: &'a Link<K, V>, key: &K) -> Option<&'a V> {
    let mut node = link.as_ref()?;
    loop {
        match key.cmp(&node.key) {
            Ordering::Equal => return Some(&node.value),
            Ordering::Less => node = node.left.as_ref()?,
            Ordering::Greater => node = node.right.as_ref()?,
        }
    }
}

fn force_black_root<K: Clone, V: Clone>(root: &mut Link<K, V>, version: u64, stats: &mut MutationStats) {
    if let Some(node) = root.take() {
        *root = Some(if node.is_red() {
            new_node(
                Color::Black,
                node.left.clone(),
                node.key.clone(),
                node.value.clone(),
                node.right.clone(),
                version,
                stats,
            )
        } else {
            node
        });
    }
}

/// Walks the path `insert` just built, returning a mutable reference into
/// the exclusively-owned spine it allocated.
fn value_mut_after_insert<'a, K: Ord, V>(mut slot: &'a mut Link<K, V>, key: &K) -> &'a mut V {
    loop {
        let arc = slot.as_mut().expect("insert must have created a node for key");
        let node = Arc::get_mut(arc).expect("every node on the just-inserted path is uniquely owned");
        match key.cmp(&node.key) {
            Ordering::Equal => return &mut node.value,
            Ordering::Less => slot = &mut node.left,
            Ordering::Greater => slot = &mut node.right,
        }
    }
}

fn insert_into<K: Ord + Clone, V: Default + Clone>(
    link: &Link<K, V>,
    key: &K,
    version: u64,
    stats: &mut MutationStats,
) -> Arc<Node<K, V>> {
    match link {
        None => new_node(Color::Red, None, key.clone(), V::default(), None, version, stats),
        Some(node) => match key.cmp(&node.key) {
            Ordering::Equal => new_node(
                node.color,
                node.left.clone(),
                key.clone(),
                node.value.clone(),
                node.right.clone(),
                version,
                stats,
            ),
            Ordering::Less => {
                let new_left = insert_into(&node.left, key, version, stats);
                balance(
                    node.color,
                    Some(new_left),
                    node.key.clone(),
                    node.value.clone(),
                    node.right.clone(),
                    version,
                    stats,
                )
            }
            Ordering::Greater => {
                let new_right = insert_into(&node.right, key, version, stats);
                balance(
                    node.color,
                    node.left.clone(),
                    node.key.clone(),
                    node.value.clone(),
                    Some(new_right),
                    version,
                    stats,
                )
            }
        },
    }
}

/// Returns the rebuilt subtree, the removed value, and whether the subtree
/// lost a black node (needing the caller to run delete-fixup), or `None` if
/// `key` wasn't found.
fn remove_from<K: Ord + Clone, V: Clone>(
    link: &Link<K, V>,
    key: &K,
    version: u64,
    stats: &mut MutationStats,
) -> Option<(Link<K, V>, V, bool)> {
    let node = link.as_ref()?;
    match key.cmp(&node.key) {
        Ordering::Less => {
            let (new_left, old_value, shrunk) = remove_from(&node.left, key, version, stats)?;
            if !shrunk {
                let rebuilt = new_node(
                    node.color,
                    new_left,
                    node.key.clone(),
                    node.value.clone(),
                    node.right.clone(),
                    version,
                    stats,
                );
                Some((Some(rebuilt), old_value, false))
            } else {
                let sibling = node
                    .right
                    .clone()
                    .expect("a sibling must exist opposite a deficient child");
                let (fixed, shrunk2) = rebalance_left(
                    new_left,
                    node.key.clone(),
                    node.value.clone(),
                    sibling,
                    node.color,
                    version,
                    stats,
                );
                Some((Some(fixed), old_value, shrunk2))
            }
        }
        Ordering::Greater => {
            let (new_right, old_value, shrunk) = remove_from(&node.right, key, version, stats)?;
            if !shrunk {
                let rebuilt = new_node(
                    node.color,
                    node.left.clone(),
                    node.key.clone(),
                    node.value.clone(),
                    new_right,
                    version,
                    stats,
                );
                Some((Some(rebuilt), old_value, false))
            } else {
                let sibling = node
                    .left
                    .clone()
                    .expect("a sibling must exist opposite a deficient child");
                let (fixed, shrunk2) = rebalance_right(
                    sibling,
                    node.key.clone(),
                    node.value.clone(),
                    new_right,
                    node.color,
                    version,
                    stats,
                );
                Some((Some(fixed), old_value, shrunk2))
            }
        }
        Ordering::Equal => {
            let old_value = node.value.clone();
            match (&node.left, &node.right) {
                (Some(_), Some(right)) => {
                    let (new_right, succ_key, succ_value, shrunk) =
                        remove_min(right.clone(), version, stats);
                    if !shrunk {
                        let rebuilt = new_node(
                            node.color,
                            node.left.clone(),
                            succ_key,
                            succ_value,
                            new_right,
                            version,
                            stats,
                        );
                        Some((Some(rebuilt), old_value, false))
                    } else {
                        let sibling = node.left.clone().expect("two-child case has a left sibling");
                        let (fixed, shrunk2) = rebalance_right(
                            sibling, succ_key, succ_value, new_right, node.color, version, stats,
                        );
                        Some((Some(fixed), old_value, shrunk2))
                    }
                }
                _ => {
                    let (replacement, shrunk) = splice(node, version, stats);
                    Some((replacement, old_value, shrunk))
                }
            }
        }
    }
}

/// Removes the minimum of `link` (which must be non-empty), returning the
/// rebuilt subtree, the removed key/value, and whether it shrank.
fn remove_min<K: Clone, V: Clone>(
    link: Arc<Node<K, V>>,
    version: u64,
    stats: &mut MutationStats,
) -> (Link<K, V>, K, V, bool) {
    if link.left.is_none() {
        let key = link.key.clone();
        let value = link.value.clone();
        let (replacement, shrunk) = splice(&link, version, stats);
        return (replacement, key, value, shrunk);
    }
    let left = link.left.clone().expect("checked link.left.is_some() above");
    let (new_left, min_key, min_value, shrunk) = remove_min(left, version, stats);
    if !shrunk {
        let rebuilt = new_node(
            link.color,
            new_left,
            link.key.clone(),
            link.value.clone(),
            link.right.clone(),
            version,
            stats,
        );
        (Some(rebuilt), min_key, min_value, false)
    } else {
        let sibling = link.right.clone().expect("a sibling must exist opposite a deficient child");
        let (fixed, shrunk2) = rebalance_left(
            new_left,
            link.key.clone(),
            link.value.clone(),
            sibling,
            link.color,
            version,
            stats,
        );
        (Some(fixed), min_key, min_value, shrunk2)
    }
}

/// Splices out a node with zero or one children, returning the replacement
/// subtree (the lone child, repainted black, or `None`) and whether the
/// removal shrank the black-height of this position.
fn splice<K: Clone, V: Clone>(
    node: &Arc<Node<K, V>>,
    version: u64,
    stats: &mut MutationStats,
) -> (Link<K, V>, bool) {
    match (&node.left, &node.right) {
        (None, None) => (None, !node.is_red()),
        (None, Some(_)) => (paint_black(node.right.clone(), version, stats), false),
        (Some(_), None) => (paint_black(node.left.clone(), version, stats), false),
        (Some(_), Some(_)) => unreachable!("splice is only called with at most one child"),
    }
}
