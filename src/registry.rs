//! Version registry: an append-only history of roots indexed by version.
//!
//! Grounded on `original_source/App/Sources/CoreLib/RBTree.h`'s
//! `m_RootHistory` (`std::vector<std::shared_ptr<Node>>`) and
//! `m_CurrentVersion`. `roots[0]` is always the empty tree; `rewind` only
//! moves the cursor, it never truncates the vector, so a rolled-back future
//! is merely shadowed until the next mutation overwrites it.

use crate::error::Error;
use crate::node::Link;

pub(crate) struct VersionRegistry<K, V> {
    roots: Vec<Link<K, V>>,
    current: u64,
}

impl<K, V> VersionRegistry<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            roots: vec![None],
            current: 0,
        }
    }

    pub(crate) fn version(&self) -> u64 {
        self.current
    }

    /// Advances the cursor and clears whatever (possibly rolled-back) root
    /// used to occupy the new current slot, per `ClearCurrentVersion`.
    pub(crate) fn reserve_next_slot(&mut self) -> u64 {
        self.current += 1;
        let idx = self.current as usize;
        match self.roots.len().cmp(&idx) {
            std::cmp::Ordering::Greater => self.roots[idx] = None,
            std::cmp::Ordering::Equal => self.roots.push(None),
            std::cmp::Ordering::Less => {
                unreachable!("no gap may exist between current version and root history length")
            }
        }
        self.current
    }

    pub(crate) fn current_root(&self) -> &Link<K, V> {
        &self.roots[self.current as usize]
    }

    pub(crate) fn current_root_mut(&mut self) -> &mut Link<K, V> {
        &mut self.roots[self.current as usize]
    }

    /// The root as of the version just before the one reserved by the call
    /// in progress; only valid to call after `reserve_next_slot`.
    pub(crate) fn previous_root(&self) -> &Link<K, V> {
        debug_assert!(self.current >= 1, "no mutation is in progress");
        &self.roots[(self.current - 1) as usize]
    }

    pub(crate) fn rewind(&mut self, delta: u64) -> Result<(), Error> {
        if delta == 0 || delta > self.current {
            return Err(Error::InvalidRewind {
                delta,
                current: self.current,
            });
        }
        self.current -= delta;
        Ok(())
    }
}
