// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Identity lookup built alongside an ordering tree.

use core::hash::Hash;

use hashbrown::{Equivalent, HashMap};

use crate::deep_index::DeepIndex;
use crate::ordering::OrderingNode;

/// Where a scanned item lives: its element handle and its coordinate path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LookupEntry<H> {
    /// Handle of the element that carried the identity marker.
    pub handle: H,
    /// Path of the item in the ordering tree.
    pub index: DeepIndex,
}

/// Map from item identity to [`LookupEntry`].
///
/// Owned by a single scan result and replaced wholesale on every rescan; it
/// is never patched in place.
#[derive(Clone, Debug)]
pub struct LookupTable<K, H> {
    entries: HashMap<K, LookupEntry<H>>,
}

impl<K, H> Default for LookupTable<K, H> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash, H> LookupTable<K, H> {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct identities.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no identity was discovered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entry for `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&LookupEntry<H>>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.entries.get(key)
    }

    /// Returns true if `key` was discovered.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.entries.contains_key(key)
    }

    /// Coordinate path of `key`.
    pub fn index_of<Q>(&self, key: &Q) -> Option<&DeepIndex>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.get(key).map(|e| &e.index)
    }

    /// Iterate identities and their entries in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &LookupEntry<H>)> + '_ {
        self.entries.iter()
    }

    /// Iterate identities in unspecified order.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.entries.keys()
    }

    /// Insert an entry, returning the one it replaced.
    pub(crate) fn insert(&mut self, key: K, entry: LookupEntry<H>) -> Option<LookupEntry<H>> {
        self.entries.insert(key, entry)
    }

    /// Drop the entries of `node` and its descendants, rooted at `index`,
    /// that still point into that subtree.
    ///
    /// Entries that a later duplicate already moved elsewhere are kept.
    pub(crate) fn forget(&mut self, node: &OrderingNode<K>, index: &DeepIndex) {
        if let Some(key) = &node.key
            && self.index_of(key) == Some(index)
        {
            self.entries.remove(key);
        }
        for (coord, child) in node.children.iter() {
            self.forget(child, &index.child(coord));
        }
    }
}

impl<K: Eq + Hash, H: Copy> LookupTable<K, H> {
    /// Element handle of `key`.
    pub fn handle_of<Q>(&self, key: &Q) -> Option<H>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.get(key).map(|e| e.handle)
    }
}
