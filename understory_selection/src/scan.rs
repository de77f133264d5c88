// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Topology scanner: live element tree in, ordering tree and lookup table out.
//!
//! ## Marker protocol
//!
//! The scanner reads a small set of [`Markers`] from every element it visits:
//!
//! - an identity `key` makes the element a selectable item, one level deeper
//!   than the container it was found in;
//! - elements without a key are transparent wrappers ("skip-level"): their
//!   descendants land in the enclosing container as if the wrapper were absent;
//! - `row` closes a row: once the element's subtree has been scanned, later
//!   items in the same container start on the next row;
//! - manual `x`/`y` place an item at an explicit cell instead of the next free
//!   one, which supports virtualized lists whose document order differs from
//!   their logical order; values above [`ScanOptions::max_coordinate`] are
//!   ignored;
//! - `disabled` is recorded on the item's [`OrderingNode`];
//! - `container` marks the root of an independent navigation container, whose
//!   subtree is skipped unless [`ScanOptions::cross_container_boundaries`] is set.

use core::fmt::Debug;
use core::hash::Hash;

use crate::deep_index::{Coord, DeepIndex};
use crate::lookup::{LookupEntry, LookupTable};
use crate::ordering::OrderingNode;

/// Navigation markers carried by one element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Markers<K> {
    /// Identity of a selectable item.
    pub key: Option<K>,
    /// Manual column.
    pub x: Option<usize>,
    /// Manual row.
    pub y: Option<usize>,
    /// Item may not become the committed selection.
    pub disabled: bool,
    /// Element closes a row.
    pub row: bool,
    /// Element roots an independent navigation container.
    pub container: bool,
}

impl<K> Default for Markers<K> {
    fn default() -> Self {
        Self {
            key: None,
            x: None,
            y: None,
            disabled: false,
            row: false,
            container: false,
        }
    }
}

/// A read-only view of a live element tree.
///
/// Implement this for whatever tree your UI maintains. The
/// `element_tree_adapter` feature provides an implementation for
/// `understory_element_tree::Tree`.
pub trait ScanSource {
    /// Stable element handle.
    type Handle: Copy + Eq + Debug;
    /// Item identity.
    type Key: Clone + Eq + Hash + Debug;

    /// Returns true if `handle` refers to a live element.
    fn is_live(&self, handle: Self::Handle) -> bool;

    /// Children of `handle` in document order; empty for stale handles.
    fn children(&self, handle: Self::Handle) -> &[Self::Handle];

    /// Parent of `handle`, or `None` for roots and stale handles.
    fn parent(&self, handle: Self::Handle) -> Option<Self::Handle>;

    /// Navigation markers of `handle`.
    fn markers(&self, handle: Self::Handle) -> Markers<Self::Key>;

    /// Returns true if `ancestor` is a strict ancestor of `handle`.
    fn is_ancestor(&self, ancestor: Self::Handle, handle: Self::Handle) -> bool {
        let mut current = self.parent(handle);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.parent(p);
        }
        false
    }
}

/// Largest manual coordinate honored by default.
pub const DEFAULT_MAX_COORDINATE: usize = 1 << 16;

/// Scanner configuration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ScanOptions {
    /// Descend into subtrees marked as independent containers.
    pub cross_container_boundaries: bool,
    /// Largest manual `x` or `y` the scanner honors.
    ///
    /// Grids are dense, so a manual coordinate allocates every cell before
    /// it. A larger value is logged and the item falls back to its natural
    /// position.
    pub max_coordinate: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            cross_container_boundaries: false,
            max_coordinate: DEFAULT_MAX_COORDINATE,
        }
    }
}

/// Result of a scan.
#[derive(Clone, Debug)]
pub struct Scan<K, H> {
    /// Root of the discovered topology.
    pub ordering: OrderingNode<K>,
    /// Identity lookup for every discovered item.
    pub lookup: LookupTable<K, H>,
}

impl<K: Eq + Hash, H> Default for Scan<K, H> {
    fn default() -> Self {
        Self {
            ordering: OrderingNode::root(),
            lookup: LookupTable::new(),
        }
    }
}

/// Scan the descendants of `root` (not `root` itself) into a fresh ordering
/// tree and lookup table.
///
/// Duplicate identities resolve last-wins in the lookup table, in document
/// order, so a descendant beats an ancestor carrying the same identity. Two
/// items placed on the same cell resolve last-wins in the grid, and the
/// displaced item's subtree leaves the lookup table with it. Both are
/// reported through `tracing` and otherwise tolerated.
pub fn scan<S: ScanSource>(
    source: &S,
    root: S::Handle,
    options: ScanOptions,
) -> Scan<S::Key, S::Handle> {
    let mut scanner = Scanner {
        source,
        options,
        lookup: LookupTable::new(),
    };
    let mut ordering = OrderingNode::root();
    let mut row = 0;
    scanner.discover(&mut ordering, &DeepIndex::new(), &mut row, root);
    tracing::trace!(items = scanner.lookup.len(), "scanned ordering tree");
    Scan {
        ordering,
        lookup: scanner.lookup,
    }
}

struct Scanner<'a, S: ScanSource> {
    source: &'a S,
    options: ScanOptions,
    lookup: LookupTable<S::Key, S::Handle>,
}

impl<S: ScanSource> Scanner<'_, S> {
    /// Fill `group` from the children of `element`.
    ///
    /// `row` is the row counter of the container that owns `group`; wrappers
    /// share it so rows they close stay closed for later siblings.
    fn discover(
        &mut self,
        group: &mut OrderingNode<S::Key>,
        group_index: &DeepIndex,
        row: &mut usize,
        element: S::Handle,
    ) {
        let source = self.source;
        for &child in source.children(element) {
            let markers = source.markers(child);
            if markers.container && !self.options.cross_container_boundaries {
                continue;
            }

            match markers.key {
                Some(key) => {
                    let y = self.manual(markers.y, &key, "y").unwrap_or(*row);
                    group.children.ensure_row(y);
                    let x = self
                        .manual(markers.x, &key, "x")
                        .unwrap_or_else(|| group.children.row_len(y));
                    let coord = Coord::new(x, y);
                    let index = group_index.child(coord);

                    if let Some(displaced) = group.children.take(coord) {
                        tracing::debug!(
                            ?key,
                            displaced = ?displaced.key,
                            %index,
                            "two items share a cell; the later item wins"
                        );
                        self.lookup.forget(&displaced, &index);
                    }

                    let entry = LookupEntry {
                        handle: child,
                        index: index.clone(),
                    };
                    if let Some(previous) = self.lookup.insert(key.clone(), entry) {
                        tracing::warn!(
                            ?key,
                            %index,
                            previous = %previous.index,
                            "duplicate item identity; the later item wins"
                        );
                    }

                    let mut node = OrderingNode::item(key);
                    node.disabled = markers.disabled;
                    let mut inner_row = 0;
                    self.discover(&mut node, &index, &mut inner_row, child);
                    group.children.place(coord, node);
                }
                None => self.discover(group, group_index, row, child),
            }

            if markers.row {
                *row += 1;
            }
        }
    }

    fn manual(&self, value: Option<usize>, key: &S::Key, axis: &'static str) -> Option<usize> {
        let value = value?;
        if value > self.options.max_coordinate {
            tracing::warn!(
                ?key,
                axis,
                value,
                max = self.options.max_coordinate,
                "manual coordinate out of range; using the natural position"
            );
            return None;
        }
        Some(value)
    }
}
