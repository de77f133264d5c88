// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mutation records returned from commit.

use alloc::vec::Vec;

use crate::types::{Attribute, ElementId};

/// What changed about a mutation target.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MutationKind {
    /// The target's list of children changed (insert, remove, reorder, reparent).
    ChildList,
    /// One attribute of the target changed.
    Attribute(Attribute),
}

/// A single recorded change.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct MutationRecord {
    /// The element whose children or attributes changed.
    ///
    /// For removals this is the former parent, which outlives the removed subtree.
    pub target: ElementId,
    /// The kind of change.
    pub kind: MutationKind,
}

/// A batched set of changes derived from [`crate::Tree::commit`].
///
/// Records are coalesced: a target/kind pair appears at most once, in the
/// order it was first recorded.
#[derive(Clone, Debug, Default)]
pub struct Mutations {
    /// Commit epoch that produced this batch.
    pub epoch: u64,
    /// Coalesced records.
    pub records: Vec<MutationRecord>,
}

impl Mutations {
    /// Returns true if nothing changed since the previous commit.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of coalesced records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Iterate the coalesced records.
    pub fn iter(&self) -> impl Iterator<Item = &MutationRecord> + '_ {
        self.records.iter()
    }

    pub(crate) fn push(&mut self, record: MutationRecord) {
        if !self.records.contains(&record) {
            self.records.push(record);
        }
    }
}

impl<'a> IntoIterator for &'a Mutations {
    type Item = &'a MutationRecord;
    type IntoIter = core::slice::Iter<'a, MutationRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
