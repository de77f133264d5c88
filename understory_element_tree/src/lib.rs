// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_element_tree --heading-base-level=0

//! Understory Element Tree: a live tree of marked interactive elements.
//!
//! This crate is the host-side half of keyboard selection navigation. It models the
//! markup a UI renders (buttons, options, grid cells, tree nodes, and the plain wrappers
//! around them) as a generational tree, and records every change as it happens so that
//! observers can rescan in one batch.
//!
//! - Represents a hierarchy of [`Element`]s, each optionally carrying navigation markers:
//!   an identity key, manual `x`/`y` coordinates, and [`ElementFlags`] for disabled items,
//!   row boundaries, and independent container boundaries.
//! - Supports structural edits (insert, insert-before, remove, reparent, reorder) and marker
//!   edits, each of which queues a [`MutationRecord`].
//! - Delivers queued records through [`Tree::commit`] as one coalesced [`Mutations`] batch.
//!
//! ## Not a renderer
//!
//! Elements carry no geometry and no paint data. The tree only knows what a navigation
//! scanner needs: document order, nesting, and markers. Upstream code mirrors its widget or
//! DOM structure into this tree and forwards commit batches to whoever observes it (for
//! example a selection session from `understory_selection`).
//!
//! ## API overview
//!
//! - [`Tree`]: container managing elements and pending mutation records.
//! - [`Element`]: per-element marker data.
//! - [`ElementFlags`]: disabled / row / container markers.
//! - [`ElementId`]: generational handle of an element.
//! - [`Mutations`] / [`MutationRecord`] / [`MutationKind`] / [`Attribute`]: commit output.
//!
//! Key operations:
//! - [`Tree::insert`] / [`Tree::insert_before`] → [`ElementId`]
//! - [`Tree::remove`], [`Tree::reparent`], [`Tree::move_before`]
//! - [`Tree::set_key`], [`Tree::set_x`], [`Tree::set_y`], [`Tree::set_flags`],
//!   [`Tree::set_disabled`]
//! - [`Tree::commit`] → [`Mutations`]
//! - [`Tree::children_of`], [`Tree::parent_of`], [`Tree::is_ancestor`],
//!   [`Tree::next_depth_first`]
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod mutation;
mod tree;
mod types;

pub use mutation::{MutationKind, MutationRecord, Mutations};
pub use tree::Tree;
pub use types::{Attribute, Element, ElementFlags, ElementId};
