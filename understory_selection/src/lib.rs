// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_selection --heading-base-level=0

//! Understory Selection: keyboard selection navigation over nested groups, rows, and grids.
//!
//! ## Overview
//!
//! Interactive elements (buttons, options, grid cells, tree nodes) are often nested in groups,
//! rows, and sub-groups, with plenty of layout-only wrappers in between. This crate discovers
//! the logical navigation topology from such a tree, tracks the current position as a
//! coordinate path through it, and computes new positions for directional commands.
//!
//! The engine is split in three layers:
//!
//! - [`scan`]: walks a live tree through the [`ScanSource`] trait and produces an
//!   [`OrderingNode`] tree plus a [`LookupTable`] from item identity to path and element.
//! - [`deep_index`]: pure functions over [`DeepIndex`] paths: resolve, offset (with optional
//!   wrap), up, down, and repair via [`closest_valid`](deep_index::closest_valid).
//! - [`Session`]: owns one navigation root, rescans on relevant [`Change`]s, repairs the path,
//!   and reports [`Move`]s.
//!
//! ## Topology
//!
//! Every level of the ordering tree is a [`Grid`] of rows. A flat list is a single row; rows
//! come from elements carrying the row marker; manual `x`/`y` coordinates place items at an
//! explicit cell. Elements without an identity are transparent: they never add a level.
//!
//! ## Keys
//!
//! [`actions::Preset`] maps arrow keys, enter, space, and escape to an [`Action`] for common
//! layouts; [`Session::perform`] runs it.
//!
//! ## Example
//!
//! ```rust
//! use understory_element_tree::{Element, Tree};
//! use understory_selection::{Action, Session, SessionConfig};
//!
//! // A 2 x 2 grid.
//! let mut tree = Tree::new();
//! let root = tree.insert(None, Element::wrapper());
//! for keys in [["a", "b"], ["c", "d"]] {
//!     let row = tree.insert(Some(root), Element::row());
//!     for key in keys {
//!         tree.insert(Some(row), Element::item(key));
//!     }
//! }
//!
//! let mut session = Session::new(SessionConfig::default());
//! session.attach_root(&tree, root).unwrap();
//!
//! session.perform(Action::GoNext).unwrap();
//! session.perform(Action::GoNextOrthogonal).unwrap();
//! assert_eq!(session.current_key().map(String::as_str), Some("d"));
//! assert_eq!(session.current_index().to_string(), "[[1, 1]]");
//! ```
//!
//! ## Features
//!
//! - `element_tree_adapter` (default): implements [`ScanSource`] for
//!   `understory_element_tree::Tree` and converts its commit batches into [`Change`]s.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod actions;
pub mod adapters;
pub mod deep_index;
mod error;
mod lookup;
mod ordering;
pub mod scan;
mod session;

pub use actions::{Action, KeyActions, KeyInput, Orientation, Preset};
pub use deep_index::{Coord, DeepIndex, InvalidIndex, Offset};
pub use error::SessionError;
pub use lookup::{LookupEntry, LookupTable};
pub use ordering::{Grid, OrderingNode};
pub use scan::{Markers, Scan, ScanOptions, ScanSource};
pub use session::{ActionOutcome, Change, ChangeKind, Marker, Move, Session, SessionConfig};
