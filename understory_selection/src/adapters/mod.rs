// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapters to integrate with other Understory crates.
//!
//! Each adapter is gated behind a feature flag so the engine itself stays
//! independent of any particular element tree.
//!
//! ## Available Adapters
//!
//! - [`element_tree`] (`element_tree_adapter` feature): scan and observe an
//!   [`understory_element_tree::Tree`].

#[cfg(feature = "element_tree_adapter")]
pub mod element_tree;
