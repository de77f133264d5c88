// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared helpers for the Understory selection demos.
//!
//! Run a demo with, for example:
//! - `cargo run -p understory_demos --example grid_navigation`
//!
//! Set `RUST_LOG=understory_selection=trace` to watch rescans and moves.

use understory_element_tree::{ElementId, Tree};
use understory_selection::{ActionOutcome, Session};

/// Install a `fmt` subscriber filtered by `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

/// One-line description of where `session` currently is.
pub fn describe(session: &Session<String, ElementId>) -> String {
    match session.current_key() {
        Some(key) => format!("{key} at {}", session.current_index()),
        None => String::from("<nothing selected>"),
    }
}

/// One-line description of an action outcome.
pub fn describe_outcome(outcome: &ActionOutcome<String, ElementId>) -> String {
    match outcome {
        ActionOutcome::Moved(m) => format!("moved to {} at {}", m.key, m.index),
        ActionOutcome::Selected(key) => format!("selected {key}"),
        ActionOutcome::Unchanged => String::from("unchanged"),
    }
}

/// Print every element under `root` with its depth, in document order.
pub fn print_tree(tree: &Tree, root: ElementId) {
    let mut current = Some(root);
    while let Some(id) = current {
        if id != root && !tree.is_ancestor(root, id) {
            break;
        }
        let depth = depth_below(tree, root, id);
        let label = match tree.element(id).and_then(|e| e.key.as_deref()) {
            Some(key) => key.to_string(),
            None => String::from("·"),
        };
        println!("{:indent$}{label}", "", indent = depth * 2);
        current = tree.next_depth_first(id);
    }
}

fn depth_below(tree: &Tree, root: ElementId, id: ElementId) -> usize {
    let mut depth = 0;
    let mut node = id;
    while node != root {
        let Some(parent) = tree.parent_of(node) else {
            break;
        };
        depth += 1;
        node = parent;
    }
    depth
}
