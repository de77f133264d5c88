// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grid navigation with the arrow keys, including a row that changes at runtime.
//!
//! Builds a 3 x 3 grid of cells (each row wrapped in a layout-only element),
//! drives a session with the horizontal grid preset, then removes a cell and
//! forwards the commit batch so the session rescans and repairs its position.
//!
//! Run:
//! - `cargo run -p understory_demos --example grid_navigation`

use understory_demos::{describe, describe_outcome, init_tracing, print_tree};
use understory_element_tree::{Element, Tree};
use understory_selection::{KeyInput, Orientation, Preset, Session, SessionConfig};

fn main() {
    init_tracing();

    let mut tree = Tree::new();
    let root = tree.insert(None, Element::wrapper());
    for y in 0..3 {
        let row = tree.insert(Some(root), Element::row());
        let layout = tree.insert(Some(row), Element::wrapper());
        for x in 0..3 {
            tree.insert(Some(layout), Element::item(format!("r{y}c{x}")));
        }
    }
    // The initial build is reported by `attach_root`'s scan.
    let _ = tree.commit();
    print_tree(&tree, root);

    let mut session = Session::new(SessionConfig {
        wrap: true,
        observe_deep: true,
        ..SessionConfig::default()
    });
    session.set_on_move(|m| println!("  on_move: {} at {} ({:?})", m.key, m.index, m.handle));
    if let Err(err) = session.attach_root(&tree, root) {
        eprintln!("cannot attach: {err}");
        return;
    }
    println!("start: {}", describe(&session));

    let keys = Preset::Grid(Orientation::Horizontal).key_actions();
    for input in [
        KeyInput::ArrowRight,
        KeyInput::ArrowRight,
        KeyInput::ArrowDown,
        KeyInput::ArrowDown,
        KeyInput::ArrowRight,
        KeyInput::Enter,
    ] {
        let action = keys.action_for(input);
        match session.perform(action) {
            Ok(outcome) => println!("{input:?} -> {action:?}: {}", describe_outcome(&outcome)),
            Err(err) => println!("{input:?} -> {action:?}: {err}"),
        }
    }

    // Drop the current cell; its row neighbour slides into place.
    if let Some(cell) = session.current_handle() {
        tree.remove(cell);
    }
    let batch = tree.commit();
    let rescanned = session.apply_mutations(&tree, &batch);
    println!(
        "after removing a cell (rescanned: {rescanned}): {} of {} items",
        describe(&session),
        session.item_count()
    );
}
