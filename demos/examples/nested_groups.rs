// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Three-dimensional navigation: groups of grids, entered with space and left with escape.
//!
//! Also shows a disabled item (reachable, but never committed) and a nested
//! navigation container that the outer session does not descend into.
//!
//! Run:
//! - `cargo run -p understory_demos --example nested_groups`

use understory_demos::{describe, describe_outcome, init_tracing, print_tree};
use understory_element_tree::{Element, Tree};
use understory_selection::{KeyInput, Orientation, Preset, Session, SessionConfig};

fn main() {
    init_tracing();

    let mut tree = Tree::new();
    let root = tree.insert(None, Element::wrapper());
    for group in ["files", "edit"] {
        let item = tree.insert(Some(root), Element::item(group));
        let first_row = tree.insert(Some(item), Element::row());
        tree.insert(Some(first_row), Element::item(format!("{group}/new")));
        tree.insert(Some(first_row), Element::item(format!("{group}/open")));
        let second_row = tree.insert(Some(item), Element::row());
        tree.insert(
            Some(second_row),
            Element::item(format!("{group}/close")).disabled(),
        );
    }
    let popup = tree.insert(Some(root), Element::container());
    tree.insert(Some(popup), Element::item("popup/ok"));
    let _ = tree.commit();
    print_tree(&tree, root);

    let mut session = Session::new(SessionConfig::default());
    if let Err(err) = session.attach_root(&tree, root) {
        eprintln!("cannot attach: {err}");
        return;
    }
    println!(
        "start: {} ({} items; popup/ok scanned: {})",
        describe(&session),
        session.item_count(),
        session.index_of("popup/ok").is_some()
    );

    let keys = Preset::ThreeDimensional(Orientation::Horizontal).key_actions();
    for input in [
        KeyInput::ArrowRight,
        KeyInput::Space,
        KeyInput::ArrowDown,
        KeyInput::Enter,
        KeyInput::ArrowUp,
        KeyInput::Enter,
        KeyInput::Escape,
        KeyInput::Escape,
    ] {
        let action = keys.action_for(input);
        match session.perform(action) {
            Ok(outcome) => println!("{input:?} -> {action:?}: {}", describe_outcome(&outcome)),
            Err(err) => println!("{input:?} -> {action:?}: {err}"),
        }
    }
    println!("end: {}", describe(&session));
}
