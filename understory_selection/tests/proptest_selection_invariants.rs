// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property-based invariants of scanning, the deep-index algebra, and sessions.
//!
//! Trees are generated from random nestings of items, plain wrappers, and row
//! elements, with a unique identity per item. The placed forests also give
//! items small manual coordinates, which leave gaps and cause collisions.
//!
//! 1. **Scan stability**: scanning an unchanged tree twice yields equal
//!    ordering trees, and every lookup entry resolves to its own item.
//! 2. **Offset boundary law**: a non-wrapping `Next` from any item stays in
//!    the same row and advances by one unless already at the end.
//! 3. **Wrap law**: a wrapping `Next` or `Previous` applied once per cell of
//!    the row returns to the starting cell.
//! 4. **Repair**: `closest_valid` always returns a valid (or empty) path, is
//!    idempotent, and leaves valid paths alone.
//! 5. **Skip-level transparency**: wrapping every element in an extra
//!    wrapper does not change the ordering tree.
//! 6. **Session validity**: any sequence of actions leaves the session on a
//!    valid path.
//! 7. **Reachability**: with wrapping on, every item in the lookup table can
//!    be reached from the initial selection with directional moves.

use std::collections::{HashSet, VecDeque};

use proptest::prelude::*;
use understory_element_tree::{Element, ElementId, Tree};
use understory_selection::scan::{ScanOptions, scan};
use understory_selection::{Action, Coord, DeepIndex, Offset, Session, SessionConfig, deep_index};

type Placement = (Option<u32>, Option<u32>);

#[derive(Clone, Debug)]
enum Shape {
    Item(Placement, Vec<Shape>),
    Wrapper(Vec<Shape>),
    Row(Vec<Shape>),
}

fn placement(manual: bool) -> BoxedStrategy<Placement> {
    if manual {
        (prop::option::of(0_u32..4), prop::option::of(0_u32..4)).boxed()
    } else {
        Just((None, None)).boxed()
    }
}

fn shape(manual: bool) -> impl Strategy<Value = Shape> {
    placement(manual)
        .prop_map(|at| Shape::Item(at, Vec::new()))
        .prop_recursive(4, 48, 4, move |inner| {
            prop_oneof![
                (placement(manual), prop::collection::vec(inner.clone(), 0..4))
                    .prop_map(|(at, children)| Shape::Item(at, children)),
                prop::collection::vec(inner.clone(), 0..4).prop_map(Shape::Wrapper),
                prop::collection::vec(inner, 0..4).prop_map(Shape::Row),
            ]
        })
}

fn forest() -> impl Strategy<Value = Vec<Shape>> {
    prop::collection::vec(shape(false), 0..6)
}

fn placed_forest() -> impl Strategy<Value = Vec<Shape>> {
    prop::collection::vec(shape(true), 0..6)
}

fn build(shapes: &[Shape], extra_wrappers: bool) -> (Tree, ElementId) {
    let mut tree = Tree::new();
    let root = tree.insert(None, Element::wrapper());
    let mut next_key = 0;
    for shape in shapes {
        add(&mut tree, root, shape, &mut next_key, extra_wrappers);
    }
    let _ = tree.commit();
    (tree, root)
}

fn add(tree: &mut Tree, parent: ElementId, shape: &Shape, next_key: &mut usize, extra: bool) {
    let parent = if extra {
        tree.insert(Some(parent), Element::wrapper())
    } else {
        parent
    };
    let (element, children) = match shape {
        Shape::Item((x, y), children) => {
            *next_key += 1;
            (Element::item(format!("k{}", *next_key)).at(*x, *y), children)
        }
        Shape::Wrapper(children) => (Element::wrapper(), children),
        Shape::Row(children) => (Element::row(), children),
    };
    let id = tree.insert(Some(parent), element);
    for child in children {
        add(tree, id, child, next_key, extra);
    }
}

/// Every index reachable from the current one with directional moves.
fn reachable(session: &mut Session<String, ElementId>) -> HashSet<DeepIndex> {
    const MOVES: [Action; 6] = [
        Action::GoNext,
        Action::GoPrevious,
        Action::GoNextOrthogonal,
        Action::GoPreviousOrthogonal,
        Action::GoUp,
        Action::GoDown,
    ];
    let start = session.current_index().clone();
    let mut seen = HashSet::from([start.clone()]);
    let mut queue = VecDeque::from([start]);
    while let Some(index) = queue.pop_front() {
        for action in MOVES {
            session.set_index(index.clone());
            session.perform(action).unwrap();
            let next = session.current_index().clone();
            if seen.insert(next.clone()) {
                queue.push_back(next);
            }
        }
    }
    seen
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        Just(Action::GoNext),
        Just(Action::GoPrevious),
        Just(Action::GoUp),
        Just(Action::GoDown),
        Just(Action::GoNextOrthogonal),
        Just(Action::GoPreviousOrthogonal),
        Just(Action::Select),
        Just(Action::DoNothing),
    ]
}

fn path() -> impl Strategy<Value = DeepIndex> {
    prop::collection::vec((0_usize..6, 0_usize..6), 0..5)
        .prop_map(|pairs| pairs.into_iter().map(Coord::from).collect())
}

proptest! {
    #[test]
    fn scanning_is_stable(shapes in placed_forest()) {
        let (tree, root) = build(&shapes, false);
        let first = scan(&tree, root, ScanOptions::default());
        let second = scan(&tree, root, ScanOptions::default());
        prop_assert_eq!(&first.ordering, &second.ordering);
        prop_assert_eq!(first.lookup.len(), second.lookup.len());
        for (key, entry) in first.lookup.iter() {
            let node = deep_index::resolve(&first.ordering, &entry.index);
            prop_assert_eq!(node.and_then(|n| n.key.as_ref()), Some(key));
            prop_assert_eq!(tree.key(entry.handle), Some(key.as_str()));
            prop_assert_eq!(second.lookup.get(key), Some(entry));
        }
    }

    #[test]
    fn next_stays_in_the_row(shapes in forest()) {
        let (tree, root) = build(&shapes, false);
        let scanned = scan(&tree, root, ScanOptions::default());
        for (_, entry) in scanned.lookup.iter() {
            let index = &entry.index;
            let Some(last) = index.last() else { continue };
            let parent = deep_index::resolve(&scanned.ordering, &index.parent()).unwrap();
            let len = parent.children.row_len(last.y);

            let next = deep_index::offset(index, &scanned.ordering, Offset::Next, false).unwrap();
            let expected = Coord::new((last.x + 1).min(len - 1), last.y);
            prop_assert_eq!(next.parent(), index.parent());
            prop_assert_eq!(next.last(), Some(expected));
            prop_assert!(deep_index::is_valid(&next, &scanned.ordering));

            let wrapped = deep_index::offset(index, &scanned.ordering, Offset::Next, true).unwrap();
            let expected_x = if last.x + 1 == len { 0 } else { last.x + 1 };
            prop_assert_eq!(wrapped.last(), Some(Coord::new(expected_x, last.y)));
        }
    }

    #[test]
    fn wrapping_once_per_cell_returns_home(shapes in placed_forest()) {
        let (tree, root) = build(&shapes, false);
        let scanned = scan(&tree, root, ScanOptions::default());
        for (_, entry) in scanned.lookup.iter() {
            let index = &entry.index;
            let Some(last) = index.last() else { continue };
            let parent = deep_index::resolve(&scanned.ordering, &index.parent()).unwrap();
            let len = parent.children.row_len(last.y);
            for direction in [Offset::Next, Offset::Previous] {
                let mut moved = index.clone();
                for _ in 0..len {
                    moved = deep_index::offset(&moved, &scanned.ordering, direction, true).unwrap();
                    prop_assert_eq!(moved.last().map(|c| c.y), Some(last.y));
                }
                prop_assert_eq!(&moved, index, "{:?} x {}", direction, len);
            }
        }
    }

    #[test]
    fn repair_is_valid_and_idempotent(shapes in placed_forest(), index in path()) {
        let (tree, root) = build(&shapes, false);
        let scanned = scan(&tree, root, ScanOptions::default());
        let repaired = deep_index::closest_valid(&index, &scanned.ordering);
        prop_assert!(repaired.is_empty() || deep_index::is_valid(&repaired, &scanned.ordering));
        prop_assert!(repaired.depth() <= index.depth());
        prop_assert_eq!(deep_index::closest_valid(&repaired, &scanned.ordering), repaired.clone());
        if deep_index::is_valid(&index, &scanned.ordering) {
            prop_assert_eq!(repaired, index);
        }
    }

    #[test]
    fn wrappers_are_transparent(shapes in placed_forest()) {
        let (plain, plain_root) = build(&shapes, false);
        let (wrapped, wrapped_root) = build(&shapes, true);
        let a = scan(&plain, plain_root, ScanOptions::default());
        let b = scan(&wrapped, wrapped_root, ScanOptions::default());
        prop_assert_eq!(a.ordering, b.ordering);
        for (key, entry) in a.lookup.iter() {
            prop_assert_eq!(b.lookup.index_of(key), Some(&entry.index));
        }
    }

    #[test]
    fn sessions_stay_on_valid_paths(
        shapes in placed_forest(),
        actions in prop::collection::vec(action(), 0..24),
        wrap in any::<bool>(),
    ) {
        let (tree, root) = build(&shapes, false);
        let mut session = Session::new(SessionConfig { wrap, ..SessionConfig::default() });
        session.attach_root(&tree, root).unwrap();
        let has_items = !session.lookup().is_empty();
        for action in actions {
            session.perform(action).unwrap();
            let index = session.current_index();
            if has_items {
                prop_assert!(deep_index::is_valid(index, session.ordering()), "{} after {:?}", index, action);
                prop_assert!(session.current_handle().is_some());
            } else {
                prop_assert!(index.is_empty());
            }
        }
    }

    #[test]
    fn every_item_is_reachable(shapes in placed_forest()) {
        let (tree, root) = build(&shapes, false);
        let mut session = Session::new(SessionConfig { wrap: true, ..SessionConfig::default() });
        session.attach_root(&tree, root).unwrap();
        let seen = reachable(&mut session);
        for (key, entry) in session.lookup().iter() {
            prop_assert!(seen.contains(&entry.index), "{} at {} is unreachable", key, entry.index);
        }
    }
}
