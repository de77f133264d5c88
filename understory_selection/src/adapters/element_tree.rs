// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapter for Understory Element Tree.
//!
//! ## Feature
//!
//! Enable with `element_tree_adapter` (on by default).
//!
//! ## Notes
//!
//! [`Tree`] implements [`ScanSource`] with `String` identities and
//! [`ElementId`] handles, and commit batches convert into session
//! [`Change`]s. The usual loop is: edit the tree, [`Tree::commit`], then hand
//! the batch to [`Session::apply_mutations`].
//!
//! ```rust
//! use understory_element_tree::{Element, Tree};
//! use understory_selection::{Session, SessionConfig};
//!
//! let mut tree = Tree::new();
//! let root = tree.insert(None, Element::wrapper());
//! tree.insert(Some(root), Element::item("a"));
//! let b = tree.insert(Some(root), Element::item("b"));
//! let _ = tree.commit();
//!
//! let mut session = Session::new(SessionConfig::default());
//! session.attach_root(&tree, root).unwrap();
//! assert_eq!(session.current_key().map(String::as_str), Some("a"));
//!
//! tree.remove(b);
//! let batch = tree.commit();
//! assert!(session.apply_mutations(&tree, &batch));
//! assert_eq!(session.item_count(), 1);
//! ```

use alloc::string::String;

use understory_element_tree::{
    Attribute, ElementFlags, ElementId, MutationKind, MutationRecord, Mutations, Tree,
};

use crate::scan::{Markers, ScanSource};
use crate::session::{Change, ChangeKind, Marker, Session};

impl ScanSource for Tree {
    type Handle = ElementId;
    type Key = String;

    fn is_live(&self, handle: ElementId) -> bool {
        self.is_alive(handle)
    }

    fn children(&self, handle: ElementId) -> &[ElementId] {
        self.children_of(handle)
    }

    fn parent(&self, handle: ElementId) -> Option<ElementId> {
        self.parent_of(handle)
    }

    fn is_ancestor(&self, ancestor: ElementId, handle: ElementId) -> bool {
        Self::is_ancestor(self, ancestor, handle)
    }

    fn markers(&self, handle: ElementId) -> Markers<String> {
        let Some(element) = self.element(handle) else {
            return Markers::default();
        };
        Markers {
            key: element.key.clone(),
            x: element.x.map(|x| x as usize),
            y: element.y.map(|y| y as usize),
            disabled: element.flags.contains(ElementFlags::DISABLED),
            row: element.flags.contains(ElementFlags::ROW),
            container: element.flags.contains(ElementFlags::CONTAINER),
        }
    }
}

impl From<Attribute> for Marker {
    fn from(attribute: Attribute) -> Self {
        match attribute {
            Attribute::Key => Self::Key,
            Attribute::Disabled => Self::Disabled,
            Attribute::ManualX => Self::X,
            Attribute::ManualY => Self::Y,
            Attribute::Row => Self::Row,
            Attribute::Container => Self::Container,
        }
    }
}

impl From<&MutationRecord> for Change<ElementId> {
    fn from(record: &MutationRecord) -> Self {
        let kind = match record.kind {
            MutationKind::ChildList => ChangeKind::Structure,
            MutationKind::Attribute(attribute) => ChangeKind::Marker(attribute.into()),
        };
        Self {
            target: record.target,
            kind,
        }
    }
}

impl Session<String, ElementId> {
    /// Feed a commit batch from `tree` to [`Session::apply_changes`].
    ///
    /// Returns whether the session rescanned.
    pub fn apply_mutations(&mut self, tree: &Tree, mutations: &Mutations) -> bool {
        self.apply_changes(tree, mutations.iter().map(Change::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deep_index::DeepIndex;
    use crate::scan::{ScanOptions, scan};
    use understory_element_tree::Element;

    #[test]
    fn markers_mirror_the_element() {
        let mut tree = Tree::new();
        let root = tree.insert(None, Element::wrapper());
        let id = tree.insert(
            Some(root),
            Element::item("cell").at(Some(3), None).disabled(),
        );
        let markers = ScanSource::markers(&tree, id);
        assert_eq!(markers.key.as_deref(), Some("cell"));
        assert_eq!(markers.x, Some(3));
        assert_eq!(markers.y, None);
        assert!(markers.disabled);
        assert!(!markers.row && !markers.container);

        tree.remove(id);
        assert_eq!(ScanSource::markers(&tree, id), Markers::default());
    }

    #[test]
    fn records_convert_to_changes() {
        let mut tree = Tree::new();
        let root = tree.insert(None, Element::wrapper());
        let _ = tree.commit();
        let id = tree.insert(Some(root), Element::item("a"));
        tree.set_y(id, Some(1));
        let batch = tree.commit();
        let changes: alloc::vec::Vec<_> = batch.iter().map(Change::from).collect();
        assert!(changes.contains(&Change::structure(root)));
        assert!(changes.contains(&Change::marker(id, Marker::Y)));
    }

    #[test]
    fn scans_a_tree_directly() {
        let mut tree = Tree::new();
        let root = tree.insert(None, Element::wrapper());
        let row = tree.insert(Some(root), Element::row());
        tree.insert(Some(row), Element::item("a"));
        let b = tree.insert(Some(root), Element::item("b"));

        let scanned = scan(&tree, root, ScanOptions::default());
        assert_eq!(scanned.lookup.index_of("b"), Some(&DeepIndex::from_pairs(&[(0, 1)])));
        assert_eq!(scanned.lookup.handle_of("b"), Some(b));
    }
}
