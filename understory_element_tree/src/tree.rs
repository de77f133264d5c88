// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: structure, marker updates, mutation records.

use alloc::{string::String, vec::Vec};

use crate::mutation::{MutationKind, MutationRecord, Mutations};
use crate::types::{Attribute, Element, ElementFlags, ElementId};

/// Top-level element tree.
///
/// Structural edits and marker edits take effect immediately, and each one
/// queues a [`MutationRecord`]. [`Tree::commit`] drains the queue as one
/// coalesced [`Mutations`] batch, which plays the role of a mutation observer
/// callback: hosts hand the batch to whoever watches the tree.
///
/// ## Example
///
/// ```rust
/// use understory_element_tree::{Element, Tree};
///
/// let mut tree = Tree::new();
/// let list = tree.insert(None, Element::wrapper());
/// let a = tree.insert(Some(list), Element::item("a"));
/// let _ = tree.commit();
///
/// tree.set_disabled(a, true);
/// let mutations = tree.commit();
/// assert_eq!(mutations.len(), 1);
/// assert_eq!(tree.key(a), Some("a"));
/// ```
pub struct Tree {
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    epoch: u64,
    pending: Mutations,
}

impl core::fmt::Debug for Tree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Tree")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("epoch", &self.epoch)
            .field("pending", &self.pending.len())
            .finish_non_exhaustive()
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    element: Element,
}

impl Node {
    fn new(generation: u32, element: Element) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            element,
        }
    }
}

impl Tree {
    /// Create a new empty tree.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            epoch: 0,
            pending: Mutations::default(),
        }
    }

    /// Insert a new element as the last child of `parent` (or as a root if `None`).
    pub fn insert(&mut self, parent: Option<ElementId>, element: Element) -> ElementId {
        let id = self.allocate(element);
        if let Some(p) = parent
            && self.is_alive(p)
        {
            self.link_parent(id, p, None);
        }
        id
    }

    /// Insert a new element under `parent`, immediately before the sibling `before`.
    ///
    /// If `before` is not a child of `parent`, the element is appended.
    pub fn insert_before(
        &mut self,
        parent: ElementId,
        before: ElementId,
        element: Element,
    ) -> ElementId {
        let id = self.allocate(element);
        if self.is_alive(parent) {
            self.link_parent(id, parent, Some(before));
        }
        id
    }

    /// Remove an element (and its subtree) from the tree.
    ///
    /// The former parent receives a [`MutationKind::ChildList`] record.
    pub fn remove(&mut self, id: ElementId) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        self.free_subtree(id);
    }

    /// Move `id` under `new_parent` as its last child (or detach it as a root if `None`).
    ///
    /// Reparenting under the element itself or one of its descendants is ignored,
    /// since it would create a cycle.
    pub fn reparent(&mut self, id: ElementId, new_parent: Option<ElementId>) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(p) = new_parent
            && (!self.is_alive(p) || p == id || self.is_ancestor(id, p))
        {
            tracing::debug!(?id, parent = ?p, "ignoring reparent that would form a cycle");
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        if let Some(p) = new_parent {
            self.link_parent(id, p, None);
        }
    }

    /// Move `id` so that it sits immediately before its sibling `before`.
    ///
    /// Does nothing if the two elements do not share a parent.
    pub fn move_before(&mut self, id: ElementId, before: ElementId) {
        if id == before || !self.is_alive(id) {
            return;
        }
        let Some(parent) = self.parent_of(id) else {
            return;
        };
        if self.parent_of(before) != Some(parent) {
            return;
        }
        let siblings = &mut self.node_mut(parent).children;
        siblings.retain(|c| *c != id);
        let pos = siblings
            .iter()
            .position(|c| *c == before)
            .unwrap_or(siblings.len());
        siblings.insert(pos, id);
        self.record(parent, MutationKind::ChildList);
    }

    /// Update the identity marker.
    pub fn set_key(&mut self, id: ElementId, key: Option<String>) {
        if let Some(n) = self.node_opt_mut(id)
            && n.element.key != key
        {
            n.element.key = key;
            self.record(id, MutationKind::Attribute(Attribute::Key));
        }
    }

    /// Update the manual column override.
    pub fn set_x(&mut self, id: ElementId, x: Option<u32>) {
        if let Some(n) = self.node_opt_mut(id)
            && n.element.x != x
        {
            n.element.x = x;
            self.record(id, MutationKind::Attribute(Attribute::ManualX));
        }
    }

    /// Update the manual row override.
    pub fn set_y(&mut self, id: ElementId, y: Option<u32>) {
        if let Some(n) = self.node_opt_mut(id)
            && n.element.y != y
        {
            n.element.y = y;
            self.record(id, MutationKind::Attribute(Attribute::ManualY));
        }
    }

    /// Replace the marker flags, recording one attribute change per flipped bit.
    pub fn set_flags(&mut self, id: ElementId, flags: ElementFlags) {
        let Some(n) = self.node_opt_mut(id) else {
            return;
        };
        let changed = n.element.flags ^ flags;
        if changed.is_empty() {
            return;
        }
        n.element.flags = flags;
        for (bit, attribute) in Attribute::FLAG_ATTRIBUTES {
            if changed.contains(bit) {
                self.record(id, MutationKind::Attribute(attribute));
            }
        }
    }

    /// Toggle [`ElementFlags::DISABLED`].
    pub fn set_disabled(&mut self, id: ElementId, disabled: bool) {
        if let Some(flags) = self.flags(id) {
            let mut flags = flags;
            flags.set(ElementFlags::DISABLED, disabled);
            self.set_flags(id, flags);
        }
    }

    /// Drain queued mutation records as one coalesced batch.
    ///
    /// Returns an empty batch when nothing changed; observers should treat
    /// that as a no-op.
    pub fn commit(&mut self) -> Mutations {
        self.epoch += 1;
        let mut batch = core::mem::take(&mut self.pending);
        batch.epoch = self.epoch;
        tracing::trace!(epoch = self.epoch, records = batch.len(), "element tree commit");
        batch
    }

    /// Returns true if `id` refers to a live element.
    ///
    /// An `ElementId` is live if its slot exists and its generation matches
    /// the generation currently stored in that slot.
    pub fn is_alive(&self, id: ElementId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .map(|n| n.generation == id.1)
            .unwrap_or(false)
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    /// Returns true if the tree holds no live elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Marker data of a live element.
    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.node_opt(id).map(|n| &n.element)
    }

    /// Identity marker of a live element.
    pub fn key(&self, id: ElementId) -> Option<&str> {
        self.element(id).and_then(|e| e.key.as_deref())
    }

    /// Marker flags of a live element.
    pub fn flags(&self, id: ElementId) -> Option<ElementFlags> {
        self.element(id).map(|e| e.flags)
    }

    /// Returns the parent of an element if live, or `None` for roots or stale ids.
    pub fn parent_of(&self, id: ElementId) -> Option<ElementId> {
        self.node_opt(id).and_then(|n| n.parent)
    }

    /// Get the children of an element in document order, or an empty slice if stale.
    pub fn children_of(&self, id: ElementId) -> &[ElementId] {
        self.node_opt(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Returns true if `ancestor` is a strict ancestor of `id`.
    pub fn is_ancestor(&self, ancestor: ElementId, id: ElementId) -> bool {
        let mut current = self.parent_of(id);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.parent_of(p);
        }
        false
    }

    /// Get the next element in depth-first (document) order.
    ///
    /// Returns `None` at the end of the tree or if `current` is stale.
    pub fn next_depth_first(&self, current: ElementId) -> Option<ElementId> {
        if !self.is_alive(current) {
            return None;
        }
        if let Some(&first_child) = self.children_of(current).first() {
            return Some(first_child);
        }
        let mut node = current;
        while let Some(parent) = self.parent_of(node) {
            if let Some(next_sibling) = self.next_sibling(node) {
                return Some(next_sibling);
            }
            node = parent;
        }
        None
    }

    // --- internals ---

    fn allocate(&mut self, element: Element) -> ElementId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, element));
            (idx, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, element)));
            self.generations.push(generation);
            (self.nodes.len() - 1, generation)
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "ElementId stores 32-bit slot indices."
        )]
        ElementId::new(idx as u32, generation)
    }

    fn free_subtree(&mut self, id: ElementId) {
        let mut stack = alloc::vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes[current.idx()].take() {
                stack.extend(node.children);
                self.free_list.push(current.idx());
            }
        }
    }

    fn next_sibling(&self, node: ElementId) -> Option<ElementId> {
        let siblings = self.children_of(self.parent_of(node)?);
        let pos = siblings.iter().position(|&id| id == node)?;
        siblings.get(pos + 1).copied()
    }

    fn node(&self, id: ElementId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling ElementId")
    }

    fn node_mut(&mut self, id: ElementId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling ElementId")
    }

    fn node_opt(&self, id: ElementId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    fn node_opt_mut(&mut self, id: ElementId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn link_parent(&mut self, id: ElementId, parent: ElementId, before: Option<ElementId>) {
        let siblings = &mut self.node_mut(parent).children;
        let pos = before
            .and_then(|b| siblings.iter().position(|c| *c == b))
            .unwrap_or(siblings.len());
        siblings.insert(pos, id);
        self.node_mut(id).parent = Some(parent);
        self.record(parent, MutationKind::ChildList);
    }

    fn unlink_parent(&mut self, id: ElementId, parent: ElementId) {
        self.node_mut(parent).children.retain(|c| *c != id);
        self.node_mut(id).parent = None;
        self.record(parent, MutationKind::ChildList);
    }

    fn record(&mut self, target: ElementId, kind: MutationKind) {
        self.pending.push(MutationRecord { target, kind });
    }
}
