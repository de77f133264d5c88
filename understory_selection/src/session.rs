// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Navigation session: the stateful owner of one navigation root.
//!
//! A [`Session`] holds the current [`Scan`] of its root and the current
//! [`DeepIndex`]. It rescans when the host reports relevant [`Change`]s,
//! repairs the index against the new topology, and turns movement commands
//! into [`Move`] notifications.
//!
//! ## Lifecycle
//!
//! A session starts detached. [`Session::attach_root`] stores the root and
//! scans it; [`Session::detach_root`] drops the root together with the scan
//! (and every element handle in it) but keeps the index, so that re-attaching
//! resumes at the same place when it is still valid. Change batches delivered
//! while attached rescan without changing state.
//!
//! ## Movement
//!
//! Movement lands on disabled items; only [`Session::commit_selection`]
//! refuses them. Vacant cells left by manual coordinates are stepped over.
//! When nothing is selected, every movement command enters the first item.

use alloc::boxed::Box;
use core::fmt;
use core::fmt::Debug;
use core::hash::Hash;

use hashbrown::Equivalent;

use crate::actions::Action;
use crate::deep_index::{self, DeepIndex, InvalidIndex, Offset};
use crate::error::SessionError;
use crate::lookup::{LookupEntry, LookupTable};
use crate::ordering::OrderingNode;
use crate::scan::{DEFAULT_MAX_COORDINATE, Scan, ScanOptions, ScanSource, scan};

/// Session configuration.
///
/// ```rust
/// use understory_selection::SessionConfig;
///
/// let config = SessionConfig {
///     wrap: true,
///     ..SessionConfig::default()
/// };
/// assert!(!config.observe_deep);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Wrap around at the edges of a row or column instead of stopping.
    pub wrap: bool,
    /// Observe changes anywhere below the root, not only on the root and its
    /// direct children.
    pub observe_deep: bool,
    /// Descend into nested navigation containers while scanning.
    pub cross_container_boundaries: bool,
    /// Largest manual coordinate honored while scanning; see
    /// [`ScanOptions::max_coordinate`].
    pub max_coordinate: usize,
    /// Reported by [`Session::item_count`] instead of the number of scanned
    /// items, for virtualized content that is only partially present.
    pub item_count: Option<usize>,
    /// Selection before the first scan, repaired once the root is scanned.
    pub initial_index: DeepIndex,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            wrap: false,
            observe_deep: false,
            cross_container_boundaries: false,
            max_coordinate: DEFAULT_MAX_COORDINATE,
            item_count: None,
            initial_index: DeepIndex::first(),
        }
    }
}

/// A navigation marker whose value changed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Marker {
    /// Item identity.
    Key,
    /// Disabled marker.
    Disabled,
    /// Manual column.
    X,
    /// Manual row.
    Y,
    /// Row boundary.
    Row,
    /// Container boundary.
    Container,
}

impl Marker {
    /// Returns true if a change to this marker triggers a rescan.
    ///
    /// Container boundaries are only read while scanning; toggling one does
    /// not trigger a rescan by itself.
    pub const fn is_observed(self) -> bool {
        !matches!(self, Self::Container)
    }
}

/// What changed about a [`Change`] target.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// The target's children were added, removed, or reordered.
    Structure,
    /// One of the target's markers changed.
    Marker(Marker),
}

/// One change reported by the host tree.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Change<H> {
    /// Element whose children or markers changed. For removals, the former parent.
    pub target: H,
    /// What changed.
    pub kind: ChangeKind,
}

impl<H> Change<H> {
    /// A structural change on `target`.
    pub const fn structure(target: H) -> Self {
        Self {
            target,
            kind: ChangeKind::Structure,
        }
    }

    /// A marker change on `target`.
    pub const fn marker(target: H, marker: Marker) -> Self {
        Self {
            target,
            kind: ChangeKind::Marker(marker),
        }
    }
}

/// Notification of a completed move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Move<K, H> {
    /// Element of the newly current item, if one is registered.
    pub handle: Option<H>,
    /// Identity of the newly current item.
    pub key: K,
    /// Path of the newly current item.
    pub index: DeepIndex,
}

/// Result of [`Session::perform`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionOutcome<K, H> {
    /// The current item changed.
    Moved(Move<K, H>),
    /// The current item was committed as the selection.
    Selected(K),
    /// Nothing happened.
    Unchanged,
}

type MoveCallback<K, H> = Box<dyn FnMut(&Move<K, H>)>;

/// Selection state over one navigation root.
///
/// `K` is the item identity and `H` the element handle type of the
/// [`ScanSource`] the session observes.
pub struct Session<K, H> {
    config: SessionConfig,
    root: Option<H>,
    scan: Scan<K, H>,
    index: DeepIndex,
    on_move: Option<MoveCallback<K, H>>,
}

impl<K: Debug, H: Debug> fmt::Debug for Session<K, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("root", &self.root)
            .field("index", &self.index)
            .field("has_on_move", &self.on_move.is_some())
            .finish_non_exhaustive()
    }
}

impl<K, H> Default for Session<K, H>
where
    K: Clone + Eq + Hash + Debug,
    H: Copy + Eq + Debug,
{
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl<K, H> Session<K, H>
where
    K: Clone + Eq + Hash + Debug,
    H: Copy + Eq + Debug,
{
    /// A detached session.
    pub fn new(config: SessionConfig) -> Self {
        let index = config.initial_index.clone();
        Self {
            config,
            root: None,
            scan: Scan::default(),
            index,
            on_move: None,
        }
    }

    /// Call `on_move` after every move that changes the current item.
    pub fn set_on_move(&mut self, on_move: impl FnMut(&Move<K, H>) + 'static) {
        self.on_move = Some(Box::new(on_move));
    }

    /// Stop notifying moves.
    pub fn clear_on_move(&mut self) {
        self.on_move = None;
    }

    /// Current configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The attached root.
    pub fn root(&self) -> Option<H> {
        self.root
    }

    /// Returns true if a root is attached.
    pub fn is_attached(&self) -> bool {
        self.root.is_some()
    }

    /// The ordering tree of the latest scan.
    pub fn ordering(&self) -> &OrderingNode<K> {
        &self.scan.ordering
    }

    /// The lookup table of the latest scan.
    pub fn lookup(&self) -> &LookupTable<K, H> {
        &self.scan.lookup
    }

    // --- lifecycle ---

    /// Attach `root` and scan it.
    ///
    /// Replaces any previously attached root.
    pub fn attach_root<S>(&mut self, source: &S, root: H) -> Result<(), SessionError>
    where
        S: ScanSource<Key = K, Handle = H>,
    {
        if !source.is_live(root) {
            tracing::warn!(?root, "refusing to attach a stale navigation root");
            return Err(SessionError::StaleRoot);
        }
        self.root = Some(root);
        self.refresh(source, root);
        Ok(())
    }

    /// Drop the root and the scan; keep the index.
    pub fn detach_root(&mut self) {
        if let Some(root) = self.root.take() {
            tracing::debug!(?root, "detached navigation root");
        }
        self.scan = Scan::default();
    }

    /// Rescan the attached root unconditionally.
    pub fn rescan<S>(&mut self, source: &S) -> Result<(), SessionError>
    where
        S: ScanSource<Key = K, Handle = H>,
    {
        let root = self.attached()?;
        self.refresh(source, root);
        Ok(())
    }

    /// Handle a batch of changes reported by the host.
    ///
    /// Rescans once if any change is relevant, and returns whether it did.
    /// Structural changes are relevant on the root; marker changes on the
    /// root and its direct children. With [`SessionConfig::observe_deep`],
    /// changes on any descendant count. A root that is no longer live always
    /// triggers a rescan.
    pub fn apply_changes<S, I>(&mut self, source: &S, changes: I) -> bool
    where
        S: ScanSource<Key = K, Handle = H>,
        I: IntoIterator<Item = Change<H>>,
    {
        let Some(root) = self.root else {
            return false;
        };
        let relevant = !source.is_live(root)
            || changes
                .into_iter()
                .any(|change| self.is_relevant(source, root, &change));
        if relevant {
            self.refresh(source, root);
        }
        relevant
    }

    fn is_relevant<S>(&self, source: &S, root: H, change: &Change<H>) -> bool
    where
        S: ScanSource<Key = K, Handle = H>,
    {
        let target = change.target;
        let deep = self.config.observe_deep && source.is_ancestor(root, target);
        match change.kind {
            ChangeKind::Structure => target == root || deep,
            ChangeKind::Marker(marker) => {
                marker.is_observed()
                    && (target == root || source.parent(target) == Some(root) || deep)
            }
        }
    }

    fn refresh<S>(&mut self, source: &S, root: H)
    where
        S: ScanSource<Key = K, Handle = H>,
    {
        let options = ScanOptions {
            cross_container_boundaries: self.config.cross_container_boundaries,
            max_coordinate: self.config.max_coordinate,
        };
        self.scan = scan(source, root, options);
        let repaired = deep_index::closest_valid(&self.index, &self.scan.ordering);
        if repaired != self.index {
            tracing::debug!(from = %self.index, to = %repaired, "repaired selection after rescan");
            self.index = repaired;
        }
        tracing::debug!(?root, items = self.scan.lookup.len(), "rescanned navigation root");
    }

    fn attached(&self) -> Result<H, SessionError> {
        self.root.ok_or(SessionError::Detached)
    }

    // --- movement ---

    /// Next item in the current row.
    pub fn go_to_next(&mut self) -> Result<Option<Move<K, H>>, SessionError> {
        self.go_offset(Offset::Next)
    }

    /// Previous item in the current row.
    pub fn go_to_previous(&mut self) -> Result<Option<Move<K, H>>, SessionError> {
        self.go_offset(Offset::Previous)
    }

    /// Same column in the next row.
    pub fn go_to_next_orthogonal(&mut self) -> Result<Option<Move<K, H>>, SessionError> {
        self.go_offset(Offset::NextOrthogonal)
    }

    /// Same column in the previous row.
    pub fn go_to_previous_orthogonal(&mut self) -> Result<Option<Move<K, H>>, SessionError> {
        self.go_offset(Offset::PreviousOrthogonal)
    }

    /// The item containing the current one. Stays put at the top level.
    pub fn go_up(&mut self) -> Result<Option<Move<K, H>>, SessionError> {
        self.attached()?;
        if self.index.is_empty() {
            return Ok(self.enter());
        }
        let target = deep_index::up(&self.index);
        Ok(self.move_to(target))
    }

    /// The first item inside the current one. Stays put on leaves.
    pub fn go_down(&mut self) -> Result<Option<Move<K, H>>, SessionError> {
        self.attached()?;
        if self.index.is_empty() {
            return Ok(self.enter());
        }
        match deep_index::down(&self.index, &self.scan.ordering) {
            Ok(target) => Ok(self.move_to(target)),
            Err(err) => {
                tracing::warn!(%err, "cannot move down");
                Ok(None)
            }
        }
    }

    fn go_offset(&mut self, offset: Offset) -> Result<Option<Move<K, H>>, SessionError> {
        self.attached()?;
        if self.index.is_empty() {
            return Ok(self.enter());
        }
        match self.offset_target(offset) {
            Ok(target) => Ok(self.move_to(target)),
            Err(err) => {
                tracing::warn!(%err, ?offset, "cannot move");
                Ok(None)
            }
        }
    }

    /// Where `offset` leads from the current index, past any vacant cells.
    fn offset_target(&self, offset: Offset) -> Result<DeepIndex, InvalidIndex> {
        let ordering = &self.scan.ordering;
        let wrap = self.config.wrap;
        let mut target = deep_index::offset(&self.index, ordering, offset, wrap)?;
        match offset {
            Offset::Next | Offset::Previous => {
                // Keep going in the same direction; a row has at most
                // `row_len` cells to skip.
                let row_len = target
                    .last()
                    .zip(deep_index::resolve(ordering, &target.parent()))
                    .map_or(0, |(c, parent)| parent.children.row_len(c.y));
                for _ in 0..row_len {
                    if deep_index::is_valid(&target, ordering) {
                        break;
                    }
                    let next = deep_index::offset(&target, ordering, offset, wrap)?;
                    if next == target {
                        break;
                    }
                    target = next;
                }
            }
            Offset::NextOrthogonal | Offset::PreviousOrthogonal => {
                if !deep_index::is_valid(&target, ordering) {
                    target = deep_index::closest_valid(&target, ordering);
                }
            }
        }
        if deep_index::is_valid(&target, ordering) {
            Ok(target)
        } else {
            Ok(self.index.clone())
        }
    }

    /// Enter the first item when nothing is selected.
    fn enter(&mut self) -> Option<Move<K, H>> {
        let target = deep_index::closest_valid(&DeepIndex::first(), &self.scan.ordering);
        self.move_to(target)
    }

    fn move_to(&mut self, target: DeepIndex) -> Option<Move<K, H>> {
        if target == self.index {
            return None;
        }
        let key = deep_index::resolve(&self.scan.ordering, &target)?
            .key
            .clone()?;
        let handle = self.scan.lookup.handle_of(&key);
        if handle.is_none() {
            tracing::warn!(?key, "moved to an item without a registered element");
        }
        tracing::trace!(?key, index = %target, "selection moved");
        self.index = target;
        let notification = Move {
            handle,
            key,
            index: self.index.clone(),
        };
        if let Some(on_move) = self.on_move.as_mut() {
            on_move(&notification);
        }
        Some(notification)
    }

    // --- selection ---

    /// Make the item with identity `key` current, without notifying.
    ///
    /// Returns false, and keeps the current index, if `key` is not registered.
    pub fn select_key<Q>(&mut self, key: &Q) -> bool
    where
        Q: ?Sized + Hash + Equivalent<K> + Debug,
    {
        match self.scan.lookup.index_of(key) {
            Some(index) => {
                self.index = index.clone();
                true
            }
            None => {
                tracing::warn!(?key, "cannot select an unregistered key");
                false
            }
        }
    }

    /// Reconcile with an externally controlled value.
    ///
    /// `None` clears the selection. Returns false only for unregistered keys.
    pub fn select_value<Q>(&mut self, value: Option<&Q>) -> bool
    where
        Q: ?Sized + Hash + Equivalent<K> + Debug,
    {
        match value {
            Some(key) => self.select_key(key),
            None => {
                self.index = DeepIndex::new();
                true
            }
        }
    }

    /// Set the current index directly.
    ///
    /// An index that does not resolve is kept as is and repaired on the next
    /// rescan.
    pub fn set_index(&mut self, index: DeepIndex) {
        if !index.is_empty() && !deep_index::is_valid(&index, &self.scan.ordering) {
            tracing::warn!(%index, "selection index does not resolve");
        }
        self.index = index;
    }

    /// Identity of the current item, unless it is empty, unresolved, or disabled.
    pub fn commit_selection(&self) -> Option<K> {
        let node = self.current_node()?;
        if node.disabled {
            tracing::debug!(key = ?node.key, "refusing to commit a disabled item");
            return None;
        }
        node.key.clone()
    }

    /// Run a navigation [`Action`].
    pub fn perform(&mut self, action: Action) -> Result<ActionOutcome<K, H>, SessionError> {
        self.attached()?;
        let moved = match action {
            Action::GoNext => self.go_to_next()?,
            Action::GoPrevious => self.go_to_previous()?,
            Action::GoUp => self.go_up()?,
            Action::GoDown => self.go_down()?,
            Action::GoNextOrthogonal => self.go_to_next_orthogonal()?,
            Action::GoPreviousOrthogonal => self.go_to_previous_orthogonal()?,
            Action::Select => {
                return Ok(self
                    .commit_selection()
                    .map_or(ActionOutcome::Unchanged, ActionOutcome::Selected));
            }
            Action::DoNothing => None,
        };
        Ok(moved.map_or(ActionOutcome::Unchanged, ActionOutcome::Moved))
    }

    // --- queries ---

    /// The current index; empty when nothing is selected.
    pub fn current_index(&self) -> &DeepIndex {
        &self.index
    }

    /// The current item's node.
    pub fn current_node(&self) -> Option<&OrderingNode<K>> {
        if self.index.is_empty() {
            return None;
        }
        deep_index::resolve(&self.scan.ordering, &self.index)
    }

    /// The current item's identity.
    pub fn current_key(&self) -> Option<&K> {
        self.current_node().and_then(|n| n.key.as_ref())
    }

    /// The current item's element.
    pub fn current_handle(&self) -> Option<H> {
        self.current_key()
            .and_then(|key| self.scan.lookup.handle_of(key))
    }

    /// Number of items, or [`SessionConfig::item_count`] when set.
    pub fn item_count(&self) -> usize {
        self.config.item_count.unwrap_or(self.scan.lookup.len())
    }

    /// Path of the item with identity `key`.
    pub fn index_of<Q>(&self, key: &Q) -> Option<&DeepIndex>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.scan.lookup.index_of(key)
    }

    /// Lookup entry of the item with identity `key`.
    pub fn entry<Q>(&self, key: &Q) -> Option<&LookupEntry<H>>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.scan.lookup.get(key)
    }

    /// Identity of the item at `index`.
    pub fn key_at(&self, index: &DeepIndex) -> Option<&K> {
        deep_index::resolve(&self.scan.ordering, index).and_then(|n| n.key.as_ref())
    }

    /// Element of the item at `index`.
    pub fn handle_at(&self, index: &DeepIndex) -> Option<H> {
        self.key_at(index)
            .and_then(|key| self.scan.lookup.handle_of(key))
    }
}
