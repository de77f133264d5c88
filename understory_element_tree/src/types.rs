// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the element tree: identifiers, marker flags, and per-element data.

use alloc::string::String;

/// Identifier for an element in the tree (generational).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ElementId(pub(crate) u32, pub(crate) u32);

impl ElementId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Boolean markers read by navigation scanners.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ElementFlags: u8 {
        /// The element may not become the committed selection.
        const DISABLED  = 0b0000_0001;
        /// The element closes a row: items discovered after it at the same
        /// container level start a new row.
        const ROW       = 0b0000_0010;
        /// The element roots an independent navigation container.
        const CONTAINER = 0b0000_0100;
    }
}

/// A single markable attribute of an [`Element`].
///
/// Mutation records name the attribute that changed so observers can filter
/// out changes they do not care about.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Attribute {
    /// [`Element::key`].
    Key,
    /// [`ElementFlags::DISABLED`].
    Disabled,
    /// [`Element::x`].
    ManualX,
    /// [`Element::y`].
    ManualY,
    /// [`ElementFlags::ROW`].
    Row,
    /// [`ElementFlags::CONTAINER`].
    Container,
}

impl Attribute {
    /// Attributes that correspond to a single bit in [`ElementFlags`].
    pub(crate) const FLAG_ATTRIBUTES: [(ElementFlags, Self); 3] = [
        (ElementFlags::DISABLED, Self::Disabled),
        (ElementFlags::ROW, Self::Row),
        (ElementFlags::CONTAINER, Self::Container),
    ];
}

/// Per-element marker data.
///
/// An element without a [`key`](Self::key) is a plain wrapper: scanners see
/// through it to its children.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Element {
    /// Identity of a selectable item, unique within a navigation container.
    pub key: Option<String>,
    /// Manual column override.
    pub x: Option<u32>,
    /// Manual row override.
    pub y: Option<u32>,
    /// Boolean markers.
    pub flags: ElementFlags,
}

impl Element {
    /// An unmarked wrapper element.
    pub fn wrapper() -> Self {
        Self::default()
    }

    /// A selectable item with the given identity.
    pub fn item(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            ..Self::default()
        }
    }

    /// An unmarked element that closes a row.
    pub fn row() -> Self {
        Self {
            flags: ElementFlags::ROW,
            ..Self::default()
        }
    }

    /// An element rooting an independent navigation container.
    pub fn container() -> Self {
        Self {
            flags: ElementFlags::CONTAINER,
            ..Self::default()
        }
    }

    /// Set manual coordinates.
    #[must_use]
    pub fn at(mut self, x: Option<u32>, y: Option<u32>) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Mark the element disabled.
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.flags |= ElementFlags::DISABLED;
        self
    }

    /// Returns true if the element carries [`ElementFlags::DISABLED`].
    pub fn is_disabled(&self) -> bool {
        self.flags.contains(ElementFlags::DISABLED)
    }
}
