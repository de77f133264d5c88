// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Key-to-action tables.
//!
//! A [`KeyActions`] table maps the handful of keys that drive selection
//! navigation to an [`Action`]. [`Preset`] provides the tables for common
//! layouts; build a [`KeyActions`] by hand for anything else.
//!
//! ```rust
//! use understory_selection::actions::{Action, KeyInput, Orientation, Preset};
//!
//! let keys = Preset::Grid(Orientation::Horizontal).key_actions();
//! assert_eq!(keys.action_for(KeyInput::ArrowRight), Action::GoNext);
//! assert_eq!(keys.action_for(KeyInput::ArrowDown), Action::GoNextOrthogonal);
//! ```

/// A navigation command understood by [`Session::perform`](crate::Session::perform).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    /// Next item in the current row.
    GoNext,
    /// Previous item in the current row.
    GoPrevious,
    /// Parent item.
    GoUp,
    /// First child item.
    GoDown,
    /// Same column, next row.
    GoNextOrthogonal,
    /// Same column, previous row.
    GoPreviousOrthogonal,
    /// Commit the current item as the selection.
    Select,
    /// Ignore the key.
    DoNothing,
}

/// Keys that drive selection navigation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum KeyInput {
    /// Up arrow.
    ArrowUp,
    /// Down arrow.
    ArrowDown,
    /// Left arrow.
    ArrowLeft,
    /// Right arrow.
    ArrowRight,
    /// Enter / Return.
    Enter,
    /// Space bar.
    Space,
    /// Escape.
    Escape,
}

/// Main axis of a layout.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Items flow left to right; rows stack downward.
    #[default]
    Horizontal,
    /// Items flow top to bottom; rows stack rightward.
    Vertical,
}

/// One action per navigation key.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeyActions {
    /// Action for [`KeyInput::ArrowUp`].
    pub up: Action,
    /// Action for [`KeyInput::ArrowDown`].
    pub down: Action,
    /// Action for [`KeyInput::ArrowLeft`].
    pub left: Action,
    /// Action for [`KeyInput::ArrowRight`].
    pub right: Action,
    /// Action for [`KeyInput::Enter`].
    pub enter: Action,
    /// Action for [`KeyInput::Space`].
    pub space: Action,
    /// Action for [`KeyInput::Escape`].
    pub escape: Action,
}

impl Default for KeyActions {
    /// The [`Preset::FlatAny`] table.
    fn default() -> Self {
        Preset::FlatAny.key_actions()
    }
}

impl KeyActions {
    /// Look up the action bound to `key`.
    pub const fn action_for(&self, key: KeyInput) -> Action {
        match key {
            KeyInput::ArrowUp => self.up,
            KeyInput::ArrowDown => self.down,
            KeyInput::ArrowLeft => self.left,
            KeyInput::ArrowRight => self.right,
            KeyInput::Enter => self.enter,
            KeyInput::Space => self.space,
            KeyInput::Escape => self.escape,
        }
    }

    /// Tables share their arrow bindings and differ in enter/space/escape.
    const fn arrows(up: Action, down: Action, left: Action, right: Action) -> Self {
        Self {
            up,
            down,
            left,
            right,
            enter: Action::Select,
            space: Action::Select,
            escape: Action::DoNothing,
        }
    }

    /// Bind `previous`/`next` along the main axis of `orientation` and
    /// `cross_previous`/`cross_next` along the other one.
    const fn oriented(
        orientation: Orientation,
        previous: Action,
        next: Action,
        cross_previous: Action,
        cross_next: Action,
    ) -> Self {
        match orientation {
            Orientation::Horizontal => Self::arrows(cross_previous, cross_next, previous, next),
            Orientation::Vertical => Self::arrows(previous, next, cross_previous, cross_next),
        }
    }
}

/// Ready-made [`KeyActions`] tables.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Preset {
    /// A single list; the cross-axis arrows do nothing.
    Flat(Orientation),
    /// A single list driven by either pair of arrows.
    FlatAny,
    /// A tree: cross-axis arrows leave and enter groups.
    Hierarchical(Orientation),
    /// A grid: cross-axis arrows change rows.
    Grid(Orientation),
    /// Nested grids: arrows move within a grid, space enters a group and
    /// escape leaves it.
    ThreeDimensional(Orientation),
}

impl Preset {
    /// The table for this preset.
    pub const fn key_actions(self) -> KeyActions {
        use Action::*;
        match self {
            Self::Flat(o) => KeyActions::oriented(o, GoPrevious, GoNext, DoNothing, DoNothing),
            Self::FlatAny => KeyActions::arrows(GoPrevious, GoNext, GoPrevious, GoNext),
            Self::Hierarchical(o) => KeyActions::oriented(o, GoPrevious, GoNext, GoUp, GoDown),
            Self::Grid(o) => KeyActions::oriented(
                o,
                GoPrevious,
                GoNext,
                GoPreviousOrthogonal,
                GoNextOrthogonal,
            ),
            Self::ThreeDimensional(o) => {
                let mut keys = Self::Grid(o).key_actions();
                keys.space = GoDown;
                keys.escape = GoUp;
                keys
            }
        }
    }
}

impl From<Preset> for KeyActions {
    fn from(preset: Preset) -> Self {
        preset.key_actions()
    }
}
