// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coordinate paths and the pure algebra over them.
//!
//! A [`DeepIndex`] locates a node by descending from the root of an ordering
//! tree: the first [`Coord`] selects a cell in the root's grid, the second a
//! cell in that node's grid, and so on. The functions in this module never
//! mutate the tree; they map one index to another.
//!
//! ```rust
//! use understory_selection::{DeepIndex, Offset, OrderingNode, deep_index};
//!
//! let tree = OrderingNode::root().with_rows(vec![vec![
//!     OrderingNode::item("a"),
//!     OrderingNode::item("b").with_rows(vec![vec![OrderingNode::item("b.1")]]),
//! ]]);
//!
//! let a = DeepIndex::from_pairs(&[(0, 0)]);
//! let b = deep_index::offset(&a, &tree, Offset::Next, false).unwrap();
//! assert_eq!(b, DeepIndex::from_pairs(&[(1, 0)]));
//!
//! let inner = deep_index::down(&b, &tree).unwrap();
//! assert_eq!(deep_index::resolve(&tree, &inner).and_then(|n| n.key), Some("b.1"));
//! assert_eq!(deep_index::up(&inner), b);
//! ```

use core::fmt;

use smallvec::SmallVec;

use crate::ordering::OrderingNode;

/// A cell position within one grid level: `x` is the column, `y` the row.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    /// Column within the row.
    pub x: usize,
    /// Row within the grid.
    pub y: usize,
}

impl Coord {
    /// Create a coordinate.
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// First column of the first row.
    pub const ORIGIN: Self = Self::new(0, 0);
}

impl From<(usize, usize)> for Coord {
    fn from((x, y): (usize, usize)) -> Self {
        Self::new(x, y)
    }
}

/// A coordinate path through an ordering tree.
///
/// The empty path denotes "no selection", which resolves to the root itself.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct DeepIndex(SmallVec<[Coord; 4]>);

impl DeepIndex {
    /// The empty path.
    pub fn new() -> Self {
        Self(SmallVec::new())
    }

    /// The first cell of the root grid, `[[0, 0]]`.
    pub fn first() -> Self {
        let mut index = Self::new();
        index.push(Coord::ORIGIN);
        index
    }

    /// Build a path from `(x, y)` pairs, outermost level first.
    pub fn from_pairs(pairs: &[(usize, usize)]) -> Self {
        pairs.iter().copied().map(Coord::from).collect()
    }

    /// Number of levels.
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Returns true for the empty path.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The innermost coordinate.
    pub fn last(&self) -> Option<Coord> {
        self.0.last().copied()
    }

    /// All levels, outermost first.
    pub fn as_slice(&self) -> &[Coord] {
        &self.0
    }

    /// Iterate the levels, outermost first.
    pub fn iter(&self) -> impl Iterator<Item = Coord> + '_ {
        self.0.iter().copied()
    }

    /// Append a level.
    pub fn push(&mut self, coord: Coord) {
        self.0.push(coord);
    }

    /// Remove and return the innermost level.
    pub fn pop(&mut self) -> Option<Coord> {
        self.0.pop()
    }

    /// This path extended by one level.
    #[must_use]
    pub fn child(&self, coord: Coord) -> Self {
        let mut index = self.clone();
        index.push(coord);
        index
    }

    /// This path without its innermost level.
    #[must_use]
    pub fn parent(&self) -> Self {
        let mut index = self.clone();
        index.pop();
        index
    }
}

impl FromIterator<Coord> for DeepIndex {
    fn from_iter<I: IntoIterator<Item = Coord>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for DeepIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, c) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "[{}, {}]", c.x, c.y)?;
        }
        f.write_str("]")
    }
}

/// A path that is not a valid position in the ordering tree it was used with.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("index {index} is not a valid position in the ordering tree")]
pub struct InvalidIndex {
    /// The offending path.
    pub index: DeepIndex,
}

/// Sibling movement within the innermost grid level.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Offset {
    /// Next column in the current row, `(+1, 0)`.
    Next,
    /// Previous column in the current row, `(-1, 0)`.
    Previous,
    /// Next row, same column, `(0, +1)`.
    NextOrthogonal,
    /// Previous row, same column, `(0, -1)`.
    PreviousOrthogonal,
}

impl Offset {
    /// Movement along `(x, y)`.
    const fn steps(self) -> (Step, Step) {
        match self {
            Self::Next => (Step::Forward, Step::Stay),
            Self::Previous => (Step::Backward, Step::Stay),
            Self::NextOrthogonal => (Step::Stay, Step::Forward),
            Self::PreviousOrthogonal => (Step::Stay, Step::Backward),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Step {
    Forward,
    Backward,
    Stay,
}

/// Move `current` one step within `0..len`. `len` must be non-zero.
///
/// `Stay` only clamps, so a column carried into a shorter row lands on that
/// row's last cell.
fn step(current: usize, len: usize, step: Step, wrap: bool) -> usize {
    let last = len - 1;
    match step {
        Step::Stay => current.min(last),
        Step::Forward if current >= last => {
            if wrap {
                0
            } else {
                last
            }
        }
        Step::Forward => current + 1,
        Step::Backward if current == 0 => {
            if wrap {
                last
            } else {
                0
            }
        }
        Step::Backward => (current - 1).min(last),
    }
}

/// Resolve `index` to a node, descending level by level.
///
/// Returns `None` if any level is out of range or lands on a vacant cell.
/// The empty index resolves to `root`.
pub fn resolve<'a, K>(root: &'a OrderingNode<K>, index: &DeepIndex) -> Option<&'a OrderingNode<K>> {
    index
        .iter()
        .try_fold(root, |node, coord| node.children.get(coord))
}

/// Move the innermost level of `index` by `offset`.
///
/// The move never escapes the parent's grid. Primary moves stay within the
/// current row; orthogonal moves change row and keep the column, clamped to
/// the new row's length, stepping over empty rows. Without `wrap`, moves clamp
/// at the edges. An orthogonal move with no occupied row left in its
/// direction leaves the index unchanged, and so does an empty index.
///
/// Fails if the parent prefix does not resolve or its grid has no rows.
pub fn offset<K>(
    index: &DeepIndex,
    root: &OrderingNode<K>,
    offset: Offset,
    wrap: bool,
) -> Result<DeepIndex, InvalidIndex> {
    let Some(current) = index.last() else {
        return Ok(index.clone());
    };
    let prefix = index.parent();
    let invalid = || InvalidIndex {
        index: index.clone(),
    };
    let parent = resolve(root, &prefix).ok_or_else(invalid)?;
    let grid = &parent.children;
    if grid.row_count() == 0 {
        return Err(invalid());
    }

    let (step_x, step_y) = offset.steps();
    let rows = grid.row_count();
    let mut y = step(current.y, rows, step_y, wrap);
    if step_y != Step::Stay {
        for _ in 0..rows {
            if grid.row_len(y) > 0 {
                break;
            }
            let next = step(y, rows, step_y, wrap);
            if next == y {
                break;
            }
            y = next;
        }
    }
    let row_len = grid.row_len(y);
    if row_len == 0 {
        return Ok(index.clone());
    }
    let x = step(current.x, row_len, step_x, wrap);
    Ok(prefix.child(Coord::new(x, y)))
}

/// Move up one level.
///
/// Does nothing for paths of one level or less: there is no "up" to nothing.
pub fn up(index: &DeepIndex) -> DeepIndex {
    if index.depth() <= 1 {
        return index.clone();
    }
    index.parent()
}

/// Move down into the first child of the node at `index`.
///
/// Enters the first occupied cell of the children grid, which is `(0, 0)`
/// unless manual coordinates left it vacant. Does nothing for childless nodes.
/// Fails if `index` does not resolve.
pub fn down<K>(index: &DeepIndex, root: &OrderingNode<K>) -> Result<DeepIndex, InvalidIndex> {
    let current = resolve(root, index).ok_or_else(|| InvalidIndex {
        index: index.clone(),
    })?;
    Ok(match current.children.nearest_occupied(Coord::ORIGIN) {
        Some(first) => index.child(first),
        None => index.clone(),
    })
}

/// Repair `index` to the closest valid path in `root`.
///
/// Walks the levels from the root, clamping each coordinate into the current
/// grid (row first, then column within that row) and moving off vacant cells
/// to the nearest occupied one. The path is cut off as soon as a level has no
/// children to descend into. Valid paths are returned unchanged.
pub fn closest_valid<K>(index: &DeepIndex, root: &OrderingNode<K>) -> DeepIndex {
    let mut rebuilt = DeepIndex::new();
    let mut level = root;
    for coord in index.iter() {
        let Some(closest) = level.children.nearest_occupied(coord) else {
            break;
        };
        let Some(next) = level.children.get(closest) else {
            break;
        };
        rebuilt.push(closest);
        level = next;
    }
    rebuilt
}

/// Returns true if `index` resolves against `root`.
pub fn is_valid<K>(index: &DeepIndex, root: &OrderingNode<K>) -> bool {
    resolve(root, index).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn idx(pairs: &[(usize, usize)]) -> DeepIndex {
        DeepIndex::from_pairs(pairs)
    }

    fn flat() -> OrderingNode<&'static str> {
        OrderingNode::root().with_rows(vec![vec![
            OrderingNode::item("a"),
            OrderingNode::item("b"),
        ]])
    }

    fn nested() -> OrderingNode<&'static str> {
        OrderingNode::root().with_rows(vec![vec![
            OrderingNode::item("a").with_rows(vec![vec![
                OrderingNode::item("i"),
                OrderingNode::item("ii"),
            ]]),
            OrderingNode::item("b").with_rows(vec![vec![
                OrderingNode::item("iii"),
                OrderingNode::item("iv").with_rows(vec![vec![OrderingNode::item("1")]]),
            ]]),
        ]])
    }

    fn three_dimensional() -> OrderingNode<&'static str> {
        OrderingNode::root().with_rows(vec![
            vec![
                OrderingNode::item("a1").with_rows(vec![
                    vec![OrderingNode::item("a1i"), OrderingNode::item("a1ii")],
                    vec![OrderingNode::item("a1j"), OrderingNode::item("a1jj")],
                ]),
                OrderingNode::item("a2").with_rows(vec![vec![
                    OrderingNode::item("a2i"),
                    OrderingNode::item("a2ii").with_rows(vec![vec![OrderingNode::item("a2iiX")]]),
                ]]),
            ],
            vec![
                OrderingNode::item("b1").with_rows(vec![
                    vec![OrderingNode::item("b1i"), OrderingNode::item("b1ii")],
                    vec![OrderingNode::item("b1j")],
                ]),
                OrderingNode::item("b2"),
            ],
        ])
    }

    fn key_at(tree: &OrderingNode<&'static str>, index: &DeepIndex) -> Option<&'static str> {
        resolve(tree, index).and_then(|n| n.key)
    }

    #[test]
    fn resolve_descends_rows_then_columns() {
        let tree = three_dimensional();
        assert_eq!(key_at(&tree, &idx(&[(1, 0)])), Some("a2"));
        assert_eq!(key_at(&tree, &idx(&[(0, 1)])), Some("b1"));
        assert_eq!(key_at(&tree, &idx(&[(0, 1), (0, 1)])), Some("b1j"));
        assert_eq!(key_at(&tree, &idx(&[(1, 0), (1, 0), (0, 0)])), Some("a2iiX"));
        assert!(resolve(&tree, &idx(&[(2, 0)])).is_none());
        assert!(resolve(&tree, &idx(&[(0, 1), (1, 1)])).is_none());
        assert!(resolve(&tree, &DeepIndex::new()).is_some_and(|n| n.key.is_none()));
    }

    #[test]
    fn offset_advances_in_a_flat_structure() {
        assert_eq!(offset(&idx(&[(0, 0)]), &flat(), Offset::Next, false), Ok(idx(&[(1, 0)])));
        assert_eq!(offset(&idx(&[(1, 0)]), &flat(), Offset::Previous, false), Ok(idx(&[(0, 0)])));
    }

    #[test]
    fn offset_wraps() {
        assert_eq!(offset(&idx(&[(1, 0)]), &flat(), Offset::Next, true), Ok(idx(&[(0, 0)])));
        assert_eq!(offset(&idx(&[(0, 0)]), &flat(), Offset::Previous, true), Ok(idx(&[(1, 0)])));
    }

    #[test]
    fn offset_clamps_without_wrap() {
        assert_eq!(offset(&idx(&[(1, 0)]), &flat(), Offset::Next, false), Ok(idx(&[(1, 0)])));
        assert_eq!(offset(&idx(&[(0, 0)]), &flat(), Offset::Previous, false), Ok(idx(&[(0, 0)])));
    }

    #[test]
    fn offset_ignores_nested_items() {
        assert_eq!(offset(&idx(&[(0, 0)]), &nested(), Offset::Next, false), Ok(idx(&[(1, 0)])));
        // Moving inside a group stays inside it.
        assert_eq!(
            offset(&idx(&[(1, 0), (1, 0)]), &nested(), Offset::Next, true),
            Ok(idx(&[(1, 0), (0, 0)]))
        );
    }

    #[test]
    fn orthogonal_offset_keeps_column_and_clamps_to_shorter_rows() {
        let tree = three_dimensional();
        // a1i -> a1j
        assert_eq!(
            offset(&idx(&[(0, 0), (0, 0)]), &tree, Offset::NextOrthogonal, false),
            Ok(idx(&[(0, 0), (0, 1)]))
        );
        // b1ii -> b1j (row 1 of b1 has a single column)
        assert_eq!(
            offset(&idx(&[(0, 1), (1, 0)]), &tree, Offset::NextOrthogonal, false),
            Ok(idx(&[(0, 1), (0, 1)]))
        );
        // a2 -> b2 at the root level
        assert_eq!(
            offset(&idx(&[(1, 0)]), &tree, Offset::NextOrthogonal, false),
            Ok(idx(&[(1, 1)]))
        );
        // Clamped at the last row, wraps back to the first.
        assert_eq!(
            offset(&idx(&[(1, 1)]), &tree, Offset::NextOrthogonal, false),
            Ok(idx(&[(1, 1)]))
        );
        assert_eq!(
            offset(&idx(&[(1, 1)]), &tree, Offset::NextOrthogonal, true),
            Ok(idx(&[(1, 0)]))
        );
    }

    #[test]
    fn orthogonal_offset_steps_over_empty_rows() {
        // row 0: [a, b]
        // row 1: []
        // row 2: []
        // row 3: [c]
        let tree = OrderingNode::root().with_rows(vec![
            vec![OrderingNode::item("a"), OrderingNode::item("b")],
            vec![],
            vec![],
            vec![OrderingNode::item("c")],
        ]);
        assert_eq!(
            offset(&idx(&[(1, 0)]), &tree, Offset::NextOrthogonal, false),
            Ok(idx(&[(0, 3)]))
        );
        assert_eq!(
            offset(&idx(&[(0, 3)]), &tree, Offset::PreviousOrthogonal, false),
            Ok(idx(&[(0, 0)]))
        );
        // Wrapping also skips the gap.
        assert_eq!(
            offset(&idx(&[(0, 3)]), &tree, Offset::NextOrthogonal, true),
            Ok(idx(&[(0, 0)]))
        );
        assert_eq!(
            offset(&idx(&[(0, 0)]), &tree, Offset::PreviousOrthogonal, true),
            Ok(idx(&[(0, 3)]))
        );
        // Primary moves are unaffected.
        assert_eq!(offset(&idx(&[(0, 3)]), &tree, Offset::Next, false), Ok(idx(&[(0, 3)])));
    }

    #[test]
    fn orthogonal_offset_stops_before_trailing_empty_rows() {
        let tree = OrderingNode::root().with_rows(vec![vec![OrderingNode::item("a")], vec![]]);
        assert_eq!(
            offset(&idx(&[(0, 0)]), &tree, Offset::NextOrthogonal, false),
            Ok(idx(&[(0, 0)]))
        );
        assert_eq!(
            offset(&idx(&[(0, 0)]), &tree, Offset::NextOrthogonal, true),
            Ok(idx(&[(0, 0)]))
        );
    }

    #[test]
    fn offset_rejects_unresolvable_parents() {
        let err = offset(&idx(&[(5, 0), (0, 0)]), &nested(), Offset::Next, false).unwrap_err();
        assert_eq!(err.index, idx(&[(5, 0), (0, 0)]));
        // A leaf has no rows to move within.
        assert!(offset(&idx(&[(0, 0), (0, 0), (0, 0)]), &nested(), Offset::Next, false).is_err());
        // The empty index has nothing to move.
        assert_eq!(offset(&DeepIndex::new(), &nested(), Offset::Next, true), Ok(DeepIndex::new()));
    }

    #[test]
    fn up_goes_upward_but_not_too_far() {
        assert_eq!(up(&idx(&[(0, 0), (1, 0)])), idx(&[(0, 0)]));
        assert_eq!(up(&idx(&[(1, 0)])), idx(&[(1, 0)]));
        assert_eq!(up(&DeepIndex::new()), DeepIndex::new());
    }

    #[test]
    fn down_enters_first_child_or_stays() {
        assert_eq!(down(&idx(&[(1, 0)]), &nested()), Ok(idx(&[(1, 0), (0, 0)])));
        assert_eq!(down(&idx(&[(0, 0), (1, 0)]), &nested()), Ok(idx(&[(0, 0), (1, 0)])));
        assert!(down(&idx(&[(3, 3)]), &nested()).is_err());
    }

    #[test]
    fn closest_valid_keeps_valid_paths() {
        let tree = nested();
        let deep = idx(&[(1, 0), (1, 0), (0, 0)]);
        assert_eq!(closest_valid(&deep, &tree), deep);
        assert_eq!(closest_valid(&idx(&[(1, 0), (1, 0)]), &tree), idx(&[(1, 0), (1, 0)]));
    }

    #[test]
    fn closest_valid_clamps_and_truncates() {
        let tree = nested();
        // Past the end of the root row.
        assert_eq!(closest_valid(&idx(&[(4, 0)]), &tree), idx(&[(1, 0)]));
        // Missing row clamps to the last row.
        assert_eq!(closest_valid(&idx(&[(0, 3)]), &tree), idx(&[(0, 0)]));
        // Descending past a leaf cuts the path off.
        assert_eq!(
            closest_valid(&idx(&[(0, 0), (0, 0), (2, 2)]), &tree),
            idx(&[(0, 0), (0, 0)])
        );
        // Nothing to select in an empty tree.
        let empty: OrderingNode<&str> = OrderingNode::root();
        assert_eq!(closest_valid(&idx(&[(1, 0)]), &empty), DeepIndex::new());
    }

    #[test]
    fn display_matches_nested_pairs() {
        assert_eq!(alloc::format!("{}", idx(&[(1, 0), (0, 2)])), "[[1, 0], [0, 2]]");
        assert_eq!(alloc::format!("{}", DeepIndex::new()), "[]");
    }
}
