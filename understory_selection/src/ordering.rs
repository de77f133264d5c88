// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ordering trees: the logical topology discovered by a scan.

use alloc::vec::Vec;

use crate::deep_index::Coord;

/// One selectable item's position in the navigation topology.
///
/// The synthetic root of an ordering tree has no key. Every other node
/// corresponds to exactly one scanned element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderingNode<K> {
    /// Identity of the item, `None` only for the root.
    pub key: Option<K>,
    /// Whether the item may become the committed selection.
    pub disabled: bool,
    /// Nested items, laid out in rows.
    pub children: Grid<K>,
}

impl<K> OrderingNode<K> {
    /// An empty root node.
    pub fn root() -> Self {
        Self {
            key: None,
            disabled: false,
            children: Grid::new(),
        }
    }

    /// A childless item node.
    pub fn item(key: K) -> Self {
        Self {
            key: Some(key),
            disabled: false,
            children: Grid::new(),
        }
    }

    /// Replace the children with dense rows.
    #[must_use]
    pub fn with_rows(mut self, rows: Vec<Vec<Self>>) -> Self {
        self.children = Grid::from_rows(rows);
        self
    }

    /// Mark the node disabled.
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Returns true if at least one child cell is occupied.
    pub fn has_children(&self) -> bool {
        self.children.has_items()
    }
}

/// Two-dimensional layout of sibling items.
///
/// Rows are stacked on top of one another; `y` picks the row and `x` the
/// column within it. A flat list is a single row. Manual coordinates can
/// leave gaps, which show up as empty rows or vacant cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid<K> {
    rows: Vec<Vec<Option<OrderingNode<K>>>>,
}

impl<K> Default for Grid<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Grid<K> {
    /// An empty grid.
    pub const fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Build a dense grid from rows of nodes.
    pub fn from_rows(rows: Vec<Vec<OrderingNode<K>>>) -> Self {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Some).collect())
                .collect(),
        }
    }

    /// Number of rows, including empty ones.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of cells in row `y`, including vacant ones; zero for missing rows.
    pub fn row_len(&self, y: usize) -> usize {
        self.rows.get(y).map_or(0, Vec::len)
    }

    /// The node at `coord`, if that cell exists and is occupied.
    pub fn get(&self, coord: Coord) -> Option<&OrderingNode<K>> {
        self.rows.get(coord.y)?.get(coord.x)?.as_ref()
    }

    /// Returns true if any cell is occupied.
    pub fn has_items(&self) -> bool {
        self.rows.iter().flatten().any(Option::is_some)
    }

    /// Number of occupied cells.
    pub fn len(&self) -> usize {
        self.rows.iter().flatten().filter(|c| c.is_some()).count()
    }

    /// Returns true if no cell is occupied.
    pub fn is_empty(&self) -> bool {
        !self.has_items()
    }

    /// Iterate occupied cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, &OrderingNode<K>)> + '_ {
        self.rows.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter_map(move |(x, cell)| cell.as_ref().map(|n| (Coord::new(x, y), n)))
        })
    }

    /// The occupied cell closest to `target`.
    ///
    /// The row is clamped first. Within a row, the nearest column wins, ties
    /// going to the lower column. If the clamped row has no occupied cell, the
    /// nearest rows above and below are tried, the upper one first on ties.
    pub fn nearest_occupied(&self, target: Coord) -> Option<Coord> {
        let last_row = self.rows.len().checked_sub(1)?;
        let y = target.y.min(last_row);
        for distance in 0..=last_row {
            let above = y.checked_sub(distance);
            let below = (distance > 0).then_some(y + distance);
            for candidate in [above, below].into_iter().flatten() {
                if let Some(x) = self.nearest_in_row(candidate, target.x) {
                    return Some(Coord::new(x, candidate));
                }
            }
        }
        None
    }

    fn nearest_in_row(&self, y: usize, x: usize) -> Option<usize> {
        let row = self.rows.get(y)?;
        let last = row.len().checked_sub(1)?;
        let x = x.min(last);
        for distance in 0..=last {
            let before = x.checked_sub(distance);
            let after = (distance > 0).then_some(x + distance);
            for candidate in [before, after].into_iter().flatten() {
                if row.get(candidate).is_some_and(Option::is_some) {
                    return Some(candidate);
                }
            }
        }
        None
    }

    /// Place `node` at `coord`, growing the grid with empty rows and vacant
    /// cells as needed. Returns the node previously in that cell.
    ///
    /// The grid is dense, so callers bound `coord` (the scanner caps manual
    /// coordinates at [`ScanOptions::max_coordinate`]).
    ///
    /// [`ScanOptions::max_coordinate`]: crate::scan::ScanOptions::max_coordinate
    pub(crate) fn place(&mut self, coord: Coord, node: OrderingNode<K>) -> Option<OrderingNode<K>> {
        if self.rows.len() <= coord.y {
            self.rows.resize_with(coord.y + 1, Vec::new);
        }
        let row = &mut self.rows[coord.y];
        if row.len() <= coord.x {
            row.resize_with(coord.x + 1, || None);
        }
        row[coord.x].replace(node)
    }

    /// Vacate the cell at `coord`, returning its node.
    pub(crate) fn take(&mut self, coord: Coord) -> Option<OrderingNode<K>> {
        self.rows.get_mut(coord.y)?.get_mut(coord.x)?.take()
    }

    /// Make sure row `y` exists, even if nothing is ever placed in it.
    pub(crate) fn ensure_row(&mut self, y: usize) {
        if self.rows.len() <= y {
            self.rows.resize_with(y + 1, Vec::new);
        }
    }
}
