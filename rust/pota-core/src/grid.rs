//! Sparse, self-modifiable program grid.
//!
//! Cells map `(x, y)` to a single character; a missing cell reads as a
//! space. Besides the cells themselves the grid keeps, for every row, the
//! rightmost occupied column and, for every column, the bottommost occupied
//! row. Wrap-around uses these per-row and per-column bounds rather than a
//! global rectangle, so ragged programs wrap at their own edges.

use std::collections::{BTreeSet, HashMap};

pub const BLANK: char = ' ';

/// Marker on the first line of a script that is stripped before layout.
const DIRECTIVE_MARKER: &str = "#!";

#[derive(Debug, Default, Clone)]
pub struct Grid {
    cells: HashMap<(i64, i64), char>,
    /// Occupied x coordinates per row.
    rows: HashMap<i64, BTreeSet<i64>>,
    /// Occupied y coordinates per column.
    columns: HashMap<i64, BTreeSet<i64>>,
    row_bounds: HashMap<i64, i64>,
    column_bounds: HashMap<i64, i64>,
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lay out program text: line `y`, character `x`. A leading `#!` line
    /// is discarded and spaces are never stored.
    pub fn parse(source: &str) -> Self {
        let mut grid = Self::new();
        let mut lines = source.lines().peekable();
        if lines
            .peek()
            .is_some_and(|first| first.starts_with(DIRECTIVE_MARKER))
        {
            lines.next();
        }
        for (y, line) in lines.enumerate() {
            for (x, ch) in line.chars().enumerate() {
                grid.set(x as i64, y as i64, ch);
            }
        }
        grid
    }

    pub fn get(&self, x: i64, y: i64) -> char {
        self.cells.get(&(x, y)).copied().unwrap_or(BLANK)
    }

    /// Store `ch` at `(x, y)`; storing a blank deletes the cell.
    pub fn set(&mut self, x: i64, y: i64, ch: char) {
        if ch == BLANK {
            self.remove(x, y);
            return;
        }
        self.cells.insert((x, y), ch);
        self.rows.entry(y).or_default().insert(x);
        self.columns.entry(x).or_default().insert(y);
        let row_bound = self.row_bounds.entry(y).or_insert(0);
        if *row_bound < x {
            *row_bound = x;
        }
        let column_bound = self.column_bounds.entry(x).or_insert(0);
        if *column_bound < y {
            *column_bound = y;
        }
    }

    fn remove(&mut self, x: i64, y: i64) {
        if self.cells.remove(&(x, y)).is_none() {
            return;
        }
        if let Some(row) = self.rows.get_mut(&y) {
            row.remove(&x);
            if self.row_bounds.get(&y) == Some(&x) {
                let bound = row.last().copied().unwrap_or(0).max(0);
                self.row_bounds.insert(y, bound);
            }
            if row.is_empty() {
                self.rows.remove(&y);
                self.row_bounds.remove(&y);
            }
        }
        if let Some(column) = self.columns.get_mut(&x) {
            column.remove(&y);
            if self.column_bounds.get(&x) == Some(&y) {
                let bound = column.last().copied().unwrap_or(0).max(0);
                self.column_bounds.insert(x, bound);
            }
            if column.is_empty() {
                self.columns.remove(&x);
                self.column_bounds.remove(&x);
            }
        }
    }

    /// Rightmost occupied column of row `y`, or 0.
    pub fn row_bound(&self, y: i64) -> i64 {
        self.row_bounds.get(&y).copied().unwrap_or(0)
    }

    /// Bottommost occupied row of column `x`, or 0.
    pub fn column_bound(&self, x: i64) -> i64 {
        self.column_bounds.get(&x).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
