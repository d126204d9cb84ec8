//! Read-only cell access shared by every kind of input table.

use std::collections::BTreeMap;

use crate::model::CellValue;

/// A two-dimensional grid of cells addressed by `(row, column)`, both
/// starting at 1.
pub trait TabularSource {
    /// Returns the value stored at the given coordinate, or
    /// [`CellValue::Empty`] when the cell lies outside the populated area.
    fn cell(&self, row: u32, column: u32) -> CellValue;
}

impl<T: TabularSource + ?Sized> TabularSource for &T {
    fn cell(&self, row: u32, column: u32) -> CellValue {
        (**self).cell(row, column)
    }
}

/// Sparse in-memory table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    cells: BTreeMap<(u32, u32), CellValue>,
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a value at `(row, column)`. Writing [`CellValue::Empty`] clears
    /// the cell.
    pub fn set(&mut self, row: u32, column: u32, value: CellValue) {
        if value == CellValue::Empty {
            self.cells.remove(&(row, column));
        } else {
            self.cells.insert((row, column), value);
        }
    }

    pub fn with(mut self, row: u32, column: u32, value: CellValue) -> Self {
        self.set(row, column, value);
        self
    }

    pub fn with_text(self, row: u32, column: u32, value: &str) -> Self {
        self.with(row, column, CellValue::Text(value.to_string()))
    }

    pub fn with_int(self, row: u32, column: u32, value: i64) -> Self {
        self.with(row, column, CellValue::Int(value))
    }
}

impl TabularSource for Grid {
    fn cell(&self, row: u32, column: u32) -> CellValue {
        self.cells
            .get(&(row, column))
            .cloned()
            .unwrap_or(CellValue::Empty)
    }
}
