use crate::spreadsheet::reference::index_to_reference;
use thiserror::Error;

/// Errors raised when reading from a [`Grid`].
#[derive(Error, Debug, PartialEq)]
pub enum GridError {
    #[error("Cell {reference} is outside the sheet ({rows} rows x {cols} columns)")]
    OutOfBounds {
        reference: String,
        rows: usize,
        cols: usize,
    },
}

/// An immutable, rectangular snapshot of one sheet, anchored at cell A1.
///
/// Cells are addressed `(row, col)`, 0-based. `None` marks an empty cell; empty strings are
/// normalised to `None` on construction so both read the same way.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Option<String>>,
}

impl Grid {
    /// Builds a grid from row vectors. Short rows are padded with empty cells up to the widest row.
    pub fn from_rows(rows: Vec<Vec<Option<String>>>) -> Self {
        let cols = rows.iter().map(Vec::len).max().unwrap_or(0);
        let height = rows.len();
        let mut cells = Vec::with_capacity(height * cols);
        for row in rows {
            let width = row.len();
            cells.extend(row.into_iter().map(|value| value.filter(|value| !value.is_empty())));
            cells.extend(std::iter::repeat(None).take(cols - width));
        }
        Grid {
            rows: height,
            cols,
            cells,
        }
    }

    /// Creates an empty grid of the given size.
    pub(crate) fn with_size(rows: usize, cols: usize) -> Self {
        Grid {
            rows,
            cols,
            cells: vec![None; rows * cols],
        }
    }

    /// Stores a value; positions outside the grid are ignored.
    pub(crate) fn set(&mut self, row: usize, col: usize, value: String) {
        if row < self.rows && col < self.cols {
            self.cells[row * self.cols + col] = Some(value).filter(|value| !value.is_empty());
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Reads the cell at `(row, col)`; `Ok(None)` is an empty cell, `Err` a position outside the grid.
    pub fn get(&self, row: usize, col: usize) -> Result<Option<&str>, GridError> {
        if row < self.rows && col < self.cols {
            Ok(self.cells[row * self.cols + col].as_deref())
        } else {
            Err(GridError::OutOfBounds {
                reference: index_to_reference(row, col),
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    /// Reads the cell at `(row, col)` as text, substituting `empty` for an empty cell.
    pub fn text(&self, row: usize, col: usize, empty: &str) -> Result<String, GridError> {
        Ok(self.get(row, col)?.unwrap_or(empty).to_owned())
    }
}
