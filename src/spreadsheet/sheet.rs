use crate::spreadsheet::cell::Cell;
use crate::spreadsheet::grid::Grid;

/// Cells collected from one sheet of a spreadsheet file, in reading order.
pub(crate) struct Sheet {
    /// Source file name
    pub(crate) file_name: String,
    /// Sheet name
    pub(crate) name: String,
    /// All non-empty cells in the sheet
    pub(crate) cells: Vec<Cell>,
    /// Last used row and column (0-based), `None` until the first cell arrives
    pub(crate) row_upper_bound: Option<usize>,
    pub(crate) col_upper_bound: Option<usize>,
}

impl Sheet {
    pub(super) fn new(file_name: &str, name: &str) -> Self {
        Self {
            file_name: file_name.to_owned(),
            name: name.to_owned(),
            cells: Vec::new(),
            row_upper_bound: None,
            col_upper_bound: None,
        }
    }

    /// Adds a cell to the sheet, growing the used area.
    pub(super) fn push(&mut self, cell: Cell) {
        self.update_bound(cell.row, cell.col);
        self.cells.push(cell);
    }

    fn update_bound(&mut self, row: usize, col: usize) {
        if self.row_upper_bound.map(|row_upper_bound| row_upper_bound < row).unwrap_or(true) {
            self.row_upper_bound = Some(row);
        }
        if self.col_upper_bound.map(|col_upper_bound| col_upper_bound < col).unwrap_or(true) {
            self.col_upper_bound = Some(col);
        }
    }

    /// Materialises the sheet as a grid spanning A1 to the last used cell.
    pub(crate) fn into_grid(self) -> Grid {
        let rows = self.row_upper_bound.map(|row| row + 1).unwrap_or(0);
        let cols = self.col_upper_bound.map(|col| col + 1).unwrap_or(0);
        let mut grid = Grid::with_size(rows, cols);
        for cell in &self.cells {
            grid.set(cell.row, cell.col, cell.to_string());
        }
        grid
    }
}

#[cfg(test)]
mod tests {
    use crate::spreadsheet::cell::Cell;
    use crate::spreadsheet::cell::CellType;
    use crate::spreadsheet::sheet::Sheet;

    fn push(sheet: &mut Sheet, row: usize, col: usize, value: &str) {
        sheet.push(Cell {
            row,
            col,
            kind: CellType::InlineString,
            value: value.to_owned(),
        });
    }

    #[test]
    fn sheet_initial() {
        let sheet = Sheet::new("book.xlsx", "Sheet1");

        assert_eq!(sheet.row_upper_bound, None);
        assert_eq!(sheet.col_upper_bound, None);
        let grid = sheet.into_grid();
        assert_eq!((grid.rows(), grid.cols()), (0, 0));
    }

    #[test]
    fn sheet_update() {
        let mut sheet = Sheet::new("book.xlsx", "Sheet1");
        push(&mut sheet, 1, 3, "b");
        push(&mut sheet, 3, 1, "c");
        push(&mut sheet, 2, 2, "d");

        assert_eq!(sheet.cells.len(), 3);
        assert_eq!(sheet.row_upper_bound, Some(3));
        assert_eq!(sheet.col_upper_bound, Some(3));
    }

    #[test]
    fn grid_is_anchored_at_a1() {
        let mut sheet = Sheet::new("book.xlsx", "Sheet1");
        push(&mut sheet, 1, 1, "x");
        push(&mut sheet, 2, 0, "y");
        let grid = sheet.into_grid();

        assert_eq!((grid.rows(), grid.cols()), (3, 2));
        assert_eq!(grid.get(0, 0), Ok(None));
        assert_eq!(grid.get(1, 1), Ok(Some("x")));
        assert_eq!(grid.get(2, 0), Ok(Some("y")));
    }

    #[test]
    fn out_of_range_date_keeps_raw_value() {
        let mut sheet = Sheet::new("book.xlsx", "Sheet1");
        push(&mut sheet, 0, 0, "x");
        sheet.push(Cell {
            row: 0,
            col: 1,
            kind: CellType::NumberDate1900,
            value: "1e12".to_owned(),
        });
        let grid = sheet.into_grid();

        assert_eq!(grid.get(0, 0), Ok(Some("x")));
        assert_eq!(grid.get(0, 1), Ok(Some("1e12")));
    }
}
