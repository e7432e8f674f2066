use crate::error::ExtractError;
use crate::error::ResultMessage;
use crate::spreadsheet::grid::Grid;
use crate::spreadsheet::open_spreadsheet;
use crate::spreadsheet::SheetSelector;
use crate::spreadsheet::SpreadsheetError;

/// Source of grids for the extractor.
///
/// The extractor only ever asks for one sheet of one source, so anything able to produce a
/// [`Grid`] for a `(source, sheet)` pair can stand in for a real workbook.
pub trait GridLoader {
    fn load_grid(&self, source: &str, sheet: &SheetSelector) -> Result<Grid, ExtractError>;
}

impl<T: GridLoader + ?Sized> GridLoader for &T {
    fn load_grid(&self, source: &str, sheet: &SheetSelector) -> Result<Grid, ExtractError> {
        (**self).load_grid(source, sheet)
    }
}

/// Loads grids from `.xlsx`/`.xlsm`/`.xlam` and `.ods` files on disk.
#[derive(Clone, Copy, Debug, Default)]
pub struct WorkbookLoader;

impl GridLoader for WorkbookLoader {
    fn load_grid(&self, source: &str, sheet: &SheetSelector) -> Result<Grid, ExtractError> {
        let mut spreadsheet = open_spreadsheet(source).with_prefix(&format!("Cannot open '{source}'"))?;
        let sheet_name = match sheet {
            SheetSelector::Name(name) => name.to_owned(),
            SheetSelector::Index(index) => spreadsheet
                .sheet_names()
                .get(*index)
                .cloned()
                .ok_or_else(|| SpreadsheetError::SheetNotFound(spreadsheet.name(), sheet.to_string()))?,
        };
        tracing::debug!(source, sheet = %sheet_name, "reading sheet");
        let grid = spreadsheet.read_sheet(&sheet_name)?.into_grid();
        tracing::debug!(rows = grid.rows(), cols = grid.cols(), "sheet loaded");
        Ok(grid)
    }
}
