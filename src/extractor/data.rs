use crate::error::ExtractError;
use crate::error::ResultMessage;
use crate::extractor::selector::validate;
use crate::extractor::selector::validate_single_cell;
use crate::extractor::ConfigurationError;
use crate::extractor::Entry;
use crate::extractor::Section;
use crate::spreadsheet::grid::Grid;

/// A data entry resolved against the grid.
///
/// Static and fixed blocks hold their final value. Range blocks keep their 1-based bounds and
/// are read row by row during expansion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DataBlock {
    Static(String),
    Fixed(String),
    Range {
        /// Output column the block starts at
        col_offset: usize,
        col_count: usize,
        row_count: usize,
        min_r: usize,
        max_r: usize,
        min_c: usize,
        max_c: usize,
    },
}

/// Builds the data rows from the data entries.
///
/// Every range entry must span the same number of rows; the output has one row per spanned
/// row. Without range entries there is at most one row, made of the static and fixed values.
/// Empty cells read as `na`.
pub fn build_data(entries: &[Entry], grid: &Grid, header: &[String], na: &str) -> Result<Vec<Vec<String>>, ExtractError> {
    let mut blocks = Vec::with_capacity(entries.len());
    let mut data_columns = 0usize;
    let mut ranged_rows = 0usize;
    // Index and row count of the first range entry
    let mut first_range: Option<(usize, usize)> = None;

    for (offset, entry) in entries.iter().enumerate() {
        let index = offset + 1;
        let block = match entry {
            Entry::Static(text) => DataBlock::Static(text.trim().to_owned()),
            Entry::Fixed(selector) => {
                let range = validate_single_cell(selector, index, Section::Data)?;
                let value = grid.text(range.min_row - 1, range.min_col - 1, na)
                    .map_err(ExtractError::from)
                    .with_prefix(&format!("{} {}", Section::Data, index))?;
                DataBlock::Fixed(value)
            }
            Entry::Range(selector) => {
                let range = validate(selector, index, Section::Data, true, false)?;
                let row_count = range.row_count();
                match first_range {
                    None => first_range = Some((index, row_count)),
                    Some((first, expected)) if expected != row_count => {
                        Err(ConfigurationError::RowCountMismatch { index, first })?
                    }
                    Some(_) => (),
                }
                let block = DataBlock::Range {
                    col_offset: data_columns,
                    col_count: range.col_count(),
                    row_count,
                    min_r: range.min_row,
                    max_r: range.max_row,
                    min_c: range.min_col,
                    max_c: range.max_col,
                };
                ranged_rows += row_count;
                data_columns += range.col_count();
                blocks.push(block);
                continue;
            }
        };
        data_columns += 1;
        blocks.push(block);
    }

    let expected_rows = match first_range {
        Some((_, row_count)) if ranged_rows > 0 => row_count,
        _ => {
            // No range entries: a single row of the literal values, and no width check against the header
            let row = blocks
                .into_iter()
                .filter_map(|block| match block {
                    DataBlock::Static(value) | DataBlock::Fixed(value) => Some(value),
                    DataBlock::Range { .. } => None,
                })
                .collect::<Vec<_>>();
            return Ok(if row.is_empty() { Vec::new() } else { vec![row] });
        }
    };

    if data_columns > 0 && header.len() != data_columns {
        Err(ConfigurationError::ColumnCountMismatch {
            header: header.len(),
            data: data_columns,
        })?;
    }

    let mut rows = Vec::with_capacity(expected_rows);
    for row_offset in 0..expected_rows {
        let mut row = Vec::with_capacity(data_columns);
        for (offset, block) in blocks.iter().enumerate() {
            match block {
                DataBlock::Static(value) | DataBlock::Fixed(value) => row.push(value.to_owned()),
                DataBlock::Range { col_offset, col_count, min_r, min_c, .. } => {
                    debug_assert_eq!(row.len(), *col_offset);
                    for col in 0..*col_count {
                        let value = grid.text(min_r + row_offset - 1, min_c + col - 1, na)
                            .map_err(ExtractError::from)
                            .with_prefix(&format!("{} {}", Section::Data, offset + 1))?;
                        row.push(value);
                    }
                }
            }
        }
        rows.push(row);
    }
    Ok(rows)
}
