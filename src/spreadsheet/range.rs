use crate::spreadsheet::reference::col_to_index;
use crate::spreadsheet::reference::row_to_index;
use regex::Regex;
use thiserror::Error;

/// Errors related to Excel-style range parsing.
#[derive(Error, Debug, PartialEq)]
pub enum RangeError {
    #[error("Invalid range format '{0}'")]
    FormatError(String),
}

/// Resolves an Excel-style range ("B2:D5", "$A$1:$C$1", "A1") into its boundaries.
///
/// Returns `(min_col, min_row, max_col, max_row)`, 1-based and inclusive. Both corners must
/// name a column and a row; partial references such as "A:C" or "1:3" are rejected.
/// A single reference resolves to a one-cell range. The corners are returned as written,
/// so a reversed range like "B2:A1" yields `min_col > max_col`.
pub fn range_boundaries(value: &str) -> Result<(usize, usize, usize, usize), RangeError> {
    let pattern = Regex::new(r"^\$?([A-Z]{1,3})\$?(\d+)(:\$?([A-Z]{1,3})\$?(\d+))?$").expect("Hardcode regex pattern");
    let value = value.trim().to_ascii_uppercase();
    let error = || RangeError::FormatError(value.to_owned());
    let captures = pattern.captures(value.as_str()).ok_or_else(error)?;
    let corner = |col: usize, row: usize| -> Result<(usize, usize), RangeError> {
        let col = captures
            .get(col)
            .map(|matcher| matcher.as_str())
            .and_then(col_to_index)
            .ok_or_else(error)?;
        let row = captures
            .get(row)
            .map(|matcher| matcher.as_str())
            .and_then(row_to_index)
            .ok_or_else(error)?;
        Ok((col + 1, row + 1))
    };
    let (min_col, min_row) = corner(1, 2)?;
    let (max_col, max_row) = if captures.get(3).is_some() {
        corner(4, 5)?
    } else {
        (min_col, min_row)
    };
    Ok((min_col, min_row, max_col, max_row))
}
