//! # Spreadsheet Module
//!
//! Reads spreadsheet files into in-memory [`grid::Grid`]s. Office Open XML workbooks
//! (`.xlsx`, `.xlsm`, `.xlam`) and OpenDocument spreadsheets (`.ods`) are supported; the
//! format is chosen from the file extension.
use crate::error::ExtractError;
use serde::Deserialize;
use std::ffi::OsStr;
use std::fmt::Display;
use std::path::Path;
use thiserror::Error;

pub(crate) mod cell;
mod excel;
pub mod grid;
pub mod loader;
pub mod ods;
pub mod range;
pub(crate) mod reference;
pub(crate) mod sheet;
pub(crate) mod xlsx;

use crate::spreadsheet::ods::OdsSpreadsheet;
use crate::spreadsheet::sheet::Sheet;
use crate::spreadsheet::xlsx::XlsxSpreadsheet;

/// Errors raised while opening a spreadsheet file or reading one of its sheets.
#[derive(Error, Debug)]
pub enum SpreadsheetError {
    #[error("Cannot detect file format for '{0}'")]
    UnsupportedFormat(String),

    #[error("Spreadsheet '{0}' is password protected")]
    PasswordProtected(String),

    #[error("Spreadsheet '{0}' contains no sheets")]
    SpreadsheetEmpty(String),

    #[error("Missing part '{0}' in spreadsheet")]
    FileError(String),

    #[error("Sheet {1} not found in '{0}'")]
    SheetNotFound(String, String),

    #[error("Invalid cell value in '{0}' sheet '{1}' at {2}: {3}")]
    CellValueError(String, String, String, String),

    #[error("Sheet '{1}' in '{0}' repeats cells past {2} rows x {3} columns")]
    SheetTooLarge(String, String, usize, usize),
}

/// Identifies the sheet to read: by name, or by 0-based position in the workbook.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum SheetSelector {
    Index(usize),
    Name(String),
}

impl SheetSelector {
    /// True for a blank sheet name; an index is never empty.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Index(_) => false,
            Self::Name(name) => name.trim().is_empty(),
        }
    }
}

impl Display for SheetSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Index(index) => write!(f, "#{}", index),
            Self::Name(name) => write!(f, "'{}'", name),
        }
    }
}

impl From<&str> for SheetSelector {
    fn from(name: &str) -> Self {
        Self::Name(name.to_owned())
    }
}

/// Common interface over the supported spreadsheet formats.
pub(crate) trait Spreadsheet {
    /// Returns the file name of this spreadsheet
    fn name(&self) -> String;

    /// Returns the sheet names in workbook order
    fn sheet_names(&self) -> Vec<String>;

    /// Reads every non-empty cell of the named sheet
    fn read_sheet(&mut self, sheet_name: &str) -> Result<Sheet, ExtractError>;
}

/// Opens a spreadsheet file with the reader matching its extension.
pub(crate) fn open_spreadsheet(file_name: &str) -> Result<Box<dyn Spreadsheet>, ExtractError> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(OsStr::to_str)
        .map(|extension| extension.to_ascii_lowercase());
    match extension.as_deref() {
        Some("xlsx") | Some("xlsm") | Some("xlam") => Ok(Box::new(XlsxSpreadsheet::open(file_name)?)),
        Some("ods") => Ok(Box::new(OdsSpreadsheet::open(file_name)?)),
        _ => Err(SpreadsheetError::UnsupportedFormat(file_name.to_owned()))?,
    }
}
