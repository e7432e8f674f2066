//! # Extractor Module
//!
//! Turns one sheet of a spreadsheet into a header row plus data rows, driven by a
//! [`Config`] of header and data entries.
//!
//! An extraction runs in three steps:
//!
//! 1. the configured entries are checked and converted into [`Entry`] values, before any file is opened;
//! 2. the sheet is loaded into a [`Grid`] through a [`GridLoader`];
//! 3. header blocks and the final header are built, then the data rows, which are checked
//!    against the header width.
//!
//! Every failure aborts the run; nothing is written for a failed run.
use crate::error::ExtractError;
use crate::spreadsheet::grid::Grid;
use crate::spreadsheet::loader::GridLoader;
use crate::spreadsheet::loader::WorkbookLoader;
use std::fmt::Display;
use thiserror::Error;

pub mod config;
mod data;
mod header;
pub mod job;
mod selector;
pub mod writer;

pub use crate::extractor::config::Config;
pub use crate::extractor::config::Entry;
pub use crate::extractor::data::build_data;
pub use crate::extractor::data::DataBlock;
pub use crate::extractor::header::build_header;
pub use crate::extractor::header::HeaderBlock;
pub use crate::extractor::selector::validate;
pub use crate::extractor::selector::ResolvedRange;

/// Configuration section an entry belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Section {
    Header,
    Data,
}

impl Section {
    /// Word used for the entries of this section in kind errors.
    fn entries(&self) -> &'static str {
        match self {
            Section::Header => "entries",
            Section::Data => "descriptions",
        }
    }
}

impl Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Section::Header => write!(f, "Header"),
            Section::Data => write!(f, "Data"),
        }
    }
}

/// The rule a selector broke.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectorRule {
    MissingDelimiter,
    InvalidFormat,
    InvalidOrder,
    SingleCellNotAllowed,
    MustBeSingleRow,
    MustBeSingleCell,
}

impl Display for SelectorRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            SelectorRule::MissingDelimiter => "Must contain ':'",
            SelectorRule::InvalidFormat => "Invalid format",
            SelectorRule::InvalidOrder => "Invalid order",
            SelectorRule::SingleCellNotAllowed => "Single cell not allowed",
            SelectorRule::MustBeSingleRow => "Must be single row",
            SelectorRule::MustBeSingleCell => "Must be single cell",
        };
        write!(f, "{}", message)
    }
}

/// Malformed configuration, bad selectors and header/data shape mismatches.
///
/// Entry indexes are 1-based, as the operator counts them in the configuration file.
#[derive(Error, Debug, PartialEq)]
pub enum ConfigurationError {
    #[error("Configuration key '{0}' is missing or empty")]
    MissingKey(&'static str),

    #[error("{section} {index}: {section} {} must be static/fixed/range", .section.entries())]
    EntryKind { section: Section, index: usize },

    #[error("{section} {index} / {key}: Must be a string")]
    NotAString {
        section: Section,
        index: usize,
        key: &'static str,
    },

    #[error("{section} {index} / selector: Cannot be null or empty")]
    EmptySelector { section: Section, index: usize },

    #[error("{section} {index} / selector '{selector}': {rule}")]
    InvalidSelector {
        section: Section,
        index: usize,
        selector: String,
        rule: SelectorRule,
    },

    #[error("Data {index}: Data rows count differs to Data {first}")]
    RowCountMismatch { index: usize, first: usize },

    #[error("Header / Data Column missmatch {header} vs {data}")]
    ColumnCountMismatch { header: usize, data: usize },
}

/// Result of one extraction: the final header and the data rows, in output order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Extraction {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Runs extractions against grids produced by a [`GridLoader`].
pub struct Extractor<L: GridLoader> {
    loader: L,
}

impl<L: GridLoader> Extractor<L> {
    pub fn new(loader: L) -> Self {
        Self { loader }
    }

    /// Extracts the header and data rows described by `config`.
    pub fn extract(&self, config: &Config) -> Result<Extraction, ExtractError> {
        let source = config.source
            .as_deref()
            .filter(|source| !source.is_empty())
            .ok_or(ConfigurationError::MissingKey("source"))?;
        let sheet = config.sheet
            .as_ref()
            .filter(|sheet| !sheet.is_empty())
            .ok_or(ConfigurationError::MissingKey("sheet"))?;
        if config.headers.is_empty() {
            Err(ConfigurationError::MissingKey("headers"))?;
        }
        let headers = config.header_entries()?;
        let data = config.data_entries()?;

        tracing::info!(source, %sheet, headers = headers.len(), data = data.len(), "extracting");
        let grid: Grid = self.loader.load_grid(source, sheet)?;
        let (blocks, header) = build_header(&headers, &grid)?;
        tracing::debug!(blocks = blocks.len(), width = header.len(), "header built");
        let rows = build_data(&data, &grid, &header, &config.na)?;
        tracing::debug!(rows = rows.len(), "data built");

        Ok(Extraction { header, rows })
    }
}

/// Extracts from spreadsheet files on disk.
pub fn extract(config: &Config) -> Result<Extraction, ExtractError> {
    Extractor::new(WorkbookLoader).extract(config)
}
