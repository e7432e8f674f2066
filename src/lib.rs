//! # Rusty Extract
//!
//! Extracts a header row and data rows from one sheet of a spreadsheet file and writes them as
//! CSV, driven by a JSON configuration instead of code.
//!
//! ## Features
//!
//! - **Multi-format support**: Office Open XML workbooks (`.xlsx`, `.xlsm`, `.xlam`) and
//!   OpenDocument spreadsheets (`.ods`)
//! - **Declarative entries**: header and data are lists of `static` text, `fixed` cells and
//!   `range` blocks addressed by references such as `B2:D2`
//! - **Row expansion**: multi-row data ranges produce one output row per source row, with
//!   static and fixed values repeated on every row
//! - **Shape checks**: data ranges must agree on their row count and, together, on the header width
//! - **Precise diagnostics**: every configuration error names the section, the entry and the
//!   selector that caused it
//!
//! ## Example
//!
//! ```no_run
//! use rusty_extract::extractor::{extract, Config};
//!
//! let config: Config = r#"{
//!     "source": "orders.xlsx",
//!     "sheet": "Orders",
//!     "headers": [{"static": "ID"}, {"range": "B1:D1"}],
//!     "data": [{"range": "A2:D20"}],
//!     "na": "NA"
//! }"#.parse()?;
//! let extraction = extract(&config)?;
//! println!("{} rows", extraction.rows.len());
//! # Ok::<(), rusty_extract::error::ExtractError>(())
//! ```
pub mod error;
pub mod extractor;
pub(crate) mod helpers;
pub mod spreadsheet;

pub use crate::error::ExtractError;
pub use crate::extractor::extract;
pub use crate::extractor::job::Job;
pub use crate::extractor::Config;
pub use crate::extractor::Extraction;
pub use crate::extractor::Extractor;
