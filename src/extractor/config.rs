use crate::error::ExtractError;
use crate::extractor::ConfigurationError;
use crate::extractor::Section;
use crate::spreadsheet::SheetSelector;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use std::str::FromStr;

/// A header or data entry as written in the configuration file.
///
/// Kept as a plain JSON value so a malformed entry is reported against its section and position.
pub type RawEntry = Value;

/// Run configuration, loaded from a JSON document.
///
/// ```json
/// {
///   "source": "orders.xlsx",
///   "sheet": "Orders",
///   "headers": [{"static": "ID"}, {"range": "B1:D1"}],
///   "data": [{"range": "A2:A10"}, {"range": "B2:D10"}],
///   "na": "NA"
/// }
/// ```
///
/// `sheet` is a sheet name or a 0-based sheet index; `sheetSelector` is accepted as an alias.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub source: Option<String>,
    #[serde(alias = "sheetSelector")]
    pub sheet: Option<SheetSelector>,
    pub headers: Vec<RawEntry>,
    pub data: Vec<RawEntry>,
    pub na: String,
}

impl Config {
    /// Reads and parses a configuration file.
    pub fn from_file(path: &Path) -> Result<Config, ExtractError> {
        if !path.is_file() {
            Err(ExtractError::ConfigFileNotFound(path.display().to_string()))?;
        }
        std::fs::read_to_string(path)?.parse()
    }

    /// Header entries, checked and converted in configuration order.
    pub fn header_entries(&self) -> Result<Vec<Entry>, ConfigurationError> {
        Entry::from_raw_entries(&self.headers, Section::Header)
    }

    /// Data entries, checked and converted in configuration order.
    pub fn data_entries(&self) -> Result<Vec<Entry>, ConfigurationError> {
        Entry::from_raw_entries(&self.data, Section::Data)
    }
}

impl FromStr for Config {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(serde_json::from_str(s)?)
    }
}

/// One header or data entry: literal text, a single cell, or a range of cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Entry {
    Static(String),
    Fixed(String),
    Range(String),
}

impl Entry {
    /// Converts a raw entry, which must hold exactly one of `static`, `fixed` or `range` with a string value.
    ///
    /// `index` is the 1-based position of the entry in its section. An entry that is not a JSON
    /// object holds no kind at all.
    pub fn from_raw(raw: &RawEntry, index: usize, section: Section) -> Result<Entry, ConfigurationError> {
        let raw = raw.as_object().ok_or(ConfigurationError::EntryKind { section, index })?;
        let kinds = ["static", "fixed", "range"]
            .into_iter()
            .filter_map(|key| raw.get(key).map(|value| (key, value)))
            .collect::<Vec<_>>();
        let (key, value) = match kinds.as_slice() {
            [kind] => *kind,
            _ => return Err(ConfigurationError::EntryKind { section, index }),
        };
        let text = value.as_str().ok_or(ConfigurationError::NotAString {
            section,
            index,
            key: if key == "static" { "static" } else { "selector" },
        })?;
        let entry = match key {
            "static" => Entry::Static(text.to_owned()),
            "fixed" => Entry::Fixed(text.to_owned()),
            _ => Entry::Range(text.to_owned()),
        };
        Ok(entry)
    }

    fn from_raw_entries(raws: &[RawEntry], section: Section) -> Result<Vec<Entry>, ConfigurationError> {
        raws.iter()
            .enumerate()
            .map(|(offset, raw)| Entry::from_raw(raw, offset + 1, section))
            .collect()
    }
}
