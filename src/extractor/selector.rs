use crate::extractor::ConfigurationError;
use crate::extractor::Section;
use crate::extractor::SelectorRule;
use crate::spreadsheet::range::range_boundaries;

/// Cell range in 1-based inclusive coordinates, with `min <= max` on both axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedRange {
    pub min_col: usize,
    pub min_row: usize,
    pub max_col: usize,
    pub max_row: usize,
}

impl ResolvedRange {
    pub fn is_single_cell(&self) -> bool {
        self.min_col == self.max_col && self.min_row == self.max_row
    }

    pub fn is_single_row(&self) -> bool {
        self.min_row == self.max_row
    }

    pub fn col_count(&self) -> usize {
        self.max_col - self.min_col + 1
    }

    pub fn row_count(&self) -> usize {
        self.max_row - self.min_row + 1
    }
}

/// Resolves `selector` and checks it against the positional rules of its context.
///
/// Rules are checked in order: blank, missing `:`, unreadable reference, reversed bounds,
/// then single cell (when not allowed) and multiple rows (when not allowed). A single cell
/// that is allowed is accepted before the row rule is looked at.
pub fn validate(
    selector: &str,
    index: usize,
    section: Section,
    allow_multirow: bool,
    allow_single_cell: bool,
) -> Result<ResolvedRange, ConfigurationError> {
    let selector = selector.trim();
    if selector.is_empty() {
        return Err(ConfigurationError::EmptySelector { section, index });
    }
    let invalid = |rule| ConfigurationError::InvalidSelector {
        section,
        index,
        selector: selector.to_owned(),
        rule,
    };
    if !selector.contains(':') {
        return Err(invalid(SelectorRule::MissingDelimiter));
    }

    let (min_col, min_row, max_col, max_row) = range_boundaries(selector).map_err(|error| {
        tracing::debug!(%error, "selector rejected");
        invalid(SelectorRule::InvalidFormat)
    })?;
    if min_row > max_row || min_col > max_col {
        return Err(invalid(SelectorRule::InvalidOrder));
    }

    let range = ResolvedRange { min_col, min_row, max_col, max_row };
    if range.is_single_cell() {
        if !allow_single_cell {
            return Err(invalid(SelectorRule::SingleCellNotAllowed));
        }
        return Ok(range);
    }
    if !allow_multirow && !range.is_single_row() {
        return Err(invalid(SelectorRule::MustBeSingleRow));
    }
    Ok(range)
}

/// Validates the selector of a `fixed` entry, which must name exactly one cell.
///
/// In both the header and the data section the single-cell rule replaces the single-row rule,
/// so a header `fixed` of `A1:B2` fails with `Must be single cell` rather than `Must be single row`.
pub(crate) fn validate_single_cell(selector: &str, index: usize, section: Section) -> Result<ResolvedRange, ConfigurationError> {
    let range = validate(selector, index, section, true, true)?;
    if !range.is_single_cell() {
        return Err(ConfigurationError::InvalidSelector {
            section,
            index,
            selector: selector.trim().to_owned(),
            rule: SelectorRule::MustBeSingleCell,
        });
    }
    Ok(range)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(result: Result<ResolvedRange, ConfigurationError>) -> String {
        result.unwrap_err().to_string()
    }

    #[test]
    fn resolve_ranges() {
        let range = validate(" B2:D2 ", 1, Section::Header, false, false).unwrap();
        assert_eq!(range, ResolvedRange { min_col: 2, min_row: 2, max_col: 4, max_row: 2 });
        assert_eq!((range.col_count(), range.row_count()), (3, 1));
        assert!(range.is_single_row());
        assert!(!range.is_single_cell());

        let range = validate("a1:c3", 1, Section::Data, true, false).unwrap();
        assert_eq!((range.col_count(), range.row_count()), (3, 3));
    }

    #[test]
    fn blank_selectors() {
        assert_eq!(message(validate("", 2, Section::Header, false, true)), "Header 2 / selector: Cannot be null or empty");
        assert_eq!(message(validate("   ", 1, Section::Data, true, true)), "Data 1 / selector: Cannot be null or empty");
    }

    #[test]
    fn rule_violations() {
        assert_eq!(message(validate("A1", 1, Section::Data, true, true)), "Data 1 / selector 'A1': Must contain ':'");
        assert_eq!(message(validate("A1:XYZ", 2, Section::Data, true, true)), "Data 2 / selector 'A1:XYZ': Invalid format");
        assert_eq!(message(validate("1:3", 2, Section::Data, true, true)), "Data 2 / selector '1:3': Invalid format");
        assert_eq!(message(validate("B2:A1", 3, Section::Header, true, true)), "Header 3 / selector 'B2:A1': Invalid order");
        assert_eq!(message(validate("A2:B1", 3, Section::Header, true, true)), "Header 3 / selector 'A2:B1': Invalid order");
        assert_eq!(message(validate("C3:C3", 4, Section::Data, true, false)), "Data 4 / selector 'C3:C3': Single cell not allowed");
        assert_eq!(message(validate("A1:B2", 5, Section::Header, false, false)), "Header 5 / selector 'A1:B2': Must be single row");
    }

    #[test]
    fn allowed_single_cell_skips_row_rule() {
        let range = validate("C3:C3", 1, Section::Header, false, true).unwrap();
        assert!(range.is_single_cell());
    }

    #[test]
    fn single_cell_only() {
        assert!(validate_single_cell("C3:C3", 1, Section::Header).is_ok());
        assert_eq!(
            validate_single_cell("A1:B2", 1, Section::Header),
            Err(ConfigurationError::InvalidSelector {
                section: Section::Header,
                index: 1,
                selector: "A1:B2".to_owned(),
                rule: SelectorRule::MustBeSingleCell,
            })
        );
        assert_eq!(message(validate_single_cell("A1:B1", 2, Section::Data)), "Data 2 / selector 'A1:B1': Must be single cell");
    }
}
