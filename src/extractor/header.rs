use crate::error::ExtractError;
use crate::error::ResultMessage;
use crate::extractor::selector::validate;
use crate::extractor::selector::validate_single_cell;
use crate::extractor::Entry;
use crate::extractor::Section;
use crate::spreadsheet::grid::Grid;

/// A header entry resolved against the grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HeaderBlock {
    Static(String),
    Fixed(String),
    /// Declared width and the values read from one row, left to right
    Range(usize, Vec<String>),
}

impl HeaderBlock {
    /// Appends this block's share of the final header; ranges are cut or padded to their width.
    fn extend_header(&self, header: &mut Vec<String>) {
        match self {
            HeaderBlock::Static(value) | HeaderBlock::Fixed(value) => header.push(value.to_owned()),
            HeaderBlock::Range(col_count, values) => {
                header.extend(values.iter().take(*col_count).cloned());
                header.extend(std::iter::repeat(String::new()).take(col_count.saturating_sub(values.len())));
            }
        }
    }
}

/// Builds the header blocks and the final header from the header entries.
///
/// Empty cells read as empty strings here, never as the NA marker.
pub fn build_header(entries: &[Entry], grid: &Grid) -> Result<(Vec<HeaderBlock>, Vec<String>), ExtractError> {
    let mut blocks = Vec::with_capacity(entries.len());
    for (offset, entry) in entries.iter().enumerate() {
        let index = offset + 1;
        let prefix = format!("{} {}", Section::Header, index);
        let block = match entry {
            Entry::Static(text) => HeaderBlock::Static(text.trim().to_owned()),
            Entry::Fixed(selector) => {
                let range = validate_single_cell(selector, index, Section::Header)?;
                let value = grid.text(range.min_row - 1, range.min_col - 1, "")
                    .map_err(ExtractError::from)
                    .with_prefix(&prefix)?;
                HeaderBlock::Fixed(value)
            }
            Entry::Range(selector) => {
                let range = validate(selector, index, Section::Header, false, false)?;
                let values = (range.min_col..=range.max_col)
                    .map(|col| grid.text(range.min_row - 1, col - 1, "").map_err(ExtractError::from))
                    .collect::<Result<Vec<_>, _>>()
                    .with_prefix(&prefix)?;
                HeaderBlock::Range(range.col_count(), values)
            }
        };
        blocks.push(block);
    }

    let mut header = Vec::new();
    for block in &blocks {
        block.extend_header(&mut header);
    }
    Ok((blocks, header))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::tests::grid;

    #[test]
    fn static_entries_ignore_grid() {
        let entries = vec![Entry::Static("  ID ".to_owned()), Entry::Static("Name".to_owned())];
        let (blocks, header) = build_header(&entries, &Grid::default()).unwrap();
        assert_eq!(blocks, vec![HeaderBlock::Static("ID".to_owned()), HeaderBlock::Static("Name".to_owned())]);
        assert_eq!(header, vec!["ID", "Name"]);
    }

    #[test]
    fn range_reproduces_row_with_empty_cells() {
        let grid = grid(&[&["a", "", "c"], &["d", "e", "f"]]);
        let entries = vec![Entry::Range("A1:C1".to_owned()), Entry::Fixed("B2:B2".to_owned())];
        let (blocks, header) = build_header(&entries, &grid).unwrap();
        assert_eq!(blocks[0], HeaderBlock::Range(3, vec!["a".to_owned(), String::new(), "c".to_owned()]));
        assert_eq!(header, vec!["a", "", "c", "e"]);
    }

    #[test]
    fn range_values_are_not_trimmed() {
        let grid = grid(&[&[" a ", "b "]]);
        let (_, header) = build_header(&[Entry::Range("A1:B1".to_owned())], &grid).unwrap();
        assert_eq!(header, vec![" a ", "b "]);
    }

    #[test]
    fn fixed_values_keep_whitespace_while_static_is_trimmed() {
        let grid = grid(&[&[" a ", "b"]]);
        let entries = vec![Entry::Static(" s ".to_owned()), Entry::Fixed("A1:A1".to_owned())];
        let (_, header) = build_header(&entries, &grid).unwrap();
        assert_eq!(header, vec!["s", " a "]);
    }

    #[test]
    fn empty_fixed_cell() {
        let grid = grid(&[&["a", ""]]);
        let (_, header) = build_header(&[Entry::Fixed("B1:B1".to_owned())], &grid).unwrap();
        assert_eq!(header, vec![""]);
    }

    #[test]
    fn short_range_is_padded() {
        let mut header = Vec::new();
        HeaderBlock::Range(3, vec!["a".to_owned()]).extend_header(&mut header);
        HeaderBlock::Range(1, vec!["b".to_owned(), "c".to_owned()]).extend_header(&mut header);
        assert_eq!(header, vec!["a", "", "", "b"]);
    }

    #[test]
    fn header_range_must_be_single_row() {
        let grid = grid(&[&["a", "b"], &["c", "d"]]);
        let error = build_header(&[Entry::Static("x".to_owned()), Entry::Range("A1:B2".to_owned())], &grid).unwrap_err();
        assert_eq!(error.to_string(), "Header 2 / selector 'A1:B2': Must be single row");
    }

    #[test]
    fn range_outside_grid() {
        let grid = grid(&[&["a", "b"]]);
        let error = build_header(&[Entry::Range("A1:C1".to_owned())], &grid).unwrap_err();
        assert_eq!(error.to_string(), "Header 1: Cell C1 is outside the sheet (1 rows x 2 columns)");
    }
}
