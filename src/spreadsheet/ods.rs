use crate::error::ExtractError;
use crate::helpers::xml::XmlNodeHelper;
use crate::helpers::xml::XmlTextContextHelper;
use crate::helpers::zip::ZipHelper;
use crate::match_xml_events;
use crate::spreadsheet::cell::Cell;
use crate::spreadsheet::cell::CellType;
use crate::spreadsheet::sheet::Sheet;
use crate::spreadsheet::Spreadsheet;
use crate::spreadsheet::SpreadsheetError;
use quick_xml::events::Event;
use quick_xml::name::QName;
use std::fs::File;
use std::io::BufReader;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use zip::ZipArchive;

/// ODS file MIME type identifier
const MIME_TYPE: &[u8] = b"application/vnd.oasis.opendocument.spreadsheet";
/// XML element name for table (sheet)
const TABLE: QName = QName(b"table:table");
/// XML element name for table row
const TABLE_ROW: QName = QName(b"table:table-row");
/// XML element name for table cell
const TABLE_CELL: QName = QName(b"table:table-cell");
/// XML element name for covered table cell (merged cells)
const TABLE_COVERED_CELL: QName = QName(b"table:covered-table-cell");
/// XML element name for annotations (comments)
const ANNOTATION: QName = QName(b"office:annotation");
/// XML element name for paragraph text
const PARAGRAPH: QName = QName(b"text:p");
/// XML element name for string (space) text
const STRING: QName = QName(b"text:s");
/// XML element name for manifest file entries
const FILE_ENTRY: QName = QName(b"manifest:file-entry");
/// XML element name for manifest encryption data
const ENCRYPTION_DATA: QName = QName(b"manifest:encryption-data");
/// Largest sheet LibreOffice Calc can hold
const MAX_ROWS: usize = 1_048_576;
const MAX_COLS: usize = 16_384;

/// Error types specific to ODS spreadsheet processing
#[derive(Error, Debug)]
pub enum OdsError {
    /// Invalid ODS MIME type detected in file
    #[error("Invalid ODS MIME type")]
    MimeTypeError,
}

/// ODS spreadsheet handler for reading OpenDocument Spreadsheet files
pub(crate) struct OdsSpreadsheet {
    /// Name of the ODS file
    pub(crate) name: String,
    /// ZIP archive containing the ODS file contents
    zip: ZipArchive<BufReader<File>>,
    /// Table names in document order
    sheet_names: Vec<String>,
}

impl OdsSpreadsheet {
    /// Opens an ODS file, validates its format and collects the table names
    pub(crate) fn open(file_name: &str) -> Result<Self, ExtractError> {
        let file = File::open(Path::new(file_name))?;
        let mut zip = ZipArchive::new(BufReader::new(file))?;
        check_mime(&mut zip)?;
        if is_password_protected(&mut zip)? {
            Err(SpreadsheetError::PasswordProtected(file_name.to_owned()))?;
        }
        let sheet_names = load_sheet_names(&mut zip)?;
        if sheet_names.is_empty() {
            Err(SpreadsheetError::SpreadsheetEmpty(file_name.to_owned()))?;
        }
        Ok(OdsSpreadsheet {
            name: file_name.to_owned(),
            zip,
            sheet_names,
        })
    }
}

impl Spreadsheet for OdsSpreadsheet {
    fn name(&self) -> String {
        self.name.to_owned()
    }

    fn sheet_names(&self) -> Vec<String> {
        self.sheet_names.clone()
    }

    /// Reads one table from content.xml, expanding repeated rows and columns
    fn read_sheet(&mut self, sheet_name: &str) -> Result<Sheet, ExtractError> {
        if !self.sheet_names.iter().any(|name| name == sheet_name) {
            Err(SpreadsheetError::SheetNotFound(self.name.to_owned(), format!("'{sheet_name}'")))?;
        }
        let mut reader = self.zip
            .xml_reader("content.xml")?
            .ok_or_else(|| SpreadsheetError::FileError("content.xml".to_owned()))?;

        // Skip to the requested table
        match_xml_events!(reader => {
            Event::Start(event) if event.name() == TABLE => {
                if event.get_attribute_value("table:name")?.map(|name| name == sheet_name).unwrap_or(false) {
                    break;
                }
            }
        });

        let mut sheet = Sheet::new(&self.name, sheet_name);
        let mut row = 0usize;
        let mut col = 0usize;
        let mut row_count = 1usize;
        let mut col_count = 1usize;
        let mut kind = CellType::default();
        let mut value = String::new();
        let mut element_context = false; // reading a string cell's paragraphs
        let mut comment_context = false; // inside an annotation
        match_xml_events!(reader => {
            Event::End(event) if event.name() == TABLE => break,
            Event::Start(event) if event.name() == TABLE_ROW => {
                row_count = event.parse_attribute_value("table:number-rows-repeated")?.unwrap_or(1);
                col = 0;
            }
            Event::End(event) if event.name() == TABLE_ROW => {
                row = row.checked_add(row_count).ok_or_else(|| too_large(&sheet))?;
            }
            Event::Start(event) if event.name() == TABLE_CELL || event.name() == TABLE_COVERED_CELL => {
                value.clear();
                col_count = event.parse_attribute_value::<usize>("table:number-columns-repeated")?.unwrap_or(1);
                (kind, element_context) = match read_attribute_value(&event)? {
                    Some((CellType::InlineString, _)) => (CellType::InlineString, true),
                    Some((CellType::Error, _)) => (CellType::Error, true),
                    Some((cell_kind, cell_value)) => {
                        value.push_str(&cell_value);
                        (cell_kind, false)
                    }
                    None => (CellType::Empty, false),
                };
            }
            Event::End(event) if event.name() == TABLE_CELL || event.name() == TABLE_COVERED_CELL => {
                if kind != CellType::Empty {
                    push_repeated(&mut sheet, row, row_count, col, col_count, kind, &value)?;
                }
                col = col.checked_add(col_count).ok_or_else(|| too_large(&sheet))?;
                kind = CellType::Empty;
                element_context = false;
                comment_context = false;
            }
            Event::Start(event) if element_context && event.name() == ANNOTATION => comment_context = true,
            Event::End(event) if element_context && comment_context && event.name() == ANNOTATION => comment_context = false,
            Event::Start(event) if element_context && !comment_context && event.name() == PARAGRAPH => {
                if !value.is_empty() {
                    value.push('\n');
                }
            }
            Event::Start(event) if element_context && !comment_context && event.name() == STRING => {
                let count = event.parse_attribute_value("text:c")?.unwrap_or(1);
                value.push_str(&" ".repeat(count));
            }
            Event::Text(event) if element_context && !comment_context => value.push_bytes_text(&event)?,
            Event::GeneralRef(event) if element_context && !comment_context => value.push_bytes_ref(&event)?,
        });
        Ok(sheet)
    }
}

/// Determines the cell type from `office:value-type` and takes the value held in attributes.
///
/// String and error cells carry their text in child paragraphs, so their value is empty here.
fn read_attribute_value(event: &quick_xml::events::BytesStart) -> Result<Option<(CellType, String)>, ExtractError> {
    let value_type = match event.get_attribute_value("office:value-type")? {
        Some(value_type) => value_type,
        None => return Ok(None),
    };
    let cell = match value_type.as_ref() {
        "string" => {
            let is_error = event.get_attribute_value("calcext:value-type")?.map(|cow| cow == "error").unwrap_or(false);
            (if is_error { CellType::Error } else { CellType::InlineString }, String::new())
        }
        "boolean" => {
            let is_true = event.get_attribute_value("office:boolean-value")?.map(|cow| cow != "false" && cow != "0").unwrap_or(false);
            (CellType::Boolean, if is_true { "1" } else { "0" }.to_owned())
        }
        "date" => (CellType::IsoDateTime, event.get_attribute_value("office:date-value")?.unwrap_or_default().into_owned()),
        "time" => (CellType::IsoDuration, event.get_attribute_value("office:time-value")?.unwrap_or_default().into_owned()),
        _ => (CellType::Number, event.get_attribute_value("office:value")?.unwrap_or_default().into_owned()),
    };
    Ok(Some(cell))
}

/// Pushes one value into every position covered by the repeated rows and columns.
///
/// Empty filler may repeat up to the end of the sheet, but a value repeated past the sheet limits is rejected.
fn push_repeated(
    sheet: &mut Sheet,
    row: usize,
    row_count: usize,
    col: usize,
    col_count: usize,
    kind: CellType,
    value: &str,
) -> Result<(), SpreadsheetError> {
    if value.is_empty() {
        return Ok(());
    }
    let row_end = row.checked_add(row_count).filter(|end| *end <= MAX_ROWS);
    let col_end = col.checked_add(col_count).filter(|end| *end <= MAX_COLS);
    let (Some(row_end), Some(col_end)) = (row_end, col_end) else {
        return Err(too_large(sheet));
    };
    for row_number in row..row_end {
        for col_number in col..col_end {
            sheet.push(Cell {
                row: row_number,
                col: col_number,
                kind,
                value: value.to_owned(),
            });
        }
    }
    Ok(())
}

fn too_large(sheet: &Sheet) -> SpreadsheetError {
    SpreadsheetError::SheetTooLarge(sheet.file_name.to_owned(), sheet.name.to_owned(), MAX_ROWS, MAX_COLS)
}

/// Validates that the ZIP archive contains a valid ODS file by checking MIME type
fn check_mime(zip: &mut ZipArchive<BufReader<File>>) -> Result<(), ExtractError> {
    if let Some(file) = &mut zip.file("mimetype")? {
        let mut buffer = Vec::new();
        file.read_to_end(&mut buffer)?;
        if buffer.trim_ascii() != MIME_TYPE {
            Err(OdsError::MimeTypeError)?;
        }
    }
    Ok(())
}

/// Checks if the ODS file is password protected by examining the manifest
fn is_password_protected(zip: &mut ZipArchive<BufReader<File>>) -> Result<bool, ExtractError> {
    let mut reader = match zip.xml_reader("META-INF/manifest.xml")? {
        Some(reader) => reader,
        None => return Ok(false),
    };
    let mut in_file_entry = false;
    match_xml_events!(reader => {
        Event::Start(event) if event.name() == FILE_ENTRY => in_file_entry = true,
        Event::End(event) if event.name() == FILE_ENTRY => in_file_entry = false,
        Event::Start(event) if in_file_entry && event.name() == ENCRYPTION_DATA => {
            return Ok(true);
        }
    });
    Ok(false)
}

/// Collects table names from content.xml in document order
fn load_sheet_names(zip: &mut ZipArchive<BufReader<File>>) -> Result<Vec<String>, ExtractError> {
    let mut reader = zip
        .xml_reader("content.xml")?
        .ok_or_else(|| SpreadsheetError::FileError("content.xml".to_owned()))?;
    let mut names = Vec::new();
    match_xml_events!(reader => {
        Event::Start(event) if event.name() == TABLE => {
            if let Some(name) = event.get_attribute_value("table:name")? {
                names.push(name.into_owned());
            }
        }
    });
    Ok(names)
}
