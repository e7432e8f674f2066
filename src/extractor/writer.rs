use crate::error::ExtractError;
use csv::QuoteStyle;
use csv::Terminator;
use csv::WriterBuilder;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes a header and rows as comma-separated text.
///
/// Fields are quoted only when they contain a comma, a quote or a line break, and quotes
/// are doubled. Records end with CRLF. Rows may be shorter or longer than the header.
pub struct CsvTableWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvTableWriter<W> {
    pub fn new(inner: W) -> Self {
        let writer = WriterBuilder::new()
            .delimiter(b',')
            .quote(b'"')
            .double_quote(true)
            .quote_style(QuoteStyle::Necessary)
            .terminator(Terminator::CRLF)
            .flexible(true)
            .from_writer(inner);
        Self { writer }
    }

    /// Writes the header as the first record, then every row.
    pub fn write_table(&mut self, header: &[String], rows: &[Vec<String>]) -> Result<(), ExtractError> {
        self.writer.write_record(header)?;
        for row in rows {
            self.writer.write_record(row)?;
        }
        self.writer.flush()?;
        Ok(())
    }

    /// Flushes and returns the underlying writer.
    pub fn into_inner(self) -> Result<W, ExtractError> {
        self.writer
            .into_inner()
            .map_err(|error| ExtractError::IoError(error.into_error()))
    }
}

/// Writes a table to `destination`, replacing any existing file.
pub fn write_table(destination: &Path, header: &[String], rows: &[Vec<String>]) -> Result<(), ExtractError> {
    tracing::debug!(destination = %destination.display(), rows = rows.len(), "writing table");
    write_table_to(File::create(destination)?, header, rows)?;
    Ok(())
}

/// Writes a table to any writer and hands the writer back.
pub fn write_table_to<W: Write>(writer: W, header: &[String], rows: &[Vec<String>]) -> Result<W, ExtractError> {
    let mut table = CsvTableWriter::new(writer);
    table.write_table(header, rows)?;
    table.into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    fn render(header: &[&str], rows: &[&[&str]]) -> String {
        let rows = rows.iter().map(|row| strings(row)).collect::<Vec<_>>();
        let bytes = write_table_to(Vec::new(), &strings(header), &rows).unwrap();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn plain_fields() {
        assert_eq!(render(&["ID", "Name"], &[&["1", "Ann"], &["2", "Bob"]]), "ID,Name\r\n1,Ann\r\n2,Bob\r\n");
    }

    #[test]
    fn minimal_quoting() {
        assert_eq!(
            render(&["a,b", "say \"hi\""], &[&["line\nbreak", "plain"]]),
            "\"a,b\",\"say \"\"hi\"\"\"\r\n\"line\nbreak\",plain\r\n"
        );
    }

    #[test]
    fn ragged_rows_and_empty_fields() {
        assert_eq!(render(&["h1", "h2", "h3"], &[&["v"], &["", "x", ""]]), "h1,h2,h3\r\nv\r\n,x,\r\n");
    }

    #[test]
    fn header_only() {
        assert_eq!(render(&["ID"], &[]), "ID\r\n");
    }

    #[test]
    fn write_file() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("out.csv");
        write_table(&path, &strings(&["a"]), &[strings(&["1"])]).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a\r\n1\r\n");
    }
}
