//! CSV input and output.
//!
//! The input is a headered CSV read fully into memory. Each row is one
//! record; its text is the cell of the configured text column. Rows are
//! kept as raw bytes so one badly encoded cell fails only its own record.
//!
//! The output is the same table, same row order, with one extra column
//! holding the cleaned text.

use std::path::Path;

use csv::{ByteRecord, ReaderBuilder, WriterBuilder};
use depura_types::RecordError;

use crate::error::{Error, Result};

/// Default name of the column holding raw transcript text.
pub const DEFAULT_TEXT_COLUMN: &str = "texto";

/// Default name of the appended cleaned-text column.
pub const DEFAULT_OUTPUT_COLUMN: &str = "texto_limpio";

/// An in-memory CSV table with a selected text column.
#[derive(Debug, Clone)]
pub struct Table {
    headers: ByteRecord,
    rows: Vec<ByteRecord>,
    text_column: usize,
}

impl Table {
    /// Header names, lossily decoded.
    pub fn headers(&self) -> Vec<String> {
        self.headers
            .iter()
            .map(|h| String::from_utf8_lossy(h).into_owned())
            .collect()
    }

    /// Number of data rows.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the table has no data rows.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the text column.
    #[inline(always)]
    pub fn text_column(&self) -> usize {
        self.text_column
    }

    /// Text of every row, in row order.
    ///
    /// An empty cell is [`RecordError::MissingText`]; a cell that is not
    /// UTF-8 is [`RecordError::InvalidEncoding`].
    pub fn texts(&self) -> Vec<std::result::Result<&str, RecordError>> {
        self.rows.iter().map(|row| self.cell_text(row)).collect()
    }

    fn cell_text<'a>(&self, row: &'a ByteRecord) -> std::result::Result<&'a str, RecordError> {
        let cell = row
            .get(self.text_column)
            .filter(|c| !c.is_empty())
            .ok_or(RecordError::MissingText)?;
        std::str::from_utf8(cell).map_err(|e| RecordError::InvalidEncoding {
            valid_up_to: e.valid_up_to(),
        })
    }
}

/// Reads the CSV at `path`, selecting `text_column` as the record text.
pub fn read_table(path: impl AsRef<Path>, text_column: &str) -> Result<Table> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new().has_headers(true).from_path(path)?;

    let headers = reader.byte_headers()?.clone();
    let Some(index) = headers.iter().position(|h| h == text_column.as_bytes()) else {
        let available = headers
            .iter()
            .map(|h| String::from_utf8_lossy(h).into_owned())
            .collect::<Vec<_>>()
            .join(", ");
        return Err(Error::MissingColumn {
            column: text_column.to_owned(),
            path: path.to_path_buf(),
            available,
        });
    };

    let mut rows = Vec::new();
    for row in reader.byte_records() {
        rows.push(row?);
    }

    tracing::info!(
        path = %path.display(),
        rows = rows.len(),
        column = text_column,
        "table loaded"
    );

    Ok(Table {
        headers,
        rows,
        text_column: index,
    })
}

/// Writes `table` to `path` with `cleaned` appended as `output_column`.
///
/// `cleaned[i]` goes on row `i`.
pub fn write_table(
    path: impl AsRef<Path>,
    table: &Table,
    cleaned: &[String],
    output_column: &str,
) -> Result<()> {
    let path = path.as_ref();

    if table.headers.iter().any(|h| h == output_column.as_bytes()) {
        return Err(Error::DuplicateColumn(output_column.to_owned()));
    }
    if cleaned.len() != table.rows.len() {
        return Err(Error::RowCountMismatch {
            rows: table.rows.len(),
            cleaned: cleaned.len(),
        });
    }

    let mut writer = WriterBuilder::new().from_path(path)?;

    let mut headers = table.headers.clone();
    headers.push_field(output_column.as_bytes());
    writer.write_byte_record(&headers)?;

    let mut out = ByteRecord::with_capacity(0, headers.len());
    for (row, text) in table.rows.iter().zip(cleaned) {
        out.clear();
        out.extend(row.iter());
        out.push_field(text.as_bytes());
        writer.write_byte_record(&out)?;
    }
    writer.flush()?;

    tracing::info!(path = %path.display(), rows = cleaned.len(), "table written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn csv_file(contents: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn reads_text_column() {
        let file = csv_file(b"id,texto\n1,hola mundo\n2,\"uno, dos\"\n");
        let table = read_table(file.path(), "texto").unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.text_column(), 1);
        assert_eq!(table.headers(), ["id", "texto"]);
        let expected: [std::result::Result<&str, RecordError>; 2] = [Ok("hola mundo"), Ok("uno, dos")];
        assert_eq!(table.texts(), expected);
    }

    #[test]
    fn missing_column_is_fatal() {
        let file = csv_file(b"id,titulo\n1,x\n");
        let err = read_table(file.path(), "texto").unwrap_err();
        match err {
            Error::MissingColumn {
                column, available, ..
            } => {
                assert_eq!(column, "texto");
                assert_eq!(available, "id, titulo");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_table(dir.path().join("nope.csv"), "texto").unwrap_err();
        assert!(matches!(err, Error::Csv(_)));
    }

    #[test]
    fn empty_cell_is_missing_text() {
        let file = csv_file(b"id,texto\n1,\n2,algo\n");
        let table = read_table(file.path(), "texto").unwrap();
        assert_eq!(table.texts(), [Err(RecordError::MissingText), Ok("algo")]);
    }

    #[test]
    fn bad_encoding_fails_only_its_row() {
        let file = csv_file(b"id,texto\n1,ok\n2,ab\xffcd\n");
        let table = read_table(file.path(), "texto").unwrap();
        assert_eq!(
            table.texts(),
            [Ok("ok"), Err(RecordError::InvalidEncoding { valid_up_to: 2 })]
        );
    }

    #[test]
    fn header_only_table() {
        let file = csv_file(b"texto\n");
        let table = read_table(file.path(), "texto").unwrap();
        assert!(table.is_empty());
        assert!(table.texts().is_empty());
    }

    #[test]
    fn write_appends_column_in_row_order() {
        let input = csv_file(b"id,texto\n7,a\n3,b\n");
        let table = read_table(input.path(), "texto").unwrap();

        let out = tempfile::NamedTempFile::new().unwrap();
        let cleaned = vec!["uno".to_owned(), String::new()];
        write_table(out.path(), &table, &cleaned, "texto_limpio").unwrap();

        let written = std::fs::read_to_string(out.path()).unwrap();
        assert_eq!(written, "id,texto,texto_limpio\n7,a,uno\n3,b,\n");
    }

    #[test]
    fn write_rejects_existing_column() {
        let input = csv_file(b"texto,texto_limpio\na,b\n");
        let table = read_table(input.path(), "texto").unwrap();
        let out = tempfile::NamedTempFile::new().unwrap();

        let err = write_table(out.path(), &table, &["x".to_owned()], "texto_limpio").unwrap_err();
        assert!(matches!(err, Error::DuplicateColumn(c) if c == "texto_limpio"));
    }

    #[test]
    fn write_rejects_row_count_mismatch() {
        let input = csv_file(b"texto\na\nb\n");
        let table = read_table(input.path(), "texto").unwrap();
        let out = tempfile::NamedTempFile::new().unwrap();

        let err = write_table(out.path(), &table, &["x".to_owned()], "limpio").unwrap_err();
        assert!(matches!(err, Error::RowCountMismatch { rows: 2, cleaned: 1 }));
    }
}
