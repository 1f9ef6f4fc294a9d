//! Data loading utilities

use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{BenchError, Result};
use crate::preprocessing::RawTable;

const QUOTE: u8 = b'"';
const BOM: &[u8] = b"\xef\xbb\xbf";

/// Reads delimited text files into [`RawTable`]s.
///
/// Every cell is read as a string and trimmed. Empty fields stay as empty
/// cells and blank lines are skipped. A data record whose field count
/// differs from the first record is a [`BenchError::MalformedRow`], with
/// `row` counted over the data records.
#[derive(Debug, Clone)]
pub struct DataLoader {
    delimiter: u8,
    has_header: bool,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    /// Comma separated, no header row
    pub fn new() -> Self {
        Self {
            delimiter: b',',
            has_header: false,
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Skip the first line as a header
    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    /// Load a CSV file
    pub fn load_csv(&self, path: impl AsRef<Path>) -> Result<RawTable> {
        let path = path.as_ref();
        info!(path = %path.display(), "Loading data");

        let bytes = std::fs::read(path)?;
        let bytes = bytes.strip_prefix(BOM).unwrap_or(&bytes);

        // polars pads short records, so widths are checked before parsing
        let records: Vec<Record> = scan_records(bytes, self.delimiter)
            .into_iter()
            .filter(|record| !record.blank)
            .collect();
        let Some(first) = records.first() else {
            return Err(BenchError::DataError("file has no records".to_string()));
        };
        let data_records = if self.has_header { &records[1..] } else { &records[..] };
        check_widths(data_records, first.fields)?;

        let mut cleaned = Vec::with_capacity(bytes.len());
        for record in &records {
            cleaned.extend_from_slice(&bytes[record.start..record.end]);
            cleaned.push(b'\n');
        }

        let parse_opts = CsvParseOptions::default()
            .with_separator(self.delimiter)
            .with_missing_is_null(false);

        // schema length 0 reads every column as a string
        let df = CsvReadOptions::default()
            .with_has_header(self.has_header)
            .with_infer_schema_length(Some(0))
            .with_parse_options(parse_opts)
            .into_reader_with_file_handle(Cursor::new(cleaned))
            .finish()?;

        if df.height() != data_records.len() {
            return Err(BenchError::DataError(format!(
                "parsed {} rows from {} records",
                df.height(),
                data_records.len()
            )));
        }

        let table = Self::to_raw_table(&df)?;
        info!(rows = table.n_rows(), cols = table.n_cols(), "Loaded data");
        Ok(table)
    }

    fn to_raw_table(df: &DataFrame) -> Result<RawTable> {
        let mut rows: Vec<Vec<String>> = (0..df.height())
            .map(|_| Vec::with_capacity(df.width()))
            .collect();

        for column in df.get_columns() {
            let series = column.as_materialized_series().cast(&DataType::String)?;
            let values = series.str()?;
            for (row, value) in rows.iter_mut().zip(values.into_iter()) {
                row.push(value.unwrap_or("").trim().to_string());
            }
        }

        RawTable::new(rows)
    }
}

/// Byte range of one record (line ending excluded) and its field count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Record {
    start: usize,
    end: usize,
    fields: usize,
    /// Only whitespace
    blank: bool,
}

/// Split `bytes` into records the way the polars reader does: a field that
/// opens with a quote runs until its closing quote, other quotes are
/// literal, and `\n` outside quotes ends the record.
fn scan_records(bytes: &[u8], separator: u8) -> Vec<Record> {
    let mut records = Vec::new();
    let mut start = 0;
    let mut fields = 1;
    let mut blank = true;
    let mut field_start = true;
    let mut quoted = false;
    let mut in_quotes = false;

    for (pos, &b) in bytes.iter().enumerate() {
        let at_start = std::mem::replace(&mut field_start, false);

        if at_start && b == QUOTE {
            quoted = true;
            in_quotes = true;
            blank = false;
        } else if quoted && b == QUOTE {
            in_quotes = !in_quotes;
        } else if in_quotes {
            blank = false;
        } else if b == separator {
            fields += 1;
            blank = false;
            field_start = true;
            quoted = false;
        } else if b == b'\n' {
            records.push(Record { start, end: pos, fields, blank });
            start = pos + 1;
            fields = 1;
            blank = true;
            field_start = true;
            quoted = false;
        } else if !b.is_ascii_whitespace() {
            blank = false;
        }
    }

    if start < bytes.len() {
        records.push(Record { start, end: bytes.len(), fields, blank });
    }
    records
}

fn check_widths(records: &[Record], expected: usize) -> Result<()> {
    match records
        .iter()
        .enumerate()
        .find(|(_, record)| record.fields != expected)
    {
        Some((row, record)) => {
            debug!(row, fields = record.fields, expected, "Ragged record");
            Err(BenchError::MalformedRow {
                row,
                expected,
                actual: record.fields,
            })
        }
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_csv_trims_cells() {
        let file = write_temp("5.1, 3.5 ,setosa\n4.9,3.0, versicolor\n");
        let table = DataLoader::new().load_csv(file.path()).unwrap();

        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.n_cols(), 3);
        assert_eq!(table.row(0).unwrap(), &["5.1", "3.5", "setosa"]);
        assert_eq!(table.row(1).unwrap()[2], "versicolor");
    }

    #[test]
    fn test_load_csv_with_delimiter_and_header() {
        let file = write_temp("a;b\n1;x\n2;y\n");
        let table = DataLoader::new()
            .with_delimiter(b';')
            .with_header(true)
            .load_csv(file.path())
            .unwrap();

        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.column(1).collect::<Vec<_>>(), vec!["x", "y"]);
    }

    #[test]
    fn test_short_row_is_malformed() {
        let file = write_temp("1,2,a\n3,4\n5,6,b\n");
        let err = DataLoader::new().load_csv(file.path()).unwrap_err();
        assert!(matches!(
            err,
            crate::error::BenchError::MalformedRow { row: 1, expected: 3, actual: 2 }
        ));
    }

    #[test]
    fn test_row_of_empty_fields_is_kept() {
        let file = write_temp("1,2,a\n,,\n5,6,b\n");
        let table = DataLoader::new().load_csv(file.path()).unwrap();
        assert_eq!(table.n_rows(), 3);
        assert_eq!(table.row(1).unwrap(), &["", "", ""]);
    }

    #[test]
    fn test_scan_records_follows_quotes() {
        let bytes = b"\"a,b\",c\n\n  \nx,\"\"\"y\"\"\",z";
        let shapes: Vec<(usize, bool)> = scan_records(bytes, b',')
            .iter()
            .map(|r| (r.fields, r.blank))
            .collect();
        assert_eq!(shapes, vec![(2, false), (1, true), (1, true), (3, false)]);

        let last = scan_records(bytes, b',')[3];
        assert_eq!(&bytes[last.start..last.end], b"x,\"\"\"y\"\"\",z");
    }

    #[test]
    fn test_long_row_is_malformed() {
        let file = write_temp("1,2,a\n3,4,b,c\n");
        let err = DataLoader::new().load_csv(file.path()).unwrap_err();
        assert!(matches!(
            err,
            crate::error::BenchError::MalformedRow { row: 1, expected: 3, actual: 4 }
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = DataLoader::new().load_csv("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, crate::error::BenchError::IoError(_)));
    }
}
