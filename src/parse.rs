//! Delimited-input parsing. Reads a byte stream, splits each line on a
//! single-character delimiter, and builds a [`Table`].

use std::io::Read;

use csv::ReaderBuilder;

use crate::error::Result;
use crate::model::Table;

/// Parses `input` (already read into memory) into a [`Table`], splitting
/// every line on `delimiter`.
///
/// Uses the `csv` crate in "flexible" mode so that rows are allowed to have
/// differing field counts; [`Table::new`] pads them to the widest row.
/// There is no header row here; every line is data, unlike a CSV file with
/// a header convention (this is plain delimiter-separated text, not CSV).
pub fn parse_table(input: &str, delimiter: u8) -> Result<Table> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(input.as_bytes());

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(|s| s.to_string()).collect());
    }

    Table::new(rows)
}

/// Reads all of `reader` into a `String`, treating the input as UTF-8 text.
pub fn read_all(mut reader: impl Read) -> Result<String> {
    let mut buf = String::new();
    reader.read_to_string(&mut buf)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_tab_delimited_rows() {
        let table = parse_table("a\tb\nc\td\n", b'\t').unwrap();
        assert_eq!(table.n_cols(), 2);
        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.cell(0, 0), "a");
        assert_eq!(table.cell(1, 1), "d");
    }

    #[test]
    fn pads_ragged_rows() {
        let table = parse_table("a\tb\tc\nd\n", b'\t').unwrap();
        assert_eq!(table.n_cols(), 3);
        assert_eq!(table.cell(1, 1), "");
        assert_eq!(table.cell(1, 2), "");
    }

    #[test]
    fn tolerates_crlf() {
        let table = parse_table("a\tb\r\nc\td\r\n", b'\t').unwrap();
        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.cell(0, 1), "b");
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(parse_table("", b'\t').is_err());
    }

    #[test]
    fn preserves_empty_trailing_fields() {
        let table = parse_table("a\tb\t\n", b'\t').unwrap();
        assert_eq!(table.n_cols(), 3);
        assert_eq!(table.cell(0, 2), "");
    }

    #[test]
    fn custom_delimiter() {
        let table = parse_table("a,b\nc,d\n", b',').unwrap();
        assert_eq!(table.cell(0, 1), "b");
    }
}
