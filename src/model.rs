//! Core data model: [`Table`], its rows and cells, and the user-supplied
//! width vector that may leave some columns unspecified.

use crate::error::{Result, WraptabError};

/// One field of one row. Guaranteed UTF-8 and newline-free by construction.
pub type Cell = String;

/// An ordered sequence of cells, always padded to the table's column count.
pub type Row = Vec<Cell>;

/// A fully materialized table: read-only once constructed.
#[derive(Debug, Clone)]
pub struct Table {
    rows: Vec<Row>,
    n_cols: usize,
}

impl Table {
    /// Builds a table from raw rows, padding every row with empty cells up
    /// to the widest row's length.
    ///
    /// Returns [`WraptabError::Argument`] if there are no rows at all, since
    /// an empty table has no sensible column count (see the Open Question
    /// resolved in DESIGN.md).
    pub fn new(mut rows: Vec<Row>) -> Result<Self> {
        if rows.is_empty() {
            return Err(WraptabError::Argument(
                "input contains no rows".to_string(),
            ));
        }
        let n_cols = rows.iter().map(|r| r.len()).max().unwrap_or(0).max(1);
        for row in &mut rows {
            while row.len() < n_cols {
                row.push(String::new());
            }
        }
        Ok(Table { rows, n_cols })
    }

    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// The text of cell `(row, col)`. Panics if out of bounds: callers
    /// always iterate within `n_rows`/`n_cols`, both invariants of the
    /// construction above.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        &self.rows[row][col]
    }

    /// All cells in column `col`, top to bottom.
    pub fn column(&self, col: usize) -> impl Iterator<Item = &str> {
        self.rows.iter().map(move |row| row[col].as_str())
    }
}

/// One entry of the user-supplied width vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserWidth {
    Fixed(usize),
    Unset,
}

/// The full, normalized width vector: one entry per column.
#[derive(Debug, Clone)]
pub struct UserWidths(Vec<UserWidth>);

impl UserWidths {
    /// All columns unset, the default when `-W` is not given.
    pub fn all_unset(n_cols: usize) -> Self {
        UserWidths(vec![UserWidth::Unset; n_cols])
    }

    /// Parses a comma-separated list like `"14,-,20"` where `-` marks an
    /// unset column. Errors if any entry is not `-` and not a positive
    /// integer, or if the count doesn't match `n_cols`.
    pub fn parse(spec: &str, n_cols: usize) -> Result<Self> {
        let mut widths = Vec::new();
        for item in spec.split(',') {
            let item = item.trim();
            if item == "-" {
                widths.push(UserWidth::Unset);
            } else {
                let value: usize = item.parse().map_err(|_| {
                    WraptabError::Argument(format!("invalid width entry: {item:?}"))
                })?;
                if value == 0 {
                    return Err(WraptabError::Argument(
                        "column widths must be positive".to_string(),
                    ));
                }
                widths.push(UserWidth::Fixed(value));
            }
        }
        if widths.len() != n_cols {
            return Err(WraptabError::Argument(format!(
                "--widths specifies {} columns but the table has {n_cols}",
                widths.len()
            )));
        }
        Ok(UserWidths(widths))
    }

    pub fn as_slice(&self) -> &[UserWidth] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
