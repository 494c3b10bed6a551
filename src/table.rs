//! Raw source tables as read from CSV.
//!
//! A `Table` keeps every cell as text. Typing happens later in
//! [`crate::records`], after the schema check has passed, so a missing
//! column is always reported before any cell is interpreted.

use crate::error::{PipelineError, Result};
use std::io::Read;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    name: String,
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows,
        }
    }

    /// Build a table from string slices. Mostly useful for fixtures.
    pub fn from_rows(name: &str, columns: &[&str], rows: &[&[&str]]) -> Self {
        Self::new(
            name,
            columns.iter().map(|c| c.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    /// Read a headed CSV stream. Cells are trimmed; extra columns are kept.
    pub fn from_reader<R: Read>(name: &str, reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let columns = rdr.headers()?.iter().map(str::to_string).collect();
        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Self::new(name, columns, rows))
    }

    pub fn from_path(name: &str, path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(name, file)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.column_index(column).is_some()
    }

    /// Index of a column that must be present
    pub fn require(&self, column: &str) -> Result<usize> {
        self.column_index(column)
            .ok_or_else(|| PipelineError::schema(&self.name, column))
    }

    /// Iterate rows with their position, for cell access by column index
    pub fn iter(&self) -> impl Iterator<Item = RowRef<'_>> {
        self.rows.iter().enumerate().map(move |(index, cells)| RowRef {
            table: &self.name,
            index,
            cells,
        })
    }
}

/// Borrowed view of one table row
#[derive(Debug, Clone, Copy)]
pub struct RowRef<'a> {
    table: &'a str,
    index: usize,
    cells: &'a [String],
}

impl<'a> RowRef<'a> {
    pub fn table(&self) -> &'a str {
        self.table
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Cell text, or None when the cell is blank or the row is short
    pub fn get(&self, column: usize) -> Option<&'a str> {
        self.cells
            .get(column)
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Parse a cell, treating blanks as absent
    pub fn parse<T: std::str::FromStr>(&self, column: usize, column_name: &str) -> Result<Option<T>> {
        match self.get(column) {
            None => Ok(None),
            Some(raw) => raw
                .parse::<T>()
                .map(Some)
                .map_err(|_| self.parse_error(column_name, raw)),
        }
    }

    pub fn text(&self, column: usize) -> Option<String> {
        self.get(column).map(str::to_string)
    }

    pub fn parse_error(&self, column_name: &str, value: &str) -> PipelineError {
        PipelineError::Parse {
            table: self.table.to_string(),
            row: self.index,
            column: column_name.to_string(),
            value: value.to_string(),
        }
    }
}
