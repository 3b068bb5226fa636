//! CSV table source.
//!
//! Loads a delimited text file into a [`Table`]. Parsing follows the
//! conventions spreadsheet users expect from data-frame tools:
//!
//! - the first record is the header; blank names become `Unnamed: <idx>`
//!   and repeated names are disambiguated as `name.1`, `name.2`, ...
//! - cells equal to a null marker become [`Value::Null`]; the match is
//!   exact, so `" NA "` or a blank `"  "` stays text
//! - a column whose non-null cells all parse as numbers becomes numeric,
//!   otherwise every cell keeps its raw text. Integer cells are kept as
//!   exact `i64`; an integer literal outside the `i64` range makes the
//!   whole column text rather than rounding it through `f64`
//!
//! # Example
//!
//! ```
//! use rowdupe::table::{CsvSource, Value};
//!
//! let data = "id,x\n1,a\n1,\n2,b\n";
//! let table = CsvSource::default().read_from(data.as_bytes()).unwrap();
//!
//! assert_eq!(table.row_count(), 3);
//! assert_eq!(table.column("id").unwrap().values[0], Value::from(1));
//! assert_eq!(table.column("x").unwrap().values[1], Value::Null);
//! ```

use std::fs::File;
use std::io;
use std::path::Path;

use super::source::{disambiguate_headers, is_null_marker, SourceError, DEFAULT_NULL_VALUES};
use super::{Column, Table, Value};

/// CSV reader configuration.
#[derive(Debug, Clone)]
pub struct CsvSource {
    delimiter: u8,
    null_values: Vec<String>,
}

impl Default for CsvSource {
    fn default() -> Self {
        Self {
            delimiter: b',',
            null_values: DEFAULT_NULL_VALUES.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

impl CsvSource {
    /// Set the field delimiter.
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Replace the null marker list.
    #[must_use]
    pub fn with_null_values(mut self, null_values: Vec<String>) -> Self {
        self.null_values = null_values;
        self
    }

    /// Load a table from a file.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the file cannot be read or parsed.
    pub fn read_path(&self, path: &Path) -> Result<Table, SourceError> {
        let file = File::open(path).map_err(|source| SourceError::Io {
            path: path.display().to_string(),
            source,
        })?;
        log::debug!("Reading CSV table from {}", path.display());
        self.read_from(file)
    }

    /// Load a table from any reader.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the data is not valid CSV or rows are ragged.
    pub fn read_from<R: io::Read>(&self, reader: R) -> Result<Table, SourceError> {
        let mut csv_reader = self.builder().from_reader(reader);
        let names = disambiguate_headers(csv_reader.headers()?.iter());

        let mut raw: Vec<Vec<Option<String>>> = vec![Vec::new(); names.len()];
        for record in csv_reader.records() {
            let record = record?;
            for (cells, field) in raw.iter_mut().zip(record.iter()) {
                cells.push(self.parse_cell(field));
            }
        }

        let columns: Vec<Column> = names
            .into_iter()
            .zip(raw)
            .map(|(name, cells)| Column::new(name, infer_values(cells)))
            .collect();

        let table = Table::new(columns)?;
        log::debug!(
            "Loaded table with {} rows and {} columns",
            table.row_count(),
            table.column_count()
        );
        Ok(table)
    }

    /// Read only the header row of a file.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the file cannot be opened or the header is invalid.
    pub fn read_headers(&self, path: &Path) -> Result<Vec<String>, SourceError> {
        let file = File::open(path).map_err(|source| SourceError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let mut csv_reader = self.builder().from_reader(file);
        Ok(disambiguate_headers(csv_reader.headers()?.iter()))
    }

    fn builder(&self) -> ::csv::ReaderBuilder {
        let mut builder = ::csv::ReaderBuilder::new();
        builder.delimiter(self.delimiter).has_headers(true);
        builder
    }

    /// Null markers in effect.
    #[must_use]
    pub fn null_values(&self) -> &[String] {
        &self.null_values
    }

    fn parse_cell(&self, field: &str) -> Option<String> {
        if is_null_marker(&self.null_values, field) {
            None
        } else {
            Some(field.to_string())
        }
    }
}

/// Decide the column type and convert raw cells into values.
fn infer_values(cells: Vec<Option<String>>) -> Vec<Value> {
    let numbers: Option<Vec<Value>> = cells
        .iter()
        .map(|cell| match cell {
            None => Some(Value::Null),
            Some(text) => parse_number(text.trim()),
        })
        .collect();

    numbers.unwrap_or_else(|| cells.into_iter().map(Value::from).collect())
}

/// Parse one numeric cell; `None` means the text is not a usable number.
fn parse_number(text: &str) -> Option<Value> {
    if let Ok(n) = text.parse::<i64>() {
        return Some(Value::Integer(n));
    }
    if is_integer_literal(text) {
        // too wide for i64; f64 would merge neighbouring ids
        return None;
    }
    text.parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .map(Value::Number)
}

fn is_integer_literal(text: &str) -> bool {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}
