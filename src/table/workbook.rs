//! Spreadsheet workbook table source.
//!
//! Reads the first worksheet of an Excel or OpenDocument workbook through
//! calamine. The first row is the header, named like CSV headers. Cells map
//! onto [`Value`] by their stored type:
//!
//! - empty and error cells are null
//! - integer cells stay exact, float and date cells are numbers (dates as
//!   their serial number)
//! - text cells equal to a null marker are null, other text is kept as is
//! - booleans read as `TRUE` / `FALSE`

use std::fs;
use std::path::Path;

use calamine::{open_workbook_auto, Data, DataType, Reader};

use super::source::{disambiguate_headers, is_null_marker, SourceError, DEFAULT_NULL_VALUES};
use super::{Column, Table, Value};

/// Workbook reader configuration.
#[derive(Debug, Clone)]
pub struct WorkbookSource {
    null_values: Vec<String>,
}

impl Default for WorkbookSource {
    fn default() -> Self {
        Self {
            null_values: DEFAULT_NULL_VALUES.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

impl WorkbookSource {
    /// Replace the null marker list.
    #[must_use]
    pub fn with_null_values(mut self, null_values: Vec<String>) -> Self {
        self.null_values = null_values;
        self
    }

    /// Null markers in effect.
    #[must_use]
    pub fn null_values(&self) -> &[String] {
        &self.null_values
    }

    /// Load the first worksheet of a workbook.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the file cannot be opened, is not a
    /// workbook, or has no worksheet.
    pub fn read_path(&self, path: &Path) -> Result<Table, SourceError> {
        let mut rows = first_sheet_rows(path)?.into_iter();
        let Some(header) = rows.next() else {
            return Ok(Table::default());
        };
        let names = disambiguate_headers(header.iter().map(header_text));

        let mut cells: Vec<Vec<Value>> = vec![Vec::new(); names.len()];
        for row in rows {
            for (idx, column) in cells.iter_mut().enumerate() {
                column.push(row.get(idx).map_or(Value::Null, |cell| self.cell_value(cell)));
            }
        }

        let columns: Vec<Column> = names
            .into_iter()
            .zip(cells)
            .map(|(name, values)| Column::new(name, values))
            .collect();

        let table = Table::new(columns)?;
        log::debug!(
            "Loaded worksheet with {} rows and {} columns",
            table.row_count(),
            table.column_count()
        );
        Ok(table)
    }

    /// Read only the header row of the first worksheet.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the workbook cannot be read.
    pub fn read_headers(&self, path: &Path) -> Result<Vec<String>, SourceError> {
        let rows = first_sheet_rows(path)?;
        Ok(rows
            .first()
            .map(|header| disambiguate_headers(header.iter().map(header_text)))
            .unwrap_or_default())
    }

    fn cell_value(&self, cell: &Data) -> Value {
        match cell {
            Data::Empty | Data::Error(_) => Value::Null,
            Data::Int(n) => Value::Integer(*n),
            Data::Float(n) => Value::number(*n),
            Data::DateTime(dt) => Value::number(dt.as_f64()),
            Data::Bool(b) => Value::from(if *b { "TRUE" } else { "FALSE" }),
            Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
                if is_null_marker(&self.null_values, s) {
                    Value::Null
                } else {
                    Value::from(s.as_str())
                }
            }
        }
    }
}

fn first_sheet_rows(path: &Path) -> Result<Vec<Vec<Data>>, SourceError> {
    fs::metadata(path).map_err(|source| SourceError::Io {
        path: path.display().to_string(),
        source,
    })?;
    log::debug!("Reading workbook from {}", path.display());

    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| SourceError::NoWorksheet(path.display().to_string()))??;
    Ok(range.rows().map(<[Data]>::to_vec).collect())
}

fn header_text(cell: &Data) -> String {
    cell.as_string().unwrap_or_else(|| cell.to_string())
}
