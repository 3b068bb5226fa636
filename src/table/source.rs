//! Loading tables from files.
//!
//! [`TableSource`] picks a reader from the file extension: spreadsheet
//! workbooks (`xlsx`, `xlsm`, `xlsb`, `xls`, `ods`) go through
//! [`WorkbookSource`], everything else is read as delimited text by
//! [`CsvSource`]. Both readers share the header and null-marker rules.

use std::io;
use std::path::Path;

use thiserror::Error;

use super::csv::CsvSource;
use super::workbook::WorkbookSource;
use super::{Table, TableError};

/// Cell texts treated as missing values by default.
pub const DEFAULT_NULL_VALUES: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "NULL", "null", "None", "<NA>", "#N/A",
];

/// File extensions read as spreadsheet workbooks.
pub const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Errors that can occur while loading a table.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The file could not be opened.
    #[error("failed to open {path}: {source}")]
    Io {
        /// Path that failed
        path: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The CSV data is invalid (bad encoding, ragged rows, ...).
    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),

    /// The workbook could not be read.
    #[error("workbook error: {0}")]
    Workbook(#[from] calamine::Error),

    /// The workbook contains no worksheet.
    #[error("workbook {0} has no worksheets")]
    NoWorksheet(String),

    /// The parsed data does not form a valid table.
    #[error(transparent)]
    Table(#[from] TableError),
}

/// Reader chosen for one input file.
#[derive(Debug, Clone)]
pub enum TableSource {
    /// Delimited text
    Csv(CsvSource),
    /// First worksheet of a spreadsheet workbook
    Workbook(WorkbookSource),
}

impl TableSource {
    /// Pick the reader for `path` by its extension (case-insensitive).
    ///
    /// The CSV reader is only used for non-workbook files, so its delimiter
    /// does not apply to workbooks. Null markers apply to both.
    #[must_use]
    pub fn for_path(path: &Path, csv: CsvSource) -> Self {
        if is_workbook(path) {
            Self::Workbook(WorkbookSource::default().with_null_values(csv.null_values().to_vec()))
        } else {
            Self::Csv(csv)
        }
    }

    /// Load the whole table.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the file cannot be read or parsed.
    pub fn read_path(&self, path: &Path) -> Result<Table, SourceError> {
        match self {
            Self::Csv(source) => source.read_path(path),
            Self::Workbook(source) => source.read_path(path),
        }
    }

    /// Read only the column names.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the file cannot be read or parsed.
    pub fn read_headers(&self, path: &Path) -> Result<Vec<String>, SourceError> {
        match self {
            Self::Csv(source) => source.read_headers(path),
            Self::Workbook(source) => source.read_headers(path),
        }
    }
}

/// Check whether `path` names a spreadsheet workbook.
#[must_use]
pub fn is_workbook(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            WORKBOOK_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

/// Exact match against the null markers; surrounding whitespace is data.
pub(crate) fn is_null_marker(null_values: &[String], text: &str) -> bool {
    null_values.iter().any(|marker| marker == text)
}

/// Make header names non-blank and unique.
pub(crate) fn disambiguate_headers<S: AsRef<str>>(
    headers: impl IntoIterator<Item = S>,
) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for (idx, header) in headers.into_iter().enumerate() {
        let header = header.as_ref();
        let base = if header.trim().is_empty() {
            format!("Unnamed: {idx}")
        } else {
            header.to_string()
        };

        let mut name = base.clone();
        let mut suffix = 1;
        while names.contains(&name) {
            name = format!("{base}.{suffix}");
            suffix += 1;
        }
        names.push(name);
    }
    names
}
