//! CSV export of analysis reports.
//!
//! Each report artifact is one CSV table:
//!
//! | File                         | Columns                                                   |
//! |------------------------------|-----------------------------------------------------------|
//! | `duplicate_values.csv`       | `<key column>`, `Count`                                   |
//! | `root_cause_report.csv`      | `<key column>`, `Conflicting_Columns`, `Conflicting_Values` |
//! | `conflict_group_summary.csv` | `Conflicting_Columns`, `Affected_Duplicate_Groups`, `Affected_Rows` |
//!
//! `Conflicting_Values` holds a JSON object mapping each conflicting column
//! to its distinct values, or `None` when the rows agree everywhere.
//!
//! # Example
//!
//! ```no_run
//! use rowdupe::analysis::{AnalysisOptions, Analyzer};
//! use rowdupe::output::csv::CsvOutput;
//! use rowdupe::table::CsvSource;
//! use std::path::Path;
//!
//! let table = CsvSource::default().read_path(Path::new("customers.csv")).unwrap();
//! let options = AnalysisOptions::default().with_root_cause(true);
//! let report = Analyzer::new(options).analyze(&table, "email").unwrap();
//!
//! let written = CsvOutput::new(&report).export_to_dir(Path::new("reports")).unwrap();
//! println!("wrote {} files", written.len());
//! ```

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::analysis::{AnalysisReport, ConflictingValues, NO_CONFLICT_LABEL};

/// File name of the duplicate value table.
pub const DUPLICATE_VALUES_FILE: &str = "duplicate_values.csv";
/// File name of the root cause report.
pub const ROOT_CAUSE_FILE: &str = "root_cause_report.csv";
/// File name of the conflict set summary.
pub const CONFLICT_SUMMARY_FILE: &str = "conflict_group_summary.csv";

/// Errors that can occur during CSV output generation.
#[derive(Debug, Error)]
pub enum CsvOutputError {
    /// I/O error during writing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error during CSV serialization.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error while encoding conflicting values.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// CSV output formatter.
pub struct CsvOutput<'a> {
    report: &'a AnalysisReport,
}

impl<'a> CsvOutput<'a> {
    /// Create a new CSV output formatter.
    #[must_use]
    pub fn new(report: &'a AnalysisReport) -> Self {
        Self { report }
    }

    /// Write the repeated key values with their counts.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if writing fails.
    pub fn write_duplicate_values<W: io::Write>(&self, writer: W) -> Result<(), CsvOutputError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record([self.report.column.as_str(), "Count"])?;

        for duplicate in &self.report.duplicate_values {
            csv_writer.write_record([duplicate.value.to_string(), duplicate.count.to_string()])?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Write the per-group root cause report. Writes nothing if it was not computed.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if writing or value encoding fails.
    pub fn write_root_causes<W: io::Write>(&self, writer: W) -> Result<(), CsvOutputError> {
        let Some(entries) = &self.report.root_causes else {
            return Ok(());
        };

        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record([
            self.report.column.as_str(),
            "Conflicting_Columns",
            "Conflicting_Values",
        ])?;

        for entry in entries {
            csv_writer.write_record([
                entry.key.to_string(),
                entry.conflicting_columns_label(),
                encode_values(&entry.conflicting_values)?,
            ])?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Write the conflict set summary. Writes nothing if it was not computed.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if writing fails.
    pub fn write_conflict_summary<W: io::Write>(&self, writer: W) -> Result<(), CsvOutputError> {
        let Some(entries) = &self.report.conflict_summary else {
            return Ok(());
        };

        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record([
            "Conflicting_Columns",
            "Affected_Duplicate_Groups",
            "Affected_Rows",
        ])?;

        for entry in entries {
            csv_writer.write_record([
                entry.columns.label(),
                entry.group_count.to_string(),
                entry.row_count.to_string(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Write every computed table, separated by a blank line.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if writing fails.
    pub fn write_to<W: io::Write>(&self, mut writer: W) -> Result<(), CsvOutputError> {
        self.write_duplicate_values(&mut writer)?;
        if self.report.root_causes.is_some() {
            writer.write_all(b"\n")?;
            self.write_root_causes(&mut writer)?;
        }
        if self.report.conflict_summary.is_some() {
            writer.write_all(b"\n")?;
            self.write_conflict_summary(&mut writer)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Generate CSV output as a string.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if serialization fails.
    pub fn to_string(&self) -> Result<String, CsvOutputError> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).to_string())
    }

    /// Write each computed table to its own file in `dir`.
    ///
    /// The directory is created if needed. Returns the paths written.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if the directory or a file cannot be written.
    pub fn export_to_dir(&self, dir: &Path) -> Result<Vec<PathBuf>, CsvOutputError> {
        fs::create_dir_all(dir)?;
        let mut written = Vec::new();

        let path = dir.join(DUPLICATE_VALUES_FILE);
        self.write_duplicate_values(File::create(&path)?)?;
        written.push(path);

        if self.report.root_causes.is_some() {
            let path = dir.join(ROOT_CAUSE_FILE);
            self.write_root_causes(File::create(&path)?)?;
            written.push(path);
        }

        if self.report.conflict_summary.is_some() {
            let path = dir.join(CONFLICT_SUMMARY_FILE);
            self.write_conflict_summary(File::create(&path)?)?;
            written.push(path);
        }

        for path in &written {
            log::info!("Exported {}", path.display());
        }
        Ok(written)
    }
}

fn encode_values(values: &ConflictingValues) -> Result<String, serde_json::Error> {
    if values.is_empty() {
        Ok(NO_CONFLICT_LABEL.to_string())
    } else {
        serde_json::to_string(values)
    }
}
