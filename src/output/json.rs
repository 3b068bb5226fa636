//! JSON output formatter for analysis reports.
//!
//! Provides machine-readable JSON output for scripting and automation.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "column": "id",
//!   "summary": {
//!     "total_values": 3,
//!     "unique_values": 2,
//!     "duplicated_values": 1,
//!     "null_values": 0,
//!     "duplicate_rows": 1,
//!     "duplicate_groups": 1,
//!     "rows_in_duplicate_groups": 2,
//!     "exit_code": 0,
//!     "exit_code_name": "RW000"
//!   },
//!   "duplicate_values": [{ "value": 1, "count": 2 }],
//!   "root_causes": [
//!     {
//!       "value": 1,
//!       "row_count": 2,
//!       "conflicting_columns": "x",
//!       "varying_columns": ["x"],
//!       "conflicting_values": { "x": ["a", "b"] }
//!     }
//!   ],
//!   "conflict_summary": [
//!     {
//!       "conflicting_columns": "x",
//!       "columns": ["x"],
//!       "affected_duplicate_groups": 1,
//!       "affected_rows": 2
//!     }
//!   ]
//! }
//! ```
//!
//! `root_causes` and `conflict_summary` are omitted when not computed.

use std::io::Write;

use serde::Serialize;

use crate::analysis::{
    AnalysisReport, ConflictSummaryEntry, ConflictingValues, DuplicateValueCount, RootCauseEntry,
};
use crate::error::ExitCode;
use crate::table::Value;

/// A repeated key value in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonDuplicateValue {
    /// The key value
    pub value: Value,
    /// Number of rows holding it
    pub count: usize,
}

impl From<&DuplicateValueCount> for JsonDuplicateValue {
    fn from(duplicate: &DuplicateValueCount) -> Self {
        Self {
            value: duplicate.value.clone(),
            count: duplicate.count,
        }
    }
}

/// A root cause entry in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRootCause {
    /// The duplicated key value
    pub value: Value,
    /// Rows in the duplicate group
    pub row_count: usize,
    /// Display label of the conflicting columns (`"None"` if none)
    pub conflicting_columns: String,
    /// Conflicting columns in table order
    pub varying_columns: Vec<String>,
    /// Distinct non-null values per conflicting column
    pub conflicting_values: ConflictingValues,
}

impl From<&RootCauseEntry> for JsonRootCause {
    fn from(entry: &RootCauseEntry) -> Self {
        Self {
            value: entry.key.clone(),
            row_count: entry.row_count,
            conflicting_columns: entry.conflicting_columns_label(),
            varying_columns: entry.varying_columns.clone(),
            conflicting_values: entry.conflicting_values.clone(),
        }
    }
}

/// A conflict set summary row in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonConflictGroup {
    /// Display label of the conflict set (`"None"` if empty)
    pub conflicting_columns: String,
    /// Columns of the set in alphabetical order
    pub columns: Vec<String>,
    /// Duplicate groups with exactly this set
    pub affected_duplicate_groups: usize,
    /// Rows across those groups
    pub affected_rows: usize,
}

impl From<&ConflictSummaryEntry> for JsonConflictGroup {
    fn from(entry: &ConflictSummaryEntry) -> Self {
        Self {
            conflicting_columns: entry.columns.label(),
            columns: entry.columns.columns().to_vec(),
            affected_duplicate_groups: entry.group_count,
            affected_rows: entry.row_count,
        }
    }
}

/// Summary statistics in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    /// Number of values in the column, nulls included
    pub total_values: usize,
    /// Number of distinct values (null counts as one)
    pub unique_values: usize,
    /// Number of distinct values occurring more than once
    pub duplicated_values: usize,
    /// Number of null values
    pub null_values: usize,
    /// Rows repeating a value seen earlier
    pub duplicate_rows: usize,
    /// Number of duplicate groups
    pub duplicate_groups: usize,
    /// Rows belonging to any duplicate group
    pub rows_in_duplicate_groups: usize,
    /// The exit code number
    pub exit_code: i32,
    /// The machine-readable exit code name (e.g., "RW000")
    pub exit_code_name: String,
}

impl JsonSummary {
    /// Create a JSON summary from a report and an exit code.
    #[must_use]
    pub fn from_report(report: &AnalysisReport, exit_code: ExitCode) -> Self {
        let stats = &report.statistics;
        Self {
            total_values: stats.total,
            unique_values: stats.unique,
            duplicated_values: stats.duplicated,
            null_values: stats.nulls,
            duplicate_rows: stats.duplicate_rows,
            duplicate_groups: report.groups.len(),
            rows_in_duplicate_groups: report.duplicate_row_total(),
            exit_code: exit_code.as_i32(),
            exit_code_name: exit_code.code_prefix().to_string(),
        }
    }
}

/// Complete JSON output structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// The analyzed key column
    pub column: String,
    /// Column statistics
    pub summary: JsonSummary,
    /// Repeated key values, most frequent first
    pub duplicate_values: Vec<JsonDuplicateValue>,
    /// Per-group root causes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_causes: Option<Vec<JsonRootCause>>,
    /// Groups aggregated by conflict set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflict_summary: Option<Vec<JsonConflictGroup>>,
}

impl JsonOutput {
    /// Create a new JSON output from a report and exit code.
    ///
    /// # Example
    ///
    /// ```
    /// use rowdupe::analysis::Analyzer;
    /// use rowdupe::error::ExitCode;
    /// use rowdupe::output::json::JsonOutput;
    /// use rowdupe::table::{Table, Value};
    ///
    /// let table = Table::from_rows(
    ///     &["id"],
    ///     vec![vec![Value::from(1)], vec![Value::from(1)]],
    /// )
    /// .unwrap();
    /// let report = Analyzer::default().analyze(&table, "id").unwrap();
    ///
    /// let output = JsonOutput::new(&report, ExitCode::Success);
    /// assert_eq!(output.duplicate_values.len(), 1);
    /// assert_eq!(output.summary.duplicate_groups, 1);
    /// ```
    #[must_use]
    pub fn new(report: &AnalysisReport, exit_code: ExitCode) -> Self {
        Self {
            column: report.column.clone(),
            summary: JsonSummary::from_report(report, exit_code),
            duplicate_values: report.duplicate_values.iter().map(Into::into).collect(),
            root_causes: report
                .root_causes
                .as_ref()
                .map(|entries| entries.iter().map(Into::into).collect()),
            conflict_summary: report
                .conflict_summary
                .as_ref()
                .map(|entries| entries.iter().map(Into::into).collect()),
        }
    }

    /// Serialize to compact JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write pretty-printed JSON followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writeln!(writer)
    }
}
