//! Duplicate and root cause analysis.
//!
//! This module provides functionality for:
//! - Column duplicate statistics (total / unique / duplicated / null counts)
//! - Grouping rows that share a repeated key value
//! - Detecting which other columns vary inside each group
//! - Per-group root cause reports with the conflicting values
//! - Aggregating groups by their set of conflicting columns
//!
//! # Pipeline
//!
//! ```text
//! Table ──► column_statistics / duplicate_value_counts
//!       └─► group_by_key ──► varying_columns (per group)
//!                              ├─► root_cause_entry
//!                              └─► ConflictSetAggregator
//! ```
//!
//! # Example
//!
//! ```
//! use rowdupe::analysis::{AnalysisOptions, Analyzer};
//! use rowdupe::table::{Table, Value};
//!
//! let table = Table::from_rows(
//!     &["id", "x"],
//!     vec![
//!         vec![Value::from(1), Value::from("a")],
//!         vec![Value::from(1), Value::from("b")],
//!         vec![Value::from(2), Value::from("a")],
//!     ],
//! )
//! .unwrap();
//!
//! let options = AnalysisOptions::default()
//!     .with_root_cause(true)
//!     .with_conflict_summary(true);
//! let report = Analyzer::new(options).analyze(&table, "id").unwrap();
//!
//! assert_eq!(report.statistics.total, 3);
//! assert_eq!(report.statistics.unique, 2);
//! assert_eq!(report.statistics.duplicated, 1);
//! assert_eq!(report.groups.len(), 1);
//! assert_eq!(report.conflict_summary.unwrap()[0].columns.label(), "x");
//! ```

pub mod conflicts;
pub mod groups;
pub mod root_cause;
pub mod stats;
pub mod varying;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::table::{Table, TableError};

pub use conflicts::{
    ConflictSet, ConflictSetAggregator, ConflictSummaryEntry, NO_CONFLICT_LABEL,
};
pub use groups::{group_by_key, DuplicateKeyGroup};
pub use root_cause::{root_cause_entry, ConflictingValues, RootCauseEntry};
pub use stats::{
    column_statistics, duplicate_value_counts, DuplicateStatistics, DuplicateValueCount,
};
pub use varying::varying_columns;

/// Which optional outputs an analysis run computes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisOptions {
    /// Build a root cause entry for every duplicate group
    #[serde(default)]
    pub include_root_cause: bool,
    /// Aggregate duplicate groups by their conflicting column set
    #[serde(default)]
    pub include_conflict_summary: bool,
    /// Inspect duplicate groups on the rayon thread pool
    #[serde(default)]
    pub parallel: bool,
}

impl AnalysisOptions {
    /// Enable or disable the root cause report.
    #[must_use]
    pub fn with_root_cause(mut self, enabled: bool) -> Self {
        self.include_root_cause = enabled;
        self
    }

    /// Enable or disable the conflict group summary.
    #[must_use]
    pub fn with_conflict_summary(mut self, enabled: bool) -> Self {
        self.include_conflict_summary = enabled;
        self
    }

    /// Enable or disable parallel group inspection.
    #[must_use]
    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    fn needs_group_details(&self) -> bool {
        self.include_root_cause || self.include_conflict_summary
    }
}

/// Complete result of one analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisReport {
    /// The key column that was analyzed
    pub column: String,
    /// Duplicate counts for the key column
    pub statistics: DuplicateStatistics,
    /// Repeated key values, most frequent first
    pub duplicate_values: Vec<DuplicateValueCount>,
    /// Duplicate groups in first-occurrence order
    pub groups: Vec<DuplicateKeyGroup>,
    /// Per-group root causes, when requested
    pub root_causes: Option<Vec<RootCauseEntry>>,
    /// Groups aggregated by conflict set, when requested
    pub conflict_summary: Option<Vec<ConflictSummaryEntry>>,
}

impl AnalysisReport {
    /// Check whether any key value is duplicated.
    #[must_use]
    pub fn has_duplicates(&self) -> bool {
        !self.groups.is_empty()
    }

    /// Total rows belonging to a duplicate group.
    #[must_use]
    pub fn duplicate_row_total(&self) -> usize {
        self.groups.iter().map(DuplicateKeyGroup::len).sum()
    }
}

/// Per-group output of the inspection stage.
struct GroupFinding {
    varying: Vec<String>,
    root_cause: Option<RootCauseEntry>,
}

/// Runs the full duplicate analysis over a table.
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    options: AnalysisOptions,
}

impl Analyzer {
    /// Create an analyzer with the given options.
    #[must_use]
    pub fn new(options: AnalysisOptions) -> Self {
        Self { options }
    }

    /// The options this analyzer runs with.
    #[must_use]
    pub fn options(&self) -> &AnalysisOptions {
        &self.options
    }

    /// Analyze duplicates of `column` in `table`.
    ///
    /// The column is resolved before any work is done, so an unknown column
    /// yields an error and no partial report. A table without rows yields an
    /// all-zero report.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::ColumnNotFound`] if `column` is not in `table`.
    pub fn analyze(&self, table: &Table, column: &str) -> Result<AnalysisReport, TableError> {
        let key = table.column(column)?;

        let statistics = column_statistics(&key.values);
        let duplicate_values = duplicate_value_counts(&key.values);
        log::debug!(
            "Column `{}`: {} total, {} unique, {} duplicated, {} null",
            column,
            statistics.total,
            statistics.unique,
            statistics.duplicated,
            statistics.nulls
        );

        let groups = group_by_key(table, column)?;
        let findings = self.inspect_groups(table, &groups, column);

        // sequential fold: one update per group, in group order
        let mut aggregator = self
            .options
            .include_conflict_summary
            .then(ConflictSetAggregator::new);
        let mut root_causes = self.options.include_root_cause.then(Vec::new);

        for (group, finding) in groups.iter().zip(findings) {
            if let Some(aggregator) = aggregator.as_mut() {
                aggregator.record(ConflictSet::new(finding.varying), group.len());
            }
            if let (Some(entries), Some(entry)) = (root_causes.as_mut(), finding.root_cause) {
                entries.push(entry);
            }
        }

        let conflict_summary = aggregator.map(ConflictSetAggregator::finish);
        if let Some(summary) = &conflict_summary {
            log::debug!(
                "{} duplicate groups share {} distinct conflict sets",
                groups.len(),
                summary.len()
            );
        }

        Ok(AnalysisReport {
            column: column.to_string(),
            statistics,
            duplicate_values,
            groups,
            root_causes,
            conflict_summary,
        })
    }

    /// Detect varying columns (and root causes) for every group, in group order.
    fn inspect_groups(
        &self,
        table: &Table,
        groups: &[DuplicateKeyGroup],
        column: &str,
    ) -> Vec<GroupFinding> {
        if !self.options.needs_group_details() {
            return Vec::new();
        }

        let inspect = |group: &DuplicateKeyGroup| {
            let varying = varying_columns(table, group, column);
            let root_cause = self
                .options
                .include_root_cause
                .then(|| root_cause_entry(table, group, &varying));
            GroupFinding {
                varying,
                root_cause,
            }
        };

        if self.options.parallel {
            log::debug!("Inspecting {} groups in parallel", groups.len());
            groups.par_iter().map(inspect).collect()
        } else {
            groups.iter().map(inspect).collect()
        }
    }
}
