//! Aggregation of duplicate groups by their set of conflicting columns.
//!
//! Groups that disagree in exactly the same columns usually share a root
//! cause (a stale import, a column filled by two systems, ...). The
//! aggregator folds the per-group conflict sets into one summary entry per
//! distinct set, counting groups and affected rows.
//!
//! # Example
//!
//! ```
//! use rowdupe::analysis::{ConflictSet, ConflictSetAggregator};
//!
//! let mut aggregator = ConflictSetAggregator::new();
//! aggregator.record(ConflictSet::new(["email"]), 2);
//! aggregator.record(ConflictSet::new(["phone", "email"]), 3);
//! aggregator.record(ConflictSet::new(["email"]), 4);
//!
//! let summary = aggregator.finish();
//! assert_eq!(summary[0].columns.label(), "email");
//! assert_eq!(summary[0].group_count, 2);
//! assert_eq!(summary[0].row_count, 6);
//! assert_eq!(summary[1].columns.label(), "email, phone");
//! ```

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

/// Label used for a group whose rows agree in every non-key column.
pub const NO_CONFLICT_LABEL: &str = "None";

/// An order-independent set of column names.
///
/// Names are kept sorted and deduplicated, so two sets with the same
/// members compare and hash equal regardless of insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ConflictSet(Vec<String>);

impl ConflictSet {
    /// Build a set from column names.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = columns.into_iter().map(Into::into).collect();
        names.sort();
        names.dedup();
        Self(names)
    }

    /// Column names in alphabetical order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.0
    }

    /// Number of columns in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if no column conflicts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Alphabetical names joined with `", "`, or `"None"` for the empty set.
    #[must_use]
    pub fn label(&self) -> String {
        if self.0.is_empty() {
            NO_CONFLICT_LABEL.to_string()
        } else {
            self.0.join(", ")
        }
    }
}

impl fmt::Display for ConflictSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Accumulated totals for one conflict set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConflictSummaryEntry {
    /// The shared set of conflicting columns
    pub columns: ConflictSet,
    /// Number of duplicate groups with exactly this set
    pub group_count: usize,
    /// Total rows across those groups
    pub row_count: usize,
}

/// Fold state mapping each conflict set to its running totals.
///
/// Entries are kept in first-seen order so the final sort can break
/// `row_count` ties deterministically.
#[derive(Debug, Default)]
pub struct ConflictSetAggregator {
    index: HashMap<ConflictSet, usize>,
    entries: Vec<ConflictSummaryEntry>,
}

impl ConflictSetAggregator {
    /// Create an empty aggregator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one duplicate group with `rows` rows.
    pub fn record(&mut self, columns: ConflictSet, rows: usize) {
        let slot = match self.index.get(&columns) {
            Some(&slot) => slot,
            None => {
                let slot = self.entries.len();
                self.index.insert(columns.clone(), slot);
                self.entries.push(ConflictSummaryEntry {
                    columns,
                    group_count: 0,
                    row_count: 0,
                });
                slot
            }
        };

        let entry = &mut self.entries[slot];
        entry.group_count += 1;
        entry.row_count += rows;
    }

    /// Number of distinct conflict sets seen so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no group has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Finalize into entries sorted by `row_count` descending.
    ///
    /// Ties keep the order in which their sets were first recorded.
    #[must_use]
    pub fn finish(self) -> Vec<ConflictSummaryEntry> {
        let mut entries = self.entries;
        entries.sort_by(|a, b| b.row_count.cmp(&a.row_count));
        entries
    }
}

impl Extend<(ConflictSet, usize)> for ConflictSetAggregator {
    fn extend<T: IntoIterator<Item = (ConflictSet, usize)>>(&mut self, iter: T) {
        for (columns, rows) in iter {
            self.record(columns, rows);
        }
    }
}

impl FromIterator<(ConflictSet, usize)> for ConflictSetAggregator {
    fn from_iter<T: IntoIterator<Item = (ConflictSet, usize)>>(iter: T) -> Self {
        let mut aggregator = Self::new();
        aggregator.extend(iter);
        aggregator
    }
}
