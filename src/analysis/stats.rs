//! Duplicate statistics for a single column.
//!
//! Counts treat null as an ordinary value: several null cells form one
//! distinct value, and that value is duplicated when it occurs twice.

use std::collections::HashMap;

use serde::Serialize;

use crate::table::Value;

/// Duplicate counts for one column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DuplicateStatistics {
    /// Number of cells, nulls included
    pub total: usize,
    /// Number of distinct values (null counts as one)
    pub unique: usize,
    /// Number of distinct values occurring more than once
    pub duplicated: usize,
    /// Number of null cells
    pub nulls: usize,
    /// Number of cells repeating a value seen earlier in the column
    pub duplicate_rows: usize,
}

impl DuplicateStatistics {
    /// Check whether any value occurs more than once.
    #[must_use]
    pub fn has_duplicates(&self) -> bool {
        self.duplicated > 0
    }
}

/// A key value with its occurrence count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateValueCount {
    /// The repeated value
    pub value: Value,
    /// How many cells hold it
    pub count: usize,
}

/// Occurrence counts in order of first appearance.
fn value_counts(values: &[Value]) -> Vec<(&Value, usize)> {
    let mut index: HashMap<&Value, usize> = HashMap::new();
    let mut counts: Vec<(&Value, usize)> = Vec::new();

    for value in values {
        match index.get(value) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                index.insert(value, counts.len());
                counts.push((value, 1));
            }
        }
    }

    counts
}

/// Compute total, unique, duplicated and null counts for a column.
///
/// The result does not depend on the order of `values`.
///
/// # Example
///
/// ```
/// use rowdupe::analysis::column_statistics;
/// use rowdupe::table::Value;
///
/// let values = vec![Value::from(1), Value::from(1), Value::from(2), Value::Null];
/// let stats = column_statistics(&values);
///
/// assert_eq!(stats.total, 4);
/// assert_eq!(stats.unique, 3);
/// assert_eq!(stats.duplicated, 1);
/// assert_eq!(stats.nulls, 1);
/// ```
#[must_use]
pub fn column_statistics(values: &[Value]) -> DuplicateStatistics {
    let counts = value_counts(values);
    let total = values.len();
    let unique = counts.len();

    DuplicateStatistics {
        total,
        unique,
        duplicated: counts.iter().filter(|(_, c)| *c > 1).count(),
        nulls: values.iter().filter(|v| v.is_null()).count(),
        duplicate_rows: total - unique,
    }
}

/// List values occurring more than once with their counts.
///
/// Sorted by count descending; equal counts keep first-seen order.
#[must_use]
pub fn duplicate_value_counts(values: &[Value]) -> Vec<DuplicateValueCount> {
    let mut duplicates: Vec<DuplicateValueCount> = value_counts(values)
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(value, count)| DuplicateValueCount {
            value: value.clone(),
            count,
        })
        .collect();

    // stable: ties stay in first-seen order
    duplicates.sort_by(|a, b| b.count.cmp(&a.count));
    duplicates
}
