//! Per-group root cause reporting.
//!
//! For each duplicate group the report lists the conflicting columns and,
//! per column, the distinct non-null values observed in the group's rows.

use std::collections::HashSet;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::analysis::conflicts::ConflictSet;
use crate::analysis::groups::DuplicateKeyGroup;
use crate::table::{Table, Value};

/// Distinct observed values per conflicting column.
///
/// Columns keep varying-column order; values keep order of first appearance
/// in the group. Serializes as a JSON-style object in that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConflictingValues(Vec<(String, Vec<Value>)>);

impl ConflictingValues {
    /// Values observed for `column`, if it conflicts.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&[Value]> {
        self.0
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, values)| values.as_slice())
    }

    /// Iterate over `(column, values)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Value])> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_slice()))
    }

    /// Number of conflicting columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if no column conflicts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for ConflictingValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (column, values) in &self.0 {
            map.serialize_entry(column, values)?;
        }
        map.end()
    }
}

/// Root cause details for one duplicate group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RootCauseEntry {
    /// The duplicated key value
    pub key: Value,
    /// Conflicting columns in table order
    pub varying_columns: Vec<String>,
    /// Distinct non-null values per conflicting column
    pub conflicting_values: ConflictingValues,
    /// Number of rows in the group
    pub row_count: usize,
}

impl RootCauseEntry {
    /// The conflicting columns as an order-independent set.
    #[must_use]
    pub fn conflict_set(&self) -> ConflictSet {
        ConflictSet::new(self.varying_columns.iter().cloned())
    }

    /// Alphabetical column names joined with `", "`, or `"None"`.
    #[must_use]
    pub fn conflicting_columns_label(&self) -> String {
        self.conflict_set().label()
    }
}

/// Distinct non-null values of `values` over `rows`, in first-seen order.
fn distinct_non_null<'a>(values: &'a [Value], rows: &[usize]) -> Vec<&'a Value> {
    let mut seen: HashSet<&Value> = HashSet::new();
    rows.iter()
        .filter_map(|&row| values.get(row))
        .filter(|value| !value.is_null())
        .filter(|value| seen.insert(*value))
        .collect()
}

/// Build the root cause entry for `group` from its precomputed varying columns.
///
/// Names in `varying` that are not columns of `table` are skipped.
///
/// # Example
///
/// ```
/// use rowdupe::analysis::{group_by_key, root_cause_entry, varying_columns};
/// use rowdupe::table::{Table, Value};
///
/// let table = Table::from_rows(
///     &["id", "x"],
///     vec![
///         vec![Value::from(1), Value::from("a")],
///         vec![Value::from(1), Value::from("b")],
///         vec![Value::from(1), Value::Null],
///     ],
/// )
/// .unwrap();
///
/// let groups = group_by_key(&table, "id").unwrap();
/// let varying = varying_columns(&table, &groups[0], "id");
/// let entry = root_cause_entry(&table, &groups[0], &varying);
///
/// assert_eq!(
///     entry.conflicting_values.get("x"),
///     Some(&[Value::from("a"), Value::from("b")][..])
/// );
/// ```
#[must_use]
pub fn root_cause_entry(
    table: &Table,
    group: &DuplicateKeyGroup,
    varying: &[String],
) -> RootCauseEntry {
    let conflicting: Vec<(String, Vec<Value>)> = varying
        .iter()
        .filter_map(|name| {
            let column = table.columns().iter().find(|c| &c.name == name)?;
            let values = distinct_non_null(&column.values, &group.rows)
                .into_iter()
                .cloned()
                .collect();
            Some((name.clone(), values))
        })
        .collect();

    RootCauseEntry {
        key: group.key.clone(),
        varying_columns: varying.to_vec(),
        conflicting_values: ConflictingValues(conflicting),
        row_count: group.len(),
    }
}
