//! Partitioning rows into duplicate key groups.
//!
//! Rows are grouped by exact equality of the key cell, with null treated as
//! a regular key. Only keys occurring at least twice form a group; singleton
//! rows take no further part in the analysis.
//!
//! # Example
//!
//! ```
//! use rowdupe::analysis::group_by_key;
//! use rowdupe::table::{Table, Value};
//!
//! let table = Table::from_rows(
//!     &["id", "x"],
//!     vec![
//!         vec![Value::from(1), Value::from("a")],
//!         vec![Value::from(2), Value::from("a")],
//!         vec![Value::from(1), Value::from("b")],
//!     ],
//! )
//! .unwrap();
//!
//! let groups = group_by_key(&table, "id").unwrap();
//! assert_eq!(groups.len(), 1);
//! assert_eq!(groups[0].key, Value::from(1));
//! assert_eq!(groups[0].rows, vec![0, 2]);
//! ```

use std::collections::HashMap;

use serde::Serialize;

use crate::table::{Table, TableError, Value};

/// All rows sharing one repeated key value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateKeyGroup {
    /// The shared key value
    pub key: Value,
    /// Row indices into the source table, in table order
    pub rows: Vec<usize>,
}

impl DuplicateKeyGroup {
    /// Create a new group.
    #[must_use]
    pub fn new(key: Value, rows: Vec<usize>) -> Self {
        Self { key, rows }
    }

    /// Number of rows in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Group the rows of `table` by the values of `key_column`.
///
/// Groups appear in order of the first occurrence of their key; rows within
/// a group keep table order. Keys seen only once are dropped.
///
/// # Errors
///
/// Returns [`TableError::ColumnNotFound`] if `key_column` does not exist.
pub fn group_by_key(
    table: &Table,
    key_column: &str,
) -> Result<Vec<DuplicateKeyGroup>, TableError> {
    let keys = &table.column(key_column)?.values;

    let mut index: HashMap<&Value, usize> = HashMap::new();
    let mut buckets: Vec<(&Value, Vec<usize>)> = Vec::new();

    for (row, key) in keys.iter().enumerate() {
        match index.get(key) {
            Some(&slot) => buckets[slot].1.push(row),
            None => {
                index.insert(key, buckets.len());
                buckets.push((key, vec![row]));
            }
        }
    }

    let groups: Vec<DuplicateKeyGroup> = buckets
        .into_iter()
        .filter(|(_, rows)| rows.len() > 1)
        .map(|(key, rows)| DuplicateKeyGroup::new(key.clone(), rows))
        .collect();

    log::debug!(
        "Grouped {} rows by `{}`: {} duplicate groups covering {} rows",
        keys.len(),
        key_column,
        groups.len(),
        groups.iter().map(DuplicateKeyGroup::len).sum::<usize>()
    );

    Ok(groups)
}
