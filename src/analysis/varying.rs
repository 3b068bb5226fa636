//! Detection of columns that vary within a duplicate group.

use std::collections::HashSet;

use crate::analysis::groups::DuplicateKeyGroup;
use crate::table::{Column, Table, Value};

/// Check whether a column holds more than one distinct value over `rows`.
///
/// Null is a distinct value of its own, so a null next to a non-null cell
/// counts as variation.
fn is_varying(column: &Column, rows: &[usize]) -> bool {
    let mut seen: HashSet<&Value> = HashSet::new();
    for &row in rows {
        if let Some(value) = column.values.get(row) {
            seen.insert(value);
            if seen.len() > 1 {
                return true;
            }
        }
    }
    false
}

/// Names of the non-key columns whose values differ within `group`.
///
/// Names are returned in table column order. An empty result means every row
/// of the group is identical outside the key column.
///
/// # Example
///
/// ```
/// use rowdupe::analysis::{group_by_key, varying_columns};
/// use rowdupe::table::{Table, Value};
///
/// let table = Table::from_rows(
///     &["id", "x", "y"],
///     vec![
///         vec![Value::from(1), Value::from("a"), Value::from("same")],
///         vec![Value::from(1), Value::Null, Value::from("same")],
///     ],
/// )
/// .unwrap();
///
/// let groups = group_by_key(&table, "id").unwrap();
/// assert_eq!(varying_columns(&table, &groups[0], "id"), vec!["x"]);
/// ```
#[must_use]
pub fn varying_columns(
    table: &Table,
    group: &DuplicateKeyGroup,
    key_column: &str,
) -> Vec<String> {
    let varying: Vec<String> = table
        .columns()
        .iter()
        .filter(|column| column.name != key_column)
        .filter(|column| is_varying(column, &group.rows))
        .map(|column| column.name.clone())
        .collect();

    log::trace!(
        "Group {:?} ({} rows) varies in {:?}",
        group.key,
        group.len(),
        varying
    );

    varying
}
