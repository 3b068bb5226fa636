//! In-memory tabular data model.
//!
//! A [`Table`] is an ordered list of named [`Column`]s that all hold the same
//! number of cells. Cells are [`Value`]s, a closed variant over strings,
//! integers, floating-point numbers and null.
//!
//! Equality and hashing of [`Value`] are total so values can be used as
//! `HashMap` keys when grouping and counting:
//!
//! - `Null == Null`
//! - numbers compare by value: integers exactly, `1 == 1.0`, `-0.0 == 0.0`
//! - a string never equals a number (`"1" != 1`)
//!
//! # Example
//!
//! ```
//! use rowdupe::table::{Table, Value};
//!
//! let table = Table::from_rows(
//!     &["id", "name"],
//!     vec![
//!         vec![Value::from(1), Value::from("alice")],
//!         vec![Value::from(1), Value::Null],
//!     ],
//! )
//! .unwrap();
//!
//! assert_eq!(table.row_count(), 2);
//! assert_eq!(table.column("name").unwrap().values[1], Value::Null);
//! ```

pub mod csv;
pub mod source;
pub mod workbook;

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Serialize, Serializer};
use thiserror::Error;

pub use self::csv::CsvSource;
pub use self::source::{SourceError, TableSource, DEFAULT_NULL_VALUES};
pub use self::workbook::WorkbookSource;

/// Minimum Jaro-Winkler score for a column name to be offered as a suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// Errors raised when building or querying a [`Table`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TableError {
    /// The requested column does not exist.
    #[error(
        "column `{column}` not found{}",
        .suggestion.as_ref().map(|s| format!(" (did you mean `{s}`?)")).unwrap_or_default()
    )]
    ColumnNotFound {
        /// Name that was requested
        column: String,
        /// Closest existing column name, if any is similar enough
        suggestion: Option<String>,
    },

    /// A column's length disagrees with the rest of the table.
    #[error("malformed table: column `{column}` has {actual} values, expected {expected}")]
    Malformed {
        /// Offending column
        column: String,
        /// Row count established by the first column
        expected: usize,
        /// Length of the offending column
        actual: usize,
    },

    /// Two columns share a name.
    #[error("malformed table: duplicate column name `{0}`")]
    DuplicateColumn(String),
}

/// A single cell value.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// Text cell
    String(String),
    /// Integer cell, kept exact over the whole `i64` range
    Integer(i64),
    /// Floating-point cell (never NaN when built through [`Value::number`])
    Number(f64),
    /// Missing cell
    #[default]
    Null,
}

/// Numeric identity shared by [`Value::Integer`] and [`Value::Number`].
#[derive(PartialEq, Eq, Hash)]
enum NumberKey {
    Exact(i64),
    Bits(u64),
}

impl Value {
    /// Build a numeric value, mapping NaN to [`Value::Null`].
    #[must_use]
    pub fn number(n: f64) -> Self {
        if n.is_nan() {
            Self::Null
        } else {
            Self::Number(n)
        }
    }

    /// Check whether this is a null cell.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The integer a float holds exactly, if any (`-0.0` is `0`).
    fn exact_integer(n: f64) -> Option<i64> {
        const LIMIT: f64 = 9_223_372_036_854_775_808.0; // 2^63
        (n.fract() == 0.0 && (-LIMIT..LIMIT).contains(&n)).then_some(n as i64)
    }

    fn number_key(&self) -> Option<NumberKey> {
        match self {
            Self::Integer(i) => Some(NumberKey::Exact(*i)),
            Self::Number(n) => Some(match Self::exact_integer(*n) {
                Some(i) => NumberKey::Exact(i),
                None if n.is_nan() => NumberKey::Bits(f64::NAN.to_bits()),
                None => NumberKey::Bits(n.to_bits()),
            }),
            Self::String(_) | Self::Null => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Null, Self::Null) => true,
            _ => match (self.number_key(), other.number_key()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::String(s) => {
                0u8.hash(state);
                s.hash(state);
            }
            Self::Null => 1u8.hash(state),
            Self::Integer(_) | Self::Number(_) => {
                2u8.hash(state);
                self.number_key().hash(state);
            }
        }
    }
}

impl fmt::Display for Value {
    /// Strings verbatim, integral numbers without a fraction, null as empty.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Number(n) => match Self::exact_integer(*n) {
                Some(i) => write!(f, "{i}"),
                None => write!(f, "{n}"),
            },
            Self::Null => Ok(()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::String(s) => serializer.serialize_str(s),
            Self::Integer(i) => serializer.serialize_i64(*i),
            Self::Number(n) => match Self::exact_integer(*n) {
                Some(i) => serializer.serialize_i64(i),
                None => serializer.serialize_f64(*n),
            },
            Self::Null => serializer.serialize_none(),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Integer(i64::from(n))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// A named column of cell values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Column name, unique within its table
    pub name: String,
    /// One value per row
    pub values: Vec<Value>,
}

impl Column {
    /// Create a new column.
    #[must_use]
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Number of cells in this column.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if this column has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// An ordered collection of equally long, uniquely named columns.
///
/// The invariants are checked once in [`Table::new`]; every analysis stage
/// treats the table as read-only input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Build a table, validating column lengths and names.
    ///
    /// # Errors
    ///
    /// - [`TableError::Malformed`] if any column length differs from the first
    /// - [`TableError::DuplicateColumn`] if two columns share a name
    pub fn new(columns: Vec<Column>) -> Result<Self, TableError> {
        if let Some(first) = columns.first() {
            let expected = first.len();
            for column in &columns {
                if column.len() != expected {
                    return Err(TableError::Malformed {
                        column: column.name.clone(),
                        expected,
                        actual: column.len(),
                    });
                }
            }
        }

        for (idx, column) in columns.iter().enumerate() {
            if columns[..idx].iter().any(|c| c.name == column.name) {
                return Err(TableError::DuplicateColumn(column.name.clone()));
            }
        }

        Ok(Self { columns })
    }

    /// Build a table from a header list and row-major cell values.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Malformed`] if a row has the wrong number of cells,
    /// plus anything [`Table::new`] rejects.
    pub fn from_rows(headers: &[&str], rows: Vec<Vec<Value>>) -> Result<Self, TableError> {
        let mut columns: Vec<Column> = headers
            .iter()
            .map(|h| Column::new(*h, Vec::with_capacity(rows.len())))
            .collect();

        for (row_idx, row) in rows.into_iter().enumerate() {
            if row.len() != columns.len() {
                return Err(TableError::Malformed {
                    column: format!("<row {row_idx}>"),
                    expected: columns.len(),
                    actual: row.len(),
                });
            }
            for (column, value) in columns.iter_mut().zip(row) {
                column.values.push(value);
            }
        }

        Self::new(columns)
    }

    /// Columns in table order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names in table order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Number of rows (0 for a table without columns).
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    /// Number of columns.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Position of a column by exact (case-sensitive) name.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::ColumnNotFound`] with the closest name as a hint.
    pub fn column_index(&self, name: &str) -> Result<usize, TableError> {
        self.columns
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| TableError::ColumnNotFound {
                column: name.to_string(),
                suggestion: self.suggest_column(name),
            })
    }

    /// Look up a column by exact (case-sensitive) name.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::ColumnNotFound`] with the closest name as a hint.
    pub fn column(&self, name: &str) -> Result<&Column, TableError> {
        self.column_index(name).map(|idx| &self.columns[idx])
    }

    /// Closest column name, ignoring case when scoring.
    fn suggest_column(&self, name: &str) -> Option<String> {
        let wanted = name.to_lowercase();
        self.columns
            .iter()
            .map(|c| (strsim::jaro_winkler(&wanted, &c.name.to_lowercase()), &c.name))
            .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
            .max_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, n)| n.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_value_null_equals_null() {
        assert_eq!(Value::Null, Value::Null);
        assert_ne!(Value::Null, Value::from(""));
    }

    #[test]
    fn test_value_string_never_equals_number() {
        assert_ne!(Value::from("1"), Value::from(1));
    }

    #[test]
    fn test_value_signed_zero_hashes_together() {
        let set: HashSet<Value> = [Value::from(0.0), Value::from(-0.0)].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_value_nan_becomes_null() {
        assert!(Value::number(f64::NAN).is_null());
        assert!(Value::from(f64::NAN).is_null());
    }

    #[test]
    fn test_value_wide_integers_stay_distinct() {
        let a = Value::from(12_345_678_901_234_567_i64);
        let b = Value::from(12_345_678_901_234_568_i64);
        assert_ne!(a, b);
        let set: HashSet<Value> = [a.clone(), b].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert_eq!(a.to_string(), "12345678901234567");
        assert_eq!(serde_json::to_string(&a).unwrap(), "12345678901234567");
    }

    #[test]
    fn test_value_integer_equals_integral_float() {
        assert_eq!(Value::from(1), Value::from(1.0));
        assert_eq!(Value::from(0), Value::from(-0.0));
        assert_ne!(Value::from(1), Value::from(1.5));
        let set: HashSet<Value> = [Value::from(7), Value::from(7.0)].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_value_extreme_integers() {
        assert_eq!(Value::from(i64::MAX).to_string(), i64::MAX.to_string());
        assert_eq!(Value::from(i64::MIN), Value::from(-9_223_372_036_854_775_808.0));
        // 2^63 is not an i64
        assert_ne!(Value::from(i64::MAX), Value::from(9_223_372_036_854_775_808.0));
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::from(2.0).to_string(), "2");
        assert_eq!(Value::from(2.5).to_string(), "2.5");
        assert_eq!(Value::from("abc").to_string(), "abc");
        assert_eq!(Value::Null.to_string(), "");
    }

    #[test]
    fn test_value_serialize() {
        let json = serde_json::to_string(&vec![
            Value::from(3),
            Value::from(0.5),
            Value::from("x"),
            Value::Null,
        ])
        .unwrap();
        assert_eq!(json, r#"[3,0.5,"x",null]"#);
    }

    #[test]
    fn test_table_rejects_mismatched_lengths() {
        let result = Table::new(vec![
            Column::new("a", vec![Value::from(1), Value::from(2)]),
            Column::new("b", vec![Value::from(1)]),
        ]);
        assert_eq!(
            result,
            Err(TableError::Malformed {
                column: "b".to_string(),
                expected: 2,
                actual: 1,
            })
        );
    }

    #[test]
    fn test_table_rejects_duplicate_names() {
        let result = Table::new(vec![Column::new("a", vec![]), Column::new("a", vec![])]);
        assert_eq!(result, Err(TableError::DuplicateColumn("a".to_string())));
    }

    #[test]
    fn test_table_from_rows_rejects_short_row() {
        let result = Table::from_rows(&["a", "b"], vec![vec![Value::from(1)]]);
        assert!(matches!(result, Err(TableError::Malformed { .. })));
    }

    #[test]
    fn test_empty_table_has_no_rows() {
        assert_eq!(Table::default().row_count(), 0);
        let table = Table::from_rows(&["a"], vec![]).unwrap();
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.column_count(), 1);
    }

    #[test]
    fn test_column_lookup_is_case_sensitive() {
        let table = Table::from_rows(&["Email"], vec![vec![Value::from("x")]]).unwrap();
        assert!(table.column("Email").is_ok());
        assert!(table.column("email").is_err());
    }

    #[test]
    fn test_column_not_found_suggestion() {
        let table = Table::from_rows(&["customer_id", "amount"], vec![]).unwrap();
        let err = table.column("customer_di").unwrap_err();
        assert_eq!(
            err,
            TableError::ColumnNotFound {
                column: "customer_di".to_string(),
                suggestion: Some("customer_id".to_string()),
            }
        );
        assert!(err.to_string().contains("did you mean `customer_id`"));
    }

    #[test]
    fn test_column_not_found_without_suggestion() {
        let table = Table::from_rows(&["amount"], vec![]).unwrap();
        let err = table.column("zzz").unwrap_err();
        assert_eq!(err.to_string(), "column `zzz` not found");
    }
}
