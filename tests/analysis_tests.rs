//! Integration tests for the analysis pipeline.
//!
//! These tests run [`Analyzer`] end to end over in-memory tables and check
//! statistics, duplicate groups, root causes and the conflict set summary.

use rowdupe::analysis::{AnalysisOptions, AnalysisReport, Analyzer, ConflictSet};
use rowdupe::table::{Column, Table, TableError, Value};

// =============================================================================
// Helper Functions
// =============================================================================

fn full_options() -> AnalysisOptions {
    AnalysisOptions::default()
        .with_root_cause(true)
        .with_conflict_summary(true)
}

fn analyze(table: &Table, column: &str) -> AnalysisReport {
    Analyzer::new(full_options()).analyze(table, column).unwrap()
}

fn rows(headers: &[&str], rows: Vec<Vec<Value>>) -> Table {
    Table::from_rows(headers, rows).unwrap()
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_single_varying_column() {
    let table = rows(
        &["id", "x"],
        vec![
            vec![Value::from(1), Value::from("a")],
            vec![Value::from(1), Value::from("b")],
            vec![Value::from(2), Value::from("a")],
        ],
    );
    let report = analyze(&table, "id");

    assert_eq!(report.statistics.total, 3);
    assert_eq!(report.statistics.unique, 2);
    assert_eq!(report.statistics.duplicated, 1);
    assert_eq!(report.duplicate_values.len(), 1);
    assert_eq!(report.duplicate_values[0].value, Value::from(1));
    assert_eq!(report.duplicate_values[0].count, 2);

    assert_eq!(report.groups.len(), 1);
    assert_eq!(report.groups[0].key, Value::from(1));
    assert_eq!(report.groups[0].rows, vec![0, 1]);

    let root_causes = report.root_causes.unwrap();
    assert_eq!(root_causes.len(), 1);
    assert_eq!(root_causes[0].varying_columns, vec!["x".to_string()]);
    assert_eq!(
        root_causes[0].conflicting_values.get("x").unwrap(),
        &[Value::from("a"), Value::from("b")]
    );
}

#[test]
fn test_identical_rows_have_no_conflict() {
    let table = rows(
        &["id", "name", "city"],
        vec![
            vec![Value::from(7), Value::from("Ann"), Value::from("Oslo")],
            vec![Value::from(7), Value::from("Ann"), Value::from("Oslo")],
            vec![Value::from(7), Value::from("Ann"), Value::from("Oslo")],
        ],
    );
    let report = analyze(&table, "id");

    let root_causes = report.root_causes.unwrap();
    assert!(root_causes[0].varying_columns.is_empty());
    assert_eq!(root_causes[0].conflicting_columns_label(), "None");
    assert!(root_causes[0].conflicting_values.is_empty());

    let summary = report.conflict_summary.unwrap();
    assert_eq!(summary.len(), 1);
    assert_eq!(summary[0].columns.label(), "None");
    assert_eq!(summary[0].group_count, 1);
    assert_eq!(summary[0].row_count, 3);
}

#[test]
fn test_groups_with_same_conflict_set_merge() {
    let table = rows(
        &["id", "x", "y"],
        vec![
            vec![Value::from(1), Value::from("a"), Value::from("k")],
            vec![Value::from(1), Value::from("b"), Value::from("k")],
            vec![Value::from(2), Value::from("c"), Value::from("m")],
            vec![Value::from(2), Value::from("d"), Value::from("m")],
            vec![Value::from(2), Value::from("c"), Value::from("m")],
        ],
    );
    let report = analyze(&table, "id");

    let summary = report.conflict_summary.unwrap();
    assert_eq!(summary.len(), 1);
    assert_eq!(summary[0].columns, ConflictSet::new(["x"]));
    assert_eq!(summary[0].group_count, 2);
    assert_eq!(summary[0].row_count, 5);
}

#[test]
fn test_null_keys_form_a_group() {
    let table = rows(
        &["id", "x"],
        vec![
            vec![Value::Null, Value::from("a")],
            vec![Value::from(1), Value::from("a")],
            vec![Value::Null, Value::from("a")],
        ],
    );
    let report = analyze(&table, "id");

    assert_eq!(report.statistics.nulls, 2);
    assert_eq!(report.statistics.unique, 2);
    assert_eq!(report.statistics.duplicated, 1);
    assert_eq!(report.groups.len(), 1);
    assert!(report.groups[0].key.is_null());
    assert_eq!(report.groups[0].rows, vec![0, 2]);
    assert_eq!(report.duplicate_values[0].value, Value::Null);
}

#[test]
fn test_null_counts_as_distinct_in_other_columns() {
    let table = rows(
        &["id", "email"],
        vec![
            vec![Value::from(1), Value::from("a@x")],
            vec![Value::from(1), Value::Null],
        ],
    );
    let report = analyze(&table, "id");

    let root_causes = report.root_causes.unwrap();
    assert_eq!(root_causes[0].varying_columns, vec!["email".to_string()]);
    // nulls are not listed among the conflicting values
    assert_eq!(
        root_causes[0].conflicting_values.get("email").unwrap(),
        &[Value::from("a@x")]
    );
}

#[test]
fn test_conflict_summary_sorted_by_rows() {
    let table = rows(
        &["id", "x", "y"],
        vec![
            vec![Value::from(1), Value::from("a"), Value::from("k")],
            vec![Value::from(1), Value::from("a"), Value::from("l")],
            vec![Value::from(2), Value::from("a"), Value::from("k")],
            vec![Value::from(2), Value::from("b"), Value::from("k")],
            vec![Value::from(2), Value::from("c"), Value::from("k")],
        ],
    );
    let report = analyze(&table, "id");

    let summary = report.conflict_summary.unwrap();
    let labels: Vec<String> = summary.iter().map(|e| e.columns.label()).collect();
    assert_eq!(labels, vec!["x".to_string(), "y".to_string()]);
    assert_eq!(summary[0].row_count, 3);
    assert_eq!(summary[1].row_count, 2);
}

#[test]
fn test_duplicate_values_ties_keep_first_seen_order() {
    let table = rows(
        &["k"],
        vec![
            vec![Value::from("b")],
            vec![Value::from("a")],
            vec![Value::from("a")],
            vec![Value::from("b")],
            vec![Value::from("c")],
            vec![Value::from("c")],
            vec![Value::from("c")],
        ],
    );
    let report = analyze(&table, "k");

    let order: Vec<&Value> = report.duplicate_values.iter().map(|d| &d.value).collect();
    assert_eq!(
        order,
        vec![&Value::from("c"), &Value::from("b"), &Value::from("a")]
    );
}

#[test]
fn test_numeric_keys_compare_by_value() {
    let table = rows(
        &["n"],
        vec![
            vec![Value::from(1.0)],
            vec![Value::from(1)],
            vec![Value::from(-0.0)],
            vec![Value::from(0)],
        ],
    );
    let report = analyze(&table, "n");
    assert_eq!(report.statistics.unique, 2);
    assert_eq!(report.groups.len(), 2);
}

// =============================================================================
// Boundaries
// =============================================================================

#[test]
fn test_empty_table() {
    let table = Table::new(vec![Column::new("id", vec![]), Column::new("x", vec![])]).unwrap();
    let report = analyze(&table, "id");

    assert_eq!(report.statistics.total, 0);
    assert_eq!(report.statistics.unique, 0);
    assert_eq!(report.statistics.duplicated, 0);
    assert_eq!(report.statistics.nulls, 0);
    assert!(report.duplicate_values.is_empty());
    assert!(report.groups.is_empty());
    assert_eq!(report.root_causes, Some(vec![]));
    assert_eq!(report.conflict_summary, Some(vec![]));
    assert!(!report.has_duplicates());
}

#[test]
fn test_all_unique_column() {
    let table = rows(
        &["id", "x"],
        vec![
            vec![Value::from(1), Value::from("a")],
            vec![Value::from(2), Value::from("a")],
            vec![Value::from(3), Value::from("a")],
        ],
    );
    let report = analyze(&table, "id");

    assert_eq!(report.statistics.unique, 3);
    assert_eq!(report.statistics.duplicated, 0);
    assert!(report.duplicate_values.is_empty());
    assert!(!report.has_duplicates());
}

#[test]
fn test_unknown_column_is_an_error() {
    let table = rows(&["Email"], vec![vec![Value::from("a@x")]]);
    let err = Analyzer::new(full_options())
        .analyze(&table, "email")
        .unwrap_err();

    match err {
        TableError::ColumnNotFound { column, suggestion } => {
            assert_eq!(column, "email");
            assert_eq!(suggestion.as_deref(), Some("Email"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_mismatched_columns_are_malformed() {
    let result = Table::new(vec![
        Column::new("id", vec![Value::from(1), Value::from(2)]),
        Column::new("x", vec![Value::from("a")]),
    ]);
    assert!(matches!(result, Err(TableError::Malformed { .. })));
}

// =============================================================================
// Options and Determinism
// =============================================================================

#[test]
fn test_optional_outputs_skipped_by_default() {
    let table = rows(
        &["id", "x"],
        vec![
            vec![Value::from(1), Value::from("a")],
            vec![Value::from(1), Value::from("b")],
        ],
    );
    let report = Analyzer::default().analyze(&table, "id").unwrap();
    assert!(report.root_causes.is_none());
    assert!(report.conflict_summary.is_none());
    assert_eq!(report.groups.len(), 1);
}

#[test]
fn test_analysis_is_idempotent() {
    let table = rows(
        &["id", "x", "y"],
        vec![
            vec![Value::from(1), Value::from("a"), Value::Null],
            vec![Value::from(1), Value::from("b"), Value::from(3)],
            vec![Value::from(2), Value::from("a"), Value::from(3)],
            vec![Value::from(2), Value::from("a"), Value::from(4)],
        ],
    );
    let before = table.clone();
    let analyzer = Analyzer::new(full_options());

    let first = analyzer.analyze(&table, "id").unwrap();
    let second = analyzer.analyze(&table, "id").unwrap();

    assert_eq!(first, second);
    assert_eq!(table, before);
}

#[test]
fn test_parallel_matches_sequential() {
    let data: Vec<Vec<Value>> = (0..200)
        .map(|i| {
            vec![
                Value::from(i % 37),
                Value::from(format!("v{}", i % 3)),
                Value::from(i % 2),
            ]
        })
        .collect();
    let table = rows(&["id", "x", "y"], data);

    let sequential = Analyzer::new(full_options()).analyze(&table, "id").unwrap();
    let parallel = Analyzer::new(full_options().with_parallel(true))
        .analyze(&table, "id")
        .unwrap();

    assert_eq!(sequential, parallel);
}
