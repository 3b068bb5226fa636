//! Integration tests for exporting analysis reports.

use rowdupe::analysis::{AnalysisOptions, AnalysisReport, Analyzer};
use rowdupe::error::ExitCode;
use rowdupe::output::csv::{CONFLICT_SUMMARY_FILE, DUPLICATE_VALUES_FILE, ROOT_CAUSE_FILE};
use rowdupe::output::{CsvOutput, JsonOutput, TextOutput};
use rowdupe::table::CsvSource;
use std::fs;
use tempfile::TempDir;

const DATA: &str = "\
id,name,phone,email
1,Ann,555,a@x
1,Ann,555,b@x
2,Bob,111,c@x
2,Rob,222,c@x
3,Cy,333,d@x
";

fn report(options: AnalysisOptions) -> AnalysisReport {
    let table = CsvSource::default().read_from(DATA.as_bytes()).unwrap();
    Analyzer::new(options).analyze(&table, "id").unwrap()
}

fn full_report() -> AnalysisReport {
    report(
        AnalysisOptions::default()
            .with_root_cause(true)
            .with_conflict_summary(true),
    )
}

#[test]
fn test_export_all_files() {
    let dir = TempDir::new().unwrap();
    let written = CsvOutput::new(&full_report())
        .export_to_dir(dir.path())
        .unwrap();
    assert_eq!(written.len(), 3);

    let duplicates = fs::read_to_string(dir.path().join(DUPLICATE_VALUES_FILE)).unwrap();
    assert_eq!(duplicates, "id,Count\n1,2\n2,2\n");

    let root_causes = fs::read_to_string(dir.path().join(ROOT_CAUSE_FILE)).unwrap();
    let lines: Vec<&str> = root_causes.lines().collect();
    assert_eq!(lines[0], "id,Conflicting_Columns,Conflicting_Values");
    assert_eq!(lines[1], r#"1,email,"{""email"":[""a@x"",""b@x""]}""#);
    assert_eq!(
        lines[2],
        r#"2,"name, phone","{""name"":[""Bob"",""Rob""],""phone"":[111,222]}""#
    );

    let summary = fs::read_to_string(dir.path().join(CONFLICT_SUMMARY_FILE)).unwrap();
    assert_eq!(
        summary,
        "Conflicting_Columns,Affected_Duplicate_Groups,Affected_Rows\nemail,1,2\n\"name, phone\",1,2\n"
    );
}

#[test]
fn test_exported_files_read_back_as_tables() {
    let dir = TempDir::new().unwrap();
    CsvOutput::new(&full_report())
        .export_to_dir(dir.path())
        .unwrap();

    let summary = CsvSource::default()
        .read_path(&dir.path().join(CONFLICT_SUMMARY_FILE))
        .unwrap();
    assert_eq!(summary.row_count(), 2);
    assert!(summary.column("Affected_Rows").is_ok());
}

#[test]
fn test_csv_stream_sections() {
    let text = CsvOutput::new(&full_report()).to_string().unwrap();
    let sections: Vec<&str> = text.split("\n\n").collect();
    assert_eq!(sections.len(), 3);
    assert!(sections[1].starts_with("id,Conflicting_Columns"));
    assert!(sections[2].starts_with("Conflicting_Columns,"));
}

#[test]
fn test_json_matches_report() {
    let report = full_report();
    let json: serde_json::Value = serde_json::from_str(
        &JsonOutput::new(&report, ExitCode::Success)
            .to_json()
            .unwrap(),
    )
    .unwrap();

    assert_eq!(json["summary"]["duplicate_groups"], 2);
    assert_eq!(json["summary"]["rows_in_duplicate_groups"], 4);
    assert_eq!(
        json["root_causes"][1]["varying_columns"],
        serde_json::json!(["name", "phone"])
    );
    assert_eq!(json["conflict_summary"].as_array().unwrap().len(), 2);
}

#[test]
fn test_text_output_without_color() {
    let report = full_report();
    let text = TextOutput::new(&report).with_color(false).render().unwrap();

    assert!(text.contains("Total values in column: 5"));
    assert!(text.contains("Root Cause with Actual Values"));
    assert!(text.contains("name, phone"));
    assert!(!text.contains('\u{1b}'));
}
