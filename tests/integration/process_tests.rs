//! Integration tests for the process and report commands

use crate::common::{CliTestRunner, StudentRow};
use recon_report::ReconError;
use std::fs;

fn baseline(ids: &[&str]) -> Vec<StudentRow> {
    ids.iter().map(|id| StudentRow::new(id)).collect()
}

#[test]
fn test_identical_sources_produce_no_reports() {
    let runner = CliTestRunner::new().unwrap();
    let fixture = runner.fixture();
    let rows = baseline(&["1", "2", "3"]);
    fixture.upload(&rows, &rows).unwrap();

    runner.expect_success(&["process", "--as-of", "2025-01-01"]);

    assert!(fixture.workspace.list_reports().unwrap().is_empty());
    fixture.assert_report_not_exists("report_all.pdf");
}

#[test]
fn test_process_writes_category_reports() {
    let runner = CliTestRunner::new().unwrap();
    let fixture = runner.fixture();
    let left = vec![
        StudentRow::new("1").set("iik", "KZ111"),
        StudentRow::new("2"),
        StudentRow::new("3").set("quota", "granted"),
    ];
    let right = vec![
        StudentRow::new("1").set("iik", "KZ999"),
        StudentRow::new("2"),
        StudentRow::new("3"),
    ];
    fixture.upload(&left, &right).unwrap();

    runner.expect_success(&["process", "--as-of", "2025-01-01", "--quiet"]);

    assert_eq!(
        fixture.read_report("report_iik.txt"),
        vec![
            "Changes in bank account (IIK):",
            "ID, File1_IIK, File2_IIK",
            "ID: 1, File1_IIK: KZ111, File2_IIK: KZ999",
        ]
    );
    assert_eq!(
        fixture.read_report("report_quota.txt")[2],
        "ID: 3, File1_Quota: granted, File2_Quota: absent"
    );
    fixture.assert_report_not_exists("report_bik.txt");
    fixture.assert_report_exists("report_all.pdf");
}

#[test]
fn test_process_clears_previous_reports() {
    let runner = CliTestRunner::new().unwrap();
    let fixture = runner.fixture();

    let left = vec![StudentRow::new("1").set("bik", "OLD")];
    let right = vec![StudentRow::new("1")];
    fixture.upload(&left, &right).unwrap();
    runner.expect_success(&["process", "--quiet"]);
    fixture.assert_report_exists("report_bik.txt");

    let same = vec![StudentRow::new("1")];
    fixture.upload(&same, &same).unwrap();
    runner.expect_success(&["process", "--quiet"]);
    fixture.assert_report_not_exists("report_bik.txt");
    fixture.assert_report_not_exists("report_all.pdf");
}

#[test]
fn test_process_json_output() {
    let runner = CliTestRunner::new().unwrap();
    let fixture = runner.fixture();
    let left = vec![StudentRow::new("1").set("period", "P2")];
    let right = vec![StudentRow::new("1")];
    fixture.upload(&left, &right).unwrap();

    runner.expect_success(&["process", "--format", "json"]);
    fixture.assert_report_exists("report_period.txt");
}

#[test]
fn test_process_invalid_format() {
    let runner = CliTestRunner::new().unwrap();
    let rows = baseline(&["1"]);
    runner.fixture().upload(&rows, &rows).unwrap();

    let error = runner.expect_failure(&["process", "--format", "xml"]);
    assert!(matches!(error, ReconError::InvalidInput { .. }));
}

#[test]
fn test_missing_required_column_aborts() {
    let runner = CliTestRunner::new().unwrap();
    let fixture = runner.fixture();
    let full = fixture.create_register("full.csv", &baseline(&["1"])).unwrap();
    let partial = fixture
        .create_csv("partial.csv", &[vec!["id", "iik"], vec!["1", "KZ000"]])
        .unwrap();
    runner.expect_success(&["upload", full.to_str().unwrap(), partial.to_str().unwrap()]);

    match runner.expect_failure(&["process", "--quiet"]) {
        ReconError::MissingColumn { column, source_name } => {
            assert_eq!(column, "bik");
            assert!(source_name.ends_with("file2.csv"));
        }
        other => panic!("unexpected error: {}", other),
    }
    assert!(fixture.workspace.list_reports().unwrap().is_empty());
}

#[test]
fn test_report_command_resolves_types() {
    let runner = CliTestRunner::new().unwrap();
    let fixture = runner.fixture();
    let left = vec![StudentRow::new("1").set("orphan", "present")];
    let right = vec![StudentRow::new("1")];
    fixture.upload(&left, &right).unwrap();
    runner.expect_success(&["process", "--quiet"]);

    runner.expect_success(&["report", "orphan"]);
    runner.expect_success(&["report", "all"]);

    let destination = fixture.root().join("out").join("orphan.txt");
    runner.expect_success(&["report", "orphan", "--output", destination.to_str().unwrap()]);
    assert_eq!(
        fs::read_to_string(&destination).unwrap(),
        fs::read_to_string(fixture.report_path("report_orphan.txt")).unwrap()
    );
}

#[test]
fn test_report_command_errors() {
    let runner = CliTestRunner::new().unwrap();

    let error = runner.expect_failure(&["report", "salary"]);
    assert!(matches!(error, ReconError::InvalidInput { .. }));

    let error = runner.expect_failure(&["report", "iik"]);
    assert!(matches!(error, ReconError::ReportNotFound { .. }));

    let error = runner.expect_failure(&["report", "positional"]);
    assert!(matches!(error, ReconError::ReportNotFound { .. }));
}

#[test]
fn test_columns_command_lists_detected_header() {
    let runner = CliTestRunner::new().unwrap();
    let fixture = runner.fixture();
    let plain = fixture.create_register("plain.csv", &baseline(&["1"])).unwrap();
    let titled = fixture
        .create_register_with_preamble("titled.csv", &baseline(&["1"]))
        .unwrap();
    runner.expect_success(&["upload", plain.to_str().unwrap(), titled.to_str().unwrap()]);

    runner.expect_success(&["columns"]);
    runner.expect_success(&["columns", "--format", "json"]);
}
