//! Functional tests for the positional column comparer

use crate::common::CliTestRunner;
use recon_report::ReconError;

fn upload_pair(runner: &CliTestRunner, first: &str, second: &str) {
    let fixture = runner.fixture();
    let a = fixture.create_csv_raw("a.csv", first).unwrap();
    let b = fixture.create_csv_raw("b.csv", second).unwrap();
    runner.expect_success(&["upload", a.to_str().unwrap(), b.to_str().unwrap()]);
}

#[test]
fn test_rows_beyond_shorter_source_ignored() {
    let runner = CliTestRunner::new().unwrap();
    upload_pair(
        &runner,
        "name,city\nAnna,Almaty\nBek,Astana\nCan,Shymkent\nDana,Aktau\nErlan,Oral\n",
        "full_name,town\nAnna,Almaty\nBek,Taraz\nCan,Shymkent\n",
    );

    runner.expect_success(&["compare", "--columns1", "name,city", "--columns2", "full_name,town"]);

    assert_eq!(
        runner.fixture().read_report("report.txt"),
        vec!["Row 2: city: Astana -> Taraz"]
    );
}

#[test]
fn test_multiple_notes_on_one_row() {
    let runner = CliTestRunner::new().unwrap();
    upload_pair(
        &runner,
        "name,city\nAnna,Almaty\n",
        "full_name,town\nAnya,Astana\n",
    );

    runner.expect_success(&["compare", "--columns1", "name,city", "--columns2", "full_name,town"]);

    assert_eq!(
        runner.fixture().read_report("report.txt"),
        vec!["Row 1: name: Anna -> Anya; city: Almaty -> Astana"]
    );
}

#[test]
fn test_no_differences_leaves_no_artifact() {
    let runner = CliTestRunner::new().unwrap();
    upload_pair(&runner, "a\nx\ny\n", "b\nx\ny\nz\n");

    runner.expect_success(&["compare", "--columns1", "a", "--columns2", "b"]);
    runner.fixture().assert_report_not_exists("report.txt");

    let error = runner.expect_failure(&["report", "positional"]);
    assert!(matches!(error, ReconError::ReportNotFound { .. }));
}

#[test]
fn test_unknown_column_rejected() {
    let runner = CliTestRunner::new().unwrap();
    upload_pair(&runner, "a\nx\n", "b\nx\n");

    match runner.expect_failure(&["compare", "--columns1", "a", "--columns2", "c"]) {
        ReconError::MissingColumn { column, source_name } => {
            assert_eq!(column, "c");
            assert!(source_name.ends_with("file2.csv"));
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_empty_selection_rejected() {
    let runner = CliTestRunner::new().unwrap();
    upload_pair(&runner, "a\nx\n", "b\nx\n");

    let error = runner.expect_failure(&["compare", "--columns1", "", "--columns2", "b"]);
    assert!(matches!(error, ReconError::InvalidInput { .. }));
}

#[test]
fn test_positional_report_resolvable() {
    let runner = CliTestRunner::new().unwrap();
    upload_pair(&runner, "a\n1\n", "b\n2\n");

    runner.expect_success(&["compare", "--columns1", "a", "--columns2", "b"]);
    runner.expect_success(&["report", "positional"]);
    assert_eq!(runner.fixture().read_report("report.txt"), vec!["Row 1: a: 1 -> 2"]);
}

#[test]
fn test_time_values_compared_by_their_text() {
    let runner = CliTestRunner::new().unwrap();
    upload_pair(&runner, "t\n10:30:00\n", "t\n11:45:00\n");

    runner.expect_success(&["compare", "--columns1", "t", "--columns2", "t"]);
    assert_eq!(
        runner.fixture().read_report("report.txt"),
        vec!["Row 1: t: 10:30:00 -> 11:45:00"]
    );
}

#[test]
fn test_blank_name_inside_selection_rejected() {
    let runner = CliTestRunner::new().unwrap();
    upload_pair(&runner, "a,b\n1,2\n", "c,d,e\n1,2,3\n");

    let error = runner.expect_failure(&["compare", "--columns1", "a,,b", "--columns2", "c,d,e"]);
    assert!(matches!(error, ReconError::InvalidInput { .. }));
    runner.fixture().assert_report_not_exists("report.txt");
}
