//! Integration tests for Excel registers read through calamine

use crate::common::{test_config, CliTestRunner, SheetValue, StudentRow, TestFixture, HEADER};
use chrono::NaiveDate;
use recon_report::data::DataProcessor;
use recon_report::progress::ProgressReporter;
use recon_report::{Cell, JobConfig, ReconciliationJob};
use std::path::PathBuf;

/// Width of the register sheets; the last header cell is left blank
const SHEET_WIDTH: usize = 27;

fn header_row() -> Vec<SheetValue> {
    let mut header: Vec<SheetValue> = HEADER.iter().map(|h| SheetValue::text(h)).collect();
    header.extend((HEADER.len()..SHEET_WIDTH - 1).map(|i| SheetValue::text(&format!("extra{}", i))));
    header.push(SheetValue::Blank);
    header
}

/// Sheet row for a student; the id is numeric, the decree a real date and
/// the period sits under the blank header
fn student_row(row: &StudentRow, decree: (u16, u8, u8)) -> Vec<SheetValue> {
    let mut cells: Vec<SheetValue> = HEADER
        .iter()
        .map(|column| match *column {
            "id" => SheetValue::Number(row.value("id").parse().unwrap()),
            "decree" => SheetValue::Date(decree.0, decree.1, decree.2),
            _ if row.value(column).is_empty() => SheetValue::Blank,
            _ => SheetValue::text(row.value(column)),
        })
        .collect();
    cells.extend((HEADER.len()..SHEET_WIDTH - 1).map(|_| SheetValue::text("-")));
    cells.push(SheetValue::text(row.value("period")));
    cells
}

fn preamble_rows() -> Vec<Vec<SheetValue>> {
    ["Student register", "Registry office", "Academic year 2024", "Confidential", "Page 1"]
        .iter()
        .map(|title| vec![SheetValue::text(title)])
        .collect()
}

fn register(
    fixture: &TestFixture,
    name: &str,
    rows: &[(StudentRow, (u16, u8, u8))],
    preamble: bool,
) -> PathBuf {
    let mut sheet = if preamble { preamble_rows() } else { Vec::new() };
    sheet.push(header_row());
    sheet.extend(rows.iter().map(|(row, decree)| student_row(row, *decree)));
    fixture.create_workbook(name, &sheet)
}

fn workbook_config() -> JobConfig {
    let mut config = test_config();
    config.columns.period = "column26".to_string();
    config
}

#[test]
fn test_plain_workbook_layout() {
    let fixture = TestFixture::new().unwrap();
    let rows = vec![(StudentRow::new("101").set("period", "P2"), (2024, 9, 1))];
    let path = register(&fixture, "plain.xlsx", &rows, false);

    let set = DataProcessor::new().unwrap().load_file(&path).unwrap();

    assert_eq!(set.len(), 1);
    assert_eq!(set.column_count(), SHEET_WIDTH);
    assert_eq!(set.column_names()[0], "id");
    assert_eq!(set.column_names()[26], "column26");

    let record = set.record(0).unwrap();
    assert!(matches!(record.get("id"), Cell::Number(n) if *n == 101.0));
    assert!(matches!(
        record.get("decree"),
        Cell::Date(d) if *d == NaiveDate::from_ymd_opt(2024, 9, 1).unwrap()
    ));
    assert_eq!(record.get("column26").to_string(), "P2");
    assert!(record.get("kind").is_missing());
}

#[test]
fn test_workbook_title_block_is_skipped() {
    let fixture = TestFixture::new().unwrap();
    let rows = vec![
        (StudentRow::new("1"), (2024, 9, 1)),
        (StudentRow::new("2"), (2024, 10, 15)),
    ];
    let path = register(&fixture, "titled.xlsx", &rows, true);

    let set = DataProcessor::new().unwrap().load_file(&path).unwrap();

    assert_eq!(set.len(), 2);
    assert_eq!(set.column_names()[..3].to_vec(), vec!["id", "iik", "bik"]);
    assert!(set.has_column("column26"));
    assert_eq!(set.record(1).unwrap().get("decree").to_string(), "2024-10-15");
}

#[test]
fn test_workbook_skip_rows_follow_config() {
    let fixture = TestFixture::new().unwrap();
    let mut sheet = vec![vec![SheetValue::text("Title")], vec![SheetValue::text("Subtitle")]];
    sheet.push(vec![SheetValue::text("id"), SheetValue::text("name"), SheetValue::text("city")]);
    sheet.push(vec![SheetValue::Number(7.0), SheetValue::text("Aruzhan"), SheetValue::text("Almaty")]);
    let path = fixture.create_workbook("short.xlsx", &sheet);

    let set = DataProcessor::new_with_config(2).unwrap().load_file(&path).unwrap();

    assert_eq!(set.column_names(), vec!["id", "name", "city"]);
    assert_eq!(set.record(0).unwrap().get("name").to_string(), "Aruzhan");
}

#[test]
fn test_workbook_registers_reconcile() {
    let fixture = TestFixture::new().unwrap();
    let left = vec![
        (StudentRow::new("1").set("period", "P1"), (2024, 9, 1)),
        (StudentRow::new("2"), (2024, 9, 1)),
    ];
    let right = vec![
        (StudentRow::new("1").set("period", "P2"), (2024, 9, 1)),
        (StudentRow::new("2"), (2024, 10, 1)),
    ];
    let first = register(&fixture, "first.xlsx", &left, false);
    let second = register(&fixture, "second.xlsx", &right, true);

    let config = workbook_config();
    let outcome = ReconciliationJob::new(&config, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())
        .run_files(&first, &second, &fixture.workspace.reports_dir, &mut ProgressReporter::new_minimal())
        .unwrap();

    assert_eq!(outcome.summary.aligned_keys, 2);
    assert_eq!(
        fixture.read_report("report_period.txt")[2..].to_vec(),
        vec!["ID: 1, File1_Period: P1, File2_Period: P2"]
    );
    assert_eq!(
        fixture.read_report("report_date.txt")[2..].to_vec(),
        vec!["ID: 2, File1_Date: 2024-09-01, File2_Date: 2024-10-01"]
    );
    assert!(outcome.reports.has_aggregate());
}

#[test]
fn test_workbook_columns_command() {
    let runner = CliTestRunner::new().unwrap();
    let fixture = runner.fixture();
    let rows = vec![(StudentRow::new("1"), (2024, 9, 1))];
    let plain = register(fixture, "plain.xlsx", &rows, false);
    let titled = register(fixture, "titled.xlsx", &rows, true);

    runner.expect_success(&["upload", plain.to_str().unwrap(), titled.to_str().unwrap()]);
    runner.expect_success(&["columns", "--format", "json"]);
}
