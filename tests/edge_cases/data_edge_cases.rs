//! Edge case tests for data-related scenarios

use crate::common::{fixture_font, test_config, CliTestRunner, StudentRow, TestFixture, HEADER};
use chrono::NaiveDate;
use recon_report::data::DataProcessor;
use recon_report::pdf::EmbeddedFont;
use recon_report::progress::ProgressReporter;
use recon_report::{Cell, ReconError, ReconciliationJob};
use std::fs;

#[test]
fn test_tsv_source() {
    let fixture = TestFixture::new().unwrap();
    let path = fixture
        .create_csv_raw("tabs.tsv", "id\tname\n1\tAnna Li\n2\tBek\n")
        .unwrap();

    let set = DataProcessor::new().unwrap().load_file(&path).unwrap();
    assert_eq!(set.column_names(), vec!["id", "name"]);
    assert_eq!(set.record(0).unwrap().get("name").to_string(), "Anna Li");
}

#[test]
fn test_empty_cells_load_as_missing() {
    let fixture = TestFixture::new().unwrap();
    let path = fixture
        .create_csv_raw("gaps.csv", "id,name\n1,\n2,Bek\n")
        .unwrap();

    let set = DataProcessor::new().unwrap().load_file(&path).unwrap();
    assert!(set.record(0).unwrap().get("name").is_missing());
    assert!(matches!(set.record(1).unwrap().get("id"), Cell::Number(n) if *n == 2.0));
}

#[test]
fn test_dates_load_as_dates() {
    let fixture = TestFixture::new().unwrap();
    let path = fixture
        .create_csv_raw("dates.csv", "id,when\n1,2024-03-15\n2,2024-04-01\n")
        .unwrap();

    let set = DataProcessor::new().unwrap().load_file(&path).unwrap();
    let when = set.record(0).unwrap().get("when");
    assert!(matches!(when, Cell::Date(d) if *d == NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()));
    assert_eq!(when.to_string(), "2024-03-15");
}

#[test]
fn test_half_placeholder_header_is_kept() {
    let fixture = TestFixture::new().unwrap();
    // Two of four labels are blank: not more than half, so no skip
    let path = fixture
        .create_csv_raw("half.csv", "id,,name,\n1,a,Anna,b\n")
        .unwrap();

    let set = DataProcessor::new().unwrap().load_file(&path).unwrap();
    assert_eq!(set.len(), 1);
    assert!(set.has_column("id"));
    assert!(set.has_column("name"));
}

#[test]
fn test_header_only_sources() {
    let fixture = TestFixture::new().unwrap();
    let first = fixture.create_register("first.csv", &[]).unwrap();
    let second = fixture.create_register("second.csv", &[]).unwrap();
    let config = test_config();

    let outcome = ReconciliationJob::new(&config, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())
        .run_files(&first, &second, &fixture.workspace.reports_dir, &mut ProgressReporter::new_minimal())
        .unwrap();

    assert!(outcome.reports.is_empty());
    assert_eq!(outcome.summary.left_rows, 0);
}

#[test]
fn test_non_latin_text_preserved_in_pdf() {
    let runner = CliTestRunner::new().unwrap();
    let fixture = runner.fixture();
    let left = vec![StudentRow::new("1").set("iik", "Счёт")];
    let right = vec![StudentRow::new("1").set("iik", "KZ1")];
    fixture.upload(&left, &right).unwrap();

    runner.expect_success(&["process", "--quiet"]);

    assert_eq!(
        fixture.read_report("report_iik.txt")[2],
        "ID: 1, File1_IIK: Счёт, File2_IIK: KZ1"
    );

    let font = EmbeddedFont::load(&fixture_font()).unwrap();
    let glyphs: String = "File1_IIK: Счёт, File2_IIK: KZ1"
        .chars()
        .map(|c| format!("{:04X}", font.glyph_id(c).unwrap()))
        .collect();
    let pdf = fs::read(fixture.report_path("report_all.pdf")).unwrap();
    assert!(pdf.windows(glyphs.len()).any(|w| w == glyphs.as_bytes()));
    for code in [b"<0421>", b"<0447>", b"<0451>", b"<0442>"] {
        assert!(pdf.windows(code.len()).any(|w| w == code), "{}", String::from_utf8_lossy(code));
    }
}

#[test]
fn test_malformed_source_is_load_error() {
    let runner = CliTestRunner::new().unwrap();
    let fixture = runner.fixture();
    let good = fixture.create_register("good.csv", &[StudentRow::new("1")]).unwrap();
    let bad = fixture
        .create_csv_raw("bad.xlsx", "this is not a workbook")
        .unwrap();
    runner.expect_success(&["upload", good.to_str().unwrap(), bad.to_str().unwrap()]);

    match runner.expect_failure(&["process", "--quiet"]) {
        ReconError::Load { source_name, .. } => assert!(source_name.ends_with("file2.xlsx")),
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_quoted_fields_with_commas() {
    let fixture = TestFixture::new().unwrap();
    let mut content = HEADER.join(",");
    content.push('\n');
    content.push_str("1,\"KZ,01\",BANK1,IIN000,2024-09-01,absent,absent,absent,absent,P1,,5,\n");
    let path = fixture.create_csv_raw("quoted.csv", &content).unwrap();

    let set = DataProcessor::new().unwrap().load_file(&path).unwrap();
    assert_eq!(set.record(0).unwrap().get("iik").to_string(), "KZ,01");
}
