//! End-to-end tests for the dbex binary using page-text inputs.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

fn invoice_text(number: &str, total: &str) -> String {
    format!(
        "Contract Number: 20-1234\n\
         Invoice Date: 04/15/2024\n\
         Invoice Number: {number}\n\
         Task Order Number: TO-007\n\
         Billing Period: 03/01/2024 - 03/31/2024\n\
         TOTAL THIS INVOICE\n$ {total}\n\
         Total Billed To Date: $ 98,765.43\n\
         Task Order DBE Spending Data\n\
         Previously Billed $ 4,000.00\n\
         Total This Invoice $ 1,000.00\n\
         Billed To Date $ 5,000.00\n"
    )
}

fn write(dir: &Path, name: &str, contents: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path.to_string_lossy().to_string()
}

fn dbex() -> Command {
    Command::cargo_bin("dbex").unwrap()
}

#[test]
fn extract_prints_json_record() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "page.txt", &invoice_text("ABC123", "1, 234 . 56"));

    dbex()
        .args(["extract", &input])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""invoice_number": "ABC123""#))
        .stdout(predicate::str::contains(r#""total_this_invoice": "1,234.56""#))
        .stdout(predicate::str::contains(r#""dbe_billed_to_date": "5,000.00""#))
        .stdout(predicate::str::contains(r#""source_file": "page.txt""#));
}

#[test]
fn extract_text_format_reports_missing_fields() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "short.txt", "Invoice Number: ABC123");

    dbex()
        .args(["extract", &input, "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Invoice Number: ABC123"))
        .stdout(predicate::str::contains("Contract Number: N/A"))
        .stderr(predicate::str::contains("missing: Contract Number"));
}

#[test]
fn batch_writes_csv_and_flags_duplicates() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(dir.path(), "a.txt", &invoice_text("INV-001", "100.00"));
    let b = write(dir.path(), "b.txt", &invoice_text("INV-002", "200.00"));
    let c = write(dir.path(), "c.txt", &invoice_text("INV-001", "300.00"));

    let assert = dbex().args(["batch", &a, &b, &c]).assert().success();
    let output = assert.get_output();
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("Contract Number,Invoice Date,Invoice Number"));
    assert!(lines[0].ends_with("DBE Billed To Date,File"));
    assert!(lines[1].ends_with(",a.txt"));
    assert!(lines[3].ends_with(",c.txt"));

    assert!(stderr.contains("Duplicate Invoice Numbers:"));
    assert_eq!(stderr.matches("  - INV-001").count(), 1);
    assert!(!stderr.contains("  - INV-002"));
}

#[test]
fn batch_continues_past_unreadable_files() {
    let dir = tempfile::tempdir().unwrap();
    let good = write(dir.path(), "good.txt", &invoice_text("INV-9", "1.00"));
    let bad = write(dir.path(), "broken.pdf", "not a pdf at all");
    let out = dir.path().join("out.csv");

    dbex()
        .args(["batch", &bad, &good, "-o", out.to_str().unwrap()])
        .assert()
        .success()
        .stderr(predicate::str::contains("Failed files:"))
        .stderr(predicate::str::contains("broken.pdf"));

    let csv = fs::read_to_string(&out).unwrap();
    assert_eq!(csv.lines().count(), 2);
    assert!(csv.contains("good.txt"));
    assert!(!csv.contains("broken.pdf"));
}

#[test]
fn batch_fails_when_nothing_is_readable() {
    let dir = tempfile::tempdir().unwrap();
    let bad = write(dir.path(), "scan.png", "binary");

    dbex()
        .args(["batch", &bad])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported file format: png"));
}

#[test]
fn batch_fail_fast_stops_on_first_failure() {
    let dir = tempfile::tempdir().unwrap();
    let bad = write(dir.path(), "broken.pdf", "not a pdf at all");
    let good = write(dir.path(), "good.txt", &invoice_text("INV-1", "1.00"));

    dbex()
        .args(["batch", "--fail-fast", &bad, &good])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Processing failed: broken.pdf"));
}

#[test]
fn batch_keeps_blank_pages_as_records() {
    let dir = tempfile::tempdir().unwrap();
    let first = write(dir.path(), "blank1.txt", "   ");
    let second = write(dir.path(), "blank2.txt", "\n");

    let assert = dbex().args(["batch", &first, &second]).assert().success();
    let output = assert.get_output();
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("N/A,N/A,N/A"));
    assert!(lines[2].ends_with(",blank2.txt"));
    assert!(!stderr.contains("Failed files:"));
    assert_eq!(stderr.matches("  - N/A").count(), 1);
}

#[test]
fn batch_json_includes_report() {
    let dir = tempfile::tempdir().unwrap();
    let pattern = dir.path().join("*.txt").to_string_lossy().to_string();
    write(dir.path(), "x.txt", &invoice_text("N-1", "5.00"));
    write(dir.path(), "y.txt", &invoice_text("N-1", "5.00"));

    dbex()
        .args(["batch", &pattern, "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""duplicates": ["#))
        .stdout(predicate::str::contains(r#""cancelled": false"#))
        .stdout(predicate::str::contains(r#""N-1""#));
}

#[test]
fn explicit_config_changes_section_header() {
    let dir = tempfile::tempdir().unwrap();
    let config = write(
        dir.path(),
        "config.json",
        r#"{"extraction": {"dbe_section_header": "DBE Summary"}}"#,
    );
    let input = write(dir.path(), "p.txt", "Invoice Number: Q-1 DBE Summary $7 $8 $9");

    dbex()
        .args(["--config", &config, "extract", &input])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""dbe_previously_billed": "7""#));
}
