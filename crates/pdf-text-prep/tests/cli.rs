mod common;

use std::process::Command;

use tempfile::tempdir;

use common::{as_str_pages, ten_page_report, write_test_pdf};

fn pdfprep() -> Command {
    Command::new(env!("CARGO_BIN_EXE_pdfprep"))
}

#[test]
fn detect_prints_sniffed_mime() {
    let dir = tempdir().expect("tempdir should be created");
    let pdf = dir.path().join("renamed.txt");
    write_test_pdf(&pdf, &[vec!["hello"]]).expect("PDF fixture should be created");
    let other = dir.path().join("fake.pdf");
    std::fs::write(&other, b"just some text").expect("file should be written");

    let output = pdfprep()
        .args(["detect", "-i", &pdf.to_string_lossy()])
        .output()
        .expect("CLI should run");
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "application/pdf");

    let output = pdfprep()
        .args(["detect", "-i", &other.to_string_lossy()])
        .output()
        .expect("CLI should run");
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "unknown");
}

#[test]
fn analyze_json_contains_metadata_and_text() {
    let dir = tempdir().expect("tempdir should be created");
    let input = dir.path().join("report.pdf");
    write_test_pdf(&input, &as_str_pages(&ten_page_report()))
        .expect("PDF fixture should be created");

    let output = pdfprep()
        .args(["analyze", "--json", "-i", &input.to_string_lossy()])
        .output()
        .expect("CLI should run");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(json["metadata"]["numpages"], 10);
    let text = json["text"].as_str().expect("text should be a string");
    assert!(!text.contains("Confidential Acme Corp"));
}

#[test]
fn analyze_exits_with_code_2_when_nothing_is_left() {
    let dir = tempdir().expect("tempdir should be created");
    let input = dir.path().join("memo.pdf");
    write_test_pdf(
        &input,
        &[vec![
            "A single page memo long enough to pass the scan check.",
            "Second line of the memo.",
        ]],
    )
    .expect("PDF fixture should be created");

    let status = pdfprep()
        .args(["analyze", "-i", &input.to_string_lossy()])
        .status()
        .expect("CLI should run");
    assert_eq!(status.code(), Some(2));
}

#[test]
fn analyze_fails_on_non_pdf() {
    let dir = tempdir().expect("tempdir should be created");
    let input = dir.path().join("notes.pdf");
    std::fs::write(&input, b"plain text pretending to be a PDF").expect("file should be written");

    let output = pdfprep()
        .args(["analyze", "-i", &input.to_string_lossy()])
        .output()
        .expect("CLI should run");
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("can only parse PDF files"));
}
