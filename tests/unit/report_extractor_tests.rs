/*!
 * Tests for report text extraction functionality
 */

use corroborate::errors::ExtractionError;
use corroborate::report_extractor::{extract_report, ReportDocument, ReportFormat};
use crate::common;

#[tokio::test]
async fn test_extractReport_plainTextFile_shouldReturnContents() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(
        &temp_dir.path().to_path_buf(),
        "report.txt",
        "Subject admitted to drinking one beer.\nVehicle was stopped at 23:14.\n",
    ).unwrap();

    let document = extract_report(&path).await.unwrap();

    assert_eq!(document.format, ReportFormat::Text);
    assert!(document.text.contains("one beer"));
    assert!(!document.is_empty());
}

#[tokio::test]
async fn test_extractReport_docxFile_shouldPullParagraphText() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = common::create_test_docx(
        &temp_dir.path().to_path_buf(),
        "report.docx",
        &[
            "Officer observed the vehicle weaving.",
            "Subject stated they had one beer.",
        ],
    ).unwrap();

    let document = extract_report(&path).await.unwrap();

    assert_eq!(document.format, ReportFormat::Docx);
    let lines: Vec<&str> = document.text.lines().collect();
    assert_eq!(lines, vec![
        "Officer observed the vehicle weaving.",
        "Subject stated they had one beer.",
    ]);
}

#[tokio::test]
async fn test_extractReport_unknownExtension_shouldBeUnsupportedFormat() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(
        &temp_dir.path().to_path_buf(),
        "report.csv",
        "a,b,c",
    ).unwrap();

    let err = extract_report(&path).await.unwrap_err();

    assert!(matches!(err, ExtractionError::UnsupportedFormat(_)));
}

#[tokio::test]
async fn test_extractReport_noExtension_shouldBeUnsupportedFormat() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(&temp_dir.path().to_path_buf(), "report", "text").unwrap();

    let err = extract_report(&path).await.unwrap_err();

    assert!(matches!(err, ExtractionError::UnsupportedFormat(_)));
}

#[tokio::test]
async fn test_extractReport_emptyTextFile_shouldBeExtractionFailed() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(&temp_dir.path().to_path_buf(), "empty.txt", "   \n\n").unwrap();

    let err = extract_report(&path).await.unwrap_err();

    assert!(matches!(err, ExtractionError::ExtractionFailed(_)));
}

#[tokio::test]
async fn test_extractReport_missingTextFile_shouldBeIoError() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = temp_dir.path().join("missing.txt");

    let err = extract_report(&path).await.unwrap_err();

    assert!(matches!(err, ExtractionError::Io(_)));
}

#[tokio::test]
async fn test_extractReport_corruptDocx_shouldBeExtractionFailed() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(
        &temp_dir.path().to_path_buf(),
        "broken.docx",
        "this is not a zip archive",
    ).unwrap();

    let err = extract_report(&path).await.unwrap_err();

    assert!(matches!(err, ExtractionError::ExtractionFailed(_)));
}

#[test]
fn test_reportDocument_fromText_shouldCarryTextFormat() {
    let document = ReportDocument::from_text("typed report text");

    assert_eq!(document.format, ReportFormat::Text);
    assert_eq!(document.text, "typed report text");
    assert!(!document.is_empty());
    assert!(ReportDocument::from_text("  \n ").is_empty());
}
