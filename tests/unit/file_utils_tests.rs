/*!
 * Tests for file utility functionality
 */

use corroborate::file_utils::{FileManager, FileType};
use crate::common;

#[test]
fn test_fileExists_existingFile_shouldReturnTrue() {
    let temp_dir = common::create_temp_dir().unwrap();
    let file_path = common::create_test_file(&temp_dir.path().to_path_buf(), "exists.txt", "content").unwrap();

    assert!(FileManager::file_exists(&file_path));
    assert!(!FileManager::file_exists(temp_dir.path().join("missing.txt")));
}

#[test]
fn test_fileExists_directory_shouldReturnFalse() {
    let temp_dir = common::create_temp_dir().unwrap();

    assert!(!FileManager::file_exists(temp_dir.path()));
    assert!(FileManager::dir_exists(temp_dir.path()));
}

#[test]
fn test_ensureDir_missingNestedPath_shouldCreateIt() {
    let temp_dir = common::create_temp_dir().unwrap();
    let nested = temp_dir.path().join("a").join("b");

    FileManager::ensure_dir(&nested).unwrap();

    assert!(FileManager::dir_exists(&nested));
    // Idempotent
    FileManager::ensure_dir(&nested).unwrap();
}

#[test]
fn test_generateOutputPath_videoInput_shouldUseStemSuffixAndExtension() {
    let path = FileManager::generate_output_path(
        "/footage/stop_2024-03-01.mp4",
        "/out",
        "comparison",
        "docx",
    );

    assert_eq!(path.to_string_lossy(), "/out/stop_2024-03-01.comparison.docx");
}

#[test]
fn test_detectFileType_knownExtensions_shouldClassifyWithoutProbing() {
    let temp_dir = common::create_temp_dir().unwrap();
    let dir = temp_dir.path().to_path_buf();

    let txt = common::create_test_file(&dir, "notes.txt", "text").unwrap();
    let pdf = common::create_test_file(&dir, "report.pdf", "%PDF-1.4").unwrap();
    let docx = common::create_test_file(&dir, "report.docx", "PK").unwrap();
    let video = common::create_test_file(&dir, "clip.mp4", "").unwrap();

    assert_eq!(FileManager::detect_file_type(&txt).unwrap(), FileType::Text);
    assert_eq!(FileManager::detect_file_type(&pdf).unwrap(), FileType::ReportPdf);
    assert_eq!(FileManager::detect_file_type(&docx).unwrap(), FileType::ReportDocx);
    assert_eq!(FileManager::detect_file_type(&video).unwrap(), FileType::Video);
}

#[test]
fn test_detectFileType_missingFile_shouldFail() {
    let temp_dir = common::create_temp_dir().unwrap();
    let missing = temp_dir.path().join("nope.mp4");

    assert!(FileManager::detect_file_type(&missing).is_err());
}

#[test]
fn test_findReportForVideo_sameStemPdf_shouldBeFound() {
    let temp_dir = common::create_temp_dir().unwrap();
    let dir = temp_dir.path().to_path_buf();

    let video = common::create_test_file(&dir, "stop_001.mp4", "").unwrap();
    let report = common::create_test_file(&dir, "stop_001.pdf", "%PDF-1.4").unwrap();
    common::create_test_file(&dir, "other_case.pdf", "%PDF-1.4").unwrap();

    assert_eq!(FileManager::find_report_for_video(&video), Some(report));
}

#[test]
fn test_findReportForVideo_oneLevelDown_shouldBeFound() {
    let temp_dir = common::create_temp_dir().unwrap();
    let dir = temp_dir.path().to_path_buf();
    let reports_dir = dir.join("reports");
    FileManager::ensure_dir(&reports_dir).unwrap();

    let video = common::create_test_file(&dir, "stop_002.mkv", "").unwrap();
    let report = common::create_test_file(&reports_dir, "stop_002.docx", "PK").unwrap();

    assert_eq!(FileManager::find_report_for_video(&video), Some(report));
}

#[test]
fn test_findReportForVideo_noMatchingStem_shouldReturnNone() {
    let temp_dir = common::create_temp_dir().unwrap();
    let dir = temp_dir.path().to_path_buf();

    let video = common::create_test_file(&dir, "stop_003.mp4", "").unwrap();
    common::create_test_file(&dir, "unrelated.pdf", "%PDF-1.4").unwrap();

    assert_eq!(FileManager::find_report_for_video(&video), None);
}

#[test]
fn test_writeToFile_missingParent_shouldCreateDirectories() {
    let temp_dir = common::create_temp_dir().unwrap();
    let target = temp_dir.path().join("nested").join("out.txt");

    FileManager::write_to_file(&target, "written").unwrap();

    assert_eq!(FileManager::read_to_string(&target).unwrap(), "written");
}
