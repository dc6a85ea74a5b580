/*!
 * Integration tests for the end-to-end comparison workflow
 */

use corroborate::app_config::Config;
use corroborate::app_controller::Controller;
use corroborate::report_writer::{ComparisonReport, OutputFormat};
use crate::common;

fn controller_with_format(format: OutputFormat) -> Controller {
    let mut config = Config::default();
    config.output.format = format;
    Controller::with_config(config).unwrap()
}

#[tokio::test]
async fn test_compareOnly_textTranscriptAndTextReport_shouldWriteJsonDocument() {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir().unwrap();
    let dir = temp_dir.path().to_path_buf();

    let transcript_path = common::create_test_transcript(&dir, "stop_001.txt").unwrap();
    let report_path = common::create_test_file(
        &dir,
        "stop_001_report.txt",
        "Officer asked the subject: have you been drinking tonight. \
         Subject replied: i only had one beer.",
    ).unwrap();

    let controller = controller_with_format(OutputFormat::Json);
    controller.run_compare_only(
        transcript_path,
        report_path,
        dir.clone(),
        false,
    ).await.unwrap();

    let output_path = dir.join("stop_001.comparison.json");
    let content = std::fs::read_to_string(&output_path).unwrap();
    let report: ComparisonReport = serde_json::from_str(&content).unwrap();

    assert_eq!(report.transcript_source, "stop_001.txt");
    assert_eq!(report.report_source, "stop_001_report.txt");
    assert_eq!(report.result.matched, vec![
        "have you been drinking tonight",
        "i only had one beer",
    ]);
    assert_eq!(report.result.unmatched, vec!["step out of the vehicle please"]);
}

#[tokio::test]
async fn test_compareOnly_docxReport_shouldExtractAndCompare() {
    let temp_dir = common::create_temp_dir().unwrap();
    let dir = temp_dir.path().to_path_buf();

    let transcript_path = common::create_test_transcript(&dir, "stop_002.txt").unwrap();
    let report_path = common::create_test_docx(
        &dir,
        "stop_002_report.docx",
        &["The officer ordered: step out of the vehicle please."],
    ).unwrap();

    let controller = controller_with_format(OutputFormat::Json);
    controller.run_compare_only(
        transcript_path,
        report_path,
        dir.clone(),
        false,
    ).await.unwrap();

    let content = std::fs::read_to_string(dir.join("stop_002.comparison.json")).unwrap();
    let report: ComparisonReport = serde_json::from_str(&content).unwrap();

    assert_eq!(report.result.matched, vec!["step out of the vehicle please"]);
    assert_eq!(report.result.unmatched.len(), 2);
}

#[tokio::test]
async fn test_compareOnly_existingOutput_shouldSkipUnlessForced() {
    let temp_dir = common::create_temp_dir().unwrap();
    let dir = temp_dir.path().to_path_buf();

    let transcript_path = common::create_test_transcript(&dir, "stop_003.txt").unwrap();
    let report_path = common::create_test_file(&dir, "stop_003_report.txt", "unrelated").unwrap();

    // Pre-existing output with sentinel content
    let output_path = dir.join("stop_003.comparison.json");
    std::fs::write(&output_path, "sentinel").unwrap();

    let controller = controller_with_format(OutputFormat::Json);

    // Without force the existing document is left alone
    controller.run_compare_only(
        transcript_path.clone(),
        report_path.clone(),
        dir.clone(),
        false,
    ).await.unwrap();
    assert_eq!(std::fs::read_to_string(&output_path).unwrap(), "sentinel");

    // With force it gets overwritten with a real comparison
    controller.run_compare_only(
        transcript_path,
        report_path,
        dir.clone(),
        true,
    ).await.unwrap();
    let content = std::fs::read_to_string(&output_path).unwrap();
    assert!(serde_json::from_str::<ComparisonReport>(&content).is_ok());
}

#[tokio::test]
async fn test_run_textInputWithoutReport_shouldLeaveEverythingUnmatched() {
    let temp_dir = common::create_temp_dir().unwrap();
    let dir = temp_dir.path().to_path_buf();

    // A text input is treated as an already-made transcript; with no report
    // anywhere nearby the comparison is vacuous
    let transcript_path = common::create_test_transcript(&dir, "solo.txt").unwrap();

    let controller = controller_with_format(OutputFormat::Json);
    controller.run(transcript_path, None, dir.clone(), false).await.unwrap();

    let content = std::fs::read_to_string(dir.join("solo.comparison.json")).unwrap();
    let report: ComparisonReport = serde_json::from_str(&content).unwrap();

    assert_eq!(report.report_source, "(none)");
    assert!(report.result.matched.is_empty());
    assert_eq!(report.result.unmatched.len(), 3);
}

#[tokio::test]
async fn test_run_reportNextToInput_shouldBeDiscoveredByStem() {
    let temp_dir = common::create_temp_dir().unwrap();
    let dir = temp_dir.path().to_path_buf();

    let transcript_path = common::create_test_transcript(&dir, "stop_004.txt").unwrap();
    common::create_test_docx(
        &dir,
        "stop_004.docx",
        &["Subject stated i only had one beer."],
    ).unwrap();

    let controller = controller_with_format(OutputFormat::Json);
    controller.run(transcript_path, None, dir.clone(), false).await.unwrap();

    let content = std::fs::read_to_string(dir.join("stop_004.comparison.json")).unwrap();
    let report: ComparisonReport = serde_json::from_str(&content).unwrap();

    assert_eq!(report.report_source, "stop_004.docx");
    assert_eq!(report.result.matched, vec!["i only had one beer"]);
}

#[tokio::test]
async fn test_run_missingInputFile_shouldFail() {
    let temp_dir = common::create_temp_dir().unwrap();
    let dir = temp_dir.path().to_path_buf();

    let controller = controller_with_format(OutputFormat::Json);
    let result = controller.run(dir.join("missing.mp4"), None, dir, false).await;

    assert!(result.is_err());
}

#[test]
fn test_controller_defaultConfig_shouldInitialize() {
    let controller = Controller::new_for_test().unwrap();
    assert!(controller.is_initialized());
}
