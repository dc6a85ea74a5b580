/*!
 * Tests for transcript model and audio extraction functionality
 */

use std::path::PathBuf;

use corroborate::transcript_processor::TranscriptCollection;
use crate::common;

#[test]
fn test_fromText_shouldCarrySourceAndProvider() {
    let transcript = TranscriptCollection::from_text(
        PathBuf::from("stop_001.mp4"),
        "whispercli",
        "step out of the vehicle please",
    );

    assert_eq!(transcript.source_file, PathBuf::from("stop_001.mp4"));
    assert_eq!(transcript.provider, "whispercli");
    assert!(!transcript.is_empty());
}

#[test]
fn test_fromFile_textTranscript_shouldReadAndLabelProvider() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = common::create_test_transcript(&temp_dir.path().to_path_buf(), "transcript.txt").unwrap();

    let transcript = TranscriptCollection::from_file(&path).unwrap();

    assert_eq!(transcript.provider, "file");
    assert_eq!(transcript.source_file, path);
    assert_eq!(transcript.lines().len(), 3);
}

#[test]
fn test_fromFile_missingFile_shouldFail() {
    let temp_dir = common::create_temp_dir().unwrap();
    let missing = temp_dir.path().join("missing.txt");

    assert!(TranscriptCollection::from_file(&missing).is_err());
}

#[test]
fn test_lines_blankAndPaddedLines_shouldBeTrimmedAndFiltered() {
    let transcript = TranscriptCollection::from_text(
        PathBuf::new(),
        "file",
        "  first statement  \n\n   \nsecond statement\n",
    );

    assert_eq!(transcript.lines(), vec!["first statement", "second statement"]);
}

#[test]
fn test_isEmpty_whitespaceOnlyText_shouldBeTrue() {
    let transcript = TranscriptCollection::from_text(PathBuf::new(), "file", "  \n \t ");
    assert!(transcript.is_empty());
    assert!(transcript.lines().is_empty());
}

#[test]
fn test_display_shouldIncludeProviderAndLineCount() {
    let transcript = TranscriptCollection::from_text(
        PathBuf::from("clip.mp4"),
        "openai",
        "one\ntwo",
    );

    let rendered = format!("{}", transcript);
    assert!(rendered.contains("Provider: openai"));
    assert!(rendered.contains("Lines: 2"));
}

#[tokio::test]
async fn test_listAudioTracks_missingVideo_shouldFail() {
    let temp_dir = common::create_temp_dir().unwrap();
    let missing = temp_dir.path().join("missing.mp4");

    let result = TranscriptCollection::list_audio_tracks(&missing).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_extractAudioToWav_missingVideo_shouldFail() {
    let temp_dir = common::create_temp_dir().unwrap();
    let missing = temp_dir.path().join("missing.mp4");
    let output = temp_dir.path().join("out.wav");

    let result = TranscriptCollection::extract_audio_to_wav(&missing, &output).await;
    assert!(result.is_err());
}
