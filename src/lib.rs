/*!
 * # corroborate - Bodycam Video + Police Report Comparator
 *
 * A Rust library for checking which statements spoken in a bodycam video are
 * corroborated by the accompanying written police report.
 *
 * ## Features
 *
 * - Extract and transcribe bodycam audio using speech-to-text providers:
 *   - Local whisper.cpp-style CLI
 *   - OpenAI audio transcription API
 * - Extract text from police reports (PDF, DOCX, plain text)
 * - Line-level corroboration comparison with configurable match policy
 * - Export the comparison as DOCX, Markdown, JSON, or plain text
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `comparison`: The transcript/report comparison core
 * - `transcript_processor`: Transcript model and bodycam audio extraction
 * - `report_extractor`: Police report text extraction
 * - `transcription_service`: Speech-to-text orchestration
 * - `providers`: Client implementations for transcription backends:
 *   - `providers::whisper_cli`: Local whisper.cpp-style CLI client
 *   - `providers::openai`: OpenAI API client
 * - `report_writer`: Comparison document rendering
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod comparison;
pub mod errors;
pub mod file_utils;
pub mod providers;
pub mod report_extractor;
pub mod report_writer;
pub mod transcript_processor;
pub mod transcription_service;

// Re-export main types for easier usage
pub use app_config::Config;
pub use comparison::{compare_texts, ComparisonResult, MatchPolicy};
pub use report_extractor::ReportDocument;
pub use report_writer::{ComparisonReport, OutputFormat, ReportWriter};
pub use transcript_processor::TranscriptCollection;
pub use transcription_service::TranscriptionService;
pub use errors::{AppError, ExtractionError, ProviderError, TranscriptionError};
