/*!
 * Error types for the corroborate application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur when talking to a transcription provider
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

/// Errors that can occur while extracting text from a report document
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The file extension does not map to a supported report format
    #[error("Unsupported report format: {0}")]
    UnsupportedFormat(String),

    /// An external tool the extraction depends on is not installed
    #[error("Required tool is missing: {0}")]
    ToolingMissing(String),

    /// The document was recognized but its text could not be pulled out
    #[error("Text extraction failed: {0}")]
    ExtractionFailed(String),

    /// Underlying file I/O failure
    #[error("I/O error while reading report: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur while producing a transcript from a video
#[derive(Error, Debug)]
pub enum TranscriptionError {
    /// The configured speech-to-text model or binary cannot be used
    #[error("Transcription model unavailable: {0}")]
    ModelUnavailable(String),

    /// Audio could not be extracted from the input container
    #[error("Audio extraction failed: {0}")]
    AudioExtraction(String),

    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from report text extraction
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Error from transcription
    #[error("Transcription error: {0}")]
    Transcription(#[from] TranscriptionError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
