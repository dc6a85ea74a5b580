/*!
 * Provider implementations for speech-to-text services.
 *
 * This module contains client implementations for the supported transcription
 * backends:
 * - WhisperCli: local whisper.cpp-style command line binary
 * - OpenAI: OpenAI audio transcription API
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Common trait for all transcription providers
///
/// This trait defines the interface that all provider implementations must follow,
/// allowing them to be used interchangeably in the transcription service.
#[async_trait]
pub trait TranscriptionProvider: Send + Sync + Debug {
    /// The request type for this provider
    type Request: Send + Sync;

    /// The response type for this provider
    type Response: Send + Sync;

    /// Transcribe audio using this provider
    ///
    /// # Arguments
    /// * `request` - The request to transcribe
    ///
    /// # Returns
    /// * `Result<Self::Response, ProviderError>` - The response from the provider or an error
    async fn transcribe(&self, request: Self::Request) -> Result<Self::Response, ProviderError>;

    /// Test that the provider is reachable and usable
    ///
    /// # Returns
    /// * `Result<(), ProviderError>` - Ok if the provider is usable, or an error
    async fn test_connection(&self) -> Result<(), ProviderError>;

    /// Extract the transcript text from the provider response
    ///
    /// # Arguments
    /// * `response` - The response from the provider
    ///
    /// # Returns
    /// * `String` - The extracted transcript text
    fn extract_text(response: &Self::Response) -> String;
}

pub mod whisper_cli;
pub mod openai;
pub mod mock;
