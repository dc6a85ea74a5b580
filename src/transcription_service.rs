use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use log::{debug, info};

use crate::app_config::{TranscriptionConfig, TranscriptionProvider as ConfigTranscriptionProvider};
use crate::errors::{ProviderError, TranscriptionError};
use crate::providers::openai::{OpenAi, OpenAiRequest};
use crate::providers::whisper_cli::{WhisperCli, WhisperCliRequest};
use crate::transcript_processor::TranscriptCollection;

// @module: Transcription service for bodycam audio

// @enum: Concrete provider client held by the service
pub enum TranscriptionClientImpl {
    // @variant: Local whisper.cpp-style binary
    WhisperCli {
        // @field: Client instance
        client: WhisperCli,
    },

    // @variant: OpenAI API service
    OpenAI {
        // @field: Client instance
        client: OpenAi,
    },
}

// @struct: Transcription service
//
// Owns a single provider handle built once from configuration. Callers hold
// the service for the lifetime of the run and reuse it across invocations;
// there is no implicit teardown and no process-wide cached state.
pub struct TranscriptionService {
    // @field: Provider implementation
    provider: TranscriptionClientImpl,

    // @field: Configuration
    config: TranscriptionConfig,
}

impl TranscriptionService {
    /// Create a new transcription service from configuration
    pub fn new(config: TranscriptionConfig) -> Result<Self> {
        let provider = match config.provider {
            ConfigTranscriptionProvider::WhisperCli => {
                let client = WhisperCli::new(
                    config.get_binary_path(),
                    config.get_model(),
                    config.audio_language.clone(),
                    config.get_timeout_secs(),
                );

                TranscriptionClientImpl::WhisperCli {
                    client,
                }
            },
            ConfigTranscriptionProvider::OpenAI => {
                let active = config.get_active_provider_config();
                let client = OpenAi::new_with_config(
                    config.get_api_key(),
                    config.get_endpoint(),
                    config.get_timeout_secs(),
                    active.map(|p| p.retry_count).unwrap_or(3),
                    active.map(|p| p.retry_backoff_ms).unwrap_or(1000),
                );

                TranscriptionClientImpl::OpenAI {
                    client,
                }
            },
        };

        Ok(Self {
            provider,
            config,
        })
    }

    /// Lowercase label of the active provider
    pub fn provider_label(&self) -> String {
        self.config.provider.to_lowercase_string()
    }

    /// Test that the configured provider is usable.
    ///
    /// A connection-level failure means the configured model or binary cannot
    /// be used at all, so it surfaces as `ModelUnavailable`.
    pub async fn test_connection(&self) -> Result<(), TranscriptionError> {
        let result = match &self.provider {
            TranscriptionClientImpl::WhisperCli { client } => client.test_connection().await,
            TranscriptionClientImpl::OpenAI { client } => client.test_connection().await,
        };

        result.map_err(|e| match e {
            ProviderError::ConnectionError(message)
            | ProviderError::AuthenticationError(message) => {
                TranscriptionError::ModelUnavailable(message)
            },
            other => TranscriptionError::Provider(other),
        })
    }

    /// Transcribe a prepared WAV file
    pub async fn transcribe_wav(&self, wav_path: &Path) -> Result<String, TranscriptionError> {
        let start_time = Instant::now();

        let text = match &self.provider {
            TranscriptionClientImpl::WhisperCli { client } => {
                let request = WhisperCliRequest {
                    audio_path: wav_path.to_path_buf(),
                };
                let response = client.transcribe(request).await?;
                WhisperCli::extract_text(&response)
            },
            TranscriptionClientImpl::OpenAI { client } => {
                let request = OpenAiRequest {
                    audio_path: wav_path.to_path_buf(),
                    model: self.config.get_model(),
                    language: Some(self.config.audio_language.clone()),
                };
                let response = client.transcribe(request).await?;
                OpenAi::extract_text(&response)
            },
        };

        debug!(
            "Transcription finished in {:.1}s ({} chars)",
            start_time.elapsed().as_secs_f64(),
            text.len()
        );

        Ok(text)
    }

    /// Transcribe the audio track of a video file.
    ///
    /// Extracts the audio to a temporary 16 kHz mono WAV, sends it to the
    /// provider, and returns the transcript. The temporary file is cleaned
    /// up before returning.
    pub async fn transcribe_video(&self, video_path: &Path) -> Result<TranscriptCollection, TranscriptionError> {
        let temp_dir = tempfile::tempdir().map_err(|e| {
            TranscriptionError::AudioExtraction(format!("failed to create temp directory: {}", e))
        })?;
        let wav_path = temp_dir.path().join("audio.wav");

        info!("Extracting audio from {:?}", video_path);
        TranscriptCollection::extract_audio_to_wav(video_path, wav_path.as_path())
            .await
            .map_err(|e| TranscriptionError::AudioExtraction(e.to_string()))?;

        info!("Transcribing audio with provider '{}'", self.provider_label());
        let text = self.transcribe_wav(&wav_path).await?;

        Ok(TranscriptCollection::from_text(
            video_path.to_path_buf(),
            self.provider_label(),
            text,
        ))
    }
}
