use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use log::{debug, warn};
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};

use crate::errors::ProviderError;

/// OpenAI client for the audio transcription API
pub struct OpenAi {
    /// API key used as a bearer token
    api_key: String,
    /// Base URL of the API (e.g., https://api.openai.com/v1)
    base_url: String,
    /// HTTP client for making requests
    client: Client,
    /// Maximum number of retry attempts
    max_retries: u32,
    /// Base backoff time in milliseconds for exponential backoff
    backoff_base_ms: u64,
}

impl std::fmt::Debug for OpenAi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // API key deliberately omitted
        f.debug_struct("OpenAi")
            .field("base_url", &self.base_url)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

/// Transcription request for the OpenAI API
#[derive(Debug, Clone)]
pub struct OpenAiRequest {
    /// WAV file to upload
    pub audio_path: PathBuf,
    /// Model name (e.g., "whisper-1")
    pub model: String,
    /// Spoken language hint (ISO 639-1)
    pub language: Option<String>,
}

/// Transcription response from the OpenAI API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiResponse {
    /// Transcript text
    pub text: String,
}

/// Error payload returned by the API
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl OpenAi {
    /// Create a new OpenAI client
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            client: Client::builder()
                .timeout(Duration::from_secs(120))
                .build()
                .unwrap_or_default(),
            max_retries: 3,
            backoff_base_ms: 1000,
        }
    }

    /// Create a new OpenAI client with explicit retry configuration
    pub fn new_with_config(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs.max(1)))
                .build()
                .unwrap_or_default(),
            max_retries,
            backoff_base_ms,
        }
    }

    /// Transcribe an audio file through the audio/transcriptions endpoint
    /// with retry logic
    pub async fn transcribe(&self, request: OpenAiRequest) -> Result<OpenAiResponse, ProviderError> {
        let url = format!("{}/audio/transcriptions", self.base_url.trim_end_matches('/'));

        // The upload is re-read per attempt so the multipart body is fresh
        let file_name = request.audio_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "audio.wav".to_string());

        let mut attempt = 0;
        let mut last_error = None;

        while attempt <= self.max_retries {
            if attempt > 0 {
                let backoff = self.backoff_base_ms * (1 << (attempt - 1));
                warn!("Retrying transcription request (attempt {}) after {}ms", attempt + 1, backoff);
                tokio::time::sleep(Duration::from_millis(backoff)).await;
            }

            let audio_bytes = tokio::fs::read(&request.audio_path).await.map_err(|e| {
                ProviderError::RequestFailed(format!(
                    "failed to read audio file {:?}: {}", request.audio_path, e
                ))
            })?;

            let part = Part::bytes(audio_bytes)
                .file_name(file_name.clone())
                .mime_str("audio/wav")
                .map_err(|e| ProviderError::RequestFailed(format!("invalid mime type: {}", e)))?;

            let mut form = Form::new()
                .text("model", request.model.clone())
                .part("file", part);

            if let Some(language) = &request.language {
                form = form.text("language", language.clone());
            }

            debug!("POST {} (attempt {})", url, attempt + 1);

            let response = match self.client
                .post(&url)
                .bearer_auth(&self.api_key)
                .multipart(form)
                .send()
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    last_error = Some(ProviderError::ConnectionError(e.to_string()));
                    attempt += 1;
                    continue;
                }
            };

            let status = response.status();

            if status.is_success() {
                return response.json::<OpenAiResponse>().await.map_err(|e| {
                    ProviderError::ParseError(format!("invalid transcription response: {}", e))
                });
            }

            let message = response
                .json::<ApiErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error)
                .map(|detail| detail.message)
                .unwrap_or_else(|| status.to_string());

            match status.as_u16() {
                401 | 403 => {
                    // Not retryable
                    return Err(ProviderError::AuthenticationError(message));
                },
                429 => {
                    last_error = Some(ProviderError::RateLimitExceeded(message));
                },
                code if code >= 500 => {
                    last_error = Some(ProviderError::ApiError { status_code: code, message });
                },
                code => {
                    // Client errors other than rate limiting are not retryable
                    return Err(ProviderError::ApiError { status_code: code, message });
                },
            }

            attempt += 1;
        }

        Err(last_error.unwrap_or_else(|| {
            ProviderError::RequestFailed("transcription request failed with no attempts".to_string())
        }))
    }

    /// Test the connection by listing available models
    pub async fn test_connection(&self) -> Result<(), ProviderError> {
        let url = format!("{}/models", self.base_url.trim_end_matches('/'));

        let response = self.client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| ProviderError::ConnectionError(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        match status.as_u16() {
            401 | 403 => Err(ProviderError::AuthenticationError(
                "API key was rejected".to_string(),
            )),
            code => Err(ProviderError::ApiError {
                status_code: code,
                message: status.to_string(),
            }),
        }
    }

    /// Extract the transcript text from a response
    pub fn extract_text(response: &OpenAiResponse) -> String {
        response.text.clone()
    }
}
