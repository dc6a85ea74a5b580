use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use log::{debug, error};
use tokio::process::Command;

use crate::errors::ProviderError;

/// Client for a local whisper.cpp-style transcription binary
#[derive(Debug, Clone)]
pub struct WhisperCli {
    /// Path or name of the transcription binary
    binary_path: PathBuf,
    /// Path to the model file passed with -m
    model_path: PathBuf,
    /// Spoken language hint (e.g., "en")
    language: String,
    /// Subprocess timeout
    timeout: Duration,
}

/// Transcription request for the local binary
#[derive(Debug, Clone)]
pub struct WhisperCliRequest {
    /// WAV file to transcribe (16 kHz mono PCM)
    pub audio_path: PathBuf,
}

/// Transcription response from the local binary
#[derive(Debug, Clone)]
pub struct WhisperCliResponse {
    /// Transcript text captured from stdout
    pub text: String,
}

impl WhisperCli {
    /// Create a new client for the local transcription binary
    pub fn new(
        binary_path: impl Into<PathBuf>,
        model_path: impl Into<PathBuf>,
        language: impl Into<String>,
        timeout_secs: u64,
    ) -> Self {
        Self {
            binary_path: binary_path.into(),
            model_path: model_path.into(),
            language: language.into(),
            timeout: Duration::from_secs(timeout_secs.max(1)),
        }
    }

    /// Transcribe a WAV file by invoking the binary as a subprocess.
    ///
    /// Runs with timestamps and banner printing suppressed so stdout carries
    /// only the transcript text.
    pub async fn transcribe(&self, request: WhisperCliRequest) -> Result<WhisperCliResponse, ProviderError> {
        let audio_path: &Path = request.audio_path.as_ref();
        if !audio_path.exists() {
            return Err(ProviderError::RequestFailed(format!(
                "audio file does not exist: {:?}", audio_path
            )));
        }

        debug!("Running {:?} on {:?}", self.binary_path, audio_path);

        let whisper_future = Command::new(&self.binary_path)
            .args([
                "-m", &self.model_path.to_string_lossy(),
                "-f", &audio_path.to_string_lossy(),
                "-l", &self.language,
                "-nt",                      // No timestamps
                "--no-prints",              // No banner/progress on stdout
            ])
            .output();

        let output = tokio::select! {
            result = whisper_future => {
                match result {
                    Ok(output) => output,
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                        return Err(ProviderError::ConnectionError(format!(
                            "transcription binary not found: {:?}", self.binary_path
                        )));
                    },
                    Err(e) => {
                        return Err(ProviderError::RequestFailed(format!(
                            "failed to execute transcription binary: {}", e
                        )));
                    }
                }
            },
            _ = tokio::time::sleep(self.timeout) => {
                return Err(ProviderError::RequestFailed(format!(
                    "transcription timed out after {} seconds", self.timeout.as_secs()
                )));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!("Transcription binary failed: {}", stderr.trim());
            return Err(ProviderError::RequestFailed(format!(
                "transcription binary exited with {}: {}", output.status, stderr.trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if text.is_empty() {
            return Err(ProviderError::ParseError(
                "transcription binary produced no output".to_string(),
            ));
        }

        Ok(WhisperCliResponse { text })
    }

    /// Check that the binary exists on PATH and the model file is present
    pub async fn test_connection(&self) -> Result<(), ProviderError> {
        if !self.model_path.exists() {
            return Err(ProviderError::ConnectionError(format!(
                "model file does not exist: {:?}", self.model_path
            )));
        }

        let probe = Command::new(&self.binary_path)
            .arg("--help")
            .output()
            .await;

        match probe {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ProviderError::ConnectionError(format!(
                    "transcription binary not found: {:?}", self.binary_path
                )))
            },
            Err(e) => Err(ProviderError::ConnectionError(format!(
                "failed to probe transcription binary: {}", e
            ))),
        }
    }

    /// Extract the transcript text from a response
    pub fn extract_text(response: &WhisperCliResponse) -> String {
        response.text.clone()
    }
}
