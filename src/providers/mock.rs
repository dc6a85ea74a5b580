/*!
 * Mock provider implementations for testing.
 *
 * This module provides mock providers that simulate different behaviors:
 * - `MockProvider::working()` - Always succeeds with a fixed transcript
 * - `MockProvider::intermittent(n)` - Fails every Nth request
 * - `MockProvider::failing()` - Always fails with an error
 */

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::ProviderError;
use crate::providers::TranscriptionProvider;

/// Mock request for testing
#[derive(Debug, Clone)]
pub struct MockRequest {
    /// Audio file the caller claims to transcribe
    pub audio_path: PathBuf,
    /// Spoken language hint
    pub language: String,
}

/// Mock response for testing
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// The transcript text
    pub text: String,
}

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with a canned transcript
    Working,
    /// Fails intermittently (every Nth request)
    Intermittent { fail_every: usize },
    /// Always fails with an error
    Failing,
    /// Returns an empty transcript
    Empty,
    /// Simulates a slow response (for timeout testing)
    Slow { delay_ms: u64 },
}

/// Mock provider for testing transcription behavior
#[derive(Debug)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter for intermittent failures
    request_count: Arc<AtomicUsize>,
    /// Canned transcript returned on success
    transcript: String,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            transcript: "step out of the vehicle please\nhave you been drinking tonight".to_string(),
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create an intermittently failing mock provider
    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every })
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock that returns empty transcripts
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Create a slow mock for timeout testing
    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// Replace the canned transcript returned on success
    pub fn with_transcript(mut self, transcript: impl Into<String>) -> Self {
        self.transcript = transcript.into();
        self
    }

    /// Number of requests this mock has served
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TranscriptionProvider for MockProvider {
    type Request = MockRequest;
    type Response = MockResponse;

    async fn transcribe(&self, _request: Self::Request) -> Result<Self::Response, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst) + 1;

        match self.behavior {
            MockBehavior::Working => Ok(MockResponse {
                text: self.transcript.clone(),
            }),
            MockBehavior::Intermittent { fail_every } => {
                if fail_every > 0 && count % fail_every == 0 {
                    Err(ProviderError::RequestFailed(format!(
                        "simulated intermittent failure on request {}", count
                    )))
                } else {
                    Ok(MockResponse {
                        text: self.transcript.clone(),
                    })
                }
            },
            MockBehavior::Failing => Err(ProviderError::RequestFailed(
                "simulated provider failure".to_string(),
            )),
            MockBehavior::Empty => Ok(MockResponse {
                text: String::new(),
            }),
            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(std::time::Duration::from_millis(delay_ms)).await;
                Ok(MockResponse {
                    text: self.transcript.clone(),
                })
            },
        }
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        match self.behavior {
            MockBehavior::Failing => Err(ProviderError::ConnectionError(
                "simulated connection failure".to_string(),
            )),
            _ => Ok(()),
        }
    }

    fn extract_text(response: &Self::Response) -> String {
        response.text.clone()
    }
}
