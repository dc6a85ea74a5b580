use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;

use crate::comparison::MatchPolicy;
use crate::report_writer::OutputFormat;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Transcription config
    pub transcription: TranscriptionConfig,

    /// Comparison config
    #[serde(default)]
    pub comparison: ComparisonConfig,

    /// Output config
    #[serde(default)]
    pub output: OutputConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Transcription provider type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptionProvider {
    // @provider: Local whisper.cpp-style CLI
    #[default]
    WhisperCli,
    // @provider: OpenAI audio transcription API
    OpenAI,
}

impl TranscriptionProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::WhisperCli => "Whisper CLI",
            Self::OpenAI => "OpenAI",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::WhisperCli => "whispercli".to_string(),
            Self::OpenAI => "openai".to_string(),
        }
    }
}

impl std::fmt::Display for TranscriptionProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for TranscriptionProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "whispercli" | "whisper-cli" | "whisper" => Ok(Self::WhisperCli),
            "openai" => Ok(Self::OpenAI),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Provider configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Provider type identifier
    #[serde(rename = "type")]
    pub provider_type: String,

    // @field: Model name (API model id, or model file for the local CLI)
    #[serde(default = "String::new")]
    pub model: String,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Local binary path (whisper-cli only)
    #[serde(default = "String::new")]
    pub binary_path: String,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Retry count for failed requests
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    // @field: Backoff multiplier for retries (in milliseconds)
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl ProviderConfig {
    // @param provider_type: Provider enum
    // @returns: Provider config with defaults
    pub fn new(provider_type: TranscriptionProvider) -> Self {
        match provider_type {
            TranscriptionProvider::WhisperCli => Self {
                provider_type: "whispercli".to_string(),
                model: default_whisper_model(),
                api_key: String::new(),
                endpoint: String::new(),
                binary_path: default_whisper_binary(),
                timeout_secs: default_whisper_timeout_secs(),
                retry_count: default_retry_count(),
                retry_backoff_ms: default_retry_backoff_ms(),
            },
            TranscriptionProvider::OpenAI => Self {
                provider_type: "openai".to_string(),
                model: default_openai_model(),
                api_key: String::new(),
                endpoint: default_openai_endpoint(),
                binary_path: String::new(),
                timeout_secs: default_timeout_secs(),
                retry_count: default_retry_count(),
                retry_backoff_ms: default_retry_backoff_ms(),
            },
        }
    }
}

/// Configuration for the transcription stage
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranscriptionConfig {
    /// Active provider
    #[serde(default)]
    pub provider: TranscriptionProvider,

    /// Available provider configurations
    #[serde(default)]
    pub available_providers: Vec<ProviderConfig>,

    /// Spoken language hint passed to the provider (e.g., "en")
    #[serde(default = "default_audio_language")]
    pub audio_language: String,
}

impl TranscriptionConfig {
    /// Get the active provider configuration from the available_providers array
    pub fn get_active_provider_config(&self) -> Option<&ProviderConfig> {
        let provider_str = self.provider.to_lowercase_string();
        self.available_providers.iter()
            .find(|p| p.provider_type == provider_str)
    }

    /// Get a specific provider configuration by type for testing
    pub fn get_provider_config(&self, provider_type: &TranscriptionProvider) -> Option<&ProviderConfig> {
        let provider_str = provider_type.to_lowercase_string();
        self.available_providers.iter()
            .find(|p| p.provider_type == provider_str)
    }

    /// Get the model for the active provider
    pub fn get_model(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.model.is_empty() {
                return provider_config.model.clone();
            }
        }

        // Default fallback based on provider type
        match self.provider {
            TranscriptionProvider::WhisperCli => default_whisper_model(),
            TranscriptionProvider::OpenAI => default_openai_model(),
        }
    }

    /// Get the API key for the active provider
    pub fn get_api_key(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.api_key.is_empty() {
                return provider_config.api_key.clone();
            }
        }

        // Default fallback - the local CLI doesn't use API keys
        String::new()
    }

    /// Get the endpoint for the active provider
    pub fn get_endpoint(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.endpoint.is_empty() {
                return provider_config.endpoint.clone();
            }
        }

        match self.provider {
            TranscriptionProvider::WhisperCli => String::new(),
            TranscriptionProvider::OpenAI => default_openai_endpoint(),
        }
    }

    /// Get the local binary path for the active provider
    pub fn get_binary_path(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.binary_path.is_empty() {
                return provider_config.binary_path.clone();
            }
        }

        match self.provider {
            TranscriptionProvider::WhisperCli => default_whisper_binary(),
            TranscriptionProvider::OpenAI => String::new(),
        }
    }

    /// Get the timeout for the active provider
    pub fn get_timeout_secs(&self) -> u64 {
        if let Some(provider_config) = self.get_active_provider_config() {
            if provider_config.timeout_secs > 0 {
                return provider_config.timeout_secs;
            }
        }

        match self.provider {
            TranscriptionProvider::WhisperCli => default_whisper_timeout_secs(),
            TranscriptionProvider::OpenAI => default_timeout_secs(),
        }
    }
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        let mut config = Self {
            provider: TranscriptionProvider::default(),
            available_providers: Vec::new(),
            audio_language: default_audio_language(),
        };

        // Add default providers
        config.available_providers.push(ProviderConfig::new(TranscriptionProvider::WhisperCli));
        config.available_providers.push(ProviderConfig::new(TranscriptionProvider::OpenAI));

        config
    }
}

/// Configuration for the comparison stage
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ComparisonConfig {
    /// Policy deciding when a transcript line counts as corroborated
    #[serde(default)]
    pub policy: MatchPolicy,
}

/// Configuration for the output stage
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct OutputConfig {
    /// Format of the generated comparison document
    #[serde(default)]
    pub format: OutputFormat,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_whisper_timeout_secs() -> u64 {
    // Local transcription of long bodycam footage can take a while
    600
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    1000 // doubled on each retry
}

fn default_openai_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_openai_model() -> String {
    "whisper-1".to_string()
}

fn default_whisper_binary() -> String {
    "whisper-cli".to_string()
}

fn default_whisper_model() -> String {
    "models/ggml-base.en.bin".to_string()
}

fn default_audio_language() -> String {
    "en".to_string()
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.transcription.audio_language.trim().is_empty() {
            return Err(anyhow!("Audio language must not be empty"));
        }

        // Validate API key for remote providers
        match self.transcription.provider {
            TranscriptionProvider::OpenAI => {
                let api_key = self.transcription.get_api_key();
                if api_key.is_empty() {
                    return Err(anyhow!("Transcription API key is required for OpenAI provider"));
                }
            },
            TranscriptionProvider::WhisperCli => {
                if self.transcription.get_binary_path().is_empty() {
                    return Err(anyhow!("Binary path is required for the whisper-cli provider"));
                }
            },
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            transcription: TranscriptionConfig::default(),
            comparison: ComparisonConfig::default(),
            output: OutputConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
