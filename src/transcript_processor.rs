use std::fmt;
use anyhow::{Result, anyhow};
use std::path::{Path, PathBuf};
use log::{error, warn, debug};
use serde::{Deserialize, Serialize};
use serde_json::{Value, from_str};
use tokio::process::Command;

// @module: Transcript model and bodycam audio extraction

/// Information about an audio track in a video container
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioTrackInfo {
    /// The index/id of the audio track
    pub index: usize,
    /// The codec name of the audio track
    pub codec_name: String,
    /// Channel count if reported
    pub channels: Option<u64>,
    /// Sample rate in Hz if reported
    pub sample_rate: Option<u64>,
}

/// A transcript produced from a bodycam video (or read from a text file)
#[derive(Debug, Clone)]
pub struct TranscriptCollection {
    /// Source file the transcript was derived from
    pub source_file: PathBuf,

    /// Label of the provider that produced the text ("file" for direct reads)
    pub provider: String,

    /// Full transcript text
    pub text: String,
}

impl TranscriptCollection {
    /// Create a transcript from already-transcribed text
    pub fn from_text(source_file: PathBuf, provider: impl Into<String>, text: impl Into<String>) -> Self {
        TranscriptCollection {
            source_file,
            provider: provider.into(),
            text: text.into(),
        }
    }

    /// Read a transcript directly from a plain text file, bypassing transcription
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read transcript file {:?}: {}", path, e))?;

        Ok(TranscriptCollection {
            source_file: path.to_path_buf(),
            provider: "file".to_string(),
            text,
        })
    }

    /// Non-blank transcript lines, trimmed, in original order
    pub fn lines(&self) -> Vec<&str> {
        self.text
            .lines()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .collect()
    }

    /// Whether the transcript carries any spoken content at all
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// List audio tracks in a video file
    pub async fn list_audio_tracks<P: AsRef<Path>>(video_path: P) -> Result<Vec<AudioTrackInfo>> {
        let video_path = video_path.as_ref();

        if !video_path.exists() {
            return Err(anyhow!("Video file not found: {:?}", video_path));
        }

        // Add timeout to prevent hanging on problematic files
        let ffprobe_future = Command::new("ffprobe")
            .args([
                "-v", "quiet",
                "-print_format", "json",
                "-show_streams",
                "-select_streams", "a",
                video_path.to_str().unwrap_or("")
            ])
            .output();

        let timeout_duration = std::time::Duration::from_secs(60); // 1 minute timeout
        let output = tokio::select! {
            result = ffprobe_future => {
                result.map_err(|e| anyhow!("Failed to execute ffprobe command: {}", e))?
            },
            _ = tokio::time::sleep(timeout_duration) => {
                return Err(anyhow!("ffprobe command timed out after 60 seconds"));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!("ffprobe failed: {}", stderr);
            return Err(anyhow!("ffprobe command failed: {}", stderr));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);

        if stdout.trim().is_empty() {
            return Ok(Vec::new());
        }

        let json: Value = from_str(&stdout)
            .map_err(|e| anyhow!("Failed to parse ffprobe JSON output: {}", e))?;

        let mut tracks = Vec::new();

        if let Some(streams) = json.get("streams").and_then(|s| s.as_array()) {
            for stream in streams.iter() {
                let index = stream.get("index")
                    .and_then(|v| v.as_u64())
                    .map(|v| v as usize)
                    .unwrap_or(0);

                let codec_name = stream.get("codec_name")
                    .and_then(|v| v.as_str())
                    .unwrap_or("unknown");

                let channels = stream.get("channels").and_then(|v| v.as_u64());

                let sample_rate = stream.get("sample_rate")
                    .and_then(|v| v.as_str())
                    .and_then(|s| s.parse::<u64>().ok());

                tracks.push(AudioTrackInfo {
                    index,
                    codec_name: codec_name.to_string(),
                    channels,
                    sample_rate,
                });
            }
        }

        Ok(tracks)
    }

    /// Extract a video's audio to a 16 kHz mono WAV file for transcription.
    ///
    /// Speech-to-text providers expect mono 16 kHz PCM, so the extraction
    /// downmixes and resamples regardless of the source track layout.
    pub async fn extract_audio_to_wav<P: AsRef<Path>>(video_path: P, output_path: P) -> Result<()> {
        let video_path = video_path.as_ref();
        let output_path = output_path.as_ref();

        if !video_path.exists() {
            return Err(anyhow!("Video file does not exist: {:?}", video_path));
        }

        let tracks = Self::list_audio_tracks(video_path).await?;
        if tracks.is_empty() {
            return Err(anyhow!("No audio tracks found in the video"));
        }
        debug!("Found {} audio track(s), extracting the first", tracks.len());

        // Use ffmpeg to extract and resample the audio
        // Add timeout to prevent hanging on problematic files
        let ffmpeg_future = Command::new("ffmpeg")
            .args([
                "-y",                       // Overwrite existing file
                "-i", video_path.to_str().unwrap_or_default(),
                "-vn",                      // Drop the video stream
                "-ac", "1",                 // Mono
                "-ar", "16000",             // 16 kHz
                "-c:a", "pcm_s16le",        // Signed 16-bit PCM
                output_path.to_str().unwrap_or_default()
            ])
            .output();

        let timeout_duration = std::time::Duration::from_secs(300); // 5 minute timeout for ffmpeg
        let result = tokio::select! {
            result = ffmpeg_future => {
                result.map_err(|e| anyhow!("Failed to execute ffmpeg command for audio extraction: {}", e))?
            },
            _ = tokio::time::sleep(timeout_duration) => {
                return Err(anyhow!("ffmpeg command timed out after 5 minutes"));
            }
        };

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            let filtered = Self::filter_ffmpeg_stderr(&stderr);
            error!("Audio extraction failed: {}", filtered);
            return Err(anyhow!("ffmpeg extraction failed: {}", filtered));
        }

        let file_size = std::fs::metadata(output_path)?.len();
        if file_size == 0 {
            warn!("Extracted audio file is empty: {:?}", output_path);
            return Err(anyhow!("Extracted audio file is empty"));
        }

        Ok(())
    }

    /// Filter ffmpeg stderr to only show meaningful error lines, stripping the
    /// version banner, build configuration, and stream metadata noise.
    pub(crate) fn filter_ffmpeg_stderr(stderr: &str) -> String {
        let dominated_prefixes = [
            "ffmpeg version",
            "  built with",
            "  configuration:",
            "  lib",
            "Input #",
            "  Metadata:",
            "  Duration:",
            "  Chapter",
            "    Chapter",
            "  Stream #",
            "      Metadata:",
            "        title",
            "        BPS",
            "        DURATION",
            "        NUMBER_OF",
            "        _STATISTICS",
            "Output #",
            "Stream mapping:",
            "Press [q]",
        ];

        let meaningful: Vec<&str> = stderr
            .lines()
            .filter(|line| {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    return false;
                }
                !dominated_prefixes.iter().any(|p| trimmed.starts_with(p))
            })
            .collect();

        if meaningful.is_empty() {
            "unknown ffmpeg error (stderr was empty after filtering)".to_string()
        } else {
            meaningful.join("\n")
        }
    }
}

impl fmt::Display for TranscriptCollection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Transcript")?;
        writeln!(f, "Source: {:?}", self.source_file)?;
        writeln!(f, "Provider: {}", self.provider)?;
        writeln!(f, "Lines: {}", self.lines().len())?;
        Ok(())
    }
}
