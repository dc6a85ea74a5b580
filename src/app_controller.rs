use anyhow::{Result, Context};
use futures::future;
use log::{warn, info, debug};
use std::path::{Path, PathBuf};
use indicatif::{ProgressBar, ProgressStyle, MultiProgress};

use crate::app_config::Config;
use crate::comparison::{compare_texts, ComparisonResult};
use crate::file_utils::{FileManager, FileType};
use crate::report_extractor::{self, ReportDocument};
use crate::report_writer::{ComparisonReport, ReportWriter};
use crate::transcript_processor::TranscriptCollection;
use crate::transcription_service::TranscriptionService;

// @module: Application controller for case comparison

/// Main application controller driving the analysis pipeline
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Transcription service handle, built once and reused
    transcription_service: TranscriptionService,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        // The service owns the provider handle for the whole run
        let transcription_service = TranscriptionService::new(config.transcription.clone())?;

        Ok(Self {
            config,
            transcription_service,
        })
    }

    /// Check if the controller is properly initialized with configuration
    pub fn is_initialized(&self) -> bool {
        !self.config.transcription.audio_language.is_empty()
    }

    /// Run the main workflow: transcribe the video, extract the report text,
    /// compare them, and write the comparison document.
    pub async fn run(
        &self,
        video_path: PathBuf,
        report_path: Option<PathBuf>,
        output_dir: PathBuf,
        force_overwrite: bool,
    ) -> Result<()> {
        let multi_progress = MultiProgress::new();
        self.run_with_progress(video_path, report_path, output_dir, &multi_progress, force_overwrite).await
    }

    /// Run the controller with progress reporting
    async fn run_with_progress(
        &self,
        video_path: PathBuf,
        report_path: Option<PathBuf>,
        output_dir: PathBuf,
        multi_progress: &MultiProgress,
        force_overwrite: bool,
    ) -> Result<()> {
        // Start timing the process
        let start_time = std::time::Instant::now();

        if !video_path.exists() {
            return Err(anyhow::anyhow!("Input file does not exist: {:?}", video_path));
        }

        // Ensure the output directory exists
        FileManager::ensure_dir(&output_dir)?;

        // Check if a comparison document already exists
        let extension = self.config.output.format.extension();
        let output_path = FileManager::generate_output_path(&video_path, &output_dir, "comparison", extension);
        if output_path.exists() && !force_overwrite {
            warn!("Skipping file, comparison already exists (use -f to force overwrite)");
            return Ok(());
        }

        // Resolve the report document next to the video when none was given
        let report_path = match report_path {
            Some(path) => Some(path),
            None => {
                let found = FileManager::find_report_for_video(&video_path);
                match &found {
                    Some(path) => info!("Found report next to video: {:?}", path),
                    None => warn!("No report file given or found; every statement will be unmatched"),
                }
                found
            }
        };

        // Stages 1 and 2 are independent, so the transcription and the report
        // extraction run concurrently
        let transcribe_spinner = Self::add_stage_spinner(multi_progress, "Transcribing video");
        let extract_spinner = Self::add_stage_spinner(multi_progress, "Extracting report");

        let transcript_future = self.obtain_transcript(&video_path);
        let report_future = async {
            match &report_path {
                Some(path) => report_extractor::extract_report(path).await
                    .with_context(|| format!("Failed to extract report text from {:?}", path)),
                // Vacuous comparison: empty report text, everything unmatched
                None => Ok(ReportDocument::from_text(String::new())),
            }
        };

        let (transcript, report) = future::try_join(transcript_future, report_future).await?;
        transcribe_spinner.finish_and_clear();
        extract_spinner.finish_and_clear();
        info!("Transcription complete ({} statements)", transcript.lines().len());
        if report_path.is_some() {
            info!("Report extraction complete ({} format)", report.format);
        }

        // Stage 3: compare
        let result = compare_texts(&transcript.text, &report.text, self.config.comparison.policy);
        Self::log_comparison_summary(&result);

        // Stage 4: write the comparison document
        let comparison_report = ComparisonReport::new(
            video_path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default(),
            report_path
                .as_ref()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "(none)".to_string()),
            self.config.comparison.policy,
            transcript.text.clone(),
            report.text.clone(),
            result,
        );
        ReportWriter::write(&comparison_report, &output_path, self.config.output.format)?;

        info!(
            "Success: {:?} ({:.1}s total)",
            output_path,
            start_time.elapsed().as_secs_f64()
        );

        Ok(())
    }

    /// Compare two already-textual inputs without transcription.
    ///
    /// The transcript side must be a plain text file; the report side may be
    /// any supported report format.
    pub async fn run_compare_only(
        &self,
        transcript_path: PathBuf,
        report_path: PathBuf,
        output_dir: PathBuf,
        force_overwrite: bool,
    ) -> Result<()> {
        let transcript = TranscriptCollection::from_file(&transcript_path)?;
        let report = report_extractor::extract_report(&report_path).await
            .with_context(|| format!("Failed to extract report text from {:?}", report_path))?;

        FileManager::ensure_dir(&output_dir)?;

        let extension = self.config.output.format.extension();
        let output_path = FileManager::generate_output_path(&transcript_path, &output_dir, "comparison", extension);
        if output_path.exists() && !force_overwrite {
            warn!("Skipping file, comparison already exists (use -f to force overwrite)");
            return Ok(());
        }

        let result = compare_texts(&transcript.text, &report.text, self.config.comparison.policy);
        Self::log_comparison_summary(&result);

        let comparison_report = ComparisonReport::new(
            transcript_path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default(),
            report_path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default(),
            self.config.comparison.policy,
            transcript.text.clone(),
            report.text.clone(),
            result,
        );
        ReportWriter::write(&comparison_report, &output_path, self.config.output.format)?;

        info!("Success: {:?}", output_path);

        Ok(())
    }

    /// Produce a transcript for the input, transcribing only when needed
    async fn obtain_transcript(&self, input_path: &Path) -> Result<TranscriptCollection> {
        let file_type = FileManager::detect_file_type(input_path)?;

        match file_type {
            // A text input is already a transcript; skip transcription entirely
            FileType::Text => {
                info!("Detected text input, skipping transcription");
                TranscriptCollection::from_file(input_path)
            },
            FileType::Video => {
                debug!(
                    "Transcribing with provider '{}'",
                    self.transcription_service.provider_label()
                );
                self.transcription_service
                    .transcribe_video(input_path)
                    .await
                    .map_err(|e| anyhow::anyhow!("Transcription failed: {}", e))
            },
            other => Err(anyhow::anyhow!(
                "Input file is not a video or transcript text file (detected {:?}): {:?}",
                other, input_path
            )),
        }
    }

    /// Log the matched/unmatched counts for the finished comparison
    fn log_comparison_summary(result: &ComparisonResult) {
        if result.total() == 0 {
            warn!("Transcript contained no non-blank statements to compare");
            return;
        }

        info!(
            "Matched {} of {} statements ({:.0}%)",
            result.matched.len(),
            result.total(),
            result.match_ratio() * 100.0
        );
    }

    /// Add a stage spinner to the progress display
    fn add_stage_spinner(multi_progress: &MultiProgress, message: &str) -> ProgressBar {
        let spinner = multi_progress.add(ProgressBar::new_spinner());
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        spinner.set_style(style);
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(std::time::Duration::from_millis(100));
        spinner
    }
}
