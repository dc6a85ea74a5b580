// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::too_many_arguments)]

use anyhow::{Result, anyhow, Context};
use log::{warn, info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use std::fs::File;
use std::io::BufReader;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::app_config::{Config, TranscriptionProvider};
use crate::comparison::MatchPolicy;
use crate::report_writer::OutputFormat;
use app_controller::Controller;

mod app_config;
mod app_controller;
mod comparison;
mod errors;
mod file_utils;
mod providers;
mod report_extractor;
mod report_writer;
mod transcript_processor;
mod transcription_service;

/// CLI Wrapper for TranscriptionProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranscriptionProvider {
    WhisperCli,
    OpenAI,
}

impl From<CliTranscriptionProvider> for TranscriptionProvider {
    fn from(cli_provider: CliTranscriptionProvider) -> Self {
        match cli_provider {
            CliTranscriptionProvider::WhisperCli => TranscriptionProvider::WhisperCli,
            CliTranscriptionProvider::OpenAI => TranscriptionProvider::OpenAI,
        }
    }
}

/// CLI Wrapper for MatchPolicy to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliMatchPolicy {
    Containment,
    ExactLine,
}

impl From<CliMatchPolicy> for MatchPolicy {
    fn from(cli_policy: CliMatchPolicy) -> Self {
        match cli_policy {
            CliMatchPolicy::Containment => MatchPolicy::Containment,
            CliMatchPolicy::ExactLine => MatchPolicy::ExactLine,
        }
    }
}

/// CLI Wrapper for OutputFormat to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliOutputFormat {
    Docx,
    Markdown,
    Json,
    Text,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(cli_format: CliOutputFormat) -> Self {
        match cli_format {
            CliOutputFormat::Docx => OutputFormat::Docx,
            CliOutputFormat::Markdown => OutputFormat::Markdown,
            CliOutputFormat::Json => OutputFormat::Json,
            CliOutputFormat::Text => OutputFormat::Text,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze a bodycam video against a police report (default command)
    Analyze(AnalyzeArgs),

    /// Compare an existing transcript text file against a report
    Compare {
        /// Transcript text file
        #[arg(value_name = "TRANSCRIPT")]
        transcript: PathBuf,

        /// Report file (PDF, DOCX or text)
        #[arg(value_name = "REPORT")]
        report: PathBuf,

        /// Output directory for the comparison document
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Force overwrite of existing output files
        #[arg(short, long)]
        force_overwrite: bool,

        /// Configuration file path
        #[arg(short, long, default_value = "conf.json")]
        config_path: String,
    },

    /// Extract the text of a report document without running a comparison
    ExtractReport {
        /// Report file (PDF, DOCX or text)
        #[arg(value_name = "REPORT")]
        report: PathBuf,

        /// Write extracted text here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate shell completions for corroborate
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct AnalyzeArgs {
    /// Bodycam video file (or transcript text file) to analyze
    #[arg(value_name = "VIDEO_PATH")]
    video_path: PathBuf,

    /// Police report file; when omitted, a report with the video's file stem
    /// is searched next to the video
    #[arg(short, long)]
    report: Option<PathBuf>,

    /// Output directory for the comparison document
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Transcription provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranscriptionProvider>,

    /// Model name (API model id, or model file for the local CLI)
    #[arg(short, long)]
    model: Option<String>,

    /// Match policy for the comparison
    #[arg(long, value_enum)]
    policy: Option<CliMatchPolicy>,

    /// Output format of the comparison document
    #[arg(long, value_enum)]
    format: Option<CliOutputFormat>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// corroborate - Bodycam Video + Police Report Comparator
///
/// Transcribes bodycam footage, extracts the text of the written report, and
/// produces a document listing which spoken statements the report corroborates.
#[derive(Parser, Debug)]
#[command(name = "corroborate")]
#[command(version = "0.1.0")]
#[command(about = "Bodycam transcript vs police report comparison tool")]
#[command(long_about = "corroborate extracts and transcribes the audio of a bodycam video, pulls the
text out of the written police report, and checks which spoken statements the
report corroborates.

EXAMPLES:
    corroborate stop.mp4                          # Report found next to video
    corroborate stop.mp4 -r report.pdf            # Explicit report file
    corroborate stop.mp4 --policy exact-line      # Strict line matching
    corroborate stop.mp4 --format markdown        # Markdown output
    corroborate -p openai -m whisper-1 stop.mp4   # Use the OpenAI provider
    corroborate compare transcript.txt report.docx
    corroborate extract-report report.pdf -o report.txt
    corroborate completions bash > corroborate.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.

SUPPORTED PROVIDERS:
    whisper-cli - Local whisper.cpp-style binary (default)
    openai      - OpenAI audio transcription API (requires API key)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Bodycam video file (or transcript text file) to analyze
    #[arg(value_name = "VIDEO_PATH")]
    video_path: Option<PathBuf>,

    /// Police report file
    #[arg(short, long)]
    report: Option<PathBuf>,

    /// Output directory for the comparison document
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Transcription provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranscriptionProvider>,

    /// Model name (API model id, or model file for the local CLI)
    #[arg(short, long)]
    model: Option<String>,

    /// Match policy for the comparison
    #[arg(long, value_enum)]
    policy: Option<CliMatchPolicy>,

    /// Output format of the comparison document
    #[arg(long, value_enum)]
    format: Option<CliOutputFormat>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color code for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let color = Self::get_color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
                color, now, record.level(), record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    // Handle subcommands
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "corroborate", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::ExtractReport { report, output }) => {
            run_extract_report(&report, output.as_deref()).await
        }
        Some(Commands::Compare { transcript, report, output_dir, force_overwrite, config_path }) => {
            let config = load_config(&config_path, None, None, None, None, None)?;
            let controller = Controller::with_config(config)?;
            controller.run_compare_only(transcript, report, output_dir, force_overwrite).await
        }
        Some(Commands::Analyze(args)) => {
            run_analyze(args).await
        }
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let video_path = cli.video_path.ok_or_else(|| {
                anyhow!("VIDEO_PATH is required when no subcommand is specified")
            })?;

            let analyze_args = AnalyzeArgs {
                video_path,
                report: cli.report,
                output_dir: cli.output_dir,
                force_overwrite: cli.force_overwrite,
                provider: cli.provider,
                model: cli.model,
                policy: cli.policy,
                format: cli.format,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };
            run_analyze(analyze_args).await
        }
    }
}

async fn run_analyze(options: AnalyzeArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level_filter_for(&config_log_level));
    }

    let config = load_config(
        &options.config_path,
        options.provider.clone(),
        options.model.clone(),
        options.policy.clone(),
        options.format.clone(),
        options.log_level.clone(),
    )?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        // Just update the max level without reinitializing the logger
        log::set_max_level(level_filter_for(&config.log_level));
    }

    // Create controller
    let controller = Controller::with_config(config)?;

    if !options.video_path.exists() {
        return Err(anyhow!("Input path does not exist: {:?}", options.video_path));
    }

    controller.run(
        options.video_path,
        options.report,
        options.output_dir,
        options.force_overwrite,
    ).await
}

/// Load the configuration file (creating a default one when missing) and
/// apply the CLI overrides
fn load_config(
    config_path: &str,
    provider: Option<CliTranscriptionProvider>,
    model: Option<String>,
    policy: Option<CliMatchPolicy>,
    format: Option<CliOutputFormat>,
    log_level: Option<CliLogLevel>,
) -> Result<Config> {
    let config = if Path::new(config_path).exists() {
        // Load existing configuration
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        let mut config: Config = serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?;

        // Override config with CLI options if provided
        if let Some(provider) = provider {
            config.transcription.provider = provider.into();
        }

        if let Some(model) = model {
            // Find the provider config and update the model
            let provider_str = config.transcription.provider.to_lowercase_string();
            if let Some(provider_config) = config.transcription.available_providers.iter_mut()
                .find(|p| p.provider_type == provider_str) {
                provider_config.model = model;
            }
        }

        if let Some(policy) = policy {
            config.comparison.policy = policy.into();
        }

        if let Some(format) = format {
            config.output.format = format.into();
        }

        if let Some(log_level) = log_level {
            config.log_level = log_level.into();
        }

        config
    } else {
        // Create default configuration if not exists
        warn!("Config file not found at '{}', creating default config.", config_path);

        let mut config = Config::default();

        if let Some(provider) = provider {
            config.transcription.provider = provider.into();
        }
        if let Some(model) = model {
            let provider_str = config.transcription.provider.to_lowercase_string();
            if let Some(provider_config) = config.transcription.available_providers.iter_mut()
                .find(|p| p.provider_type == provider_str) {
                provider_config.model = model;
            }
        }
        if let Some(policy) = policy {
            config.comparison.policy = policy.into();
        }
        if let Some(format) = format {
            config.output.format = format.into();
        }
        if let Some(log_level) = log_level {
            config.log_level = log_level.into();
        }

        // Save default config
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    // Validate the configuration after loading and overriding
    config.validate()
        .context("Configuration validation failed")?;

    Ok(config)
}

fn level_filter_for(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

// Helper function to implement report extraction mode
async fn run_extract_report(report_path: &Path, output: Option<&Path>) -> Result<()> {
    if !report_path.exists() {
        return Err(anyhow!("Report file does not exist: {:?}", report_path));
    }

    info!("Extracting report text from: {:?}", report_path);

    let document = report_extractor::extract_report(report_path).await
        .map_err(|e| anyhow!("Failed to extract report text: {}", e))?;

    match output {
        Some(path) => {
            file_utils::FileManager::write_to_file(path, &document.text)?;
            info!("Success: {:?}", path);
        },
        None => {
            println!("{}", document.text);
        },
    }

    Ok(())
}
