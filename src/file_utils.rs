use anyhow::{Result, Context};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use std::process::Command;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    // @generates: Output path for the comparison document
    // @params: input_file, output_dir, suffix, extension
    pub fn generate_output_path<P1: AsRef<Path>, P2: AsRef<Path>>(
        input_file: P1,
        output_dir: P2,
        suffix: &str,
        extension: &str,
    ) -> PathBuf {
        let input_file = input_file.as_ref();
        let output_dir = output_dir.as_ref();

        // Get the file stem (filename without extension)
        let stem = input_file.file_stem().unwrap_or_default();

        // Create the output filename with suffix and extension
        let mut output_filename = stem.to_string_lossy().to_string();
        output_filename.push('.');
        output_filename.push_str(suffix);
        output_filename.push('.');
        output_filename.push_str(extension);

        // Join with the output directory
        output_dir.join(output_filename)
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Classify an input file as video, report document, or plain transcript text
    pub fn detect_file_type<P: AsRef<Path>>(path: P) -> Result<FileType> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(anyhow::anyhow!("File does not exist: {:?}", path));
        }

        // Check file extension
        if let Some(ext) = path.extension() {
            let ext_str = ext.to_string_lossy().to_lowercase();

            match ext_str.as_str() {
                "pdf" => return Ok(FileType::ReportPdf),
                "docx" => return Ok(FileType::ReportDocx),
                "txt" | "srt" | "text" => return Ok(FileType::Text),
                _ => {}
            }

            // Common video file extensions supported by ffmpeg
            // This list is not exhaustive but covers the most common formats
            let video_extensions = [
                "mp4", "mkv", "avi", "mov", "wmv", "flv", "webm", "m4v",
                "mpg", "mpeg", "ogv", "ts", "mts", "m2ts"
            ];

            if video_extensions.contains(&ext_str.as_str()) {
                return Ok(FileType::Video);
            }
        }

        // If extension check doesn't work, try to examine the file with ffprobe
        let output = Command::new("ffprobe")
            .arg("-v")
            .arg("error")
            .arg("-show_entries")
            .arg("format=format_name")
            .arg("-of")
            .arg("default=noprint_wrappers=1:nokey=1")
            .arg(path)
            .output();

        if let Ok(output) = output {
            if output.status.success() {
                let format = String::from_utf8_lossy(&output.stdout).trim().to_lowercase();

                if !format.is_empty() {
                    return Ok(FileType::Video);
                }
            }
        }

        // Default to unknown if we couldn't determine the type
        Ok(FileType::Unknown)
    }

    /// Find a report file next to a video, sharing the video's file stem.
    ///
    /// Searches the video's directory (non-recursively first, then one level
    /// down) for `<stem>.pdf`, `<stem>.docx` or `<stem>.txt`.
    pub fn find_report_for_video<P: AsRef<Path>>(video_path: P) -> Option<PathBuf> {
        let video_path = video_path.as_ref();
        let stem = video_path.file_stem()?.to_string_lossy().to_lowercase();
        let dir = video_path.parent()?;

        let report_extensions = ["pdf", "docx", "txt"];

        for entry in WalkDir::new(dir).max_depth(2).into_iter().filter_map(|e| e.ok()) {
            let path = entry.path();
            if !path.is_file() || path == video_path {
                continue;
            }

            let candidate_stem = match path.file_stem() {
                Some(s) => s.to_string_lossy().to_lowercase(),
                None => continue,
            };
            if candidate_stem != stem {
                continue;
            }

            if let Some(ext) = path.extension() {
                let ext_str = ext.to_string_lossy().to_lowercase();
                if report_extensions.contains(&ext_str.as_str()) {
                    return Some(path.to_path_buf());
                }
            }
        }

        None
    }
}

/// Enum representing different input file types
#[derive(Debug, PartialEq, Eq)]
pub enum FileType {
    /// Video file supported by ffmpeg
    Video,
    /// PDF report document
    ReportPdf,
    /// DOCX report document
    ReportDocx,
    /// Plain text (transcript or typed report)
    Text,
    /// Unknown file type
    Unknown,
}
