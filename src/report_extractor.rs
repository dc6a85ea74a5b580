/*!
 * Text extraction from police report documents.
 *
 * Supported sources: PDF (via the external `pdftotext` tool), DOCX (read as
 * a zip container), and plain text. Every failure maps onto the closed
 * `ExtractionError` taxonomy rather than a stringified catch-all.
 */

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use log::{debug, error};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tokio::process::Command;

use crate::errors::ExtractionError;

// @const: XML tag stripper for WordprocessingML content
static XML_TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<[^>]+>").unwrap()
});

// @const: Paragraph close tags become line breaks before tag stripping
static PARAGRAPH_END_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"</w:p>").unwrap()
});

/// Format of a report document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Pdf,
    Docx,
    Text,
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Text => "text",
        };
        write!(f, "{}", name)
    }
}

/// A report document with its extracted text
#[derive(Debug, Clone)]
pub struct ReportDocument {
    /// Source document path
    pub source_file: PathBuf,

    /// Detected document format
    pub format: ReportFormat,

    /// Extracted plain text
    pub text: String,
}

impl ReportDocument {
    /// Build a report directly from text (typed by a user rather than extracted)
    pub fn from_text(text: impl Into<String>) -> Self {
        ReportDocument {
            source_file: PathBuf::new(),
            format: ReportFormat::Text,
            text: text.into(),
        }
    }

    /// Whether any text was pulled out of the document
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Extract the text of a report document, dispatching on file extension
pub async fn extract_report<P: AsRef<Path>>(path: P) -> Result<ReportDocument, ExtractionError> {
    let path = path.as_ref();

    let extension = path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let format = match extension.as_str() {
        "pdf" => ReportFormat::Pdf,
        "docx" => ReportFormat::Docx,
        "txt" | "text" => ReportFormat::Text,
        other => return Err(ExtractionError::UnsupportedFormat(format!(
            "unrecognized report extension '.{}' for {:?}", other, path
        ))),
    };

    debug!("Extracting {} report: {:?}", format, path);

    let text = match format {
        ReportFormat::Pdf => extract_pdf_text(path).await?,
        ReportFormat::Docx => extract_docx_text(path)?,
        ReportFormat::Text => std::fs::read_to_string(path)?,
    };

    if text.trim().is_empty() {
        return Err(ExtractionError::ExtractionFailed(format!(
            "no text could be extracted from {:?}", path
        )));
    }

    Ok(ReportDocument {
        source_file: path.to_path_buf(),
        format,
        text,
    })
}

/// Extract PDF text by shelling out to `pdftotext`, writing to stdout
async fn extract_pdf_text(path: &Path) -> Result<String, ExtractionError> {
    if !path.exists() {
        return Err(ExtractionError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("report file not found: {:?}", path),
        )));
    }

    let pdftotext_future = Command::new("pdftotext")
        .args([
            "-layout",
            path.to_str().unwrap_or_default(),
            "-",                            // stdout
        ])
        .output();

    let timeout_duration = std::time::Duration::from_secs(60);
    let output = tokio::select! {
        result = pdftotext_future => {
            match result {
                Ok(output) => output,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    return Err(ExtractionError::ToolingMissing(
                        "pdftotext (install poppler-utils)".to_string(),
                    ));
                },
                Err(e) => {
                    return Err(ExtractionError::ExtractionFailed(format!(
                        "failed to execute pdftotext: {}", e
                    )));
                }
            }
        },
        _ = tokio::time::sleep(timeout_duration) => {
            return Err(ExtractionError::ExtractionFailed(
                "pdftotext timed out after 60 seconds".to_string(),
            ));
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        error!("pdftotext failed: {}", stderr.trim());
        return Err(ExtractionError::ExtractionFailed(format!(
            "pdftotext exited with {}: {}", output.status, stderr.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Extract DOCX text by reading `word/document.xml` out of the zip container
fn extract_docx_text(path: &Path) -> Result<String, ExtractionError> {
    let file = File::open(path)?;

    let mut archive = zip::ZipArchive::new(file).map_err(|e| {
        ExtractionError::ExtractionFailed(format!("not a valid DOCX archive: {}", e))
    })?;

    let mut document_xml = String::new();
    {
        let mut entry = archive.by_name("word/document.xml").map_err(|e| {
            ExtractionError::ExtractionFailed(format!(
                "DOCX is missing word/document.xml: {}", e
            ))
        })?;
        entry.read_to_string(&mut document_xml)?;
    }

    Ok(strip_wordprocessing_xml(&document_xml))
}

/// Convert WordprocessingML to plain text: paragraph boundaries become line
/// breaks, all other tags are dropped, basic XML entities are decoded.
pub(crate) fn strip_wordprocessing_xml(xml: &str) -> String {
    let with_breaks = PARAGRAPH_END_REGEX.replace_all(xml, "\n");
    let stripped = XML_TAG_REGEX.replace_all(&with_breaks, "");

    let decoded = stripped
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'");

    // Collapse the leading/trailing blank lines the XML skeleton leaves behind
    decoded
        .lines()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
