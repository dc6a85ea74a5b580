/*!
 * Rendering of comparison results into downloadable documents.
 *
 * Every format carries the same three sections: the full transcript, the full
 * report text, and the matched/unmatched line lists, preceded by a summary
 * header with the generation time and source file names.
 */

use std::fs::File;
use std::io::Write as IoWrite;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use log::debug;
use serde::{Deserialize, Serialize};
use zip::write::{FileOptions, ZipWriter};

use crate::comparison::{ComparisonResult, MatchPolicy};

/// Format of the generated comparison document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Word document (the original deliverable of the web app)
    #[default]
    Docx,
    /// Markdown
    Markdown,
    /// Machine-readable JSON
    Json,
    /// Plain text
    Text,
}

impl OutputFormat {
    /// File extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Docx => "docx",
            Self::Markdown => "md",
            Self::Json => "json",
            Self::Text => "txt",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Docx => "docx",
            Self::Markdown => "markdown",
            Self::Json => "json",
            Self::Text => "text",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "docx" => Ok(Self::Docx),
            "markdown" | "md" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            "text" | "txt" => Ok(Self::Text),
            _ => Err(anyhow::anyhow!("Invalid output format: {}", s)),
        }
    }
}

/// Everything that goes into the rendered comparison document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonReport {
    /// Human-readable generation timestamp
    pub generated_at: String,
    /// Name of the transcript source (video or text file)
    pub transcript_source: String,
    /// Name of the report source
    pub report_source: String,
    /// Policy the comparison ran with
    pub policy: MatchPolicy,
    /// Full transcript text
    pub transcript_text: String,
    /// Full report text
    pub report_text: String,
    /// Matched/unmatched line lists
    pub result: ComparisonResult,
}

impl ComparisonReport {
    /// Assemble a report from the pipeline outputs, stamped with the current time
    pub fn new(
        transcript_source: impl Into<String>,
        report_source: impl Into<String>,
        policy: MatchPolicy,
        transcript_text: impl Into<String>,
        report_text: impl Into<String>,
        result: ComparisonResult,
    ) -> Self {
        Self {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            transcript_source: transcript_source.into(),
            report_source: report_source.into(),
            policy,
            transcript_text: transcript_text.into(),
            report_text: report_text.into(),
            result,
        }
    }
}

// @struct: Comparison document writer
pub struct ReportWriter;

impl ReportWriter {
    /// Write a comparison report to a file in the requested format
    pub fn write<P: AsRef<Path>>(report: &ComparisonReport, path: P, format: OutputFormat) -> Result<()> {
        let path = path.as_ref();

        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
        }

        debug!("Writing {} comparison report to {:?}", format, path);

        match format {
            OutputFormat::Docx => Self::write_docx(report, path),
            OutputFormat::Markdown => {
                let content = Self::render_markdown(report);
                std::fs::write(path, content)
                    .with_context(|| format!("Failed to write report: {}", path.display()))
            },
            OutputFormat::Json => {
                let content = serde_json::to_string_pretty(report)
                    .context("Failed to serialize comparison report to JSON")?;
                std::fs::write(path, content)
                    .with_context(|| format!("Failed to write report: {}", path.display()))
            },
            OutputFormat::Text => {
                let content = Self::render_text(report);
                std::fs::write(path, content)
                    .with_context(|| format!("Failed to write report: {}", path.display()))
            },
        }
    }

    /// Render the plain text form of the report
    pub fn render_text(report: &ComparisonReport) -> String {
        let mut out = String::new();

        out.push_str("CASE COMPARISON REPORT\n");
        out.push_str(&format!("Generated: {}\n", report.generated_at));
        out.push_str(&format!("Transcript source: {}\n", report.transcript_source));
        out.push_str(&format!("Report source: {}\n", report.report_source));
        out.push_str(&format!("Match policy: {}\n", report.policy));
        out.push_str(&format!(
            "Matched {} of {} statements\n\n",
            report.result.matched.len(),
            report.result.total()
        ));

        out.push_str("== MATCHED STATEMENTS ==\n");
        if report.result.matched.is_empty() {
            out.push_str("No matches found.\n");
        } else {
            for line in &report.result.matched {
                out.push_str(line);
                out.push('\n');
            }
        }

        out.push_str("\n== UNMATCHED STATEMENTS ==\n");
        if report.result.unmatched.is_empty() {
            out.push_str("Everything matched.\n");
        } else {
            for line in &report.result.unmatched {
                out.push_str(line);
                out.push('\n');
            }
        }

        out.push_str("\n== FULL TRANSCRIPT ==\n");
        out.push_str(report.transcript_text.trim_end());
        out.push_str("\n\n== FULL REPORT TEXT ==\n");
        out.push_str(report.report_text.trim_end());
        out.push('\n');

        out
    }

    /// Render the Markdown form of the report
    pub fn render_markdown(report: &ComparisonReport) -> String {
        let mut out = String::new();

        out.push_str("# Case Comparison Report\n\n");
        out.push_str(&format!("- Generated: {}\n", report.generated_at));
        out.push_str(&format!("- Transcript source: `{}`\n", report.transcript_source));
        out.push_str(&format!("- Report source: `{}`\n", report.report_source));
        out.push_str(&format!("- Match policy: `{}`\n", report.policy));
        out.push_str(&format!(
            "- Matched **{}** of **{}** statements\n\n",
            report.result.matched.len(),
            report.result.total()
        ));

        out.push_str("## Matched Statements\n\n");
        if report.result.matched.is_empty() {
            out.push_str("No matches found.\n");
        } else {
            for line in &report.result.matched {
                out.push_str(&format!("- {}\n", line));
            }
        }

        out.push_str("\n## Unmatched Statements\n\n");
        if report.result.unmatched.is_empty() {
            out.push_str("Everything matched.\n");
        } else {
            for line in &report.result.unmatched {
                out.push_str(&format!("- {}\n", line));
            }
        }

        out.push_str("\n## Full Transcript\n\n```\n");
        out.push_str(report.transcript_text.trim_end());
        out.push_str("\n```\n\n## Full Report Text\n\n```\n");
        out.push_str(report.report_text.trim_end());
        out.push_str("\n```\n");

        out
    }

    /// Write the DOCX form of the report.
    ///
    /// A DOCX file is a zip container; the minimal set of parts is the content
    /// types manifest, the package relationships, and the document body.
    fn write_docx(report: &ComparisonReport, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create report file: {}", path.display()))?;
        let mut zip = ZipWriter::new(file);

        zip.start_file::<_, ()>("[Content_Types].xml", FileOptions::default())?;
        zip.write_all(CONTENT_TYPES_XML.as_bytes())?;

        zip.start_file::<_, ()>("_rels/.rels", FileOptions::default())?;
        zip.write_all(RELS_XML.as_bytes())?;

        zip.start_file::<_, ()>("word/document.xml", FileOptions::default())?;
        zip.write_all(Self::render_document_xml(report).as_bytes())?;

        zip.finish().context("Failed to finalize DOCX archive")?;
        Ok(())
    }

    /// Render the WordprocessingML document body
    fn render_document_xml(report: &ComparisonReport) -> String {
        let mut body = String::new();

        push_heading(&mut body, "Case Comparison Report");
        push_paragraph(&mut body, &format!("Generated: {}", report.generated_at));
        push_paragraph(&mut body, &format!("Transcript source: {}", report.transcript_source));
        push_paragraph(&mut body, &format!("Report source: {}", report.report_source));
        push_paragraph(&mut body, &format!("Match policy: {}", report.policy));
        push_paragraph(&mut body, &format!(
            "Matched {} of {} statements",
            report.result.matched.len(),
            report.result.total()
        ));

        push_heading(&mut body, "Matched Statements");
        if report.result.matched.is_empty() {
            push_paragraph(&mut body, "No matches found.");
        } else {
            for line in &report.result.matched {
                push_paragraph(&mut body, line);
            }
        }

        push_heading(&mut body, "Unmatched Statements");
        if report.result.unmatched.is_empty() {
            push_paragraph(&mut body, "Everything matched.");
        } else {
            for line in &report.result.unmatched {
                push_paragraph(&mut body, line);
            }
        }

        push_heading(&mut body, "Full Transcript");
        for line in report.transcript_text.lines() {
            push_paragraph(&mut body, line);
        }

        push_heading(&mut body, "Full Report Text");
        for line in report.report_text.lines() {
            push_paragraph(&mut body, line);
        }

        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
             <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
             <w:body>{}</w:body></w:document>",
            body
        )
    }
}

/// Escape the five XML special characters
fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn push_paragraph(body: &mut String, text: &str) {
    // xml:space="preserve" keeps leading/trailing whitespace in statements
    body.push_str(&format!(
        "<w:p><w:r><w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>",
        escape_xml(text)
    ));
}

fn push_heading(body: &mut String, text: &str) {
    body.push_str(&format!(
        "<w:p><w:pPr><w:pStyle w:val=\"Heading1\"/></w:pPr>\
         <w:r><w:rPr><w:b/></w:rPr><w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>",
        escape_xml(text)
    ));
}

const CONTENT_TYPES_XML: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\
<Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>\
<Default Extension=\"xml\" ContentType=\"application/xml\"/>\
<Override PartName=\"/word/document.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml\"/>\
</Types>";

const RELS_XML: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
<Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument\" Target=\"word/document.xml\"/>\
</Relationships>";
