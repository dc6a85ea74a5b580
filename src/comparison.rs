/*!
 * Line-level corroboration between a spoken transcript and a written report.
 *
 * Classifies each non-blank transcript line as matched (corroborated by the
 * report text) or unmatched, preserving transcript order and duplicates.
 */

use serde::{Deserialize, Serialize};

/// Policy deciding when a transcript line counts as corroborated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum MatchPolicy {
    /// Line matches if it occurs as a contiguous substring of the report
    #[default]
    Containment,
    /// Line matches only if some report line is exactly equal to it
    ExactLine,
}

impl MatchPolicy {
    /// Lowercase identifier used in config files and CLI flags
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Containment => "containment",
            Self::ExactLine => "exact-line",
        }
    }
}

impl std::fmt::Display for MatchPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for MatchPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "containment" => Ok(Self::Containment),
            "exact-line" | "exact" => Ok(Self::ExactLine),
            _ => Err(anyhow::anyhow!("Invalid match policy: {}", s)),
        }
    }
}

/// Result of comparing a transcript against a report.
///
/// Both lists keep the original transcript order and multiplicity. A line
/// never appears in both lists, and blank lines appear in neither.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Transcript lines corroborated by the report
    pub matched: Vec<String>,
    /// Transcript lines with no corroboration in the report
    pub unmatched: Vec<String>,
}

impl ComparisonResult {
    /// Total number of classified lines
    pub fn total(&self) -> usize {
        self.matched.len() + self.unmatched.len()
    }

    /// Fraction of classified lines that matched (0.0 when nothing classified)
    pub fn match_ratio(&self) -> f64 {
        if self.total() == 0 {
            return 0.0;
        }
        self.matched.len() as f64 / self.total() as f64
    }
}

/// Compare a transcript against a report text.
///
/// The transcript is split into lines; each line is trimmed and lower-cased
/// before classification. Lines that are empty after trimming carry no signal
/// and are excluded from both outputs. Matching is case-insensitive only; no
/// punctuation or whitespace-run normalization is performed.
///
/// Pure function: no I/O, no side effects, identical inputs give identical
/// outputs.
pub fn compare_texts(transcript: &str, report: &str, policy: MatchPolicy) -> ComparisonResult {
    let report_block = report.to_lowercase();

    // Only built for the exact-line policy; the report is otherwise one block
    let report_lines: Vec<String> = match policy {
        MatchPolicy::ExactLine => report_block
            .lines()
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect(),
        MatchPolicy::Containment => Vec::new(),
    };

    let mut matched = Vec::new();
    let mut unmatched = Vec::new();

    for line in transcript.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let needle = trimmed.to_lowercase();

        let is_match = match policy {
            MatchPolicy::Containment => report_block.contains(&needle),
            MatchPolicy::ExactLine => report_lines.iter().any(|r| *r == needle),
        };

        if is_match {
            matched.push(trimmed.to_string());
        } else {
            unmatched.push(trimmed.to_string());
        }
    }

    ComparisonResult { matched, unmatched }
}
