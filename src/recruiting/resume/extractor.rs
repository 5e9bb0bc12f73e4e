use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::vocabulary::SkillVocabulary;
use crate::config::MatchingConfig;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9._-]+@[A-Za-z0-9._-]+\.[A-Za-z0-9_-]+").unwrap());

// Loose phone shape: runs of digits with optional spaces, dashes, and a
// leading plus. Candidates are validated to carry at least ten digits.
static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\+?[\d][\d\s-]{8,}\d").unwrap());

/// Structured signal extracted from an uploaded resume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateSignal {
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Matched vocabulary skills, canonical casing, vocabulary order.
    pub skills: Vec<String>,
    pub experience_years: u8,
}

/// Profile record kept per student after an upload. The extracted text is
/// retained so scoring can use real resume evidence later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredResume {
    pub file_name: String,
    pub uploaded_at: DateTime<Utc>,
    pub signal: CandidateSignal,
    pub extracted_text: Option<String>,
}

/// Decoded resume content: the text, the derived signal, and whether the
/// declared format had to be bypassed.
#[derive(Debug, Clone)]
pub struct ExtractedResume {
    pub text: String,
    pub signal: CandidateSignal,
    pub degraded: bool,
}

/// Raised internally when the declared format could not be decoded. Never
/// fatal: extraction falls back to best-effort text and defaults.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionDegraded {
    #[error("text extraction failed for declared type '{declared}': {reason}")]
    Unreadable { declared: String, reason: String },
}

/// Turns raw resume bytes plus a declared mime type into a
/// [`CandidateSignal`]. Pure: no network or disk access.
#[derive(Debug, Clone)]
pub struct ResumeSignalExtractor {
    vocabulary: SkillVocabulary,
    baseline_experience_years: u8,
    senior_experience_years: u8,
    seniority_markers: Vec<String>,
}

impl ResumeSignalExtractor {
    pub fn new(
        vocabulary: SkillVocabulary,
        baseline_experience_years: u8,
        senior_experience_years: u8,
        seniority_markers: Vec<String>,
    ) -> Self {
        Self {
            vocabulary,
            baseline_experience_years,
            senior_experience_years,
            seniority_markers: seniority_markers
                .into_iter()
                .map(|marker| marker.to_lowercase())
                .collect(),
        }
    }

    pub fn from_config(config: &MatchingConfig) -> Self {
        Self::new(
            SkillVocabulary::new(config.skill_vocabulary.iter().cloned()),
            config.baseline_experience_years,
            config.senior_experience_years,
            config.seniority_markers.clone(),
        )
    }

    pub fn vocabulary(&self) -> &SkillVocabulary {
        &self.vocabulary
    }

    /// Extract a candidate signal. Decoding failures degrade to lossy text
    /// rather than failing the upload; very short input yields defaults.
    pub fn extract(&self, bytes: &[u8], declared_mime: &str) -> CandidateSignal {
        self.extract_document(bytes, declared_mime).signal
    }

    /// Like [`extract`], but also returns the decoded text (for storage as
    /// scoring evidence) and whether decoding degraded.
    pub fn extract_document(&self, bytes: &[u8], declared_mime: &str) -> ExtractedResume {
        let (text, degraded) = match self.decode_text(bytes, declared_mime) {
            Ok(text) => (text, false),
            Err(degraded) => {
                warn!(%degraded, "resume text extraction degraded, using raw bytes");
                (String::from_utf8_lossy(bytes).into_owned(), true)
            }
        };
        let signal = self.signal_from_text(&text);
        ExtractedResume {
            text,
            signal,
            degraded,
        }
    }

    /// Signal from already-decoded text; shared by [`extract`] and callers
    /// that hold plain text.
    pub fn signal_from_text(&self, text: &str) -> CandidateSignal {
        let lowered = text.to_lowercase();

        let email = EMAIL_RE.find(text).map(|m| m.as_str().to_string());
        let phone = PHONE_RE
            .find_iter(text)
            .map(|m| m.as_str().trim())
            .find(|candidate| candidate.chars().filter(char::is_ascii_digit).count() >= 10)
            .map(|candidate| candidate.to_string());

        let skills = self.vocabulary.matches_in(&lowered);

        let senior = self
            .seniority_markers
            .iter()
            .any(|marker| lowered.contains(marker));
        let experience_years = if senior {
            self.senior_experience_years
        } else {
            self.baseline_experience_years
        };

        CandidateSignal {
            email,
            phone,
            skills,
            experience_years,
        }
    }

    fn decode_text(&self, bytes: &[u8], declared_mime: &str) -> Result<String, ExtractionDegraded> {
        let declared: Option<mime::Mime> = declared_mime.parse().ok();
        let is_pdf = declared
            .as_ref()
            .map(|m| m.type_() == mime::APPLICATION && m.subtype() == mime::PDF)
            .unwrap_or(false);

        if is_pdf {
            return pdf_extract::extract_text_from_mem(bytes).map_err(|err| {
                ExtractionDegraded::Unreadable {
                    declared: declared_mime.to_string(),
                    reason: err.to_string(),
                }
            });
        }

        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}
