//! Candidate/job fit scoring.
//!
//! Scoring is a strategy trait so the backend can be swapped at startup via
//! configuration: the weighted skill/keyword blend is the production
//! scorer, and a deterministic hash generator exists for demos and seeded
//! fixtures. The two are never mixed in one code path.

mod demo;
mod keywords;
mod weighted;

pub use demo::DemoFitScorer;
pub use weighted::WeightedFitScorer;

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::{MatchingConfig, ScorerKind};
use crate::recruiting::resume::CandidateSignal;

/// The scorer-facing slice of a job posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRequirements {
    /// Required skills, insertion order preserved for display. Matching is
    /// order-independent and case-insensitive.
    pub skills: Vec<String>,
    pub description_text: String,
}

/// Everything a scorer may draw on for one candidate/job pairing.
#[derive(Debug, Clone, Copy)]
pub struct ScoringContext<'a> {
    pub student_id: &'a str,
    pub job_id: &'a str,
    pub signal: &'a CandidateSignal,
    /// Extracted resume text when a stored resume carries it; scorers fall
    /// back to reconstructing evidence from the signal otherwise.
    pub resume_text: Option<&'a str>,
}

/// Advisory quality flags surfaced alongside a score. Never block flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreFlag {
    MissingEmail,
    NoSkillsDetected,
}

impl ScoreFlag {
    pub const fn label(self) -> &'static str {
        match self {
            ScoreFlag::MissingEmail => "Missing Email",
            ScoreFlag::NoSkillsDetected => "No Skills Detected",
        }
    }
}

/// Composite fit score embedded into an application at apply time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitScore {
    pub fit_score: u8,
    pub skill_match: u8,
    pub keyword_match: u8,
    /// Reserved for an external ranking pass; never computed here.
    pub overall_rank: u32,
    /// Job skills found in the candidate's skill set, lower-cased.
    pub matched_skills: Vec<String>,
    /// Job skills absent from the candidate's skill set, lower-cased.
    pub missing_skills: Vec<String>,
    pub flags: Vec<ScoreFlag>,
}

/// Pluggable fit scorer. Implementations must be pure and deterministic
/// for identical inputs.
pub trait FitScorer: Send + Sync {
    fn score(&self, cx: &ScoringContext<'_>, job: &JobRequirements) -> FitScore;
}

/// Build the configured scorer.
pub fn scorer_from_config(config: &MatchingConfig) -> Arc<dyn FitScorer> {
    match config.scorer {
        ScorerKind::Weighted => Arc::new(WeightedFitScorer),
        ScorerKind::Demo => Arc::new(DemoFitScorer::from_config(config)),
    }
}

/// Lower-cased set comparison shared by both scorers: which job skills the
/// candidate covers and which are missing. Purely derived, no randomness.
pub(crate) fn skill_overlap(
    candidate_skills: &[String],
    job_skills: &[String],
) -> (Vec<String>, Vec<String>) {
    let candidate: Vec<String> = candidate_skills.iter().map(|s| s.to_lowercase()).collect();
    let mut matched = Vec::new();
    let mut missing = Vec::new();
    let mut seen = Vec::new();
    for skill in job_skills {
        let lowered = skill.to_lowercase();
        if seen.contains(&lowered) {
            continue;
        }
        seen.push(lowered.clone());
        if candidate.contains(&lowered) {
            matched.push(lowered);
        } else {
            missing.push(lowered);
        }
    }
    (matched, missing)
}

pub(crate) fn advisory_flags(signal: &CandidateSignal) -> Vec<ScoreFlag> {
    let mut flags = Vec::new();
    if signal.email.is_none() {
        flags.push(ScoreFlag::MissingEmail);
    }
    if signal.skills.is_empty() {
        flags.push(ScoreFlag::NoSkillsDetected);
    }
    flags
}
