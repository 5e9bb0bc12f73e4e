//! Tokenization of job description text for keyword matching.

use once_cell::sync::Lazy;
use std::collections::HashSet;

use super::JobRequirements;
use crate::recruiting::resume::CandidateSignal;

/// Filler words common in job descriptions; all lower-case, length >= 4 so
/// they survive the length filter and must be removed explicitly.
static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "about", "ability", "applicants", "candidate", "candidates", "company", "every",
        "experience", "from", "have", "hiring", "ideal", "including", "join", "knowledge",
        "looking", "member", "must", "offer", "opportunity", "other", "please", "preferred",
        "required", "requirements", "responsibilities", "role", "should", "skills", "strong",
        "team", "that", "their", "them", "they", "this", "what", "will", "with", "work",
        "working", "years", "your",
    ]
    .into_iter()
    .collect()
});

/// Compound technical terms where a shorter stem in the evidence still
/// counts as a match (e.g. "node" covers "node.js").
static PARTIAL_TERM_STEMS: Lazy<Vec<(&'static str, &'static str)>> = Lazy::new(|| {
    vec![
        ("node.js", "node"),
        ("nodejs", "node"),
        ("react.js", "react"),
        ("reactjs", "react"),
        ("vue.js", "vue"),
        ("next.js", "next"),
        ("express.js", "express"),
    ]
});

const MIN_TOKEN_LEN: usize = 4;

/// Salient lower-cased tokens for a job: description words of length >= 4
/// with stop words removed, plus the declared skills folded in explicitly.
/// Order-preserving and deduplicated.
pub(crate) fn job_tokens(job: &JobRequirements) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();

    for raw in job.description_text.split_whitespace() {
        let cleaned = clean_token(raw);
        if cleaned.len() < MIN_TOKEN_LEN || STOP_WORDS.contains(cleaned.as_str()) {
            continue;
        }
        if !tokens.contains(&cleaned) {
            tokens.push(cleaned);
        }
    }

    for skill in &job.skills {
        let lowered = skill.trim().to_lowercase();
        if !lowered.is_empty() && !tokens.contains(&lowered) {
            tokens.push(lowered);
        }
    }

    tokens
}

/// Whether a job token is evidenced in the candidate text. Containment is
/// substring-based; curated compound terms also match on their stem.
pub(crate) fn token_found(token: &str, evidence_lower: &str) -> bool {
    if evidence_lower.contains(token) {
        return true;
    }
    PARTIAL_TERM_STEMS
        .iter()
        .any(|(term, stem)| *term == token && evidence_lower.contains(stem))
}

/// Candidate evidence text, lower-cased: the stored resume text when
/// available, otherwise a reconstruction from the known signal fields.
pub(crate) fn evidence_text(signal: &CandidateSignal, resume_text: Option<&str>) -> String {
    match resume_text {
        Some(text) => text.to_lowercase(),
        None => {
            let mut rebuilt = signal.skills.join(" ");
            rebuilt.push_str(&format!(" {} years experience", signal.experience_years));
            rebuilt.to_lowercase()
        }
    }
}

fn clean_token(raw: &str) -> String {
    raw.trim_matches(|c: char| !(c.is_alphanumeric() || c == '.' || c == '+' || c == '#' || c == '/'))
        .trim_end_matches('.')
        .to_lowercase()
}
