use super::keywords;
use super::{advisory_flags, skill_overlap, FitScore, FitScorer, JobRequirements, ScoringContext};

const SKILL_WEIGHT: f64 = 0.4;
const KEYWORD_WEIGHT: f64 = 0.6;

/// Canonical production scorer: a fixed-weight blend of declared-skill
/// overlap and description-keyword coverage.
pub struct WeightedFitScorer;

impl FitScorer for WeightedFitScorer {
    fn score(&self, cx: &ScoringContext<'_>, job: &JobRequirements) -> FitScore {
        let (matched, missing) = skill_overlap(&cx.signal.skills, job.skills.as_slice());

        let declared = matched.len() + missing.len();
        let skill_match = if declared == 0 {
            0
        } else {
            percentage(matched.len(), declared)
        };

        let keyword_match = keyword_coverage(cx, job);

        let fit_score = (f64::from(skill_match) * SKILL_WEIGHT
            + f64::from(keyword_match) * KEYWORD_WEIGHT)
            .round() as u8;

        FitScore {
            fit_score,
            skill_match,
            keyword_match,
            overall_rank: 0,
            matched_skills: matched,
            missing_skills: missing,
            flags: advisory_flags(cx.signal),
        }
    }
}

fn keyword_coverage(cx: &ScoringContext<'_>, job: &JobRequirements) -> u8 {
    let tokens = keywords::job_tokens(job);
    if tokens.is_empty() {
        return 0;
    }

    let evidence = keywords::evidence_text(cx.signal, cx.resume_text);
    let found = tokens
        .iter()
        .filter(|token| keywords::token_found(token, &evidence))
        .count();

    percentage(found, tokens.len()).min(100)
}

fn percentage(part: usize, whole: usize) -> u8 {
    ((part as f64 / whole as f64) * 100.0).round() as u8
}
