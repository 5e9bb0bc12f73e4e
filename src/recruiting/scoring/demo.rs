use super::{advisory_flags, skill_overlap, FitScore, FitScorer, JobRequirements, ScoringContext};
use crate::config::MatchingConfig;

/// Demo/fixture scorer: scores are a deterministic hash of the
/// (student, job) pairing, clamped into configured bounds so seeded data
/// always lands in a presentable range. Never used on production paths.
pub struct DemoFitScorer {
    floor: u8,
    ceiling: u8,
}

impl DemoFitScorer {
    pub fn new(floor: u8, ceiling: u8) -> Self {
        let ceiling = ceiling.min(100);
        let floor = floor.min(ceiling);
        Self { floor, ceiling }
    }

    pub fn from_config(config: &MatchingConfig) -> Self {
        Self::new(config.demo_score_floor, config.demo_score_ceiling)
    }

    fn bounded(&self, hash: u64) -> u8 {
        let span = u64::from(self.ceiling - self.floor) + 1;
        self.floor + (hash % span) as u8
    }
}

impl FitScorer for DemoFitScorer {
    fn score(&self, cx: &ScoringContext<'_>, job: &JobRequirements) -> FitScore {
        let hash = fnv1a(&format!("{}::{}", cx.student_id, cx.job_id));

        // Explanation stays honestly derived even for demo scores.
        let (matched, missing) = skill_overlap(&cx.signal.skills, job.skills.as_slice());

        FitScore {
            fit_score: self.bounded(hash),
            skill_match: self.bounded(hash.rotate_right(16)),
            keyword_match: self.bounded(hash.rotate_right(32)),
            overall_rank: 0,
            matched_skills: matched,
            missing_skills: missing,
            flags: advisory_flags(cx.signal),
        }
    }
}

fn fnv1a(input: &str) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    input.bytes().fold(OFFSET, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(PRIME)
    })
}
