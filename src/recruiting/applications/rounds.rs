use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::domain::{
    AntiCheatEvent, Application, ApplicationId, ApplicationStatus, HrId, RoundStatus,
    RoundSummary, SubmittedAnswer, TestRound, TestRoundId,
};
use super::repository::{ApplicationRepository, JobDirectory, TestRoundRepository};
use super::service::LifecycleError;
use crate::config::MatchingConfig;

static TEST_ROUND_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_test_round_id() -> TestRoundId {
    let id = TEST_ROUND_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    TestRoundId(format!("round-{id:06}"))
}

/// A successful assignment: the created round plus the updated application.
#[derive(Debug, Clone)]
pub struct AssignedRound {
    pub round: TestRound,
    pub application: Application,
}

/// Policy gate in front of assessment rounds: score threshold, ownership,
/// and single-assignment; also the write path for anti-cheat telemetry.
pub struct TestRoundGate<R, J, T> {
    applications: Arc<R>,
    jobs: Arc<J>,
    rounds: Arc<T>,
    score_threshold: u8,
}

impl<R, J, T> TestRoundGate<R, J, T>
where
    R: ApplicationRepository + 'static,
    J: JobDirectory + 'static,
    T: TestRoundRepository + 'static,
{
    pub fn new(applications: Arc<R>, jobs: Arc<J>, rounds: Arc<T>, config: &MatchingConfig) -> Self {
        Self {
            applications,
            jobs,
            rounds,
            score_threshold: config.test_score_threshold,
        }
    }

    /// Assign a test round. The fit-score threshold is inclusive: a score
    /// equal to the threshold passes.
    pub fn assign_test(
        &self,
        hr: &HrId,
        application_id: &ApplicationId,
    ) -> Result<AssignedRound, LifecycleError> {
        let mut application = self
            .applications
            .fetch(application_id)?
            .ok_or(LifecycleError::NotFound("application"))?;

        let posting = self
            .jobs
            .find(&application.job)?
            .ok_or(LifecycleError::NotFound("job"))?;
        if posting.posted_by != *hr {
            return Err(LifecycleError::Forbidden);
        }

        if application.status.is_terminal() {
            return Err(LifecycleError::InvalidTransition {
                from: application.status.label(),
            });
        }

        let score = application.ai_score.fit_score;
        if score < self.score_threshold {
            return Err(LifecycleError::ScoreTooLow {
                score,
                threshold: self.score_threshold,
            });
        }

        if application
            .round1
            .as_ref()
            .is_some_and(|round| round.test_id.is_some())
        {
            return Err(LifecycleError::AlreadyAssigned);
        }

        let round = self
            .rounds
            .insert(TestRound::assigned(next_test_round_id(), application.id.clone()))?;

        application.status = ApplicationStatus::Round1;
        application.round1 = Some(RoundSummary::scheduled(round.id.clone()));
        application.record(
            "Round1",
            format!("Test assigned by HR. Match score: {score}%"),
        );
        self.applications.update(application.clone())?;

        info!(
            application = %application.id,
            test_round = %round.id,
            score,
            "test round assigned"
        );

        Ok(AssignedRound { round, application })
    }

    /// Record one proctoring event. Counters only ever increase; telemetry
    /// is advisory for HR review and never blocks submission.
    pub fn record_event(
        &self,
        test_id: &TestRoundId,
        event: AntiCheatEvent,
    ) -> Result<TestRound, LifecycleError> {
        let mut round = self
            .rounds
            .fetch(test_id)?
            .ok_or(LifecycleError::NotFound("test round"))?;

        round.anti_cheat.apply(&event);
        self.rounds.update(round.clone())?;
        Ok(round)
    }

    /// Accept a submission: stamp the time, store the answers and the
    /// provided anti-cheat log verbatim, and mark the embedded round
    /// summary completed. Grading happens in an external collaborator.
    pub fn submit(
        &self,
        test_id: &TestRoundId,
        answers: Vec<SubmittedAnswer>,
        anti_cheat_log: serde_json::Value,
    ) -> Result<TestRound, LifecycleError> {
        let mut round = self
            .rounds
            .fetch(test_id)?
            .ok_or(LifecycleError::NotFound("test round"))?;

        if round.submitted_at.is_some() {
            return Err(LifecycleError::InvalidTransition { from: "Completed" });
        }

        round.submitted_at = Some(Utc::now());
        round.answers = answers;
        round.anti_cheat_log = Some(anti_cheat_log);
        self.rounds.update(round.clone())?;

        if let Some(mut application) = self.applications.fetch(&round.application)? {
            if let Some(summary) = application.round1.as_mut() {
                if summary.test_id.as_ref() == Some(&round.id) {
                    summary.status = RoundStatus::Completed;
                }
            }
            application.record("Round1", "Test submitted for grading".to_string());
            self.applications.update(application)?;
        }

        Ok(round)
    }
}
