use std::sync::Arc;

use crate::config::MatchingConfig;
use crate::recruiting::applications::domain::{
    Application, ApplicationStatus, HrId, JobId, JobPosting, JobStatus, RoundConfig, StudentId,
};
use crate::recruiting::applications::memory::{
    MemoryApplications, MemoryJobs, MemoryProfiles, MemoryTestRounds,
};
use crate::recruiting::applications::repository::ApplicationRepository;
use crate::recruiting::applications::rounds::TestRoundGate;
use crate::recruiting::applications::router::{recruiting_router, RecruitingState};
use crate::recruiting::applications::service::ApplicationLifecycle;
use crate::recruiting::scoring::{FitScore, JobRequirements, WeightedFitScorer};

pub(super) const ALICE_RESUME: &str = "Alice Johnson\nalice@example.com\n+1 415-555-0101\n\
    Senior engineer. I build web services with React and Node.js on AWS.";

pub(super) fn matching_config() -> MatchingConfig {
    // Permissive size band so plain-text fixtures pass intake.
    MatchingConfig {
        resume_min_bytes: 16,
        resume_max_bytes: 64 * 1024,
        ..MatchingConfig::default()
    }
}

pub(super) fn student() -> StudentId {
    StudentId("student-1".to_string())
}

pub(super) fn hr() -> HrId {
    HrId("hr-1".to_string())
}

pub(super) fn other_hr() -> HrId {
    HrId("hr-2".to_string())
}

pub(super) fn posting(job_id: &str, skills: &[&str], description: &str) -> JobPosting {
    JobPosting {
        id: JobId(job_id.to_string()),
        posted_by: hr(),
        title: "Full Stack Engineer".to_string(),
        requirements: JobRequirements {
            skills: skills.iter().map(|s| s.to_string()).collect(),
            description_text: description.to_string(),
        },
        round_config: RoundConfig::default(),
        status: JobStatus::Active,
    }
}

pub(super) struct Harness {
    pub lifecycle:
        ApplicationLifecycle<MemoryApplications, MemoryJobs, MemoryProfiles>,
    pub gate: TestRoundGate<MemoryApplications, MemoryJobs, MemoryTestRounds>,
    pub applications: Arc<MemoryApplications>,
    pub jobs: Arc<MemoryJobs>,
    pub profiles: Arc<MemoryProfiles>,
    pub rounds: Arc<MemoryTestRounds>,
}

pub(super) fn harness() -> Harness {
    let applications = Arc::new(MemoryApplications::default());
    let jobs = Arc::new(MemoryJobs::default());
    let profiles = Arc::new(MemoryProfiles::default());
    let rounds = Arc::new(MemoryTestRounds::default());
    let config = matching_config();

    let lifecycle = ApplicationLifecycle::new(
        applications.clone(),
        jobs.clone(),
        profiles.clone(),
        Arc::new(WeightedFitScorer),
        &config,
    );
    let gate = TestRoundGate::new(applications.clone(), jobs.clone(), rounds.clone(), &config);

    Harness {
        lifecycle,
        gate,
        applications,
        jobs,
        profiles,
        rounds,
    }
}

impl Harness {
    /// A job every skill of which Alice's resume covers, so the weighted
    /// scorer lands well above the assignment threshold.
    pub(super) fn seed_matching_job(&self, job_id: &str) {
        self.jobs.put(posting(
            job_id,
            &["React", "Node.js"],
            "Build React and Node.js services",
        ));
    }

    /// A job Alice's resume covers none of; the weighted scorer lands at 0.
    pub(super) fn seed_mismatched_job(&self, job_id: &str) {
        self.jobs.put(posting(
            job_id,
            &["Kubernetes", "Docker"],
            "Operate Kubernetes clusters alongside Docker tooling",
        ));
    }

    pub(super) fn upload_alice_resume(&self) {
        self.lifecycle
            .upload_resume(&student(), ALICE_RESUME.as_bytes(), "text/plain", "alice.txt", None)
            .expect("resume upload succeeds");
    }

    /// Apply after seeding resume and job; returns the stored application.
    pub(super) fn submitted_application(&self, job_id: &str) -> Application {
        self.seed_matching_job(job_id);
        self.upload_alice_resume();
        self.lifecycle
            .apply(&student(), &JobId(job_id.to_string()), None)
            .expect("application succeeds")
    }

    /// Insert an application directly with a crafted fit score; used for
    /// exact threshold boundaries the scoring pipeline cannot hit exactly.
    pub(super) fn inserted_with_score(&self, job_id: &str, fit_score: u8) -> Application {
        self.seed_matching_job(job_id);
        let application = Application::submitted(
            crate::recruiting::applications::domain::ApplicationId(format!(
                "fixture-{job_id}-{fit_score}"
            )),
            student(),
            JobId(job_id.to_string()),
            fixed_score(fit_score),
            "Alice",
        );
        self.applications
            .insert(application)
            .expect("fixture insert succeeds")
    }
}

pub(super) fn fixed_score(fit_score: u8) -> FitScore {
    FitScore {
        fit_score,
        skill_match: fit_score,
        keyword_match: fit_score,
        overall_rank: 0,
        matched_skills: vec!["react".to_string()],
        missing_skills: Vec::new(),
        flags: Vec::new(),
    }
}

pub(super) fn router_with_harness(harness: &Harness) -> axum::Router {
    let applications = harness.applications.clone();
    let jobs = harness.jobs.clone();
    let profiles = harness.profiles.clone();
    let rounds = harness.rounds.clone();
    let config = matching_config();

    let lifecycle = Arc::new(ApplicationLifecycle::new(
        applications.clone(),
        jobs.clone(),
        profiles,
        Arc::new(WeightedFitScorer),
        &config,
    ));
    let gate = Arc::new(TestRoundGate::new(applications, jobs.clone(), rounds, &config));

    recruiting_router(RecruitingState {
        lifecycle,
        gate,
        jobs,
    })
}

pub(super) fn rejected_application(harness: &Harness, job_id: &str) -> Application {
    let mut application = harness.submitted_application(job_id);
    application.status = ApplicationStatus::Rejected;
    harness
        .applications
        .update(application.clone())
        .expect("status update succeeds");
    application
}
