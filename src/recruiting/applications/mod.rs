//! Application intake, lifecycle state machine, and assessment gating.

pub mod domain;
pub mod memory;
pub mod repository;
pub mod rounds;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    AntiCheatEvent, AntiCheatEventKind, AntiCheatTelemetry, Application, ApplicationId,
    ApplicationStatus, HrId, JobId, JobPosting, JobStatus, PersonalInfo, QuestionKind,
    Round1Config, Round2Config, RoundConfig, RoundStatus, RoundSummary, Severity, StudentId,
    SubmittedAnswer, TestQuestion, TestRound, TestRoundId, TimelineEntry,
};
pub use memory::{MemoryApplications, MemoryJobs, MemoryProfiles, MemoryTestRounds};
pub use repository::{
    ApplicationRepository, JobDirectory, ProfileStore, RepositoryError, TestRoundRepository,
};
pub use rounds::{AssignedRound, TestRoundGate};
pub use router::{recruiting_router, RecruitingState};
pub use service::{ApplicationLifecycle, LifecycleError, ResumeUploadOutcome};
