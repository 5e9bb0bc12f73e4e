use super::domain::{Application, ApplicationId, JobId, JobPosting, StudentId, TestRound, TestRoundId};
use crate::recruiting::resume::StoredResume;

/// Error enumeration for storage failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Storage abstraction over applications. The backing document store is
/// expected to update one application document atomically as a whole; the
/// non-withdrawn uniqueness per (student, job) is ultimately enforced here.
pub trait ApplicationRepository: Send + Sync {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError>;
    fn update(&self, application: Application) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError>;
    fn delete(&self, id: &ApplicationId) -> Result<(), RepositoryError>;
    /// The non-withdrawn application for a (student, job) pair, if any.
    fn find_active(
        &self,
        student: &StudentId,
        job: &JobId,
    ) -> Result<Option<Application>, RepositoryError>;
    fn for_student(&self, student: &StudentId) -> Result<Vec<Application>, RepositoryError>;
    fn for_job(&self, job: &JobId) -> Result<Vec<Application>, RepositoryError>;
}

/// Read access to job postings. Postings are returned regardless of their
/// publication status; visibility filtering belongs to the routing layer.
pub trait JobDirectory: Send + Sync {
    fn find(&self, id: &JobId) -> Result<Option<JobPosting>, RepositoryError>;
    fn all(&self) -> Result<Vec<JobPosting>, RepositoryError>;
}

/// Per-student resume profile storage.
pub trait ProfileStore: Send + Sync {
    fn resume(&self, student: &StudentId) -> Result<Option<StoredResume>, RepositoryError>;
    fn save_resume(
        &self,
        student: &StudentId,
        resume: StoredResume,
    ) -> Result<(), RepositoryError>;
}

/// Storage abstraction over assigned test rounds.
pub trait TestRoundRepository: Send + Sync {
    fn insert(&self, round: TestRound) -> Result<TestRound, RepositoryError>;
    fn update(&self, round: TestRound) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &TestRoundId) -> Result<Option<TestRound>, RepositoryError>;
}
