use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::domain::{
    Application, ApplicationId, ApplicationStatus, HrId, JobId, PersonalInfo, StudentId,
};
use super::repository::{ApplicationRepository, JobDirectory, ProfileStore, RepositoryError};
use crate::config::MatchingConfig;
use crate::recruiting::resume::{CandidateSignal, ResumeSignalExtractor, StoredResume};
use crate::recruiting::scoring::{FitScore, FitScorer, ScoringContext};

static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_application_id() -> ApplicationId {
    let id = APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicationId(format!("app-{id:06}"))
}

/// Typed failures surfaced to the HTTP layer. Nothing here is fatal to the
/// process; every error is scoped to one request.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("a non-withdrawn application already exists for this student and job")]
    DuplicateApplication,
    #[error("a resume must be uploaded before applying")]
    PreconditionFailed,
    #[error("resume is {size} bytes; accepted range is {min}..={max}")]
    ResumeSizeOutOfBounds { size: usize, min: usize, max: usize },
    #[error("requesting principal does not own this record")]
    Forbidden,
    #[error("invalid transition from {from}")]
    InvalidTransition { from: &'static str },
    #[error("fit score {score}% is below the assignment threshold of {threshold}%")]
    ScoreTooLow { score: u8, threshold: u8 },
    #[error("a test round is already assigned to this application")]
    AlreadyAssigned,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Result of a resume upload: the stored signal plus an optional match
/// preview against one job.
#[derive(Debug, Clone)]
pub struct ResumeUploadOutcome {
    pub signal: CandidateSignal,
    pub preview_score: Option<FitScore>,
}

/// Service composing resume intake, fit scoring, and the application state
/// machine over the storage traits.
pub struct ApplicationLifecycle<R, J, P> {
    applications: Arc<R>,
    jobs: Arc<J>,
    profiles: Arc<P>,
    scorer: Arc<dyn FitScorer>,
    extractor: ResumeSignalExtractor,
    resume_min_bytes: usize,
    resume_max_bytes: usize,
}

impl<R, J, P> ApplicationLifecycle<R, J, P>
where
    R: ApplicationRepository + 'static,
    J: JobDirectory + 'static,
    P: ProfileStore + 'static,
{
    pub fn new(
        applications: Arc<R>,
        jobs: Arc<J>,
        profiles: Arc<P>,
        scorer: Arc<dyn FitScorer>,
        config: &MatchingConfig,
    ) -> Self {
        Self {
            applications,
            jobs,
            profiles,
            scorer,
            extractor: ResumeSignalExtractor::from_config(config),
            resume_min_bytes: config.resume_min_bytes,
            resume_max_bytes: config.resume_max_bytes,
        }
    }

    /// Ingest an uploaded resume: size band, extraction, profile storage,
    /// optional match preview. Extraction degradation never fails the
    /// upload. Re-uploading replaces the stored signal but leaves scores
    /// already embedded in existing applications untouched.
    pub fn upload_resume(
        &self,
        student: &StudentId,
        bytes: &[u8],
        declared_mime: &str,
        file_name: &str,
        preview_job: Option<&JobId>,
    ) -> Result<ResumeUploadOutcome, LifecycleError> {
        if bytes.len() < self.resume_min_bytes || bytes.len() > self.resume_max_bytes {
            return Err(LifecycleError::ResumeSizeOutOfBounds {
                size: bytes.len(),
                min: self.resume_min_bytes,
                max: self.resume_max_bytes,
            });
        }

        let document = self.extractor.extract_document(bytes, declared_mime);
        let stored = StoredResume {
            file_name: file_name.to_string(),
            uploaded_at: Utc::now(),
            signal: document.signal.clone(),
            extracted_text: Some(document.text.clone()),
        };
        self.profiles.save_resume(student, stored)?;

        let preview_score = match preview_job {
            Some(job_id) => self.jobs.find(job_id)?.map(|posting| {
                self.scorer.score(
                    &ScoringContext {
                        student_id: &student.0,
                        job_id: &job_id.0,
                        signal: &document.signal,
                        resume_text: Some(&document.text),
                    },
                    &posting.requirements,
                )
            }),
            None => None,
        };

        info!(
            student = %student,
            skills = document.signal.skills.len(),
            degraded = document.degraded,
            "resume ingested"
        );

        Ok(ResumeUploadOutcome {
            signal: document.signal,
            preview_score,
        })
    }

    /// Submit an application. A stored resume is a precondition; the pair
    /// (student, job) may hold at most one non-withdrawn application.
    pub fn apply(
        &self,
        student: &StudentId,
        job: &JobId,
        personal_info: Option<PersonalInfo>,
    ) -> Result<Application, LifecycleError> {
        let resume = self
            .profiles
            .resume(student)?
            .ok_or(LifecycleError::PreconditionFailed)?;

        if self.applications.find_active(student, job)?.is_some() {
            return Err(LifecycleError::DuplicateApplication);
        }

        let posting = self
            .jobs
            .find(job)?
            .ok_or(LifecycleError::NotFound("job"))?;

        let score = self.scorer.score(
            &ScoringContext {
                student_id: &student.0,
                job_id: &job.0,
                signal: &resume.signal,
                resume_text: resume.extracted_text.as_deref(),
            },
            &posting.requirements,
        );

        let applicant_name = personal_info
            .as_ref()
            .map(|info| info.first_name.trim())
            .filter(|name| !name.is_empty())
            .unwrap_or("Student");

        let application = Application::submitted(
            next_application_id(),
            student.clone(),
            job.clone(),
            score,
            applicant_name,
        );

        // The storage uniqueness constraint backstops the check above under
        // concurrent identical requests.
        let stored = match self.applications.insert(application) {
            Ok(stored) => stored,
            Err(RepositoryError::Conflict) => return Err(LifecycleError::DuplicateApplication),
            Err(other) => return Err(other.into()),
        };

        info!(
            application = %stored.id,
            student = %student,
            job = %job,
            fit_score = stored.ai_score.fit_score,
            "application submitted"
        );
        Ok(stored)
    }

    /// Student-initiated exit. Allowed from any non-terminal status.
    pub fn withdraw(
        &self,
        student: &StudentId,
        application_id: &ApplicationId,
    ) -> Result<Application, LifecycleError> {
        let mut application = self
            .applications
            .fetch(application_id)?
            .ok_or(LifecycleError::NotFound("application"))?;

        if application.student != *student {
            return Err(LifecycleError::Forbidden);
        }
        if application.status.is_terminal() {
            return Err(LifecycleError::InvalidTransition {
                from: application.status.label(),
            });
        }

        application.status = ApplicationStatus::Withdrawn;
        application.record("Withdrawn", "Application withdrawn by student".to_string());
        self.applications.update(application.clone())?;
        Ok(application)
    }

    /// HR review decision: move an application forward in the pipeline.
    /// `Round1` is only reachable through the test-round gate and
    /// `Withdrawn` only through [`withdraw`].
    pub fn advance(
        &self,
        hr: &HrId,
        application_id: &ApplicationId,
        to: ApplicationStatus,
    ) -> Result<Application, LifecycleError> {
        let mut application = self
            .applications
            .fetch(application_id)?
            .ok_or(LifecycleError::NotFound("application"))?;

        self.authorize_hr(hr, &application.job)?;

        let reviewable = matches!(
            to,
            ApplicationStatus::Shortlisted
                | ApplicationStatus::Round2
                | ApplicationStatus::Rejected
                | ApplicationStatus::TalentPool
        );
        if !reviewable || !application.status.may_transition_to(to) {
            return Err(LifecycleError::InvalidTransition {
                from: application.status.label(),
            });
        }

        application.status = to;
        application.record(
            to.label(),
            format!("Status updated to {} by HR", to.label()),
        );
        self.applications.update(application.clone())?;
        Ok(application)
    }

    /// HR hard delete. Irreversible; the record disappears, so no timeline
    /// entry is written.
    pub fn delete(
        &self,
        hr: &HrId,
        application_id: &ApplicationId,
    ) -> Result<(), LifecycleError> {
        let application = self
            .applications
            .fetch(application_id)?
            .ok_or(LifecycleError::NotFound("application"))?;

        self.authorize_hr(hr, &application.job)?;

        self.applications.delete(application_id)?;
        info!(application = %application_id, hr = %hr, "application deleted");
        Ok(())
    }

    pub fn application(&self, id: &ApplicationId) -> Result<Application, LifecycleError> {
        self.applications
            .fetch(id)?
            .ok_or(LifecycleError::NotFound("application"))
    }

    pub fn applications_for_student(
        &self,
        student: &StudentId,
    ) -> Result<Vec<Application>, LifecycleError> {
        Ok(self.applications.for_student(student)?)
    }

    /// Candidates for one of the requesting HR's jobs, most recent first.
    pub fn candidates(
        &self,
        hr: &HrId,
        job: &JobId,
    ) -> Result<Vec<Application>, LifecycleError> {
        self.authorize_hr(hr, job)?;
        Ok(self.applications.for_job(job)?)
    }

    fn authorize_hr(&self, hr: &HrId, job: &JobId) -> Result<(), LifecycleError> {
        let posting = self
            .jobs
            .find(job)?
            .ok_or(LifecycleError::NotFound("job"))?;
        if posting.posted_by != *hr {
            return Err(LifecycleError::Forbidden);
        }
        Ok(())
    }
}
