//! In-memory repository implementations backing the bundled server and the
//! test suites. Real deployments substitute document-store adapters.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::domain::{
    Application, ApplicationId, ApplicationStatus, JobId, JobPosting, StudentId, TestRound,
    TestRoundId,
};
use super::repository::{
    ApplicationRepository, JobDirectory, ProfileStore, RepositoryError, TestRoundRepository,
};
use crate::recruiting::resume::StoredResume;

#[derive(Default, Clone)]
pub struct MemoryApplications {
    records: Arc<Mutex<HashMap<ApplicationId, Application>>>,
}

impl ApplicationRepository for MemoryApplications {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&application.id) {
            return Err(RepositoryError::Conflict);
        }
        // Models the compound uniqueness index on (student, job, non-withdrawn).
        let duplicate = guard.values().any(|existing| {
            existing.student == application.student
                && existing.job == application.job
                && existing.status != ApplicationStatus::Withdrawn
        });
        if duplicate {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(application.id.clone(), application.clone());
        Ok(application)
    }

    fn update(&self, application: Application) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if !guard.contains_key(&application.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(application.id.clone(), application);
        Ok(())
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn delete(&self, id: &ApplicationId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }

    fn find_active(
        &self,
        student: &StudentId,
        job: &JobId,
    ) -> Result<Option<Application>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .find(|application| {
                application.student == *student
                    && application.job == *job
                    && application.status != ApplicationStatus::Withdrawn
            })
            .cloned())
    }

    fn for_student(&self, student: &StudentId) -> Result<Vec<Application>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut applications: Vec<Application> = guard
            .values()
            .filter(|application| application.student == *student)
            .cloned()
            .collect();
        applications.sort_by(|a, b| b.applied_at.cmp(&a.applied_at));
        Ok(applications)
    }

    fn for_job(&self, job: &JobId) -> Result<Vec<Application>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut applications: Vec<Application> = guard
            .values()
            .filter(|application| application.job == *job)
            .cloned()
            .collect();
        applications.sort_by(|a, b| b.applied_at.cmp(&a.applied_at));
        Ok(applications)
    }
}

#[derive(Default, Clone)]
pub struct MemoryJobs {
    records: Arc<Mutex<HashMap<JobId, JobPosting>>>,
}

impl MemoryJobs {
    /// Seed a posting; used at startup and by tests.
    pub fn put(&self, posting: JobPosting) {
        self.records
            .lock()
            .expect("job directory mutex poisoned")
            .insert(posting.id.clone(), posting);
    }
}

impl JobDirectory for MemoryJobs {
    fn find(&self, id: &JobId) -> Result<Option<JobPosting>, RepositoryError> {
        let guard = self.records.lock().expect("job directory mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn all(&self) -> Result<Vec<JobPosting>, RepositoryError> {
        let guard = self.records.lock().expect("job directory mutex poisoned");
        let mut postings: Vec<JobPosting> = guard.values().cloned().collect();
        postings.sort_by(|a, b| a.id.0.cmp(&b.id.0));
        Ok(postings)
    }
}

#[derive(Default, Clone)]
pub struct MemoryProfiles {
    records: Arc<Mutex<HashMap<StudentId, StoredResume>>>,
}

impl ProfileStore for MemoryProfiles {
    fn resume(&self, student: &StudentId) -> Result<Option<StoredResume>, RepositoryError> {
        let guard = self.records.lock().expect("profile mutex poisoned");
        Ok(guard.get(student).cloned())
    }

    fn save_resume(
        &self,
        student: &StudentId,
        resume: StoredResume,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("profile mutex poisoned");
        guard.insert(student.clone(), resume);
        Ok(())
    }
}

#[derive(Default, Clone)]
pub struct MemoryTestRounds {
    records: Arc<Mutex<HashMap<TestRoundId, TestRound>>>,
}

impl TestRoundRepository for MemoryTestRounds {
    fn insert(&self, round: TestRound) -> Result<TestRound, RepositoryError> {
        let mut guard = self.records.lock().expect("test round mutex poisoned");
        if guard.contains_key(&round.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(round.id.clone(), round.clone());
        Ok(round)
    }

    fn update(&self, round: TestRound) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("test round mutex poisoned");
        if !guard.contains_key(&round.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(round.id.clone(), round);
        Ok(())
    }

    fn fetch(&self, id: &TestRoundId) -> Result<Option<TestRound>, RepositoryError> {
        let guard = self.records.lock().expect("test round mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}
