use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{
    AntiCheatEvent, AntiCheatTelemetry, Application, ApplicationId, ApplicationStatus, HrId,
    JobId, PersonalInfo, StudentId, SubmittedAnswer, TestRound, TestRoundId, TimelineEntry,
};
use super::repository::{
    ApplicationRepository, JobDirectory, ProfileStore, RepositoryError, TestRoundRepository,
};
use super::rounds::TestRoundGate;
use super::service::{ApplicationLifecycle, LifecycleError};
use crate::recruiting::scoring::FitScore;

/// Shared router state: the lifecycle facade, the round gate, and the job
/// directory for listings.
pub struct RecruitingState<R, J, P, T> {
    pub lifecycle: Arc<ApplicationLifecycle<R, J, P>>,
    pub gate: Arc<TestRoundGate<R, J, T>>,
    pub jobs: Arc<J>,
}

impl<R, J, P, T> Clone for RecruitingState<R, J, P, T> {
    fn clone(&self) -> Self {
        Self {
            lifecycle: Arc::clone(&self.lifecycle),
            gate: Arc::clone(&self.gate),
            jobs: Arc::clone(&self.jobs),
        }
    }
}

/// Router builder exposing the recruitment endpoints. Identity is taken
/// from the request body as `(subject id, role)` supplied by the external
/// identity provider; the core trusts what it is given.
pub fn recruiting_router<R, J, P, T>(state: RecruitingState<R, J, P, T>) -> Router
where
    R: ApplicationRepository + 'static,
    J: JobDirectory + 'static,
    P: ProfileStore + 'static,
    T: TestRoundRepository + 'static,
{
    Router::new()
        .route("/api/v1/resumes", post(upload_resume_handler::<R, J, P, T>))
        .route("/api/v1/jobs", get(list_jobs_handler::<R, J, P, T>))
        .route("/api/v1/applications", post(apply_handler::<R, J, P, T>))
        .route(
            "/api/v1/applications/:application_id",
            get(get_application_handler::<R, J, P, T>)
                .delete(delete_application_handler::<R, J, P, T>),
        )
        .route(
            "/api/v1/applications/:application_id/withdraw",
            post(withdraw_handler::<R, J, P, T>),
        )
        .route(
            "/api/v1/applications/:application_id/advance",
            post(advance_handler::<R, J, P, T>),
        )
        .route(
            "/api/v1/applications/:application_id/test-round",
            post(assign_test_handler::<R, J, P, T>),
        )
        .route(
            "/api/v1/test-rounds/:test_id/events",
            post(record_event_handler::<R, J, P, T>),
        )
        .route(
            "/api/v1/test-rounds/:test_id/submit",
            post(submit_test_handler::<R, J, P, T>),
        )
        .route(
            "/api/v1/students/:student_id/applications",
            get(student_applications_handler::<R, J, P, T>),
        )
        .route(
            "/api/v1/jobs/:job_id/candidates/:hr_id",
            get(candidates_handler::<R, J, P, T>),
        )
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct ResumeUploadRequest {
    student_id: String,
    file_name: String,
    #[serde(default = "default_mime")]
    declared_mime: String,
    content: String,
    #[serde(default)]
    preview_job_id: Option<String>,
}

fn default_mime() -> String {
    "text/plain".to_string()
}

#[derive(Debug, Deserialize)]
struct ApplyRequest {
    student_id: String,
    job_id: String,
    #[serde(default)]
    personal_info: Option<PersonalInfo>,
}

#[derive(Debug, Deserialize)]
struct WithdrawRequest {
    student_id: String,
}

#[derive(Debug, Deserialize)]
struct AdvanceRequest {
    hr_id: String,
    status: String,
}

#[derive(Debug, Deserialize)]
struct HrRequest {
    hr_id: String,
}

#[derive(Debug, Deserialize)]
struct SubmitTestRequest {
    #[serde(default)]
    answers: Vec<SubmittedAnswer>,
    #[serde(default)]
    anti_cheat: serde_json::Value,
}

/// Sanitized representation of an application for API responses; the
/// timeline is rendered most-recent-first.
#[derive(Debug, Serialize)]
struct ApplicationView {
    application_id: ApplicationId,
    student_id: StudentId,
    job_id: JobId,
    status: &'static str,
    ai_score: FitScore,
    flags: Vec<&'static str>,
    applied_at: DateTime<Utc>,
    timeline: Vec<TimelineEntry>,
}

impl ApplicationView {
    fn from_application(application: &Application) -> Self {
        Self {
            application_id: application.id.clone(),
            student_id: application.student.clone(),
            job_id: application.job.clone(),
            status: application.status.label(),
            ai_score: application.ai_score.clone(),
            flags: application
                .ai_score
                .flags
                .iter()
                .map(|flag| flag.label())
                .collect(),
            applied_at: application.applied_at,
            timeline: application.timeline_recent_first(),
        }
    }
}

#[derive(Debug, Serialize)]
struct TestRoundView {
    test_id: TestRoundId,
    application_id: ApplicationId,
    started_at: DateTime<Utc>,
    submitted_at: Option<DateTime<Utc>>,
    anti_cheat: AntiCheatTelemetry,
}

impl TestRoundView {
    fn from_round(round: &TestRound) -> Self {
        Self {
            test_id: round.id.clone(),
            application_id: round.application.clone(),
            started_at: round.started_at,
            submitted_at: round.submitted_at,
            anti_cheat: round.anti_cheat.clone(),
        }
    }
}

fn error_response(error: LifecycleError) -> Response {
    let status = match &error {
        LifecycleError::DuplicateApplication | LifecycleError::AlreadyAssigned => {
            StatusCode::CONFLICT
        }
        LifecycleError::PreconditionFailed | LifecycleError::ResumeSizeOutOfBounds { .. } => {
            StatusCode::BAD_REQUEST
        }
        LifecycleError::Forbidden => StatusCode::FORBIDDEN,
        LifecycleError::InvalidTransition { .. } | LifecycleError::ScoreTooLow { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        LifecycleError::NotFound(_) => StatusCode::NOT_FOUND,
        LifecycleError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        LifecycleError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        LifecycleError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

async fn upload_resume_handler<R, J, P, T>(
    State(state): State<RecruitingState<R, J, P, T>>,
    axum::Json(request): axum::Json<ResumeUploadRequest>,
) -> Response
where
    R: ApplicationRepository + 'static,
    J: JobDirectory + 'static,
    P: ProfileStore + 'static,
    T: TestRoundRepository + 'static,
{
    let student = StudentId(request.student_id);
    let preview_job = request.preview_job_id.map(JobId);
    match state.lifecycle.upload_resume(
        &student,
        request.content.as_bytes(),
        &request.declared_mime,
        &request.file_name,
        preview_job.as_ref(),
    ) {
        Ok(outcome) => {
            let payload = json!({
                "message": "Resume uploaded and parsed successfully",
                "signal": outcome.signal,
                "preview_score": outcome.preview_score,
            });
            (StatusCode::CREATED, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

async fn list_jobs_handler<R, J, P, T>(
    State(state): State<RecruitingState<R, J, P, T>>,
) -> Response
where
    R: ApplicationRepository + 'static,
    J: JobDirectory + 'static,
    P: ProfileStore + 'static,
    T: TestRoundRepository + 'static,
{
    match state.jobs.all() {
        Ok(postings) => (StatusCode::OK, axum::Json(postings)).into_response(),
        Err(error) => error_response(LifecycleError::Repository(error)),
    }
}

async fn apply_handler<R, J, P, T>(
    State(state): State<RecruitingState<R, J, P, T>>,
    axum::Json(request): axum::Json<ApplyRequest>,
) -> Response
where
    R: ApplicationRepository + 'static,
    J: JobDirectory + 'static,
    P: ProfileStore + 'static,
    T: TestRoundRepository + 'static,
{
    let student = StudentId(request.student_id);
    let job = JobId(request.job_id);
    match state.lifecycle.apply(&student, &job, request.personal_info) {
        Ok(application) => (
            StatusCode::CREATED,
            axum::Json(ApplicationView::from_application(&application)),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

async fn get_application_handler<R, J, P, T>(
    State(state): State<RecruitingState<R, J, P, T>>,
    Path(application_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
    J: JobDirectory + 'static,
    P: ProfileStore + 'static,
    T: TestRoundRepository + 'static,
{
    match state.lifecycle.application(&ApplicationId(application_id)) {
        Ok(application) => (
            StatusCode::OK,
            axum::Json(ApplicationView::from_application(&application)),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

async fn withdraw_handler<R, J, P, T>(
    State(state): State<RecruitingState<R, J, P, T>>,
    Path(application_id): Path<String>,
    axum::Json(request): axum::Json<WithdrawRequest>,
) -> Response
where
    R: ApplicationRepository + 'static,
    J: JobDirectory + 'static,
    P: ProfileStore + 'static,
    T: TestRoundRepository + 'static,
{
    let student = StudentId(request.student_id);
    match state
        .lifecycle
        .withdraw(&student, &ApplicationId(application_id))
    {
        Ok(application) => (
            StatusCode::OK,
            axum::Json(ApplicationView::from_application(&application)),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

async fn advance_handler<R, J, P, T>(
    State(state): State<RecruitingState<R, J, P, T>>,
    Path(application_id): Path<String>,
    axum::Json(request): axum::Json<AdvanceRequest>,
) -> Response
where
    R: ApplicationRepository + 'static,
    J: JobDirectory + 'static,
    P: ProfileStore + 'static,
    T: TestRoundRepository + 'static,
{
    let Some(status) = ApplicationStatus::parse(&request.status) else {
        let payload = json!({ "error": format!("unknown status '{}'", request.status) });
        return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
    };
    match state.lifecycle.advance(
        &HrId(request.hr_id),
        &ApplicationId(application_id),
        status,
    ) {
        Ok(application) => (
            StatusCode::OK,
            axum::Json(ApplicationView::from_application(&application)),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

async fn delete_application_handler<R, J, P, T>(
    State(state): State<RecruitingState<R, J, P, T>>,
    Path(application_id): Path<String>,
    axum::Json(request): axum::Json<HrRequest>,
) -> Response
where
    R: ApplicationRepository + 'static,
    J: JobDirectory + 'static,
    P: ProfileStore + 'static,
    T: TestRoundRepository + 'static,
{
    let id = ApplicationId(application_id);
    match state.lifecycle.delete(&HrId(request.hr_id), &id) {
        Ok(()) => {
            let payload = json!({
                "message": "Application deleted",
                "application_id": id.0,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

async fn assign_test_handler<R, J, P, T>(
    State(state): State<RecruitingState<R, J, P, T>>,
    Path(application_id): Path<String>,
    axum::Json(request): axum::Json<HrRequest>,
) -> Response
where
    R: ApplicationRepository + 'static,
    J: JobDirectory + 'static,
    P: ProfileStore + 'static,
    T: TestRoundRepository + 'static,
{
    match state
        .gate
        .assign_test(&HrId(request.hr_id), &ApplicationId(application_id))
    {
        Ok(assigned) => {
            let payload = json!({
                "message": "Test assigned successfully",
                "test_round": TestRoundView::from_round(&assigned.round),
                "application": ApplicationView::from_application(&assigned.application),
            });
            (StatusCode::CREATED, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

async fn record_event_handler<R, J, P, T>(
    State(state): State<RecruitingState<R, J, P, T>>,
    Path(test_id): Path<String>,
    axum::Json(event): axum::Json<AntiCheatEvent>,
) -> Response
where
    R: ApplicationRepository + 'static,
    J: JobDirectory + 'static,
    P: ProfileStore + 'static,
    T: TestRoundRepository + 'static,
{
    match state.gate.record_event(&TestRoundId(test_id), event) {
        Ok(round) => (StatusCode::OK, axum::Json(TestRoundView::from_round(&round))).into_response(),
        Err(error) => error_response(error),
    }
}

async fn submit_test_handler<R, J, P, T>(
    State(state): State<RecruitingState<R, J, P, T>>,
    Path(test_id): Path<String>,
    axum::Json(request): axum::Json<SubmitTestRequest>,
) -> Response
where
    R: ApplicationRepository + 'static,
    J: JobDirectory + 'static,
    P: ProfileStore + 'static,
    T: TestRoundRepository + 'static,
{
    match state
        .gate
        .submit(&TestRoundId(test_id), request.answers, request.anti_cheat)
    {
        Ok(round) => (StatusCode::OK, axum::Json(TestRoundView::from_round(&round))).into_response(),
        Err(error) => error_response(error),
    }
}

async fn student_applications_handler<R, J, P, T>(
    State(state): State<RecruitingState<R, J, P, T>>,
    Path(student_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
    J: JobDirectory + 'static,
    P: ProfileStore + 'static,
    T: TestRoundRepository + 'static,
{
    match state
        .lifecycle
        .applications_for_student(&StudentId(student_id))
    {
        Ok(applications) => {
            let views: Vec<ApplicationView> = applications
                .iter()
                .map(ApplicationView::from_application)
                .collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(error) => error_response(error),
    }
}

async fn candidates_handler<R, J, P, T>(
    State(state): State<RecruitingState<R, J, P, T>>,
    Path((job_id, hr_id)): Path<(String, String)>,
) -> Response
where
    R: ApplicationRepository + 'static,
    J: JobDirectory + 'static,
    P: ProfileStore + 'static,
    T: TestRoundRepository + 'static,
{
    match state.lifecycle.candidates(&HrId(hr_id), &JobId(job_id)) {
        Ok(applications) => {
            let views: Vec<ApplicationView> = applications
                .iter()
                .map(ApplicationView::from_application)
                .collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(error) => error_response(error),
    }
}
