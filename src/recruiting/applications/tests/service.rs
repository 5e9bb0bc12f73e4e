use super::common::*;
use crate::recruiting::applications::domain::{ApplicationStatus, JobId};
use crate::recruiting::applications::repository::ApplicationRepository;
use crate::recruiting::applications::service::LifecycleError;

#[test]
fn apply_requires_an_uploaded_resume() {
    let harness = harness();
    harness.seed_matching_job("job-1");

    match harness.lifecycle.apply(&student(), &JobId("job-1".to_string()), None) {
        Err(LifecycleError::PreconditionFailed) => {}
        other => panic!("expected missing-resume precondition, got {other:?}"),
    }
}

#[test]
fn apply_creates_a_pending_application_with_applied_entry() {
    let harness = harness();
    let application = harness.submitted_application("job-1");

    assert_eq!(application.status, ApplicationStatus::Pending);
    assert!(application.timeline.len() >= 1);
    assert_eq!(application.timeline[0].stage, "Applied");
    assert!(application.ai_score.fit_score >= 60);
    assert_eq!(application.ai_score.overall_rank, 0);
}

#[test]
fn duplicate_apply_is_rejected() {
    let harness = harness();
    harness.submitted_application("job-1");

    match harness.lifecycle.apply(&student(), &JobId("job-1".to_string()), None) {
        Err(LifecycleError::DuplicateApplication) => {}
        other => panic!("expected duplicate rejection, got {other:?}"),
    }
}

#[test]
fn reapply_is_allowed_after_withdrawal() {
    let harness = harness();
    let application = harness.submitted_application("job-1");

    harness
        .lifecycle
        .withdraw(&student(), &application.id)
        .expect("withdraw succeeds");

    let second = harness
        .lifecycle
        .apply(&student(), &JobId("job-1".to_string()), None)
        .expect("re-application succeeds after withdrawal");
    assert_ne!(second.id, application.id);
    assert_eq!(second.status, ApplicationStatus::Pending);
}

#[test]
fn withdraw_requires_ownership() {
    let harness = harness();
    let application = harness.submitted_application("job-1");

    let stranger = crate::recruiting::applications::domain::StudentId("student-9".to_string());
    match harness.lifecycle.withdraw(&stranger, &application.id) {
        Err(LifecycleError::Forbidden) => {}
        other => panic!("expected ownership failure, got {other:?}"),
    }
}

#[test]
fn withdraw_from_rejected_is_an_invalid_transition() {
    let harness = harness();
    let application = rejected_application(&harness, "job-1");

    match harness.lifecycle.withdraw(&student(), &application.id) {
        Err(LifecycleError::InvalidTransition { from: "Rejected" }) => {}
        other => panic!("expected invalid transition, got {other:?}"),
    }
}

#[test]
fn withdraw_from_pending_succeeds_and_appends_timeline() {
    let harness = harness();
    let application = harness.submitted_application("job-1");

    let withdrawn = harness
        .lifecycle
        .withdraw(&student(), &application.id)
        .expect("withdraw succeeds");

    assert_eq!(withdrawn.status, ApplicationStatus::Withdrawn);
    assert_eq!(withdrawn.timeline.last().map(|e| e.stage.as_str()), Some("Withdrawn"));
    assert_eq!(withdrawn.timeline[0].stage, "Applied");
}

#[test]
fn withdrawing_twice_is_an_invalid_transition() {
    let harness = harness();
    let application = harness.submitted_application("job-1");
    harness
        .lifecycle
        .withdraw(&student(), &application.id)
        .expect("first withdraw succeeds");

    match harness.lifecycle.withdraw(&student(), &application.id) {
        Err(LifecycleError::InvalidTransition { from: "Withdrawn" }) => {}
        other => panic!("expected invalid transition, got {other:?}"),
    }
}

#[test]
fn delete_requires_job_ownership() {
    let harness = harness();
    let application = harness.submitted_application("job-1");

    match harness.lifecycle.delete(&other_hr(), &application.id) {
        Err(LifecycleError::Forbidden) => {}
        other => panic!("expected ownership failure, got {other:?}"),
    }
}

#[test]
fn delete_removes_the_application() {
    let harness = harness();
    let application = harness.submitted_application("job-1");

    harness
        .lifecycle
        .delete(&hr(), &application.id)
        .expect("delete succeeds");

    assert!(harness
        .applications
        .fetch(&application.id)
        .expect("fetch succeeds")
        .is_none());
}

#[test]
fn advance_moves_a_pending_application_to_shortlisted() {
    let harness = harness();
    let application = harness.submitted_application("job-1");

    let advanced = harness
        .lifecycle
        .advance(&hr(), &application.id, ApplicationStatus::Shortlisted)
        .expect("advance succeeds");

    assert_eq!(advanced.status, ApplicationStatus::Shortlisted);
    assert_eq!(
        advanced.timeline.last().map(|e| e.stage.as_str()),
        Some("Shortlisted")
    );
}

#[test]
fn advance_cannot_leave_a_terminal_status() {
    let harness = harness();
    let application = rejected_application(&harness, "job-1");

    match harness
        .lifecycle
        .advance(&hr(), &application.id, ApplicationStatus::TalentPool)
    {
        Err(LifecycleError::InvalidTransition { from: "Rejected" }) => {}
        other => panic!("expected invalid transition, got {other:?}"),
    }
}

#[test]
fn advance_cannot_target_pending_or_withdrawn() {
    let harness = harness();
    let application = harness.submitted_application("job-1");

    for target in [ApplicationStatus::Pending, ApplicationStatus::Withdrawn] {
        match harness.lifecycle.advance(&hr(), &application.id, target) {
            Err(LifecycleError::InvalidTransition { .. }) => {}
            other => panic!("expected invalid transition for {target:?}, got {other:?}"),
        }
    }
}

#[test]
fn resume_size_band_is_enforced() {
    let harness = harness();

    match harness
        .lifecycle
        .upload_resume(&student(), b"too small", "text/plain", "a.txt", None)
    {
        Err(LifecycleError::ResumeSizeOutOfBounds { size: 9, .. }) => {}
        other => panic!("expected size rejection, got {other:?}"),
    }
}

#[test]
fn upload_returns_a_preview_score_for_a_known_job() {
    let harness = harness();
    harness.seed_matching_job("job-1");

    let outcome = harness
        .lifecycle
        .upload_resume(
            &student(),
            ALICE_RESUME.as_bytes(),
            "text/plain",
            "alice.txt",
            Some(&JobId("job-1".to_string())),
        )
        .expect("upload succeeds");

    let preview = outcome.preview_score.expect("preview present");
    assert_eq!(preview.skill_match, 100);
    assert_eq!(outcome.signal.email.as_deref(), Some("alice@example.com"));
}

#[test]
fn preview_is_skipped_for_an_unknown_job() {
    let harness = harness();

    let outcome = harness
        .lifecycle
        .upload_resume(
            &student(),
            ALICE_RESUME.as_bytes(),
            "text/plain",
            "alice.txt",
            Some(&JobId("missing".to_string())),
        )
        .expect("upload succeeds");

    assert!(outcome.preview_score.is_none());
}

#[test]
fn reupload_does_not_rewrite_scores_embedded_in_applications() {
    let harness = harness();
    let application = harness.submitted_application("job-1");
    let score_at_apply = application.ai_score.clone();

    harness
        .lifecycle
        .upload_resume(
            &student(),
            b"A completely blank rewrite with no relevant skills listed.",
            "text/plain",
            "alice-v2.txt",
            None,
        )
        .expect("second upload succeeds");

    let stored = harness
        .applications
        .fetch(&application.id)
        .expect("fetch succeeds")
        .expect("record present");
    assert_eq!(stored.ai_score, score_at_apply);
}

#[test]
fn applications_to_closed_jobs_are_still_accepted() {
    let harness = harness();
    let mut closed = posting(
        "job-closed",
        &["React", "Node.js"],
        "Build React and Node.js services",
    );
    closed.status = crate::recruiting::applications::domain::JobStatus::Closed;
    harness.jobs.put(closed);
    harness.upload_alice_resume();

    let application = harness
        .lifecycle
        .apply(&student(), &JobId("job-closed".to_string()), None)
        .expect("closed jobs do not gate applications");
    assert_eq!(application.status, ApplicationStatus::Pending);
}

#[test]
fn mismatched_job_scores_zero() {
    let harness = harness();
    harness.seed_mismatched_job("job-2");
    harness.upload_alice_resume();

    let application = harness
        .lifecycle
        .apply(&student(), &JobId("job-2".to_string()), None)
        .expect("application succeeds");
    assert_eq!(application.ai_score.skill_match, 0);
    assert_eq!(application.ai_score.fit_score, 0);
}
