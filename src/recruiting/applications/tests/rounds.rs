use super::common::*;
use crate::recruiting::applications::domain::{
    AntiCheatEvent, AntiCheatEventKind, ApplicationStatus, RoundStatus, Severity,
    SubmittedAnswer,
};
use crate::recruiting::applications::repository::{ApplicationRepository, TestRoundRepository};
use crate::recruiting::applications::service::LifecycleError;
use serde_json::json;

#[test]
fn a_score_just_below_the_threshold_is_rejected() {
    let harness = harness();
    let application = harness.inserted_with_score("job-1", 59);

    match harness.gate.assign_test(&hr(), &application.id) {
        Err(LifecycleError::ScoreTooLow { score: 59, threshold: 60 }) => {}
        other => panic!("expected score rejection, got {other:?}"),
    }
}

#[test]
fn the_threshold_is_inclusive() {
    let harness = harness();
    let application = harness.inserted_with_score("job-1", 60);

    let assigned = harness
        .gate
        .assign_test(&hr(), &application.id)
        .expect("boundary score passes the gate");

    assert_eq!(assigned.application.status, ApplicationStatus::Round1);
    let summary = assigned.application.round1.expect("round summary embedded");
    assert_eq!(summary.status, RoundStatus::Scheduled);
    assert_eq!(summary.test_id.as_ref(), Some(&assigned.round.id));
    assert_eq!(summary.total_score, 0);

    assert_eq!(assigned.round.anti_cheat.tab_switches, 0);
    assert_eq!(assigned.round.anti_cheat.copy_paste_attempts, 0);
    assert_eq!(assigned.round.anti_cheat.fullscreen_exits, 0);
    assert!(assigned.round.anti_cheat.suspicious_activity.is_empty());
    assert!(assigned.round.questions.is_empty());

    let last_entry = assigned
        .application
        .timeline
        .last()
        .expect("timeline entry appended");
    assert_eq!(last_entry.stage, "Round1");
    assert!(last_entry.action.contains("60%"));
}

#[test]
fn a_second_assignment_is_rejected() {
    let harness = harness();
    let application = harness.inserted_with_score("job-1", 82);

    harness
        .gate
        .assign_test(&hr(), &application.id)
        .expect("first assignment succeeds");

    match harness.gate.assign_test(&hr(), &application.id) {
        Err(LifecycleError::AlreadyAssigned) => {}
        other => panic!("expected already-assigned rejection, got {other:?}"),
    }
}

#[test]
fn assignment_requires_job_ownership() {
    let harness = harness();
    let application = harness.inserted_with_score("job-1", 82);

    match harness.gate.assign_test(&other_hr(), &application.id) {
        Err(LifecycleError::Forbidden) => {}
        other => panic!("expected ownership failure, got {other:?}"),
    }
}

#[test]
fn assignment_from_a_withdrawn_application_is_invalid() {
    let harness = harness();
    let application = harness.submitted_application("job-1");
    harness
        .lifecycle
        .withdraw(&student(), &application.id)
        .expect("withdraw succeeds");

    match harness.gate.assign_test(&hr(), &application.id) {
        Err(LifecycleError::InvalidTransition { from: "Withdrawn" }) => {}
        other => panic!("expected invalid transition, got {other:?}"),
    }
}

#[test]
fn events_only_ever_increase_the_counters() {
    let harness = harness();
    let application = harness.inserted_with_score("job-1", 75);
    let assigned = harness
        .gate
        .assign_test(&hr(), &application.id)
        .expect("assignment succeeds");

    for _ in 0..3 {
        harness
            .gate
            .record_event(
                &assigned.round.id,
                AntiCheatEvent {
                    kind: AntiCheatEventKind::TabSwitch,
                    severity: Severity::Low,
                    detail: None,
                },
            )
            .expect("event recorded");
    }
    let round = harness
        .gate
        .record_event(
            &assigned.round.id,
            AntiCheatEvent {
                kind: AntiCheatEventKind::CopyPaste,
                severity: Severity::High,
                detail: Some("clipboard burst".to_string()),
            },
        )
        .expect("event recorded");

    assert_eq!(round.anti_cheat.tab_switches, 3);
    assert_eq!(round.anti_cheat.copy_paste_attempts, 1);
    assert_eq!(
        round.anti_cheat.suspicious_activity,
        vec!["CopyPaste: clipboard burst".to_string()]
    );
}

#[test]
fn submission_is_accepted_regardless_of_telemetry() {
    let harness = harness();
    let application = harness.inserted_with_score("job-1", 75);
    let assigned = harness
        .gate
        .assign_test(&hr(), &application.id)
        .expect("assignment succeeds");

    for _ in 0..10 {
        harness
            .gate
            .record_event(
                &assigned.round.id,
                AntiCheatEvent {
                    kind: AntiCheatEventKind::FullscreenExit,
                    severity: Severity::High,
                    detail: None,
                },
            )
            .expect("event recorded");
    }

    let log = json!({ "tabSwitches": 10, "notes": ["left fullscreen repeatedly"] });
    let round = harness
        .gate
        .submit(
            &assigned.round.id,
            vec![SubmittedAnswer {
                question_index: 0,
                response: "42".to_string(),
            }],
            log.clone(),
        )
        .expect("submission is never blocked by telemetry");

    assert!(round.submitted_at.is_some());
    assert_eq!(round.anti_cheat_log, Some(log));
    assert_eq!(round.answers.len(), 1);

    let stored = harness
        .applications
        .fetch(&application.id)
        .expect("fetch succeeds")
        .expect("record present");
    let summary = stored.round1.expect("summary present");
    assert_eq!(summary.status, RoundStatus::Completed);
    // Grading is external: no score is synthesized at submission time.
    assert_eq!(summary.total_score, 0);
}

#[test]
fn a_round_cannot_be_submitted_twice() {
    let harness = harness();
    let application = harness.inserted_with_score("job-1", 75);
    let assigned = harness
        .gate
        .assign_test(&hr(), &application.id)
        .expect("assignment succeeds");

    harness
        .gate
        .submit(&assigned.round.id, Vec::new(), json!({}))
        .expect("first submission succeeds");

    match harness.gate.submit(&assigned.round.id, Vec::new(), json!({})) {
        Err(LifecycleError::InvalidTransition { from: "Completed" }) => {}
        other => panic!("expected invalid transition, got {other:?}"),
    }
}

#[test]
fn the_round_is_persisted_in_the_round_repository() {
    let harness = harness();
    let application = harness.inserted_with_score("job-1", 70);
    let assigned = harness
        .gate
        .assign_test(&hr(), &application.id)
        .expect("assignment succeeds");

    let stored = harness
        .rounds
        .fetch(&assigned.round.id)
        .expect("fetch succeeds")
        .expect("round present");
    assert_eq!(stored.application, application.id);
}
