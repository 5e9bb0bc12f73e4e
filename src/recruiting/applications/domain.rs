use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::recruiting::scoring::{FitScore, JobRequirements};

macro_rules! id_newtype {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

id_newtype!(
    /// Identifier of a student principal, issued by the identity provider.
    StudentId
);
id_newtype!(
    /// Identifier of an HR principal, issued by the identity provider.
    HrId
);
id_newtype!(JobId);
id_newtype!(ApplicationId);
id_newtype!(TestRoundId);

/// Hiring pipeline status of an application. Transitions are monotonic:
/// nothing returns to `Pending`, and `Rejected`/`Withdrawn` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Pending,
    Round1,
    Round2,
    Shortlisted,
    Rejected,
    TalentPool,
    Withdrawn,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "Pending",
            ApplicationStatus::Round1 => "Round1",
            ApplicationStatus::Round2 => "Round2",
            ApplicationStatus::Shortlisted => "Shortlisted",
            ApplicationStatus::Rejected => "Rejected",
            ApplicationStatus::TalentPool => "TalentPool",
            ApplicationStatus::Withdrawn => "Withdrawn",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Pending" => Some(ApplicationStatus::Pending),
            "Round1" => Some(ApplicationStatus::Round1),
            "Round2" => Some(ApplicationStatus::Round2),
            "Shortlisted" => Some(ApplicationStatus::Shortlisted),
            "Rejected" => Some(ApplicationStatus::Rejected),
            "TalentPool" => Some(ApplicationStatus::TalentPool),
            "Withdrawn" => Some(ApplicationStatus::Withdrawn),
            _ => None,
        }
    }

    /// No transitions leave a terminal status.
    pub const fn is_terminal(self) -> bool {
        matches!(self, ApplicationStatus::Rejected | ApplicationStatus::Withdrawn)
    }

    /// The monotonic transition table. `Withdrawn` is reachable from any
    /// non-terminal status (student exit); `TalentPool` is a side exit for
    /// candidates retained for future matching.
    pub fn may_transition_to(self, next: ApplicationStatus) -> bool {
        use ApplicationStatus::*;
        if self.is_terminal() || next == Pending || next == self {
            return false;
        }
        if next == Withdrawn {
            return true;
        }
        match self {
            Pending => matches!(next, Round1 | Shortlisted | Rejected | TalentPool),
            Round1 => matches!(next, Round2 | Shortlisted | Rejected | TalentPool),
            Round2 => matches!(next, Shortlisted | Rejected | TalentPool),
            Shortlisted => matches!(next, Round1 | Round2 | Rejected | TalentPool),
            TalentPool | Rejected | Withdrawn => false,
        }
    }
}

/// One append-only audit entry; the timeline is stored chronologically and
/// rendered most-recent-first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub stage: String,
    pub timestamp: DateTime<Utc>,
    pub action: String,
}

/// Status of an assessment round embedded in an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundStatus {
    Scheduled,
    InProgress,
    Completed,
    Failed,
}

impl RoundStatus {
    pub const fn label(self) -> &'static str {
        match self {
            RoundStatus::Scheduled => "Scheduled",
            RoundStatus::InProgress => "InProgress",
            RoundStatus::Completed => "Completed",
            RoundStatus::Failed => "Failed",
        }
    }
}

/// Summary of an assessment round carried on the application itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub status: RoundStatus,
    pub test_id: Option<TestRoundId>,
    pub mcq_score: u16,
    pub coding_score: u16,
    pub total_score: u16,
    pub anti_cheat_flags: Vec<String>,
}

impl RoundSummary {
    /// Fresh round-1 summary at assignment time: scheduled, zeroed scores.
    pub fn scheduled(test_id: TestRoundId) -> Self {
        Self {
            status: RoundStatus::Scheduled,
            test_id: Some(test_id),
            mcq_score: 0,
            coding_score: 0,
            total_score: 0,
            anti_cheat_flags: Vec::new(),
        }
    }
}

/// Optional applicant details supplied at apply time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// The central lifecycle entity: one student's pursuit of one job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub student: StudentId,
    pub job: JobId,
    pub status: ApplicationStatus,
    pub ai_score: FitScore,
    pub round1: Option<RoundSummary>,
    pub round2: Option<RoundSummary>,
    pub timeline: Vec<TimelineEntry>,
    pub applied_at: DateTime<Utc>,
}

impl Application {
    /// Create a pending application with the mandatory "Applied" entry.
    pub fn submitted(
        id: ApplicationId,
        student: StudentId,
        job: JobId,
        ai_score: FitScore,
        applicant_name: &str,
    ) -> Self {
        let applied_at = Utc::now();
        Self {
            id,
            student,
            job,
            status: ApplicationStatus::Pending,
            ai_score,
            round1: None,
            round2: None,
            timeline: vec![TimelineEntry {
                stage: "Applied".to_string(),
                timestamp: applied_at,
                action: format!("Application submitted by {applicant_name}"),
            }],
            applied_at,
        }
    }

    /// Append a timeline entry stamped with the server clock.
    pub fn record(&mut self, stage: &str, action: String) {
        self.timeline.push(TimelineEntry {
            stage: stage.to_string(),
            timestamp: Utc::now(),
            action,
        });
    }

    /// Timeline in display order (most recent first); storage order stays
    /// chronological.
    pub fn timeline_recent_first(&self) -> Vec<TimelineEntry> {
        let mut entries = self.timeline.clone();
        entries.reverse();
        entries
    }
}

/// Publication status of a job posting. The lifecycle core does not gate
/// applications on it; visibility is the routing layer's concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    Active,
    Closed,
}

impl JobStatus {
    pub const fn label(self) -> &'static str {
        match self {
            JobStatus::Active => "Active",
            JobStatus::Closed => "Closed",
        }
    }
}

/// Assessment configuration attached to a job posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundConfig {
    pub round1: Round1Config,
    pub round2: Round2Config,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round1Config {
    pub mcq_count: u8,
    pub coding_count: u8,
    pub duration_minutes: u16,
    pub passing_score: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round2Config {
    pub enabled: bool,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            round1: Round1Config {
                mcq_count: 10,
                coding_count: 2,
                duration_minutes: 60,
                passing_score: 70,
            },
            round2: Round2Config::default(),
        }
    }
}

/// A job as the lifecycle core sees it: requirements plus ownership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: JobId,
    pub posted_by: HrId,
    pub title: String,
    pub requirements: JobRequirements,
    pub round_config: RoundConfig,
    pub status: JobStatus,
}

/// Assessment question; generation and grading are external collaborators,
/// so the core only carries the shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestQuestion {
    pub kind: QuestionKind,
    pub prompt: String,
    pub options: Vec<String>,
    pub points: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionKind {
    Mcq,
    Coding,
}

/// A candidate's answer to one question of a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedAnswer {
    pub question_index: usize,
    pub response: String,
}

/// Counters recorded during a proctored round. Advisory only: they never
/// decrease and never block submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AntiCheatTelemetry {
    pub tab_switches: u32,
    pub copy_paste_attempts: u32,
    pub fullscreen_exits: u32,
    pub suspicious_activity: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AntiCheatEventKind {
    TabSwitch,
    CopyPaste,
    FullscreenExit,
    DuplicateIp,
}

impl AntiCheatEventKind {
    pub const fn label(self) -> &'static str {
        match self {
            AntiCheatEventKind::TabSwitch => "TabSwitch",
            AntiCheatEventKind::CopyPaste => "CopyPaste",
            AntiCheatEventKind::FullscreenExit => "FullscreenExit",
            AntiCheatEventKind::DuplicateIp => "DuplicateIP",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// One telemetry event reported by the proctoring frontend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AntiCheatEvent {
    pub kind: AntiCheatEventKind,
    pub severity: Severity,
    pub detail: Option<String>,
}

impl AntiCheatTelemetry {
    /// Apply one event: counters only ever increment, the suspicious list
    /// only ever grows.
    pub fn apply(&mut self, event: &AntiCheatEvent) {
        match event.kind {
            AntiCheatEventKind::TabSwitch => self.tab_switches += 1,
            AntiCheatEventKind::CopyPaste => self.copy_paste_attempts += 1,
            AntiCheatEventKind::FullscreenExit => self.fullscreen_exits += 1,
            AntiCheatEventKind::DuplicateIp => {
                self.suspicious_activity
                    .push(describe_event(event));
            }
        }
        if event.severity == Severity::High && event.kind != AntiCheatEventKind::DuplicateIp {
            self.suspicious_activity.push(describe_event(event));
        }
    }
}

fn describe_event(event: &AntiCheatEvent) -> String {
    match &event.detail {
        Some(detail) => format!("{}: {}", event.kind.label(), detail),
        None => event.kind.label().to_string(),
    }
}

/// A test round owned 1:1 by an application once assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestRound {
    pub id: TestRoundId,
    pub application: ApplicationId,
    pub questions: Vec<TestQuestion>,
    pub anti_cheat: AntiCheatTelemetry,
    pub started_at: DateTime<Utc>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub answers: Vec<SubmittedAnswer>,
    /// Proctoring log provided at submission, stored verbatim.
    pub anti_cheat_log: Option<serde_json::Value>,
}

impl TestRound {
    /// Fresh round: zeroed counters, no questions (generation is external).
    pub fn assigned(id: TestRoundId, application: ApplicationId) -> Self {
        Self {
            id,
            application,
            questions: Vec::new(),
            anti_cheat: AntiCheatTelemetry::default(),
            started_at: Utc::now(),
            submitted_at: None,
            answers: Vec::new(),
            anti_cheat_log: None,
        }
    }
}
