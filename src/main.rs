use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use clap::{Args, Parser, Subcommand};
use hireflow::config::AppConfig;
use hireflow::error::AppError;
use hireflow::recruiting::applications::{
    recruiting_router, ApplicationLifecycle, JobId, JobPosting, JobStatus, MemoryApplications,
    MemoryJobs, MemoryProfiles, MemoryTestRounds, RecruitingState, RoundConfig, TestRoundGate,
};
use hireflow::recruiting::resume::ResumeSignalExtractor;
use hireflow::recruiting::scoring::{
    scorer_from_config, FitScorer, JobRequirements, ScoringContext, WeightedFitScorer,
};
use hireflow::telemetry;
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "HireFlow",
    about = "Run the candidate matching and application lifecycle service from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Extract a resume and score it against a described job
    Score(ScoreArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args, Debug)]
struct ScoreArgs {
    /// Path to the resume file to extract
    #[arg(long)]
    resume: PathBuf,
    /// Declared mime type of the resume file
    #[arg(long, default_value = "text/plain")]
    mime: String,
    /// Comma-separated required skills of the job
    #[arg(long)]
    skills: String,
    /// Free-text job description
    #[arg(long, default_value = "")]
    description: String,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Score(args) => run_score(args),
    }
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let applications = Arc::new(MemoryApplications::default());
    let jobs = Arc::new(MemoryJobs::default());
    let profiles = Arc::new(MemoryProfiles::default());
    let rounds = Arc::new(MemoryTestRounds::default());
    seed_demo_jobs(&jobs);

    let scorer = scorer_from_config(&config.matching);
    let lifecycle = Arc::new(ApplicationLifecycle::new(
        applications.clone(),
        jobs.clone(),
        profiles,
        scorer,
        &config.matching,
    ));
    let gate = Arc::new(TestRoundGate::new(
        applications,
        jobs.clone(),
        rounds,
        &config.matching,
    ));

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state)
        .merge(recruiting_router(RecruitingState {
            lifecycle,
            gate,
            jobs,
        }))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "candidate matching service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Postings available out of the box so the service is explorable without
/// an HR frontend; real deployments plug in a job directory adapter.
fn seed_demo_jobs(jobs: &MemoryJobs) {
    use hireflow::recruiting::applications::HrId;

    jobs.put(JobPosting {
        id: JobId("job-1".to_string()),
        posted_by: HrId("hr-demo".to_string()),
        title: "Senior Full Stack Engineer".to_string(),
        requirements: JobRequirements {
            skills: vec![
                "React".to_string(),
                "Node.js".to_string(),
                "TypeScript".to_string(),
            ],
            description_text:
                "We are looking for a senior full stack engineer with React and Node.js experience."
                    .to_string(),
        },
        round_config: RoundConfig::default(),
        status: JobStatus::Active,
    });
    jobs.put(JobPosting {
        id: JobId("job-2".to_string()),
        posted_by: HrId("hr-demo".to_string()),
        title: "Platform Engineer".to_string(),
        requirements: JobRequirements {
            skills: vec![
                "Python".to_string(),
                "AWS".to_string(),
                "Docker".to_string(),
                "Kubernetes".to_string(),
            ],
            description_text:
                "Operate our AWS footprint and keep the Docker and Kubernetes platform healthy."
                    .to_string(),
        },
        round_config: RoundConfig::default(),
        status: JobStatus::Active,
    });
}

fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;

    let bytes = std::fs::read(&args.resume)?;
    let extractor = ResumeSignalExtractor::from_config(&config.matching);
    let document = extractor.extract_document(&bytes, &args.mime);

    let job = JobRequirements {
        skills: args
            .skills
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        description_text: args.description,
    };
    let score = WeightedFitScorer.score(
        &ScoringContext {
            student_id: "cli",
            job_id: "cli",
            signal: &document.signal,
            resume_text: Some(&document.text),
        },
        &job,
    );

    println!("Resume: {}", args.resume.display());
    if document.degraded {
        println!("(text extraction degraded, raw bytes were used)");
    }
    println!("\nExtracted signal");
    println!("- email: {}", document.signal.email.as_deref().unwrap_or("none"));
    println!("- phone: {}", document.signal.phone.as_deref().unwrap_or("none"));
    println!("- skills: {}", document.signal.skills.join(", "));
    println!("- experience: {} years", document.signal.experience_years);

    println!("\nFit against {}", job.skills.join(", "));
    println!("- fit score: {}%", score.fit_score);
    println!("- skill match: {}%", score.skill_match);
    println!("- keyword match: {}%", score.keyword_match);
    if !score.matched_skills.is_empty() {
        println!("- matched: {}", score.matched_skills.join(", "));
    }
    if !score.missing_skills.is_empty() {
        println!("- missing: {}", score.missing_skills.join(", "));
    }
    for flag in &score.flags {
        println!("- flag: {}", flag.label());
    }

    Ok(())
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
