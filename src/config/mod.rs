use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub matching: MatchingConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            matching: MatchingConfig::load()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Which fit-scoring strategy the service runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScorerKind {
    /// Canonical weighted skill/keyword blend.
    Weighted,
    /// Deterministic hash-based generator for demos and fixtures.
    Demo,
}

impl ScorerKind {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "weighted" => Ok(Self::Weighted),
            "demo" => Ok(Self::Demo),
            other => Err(ConfigError::UnknownScorer {
                value: other.to_string(),
            }),
        }
    }
}

/// The reference skill vocabulary screened resumes are matched against.
pub const DEFAULT_SKILL_VOCABULARY: &[&str] = &[
    "JavaScript",
    "TypeScript",
    "React",
    "Node.js",
    "Python",
    "Java",
    "C++",
    "AWS",
    "Docker",
    "Kubernetes",
    "SQL",
    "NoSQL",
    "MongoDB",
];

const DEFAULT_SENIORITY_MARKERS: &[&str] = &["Senior", "Lead"];

/// Tunables for the matching engine: extraction heuristics, scorer
/// selection, and the test-assignment gate.
#[derive(Debug, Clone)]
pub struct MatchingConfig {
    pub skill_vocabulary: Vec<String>,
    pub resume_min_bytes: usize,
    pub resume_max_bytes: usize,
    pub baseline_experience_years: u8,
    pub senior_experience_years: u8,
    pub seniority_markers: Vec<String>,
    pub scorer: ScorerKind,
    pub test_score_threshold: u8,
    pub demo_score_floor: u8,
    pub demo_score_ceiling: u8,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            skill_vocabulary: DEFAULT_SKILL_VOCABULARY
                .iter()
                .map(|s| s.to_string())
                .collect(),
            resume_min_bytes: 30 * 1024,
            resume_max_bytes: 50 * 1024,
            baseline_experience_years: 2,
            senior_experience_years: 5,
            seniority_markers: DEFAULT_SENIORITY_MARKERS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            scorer: ScorerKind::Weighted,
            test_score_threshold: 60,
            demo_score_floor: 45,
            demo_score_ceiling: 95,
        }
    }
}

impl MatchingConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(raw) = env::var("APP_SKILL_VOCABULARY") {
            let vocabulary: Vec<String> = raw
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if !vocabulary.is_empty() {
                config.skill_vocabulary = vocabulary;
            }
        }

        if let Ok(raw) = env::var("APP_RESUME_MIN_BYTES") {
            config.resume_min_bytes = parse_env(&raw, "APP_RESUME_MIN_BYTES")?;
        }
        if let Ok(raw) = env::var("APP_RESUME_MAX_BYTES") {
            config.resume_max_bytes = parse_env(&raw, "APP_RESUME_MAX_BYTES")?;
        }
        if config.resume_min_bytes > config.resume_max_bytes {
            return Err(ConfigError::InvalidResumeBand {
                min: config.resume_min_bytes,
                max: config.resume_max_bytes,
            });
        }

        if let Ok(raw) = env::var("APP_SCORER") {
            config.scorer = ScorerKind::parse(&raw)?;
        }
        if let Ok(raw) = env::var("APP_TEST_SCORE_THRESHOLD") {
            config.test_score_threshold = parse_env(&raw, "APP_TEST_SCORE_THRESHOLD")?;
        }
        if let Ok(raw) = env::var("APP_DEMO_SCORE_FLOOR") {
            config.demo_score_floor = parse_env(&raw, "APP_DEMO_SCORE_FLOOR")?;
        }
        if let Ok(raw) = env::var("APP_DEMO_SCORE_CEILING") {
            config.demo_score_ceiling = parse_env(&raw, "APP_DEMO_SCORE_CEILING")?;
        }
        if config.demo_score_floor > config.demo_score_ceiling {
            return Err(ConfigError::InvalidScoreBounds {
                floor: config.demo_score_floor,
                ceiling: config.demo_score_ceiling,
            });
        }

        Ok(config)
    }
}

fn parse_env<T: std::str::FromStr>(raw: &str, var: &'static str) -> Result<T, ConfigError> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| ConfigError::InvalidNumber { var })
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { var: &'static str },
    InvalidResumeBand { min: usize, max: usize },
    InvalidScoreBounds { floor: u8, ceiling: u8 },
    UnknownScorer { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { var } => {
                write!(f, "{var} must be a non-negative number")
            }
            ConfigError::InvalidResumeBand { min, max } => {
                write!(f, "resume size band is inverted (min {min} > max {max})")
            }
            ConfigError::InvalidScoreBounds { floor, ceiling } => {
                write!(f, "demo score bounds are inverted (floor {floor} > ceiling {ceiling})")
            }
            ConfigError::UnknownScorer { value } => {
                write!(f, "APP_SCORER must be 'weighted' or 'demo', got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
