use crate::workflows::price_paid::{MalformedRecordPolicy, DEFAULT_MIN_YEAR};
use std::env;
use std::fmt;
use std::path::PathBuf;

/// Distinguishes runtime behavior for different stages of the tool.
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
    pub pipeline: PipelineConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("PRICE_PAID_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let input = env::var("PRICE_PAID_INPUT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("pp-complete.csv"));
        let output = env::var("PRICE_PAID_OUTPUT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("stats.json"));
        let locations = env::var("PRICE_PAID_LOCATIONS").ok().map(PathBuf::from);

        let min_year = match env::var("PRICE_PAID_MIN_YEAR") {
            Ok(value) => value
                .trim()
                .parse::<i32>()
                .map_err(|_| ConfigError::InvalidMinYear(value))?,
            Err(_) => DEFAULT_MIN_YEAR,
        };

        let has_headers = bool_var("PRICE_PAID_HAS_HEADERS", false)?;
        let pretty = bool_var("PRICE_PAID_PRETTY", true)?;

        let on_malformed = match env::var("PRICE_PAID_ON_MALFORMED") {
            Ok(value) => MalformedRecordPolicy::parse(&value)
                .ok_or(ConfigError::InvalidMalformedPolicy(value))?,
            Err(_) => MalformedRecordPolicy::Abort,
        };

        let log_level = env::var("PRICE_PAID_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            pipeline: PipelineConfig {
                input,
                output,
                locations,
                min_year,
                has_headers,
                on_malformed,
                pretty,
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

fn bool_var(name: &'static str, default: bool) -> Result<bool, ConfigError> {
    let Ok(value) = env::var(name) else {
        return Ok(default);
    };

    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag { name, value }),
    }
}

/// Where to read from and write to, and how to treat the records in between.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Replaces the built-in London districts when set.
    pub locations: Option<PathBuf>,
    pub min_year: i32,
    pub has_headers: bool,
    pub on_malformed: MalformedRecordPolicy,
    pub pretty: bool,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidMinYear(String),
    InvalidFlag { name: &'static str, value: String },
    InvalidMalformedPolicy(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidMinYear(value) => {
                write!(f, "PRICE_PAID_MIN_YEAR must be a year, got '{}'", value)
            }
            ConfigError::InvalidFlag { name, value } => {
                write!(f, "{} must be true or false, got '{}'", name, value)
            }
            ConfigError::InvalidMalformedPolicy(value) => write!(
                f,
                "PRICE_PAID_ON_MALFORMED must be 'abort' or 'skip', got '{}'",
                value
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
