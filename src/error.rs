use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::price_paid::output::OutputError;
use crate::workflows::price_paid::PricePaidError;
use std::fmt;
use std::path::PathBuf;

/// Every way a run can fail. The variant names the stage that failed.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Locations {
        path: PathBuf,
        source: std::io::Error,
    },
    Ingest(PricePaidError),
    Output(OutputError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Locations { path, source } => write!(
                f,
                "location error: failed to read '{}': {}",
                path.display(),
                source
            ),
            AppError::Ingest(err) => write!(f, "ingest error: {}", err),
            AppError::Output(err) => write!(f, "output error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Locations { source, .. } => Some(source),
            AppError::Ingest(err) => Some(err),
            AppError::Output(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<PricePaidError> for AppError {
    fn from(value: PricePaidError) -> Self {
        Self::Ingest(value)
    }
}

impl From<OutputError> for AppError {
    fn from(value: OutputError) -> Self {
        Self::Output(value)
    }
}
