mod cli;
pub mod config;
pub mod error;
pub mod runner;
pub mod telemetry;
pub mod workflows;

use error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
