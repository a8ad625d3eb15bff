use crate::config::PipelineConfig;
use crate::error::AppError;
use crate::workflows::price_paid::output::write_aggregate;
use crate::workflows::price_paid::{LocationSet, PricePaidPipeline, PricePaidRun};
use std::path::Path;
use tracing::info;

/// Built-in London districts unless a code list is given.
pub fn load_locations(path: Option<&Path>) -> Result<LocationSet, AppError> {
    match path {
        Some(path) => {
            let locations =
                LocationSet::from_path(path).map_err(|source| AppError::Locations {
                    path: path.to_path_buf(),
                    source,
                })?;
            info!(path = %path.display(), codes = locations.len(), "loaded location set");
            Ok(locations)
        }
        None => Ok(LocationSet::london()),
    }
}

pub fn pipeline_for(config: &PipelineConfig) -> Result<PricePaidPipeline, AppError> {
    let locations = load_locations(config.locations.as_deref())?;
    Ok(PricePaidPipeline::new(locations)
        .with_min_year(config.min_year)
        .with_headers(config.has_headers)
        .on_malformed(config.on_malformed))
}

/// Reads `config.input`, aggregates it and saves the result to `config.output`.
/// Nothing is written unless the whole input was processed.
pub fn aggregate_file(config: &PipelineConfig) -> Result<PricePaidRun, AppError> {
    let pipeline = pipeline_for(config)?;
    let run = pipeline.run_path(&config.input)?;
    write_aggregate(&config.output, &run.aggregate, config.pretty)?;
    Ok(run)
}
