use crate::config::{AppConfig, PipelineConfig};
use crate::error::AppError;
use crate::runner::{aggregate_file, load_locations};
use crate::telemetry;
use crate::workflows::price_paid::MalformedRecordPolicy;
use clap::{Args, Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "price-paid",
    about = "Group Land Registry price paid records by district, year, property type and age",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Aggregate a price paid export into a JSON file (default command)
    Aggregate(AggregateArgs),
    /// Print the postcode districts entries are filtered against
    Locations(LocationsArgs),
}

#[derive(Args, Debug, Default)]
struct AggregateArgs {
    /// Price paid CSV export to read
    #[arg(long)]
    input: Option<PathBuf>,
    /// Destination for the JSON aggregate
    #[arg(long)]
    output: Option<PathBuf>,
    /// Earliest sale year to include
    #[arg(long)]
    min_year: Option<i32>,
    /// File of postcode districts, one per line, replacing the London defaults
    #[arg(long)]
    locations: Option<PathBuf>,
    /// Treat the first line of the input as a header row
    #[arg(long)]
    has_headers: bool,
    /// Log and skip records with an unusable price, date or column count
    #[arg(long)]
    skip_malformed: bool,
    /// Write JSON without indentation
    #[arg(long)]
    compact: bool,
}

impl AggregateArgs {
    fn apply(self, config: &mut PipelineConfig) {
        if let Some(input) = self.input {
            config.input = input;
        }
        if let Some(output) = self.output {
            config.output = output;
        }
        if let Some(min_year) = self.min_year {
            config.min_year = min_year;
        }
        if let Some(locations) = self.locations {
            config.locations = Some(locations);
        }
        if self.has_headers {
            config.has_headers = true;
        }
        if self.skip_malformed {
            config.on_malformed = MalformedRecordPolicy::Skip;
        }
        if self.compact {
            config.pretty = false;
        }
    }
}

#[derive(Args, Debug, Default)]
struct LocationsArgs {
    /// File of postcode districts to print instead of the London defaults
    #[arg(long)]
    locations: Option<PathBuf>,
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Aggregate(AggregateArgs::default()));

    match command {
        Command::Aggregate(args) => run_aggregate(args),
        Command::Locations(args) => run_locations(args),
    }
}

fn run_aggregate(args: AggregateArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    args.apply(&mut config.pipeline);

    telemetry::init(&config.telemetry)?;

    let pipeline = &config.pipeline;
    info!(
        ?config.environment,
        input = %pipeline.input.display(),
        output = %pipeline.output.display(),
        min_year = pipeline.min_year,
        "price paid aggregation starting"
    );

    let run = aggregate_file(pipeline)?;
    info!(
        records = run.stats.records_read,
        eligible = run.stats.eligible,
        groups = run.aggregate.len(),
        "aggregate saved"
    );
    Ok(())
}

fn run_locations(args: LocationsArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    if let Some(locations) = args.locations {
        config.pipeline.locations = Some(locations);
    }

    telemetry::init(&config.telemetry)?;

    let locations = load_locations(config.pipeline.locations.as_deref())?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for code in locations.iter() {
        writeln!(out, "{code}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn pipeline_config() -> PipelineConfig {
        PipelineConfig {
            input: PathBuf::from("pp-complete.csv"),
            output: PathBuf::from("stats.json"),
            locations: None,
            min_year: 2015,
            has_headers: false,
            on_malformed: MalformedRecordPolicy::Abort,
            pretty: true,
        }
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn aggregate_is_the_default_command() {
        let cli = Cli::try_parse_from(["price-paid"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn aggregate_flags_override_config() {
        let cli = Cli::try_parse_from([
            "price-paid",
            "aggregate",
            "--input",
            "data/pp-2019.csv",
            "--output",
            "out/london.json",
            "--min-year",
            "2019",
            "--skip-malformed",
            "--compact",
        ])
        .expect("parses");

        let Some(Command::Aggregate(args)) = cli.command else {
            panic!("expected aggregate command");
        };
        let mut config = pipeline_config();
        args.apply(&mut config);

        assert_eq!(config.input, PathBuf::from("data/pp-2019.csv"));
        assert_eq!(config.output, PathBuf::from("out/london.json"));
        assert_eq!(config.min_year, 2019);
        assert_eq!(config.on_malformed, MalformedRecordPolicy::Skip);
        assert!(!config.pretty);
        assert!(!config.has_headers);
        assert!(config.locations.is_none());
    }

    #[test]
    fn absent_flags_leave_config_untouched() {
        let mut config = pipeline_config();
        config.has_headers = true;
        AggregateArgs::default().apply(&mut config);

        assert!(config.has_headers);
        assert!(config.pretty);
        assert_eq!(config.min_year, 2015);
        assert_eq!(config.on_malformed, MalformedRecordPolicy::Abort);
    }
}
