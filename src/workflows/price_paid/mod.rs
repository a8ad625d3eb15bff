mod aggregate;
mod classifier;
pub mod domain;
mod eligibility;
mod locations;
pub mod output;
mod parser;

pub use aggregate::{aggregate, LeafKey, PostcodeYearTypeAgePrices, PriceAggregate};
pub use classifier::{classify, ClassifyError, DATE_TIME_FORMAT};
pub use domain::{Entry, PropertyAge, PropertyType, TransferDuration};
pub use eligibility::{is_eligible, DEFAULT_MIN_YEAR};
pub use locations::LocationSet;
pub use parser::RawRecord;

use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// What to do with a record whose price, date or column count is unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedRecordPolicy {
    /// Stop the run at the first malformed record.
    #[default]
    Abort,
    /// Log and count the record, then carry on.
    Skip,
}

impl MalformedRecordPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "abort" | "fail" => Some(Self::Abort),
            "skip" => Some(Self::Skip),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum PricePaidError {
    Open { path: PathBuf, source: std::io::Error },
    Csv(csv::Error),
    Record { line: u64, source: ClassifyError },
}

impl fmt::Display for PricePaidError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PricePaidError::Open { path, source } => {
                write!(f, "failed to open '{}': {}", path.display(), source)
            }
            PricePaidError::Csv(err) => write!(f, "invalid price paid CSV data: {}", err),
            PricePaidError::Record { line, source } => {
                write!(f, "malformed record on line {}: {}", line, source)
            }
        }
    }
}

impl std::error::Error for PricePaidError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PricePaidError::Open { source, .. } => Some(source),
            PricePaidError::Csv(err) => Some(err),
            PricePaidError::Record { source, .. } => Some(source),
        }
    }
}

impl From<csv::Error> for PricePaidError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Counters collected while reading the source file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub records_read: u64,
    pub eligible: u64,
    pub dropped: u64,
    pub skipped_malformed: u64,
}

#[derive(Debug)]
pub struct PricePaidRun {
    pub aggregate: PriceAggregate,
    pub stats: IngestStats,
}

/// Reads, classifies, filters and groups a price paid export.
#[derive(Debug, Clone)]
pub struct PricePaidPipeline {
    locations: LocationSet,
    min_year: i32,
    has_headers: bool,
    on_malformed: MalformedRecordPolicy,
}

impl PricePaidPipeline {
    pub fn new(locations: LocationSet) -> Self {
        Self {
            locations,
            min_year: DEFAULT_MIN_YEAR,
            has_headers: false,
            on_malformed: MalformedRecordPolicy::Abort,
        }
    }

    pub fn with_min_year(mut self, min_year: i32) -> Self {
        self.min_year = min_year;
        self
    }

    pub fn with_headers(mut self, has_headers: bool) -> Self {
        self.has_headers = has_headers;
        self
    }

    pub fn on_malformed(mut self, policy: MalformedRecordPolicy) -> Self {
        self.on_malformed = policy;
        self
    }

    pub fn locations(&self) -> &LocationSet {
        &self.locations
    }

    pub fn min_year(&self) -> i32 {
        self.min_year
    }

    pub fn run_path<P: AsRef<Path>>(&self, path: P) -> Result<PricePaidRun, PricePaidError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| PricePaidError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "parsing CSV file and filtering entries");
        self.run_reader(file)
    }

    pub fn run_reader<R: Read>(&self, reader: R) -> Result<PricePaidRun, PricePaidError> {
        let (mut entries, stats) = self.eligible_entries(reader)?;
        info!(
            records = stats.records_read,
            eligible = stats.eligible,
            dropped = stats.dropped,
            skipped = stats.skipped_malformed,
            "filtered entries"
        );

        debug!("sorting entries by year");
        // Stable, so same-year entries keep file order inside each group.
        entries.sort_by_key(Entry::year);

        debug!("grouping entries");
        let aggregate = aggregate(entries);
        info!(
            groups = aggregate.len(),
            prices = aggregate.price_count(),
            "grouped entries"
        );

        Ok(PricePaidRun { aggregate, stats })
    }

    fn eligible_entries<R: Read>(
        &self,
        reader: R,
    ) -> Result<(Vec<Entry>, IngestStats), PricePaidError> {
        let mut csv_reader = parser::csv_reader(reader, self.has_headers);
        let mut stats = IngestStats::default();
        let mut entries = Vec::new();

        for record in csv_reader.records() {
            let record = record?;
            stats.records_read += 1;

            let entry = match RawRecord::from_csv(&record).and_then(|raw| classify(&raw)) {
                Ok(entry) => entry,
                Err(source) => {
                    let line = record.position().map(|pos| pos.line()).unwrap_or_default();
                    match self.on_malformed {
                        MalformedRecordPolicy::Abort => {
                            return Err(PricePaidError::Record { line, source })
                        }
                        MalformedRecordPolicy::Skip => {
                            warn!(line, error = %source, "skipping malformed record");
                            stats.skipped_malformed += 1;
                            continue;
                        }
                    }
                }
            };

            if is_eligible(&entry, &self.locations, self.min_year) {
                stats.eligible += 1;
                entries.push(entry);
            } else {
                stats.dropped += 1;
            }
        }

        Ok((entries, stats))
    }
}
