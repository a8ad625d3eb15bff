use super::classifier::ClassifyError;
use csv::StringRecord;
use std::io::Read;

const PRICE_COLUMN: usize = 1;
const DATE_COLUMN: usize = 2;
const LOCATION_COLUMN: usize = 3;
const PROPERTY_TYPE_COLUMN: usize = 4;
const PROPERTY_AGE_COLUMN: usize = 5;
const DURATION_COLUMN: usize = 6;

/// Fields of one source line, before any interpretation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    pub line: u64,
    pub price: String,
    pub date_time: String,
    pub location: String,
    pub property_type: String,
    pub property_age: String,
    pub duration: String,
}

impl RawRecord {
    pub(crate) fn from_csv(record: &StringRecord) -> Result<Self, ClassifyError> {
        let line = record.position().map(|pos| pos.line()).unwrap_or_default();
        let field = |index: usize| {
            record
                .get(index)
                .map(str::to_owned)
                .ok_or(ClassifyError::MissingField {
                    index,
                    found: record.len(),
                })
        };

        Ok(Self {
            line,
            price: field(PRICE_COLUMN)?,
            date_time: field(DATE_COLUMN)?,
            location: field(LOCATION_COLUMN)?,
            property_type: field(PROPERTY_TYPE_COLUMN)?,
            property_age: field(PROPERTY_AGE_COLUMN)?,
            duration: field(DURATION_COLUMN)?,
        })
    }
}

/// Land Registry exports carry no header row and a variable number of trailing
/// columns, so the reader is flexible about record length.
pub(crate) fn csv_reader<R: Read>(reader: R, has_headers: bool) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(has_headers)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
}
