use super::domain::{Entry, PropertyAge, PropertyType, TransferDuration};
use super::parser::RawRecord;
use chrono::NaiveDateTime;
use std::fmt;
use std::num::ParseIntError;

pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug)]
pub enum ClassifyError {
    MissingField {
        index: usize,
        found: usize,
    },
    InvalidPrice {
        value: String,
        source: ParseIntError,
    },
    InvalidDate {
        value: String,
        source: chrono::ParseError,
    },
}

impl fmt::Display for ClassifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassifyError::MissingField { index, found } => write!(
                f,
                "record has {} fields, column {} is required",
                found, index
            ),
            ClassifyError::InvalidPrice { value, .. } => {
                write!(f, "price '{}' is not a whole number", value)
            }
            ClassifyError::InvalidDate { value, .. } => {
                write!(f, "date '{}' does not match YYYY-MM-DD hh:mm", value)
            }
        }
    }
}

impl std::error::Error for ClassifyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClassifyError::MissingField { .. } => None,
            ClassifyError::InvalidPrice { source, .. } => Some(source),
            ClassifyError::InvalidDate { source, .. } => Some(source),
        }
    }
}

/// Turns raw fields into an [`Entry`]. Only the price and date can fail; the
/// categorical codes always resolve to some category.
pub fn classify(raw: &RawRecord) -> Result<Entry, ClassifyError> {
    let price = raw
        .price
        .parse::<u64>()
        .map_err(|source| ClassifyError::InvalidPrice {
            value: raw.price.clone(),
            source,
        })?;

    let date = NaiveDateTime::parse_from_str(&raw.date_time, DATE_TIME_FORMAT).map_err(
        |source| ClassifyError::InvalidDate {
            value: raw.date_time.clone(),
            source,
        },
    )?;

    let (primary_location, secondary_location) = split_location(&raw.location);

    Ok(Entry {
        price,
        date,
        primary_location: primary_location.to_owned(),
        secondary_location: secondary_location.to_owned(),
        property_type: PropertyType::from_code(&raw.property_type),
        property_age: PropertyAge::from_code(&raw.property_age),
        transfer_duration: TransferDuration::from_code(&raw.duration),
    })
}

/// Splits on single spaces. Tokens past the second are dropped.
pub(crate) fn split_location(location: &str) -> (&str, &str) {
    let mut parts = location.split(' ');
    let primary = parts.next().unwrap_or_default();
    let secondary = parts.next().unwrap_or_default();
    (primary, secondary)
}
