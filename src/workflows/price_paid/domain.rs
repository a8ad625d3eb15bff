use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PropertyType {
    Detached,
    SemiDetached,
    Terraced,
    Flat,
    Other,
}

impl PropertyType {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Detached,
            Self::SemiDetached,
            Self::Terraced,
            Self::Flat,
            Self::Other,
        ]
    }

    /// Unknown codes fall back to `Other`, e.g. a sale covering several large parcels of land.
    pub fn from_code(code: &str) -> Self {
        match code {
            "D" => Self::Detached,
            "S" => Self::SemiDetached,
            "T" => Self::Terraced,
            "F" => Self::Flat,
            _ => Self::Other,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Detached => "Detached",
            Self::SemiDetached => "SemiDetached",
            Self::Terraced => "Terraced",
            Self::Flat => "Flat",
            Self::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PropertyAge {
    New,
    Old,
}

impl PropertyAge {
    pub const fn ordered() -> [Self; 2] {
        [Self::New, Self::Old]
    }

    pub fn from_code(code: &str) -> Self {
        match code {
            "Y" => Self::New,
            _ => Self::Old,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Old => "Old",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TransferDuration {
    Freehold,
    Leasehold,
}

impl TransferDuration {
    pub const fn ordered() -> [Self; 2] {
        [Self::Freehold, Self::Leasehold]
    }

    /// Leases of seven years or less never reach the dataset, so anything that is
    /// not `F` is treated as leasehold.
    pub fn from_code(code: &str) -> Self {
        match code {
            "F" => Self::Freehold,
            _ => Self::Leasehold,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Freehold => "Freehold",
            Self::Leasehold => "Leasehold",
        }
    }
}

/// A single sale after classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub price: u64,
    pub date: NaiveDateTime,
    /// Postcode district. Districts can be reallocated and the dataset does not
    /// reflect those changes.
    pub primary_location: String,
    pub secondary_location: String,
    pub property_type: PropertyType,
    pub property_age: PropertyAge,
    pub transfer_duration: TransferDuration,
}

impl Entry {
    pub fn year(&self) -> i32 {
        self.date.year()
    }
}
