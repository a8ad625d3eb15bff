use super::domain::{Entry, TransferDuration};
use super::locations::LocationSet;

pub const DEFAULT_MIN_YEAR: i32 = 2015;

/// An entry is kept when it has a district, was sold in or after `min_year`, is
/// freehold and its district is in `locations`. Cheap checks run first.
pub fn is_eligible(entry: &Entry, locations: &LocationSet, min_year: i32) -> bool {
    !entry.primary_location.is_empty()
        && entry.year() >= min_year
        && entry.transfer_duration == TransferDuration::Freehold
        && locations.contains(&entry.primary_location)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::price_paid::domain::{PropertyAge, PropertyType};
    use chrono::NaiveDate;

    fn entry(location: &str, year: i32, duration: TransferDuration) -> Entry {
        Entry {
            price: 250_000,
            date: NaiveDate::from_ymd_opt(year, 6, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            primary_location: location.to_string(),
            secondary_location: String::new(),
            property_type: PropertyType::Terraced,
            property_age: PropertyAge::Old,
            transfer_duration: duration,
        }
    }

    #[test]
    fn eligible_when_every_condition_holds() {
        let locations = LocationSet::london();
        assert!(is_eligible(
            &entry("SW1", 2016, TransferDuration::Freehold),
            &locations,
            DEFAULT_MIN_YEAR
        ));
    }

    #[test]
    fn each_condition_flips_eligibility_on_its_own() {
        let locations = LocationSet::london();

        let empty = entry("", 2016, TransferDuration::Freehold);
        assert!(!is_eligible(&empty, &locations, DEFAULT_MIN_YEAR));

        let too_old = entry("SW1", 2014, TransferDuration::Freehold);
        assert!(!is_eligible(&too_old, &locations, DEFAULT_MIN_YEAR));

        let leasehold = entry("SW1", 2016, TransferDuration::Leasehold);
        assert!(!is_eligible(&leasehold, &locations, DEFAULT_MIN_YEAR));

        let outside = entry("ZZ99", 2016, TransferDuration::Freehold);
        assert!(!is_eligible(&outside, &locations, DEFAULT_MIN_YEAR));
    }

    #[test]
    fn year_threshold_is_inclusive() {
        let locations = LocationSet::london();
        let at = entry("E1", DEFAULT_MIN_YEAR, TransferDuration::Freehold);
        let before = entry("E1", DEFAULT_MIN_YEAR - 1, TransferDuration::Freehold);

        assert!(is_eligible(&at, &locations, DEFAULT_MIN_YEAR));
        assert!(!is_eligible(&before, &locations, DEFAULT_MIN_YEAR));
    }

    #[test]
    fn empty_location_is_excluded_even_if_set_contains_empty_code() {
        let locations = LocationSet::new(["", "E1"]);
        let empty = entry("", 2020, TransferDuration::Freehold);
        assert!(!is_eligible(&empty, &locations, DEFAULT_MIN_YEAR));
    }
}
