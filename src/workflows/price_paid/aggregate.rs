use super::domain::{Entry, PropertyAge, PropertyType};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// Nested form written to disk: district -> year -> type -> age -> prices.
pub type PostcodeYearTypeAgePrices =
    BTreeMap<String, BTreeMap<i32, BTreeMap<PropertyType, BTreeMap<PropertyAge, Vec<u64>>>>>;

type NestedView<'a> =
    BTreeMap<&'a str, BTreeMap<i32, BTreeMap<PropertyType, BTreeMap<PropertyAge, &'a [u64]>>>>;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LeafKey {
    pub location: String,
    pub year: i32,
    pub property_type: PropertyType,
    pub property_age: PropertyAge,
}

impl LeafKey {
    fn for_entry(entry: &Entry) -> Self {
        Self {
            location: entry.primary_location.clone(),
            year: entry.year(),
            property_type: entry.property_type,
            property_age: entry.property_age,
        }
    }
}

/// Prices grouped by district, year, property type and age.
///
/// Groups live in one flat map keyed by [`LeafKey`]; the nested shape only exists
/// when the aggregate is rendered. Prices within a group keep the order in which
/// entries were folded in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceAggregate {
    leaves: BTreeMap<LeafKey, Vec<u64>>,
}

impl PriceAggregate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: &Entry) {
        self.leaves
            .entry(LeafKey::for_entry(entry))
            .or_default()
            .push(entry.price);
    }

    pub fn prices(
        &self,
        location: &str,
        year: i32,
        property_type: PropertyType,
        property_age: PropertyAge,
    ) -> Option<&[u64]> {
        let key = LeafKey {
            location: location.to_owned(),
            year,
            property_type,
            property_age,
        };
        self.leaves.get(&key).map(Vec::as_slice)
    }

    pub fn leaves(&self) -> impl Iterator<Item = (&LeafKey, &[u64])> {
        self.leaves.iter().map(|(key, prices)| (key, prices.as_slice()))
    }

    /// Number of groups, not prices.
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    pub fn price_count(&self) -> usize {
        self.leaves.values().map(Vec::len).sum()
    }

    pub fn to_nested(&self) -> PostcodeYearTypeAgePrices {
        let mut nested = PostcodeYearTypeAgePrices::new();
        for (key, prices) in &self.leaves {
            nested
                .entry(key.location.clone())
                .or_default()
                .entry(key.year)
                .or_default()
                .entry(key.property_type)
                .or_default()
                .insert(key.property_age, prices.clone());
        }
        nested
    }

    /// Empty price lists are dropped; every group in an aggregate holds at least one price.
    pub fn from_nested(nested: PostcodeYearTypeAgePrices) -> Self {
        let mut leaves = BTreeMap::new();
        for (location, years) in nested {
            for (year, types) in years {
                for (property_type, ages) in types {
                    for (property_age, prices) in ages {
                        if prices.is_empty() {
                            continue;
                        }
                        let key = LeafKey {
                            location: location.clone(),
                            year,
                            property_type,
                            property_age,
                        };
                        leaves.insert(key, prices);
                    }
                }
            }
        }
        Self { leaves }
    }

    fn nested_view(&self) -> NestedView<'_> {
        let mut nested = NestedView::new();
        for (key, prices) in &self.leaves {
            nested
                .entry(key.location.as_str())
                .or_default()
                .entry(key.year)
                .or_default()
                .entry(key.property_type)
                .or_default()
                .insert(key.property_age, prices.as_slice());
        }
        nested
    }
}

/// Single ordered pass over already filtered entries.
pub fn aggregate<I>(entries: I) -> PriceAggregate
where
    I: IntoIterator<Item = Entry>,
{
    entries.into_iter().collect()
}

impl FromIterator<Entry> for PriceAggregate {
    fn from_iter<T: IntoIterator<Item = Entry>>(iter: T) -> Self {
        let mut aggregate = Self::new();
        for entry in iter {
            aggregate.push(&entry);
        }
        aggregate
    }
}

impl Serialize for PriceAggregate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.nested_view().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PriceAggregate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        PostcodeYearTypeAgePrices::deserialize(deserializer).map(Self::from_nested)
    }
}
