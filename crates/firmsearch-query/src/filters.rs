//! Filter synthesis from detected entities and merging with caller filters.

use firmsearch_core::filters::{FilterSet, FilterValue};
use firmsearch_core::types::ParsedQuery;

use crate::synonyms;

pub const INDUSTRY_FIELD: &str = "industry";
pub const LOCATION_FIELD: &str = "location";

/// Expand detected categories into OR-lists of backend terms.
pub fn synthesize(parsed: &ParsedQuery) -> FilterSet {
    let mut filters = FilterSet::new();

    let industry: Vec<String> =
        parsed.industries.iter().flat_map(|i| synonyms::industry_terms(i)).collect();
    if !industry.is_empty() {
        filters.insert(INDUSTRY_FIELD, FilterValue::any_of(industry));
    }

    let location: Vec<String> =
        parsed.locations.iter().flat_map(|l| synonyms::location_terms(l)).collect();
    if !location.is_empty() {
        filters.insert(LOCATION_FIELD, FilterValue::any_of(location));
    }

    filters
}

/// Combine caller and inferred filters.
///
/// Lists on both sides are concatenated (caller first, duplicates kept); any other clash is
/// won by the inferred value.
pub fn merge(caller: &FilterSet, inferred: &FilterSet) -> FilterSet {
    let mut merged = caller.clone();
    for (field, value) in inferred.iter() {
        let combined = match (caller.get(field), value) {
            (Some(FilterValue::List(existing)), FilterValue::List(extra)) => {
                FilterValue::List(existing.iter().chain(extra).cloned().collect())
            }
            _ => value.clone(),
        };
        merged.insert(field.clone(), combined);
    }
    merged
}
