use std::collections::{BTreeMap, HashMap};

use firmsearch_core::types::Fields;
use serde::Deserialize;

/// Body of a `select` answer. A body without `response` is rejected as malformed.
#[derive(Debug, Clone, Deserialize)]
pub struct SelectResponse {
    pub response: DocList,
    #[serde(default)]
    pub facet_counts: FacetCounts,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocList {
    #[serde(rename = "numFound", default)]
    pub num_found: u64,
    #[serde(default)]
    pub docs: Vec<Fields>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FacetCounts {
    /// Flat `[value, count, value, count, ...]` arrays per field.
    #[serde(default)]
    pub facet_fields: HashMap<String, Vec<serde_json::Value>>,
    #[serde(default)]
    pub facet_queries: HashMap<String, u64>,
}

impl FacetCounts {
    /// Value/count pairs for `field` in engine order; malformed pairs are skipped.
    pub fn pairs(&self, field: &str) -> Vec<(String, u64)> {
        self.facet_fields
            .get(field)
            .map(|flat| {
                flat.chunks_exact(2)
                    .filter_map(|pair| Some((pair[0].as_str()?.to_string(), pair[1].as_u64()?)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Every field as `value -> count`.
    pub fn to_map(&self) -> BTreeMap<String, BTreeMap<String, u64>> {
        self.facet_fields.keys().map(|field| (field.clone(), self.pairs(field).into_iter().collect())).collect()
    }

    pub fn query_count(&self, query: &str) -> u64 { self.facet_queries.get(query).copied().unwrap_or(0) }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SuggestResponse {
    /// dictionary -> query -> group
    #[serde(default)]
    pub suggest: HashMap<String, HashMap<String, SuggestGroup>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SuggestGroup {
    #[serde(rename = "numFound", default)]
    pub num_found: u64,
    #[serde(default)]
    pub suggestions: Vec<SuggestTerm>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SuggestTerm {
    pub term: String,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub payload: String,
}

impl SuggestResponse {
    /// Terms for `query` in `dictionary`; falls back to the dictionary's only group.
    pub fn terms(&self, dictionary: &str, query: &str) -> &[SuggestTerm] {
        let Some(groups) = self.suggest.get(dictionary) else { return &[] };
        groups
            .get(query)
            .or_else(|| if groups.len() == 1 { groups.values().next() } else { None })
            .map(|g| g.suggestions.as_slice())
            .unwrap_or_default()
    }
}
