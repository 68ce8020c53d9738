//! Domain types shared by query understanding, autosuggest and search.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::filters::FilterSet;
use crate::outcome::DegradeReason;

/// Opaque stored fields of a retrieved document.
pub type Fields = serde_json::Map<String, serde_json::Value>;

/// field -> value -> count
pub type Facets = BTreeMap<String, BTreeMap<String, u64>>;

/// Result of entity extraction over a raw query.
///
/// - `industries`/`locations`: detected category names in vocabulary order, no duplicates
/// - `cleaned_query`: query with detected keywords and stop words removed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedQuery {
    pub original_query: String,
    pub cleaned_query: String,
    pub industries: Vec<String>,
    pub locations: Vec<String>,
}

impl ParsedQuery {
    pub fn empty(original: impl Into<String>) -> Self {
        Self { original_query: original.into(), ..Self::default() }
    }

    pub fn has_industry_filters(&self) -> bool { !self.industries.is_empty() }
    pub fn has_location_filters(&self) -> bool { !self.locations.is_empty() }
    pub fn has_entities(&self) -> bool { self.has_industry_filters() || self.has_location_filters() }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionSource {
    Company,
    Industry,
    Location,
    Template,
}

impl SuggestionSource {
    pub fn as_str(self) -> &'static str {
        match self {
            SuggestionSource::Company => "company",
            SuggestionSource::Industry => "industry",
            SuggestionSource::Location => "location",
            SuggestionSource::Template => "template",
        }
    }
}

impl FromStr for SuggestionSource {
    type Err = Error;

    /// Accepts both the singular label and the plural endpoint names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "company" | "companies" => Ok(SuggestionSource::Company),
            "industry" | "industries" => Ok(SuggestionSource::Industry),
            "location" | "locations" => Ok(SuggestionSource::Location),
            "template" | "templates" => Ok(SuggestionSource::Template),
            other => Err(Error::InvalidRequest(format!("unknown suggestion source '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub text: String,
    #[serde(rename = "type")]
    pub source: SuggestionSource,
    pub score: f32,
    pub description: String,
}

impl Suggestion {
    pub fn new(
        text: impl Into<String>,
        source: SuggestionSource,
        score: f32,
        description: impl Into<String>,
    ) -> Self {
        Self { text: text.into(), source, score, description: description.into() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionBundle {
    pub all_suggestions: Vec<Suggestion>,
    pub company_names: Vec<Suggestion>,
    pub industries: Vec<Suggestion>,
    pub locations: Vec<Suggestion>,
    pub query_templates: Vec<Suggestion>,
}

impl SuggestionBundle {
    pub fn is_empty(&self) -> bool {
        self.all_suggestions.is_empty()
            && self.company_names.is_empty()
            && self.industries.is_empty()
            && self.locations.is_empty()
            && self.query_templates.is_empty()
    }

    pub fn for_source(&self, source: SuggestionSource) -> &[Suggestion] {
        match source {
            SuggestionSource::Company => &self.company_names,
            SuggestionSource::Industry => &self.industries,
            SuggestionSource::Location => &self.locations,
            SuggestionSource::Template => &self.query_templates,
        }
    }

    /// A view holding only one source, mirrored into `all_suggestions`.
    pub fn only(&self, source: SuggestionSource) -> Self {
        let picked = self.for_source(source).to_vec();
        let mut view = Self { all_suggestions: picked.clone(), ..Self::default() };
        match source {
            SuggestionSource::Company => view.company_names = picked,
            SuggestionSource::Industry => view.industries = picked,
            SuggestionSource::Location => view.locations = picked,
            SuggestionSource::Template => view.query_templates = picked,
        }
        view
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    #[default]
    Lexical,
    Semantic,
    Hybrid,
}

impl SearchMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SearchMode::Lexical => "lexical",
            SearchMode::Semantic => "semantic",
            SearchMode::Hybrid => "hybrid",
        }
    }

    /// Unrecognised names fall back to lexical.
    pub fn from_name(name: &str) -> Self { name.parse().unwrap_or_default() }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for SearchMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lexical" => Ok(SearchMode::Lexical),
            "semantic" => Ok(SearchMode::Semantic),
            "hybrid" => Ok(SearchMode::Hybrid),
            other => Err(Error::InvalidRequest(format!("unknown search mode '{other}'"))),
        }
    }
}

/// Which retrieval path a document is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    Lexical,
    Semantic,
}

/// How the engine request was actually built, after any degradation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetrievalStrategy {
    Lexical,
    Vector,
    BoostedLexical,
    VectorBoostedLexical,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RetrievedDocument {
    #[serde(flatten)]
    pub fields: Fields,
    #[serde(rename = "searchType", default, skip_serializing_if = "Option::is_none")]
    pub search_type: Option<MatchKind>,
}

impl RetrievedDocument {
    pub fn new(fields: Fields) -> Self { Self { fields, search_type: None } }

    /// Engine relevance score, 0 when the engine did not return one.
    #[allow(clippy::cast_possible_truncation)]
    pub fn score(&self) -> f32 {
        self.fields.get("score").and_then(serde_json::Value::as_f64).map_or(0.0, |s| s as f32)
    }

    pub fn id(&self) -> Option<String> { self.text("id") }

    /// A stored field rendered as text; multi-valued fields are joined with spaces.
    pub fn text(&self, field: &str) -> Option<String> {
        match self.fields.get(field)? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Array(items) => Some(
                items
                    .iter()
                    .map(|v| v.as_str().map_or_else(|| v.to_string(), str::to_string))
                    .collect::<Vec<_>>()
                    .join(" "),
            ),
            other => Some(other.to_string()),
        }
    }

    /// Drop every field whose name ends with `suffix`.
    pub fn strip_fields_ending_with(&mut self, suffix: &str) {
        self.fields.retain(|name, _| !name.ends_with(suffix));
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    pub current_page: usize,
    pub page_size: usize,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl PaginationInfo {
    pub fn new(current_page: usize, page_size: usize, total_results: u64) -> Self {
        let total_pages = if page_size == 0 { 0 } else { total_results.div_ceil(page_size as u64) };
        Self {
            current_page,
            page_size,
            total_pages,
            has_next: (current_page as u64).saturating_add(1) < total_pages,
            has_previous: current_page > 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryInfo {
    pub query: Option<String>,
    pub filters: FilterSet,
    pub sort: String,
    pub execution_time_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMetadata {
    pub search_type: SearchMode,
    pub effective_mode: RetrievalStrategy,
    pub lexical_results_count: usize,
    pub semantic_results_count: usize,
    pub total_results_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degradation: Option<DegradeReason>,
}

impl SearchMetadata {
    pub fn new(search_type: SearchMode, effective_mode: RetrievalStrategy) -> Self {
        Self {
            search_type,
            effective_mode,
            lexical_results_count: 0,
            semantic_results_count: 0,
            total_results_count: 0,
            degradation: None,
        }
    }

    /// Recount from the labels already assigned to `documents`.
    pub fn count(&mut self, documents: &[RetrievedDocument]) {
        self.lexical_results_count =
            documents.iter().filter(|d| d.search_type == Some(MatchKind::Lexical)).count();
        self.semantic_results_count =
            documents.iter().filter(|d| d.search_type == Some(MatchKind::Semantic)).count();
        self.total_results_count = documents.len();
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultPage {
    pub documents: Vec<RetrievedDocument>,
    pub total_results: u64,
    pub facets: Facets,
    pub pagination: PaginationInfo,
    pub query_info: QueryInfo,
    pub search_metadata: SearchMetadata,
    /// Large/Medium/Small employee counts, when requested on the convenience path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_size_facets: Option<BTreeMap<String, u64>>,
}
