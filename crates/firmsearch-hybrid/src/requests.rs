use firmsearch_core::filters::{FilterSet, FilterValue, RangeBounds, ScalarValue};
use firmsearch_core::types::SearchMode;
use firmsearch_text::{FilterClause, SortSpec};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Mode-aware search over free text plus structured filters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComprehensiveSearchRequest {
    pub query: Option<String>,
    pub filters: FilterSet,
    pub facet_fields: Vec<String>,
    pub sort_field: Option<String>,
    pub sort_direction: Option<String>,
    pub page: usize,
    pub page_size: usize,
    pub return_fields: Vec<String>,
    /// `lexical`, `semantic` or `hybrid`; anything else is lexical.
    pub search_type: Option<String>,
}

impl Default for ComprehensiveSearchRequest {
    fn default() -> Self {
        Self {
            query: None,
            filters: FilterSet::new(),
            facet_fields: Vec::new(),
            sort_field: None,
            sort_direction: None,
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
            return_fields: Vec::new(),
            search_type: None,
        }
    }
}

impl ComprehensiveSearchRequest {
    pub fn new(query: impl Into<String>) -> Self { Self { query: Some(query.into()), ..Self::default() } }

    pub fn mode(&self) -> SearchMode { self.search_type.as_deref().map_or(SearchMode::Lexical, SearchMode::from_name) }

    pub fn with_mode(mut self, mode: SearchMode) -> Self {
        self.search_type = Some(mode.as_str().to_string());
        self
    }

    /// `None` when no sort field was given; the engine then ranks by relevance.
    pub fn sort(&self) -> Option<SortSpec> {
        let field = self.sort_field.as_deref().map(str::trim).filter(|f| !f.is_empty())?;
        Some(SortSpec::parse(field, self.sort_direction.as_deref()))
    }
}

/// Company size buckets over an employee-count field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompanySize {
    Large,
    Medium,
    Small,
}

impl CompanySize {
    pub const ALL: [CompanySize; 3] = [CompanySize::Large, CompanySize::Medium, CompanySize::Small];

    pub fn label(self) -> &'static str {
        match self {
            CompanySize::Large => "Large",
            CompanySize::Medium => "Medium",
            CompanySize::Small => "Small",
        }
    }

    /// Exact labels only; unknown buckets are ignored by callers.
    pub fn from_label(label: &str) -> Option<Self> { Self::ALL.into_iter().find(|s| s.label() == label) }

    pub fn bounds(self) -> (Option<i64>, Option<i64>) {
        match self {
            CompanySize::Large => (Some(10_001), None),
            CompanySize::Medium => (Some(1_000), Some(10_000)),
            CompanySize::Small => (None, Some(999)),
        }
    }

    pub fn clause(self, field: &str) -> FilterClause {
        let (from, to) = self.bounds();
        FilterClause::range(field, from, to)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexicalSort {
    Name,
    Size,
    Relevance,
}

impl LexicalSort {
    pub fn from_name(name: &str) -> Self {
        match name {
            "name" => LexicalSort::Name,
            "size" => LexicalSort::Size,
            _ => LexicalSort::Relevance,
        }
    }

    pub fn spec(self) -> SortSpec {
        match self {
            LexicalSort::Name => SortSpec::asc("name_sort"),
            LexicalSort::Size => SortSpec::desc("employees_count"),
            LexicalSort::Relevance => SortSpec::desc("score"),
        }
    }
}

/// The lexical convenience search: fixed filter fields, no query understanding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LexicalSearchRequest {
    pub query: Option<String>,
    pub industry: Vec<String>,
    /// `Large`, `Medium`, `Small`; other labels are ignored.
    pub size: Vec<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub founding_year_from: Option<i64>,
    pub founding_year_to: Option<i64>,
    pub tags: Vec<String>,
    pub sort: Option<String>,
    pub page: usize,
    pub page_size: usize,
    pub facet_fields: Vec<String>,
    pub facet_limit: Option<i64>,
}

impl Default for LexicalSearchRequest {
    fn default() -> Self {
        Self {
            query: None,
            industry: Vec::new(),
            size: Vec::new(),
            country: None,
            city: None,
            founding_year_from: None,
            founding_year_to: None,
            tags: Vec::new(),
            sort: None,
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
            facet_fields: Vec::new(),
            facet_limit: Some(10),
        }
    }
}

impl LexicalSearchRequest {
    pub fn sizes(&self) -> Vec<CompanySize> { self.size.iter().filter_map(|s| CompanySize::from_label(s)).collect() }

    /// Engine filter clauses, one per populated criterion.
    pub fn clauses(&self) -> Vec<FilterClause> {
        let mut clauses = Vec::new();
        if !self.industry.is_empty() {
            clauses.push(any_of("industry", &self.industry));
        }
        let sizes: Vec<FilterClause> = self.sizes().into_iter().map(|s| s.clause("employees_count")).collect();
        if !sizes.is_empty() {
            clauses.push(FilterClause::Either(sizes));
        }
        if let Some(country) = &self.country {
            clauses.push(FilterClause::Equals { field: "country".into(), value: country.as_str().into() });
        }
        if let Some(city) = &self.city {
            clauses.push(FilterClause::Equals { field: "city".into(), value: city.as_str().into() });
        }
        if self.founding_year_from.is_some() || self.founding_year_to.is_some() {
            clauses.push(FilterClause::range("foundingYear", self.founding_year_from, self.founding_year_to));
        }
        if !self.tags.is_empty() {
            clauses.push(any_of("tags", &self.tags));
        }
        clauses
    }

    /// The same criteria as a filter set, for echoing back in query info.
    pub fn filter_set(&self) -> FilterSet {
        let mut filters = FilterSet::new();
        if !self.industry.is_empty() {
            filters.insert("industry", FilterValue::any_of(self.industry.clone()));
        }
        if !self.size.is_empty() {
            filters.insert("size", FilterValue::any_of(self.size.clone()));
        }
        if let Some(country) = &self.country {
            filters.insert("country", FilterValue::Scalar(country.as_str().into()));
        }
        if let Some(city) = &self.city {
            filters.insert("city", FilterValue::Scalar(city.as_str().into()));
        }
        if self.founding_year_from.is_some() || self.founding_year_to.is_some() {
            let bounds = RangeBounds {
                from: self.founding_year_from.map(ScalarValue::from),
                to: self.founding_year_to.map(ScalarValue::from),
            };
            filters.insert("foundingYear", FilterValue::Range(bounds));
        }
        if !self.tags.is_empty() {
            filters.insert("tags", FilterValue::any_of(self.tags.clone()));
        }
        filters
    }
}

fn any_of(field: &str, values: &[String]) -> FilterClause {
    FilterClause::AnyOf { field: field.to_string(), values: values.iter().map(|v| v.as_str().into()).collect() }
}
