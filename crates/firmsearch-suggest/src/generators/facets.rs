use std::sync::Arc;

use async_trait::async_trait;
use firmsearch_core::traits::SuggestionGenerator;
use firmsearch_core::types::{Suggestion, SuggestionSource};
use firmsearch_query::Lexicon;
use firmsearch_text::{FacetRequest, LexicalBackend, QueryExpr, SelectRequest};
use tracing::warn;

use super::facet_limit;
use crate::scoring::{facet_score, rank};

/// Suggests values of one faceted field, falling back to vocabulary names offline.
pub struct FacetGenerator {
    backend: Arc<dyn LexicalBackend>,
    source: SuggestionSource,
    field: String,
    fallback: Vec<String>,
}

impl FacetGenerator {
    pub fn industries(backend: Arc<dyn LexicalBackend>, lexicon: &Lexicon) -> Self {
        Self {
            backend,
            source: SuggestionSource::Industry,
            field: "industry".to_string(),
            fallback: lexicon.industries.names().map(str::to_string).collect(),
        }
    }

    pub fn locations(backend: Arc<dyn LexicalBackend>, lexicon: &Lexicon) -> Self {
        Self {
            backend,
            source: SuggestionSource::Location,
            field: "locality".to_string(),
            fallback: lexicon.locations.names().map(str::to_string).collect(),
        }
    }

    pub fn field(&self) -> &str { &self.field }

    fn suggestion(&self, query: &str, value: &str, count: Option<u64>) -> Suggestion {
        let description = match (self.source, count) {
            (SuggestionSource::Location, Some(n)) => format!("Search companies in {value} ({n} companies)"),
            (SuggestionSource::Location, None) => format!("Search companies in {value}"),
            (_, Some(n)) => format!("Search in {value} industry ({n} companies)"),
            (_, None) => format!("Search in {value} industry"),
        };
        let score = facet_score(query, value, count.unwrap_or(0));
        Suggestion::new(value, self.source, score, description)
    }
}

#[async_trait]
impl SuggestionGenerator for FacetGenerator {
    fn source(&self) -> SuggestionSource { self.source }

    async fn generate(&self, query: &str, limit: usize) -> Vec<Suggestion> {
        if limit == 0 {
            return Vec::new();
        }
        let request = SelectRequest::new(QueryExpr::MatchAll).rows(0).facets(
            FacetRequest::fields([self.field.as_str()]).limit(facet_limit(limit)).mincount(1).contains(query),
        );

        let mut found: Vec<Suggestion> = match self.backend.select(&request).await {
            Ok(response) => response
                .facet_counts
                .pairs(&self.field)
                .into_iter()
                .filter(|(value, _)| value.to_lowercase().contains(query))
                .map(|(value, count)| self.suggestion(query, &value, Some(count)))
                .collect(),
            Err(e) => {
                warn!("{} facet lookup failed, using vocabulary: {}", self.field, e);
                self.fallback
                    .iter()
                    .filter(|name| name.contains(query))
                    .map(|name| self.suggestion(query, name, None))
                    .collect()
            }
        };
        rank(&mut found, limit);
        found
    }
}
