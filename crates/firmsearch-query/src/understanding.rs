use std::sync::Arc;

use firmsearch_core::error::Result;
use firmsearch_core::filters::FilterSet;
use firmsearch_core::types::ParsedQuery;
use tracing::debug;

use crate::filters;
use crate::vocabulary::{Keyword, Lexicon};

/// Filler words dropped from the rewritten query.
pub const STOP_WORDS: &[&str] = &[
    "companies", "company", "businesses", "business", "firms", "firm", "organizations",
    "organization", "in", "at", "from", "near", "around",
];

/// Queries shorter than this (after trimming) are not analysed.
pub const MIN_QUERY_CHARS: usize = 2;

/// Entity extraction and query rewriting over a shared [`Lexicon`].
pub struct QueryUnderstanding {
    lexicon: Arc<Lexicon>,
    stop_words: Vec<Keyword>,
}

impl QueryUnderstanding {
    pub fn new(lexicon: Arc<Lexicon>) -> Result<Self> {
        let stop_words = STOP_WORDS.iter().map(|w| Keyword::new(w)).collect::<Result<Vec<_>>>()?;
        Ok(Self { lexicon, stop_words })
    }

    pub fn lexicon(&self) -> &Arc<Lexicon> { &self.lexicon }

    pub fn parse(&self, query: &str) -> ParsedQuery {
        let normalized = query.trim().to_lowercase();
        if normalized.chars().count() < MIN_QUERY_CHARS {
            return ParsedQuery::empty(query);
        }

        let industries = self.lexicon.industries.detect(&normalized);
        let locations = self.lexicon.locations.detect(&normalized);
        let cleaned_query = self.clean(&normalized, &industries, &locations);
        debug!(
            "Parsed '{}': industries={:?} locations={:?} cleaned='{}'",
            query, industries, locations, cleaned_query
        );

        ParsedQuery { original_query: query.to_string(), cleaned_query, industries, locations }
    }

    pub fn build_filters(&self, parsed: &ParsedQuery) -> FilterSet { filters::synthesize(parsed) }

    fn clean(&self, normalized: &str, industries: &[String], locations: &[String]) -> String {
        let detected_industries = industries.iter().filter_map(|n| self.lexicon.industries.get(n));
        let detected_locations = locations.iter().filter_map(|n| self.lexicon.locations.get(n));
        let mut erasers: Vec<&Keyword> = detected_industries
            .chain(detected_locations)
            .flat_map(|c| c.keywords().iter())
            .chain(self.stop_words.iter())
            .collect();
        // Longest first so multi-word phrases go before their parts.
        erasers.sort_by(|a, b| {
            b.phrase().len().cmp(&a.phrase().len()).then_with(|| a.phrase().cmp(b.phrase()))
        });
        erasers.dedup_by(|a, b| a.phrase() == b.phrase());

        let mut cleaned = normalized.to_string();
        for keyword in erasers {
            cleaned = keyword.erase(&cleaned);
        }
        let cleaned = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");

        match industries.first() {
            Some(first) if cleaned.is_empty() => first.clone(),
            _ => cleaned,
        }
    }
}
