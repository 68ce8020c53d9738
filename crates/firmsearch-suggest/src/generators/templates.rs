use std::sync::Arc;

use async_trait::async_trait;
use firmsearch_core::traits::SuggestionGenerator;
use firmsearch_core::types::{Suggestion, SuggestionSource};
use firmsearch_query::QueryUnderstanding;

use crate::scoring::{rank, text_match_score};

/// Canned queries offered when the input is a fragment of one of them.
pub const CATALOG_QUERIES: &[&str] = &[
    "technology companies",
    "startups",
    "financial services",
    "healthcare companies",
    "software companies",
    "consulting firms",
    "manufacturing companies",
    "retail companies",
];

const CATALOG_MIN_CHARS: usize = 3;
const CATALOG_WEIGHT: f32 = 0.6;

/// Natural-language query templates built from detected entities.
pub struct TemplateGenerator {
    understanding: Arc<QueryUnderstanding>,
}

impl TemplateGenerator {
    pub fn new(understanding: Arc<QueryUnderstanding>) -> Self { Self { understanding } }

    fn templates(&self, query: &str) -> Vec<Suggestion> {
        let template = |text: String, score: f32, description: String| {
            Suggestion::new(text, SuggestionSource::Template, score, description)
        };
        let parsed = self.understanding.parse(query);
        let mut out = Vec::new();

        for industry in &parsed.industries {
            out.push(template(format!("{industry} companies"), 0.8, format!("Find all {industry} companies")));
            out.push(template(
                format!("{industry} companies in california"),
                0.7,
                format!("Find {industry} companies in California"),
            ));
        }
        for location in &parsed.locations {
            out.push(template(
                format!("tech companies in {location}"),
                0.8,
                format!("Find technology companies in {location}"),
            ));
            out.push(template(format!("startups in {location}"), 0.7, format!("Find startups in {location}")));
        }

        if query.chars().count() >= CATALOG_MIN_CHARS {
            for phrase in CATALOG_QUERIES.iter().filter(|p| p.contains(query)) {
                out.push(template(
                    (*phrase).to_string(),
                    text_match_score(query, phrase) * CATALOG_WEIGHT,
                    format!("Search for {phrase}"),
                ));
            }
        }
        out
    }
}

#[async_trait]
impl SuggestionGenerator for TemplateGenerator {
    fn source(&self) -> SuggestionSource { SuggestionSource::Template }

    async fn generate(&self, query: &str, limit: usize) -> Vec<Suggestion> {
        if limit == 0 {
            return Vec::new();
        }
        let mut found = self.templates(query);
        rank(&mut found, limit);
        found
    }
}
