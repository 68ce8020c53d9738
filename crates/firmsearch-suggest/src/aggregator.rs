use std::sync::Arc;
use std::time::Instant;

use firmsearch_core::config::LexicalSettings;
use firmsearch_core::traits::SuggestionGenerator;
use firmsearch_core::types::{Suggestion, SuggestionBundle};
use firmsearch_query::understanding::MIN_QUERY_CHARS;
use firmsearch_query::QueryUnderstanding;
use firmsearch_text::LexicalBackend;
use tracing::{debug, info};

use crate::generators::{CompanyNameGenerator, FacetGenerator, TemplateGenerator};
use crate::scoring::rank;

/// Fans a query out to every generator and fuses the answers.
pub struct Autosuggest {
    companies: Arc<dyn SuggestionGenerator>,
    industries: Arc<dyn SuggestionGenerator>,
    locations: Arc<dyn SuggestionGenerator>,
    templates: Arc<dyn SuggestionGenerator>,
}

impl Autosuggest {
    pub fn new(
        companies: Arc<dyn SuggestionGenerator>,
        industries: Arc<dyn SuggestionGenerator>,
        locations: Arc<dyn SuggestionGenerator>,
        templates: Arc<dyn SuggestionGenerator>,
    ) -> Self {
        Self { companies, industries, locations, templates }
    }

    /// Standard wiring against one lexical backend.
    pub fn with_backend(
        backend: Arc<dyn LexicalBackend>,
        settings: &LexicalSettings,
        understanding: Arc<QueryUnderstanding>,
    ) -> Self {
        let lexicon = understanding.lexicon().clone();
        Self::new(
            Arc::new(CompanyNameGenerator::from_settings(backend.clone(), settings)),
            Arc::new(FacetGenerator::industries(backend.clone(), &lexicon)),
            Arc::new(FacetGenerator::locations(backend, &lexicon)),
            Arc::new(TemplateGenerator::new(understanding)),
        )
    }

    /// Runs the generators concurrently. Entity sources get a third of `max` each and
    /// templates a quarter; the fused list is cut back to `max`.
    pub async fn get_autosuggestions(&self, query: &str, max: usize) -> SuggestionBundle {
        let normalized = query.trim().to_lowercase();
        if normalized.chars().count() < MIN_QUERY_CHARS {
            return SuggestionBundle::default();
        }
        let started = Instant::now();
        let per_source = max / 3;
        let per_template = max / 4;

        let (mut company_names, mut industries, mut locations, mut query_templates) = tokio::join!(
            self.companies.generate(&normalized, per_source),
            self.industries.generate(&normalized, per_source),
            self.locations.generate(&normalized, per_source),
            self.templates.generate(&normalized, per_template),
        );
        company_names.truncate(per_source);
        industries.truncate(per_source);
        locations.truncate(per_source);
        query_templates.truncate(per_template);

        let mut all_suggestions: Vec<Suggestion> = company_names
            .iter()
            .chain(&industries)
            .chain(&locations)
            .chain(&query_templates)
            .cloned()
            .collect();
        rank(&mut all_suggestions, max);

        debug!(
            "companies={} industries={} locations={} templates={}",
            company_names.len(),
            industries.len(),
            locations.len(),
            query_templates.len()
        );
        info!(
            "Autosuggest '{}' -> {} suggestions in {}ms",
            normalized,
            all_suggestions.len(),
            started.elapsed().as_millis()
        );

        SuggestionBundle { all_suggestions, company_names, industries, locations, query_templates }
    }
}
