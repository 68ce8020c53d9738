use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use firmsearch_core::config::LexicalSettings;
use firmsearch_core::error::Result;
use firmsearch_core::traits::SuggestionGenerator;
use firmsearch_core::types::{RetrievedDocument, Suggestion, SuggestionSource};
use firmsearch_text::{LexicalBackend, QueryExpr, SelectRequest, SuggestRequest};
use tracing::{debug, warn};

use crate::scoring::{rank, text_match_score};

/// Company names: engine suggester, then prefix search, then a local snapshot.
pub struct CompanyNameGenerator {
    backend: Arc<dyn LexicalBackend>,
    dictionary: Option<String>,
    snapshot: Vec<String>,
}

impl CompanyNameGenerator {
    pub fn new(backend: Arc<dyn LexicalBackend>, dictionary: Option<String>, snapshot: Vec<String>) -> Self {
        let dictionary = dictionary.filter(|d| !d.trim().is_empty());
        Self { backend, dictionary, snapshot }
    }

    pub fn from_settings(backend: Arc<dyn LexicalBackend>, settings: &LexicalSettings) -> Self {
        Self::new(backend, settings.suggest_dictionary.clone(), settings.company_snapshot.clone())
    }

    /// `None` means the suggester had nothing usable and the next strategy should run.
    async fn from_suggester(&self, query: &str, limit: usize) -> Option<Vec<Suggestion>> {
        let dictionary = self.dictionary.as_ref()?;
        let request = SuggestRequest { dictionary: dictionary.clone(), query: query.to_string(), count: limit };
        match self.backend.suggest(&request).await {
            Ok(response) => {
                let names = response.terms(dictionary, query).iter().map(|t| t.term.clone());
                let found = suggestions(query, unique_names(names), limit);
                if found.is_empty() { None } else { Some(found) }
            }
            Err(e) => {
                warn!("Company suggester failed, using prefix search: {}", e);
                None
            }
        }
    }

    async fn from_prefix_search(&self, query: &str, limit: usize) -> Result<Vec<Suggestion>> {
        let request = SelectRequest::new(QueryExpr::prefix("name", query)).fields(["name", "name_s"]).rows(limit);
        let response = self.backend.select(&request).await?;
        let names = response.response.docs.into_iter().filter_map(|fields| {
            let doc = RetrievedDocument::new(fields);
            doc.text("name_s").or_else(|| doc.text("name"))
        });
        Ok(suggestions(query, unique_names(names), limit))
    }

    fn from_snapshot(&self, query: &str, limit: usize) -> Vec<Suggestion> {
        let names = self.snapshot.iter().filter(|name| name.to_lowercase().contains(query)).cloned();
        suggestions(query, unique_names(names), limit)
    }
}

/// Non-empty names, first spelling wins among case-insensitive duplicates.
fn unique_names(names: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    names.filter(|n| !n.trim().is_empty() && seen.insert(n.to_lowercase())).collect()
}

fn suggestions(query: &str, names: Vec<String>, limit: usize) -> Vec<Suggestion> {
    let mut out: Vec<Suggestion> = names
        .into_iter()
        .map(|name| {
            let description = format!("Search for companies named: {name}");
            Suggestion::new(name.clone(), SuggestionSource::Company, text_match_score(query, &name), description)
        })
        .collect();
    rank(&mut out, limit);
    out
}

#[async_trait]
impl SuggestionGenerator for CompanyNameGenerator {
    fn source(&self) -> SuggestionSource { SuggestionSource::Company }

    async fn generate(&self, query: &str, limit: usize) -> Vec<Suggestion> {
        if limit == 0 {
            return Vec::new();
        }
        if let Some(found) = self.from_suggester(query, limit).await {
            return found;
        }
        match self.from_prefix_search(query, limit).await {
            Ok(found) => found,
            Err(e) => {
                warn!("Company prefix search failed, using snapshot: {}", e);
                let found = self.from_snapshot(query, limit);
                debug!("Snapshot produced {} company names", found.len());
                found
            }
        }
    }
}
