use async_trait::async_trait;

use crate::outcome::Outcome;
use crate::types::{Suggestion, SuggestionSource};

/// Text to dense vector. Failure is reported through the outcome, never as an error.
#[async_trait]
pub trait Embedder: Send + Sync {
    fn embedder_id(&self) -> &str;
    async fn embed(&self, text: &str) -> Outcome<Vec<f32>>;
}

/// One source of autosuggest candidates.
///
/// `query` arrives lower-cased and trimmed. Implementations absorb backend failures and
/// return at most `limit` suggestions sorted by descending score.
#[async_trait]
pub trait SuggestionGenerator: Send + Sync {
    fn source(&self) -> SuggestionSource;
    async fn generate(&self, query: &str, limit: usize) -> Vec<Suggestion>;
}
