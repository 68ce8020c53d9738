//! firmsearch-text
//!
//! Client for the lexical engine: a structured request model (`query`) serialised to
//! select/suggest parameters, the JSON response model (`response`) and the pooled HTTP
//! client (`client`).
pub mod client;
pub mod query;
pub mod response;

pub use client::{LexicalBackend, SolrClient};
pub use query::{FacetRequest, FilterClause, QueryExpr, QueryParser, SelectRequest, SortSpec, SuggestRequest};
pub use response::{SelectResponse, SuggestResponse};
