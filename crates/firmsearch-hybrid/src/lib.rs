//! firmsearch-hybrid
//!
//! The search entry point: query understanding, lexical/semantic/hybrid dispatch against
//! the lexical engine, and per-document match attribution.
pub mod classifier;
pub mod requests;
pub mod service;

pub use classifier::{java_string_hash, FallbackPolicy, HybridClassifier};
pub use requests::{CompanySize, ComprehensiveSearchRequest, LexicalSearchRequest, LexicalSort};
pub use service::SearchService;
