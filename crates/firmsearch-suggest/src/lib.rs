//! Autosuggest: four independent generators fused into one ranked bundle.
pub mod aggregator;
pub mod generators;
pub mod scoring;

pub use aggregator::Autosuggest;
pub use generators::{CompanyNameGenerator, FacetGenerator, TemplateGenerator};
