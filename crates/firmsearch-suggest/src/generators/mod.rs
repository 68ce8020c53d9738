mod company;
mod facets;
mod templates;

pub use company::CompanyNameGenerator;
pub use facets::FacetGenerator;
pub use templates::{TemplateGenerator, CATALOG_QUERIES};

/// `limit` as a signed facet limit.
fn facet_limit(limit: usize) -> i64 { i64::try_from(limit.saturating_mul(3)).unwrap_or(i64::MAX) }
