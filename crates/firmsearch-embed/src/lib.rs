use std::sync::Arc;

use firmsearch_core::config::EmbeddingSettings;
use firmsearch_core::error::Result;
use firmsearch_core::retry::RetryPolicy;
use firmsearch_core::traits::Embedder;
use tracing::info;

pub mod client;
pub mod fake;

pub use client::EmbeddingClient;
pub use fake::FakeEmbedder;

/// `APP_USE_FAKE_EMBEDDINGS=1|true` forces the fake embedder regardless of settings.
pub fn fake_forced_by_env() -> bool {
    std::env::var("APP_USE_FAKE_EMBEDDINGS")
        .ok()
        .is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

pub fn get_default_embedder(settings: &EmbeddingSettings, retry: RetryPolicy) -> Result<Arc<dyn Embedder>> {
    if settings.use_fake || fake_forced_by_env() {
        info!("Using FakeEmbedder (dim={})", settings.fake_dim);
        return Ok(Arc::new(FakeEmbedder::new(settings.fake_dim)));
    }
    info!("Using embedding service at {}", settings.url);
    Ok(Arc::new(EmbeddingClient::new(settings, retry)?))
}
