use std::time::{Duration, Instant};

use async_trait::async_trait;
use firmsearch_core::config::EmbeddingSettings;
use firmsearch_core::error::{Error, Result};
use firmsearch_core::http::build_client;
use firmsearch_core::outcome::{DegradeReason, Outcome};
use firmsearch_core::retry::{with_retry, with_timeout, RetryPolicy};
use firmsearch_core::traits::Embedder;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embedding: Vec<f32>,
    #[serde(default)]
    processing_time_ms: Option<f64>,
}

/// Remote embedding service: POST `{"text": ...}` returning `{"embedding": [...]}`.
pub struct EmbeddingClient {
    http: reqwest::Client,
    url: String,
    timeout: Duration,
    retry: RetryPolicy,
}

impl EmbeddingClient {
    pub fn new(settings: &EmbeddingSettings, retry: RetryPolicy) -> Result<Self> {
        let timeout = settings.timeout();
        Ok(Self { http: build_client(timeout)?, url: settings.url.clone(), timeout, retry })
    }

    async fn request(&self, text: &str) -> Result<Vec<f32>> {
        with_timeout(self.timeout, async {
            let response = self
                .http
                .post(&self.url)
                .json(&EmbedRequest { text })
                .send()
                .await?
                .error_for_status()?;
            let body = response.bytes().await?;
            let parsed: EmbedResponse = serde_json::from_slice(&body)?;
            if let Some(ms) = parsed.processing_time_ms {
                debug!("Embedding service took {:.1} ms", ms);
            }
            Ok::<Vec<f32>, Error>(parsed.embedding)
        })
        .await
    }
}

#[async_trait]
impl Embedder for EmbeddingClient {
    fn embedder_id(&self) -> &str { &self.url }

    async fn embed(&self, text: &str) -> Outcome<Vec<f32>> {
        if text.trim().is_empty() {
            return Outcome::Empty;
        }
        let started = Instant::now();
        match with_retry(self.retry, "embed", move || self.request(text)).await {
            Ok(vector) if vector.is_empty() => {
                warn!("Embedding service returned an empty vector");
                Outcome::Empty
            }
            Ok(vector) => {
                debug!("Embedded {} chars into {} dims in {:?}", text.len(), vector.len(), started.elapsed());
                Outcome::Success(vector)
            }
            Err(e) => {
                warn!("Embedding unavailable: {}", e);
                Outcome::Degraded(DegradeReason::from(&e))
            }
        }
    }
}
