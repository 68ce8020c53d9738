use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use firmsearch_core::config::LexicalSettings;
use firmsearch_core::error::{Error, Result};
use firmsearch_core::http::build_client;
use firmsearch_core::retry::{with_retry, with_timeout, RetryPolicy};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::query::{SelectRequest, SuggestRequest};
use crate::response::{SelectResponse, SuggestResponse};

/// The lexical engine as seen by the rest of the workspace.
#[async_trait]
pub trait LexicalBackend: Send + Sync {
    async fn select(&self, request: &SelectRequest) -> Result<SelectResponse>;
    async fn suggest(&self, request: &SuggestRequest) -> Result<SuggestResponse>;
}

#[async_trait]
impl<T: LexicalBackend + ?Sized> LexicalBackend for Arc<T> {
    async fn select(&self, request: &SelectRequest) -> Result<SelectResponse> { (**self).select(request).await }
    async fn suggest(&self, request: &SuggestRequest) -> Result<SuggestResponse> { (**self).suggest(request).await }
}

/// HTTP client for a single core/collection (`<base_url>/select`, `<base_url>/suggest`).
pub struct SolrClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
    retry: RetryPolicy,
}

impl SolrClient {
    pub fn new(settings: &LexicalSettings, retry: RetryPolicy) -> Result<Self> {
        let timeout = settings.timeout();
        Ok(Self {
            http: build_client(timeout)?,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            timeout,
            retry,
        })
    }

    pub fn base_url(&self) -> &str { &self.base_url }

    async fn get_json<T: DeserializeOwned>(&self, handler: &str, params: &[(String, String)]) -> Result<T> {
        let url = format!("{}/{}", self.base_url, handler);
        let url = url.as_str();
        debug!("GET {} ({} params)", url, params.len());
        with_retry(self.retry, handler, move || self.fetch::<T>(url, params)).await
    }

    async fn fetch<T: DeserializeOwned>(&self, url: &str, params: &[(String, String)]) -> Result<T> {
        with_timeout(self.timeout, async {
            let response = self.http.get(url).query(params).send().await?.error_for_status()?;
            let body = response.bytes().await?;
            Ok::<T, Error>(serde_json::from_slice(&body)?)
        })
        .await
    }
}

#[async_trait]
impl LexicalBackend for SolrClient {
    async fn select(&self, request: &SelectRequest) -> Result<SelectResponse> {
        self.get_json("select", &request.to_params()).await
    }

    async fn suggest(&self, request: &SuggestRequest) -> Result<SuggestResponse> {
        self.get_json("suggest", &request.to_params()).await
    }
}
