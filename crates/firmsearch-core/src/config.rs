//! Layered configuration.
//!
//! Uses Figment to merge built-in defaults, `config.toml`, `config.<env>.toml` and `APP_*`
//! env vars (`__` separates nested keys, e.g. `APP_LEXICAL__BASE_URL`).

use std::env;
use std::path::Path;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::retry::RetryPolicy;

pub struct Config {
    figment: Figment,
    env_name: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::load_from(Path::new("."), &env_name)
    }

    /// Load `config.toml` and `config.<env>.toml` from `dir`, then `APP_*` overrides.
    pub fn load_from(dir: &Path, env_name: &str) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(dir.join("config.toml")));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file(dir.join("config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(dir.join("config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(dir.join("config.test.toml"))),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment, env_name: env_name.to_string() };
        config.validate_for_env(env_name)?;
        Ok(config)
    }

    pub fn from_figment(figment: Figment, env_name: &str) -> Result<Self> {
        let config = Self { figment, env_name: env_name.to_string() };
        config.validate_for_env(env_name)?;
        Ok(config)
    }

    pub fn env_name(&self) -> &str { &self.env_name }

    pub fn get<T>(&self, key: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| Error::InvalidConfig(format!("Failed to get '{key}': {e}")))
    }

    pub fn settings(&self) -> Result<Settings> {
        self.figment
            .extract()
            .map_err(|e| Error::InvalidConfig(format!("Failed to read settings: {e}")))
    }

    fn validate_for_env(&self, env: &str) -> Result<()> {
        self.settings()?.validate_for_env(env)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub lexical: LexicalSettings,
    pub embedding: EmbeddingSettings,
    pub retry: RetryPolicy,
    pub search: SearchSettings,
    pub classifier: ClassifierSettings,
}

impl Settings {
    pub fn validate_for_env(&self, env: &str) -> Result<()> {
        if self.lexical.base_url.trim().is_empty() {
            return Err(Error::InvalidConfig("lexical.base_url must not be empty".into()));
        }
        if self.lexical.timeout_ms == 0 || self.embedding.timeout_ms == 0 {
            return Err(Error::InvalidConfig("backend timeouts must be greater than zero".into()));
        }
        if self.retry.max_retries > 3 {
            return Err(Error::InvalidConfig(format!(
                "retry.max_retries must be at most 3, got {}",
                self.retry.max_retries
            )));
        }
        if self.search.hybrid_top_k == 0 {
            return Err(Error::InvalidConfig("search.hybrid_top_k must be positive".into()));
        }
        match env {
            "prod" | "production" if self.embedding.use_fake => Err(Error::InvalidConfig(
                "the fake embedder cannot be used in production".into(),
            )),
            _ => Ok(()),
        }
    }
}

/// Where the lexical engine lives and how to talk to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LexicalSettings {
    pub base_url: String,
    pub timeout_ms: u64,
    /// Suggester dictionary for company names; `None` skips the suggester entirely.
    pub suggest_dictionary: Option<String>,
    /// Last-resort company names used when the engine cannot be reached.
    pub company_snapshot: Vec<String>,
}

impl Default for LexicalSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8983/solr/company".to_string(),
            timeout_ms: 2_000,
            suggest_dictionary: Some("companySuggester".to_string()),
            company_snapshot: Vec::new(),
        }
    }
}

impl LexicalSettings {
    pub fn timeout(&self) -> Duration { Duration::from_millis(self.timeout_ms) }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    pub url: String,
    pub timeout_ms: u64,
    pub use_fake: bool,
    pub fake_dim: usize,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            url: "http://localhost:8085/embed".to_string(),
            timeout_ms: 1_500,
            use_fake: false,
            fake_dim: 384,
        }
    }
}

impl EmbeddingSettings {
    pub fn timeout(&self) -> Duration { Duration::from_millis(self.timeout_ms) }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub vector_field: String,
    pub hybrid_top_k: usize,
    pub hybrid_vector_boost: f32,
    pub facet_limit: i64,
    /// Extra neighbours requested by pure vector search beyond the current page.
    pub semantic_overfetch: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            vector_field: "name_embedding_vector".to_string(),
            hybrid_top_k: 10,
            hybrid_vector_boost: 2.0,
            facet_limit: 100,
            semantic_overfetch: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierSettings {
    pub legacy_hash_parity: bool,
}
