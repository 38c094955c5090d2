//! Lightweight configuration loader and path helpers.
//!
//! Uses Figment to merge built-in defaults, `config.toml`, `config.<env>.toml`
//! and `APP_*` env vars (`__` separates nested keys, e.g.
//! `APP_EMBEDDING__PROVIDER=fake`). Provides helpers to expand `~` and `${VAR}`
//! and to resolve relative paths against a known base directory.
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::chunker::ChunkingConfig;
use crate::error::{Error, Result};

pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_with(None)
    }

    /// Like [`Config::load`], with an extra TOML file merged after the
    /// environment-specific file and before `APP_*` variables.
    pub fn load_with(extra: Option<&Path>) -> Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        if let Some(path) = extra {
            if !path.exists() {
                return Err(Error::NotFound(format!("config file {}", path.display())));
            }
            figment = figment.merge(Toml::file(path));
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        Ok(Self { figment })
    }

    /// Defaults overlaid with an inline TOML document; no files, no env.
    pub fn from_toml_str(toml: &str) -> Self {
        let figment = Figment::from(Serialized::defaults(AppConfig::default())).merge(Toml::string(toml));
        Self { figment }
    }

    pub fn get<T>(&self, key: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| Error::InvalidConfig(format!("Failed to get '{}': {}", key, e)))
    }

    /// Extract and validate the full typed configuration.
    pub fn settings(&self) -> Result<AppConfig> {
        let mut settings: AppConfig = self
            .figment
            .extract()
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        settings.validate()?;
        let fallback_key = env::var(OPENAI_API_KEY_VAR).ok().filter(|k| !k.trim().is_empty());
        settings.embedding.endpoint.fill_api_key(fallback_key.as_deref());
        settings.generation.endpoint.fill_api_key(fallback_key.as_deref());
        Ok(settings)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub data: DataSettings,
    pub chunking: ChunkingConfig,
    pub embedding: EmbeddingSettings,
    pub generation: GenerationSettings,
    pub retrieval: RetrievalSettings,
}

impl AppConfig {
    /// Anchors relative paths at `base`, typically the directory of the
    /// config file they were read from.
    pub fn rebase_paths(&mut self, base: &Path) {
        self.data.data_dir = resolve_with_base(base, &self.data.data_dir).to_string_lossy().into_owned();
    }

    pub fn validate(&self) -> Result<()> {
        if self.chunking.chunk_size == 0 {
            return Err(Error::InvalidConfig("chunking.chunk_size must be at least 1".into()));
        }
        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            tracing::warn!(
                chunk_size = self.chunking.chunk_size,
                chunk_overlap = self.chunking.chunk_overlap,
                "overlap is not smaller than chunk size; chunks will advance one character at a time"
            );
        }
        if self.embedding.dim == 0 {
            return Err(Error::InvalidConfig("embedding.dim must be at least 1".into()));
        }
        if self.embedding.batch_size == 0 || self.embedding.concurrency == 0 {
            return Err(Error::InvalidConfig(
                "embedding.batch_size and embedding.concurrency must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSettings {
    pub data_dir: String,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self { data_dir: "data".to_string() }
    }
}

impl DataSettings {
    pub fn data_dir(&self) -> PathBuf {
        expand_path(&self.data_dir)
    }
}

/// Where and how to reach an OpenAI-compatible HTTP API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointSettings {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for EndpointSettings {
    fn default() -> Self {
        Self { base_url: "https://api.openai.com/v1".to_string(), api_key: None, timeout_secs: 30 }
    }
}

impl EndpointSettings {
    fn fill_api_key(&mut self, fallback: Option<&str>) {
        let missing = self.api_key.as_deref().map_or(true, |k| k.trim().is_empty());
        if missing {
            self.api_key = fallback.map(str::to_string);
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingSettings {
    /// `openai` or `fake`.
    pub provider: String,
    pub model: String,
    pub dim: usize,
    pub batch_size: usize,
    pub concurrency: usize,
    pub endpoint: EndpointSettings,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "text-embedding-ada-002".to_string(),
            dim: 1536,
            batch_size: 32,
            concurrency: 4,
            endpoint: EndpointSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSettings {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub system_prompt: String,
    pub endpoint: EndpointSettings,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".to_string(),
            max_tokens: 500,
            temperature: 0.3,
            system_prompt: "You are a helpful assistant that answers questions based on provided context."
                .to_string(),
            endpoint: EndpointSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalSettings {
    pub top_k: usize,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self { top_k: 5 }
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// [`expand_path`], then anchored at `base` unless already absolute.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, path: S) -> PathBuf {
    let expanded = expand_path(path);
    if expanded.is_absolute() {
        return expanded;
    }
    base.join(expanded)
}
