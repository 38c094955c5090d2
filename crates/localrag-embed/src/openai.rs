//! Embeddings over the OpenAI-compatible `/embeddings` endpoint.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use localrag_core::config::EmbeddingSettings;
use localrag_core::error::{Error, Result};
use localrag_core::traits::EmbeddingProvider;
use localrag_core::types::Vector;

const PROVIDER: &str = "openai";

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

/// Why a request failed; authentication problems fail a whole batch at once.
enum RequestError {
    Auth(String),
    Other(String),
}

impl RequestError {
    fn into_error(self) -> Error {
        match self {
            Self::Auth(msg) | Self::Other(msg) => Error::provider(PROVIDER, msg),
        }
    }
}

pub struct OpenAiEmbedder {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    dim: usize,
}

impl OpenAiEmbedder {
    pub fn new(settings: &EmbeddingSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.endpoint.timeout_secs))
            .build()
            .map_err(|e| Error::provider(PROVIDER, e))?;
        Ok(Self {
            client,
            base_url: settings.endpoint.base_url.trim_end_matches('/').to_string(),
            api_key: settings.endpoint.api_key.clone().filter(|k| !k.trim().is_empty()),
            model: settings.model.clone(),
            dim: settings.dim,
        })
    }

    /// One request for `texts`; the result has exactly one slot per input.
    fn request(&self, texts: &[String]) -> std::result::Result<Vec<Option<Vector>>, RequestError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(RequestError::Auth("no API key configured".to_string()));
        };
        let url = format!("{}/embeddings", self.base_url);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&EmbeddingRequest { model: &self.model, input: texts })
            .send()
            .map_err(|e| RequestError::Other(format!("request to {} failed: {}", url, e)))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            let msg = format!("HTTP {}: {}", status, body.trim());
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => RequestError::Auth(msg),
                _ => RequestError::Other(msg),
            });
        }

        let parsed: EmbeddingResponse =
            resp.json().map_err(|e| RequestError::Other(format!("invalid response body: {}", e)))?;
        let mut slots: Vec<Option<Vector>> = vec![None; texts.len()];
        for item in parsed.data {
            if let Some(slot) = slots.get_mut(item.index) {
                *slot = Some(item.embedding).filter(|v| !v.is_empty());
            }
        }
        Ok(slots)
    }
}

impl EmbeddingProvider for OpenAiEmbedder {
    fn name(&self) -> &str {
        PROVIDER
    }

    fn dim(&self) -> usize {
        self.dim
    }

    fn embed_one(&self, text: &str) -> Result<Vector> {
        let slots = self.request(&[text.to_string()]).map_err(RequestError::into_error)?;
        slots
            .into_iter()
            .next()
            .flatten()
            .ok_or_else(|| Error::EmptyEmbedding { provider: PROVIDER.to_string() })
    }

    fn embed(&self, texts: &[String]) -> Vec<Result<Vector>> {
        if texts.is_empty() {
            return Vec::new();
        }
        match self.request(texts) {
            Ok(slots) => slots
                .into_iter()
                .map(|slot| slot.ok_or_else(|| Error::EmptyEmbedding { provider: PROVIDER.to_string() }))
                .collect(),
            Err(RequestError::Auth(msg)) => {
                tracing::warn!(error = %msg, count = texts.len(), "embedding batch rejected");
                texts.iter().map(|_| Err(Error::provider(PROVIDER, &msg))).collect()
            }
            Err(RequestError::Other(msg)) if texts.len() > 1 => {
                tracing::warn!(error = %msg, count = texts.len(), "embedding batch failed, retrying per item");
                texts.iter().map(|t| self.embed_one(t)).collect()
            }
            Err(other) => vec![Err(other.into_error())],
        }
    }
}
