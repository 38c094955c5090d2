//! localrag-embed
//!
//! Embedding providers: an OpenAI-compatible HTTP client and an offline
//! token-hashing embedder. Select one from configuration with
//! [`get_default_embedder`].
use localrag_core::config::EmbeddingSettings;
use localrag_core::error::{Error, Result};
use localrag_core::traits::EmbeddingProvider;

pub mod hash;
pub mod openai;

pub use hash::HashEmbedder;
pub use openai::OpenAiEmbedder;

pub fn get_default_embedder(settings: &EmbeddingSettings) -> Result<Box<dyn EmbeddingProvider>> {
    match settings.provider.to_ascii_lowercase().as_str() {
        "openai" => {
            tracing::info!(model = %settings.model, base_url = %settings.endpoint.base_url, "using OpenAI embeddings");
            Ok(Box::new(OpenAiEmbedder::new(settings)?))
        }
        "fake" | "hash" => {
            tracing::info!(dim = settings.dim, "using hashing embedder");
            Ok(Box::new(HashEmbedder::new(settings.dim)))
        }
        other => Err(Error::InvalidConfig(format!("unknown embedding provider '{}'", other))),
    }
}
