use localrag_core::config::EmbeddingSettings;
use localrag_core::traits::EmbeddingProvider;
use localrag_core::Error;
use localrag_embed::{get_default_embedder, HashEmbedder, OpenAiEmbedder};

fn settings(provider: &str) -> EmbeddingSettings {
    EmbeddingSettings { provider: provider.to_string(), dim: 64, ..EmbeddingSettings::default() }
}

#[test]
fn hash_embedder_shapes_and_determinism() {
    let embedder = get_default_embedder(&settings("fake")).expect("embedder");
    let texts = vec!["hello world".to_string(), "hello world".to_string()];
    let embs: Vec<Vec<f32>> = embedder.embed(&texts).into_iter().map(|r| r.expect("embed")).collect();
    let v1 = &embs[0];
    let v2 = &embs[1];

    assert_eq!(v1.len(), 64, "embedding dim follows config");
    assert_eq!(embedder.dim(), 64);

    let norm: f32 = v1.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() <= 1e-3, "vector is L2-normalized (norm={norm})");

    for (a, b) in v1.iter().zip(v2.iter()) {
        assert!((a - b).abs() <= 1e-6);
    }
}

#[test]
fn hash_embedder_relates_texts_sharing_tokens() {
    let embedder = HashEmbedder::new(256);
    let a = embedder.embed_one("rust borrow checker").unwrap();
    let b = embedder.embed_one("the borrow checker rejects this").unwrap();
    let dot: f32 = a.iter().zip(&b).map(|(x, y)| x * y).sum();
    assert!(dot > 0.0, "shared tokens land in shared buckets");
}

#[test]
fn unknown_provider_is_invalid_config() {
    let err = get_default_embedder(&settings("word2vec")).err().expect("error");
    assert!(matches!(err, Error::InvalidConfig(_)), "got {err:?}");
}

#[test]
fn openai_without_key_fails_every_item_without_network() {
    let mut s = settings("openai");
    s.endpoint.api_key = None;
    s.endpoint.base_url = "http://127.0.0.1:9".to_string();
    let embedder = OpenAiEmbedder::new(&s).expect("client builds");

    let results = embedder.embed(&["a".to_string(), "b".to_string(), "c".to_string()]);
    assert_eq!(results.len(), 3, "one result per input");
    assert!(results.iter().all(|r| matches!(r, Err(Error::Provider { .. }))));
    assert!(embedder.embed_one("q").is_err());
    assert!(embedder.embed(&[]).is_empty());
}

#[test]
fn openai_unreachable_endpoint_is_a_provider_error() {
    let mut s = settings("openai");
    s.endpoint.api_key = Some("sk-test".to_string());
    s.endpoint.base_url = "http://127.0.0.1:9".to_string();
    s.endpoint.timeout_secs = 2;
    let embedder = OpenAiEmbedder::new(&s).expect("client builds");

    let results = embedder.embed(&["a".to_string(), "b".to_string()]);
    assert_eq!(results.len(), 2, "batch failure falls back to per-item results");
    assert!(results.iter().all(|r| r.is_err()));
}
