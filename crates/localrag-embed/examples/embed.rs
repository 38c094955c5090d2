use localrag_core::config::Config;
use localrag_core::traits::EmbeddingProvider;
use localrag_embed::get_default_embedder;

fn main() -> anyhow::Result<()> {
    let settings = Config::load()?.settings()?;
    let embedder = get_default_embedder(&settings.embedding)?;
    let texts = vec!["hello world".to_string(), "rust embeddings".to_string()];
    let embs = embedder.embed(&texts);
    let ok = embs.iter().filter(|r| r.is_ok()).count();
    println!("provider={} B={} ok={} dim={}", embedder.name(), embs.len(), ok, embedder.dim());
    for (text, result) in texts.iter().zip(&embs) {
        if let Err(e) = result {
            println!("  {:?}: {}", text, e);
        }
    }
    Ok(())
}
