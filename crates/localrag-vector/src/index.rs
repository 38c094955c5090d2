use parking_lot::RwLock;

use localrag_core::traits::VectorIndexer;
use localrag_core::types::{Passage, SearchResult, SourceKind, Vector};

use crate::similarity::cosine_similarity;

/// Positionally aligned passages and their vectors; always equal in length.
#[derive(Default)]
struct Store {
    passages: Vec<Passage>,
    vectors: Vec<Vector>,
}

/// Append-only, in-memory index searched by brute-force cosine similarity.
///
/// Searches take a shared lock and may run concurrently; `add` and `clear`
/// take the exclusive lock.
pub struct VectorIndex {
    dim: usize,
    store: RwLock<Store>,
}

impl VectorIndex {
    /// `dim` is the length of the zero-vector placeholder stored for passages
    /// that have no embedding.
    pub fn new(dim: usize) -> Self {
        Self { dim, store: RwLock::new(Store::default()) }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Snapshot of every stored passage, in insertion order.
    pub fn passages(&self) -> Vec<Passage> {
        self.store.read().passages.clone()
    }

    /// Number of stored vectors that are not placeholders.
    pub fn embedded_count(&self) -> usize {
        self.store.read().vectors.iter().filter(|v| v.iter().any(|x| *x != 0.0)).count()
    }
}

impl VectorIndexer for VectorIndex {
    fn add(&self, passages: Vec<Passage>, vectors: Vec<Vector>) {
        let mut vectors = vectors.into_iter();
        let mut mismatched = 0usize;
        let mut store = self.store.write();
        store.passages.reserve(passages.len());
        store.vectors.reserve(passages.len());
        for passage in passages {
            let vector = match vectors.next() {
                Some(v) if !v.is_empty() => {
                    if v.len() != self.dim {
                        mismatched += 1;
                    }
                    v
                }
                _ => vec![0.0; self.dim],
            };
            store.passages.push(passage);
            store.vectors.push(vector);
        }
        if mismatched > 0 {
            tracing::warn!(mismatched, expected = self.dim, "vectors with unexpected dimensionality stored");
        }
        tracing::debug!(total = store.passages.len(), "vector index grew");
    }

    fn search(&self, query_vec: &[f32], k: usize) -> Vec<SearchResult> {
        if k == 0 {
            return Vec::new();
        }
        let store = self.store.read();
        let mut scored: Vec<(usize, f32)> = store
            .vectors
            .iter()
            .enumerate()
            .map(|(i, v)| (i, cosine_similarity(query_vec, v)))
            .filter(|(_, score)| *score > 0.0)
            .collect();
        // Stable sort: exact ties keep insertion order.
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(k);
        scored
            .into_iter()
            .map(|(i, score)| SearchResult { passage: store.passages[i].clone(), score, origin: SourceKind::Vector })
            .collect()
    }

    fn len(&self) -> usize {
        self.store.read().passages.len()
    }

    fn clear(&self) {
        let mut store = self.store.write();
        store.passages.clear();
        store.vectors.clear();
    }
}
