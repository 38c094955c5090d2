use crate::error::Result;
use crate::types::{Document, Passage, SearchResult, Vector};

/// Maps text to fixed-length vectors.
///
/// Failures are per item: one bad text must never abort a whole batch, so
/// `embed` returns one `Result` per input, positionally aligned.
pub trait EmbeddingProvider: Send + Sync {
    fn name(&self) -> &str;
    fn dim(&self) -> usize;
    fn embed_one(&self, text: &str) -> Result<Vector>;

    fn embed(&self, texts: &[String]) -> Vec<Result<Vector>> {
        texts.iter().map(|t| self.embed_one(t)).collect()
    }
}

/// Turns a fully assembled prompt into a natural-language answer.
pub trait AnswerProvider: Send + Sync {
    fn name(&self) -> &str;
    fn generate(&self, prompt: &str) -> Result<String>;
}

/// Produces the documents to index. Per-document failures are logged and
/// skipped by implementations; an `Err` means the whole source is unusable.
pub trait DocumentSource: Send + Sync {
    fn load(&self) -> Result<Vec<Document>>;
}

impl DocumentSource for Vec<Document> {
    fn load(&self) -> Result<Vec<Document>> {
        Ok(self.clone())
    }
}

pub trait VectorIndexer: Send + Sync {
    /// Appends passages. `vectors` is either empty or positionally aligned
    /// with `passages`; empty entries become zero-vector placeholders.
    fn add(&self, passages: Vec<Passage>, vectors: Vec<Vector>);
    fn search(&self, query_vec: &[f32], k: usize) -> Vec<SearchResult>;
    fn len(&self) -> usize;
    fn clear(&self);

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub trait TextIndexer: Send + Sync {
    fn index(&self, passages: &[Passage]);
    fn search(&self, query: &str, k: usize) -> Vec<SearchResult>;
    fn clear(&self);
}
