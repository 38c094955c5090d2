//! localrag-vector
//!
//! In-memory vector index with exact cosine-similarity search. O(N·D) per
//! query; intended for corpora in the low thousands of passages.
pub mod index;
pub mod similarity;

pub use index::VectorIndex;
pub use similarity::cosine_similarity;
