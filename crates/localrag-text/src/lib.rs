//! localrag-text
//!
//! Degraded-mode lexical search: case-insensitive substring matching of the
//! question, then of its individual tokens, against raw passage text. Used when
//! no query embedding can be produced.
pub mod index;
pub mod search;

pub use index::KeywordIndex;
pub use search::{keyword_score, keyword_search, EXACT_MATCH_SCORE, PARTIAL_MATCH_SCORE};
