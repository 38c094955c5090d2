//! Domain types shared by the chunker, both search engines and the pipeline.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub type Meta = BTreeMap<String, serde_json::Value>;

/// A dense embedding. Dimensionality is fixed by the embedding provider.
pub type Vector = Vec<f32>;

/// Format a document was extracted from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DocType {
    Text,
    Pdf,
    Docx,
}

impl DocType {
    /// Maps a file extension (without the dot, any case) to a document type.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "txt" => Some(Self::Text),
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            _ => None,
        }
    }
}

impl fmt::Display for DocType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Text => "text",
            Self::Pdf => "pdf",
            Self::Docx => "docx",
        };
        f.write_str(name)
    }
}

/// Raw text of one ingested file, before chunking.
///
/// - `source`: stable identifier of the origin (the file path for on-disk sources)
/// - `metadata`: free-form attributes copied onto every passage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub content: String,
    pub source: String,
    pub doc_type: DocType,
    pub metadata: Meta,
}

impl Document {
    pub fn new(content: impl Into<String>, source: impl Into<String>, doc_type: DocType) -> Self {
        Self { content: content.into(), source: source.into(), doc_type, metadata: Meta::new() }
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// A contiguous, possibly overlapping slice of a document: the unit of retrieval.
///
/// `start_offset`/`end_offset` are character (not byte) offsets into the
/// parent document's content, before whitespace trimming. `chunk_index` is
/// 0-based and relative to the parent document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passage {
    pub content: String,
    pub source: String,
    pub chunk_index: usize,
    pub start_offset: usize,
    pub end_offset: usize,
    pub metadata: Meta,
}

/// Indicates which engine produced a result.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SourceKind {
    Vector,
    Lexical,
}

/// A ranked passage.
///
/// `score` is a cosine similarity in `(0, 1]` for vector hits and one of
/// `1.0` (whole question matched) or `0.5` (some token matched) for lexical
/// hits. Higher is always better.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub passage: Passage,
    pub score: f32,
    pub origin: SourceKind,
}

/// How the answer text of a [`QueryResponse`] was produced.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AnswerKind {
    /// Written by the answer-generation provider.
    Generated,
    /// Templated summary used because generation failed.
    Fallback,
    /// Nothing was retrieved; fixed message.
    NoResults,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    pub question: String,
    pub answer: String,
    pub sources: Vec<SearchResult>,
    pub retrieval: SourceKind,
    pub answer_kind: AnswerKind,
}
