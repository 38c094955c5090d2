//! Sentence-aware, overlapping character windows over a document.

use serde::{Deserialize, Serialize};

use crate::types::{Document, Passage};

const SENTENCE_ENDINGS: [char; 3] = ['.', '!', '?'];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Window length in characters.
    pub chunk_size: usize,
    /// Characters shared between consecutive windows.
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self { chunk_size: 1000, chunk_overlap: 200 }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TextChunker {
    config: ChunkingConfig,
}

impl TextChunker {
    pub fn new(config: ChunkingConfig) -> Self {
        Self { config }
    }

    pub fn with_sizes(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self::new(ChunkingConfig { chunk_size, chunk_overlap })
    }

    pub fn config(&self) -> &ChunkingConfig {
        &self.config
    }

    pub fn split_documents(&self, documents: &[Document]) -> Vec<Passage> {
        documents.iter().flat_map(|doc| self.split(doc)).collect()
    }

    /// Splits one document into passages.
    ///
    /// Each window is `chunk_size` characters, pulled back to end just after
    /// the last `.`, `!` or `?` inside it unless it is the final window. The
    /// cursor then moves to `end - chunk_overlap`, but always at least one
    /// character forward, so any overlap terminates. The window that reaches
    /// the end of the content is the last one.
    pub fn split(&self, document: &Document) -> Vec<Passage> {
        let chars: Vec<char> = document.content.chars().collect();
        let len = chars.len();
        let chunk_size = self.config.chunk_size.max(1);
        let mut passages = Vec::new();

        let mut start = 0usize;
        while start < len {
            let window_end = start + chunk_size;
            let end = if window_end < len {
                match chars[start..window_end].iter().rposition(|c| SENTENCE_ENDINGS.contains(c)) {
                    Some(pos) if pos > 0 => start + pos + 1,
                    _ => window_end,
                }
            } else {
                len
            };

            let text: String = chars[start..end].iter().collect();
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                passages.push(Passage {
                    content: trimmed.to_string(),
                    source: document.source.clone(),
                    chunk_index: passages.len(),
                    start_offset: start,
                    end_offset: end,
                    metadata: document.metadata.clone(),
                });
            }

            if end >= len {
                break;
            }
            start = (start + 1).max(end.saturating_sub(self.config.chunk_overlap));
        }

        passages
    }
}
