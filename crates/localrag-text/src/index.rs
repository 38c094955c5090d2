use parking_lot::RwLock;

use localrag_core::traits::TextIndexer;
use localrag_core::types::{Passage, SearchResult};

use crate::search::keyword_search;

/// Passages plus their lower-cased text, kept for the keyword fallback.
pub struct KeywordIndex {
    entries: RwLock<Vec<(Passage, String)>>,
}

impl KeywordIndex {
    pub fn new() -> Self {
        Self { entries: RwLock::new(Vec::new()) }
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for KeywordIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl TextIndexer for KeywordIndex {
    fn index(&self, passages: &[Passage]) {
        let mut entries = self.entries.write();
        entries.extend(passages.iter().map(|p| (p.clone(), p.content.to_lowercase())));
    }

    fn search(&self, query: &str, k: usize) -> Vec<SearchResult> {
        let entries = self.entries.read();
        keyword_search(entries.iter().map(|(p, lower)| (p, lower.as_str())), query, k)
    }

    fn clear(&self) {
        self.entries.write().clear();
    }
}
