//! The initialize/query state machine.
//!
//! `initialize()` loads documents from a [`DocumentSource`], chunks them,
//! embeds every passage in batches on a bounded thread pool and fills both the
//! vector and the keyword index. `query()` embeds the question and searches the
//! vector index, or falls back to keyword search when no query vector can be
//! produced; the retrieved passages then go to the answer provider, with a
//! templated answer when generation fails.

use parking_lot::{Mutex, RwLock};
use rayon::prelude::*;

use localrag_core::chunker::TextChunker;
use localrag_core::config::{AppConfig, EmbeddingSettings};
use localrag_core::error::{Error, Result};
use localrag_core::traits::{AnswerProvider, DocumentSource, EmbeddingProvider, TextIndexer, VectorIndexer};
use localrag_core::types::{AnswerKind, Passage, QueryResponse, SearchResult, SourceKind, Vector};
use localrag_text::KeywordIndex;
use localrag_vector::VectorIndex;

use crate::prompt::{build_prompt, format_fallback_answer, NO_RESULTS_ANSWER};

/// How passages were loaded into the vector index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexMode {
    /// At least one passage has a real embedding; passages without one were dropped.
    Vector,
    /// Every embedding failed: all passages are stored with zero-vector
    /// placeholders and only keyword search can reach them.
    Basic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitReport {
    pub documents: usize,
    pub passages: usize,
    pub indexed: usize,
    pub failed_embeddings: usize,
    pub mode: IndexMode,
}

/// Batching of ingestion-time embedding requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbedOptions {
    /// Texts per provider call.
    pub batch_size: usize,
    /// Provider calls in flight at once.
    pub concurrency: usize,
}

impl Default for EmbedOptions {
    fn default() -> Self {
        Self { batch_size: 32, concurrency: 4 }
    }
}

impl From<&EmbeddingSettings> for EmbedOptions {
    fn from(settings: &EmbeddingSettings) -> Self {
        Self { batch_size: settings.batch_size, concurrency: settings.concurrency }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Uninitialized,
    Loading,
    Ready(IndexMode),
}

pub struct RagPipeline<VI = VectorIndex, TI = KeywordIndex>
where
    VI: VectorIndexer,
    TI: TextIndexer,
{
    source: Box<dyn DocumentSource>,
    embedder: Box<dyn EmbeddingProvider>,
    answerer: Box<dyn AnswerProvider>,
    chunker: TextChunker,
    options: EmbedOptions,
    vector: VI,
    text: TI,
    state: RwLock<State>,
    init_lock: Mutex<()>,
}

impl RagPipeline {
    /// Pipeline over the in-memory indexes, sized to the embedder's dimensionality.
    pub fn new(
        source: Box<dyn DocumentSource>,
        embedder: Box<dyn EmbeddingProvider>,
        answerer: Box<dyn AnswerProvider>,
    ) -> Self {
        let vector = VectorIndex::new(embedder.dim());
        Self::with_indexes(source, embedder, answerer, vector, KeywordIndex::new())
    }

    /// Chunking and batching taken from `settings`.
    pub fn from_settings(
        settings: &AppConfig,
        source: Box<dyn DocumentSource>,
        embedder: Box<dyn EmbeddingProvider>,
        answerer: Box<dyn AnswerProvider>,
    ) -> Self {
        Self::new(source, embedder, answerer)
            .with_chunker(TextChunker::new(settings.chunking.clone()))
            .with_embed_options(EmbedOptions::from(&settings.embedding))
    }
}

impl<VI, TI> RagPipeline<VI, TI>
where
    VI: VectorIndexer,
    TI: TextIndexer,
{
    pub fn with_indexes(
        source: Box<dyn DocumentSource>,
        embedder: Box<dyn EmbeddingProvider>,
        answerer: Box<dyn AnswerProvider>,
        vector: VI,
        text: TI,
    ) -> Self {
        Self {
            source,
            embedder,
            answerer,
            chunker: TextChunker::default(),
            options: EmbedOptions::default(),
            vector,
            text,
            state: RwLock::new(State::Uninitialized),
            init_lock: Mutex::new(()),
        }
    }

    pub fn with_chunker(mut self, chunker: TextChunker) -> Self {
        self.chunker = chunker;
        self
    }

    pub fn with_embed_options(mut self, options: EmbedOptions) -> Self {
        self.options = options;
        self
    }

    pub fn is_ready(&self) -> bool {
        matches!(*self.state.read(), State::Ready(_))
    }

    /// `None` until `initialize()` has completed.
    pub fn mode(&self) -> Option<IndexMode> {
        match *self.state.read() {
            State::Ready(mode) => Some(mode),
            _ => None,
        }
    }

    pub fn passage_count(&self) -> usize {
        self.vector.len()
    }

    /// Loads, chunks, embeds and indexes every document.
    ///
    /// Calling it again clears both indexes and reloads from the source;
    /// queries issued meanwhile fail with [`Error::NotInitialized`]. Embedding
    /// failures never fail initialization. Only an unusable document source
    /// does, which leaves the pipeline uninitialized.
    pub fn initialize(&self) -> Result<InitReport> {
        let _guard = self.init_lock.lock();
        *self.state.write() = State::Loading;
        self.vector.clear();
        self.text.clear();

        let outcome = self.load_and_index();
        *self.state.write() = match &outcome {
            Ok(report) => State::Ready(report.mode),
            Err(_) => State::Uninitialized,
        };
        outcome
    }

    fn load_and_index(&self) -> Result<InitReport> {
        let documents = self.source.load()?;
        let passages = self.chunker.split_documents(&documents);
        tracing::info!(documents = documents.len(), passages = passages.len(), "chunked documents");

        let texts: Vec<String> = passages.iter().map(|p| p.content.clone()).collect();
        let embeddings = self.embed_all(&texts);

        let total = passages.len();
        let mut kept: Vec<Passage> = Vec::with_capacity(total);
        let mut vectors: Vec<Vector> = Vec::with_capacity(total);
        let mut dropped: Vec<Passage> = Vec::new();
        for (passage, embedding) in passages.into_iter().zip(embeddings) {
            match embedding {
                Ok(vector) => {
                    kept.push(passage);
                    vectors.push(vector);
                }
                Err(e) => {
                    tracing::debug!(source = %passage.source, chunk = passage.chunk_index, error = %e, "embedding failed");
                    dropped.push(passage);
                }
            }
        }
        let failed_embeddings = dropped.len();

        let mode = if total > 0 && kept.is_empty() {
            tracing::warn!(passages = total, "all embeddings failed; indexing every passage without vectors");
            kept = dropped;
            vectors.clear();
            IndexMode::Basic
        } else {
            if failed_embeddings > 0 {
                tracing::warn!(failed = failed_embeddings, total, "dropping passages without embeddings");
            }
            IndexMode::Vector
        };

        let indexed = kept.len();
        self.text.index(&kept);
        self.vector.add(kept, vectors);
        tracing::info!(indexed, ?mode, "pipeline ready");

        Ok(InitReport { documents: documents.len(), passages: total, indexed, failed_embeddings, mode })
    }

    /// One result per text, in input order. Batches run on a pool of
    /// `concurrency` threads; `par_iter().collect()` keeps batch order.
    fn embed_all(&self, texts: &[String]) -> Vec<Result<Vector>> {
        if texts.is_empty() {
            return Vec::new();
        }
        let batches: Vec<&[String]> = texts.chunks(self.options.batch_size.max(1)).collect();
        let embedder = self.embedder.as_ref();
        tracing::info!(
            provider = embedder.name(),
            texts = texts.len(),
            batches = batches.len(),
            concurrency = self.options.concurrency,
            "embedding passages"
        );

        let per_batch: Vec<Vec<Result<Vector>>> =
            match rayon::ThreadPoolBuilder::new().num_threads(self.options.concurrency.max(1)).build() {
                Ok(pool) => pool.install(|| batches.par_iter().map(|batch| embed_batch(embedder, batch)).collect()),
                Err(e) => {
                    tracing::warn!(error = %e, "could not start embedding pool; embedding sequentially");
                    batches.iter().map(|batch| embed_batch(embedder, batch)).collect()
                }
            };
        per_batch.into_iter().flatten().collect()
    }

    /// Answers `question` from the `k` best passages.
    ///
    /// Fails only with [`Error::NotInitialized`]; provider failures degrade to
    /// keyword search and to the templated answer.
    pub fn query(&self, question: &str, k: usize) -> Result<QueryResponse> {
        let (sources, retrieval) = self.search(question, k)?;
        let (answer, answer_kind) = self.compose_answer(question, &sources);
        Ok(QueryResponse { question: question.to_string(), answer, sources, retrieval, answer_kind })
    }

    /// Retrieval only: the ranked passages and which engine produced them.
    ///
    /// Holds the state lock for the whole retrieval, so a concurrent
    /// `initialize()` waits instead of clearing the indexes mid-query.
    pub fn search(&self, question: &str, k: usize) -> Result<(Vec<SearchResult>, SourceKind)> {
        let state = self.state.read();
        if !matches!(*state, State::Ready(_)) {
            return Err(Error::NotInitialized);
        }
        let query_vec = match self.embedder.embed_one(question) {
            Ok(v) if !v.is_empty() => Some(v),
            Ok(_) => {
                tracing::warn!(provider = self.embedder.name(), "empty query embedding; using keyword search");
                None
            }
            Err(e) => {
                tracing::warn!(provider = self.embedder.name(), error = %e, "query embedding failed; using keyword search");
                None
            }
        };
        let (results, origin) = match query_vec {
            Some(v) => (self.vector.search(&v, k), SourceKind::Vector),
            None => (self.text.search(question, k), SourceKind::Lexical),
        };
        drop(state);
        tracing::debug!(hits = results.len(), ?origin, "retrieved passages");
        Ok((results, origin))
    }

    fn compose_answer(&self, question: &str, sources: &[SearchResult]) -> (String, AnswerKind) {
        if sources.is_empty() {
            return (NO_RESULTS_ANSWER.to_string(), AnswerKind::NoResults);
        }
        let prompt = build_prompt(question, sources);
        match self.answerer.generate(&prompt) {
            Ok(answer) if !answer.trim().is_empty() => (answer, AnswerKind::Generated),
            Ok(_) => {
                tracing::warn!(provider = self.answerer.name(), "empty generated answer; using summary");
                (format_fallback_answer(question, sources), AnswerKind::Fallback)
            }
            Err(e) => {
                tracing::warn!(provider = self.answerer.name(), error = %e, "answer generation failed; using summary");
                (format_fallback_answer(question, sources), AnswerKind::Fallback)
            }
        }
    }
}

/// Embeds one batch, forcing the result to line up with the input: missing
/// slots and empty vectors become per-item errors.
fn embed_batch(embedder: &dyn EmbeddingProvider, batch: &[String]) -> Vec<Result<Vector>> {
    let mut results = embedder.embed(batch);
    if results.len() != batch.len() {
        tracing::warn!(expected = batch.len(), got = results.len(), "embedding provider returned a misaligned batch");
        results.truncate(batch.len());
        results.resize_with(batch.len(), || {
            Err(Error::Operation(format!("no embedding returned by '{}'", embedder.name())))
        });
    }
    results
        .into_iter()
        .map(|r| match r {
            Ok(v) if v.is_empty() => Err(Error::EmptyEmbedding { provider: embedder.name().to_string() }),
            other => other,
        })
        .collect()
}
