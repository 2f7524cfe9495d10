//! Candidate search: query embedding, vector retrieval and composite ranking.
//!
//! [`SearchEngine`] owns the loaded index behind a read-write lock holding an
//! `Arc`. Queries clone the `Arc` and run without holding the lock; a rebuild
//! constructs a complete new index first and then swaps the pointer, so a
//! concurrent query sees either the old corpus or the new one.

pub mod cache;
pub mod embeddings;
pub mod highlight;
pub mod openai;
pub mod ranker;
pub mod vector_index;

use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::core::{CandidateRecord, Query, ScoredResult};
use crate::error::{Result, ScreenerError};
use crate::indexer::{BuildReport, IndexBuilder};

pub use cache::{CacheStats, QueryCache};
pub use embeddings::{CancelToken, DeadlineEmbedder, EmbeddingProvider, HashEmbedder};
pub use highlight::highlight_skills;
pub use openai::{OpenAiEmbedder, OpenAiSettings};
pub use ranker::{RankingWeights, rank, rank_with};
pub use vector_index::{IndexPaths, VectorIndex};

/// Index of candidate records.
pub type CandidateIndex = VectorIndex<CandidateRecord>;

/// Query surface over a persisted candidate index.
pub struct SearchEngine {
    paths: IndexPaths,
    embedder: Arc<dyn EmbeddingProvider>,
    weights: RankingWeights,
    cache: Option<QueryCache>,
    index: RwLock<Option<Arc<CandidateIndex>>>,
}

impl SearchEngine {
    /// Engine with no index loaded.
    pub fn new(paths: IndexPaths, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            paths,
            embedder,
            weights: RankingWeights::default(),
            cache: None,
            index: RwLock::new(None),
        }
    }

    /// Engine with the persisted index loaded, if one exists.
    pub fn open(paths: IndexPaths, embedder: Arc<dyn EmbeddingProvider>) -> Result<Self> {
        let engine = Self::new(paths, embedder);
        engine.reload()?;
        Ok(engine)
    }

    #[must_use]
    pub const fn with_weights(mut self, weights: RankingWeights) -> Self {
        self.weights = weights;
        self
    }

    #[must_use]
    pub fn with_cache(mut self, cache: QueryCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub const fn paths(&self) -> &IndexPaths {
        &self.paths
    }

    pub const fn weights(&self) -> &RankingWeights {
        &self.weights
    }

    pub fn embedder(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.embedder
    }

    /// Currently installed index.
    pub fn snapshot(&self) -> Option<Arc<CandidateIndex>> {
        self.index.read().clone()
    }

    pub fn is_built(&self) -> bool {
        self.index.read().is_some()
    }

    /// Replace the installed index.
    pub fn install(&self, index: CandidateIndex) {
        let count = index.len();
        *self.index.write() = Some(Arc::new(index));
        debug!(count, "installed index");
    }

    /// Re-read the persisted artifacts; returns whether an index is loaded.
    pub fn reload(&self) -> Result<bool> {
        let loaded = CandidateIndex::load(&self.paths)?;
        let built = loaded.is_some();
        *self.index.write() = loaded.map(Arc::new);
        Ok(built)
    }

    /// Build from `folder` and swap in the result. An empty build leaves the
    /// installed index untouched.
    pub fn rebuild(&self, builder: &IndexBuilder, folder: &Path) -> Result<BuildReport> {
        let built = builder.build_from_folder(folder)?;
        if let Some(index) = built.index {
            self.install(index);
        }
        Ok(built.report)
    }

    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(QueryCache::stats)
    }

    /// Ranked matches for `query`; empty when no index is built.
    pub fn search(&self, query: &Query) -> Result<Vec<ScoredResult>> {
        if query.k == 0 {
            return Err(ScreenerError::InvalidQuery("k must be positive".to_string()));
        }
        let Some(index) = self.snapshot() else {
            debug!("search without a built index");
            return Ok(Vec::new());
        };

        let query_vector = self.embed_query(&query.text)?;
        let candidates: Vec<(CandidateRecord, f32)> = index
            .search(&query_vector, query.k)?
            .into_iter()
            .map(|(score, record)| (record.clone(), score))
            .collect();

        let results = rank_with(candidates, query, &self.weights);
        info!(
            k = query.k,
            returned = results.len(),
            corpus = index.len(),
            "search complete"
        );
        Ok(results)
    }

    fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        let provider = self.embedder.name();
        if let Some(vector) = self.cache.as_ref().and_then(|c| c.get(provider, text)) {
            return Ok(vector);
        }
        let vector = self.embedder.embed_one(text)?;
        if let Some(cache) = &self.cache {
            cache.put(provider, text, vector.clone());
        }
        Ok(vector)
    }
}
