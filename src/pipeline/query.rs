//! Query pipeline: turns free text into ranked domain records.

use crate::config::IndexConfig;
use crate::error::{IndexError, Result};
use crate::index::SimilarityIndex;
use crate::pipeline::call_upstream;
use crate::pipeline::ports::{EmbeddingService, ModelId, QueryRewriter, RecordStore};
use std::sync::Arc;
use std::time::Duration;

/// A ranked record returned by [`QueryPipeline::search`].
#[derive(Debug, Clone)]
pub struct SearchHit<R> {
    /// Zero-based position in the result list.
    pub rank: usize,
    pub record: R,
    pub score: f64,
}

#[derive(Debug, Clone)]
pub struct SearchResponse<R> {
    /// The text that was actually embedded, after any rewrite.
    pub query: String,
    pub hits: Vec<SearchHit<R>>,
    /// Index ids with no matching record in the store. These indicate the
    /// index and the store have drifted apart; they are left out of `hits`.
    pub missing_ids: Vec<String>,
}

pub struct QueryPipeline<S: RecordStore> {
    index: SimilarityIndex,
    store: Arc<S>,
    embedder: Arc<dyn EmbeddingService>,
    rewriter: Option<Arc<dyn QueryRewriter>>,
    model: ModelId,
    timeout: Option<Duration>,
    default_top_k: i64,
}

impl<S: RecordStore> QueryPipeline<S> {
    pub fn new(
        index: SimilarityIndex,
        store: Arc<S>,
        embedder: Arc<dyn EmbeddingService>,
        model: ModelId,
    ) -> Self {
        Self {
            index,
            store,
            embedder,
            rewriter: None,
            model,
            timeout: None,
            default_top_k: IndexConfig::DEFAULT_TOP_K,
        }
    }

    /// Open the index file named by `config` and apply its model, timeout
    /// and default result count.
    pub fn from_config(
        config: &IndexConfig,
        store: Arc<S>,
        embedder: Arc<dyn EmbeddingService>,
    ) -> Result<Self> {
        let index = SimilarityIndex::open(&config.index_path)?;
        Ok(Self::new(index, store, embedder, config.embedding_model.clone())
            .with_timeout(config.upstream_timeout())
            .with_default_top_k(config.default_top_k))
    }

    pub fn with_rewriter(mut self, rewriter: Arc<dyn QueryRewriter>) -> Self {
        self.rewriter = Some(rewriter);
        self
    }

    /// Bound each rewrite and embedding call by `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_default_top_k(mut self, top_k: i64) -> Self {
        self.default_top_k = top_k;
        self
    }

    pub fn index(&self) -> &SimilarityIndex {
        &self.index
    }

    /// [`search`](Self::search) with the configured default result count.
    pub async fn search_default(&self, text: &str) -> Result<SearchResponse<S::Record>> {
        self.search(text, self.default_top_k).await
    }

    /// Search for the records whose descriptions best match `text`.
    pub async fn search(&self, text: &str, max_results: i64) -> Result<SearchResponse<S::Record>> {
        if text.trim().is_empty() {
            return Err(IndexError::InvalidQuery {
                reason: "query text is empty".to_string(),
            });
        }

        let query = match &self.rewriter {
            Some(rewriter) => {
                let rewritten = call_upstream(
                    "rewrite",
                    format!("rewrite query {:?}", text),
                    self.timeout,
                    rewriter.rewrite(text),
                )
                .await?;
                tracing::info!(original = text, rewritten = %rewritten, "modified query");
                if rewritten.trim().is_empty() {
                    return Err(IndexError::upstream(
                        "rewrite",
                        format!("rewrite query {:?}", text),
                        "rewriter returned an empty query",
                    ));
                }
                rewritten
            }
            None => text.to_string(),
        };

        tracing::info!(query = %query, "searching with final query");

        let vector = call_upstream(
            "embedding",
            format!("embed query {:?}", query),
            self.timeout,
            self.embedder.embed(&query, &self.model),
        )
        .await?;

        let results = self.index.query(&vector, max_results)?;
        tracing::info!(count = results.len(), "finished with result(s)");

        let mut hits = Vec::with_capacity(results.len());
        let mut missing_ids = Vec::new();
        for result in results {
            match self.store.get_by_id(&result.id)? {
                Some(record) => hits.push(SearchHit {
                    rank: hits.len(),
                    record,
                    score: result.score,
                }),
                None => {
                    tracing::error!(id = %result.id, "indexed id has no matching record");
                    missing_ids.push(result.id);
                }
            }
        }

        Ok(SearchResponse {
            query,
            hits,
            missing_ids,
        })
    }
}
