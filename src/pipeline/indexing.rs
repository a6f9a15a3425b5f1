//! Indexing pipeline: embeds every record and rebuilds a stale index.

use crate::error::{IndexError, Result};
use crate::index::SimilarityIndex;
use crate::pipeline::call_upstream;
use crate::pipeline::ports::{EmbeddingService, IndexedRecord, ModelId, RecordStore};
use crate::table::Entry;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

/// Outcome of an indexing run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndexingReport {
    /// Whether the index was rebuilt and saved.
    pub reindexed: bool,
    /// Entries in the index after the run.
    pub entry_count: usize,
}

pub struct IndexingPipeline<S: RecordStore> {
    store: Arc<S>,
    embedder: Arc<dyn EmbeddingService>,
    model: ModelId,
    timeout: Option<Duration>,
}

impl<S: RecordStore> IndexingPipeline<S> {
    pub fn new(store: Arc<S>, embedder: Arc<dyn EmbeddingService>, model: ModelId) -> Self {
        Self {
            store,
            embedder,
            model,
            timeout: None,
        }
    }

    /// Bound the embedding call by `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Index every record in the store, unless the index already holds as
    /// many entries as there are records.
    pub async fn run(&self, index: &mut SimilarityIndex) -> Result<IndexingReport> {
        let records = self.store.fetch_all()?;
        let reindexed = index
            .reindex_if_stale(records.len(), || self.embed_records(records))
            .await?;

        Ok(IndexingReport {
            reindexed,
            entry_count: index.count(),
        })
    }

    /// Embed all record descriptions in one batch and pair the vectors back
    /// with their record ids by position.
    async fn embed_records(&self, records: Vec<S::Record>) -> Result<Vec<Entry>> {
        // Order matters: the service returns vectors in input order
        let mut seen = HashSet::with_capacity(records.len());
        let mut descriptions: Vec<(String, String)> = Vec::with_capacity(records.len());
        for record in &records {
            let id = record.record_id();
            if id.is_empty() {
                return Err(IndexError::InvalidRecord {
                    reason: "record has an empty id".to_string(),
                });
            }
            if !seen.insert(id.clone()) {
                return Err(IndexError::InvalidRecord {
                    reason: format!("duplicate record id '{}'", id),
                });
            }
            descriptions.push((id, record.description()));
        }

        if descriptions.is_empty() {
            return Ok(vec![]);
        }

        let texts: Vec<String> = descriptions.iter().map(|(_, text)| text.clone()).collect();
        let operation = format!("embed {} record descriptions", texts.len());
        tracing::info!(count = texts.len(), model = %self.model, "embedding record descriptions");

        let vectors = call_upstream(
            "embedding",
            operation.clone(),
            self.timeout,
            self.embedder.embed_batch(&texts, &self.model),
        )
        .await?;

        if vectors.len() != descriptions.len() {
            return Err(IndexError::upstream(
                "embedding",
                operation,
                format!(
                    "returned {} vectors for {} texts",
                    vectors.len(),
                    descriptions.len()
                ),
            ));
        }

        Ok(descriptions
            .into_iter()
            .zip(vectors)
            .map(|((id, _), vector)| Entry::new(id, vector))
            .collect())
    }
}
