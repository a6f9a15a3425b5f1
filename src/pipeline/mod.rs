//! Orchestration that drives the index from live data.
//!
//! - [`IndexingPipeline`]: record store → descriptions → embeddings → index file
//! - [`QueryPipeline`]: query text → optional rewrite → embedding → ranked records
//!
//! Calls to the embedding service and the rewriter are the only suspension
//! points. Table scans, scoring and serialization run synchronously.

pub mod indexing;
pub mod ports;
pub mod query;

pub use indexing::{IndexingPipeline, IndexingReport};
pub use ports::{EmbeddingService, IndexedRecord, ModelId, QueryRewriter, RecordStore};
pub use query::{QueryPipeline, SearchHit, SearchResponse};

use crate::error::{IndexError, Result};
use std::future::Future;
use std::time::Duration;

/// Await a collaborator call, bounded by `timeout` when one is set.
/// Errors from the call pass through unchanged; nothing is retried.
pub(crate) async fn call_upstream<T, Fut>(
    service: &'static str,
    operation: impl Into<String>,
    timeout: Option<Duration>,
    call: Fut,
) -> Result<T>
where
    Fut: Future<Output = Result<T>>,
{
    match timeout {
        None => call.await,
        Some(after) => match tokio::time::timeout(after, call).await {
            Ok(result) => result,
            Err(_) => Err(IndexError::Timeout {
                service,
                operation: operation.into(),
                after,
            }),
        },
    }
}
