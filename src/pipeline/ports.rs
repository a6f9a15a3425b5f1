//! Collaborator interfaces consumed by the pipelines.
//!
//! The record store, the embedding service and the query rewriter live
//! outside this crate. Implementations wrap their own failures in
//! [`IndexError::UpstreamService`](crate::error::IndexError::UpstreamService)
//! (see [`IndexError::upstream`](crate::error::IndexError::upstream)).

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of the embedding model vectors are produced with.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelId(String);

impl ModelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModelId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A domain record that can be indexed.
pub trait IndexedRecord: Send + Sync {
    /// Stable identifier, stored verbatim in the index file.
    fn record_id(&self) -> String;

    /// Text to embed. Must be a pure function of the record's fields.
    fn description(&self) -> String;
}

/// Source of the records being indexed and of the records search hits
/// resolve to.
pub trait RecordStore: Send + Sync {
    type Record: IndexedRecord;

    fn fetch_all(&self) -> Result<Vec<Self::Record>>;

    fn get_by_id(&self, id: &str) -> Result<Option<Self::Record>>;
}

/// Text embedding service.
#[async_trait]
pub trait EmbeddingService: Send + Sync {
    /// Embed `texts`, returning one vector per text in input order.
    async fn embed_batch(&self, texts: &[String], model: &ModelId) -> Result<Vec<Vec<f64>>>;

    /// Embed a single text.
    async fn embed(&self, text: &str, model: &ModelId) -> Result<Vec<f64>> {
        let mut vectors = self.embed_batch(&[text.to_string()], model).await?;
        match vectors.len() {
            1 => Ok(vectors.remove(0)),
            n => Err(crate::error::IndexError::upstream(
                "embedding",
                "embed query",
                format!("expected 1 vector, got {}", n),
            )),
        }
    }
}

/// Optional step that reformulates a raw query before it is embedded.
#[async_trait]
pub trait QueryRewriter: Send + Sync {
    async fn rewrite(&self, text: &str) -> Result<String>;
}
