//! Similarity index: staleness-checked reindexing and exact top-K search
//! over a file-backed [`VectorTable`].
//!
//! Lifecycle: the index is loaded from its file on [`SimilarityIndex::open`]
//! and is queryable from then on. [`SimilarityIndex::reindex_if_stale`] may
//! be called any number of times; it either leaves the table as is or
//! replaces it with a freshly computed, already persisted one.

use crate::error::{IndexError, Result};
use crate::similarity::cosine_similarity;
use crate::table::{Entry, VectorTable};
use serde::Serialize;
use std::future::Future;
use std::path::{Path, PathBuf};

/// A search result containing the entry ID and its cosine similarity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub id: String,
    pub score: f64,
}

/// A [`VectorTable`] bound to the file it is persisted in.
#[derive(Debug)]
pub struct SimilarityIndex {
    path: PathBuf,
    table: VectorTable,
}

impl SimilarityIndex {
    /// Load the index stored at `path`. A missing file yields an empty index.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let table = VectorTable::load(&path)?;
        Ok(Self { path, table })
    }

    /// Wrap an existing table. Nothing is written until the table changes.
    pub fn from_table(path: impl AsRef<Path>, table: VectorTable) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            table,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn table(&self) -> &VectorTable {
        &self.table
    }

    pub fn count(&self) -> usize {
        self.table.count()
    }

    pub fn dimension(&self) -> Option<usize> {
        self.table.dimension()
    }

    /// Whether the table size differs from `current_record_count`.
    ///
    /// This is a coarse heuristic: it assumes the record set does not change
    /// composition once its size matches, so replacing records one-for-one
    /// is not detected.
    pub fn is_stale(&self, current_record_count: usize) -> bool {
        self.table.count() != current_record_count
    }

    /// Rebuild the index when its size differs from `current_record_count`.
    ///
    /// Returns `false` without calling `compute_entries` when the sizes match.
    /// Otherwise the entries from `compute_entries` go into a new table,
    /// which is saved and then swapped in, and `true` is returned. If
    /// computing, validating or saving fails, the error is returned and both
    /// the file and the in-memory table are left as they were.
    pub async fn reindex_if_stale<F, Fut>(
        &mut self,
        current_record_count: usize,
        compute_entries: F,
    ) -> Result<bool>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<Entry>>>,
    {
        if !self.is_stale(current_record_count) {
            tracing::info!(
                entries = self.table.count(),
                "index is up to date, skipping reindex"
            );
            return Ok(false);
        }

        tracing::info!(
            indexed = self.table.count(),
            records = current_record_count,
            "index is stale, rebuilding"
        );

        let entries = compute_entries().await?;
        let mut fresh = VectorTable::new();
        fresh.insert(entries)?;
        fresh.save(&self.path)?;
        self.table = fresh;

        tracing::info!(entries = self.table.count(), "reindex complete");
        Ok(true)
    }

    /// Append `entries` and persist the result. On failure neither the file
    /// nor the in-memory table changes.
    pub fn insert_and_save<I>(&mut self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = Entry>,
    {
        let mut updated = self.table.clone();
        updated.insert(entries)?;
        updated.save(&self.path)?;
        self.table = updated;
        Ok(())
    }

    /// Return the `top_k` entries most similar to `vector` by cosine
    /// similarity, best first.
    ///
    /// Equal scores keep table insertion order. A zero-norm vector scores 0
    /// against everything. `top_k <= 0` yields no results; a `top_k` past the
    /// table size yields every entry. An empty table has no dimension yet and
    /// yields no results for any query.
    pub fn query(&self, vector: &[f64], top_k: i64) -> Result<Vec<SearchResult>> {
        let Some(expected) = self.table.dimension() else {
            return Ok(vec![]);
        };
        if vector.len() != expected {
            return Err(IndexError::DimensionMismatch {
                expected,
                actual: vector.len(),
            });
        }
        if let Some(pos) = vector.iter().position(|x| !x.is_finite()) {
            return Err(IndexError::InvalidVector {
                reason: format!("query component {} is not finite ({})", pos, vector[pos]),
            });
        }
        if top_k <= 0 {
            return Ok(vec![]);
        }

        let mut results: Vec<SearchResult> = self
            .table
            .iter()
            .map(|entry| SearchResult {
                id: entry.id.clone(),
                score: cosine_similarity(vector, entry.vector.as_slice()),
            })
            .collect();

        // sort_by is stable, so ties stay in insertion order
        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        results.truncate(usize::try_from(top_k).unwrap_or(usize::MAX));
        Ok(results)
    }
}
