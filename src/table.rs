//! In-memory vector table with whole-file persistence

use crate::error::{IndexError, Result};
use crate::persistence::{csv, snapshot};
use crate::vector::Vector;
use std::path::Path;

/// An identifier paired with its embedding vector
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub id: String,
    pub vector: Vector,
}

impl Entry {
    pub fn new(id: impl Into<String>, vector: impl Into<Vector>) -> Self {
        Self {
            id: id.into(),
            vector: vector.into(),
        }
    }
}

/// Ordered `id -> vector` table.
///
/// Rows keep insertion order, which is also the order they are written to
/// disk. Ids are not deduplicated; keeping them unique is the caller's job.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VectorTable {
    entries: Vec<Entry>,
    /// Enforced vector dimension
    dimension: Option<usize>,
}

impl VectorTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a table from `path`. A missing file yields an empty table.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let Some(text) = snapshot::read_if_exists(path)? else {
            tracing::debug!(path = %path.display(), "no index file, starting empty");
            return Ok(Self::new());
        };

        let decoded = csv::decode(&text, path)?;
        tracing::debug!(
            path = %path.display(),
            entries = decoded.entries.len(),
            dimension = ?decoded.dimension,
            "loaded index file"
        );
        Ok(Self {
            entries: decoded.entries,
            dimension: decoded.dimension,
        })
    }

    /// Write the whole table to `path`, replacing any existing file atomically.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let text = csv::encode(&self.entries, self.dimension);
        snapshot::write_atomic(path, text.as_bytes())?;
        tracing::debug!(path = %path.display(), entries = self.entries.len(), "saved index file");
        Ok(())
    }

    /// Append all `entries` in order.
    ///
    /// The batch is validated up front: every id must be non-empty and every
    /// vector non-empty, finite, and of the table's dimension (or, for an
    /// empty table, of the first vector's dimension). On error nothing is
    /// appended.
    pub fn insert<I>(&mut self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = Entry>,
    {
        let batch: Vec<Entry> = entries.into_iter().collect();
        let mut dimension = self.dimension;

        for entry in &batch {
            if entry.id.is_empty() {
                return Err(IndexError::InvalidRecord {
                    reason: "entry id must not be empty".to_string(),
                });
            }
            entry.vector.validate()?;

            let dim = entry.vector.dimension();
            match dimension {
                Some(expected) if expected != dim => {
                    return Err(IndexError::DimensionMismatch {
                        expected,
                        actual: dim,
                    });
                }
                Some(_) => {}
                None => dimension = Some(dim),
            }
        }

        self.dimension = dimension;
        self.entries.extend(batch);
        Ok(())
    }

    /// Remove every entry, forgetting the established dimension.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.dimension = None;
    }

    /// Get the number of entries in the table
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in insertion order
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    /// Get the dimension of vectors in this table (if any)
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }
}
