//! # Embedding Index
//!
//! A small persistent vector index for semantic search over a fixed record
//! set. It stores `(id, embedding)` pairs in a single tabular file, rebuilds
//! them when the record count changes, and answers exact top-K cosine
//! similarity queries.
//!
//! This library provides:
//! - [`VectorTable`]: ordered in-memory entries with atomic whole-file saves
//! - [`SimilarityIndex`]: staleness-checked reindexing and top-K search
//! - [`pipeline`]: indexing and query orchestration over pluggable record
//!   store, embedding and query-rewrite collaborators
//!
//! ## Example
//!
//! ```rust
//! use embedding_index::{Entry, SimilarityIndex, VectorTable};
//!
//! let mut table = VectorTable::new();
//! table.insert(vec![
//!     Entry::new("east", vec![1.0, 0.0]),
//!     Entry::new("north", vec![0.0, 1.0]),
//! ]).unwrap();
//!
//! let index = SimilarityIndex::from_table("textEmbeddingsIndex.csv", table);
//! let results = index.query(&[0.9, 0.1], 1).unwrap();
//! assert_eq!(results[0].id, "east");
//! ```

pub mod config;
pub mod error;
pub mod index;
pub mod persistence;
pub mod pipeline;
pub mod similarity;
pub mod table;
pub mod vector;

pub use config::IndexConfig;
pub use error::{ErrorKind, IndexError, Result};
pub use index::{SearchResult, SimilarityIndex};
pub use table::{Entry, VectorTable};
pub use vector::Vector;
