//! Shared test fakes for the pipeline collaborators.

#![allow(dead_code)]

use async_trait::async_trait;
use embedding_index::pipeline::{EmbeddingService, IndexedRecord, ModelId, QueryRewriter, RecordStore};
use embedding_index::{IndexError, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Words the fake embedder projects text onto, one dimension each.
pub const VOCABULARY: [&str; 5] = ["space", "robot", "love", "ocean", "heist"];

#[derive(Debug, Clone, PartialEq)]
pub struct Movie {
    pub id: String,
    pub title: String,
    pub overview: String,
}

impl Movie {
    pub fn new(id: &str, title: &str, overview: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            overview: overview.to_string(),
        }
    }
}

impl IndexedRecord for Movie {
    fn record_id(&self) -> String {
        self.id.clone()
    }

    fn description(&self) -> String {
        format!("{}: {}", self.title, self.overview)
    }
}

pub fn sample_movies() -> Vec<Movie> {
    vec![
        Movie::new(
            "2d0f6a4e-1111-4c1e-9d5a-000000000001",
            "Orbit",
            "A lonely robot drifts through space",
        ),
        Movie::new(
            "2d0f6a4e-2222-4c1e-9d5a-000000000002",
            "Tides",
            "A love story set on the ocean",
        ),
        Movie::new(
            "2d0f6a4e-3333-4c1e-9d5a-000000000003",
            "The Vault",
            "A heist crew plans one last heist",
        ),
    ]
}

#[derive(Default)]
pub struct InMemoryStore {
    movies: Mutex<Vec<Movie>>,
}

impl InMemoryStore {
    pub fn with_movies(movies: Vec<Movie>) -> Self {
        Self {
            movies: Mutex::new(movies),
        }
    }

    pub fn push(&self, movie: Movie) {
        self.movies.lock().unwrap().push(movie);
    }

    pub fn remove(&self, id: &str) {
        self.movies.lock().unwrap().retain(|m| m.id != id);
    }
}

impl RecordStore for InMemoryStore {
    type Record = Movie;

    fn fetch_all(&self) -> Result<Vec<Movie>> {
        Ok(self.movies.lock().unwrap().clone())
    }

    fn get_by_id(&self, id: &str) -> Result<Option<Movie>> {
        Ok(self.movies.lock().unwrap().iter().find(|m| m.id == id).cloned())
    }
}

/// Embeds text as word counts over [`VOCABULARY`].
#[derive(Default)]
pub struct KeywordEmbedder {
    pub batch_calls: AtomicUsize,
    pub texts_seen: Mutex<Vec<String>>,
    pub fail_with: Mutex<Option<String>>,
    /// Drop this many vectors from every batch response.
    pub drop_vectors: AtomicUsize,
}

impl KeywordEmbedder {
    pub fn failing(message: &str) -> Self {
        let embedder = Self::default();
        *embedder.fail_with.lock().unwrap() = Some(message.to_string());
        embedder
    }

    pub fn calls(&self) -> usize {
        self.batch_calls.load(Ordering::SeqCst)
    }

    pub fn vectorize(text: &str) -> Vec<f64> {
        let lower = text.to_lowercase();
        let words: Vec<&str> = lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();
        VOCABULARY
            .iter()
            .map(|term| words.iter().filter(|w| *w == term).count() as f64)
            .collect()
    }
}

#[async_trait]
impl EmbeddingService for KeywordEmbedder {
    async fn embed_batch(&self, texts: &[String], _model: &ModelId) -> Result<Vec<Vec<f64>>> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        self.texts_seen.lock().unwrap().extend(texts.iter().cloned());
        if let Some(message) = self.fail_with.lock().unwrap().clone() {
            return Err(IndexError::upstream(
                "embedding",
                format!("embed {} texts", texts.len()),
                message,
            ));
        }
        let drop = self.drop_vectors.load(Ordering::SeqCst);
        let keep = texts.len().saturating_sub(drop);
        Ok(texts.iter().take(keep).map(|t| Self::vectorize(t)).collect())
    }
}

/// Embeds everything into a fixed-size zero vector of the given dimension.
pub struct FixedDimensionEmbedder(pub usize);

#[async_trait]
impl EmbeddingService for FixedDimensionEmbedder {
    async fn embed_batch(&self, texts: &[String], _model: &ModelId) -> Result<Vec<Vec<f64>>> {
        Ok(texts.iter().map(|_| vec![0.5; self.0]).collect())
    }
}

/// Replaces whole queries from a lookup table, leaving others unchanged.
#[derive(Default)]
pub struct TableRewriter {
    pub rewrites: HashMap<String, String>,
    pub calls: AtomicUsize,
}

impl TableRewriter {
    pub fn new(pairs: &[(&str, &str)]) -> Self {
        Self {
            rewrites: pairs
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl QueryRewriter for TableRewriter {
    async fn rewrite(&self, text: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .rewrites
            .get(text)
            .cloned()
            .unwrap_or_else(|| text.to_string()))
    }
}

pub struct FailingRewriter;

#[async_trait]
impl QueryRewriter for FailingRewriter {
    async fn rewrite(&self, _text: &str) -> Result<String> {
        Err(IndexError::upstream("rewrite", "complete chat prompt", "rate limited"))
    }
}
