//! Index configuration

use crate::error::{IndexError, Result};
use crate::pipeline::ports::ModelId;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration shared by the indexing and query pipelines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Location of the index file.
    pub index_path: PathBuf,
    /// Result count used when a search does not ask for one.
    pub default_top_k: i64,
    /// Model the stored vectors were embedded with. Queries must use the same.
    pub embedding_model: ModelId,
    /// Upper bound on each embedding or rewrite call, in milliseconds.
    pub upstream_timeout_ms: Option<u64>,
}

impl IndexConfig {
    pub const DEFAULT_INDEX_FILE: &'static str = "textEmbeddingsIndex.csv";
    pub const DEFAULT_TOP_K: i64 = 100;
    pub const DEFAULT_MODEL: &'static str = "text-embedding-3-small";

    /// Read a JSON config file. Missing fields take their default values.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| IndexError::io("reading config", path, e))?;
        serde_json::from_slice(&bytes).map_err(|e| IndexError::Config {
            reason: format!("{}: {}", path.display(), e),
        })
    }

    pub fn upstream_timeout(&self) -> Option<Duration> {
        self.upstream_timeout_ms.map(Duration::from_millis)
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            index_path: PathBuf::from(Self::DEFAULT_INDEX_FILE),
            default_top_k: Self::DEFAULT_TOP_K,
            embedding_model: ModelId::new(Self::DEFAULT_MODEL),
            upstream_timeout_ms: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = IndexConfig::default();
        assert_eq!(config.index_path, PathBuf::from("textEmbeddingsIndex.csv"));
        assert_eq!(config.default_top_k, 100);
        assert_eq!(config.embedding_model.as_str(), "text-embedding-3-small");
        assert_eq!(config.upstream_timeout(), None);
    }

    #[test]
    fn test_from_json_file_partial() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{ "index_path": "/data/movies.csv", "upstream_timeout_ms": 2500 }"#,
        )
        .unwrap();

        let config = IndexConfig::from_json_file(&path).unwrap();
        assert_eq!(config.index_path, PathBuf::from("/data/movies.csv"));
        assert_eq!(config.upstream_timeout(), Some(Duration::from_millis(2500)));
        assert_eq!(config.default_top_k, 100);
    }

    #[test]
    fn test_from_json_file_invalid() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            IndexConfig::from_json_file(&path),
            Err(IndexError::Config { .. })
        ));
        assert!(matches!(
            IndexConfig::from_json_file(dir.path().join("missing.json")),
            Err(IndexError::Io { .. })
        ));
    }
}
