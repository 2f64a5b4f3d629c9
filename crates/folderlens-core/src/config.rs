//! Configuration and data directory management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Paths to all FolderLens data directories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPaths {
    /// Root data directory (e.g., `data/`).
    pub root: PathBuf,
    /// SQLite database directory (`data/db/`).
    pub db: PathBuf,
    /// File uploads directory (`data/uploads/`).
    pub uploads: PathBuf,
}

impl DataPaths {
    /// Create data paths from a root directory. Creates directories if needed.
    pub fn new(root: impl AsRef<Path>) -> std::io::Result<Self> {
        let root = root.as_ref().to_path_buf();
        let paths = Self {
            db: root.join("db"),
            uploads: root.join("uploads"),
            root,
        };
        paths.ensure_dirs()?;
        Ok(paths)
    }

    fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.db)?;
        std::fs::create_dir_all(&self.uploads)?;
        Ok(())
    }
}

/// Top-level FolderLens configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderLensConfig {
    /// HTTP server port.
    pub port: u16,
    /// Data directory paths.
    pub data_paths: DataPaths,
    /// Embedding dimension (384 for all-MiniLM-L6-v2-class models).
    pub embedding_dim: usize,
    /// Cosine similarity threshold for semantic graph edges (inclusive).
    pub similarity_threshold: f32,
    /// Minimum cleaned OCR length eligible for embedding.
    pub min_embed_chars: usize,
    /// Hard cap on the combined LLM context, in characters.
    pub max_context_chars: usize,
    /// Files unmodified for longer than this count as "old" in folder health.
    pub old_file_age_days: i64,
}

impl FolderLensConfig {
    /// Create configuration from environment and defaults.
    pub fn from_env(data_dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3010);

        let similarity_threshold = std::env::var("FOLDERLENS_SIMILARITY_THRESHOLD")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(0.65);

        let data_paths = DataPaths::new(data_dir)?;

        Ok(Self {
            port,
            data_paths,
            embedding_dim: 384,
            similarity_threshold,
            min_embed_chars: 20,
            max_context_chars: 12_000,
            old_file_age_days: 365,
        })
    }
}
