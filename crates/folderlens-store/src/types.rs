//! Data types for file records and cached analyses.

use folderlens_ingest::Entity;
use serde::{Deserialize, Serialize};

/// One ingested file within a folder.
///
/// `ocr_text`, `nlp_entities`, `nlp_keywords`, and `embedding` are
/// populated lazily on first analysis and persisted so re-analysis is
/// skipped. The embedding is present iff the cleaned OCR text is longer
/// than the minimum embed length.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    pub file_id: String,
    pub folder_id: String,
    pub file_name: String,
    pub extension: String,
    pub size_kb: f64,
    pub file_path: String,
    pub ocr_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
    pub nlp_entities: Vec<Entity>,
    pub nlp_keywords: Vec<String>,
    /// Milliseconds since epoch.
    pub created_at: i64,
    /// Milliseconds since epoch.
    pub modified_at: i64,
}

impl FileRecord {
    /// Whether this record still needs OCR text.
    pub fn needs_text(&self) -> bool {
        self.ocr_text.trim().is_empty()
    }
}

/// Fields required to register a new file in a folder.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewFileRecord {
    pub file_id: String,
    pub file_name: String,
    pub extension: String,
    pub size_kb: f64,
    pub file_path: String,
    #[serde(default)]
    pub ocr_text: Option<String>,
    #[serde(default)]
    pub modified_at: Option<i64>,
}

/// Cached folder analysis, valid while the stored fingerprint matches
/// the folder's current fingerprint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedAnalysis {
    pub folder_id: String,
    pub fingerprint: String,
    pub summary: String,
    pub entity_graph: serde_json::Value,
    pub updated_at: i64,
}

/// Store-level counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreStats {
    pub total_files: i64,
    pub total_folders: i64,
    pub files_with_text: i64,
    pub files_with_embedding: i64,
    pub cached_analyses: i64,
    pub db_path: String,
}
