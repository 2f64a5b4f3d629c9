//! SQLite-backed file and analysis store.
//!
//! All writes are single-row upserts keyed by `file_id` or `folder_id`,
//! so concurrent retries and duplicate analysis runs never corrupt
//! state. The connection is guarded by a short-lived mutex; callers
//! never hold it across an external call.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{info, warn};

use crate::embedding::QuantizedEmbedding;
use crate::schema::SCHEMA_SQL;
use crate::types::*;
use folderlens_core::{Error, Result};
use folderlens_ingest::Entity;

/// File-record and cached-analysis store backed by one SQLite database.
pub struct FileStore {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

impl FileStore {
    /// Open or create the store. `db_dir` is the directory; the file
    /// will be `db_dir/folderlens.db`.
    pub fn open(db_dir: impl AsRef<Path>) -> Result<Self> {
        let db_dir = db_dir.as_ref();
        std::fs::create_dir_all(db_dir).map_err(|e| Error::Storage(e.to_string()))?;
        let db_path = db_dir.join("folderlens.db");

        let conn = Connection::open(&db_path).map_err(|e| Error::Database(e.to_string()))?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA foreign_keys = ON;
             PRAGMA synchronous = NORMAL;",
        )
        .map_err(|e| Error::Database(e.to_string()))?;
        conn.execute_batch(SCHEMA_SQL)
            .map_err(|e| Error::Database(format!("Schema init failed: {}", e)))?;

        let store = Self {
            conn: Mutex::new(conn),
            db_path,
        };

        let stats = store.get_stats()?;
        info!(
            "FileStore initialized: {} files, {} folders, path={}",
            stats.total_files,
            stats.total_folders,
            store.db_path.display()
        );

        Ok(store)
    }

    // ---------------------------------------------------------------
    // File records
    // ---------------------------------------------------------------

    /// Register a file in a folder. Upserts by `file_id`; re-registering
    /// refreshes the structural fields but keeps derived enrichment.
    pub fn register_file(&self, folder_id: &str, new: &NewFileRecord) -> Result<()> {
        let now = now_millis();
        let modified_at = new.modified_at.unwrap_or(now);
        let ocr_text = new.ocr_text.clone().unwrap_or_default();

        let conn = self.conn.lock();
        conn.prepare_cached(
            "INSERT INTO files (file_id, folder_id, file_name, extension, size_kb, file_path,
                                ocr_text, created_at, modified_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             ON CONFLICT(file_id) DO UPDATE SET
                 folder_id = excluded.folder_id,
                 file_name = excluded.file_name,
                 extension = excluded.extension,
                 size_kb = excluded.size_kb,
                 file_path = excluded.file_path,
                 modified_at = excluded.modified_at",
        )
        .map_err(|e| Error::Database(e.to_string()))?
        .execute(params![
            new.file_id,
            folder_id,
            new.file_name,
            new.extension,
            new.size_kb,
            new.file_path,
            ocr_text,
            now,
            modified_at,
        ])
        .map_err(|e| Error::Database(e.to_string()))?;
        Ok(())
    }

    /// Fetch one file record.
    pub fn get_file(&self, file_id: &str) -> Result<Option<FileRecord>> {
        let conn = self.conn.lock();
        let result = conn
            .prepare_cached("SELECT * FROM files WHERE file_id = ?1")
            .map_err(|e| Error::Database(e.to_string()))?
            .query_row(params![file_id], row_to_file)
            .optional()
            .map_err(|e| Error::Database(e.to_string()));
        result
    }

    /// Fetch all files in a folder, ordered by file_id.
    pub fn get_folder_files(&self, folder_id: &str) -> Result<Vec<FileRecord>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached("SELECT * FROM files WHERE folder_id = ?1 ORDER BY file_id")
            .map_err(|e| Error::Database(e.to_string()))?;
        let rows = stmt
            .query_map(params![folder_id], row_to_file)
            .map_err(|e| Error::Database(e.to_string()))?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| Error::Database(e.to_string()))
    }

    /// Persist extracted OCR text and derived entities/keywords onto a
    /// file record. Last-writer-wins: OCR for a given file is
    /// deterministic, so concurrent writers agree.
    pub fn update_file_text(
        &self,
        file_id: &str,
        ocr_text: &str,
        entities: &[Entity],
        keywords: &[String],
    ) -> Result<bool> {
        let entities_json = serde_json::to_string(entities)?;
        let keywords_json = serde_json::to_string(keywords)?;

        let conn = self.conn.lock();
        let changed = conn
            .prepare_cached(
                "UPDATE files SET ocr_text = ?2, entities_json = ?3, keywords_json = ?4
                 WHERE file_id = ?1",
            )
            .map_err(|e| Error::Database(e.to_string()))?
            .execute(params![file_id, ocr_text, entities_json, keywords_json])
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(changed > 0)
    }

    /// Persist an embedding, int8-quantized.
    pub fn update_file_embedding(&self, file_id: &str, embedding: &[f32]) -> Result<bool> {
        let encoded = QuantizedEmbedding::encode(embedding);

        let conn = self.conn.lock();
        let changed = conn
            .prepare_cached(
                "UPDATE files SET embedding = ?2, emb_scale = ?3, emb_offset = ?4
                 WHERE file_id = ?1",
            )
            .map_err(|e| Error::Database(e.to_string()))?
            .execute(params![file_id, encoded.bytes, encoded.scale, encoded.offset])
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(changed > 0)
    }

    /// Remove a file record. Deletion of the underlying bytes is an
    /// external file-management concern.
    pub fn delete_file(&self, file_id: &str) -> Result<bool> {
        let conn = self.conn.lock();
        let changed = conn
            .prepare_cached("DELETE FROM files WHERE file_id = ?1")
            .map_err(|e| Error::Database(e.to_string()))?
            .execute(params![file_id])
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(changed > 0)
    }

    // ---------------------------------------------------------------
    // Cached analysis
    // ---------------------------------------------------------------

    /// Read the cached analysis for a folder. A read failure is
    /// reported as a cache miss, never an analysis failure.
    pub fn get_cached_analysis(&self, folder_id: &str) -> Option<CachedAnalysis> {
        let conn = self.conn.lock();
        let result = conn
            .prepare_cached(
                "SELECT folder_id, fingerprint, summary, graph_json, updated_at
                 FROM folder_analysis WHERE folder_id = ?1",
            )
            .and_then(|mut stmt| {
                stmt.query_row(params![folder_id], |row| {
                    let graph_raw: String = row.get(3)?;
                    Ok(CachedAnalysis {
                        folder_id: row.get(0)?,
                        fingerprint: row.get(1)?,
                        summary: row.get(2)?,
                        entity_graph: serde_json::from_str(&graph_raw)
                            .unwrap_or(serde_json::Value::Null),
                        updated_at: row.get(4)?,
                    })
                })
                .optional()
            });

        match result {
            Ok(cached) => cached,
            Err(e) => {
                warn!("Cache read failed for folder {}: {}", folder_id, e);
                None
            }
        }
    }

    /// Upsert the analysis result for a folder.
    pub fn save_analysis(
        &self,
        folder_id: &str,
        fingerprint: &str,
        summary: &str,
        entity_graph: &serde_json::Value,
    ) -> Result<()> {
        let graph_json = serde_json::to_string(entity_graph)?;
        let now = now_millis();

        let conn = self.conn.lock();
        conn.prepare_cached(
            "INSERT INTO folder_analysis (folder_id, fingerprint, summary, graph_json, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(folder_id) DO UPDATE SET
                 fingerprint = excluded.fingerprint,
                 summary = excluded.summary,
                 graph_json = excluded.graph_json,
                 updated_at = excluded.updated_at",
        )
        .map_err(|e| Error::Database(e.to_string()))?
        .execute(params![folder_id, fingerprint, summary, graph_json, now])
        .map_err(|e| Error::Database(e.to_string()))?;
        Ok(())
    }

    // ---------------------------------------------------------------
    // Stats
    // ---------------------------------------------------------------

    pub fn get_stats(&self) -> Result<StoreStats> {
        let conn = self.conn.lock();
        let one = |sql: &str| -> Result<i64> {
            conn.query_row(sql, [], |row| row.get(0))
                .map_err(|e| Error::Database(e.to_string()))
        };

        Ok(StoreStats {
            total_files: one("SELECT COUNT(*) FROM files")?,
            total_folders: one("SELECT COUNT(DISTINCT folder_id) FROM files")?,
            files_with_text: one("SELECT COUNT(*) FROM files WHERE length(ocr_text) > 0")?,
            files_with_embedding: one("SELECT COUNT(*) FROM files WHERE embedding IS NOT NULL")?,
            cached_analyses: one("SELECT COUNT(*) FROM folder_analysis")?,
            db_path: self.db_path.display().to_string(),
        })
    }
}

fn row_to_file(row: &Row<'_>) -> rusqlite::Result<FileRecord> {
    let entities_json: Option<String> = row.get("entities_json")?;
    let keywords_json: Option<String> = row.get("keywords_json")?;
    let emb_bytes: Option<Vec<u8>> = row.get("embedding")?;
    let emb_scale: Option<f64> = row.get("emb_scale")?;
    let emb_offset: Option<f64> = row.get("emb_offset")?;

    let embedding = match (emb_bytes, emb_scale, emb_offset) {
        (Some(bytes), Some(scale), Some(offset)) if !bytes.is_empty() => {
            Some(
                QuantizedEmbedding {
                    bytes,
                    scale: scale as f32,
                    offset: offset as f32,
                }
                .decode(),
            )
        }
        _ => None,
    };

    Ok(FileRecord {
        file_id: row.get("file_id")?,
        folder_id: row.get("folder_id")?,
        file_name: row.get("file_name")?,
        extension: row.get("extension")?,
        size_kb: row.get("size_kb")?,
        file_path: row.get("file_path")?,
        ocr_text: row.get("ocr_text")?,
        embedding,
        nlp_entities: entities_json
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default(),
        nlp_keywords: keywords_json
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default(),
        created_at: row.get("created_at")?,
        modified_at: row.get("modified_at")?,
    })
}

fn now_millis() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use folderlens_ingest::EntityLabel;

    fn test_store() -> (FileStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        (store, dir)
    }

    fn new_file(id: &str) -> NewFileRecord {
        NewFileRecord {
            file_id: id.to_string(),
            file_name: format!("{}.pdf", id),
            extension: ".pdf".to_string(),
            size_kb: 42.5,
            file_path: format!("/uploads/{}.pdf", id),
            ocr_text: None,
            modified_at: Some(1_700_000_000_000),
        }
    }

    #[test]
    fn test_register_and_fetch() {
        let (store, _dir) = test_store();
        store.register_file("folder-a", &new_file("f1")).unwrap();

        let files = store.get_folder_files("folder-a").unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].file_id, "f1");
        assert!(files[0].needs_text());
        assert!(files[0].embedding.is_none());
    }

    #[test]
    fn test_register_is_idempotent() {
        let (store, _dir) = test_store();
        store.register_file("folder-a", &new_file("f1")).unwrap();
        store.register_file("folder-a", &new_file("f1")).unwrap();
        assert_eq!(store.get_folder_files("folder-a").unwrap().len(), 1);
    }

    #[test]
    fn test_text_enrichment_roundtrip() {
        let (store, _dir) = test_store();
        store.register_file("folder-a", &new_file("f1")).unwrap();

        let entities = vec![Entity::new("FIR 123", EntityLabel::LegalCase)];
        let keywords = vec!["court".to_string()];
        store
            .update_file_text("f1", "FIR 123 heard in court", &entities, &keywords)
            .unwrap();

        let file = store.get_file("f1").unwrap().unwrap();
        assert_eq!(file.ocr_text, "FIR 123 heard in court");
        assert_eq!(file.nlp_entities, entities);
        assert_eq!(file.nlp_keywords, keywords);
    }

    #[test]
    fn test_embedding_roundtrip() {
        let (store, _dir) = test_store();
        store.register_file("folder-a", &new_file("f1")).unwrap();

        let original = vec![0.1f32, -0.4, 0.8, 0.2];
        store.update_file_embedding("f1", &original).unwrap();

        let file = store.get_file("f1").unwrap().unwrap();
        let restored = file.embedding.unwrap();
        assert_eq!(restored.len(), 4);
        for (a, b) in original.iter().zip(restored.iter()) {
            assert!((a - b).abs() < 0.01);
        }
    }

    #[test]
    fn test_analysis_cache_upsert() {
        let (store, _dir) = test_store();
        assert!(store.get_cached_analysis("folder-a").is_none());

        let graph = serde_json::json!({"nodes": [], "edges": []});
        store
            .save_analysis("folder-a", "fp-1", "first summary", &graph)
            .unwrap();
        store
            .save_analysis("folder-a", "fp-2", "second summary", &graph)
            .unwrap();

        let cached = store.get_cached_analysis("folder-a").unwrap();
        assert_eq!(cached.fingerprint, "fp-2");
        assert_eq!(cached.summary, "second summary");
    }

    #[test]
    fn test_stats() {
        let (store, _dir) = test_store();
        store.register_file("folder-a", &new_file("f1")).unwrap();
        store.register_file("folder-b", &new_file("f2")).unwrap();
        store
            .update_file_text("f1", "some extracted text", &[], &[])
            .unwrap();

        let stats = store.get_stats().unwrap();
        assert_eq!(stats.total_files, 2);
        assert_eq!(stats.total_folders, 2);
        assert_eq!(stats.files_with_text, 1);
        assert_eq!(stats.files_with_embedding, 0);
    }
}
