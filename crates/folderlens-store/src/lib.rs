//! FolderLens Store — durable state for the analysis engine.
//!
//! One SQLite database holds per-folder file records (OCR text, derived
//! entities/keywords, quantized embeddings) and the cached analysis
//! result keyed by folder. All writes are idempotent upserts keyed by
//! `file_id` or `folder_id`, so duplicate runs are safe.

pub mod embedding;
pub mod fingerprint;
pub mod schema;
pub mod sqlite;
pub mod types;

pub use embedding::QuantizedEmbedding;
pub use fingerprint::compute_fingerprint;
pub use sqlite::FileStore;
pub use types::{CachedAnalysis, FileRecord, NewFileRecord, StoreStats};
