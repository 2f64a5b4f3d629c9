//! FolderLens Runtime — the per-folder analysis pipeline.
//!
//! The orchestrator drives enrichment (OCR fallback, entities,
//! embeddings), folder aggregation, both graph builds, and the grounded
//! summary for one folder, and exposes the job types the HTTP layer
//! uses to track background runs.

pub mod orchestrator;
pub mod types;

pub use orchestrator::FolderAnalysisOrchestrator;
pub use types::{AnalysisJob, AnalysisStatus, FolderAnalysisResult};
