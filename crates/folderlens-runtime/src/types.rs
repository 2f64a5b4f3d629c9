//! Analysis job and result types.

use serde::{Deserialize, Serialize};

use folderlens_aggregate::FolderStats;
use folderlens_graph::{CooccurrenceGraph, SemanticGraph};

/// Lifecycle of one analysis job. Pending and Running are transient;
/// Completed, Failed, and Cancelled are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl AnalysisStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AnalysisStatus::Completed | AnalysisStatus::Failed | AnalysisStatus::Cancelled
        )
    }
}

/// One background analysis run, pollable by id.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisJob {
    pub analysis_id: String,
    pub folder_id: String,
    pub status: AnalysisStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<FolderAnalysisResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Milliseconds since epoch.
    pub created_at: i64,
}

/// The composite payload a completed analysis returns.
///
/// `summary` is absent when the narrative step failed; the job still
/// completes with graphs and stats, and `summary_error` says why.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FolderAnalysisResult {
    pub folder_id: String,
    pub total_files: usize,
    pub stats: FolderStats,
    pub semantic_graph: SemanticGraph,
    pub entity_graph: CooccurrenceGraph,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary_error: Option<String>,
    pub summary_cached: bool,
}
