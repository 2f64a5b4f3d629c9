//! Stats and server info routes.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::state::AppState;
use folderlens_runtime::AnalysisStatus;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/stats", get(get_stats))
        .route("/server-info", get(get_server_info))
}

/// GET /api/stats — storage and job-queue statistics.
async fn get_stats(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let store_stats = state.store.get_stats().unwrap_or_else(|_| {
        folderlens_store::StoreStats {
            total_files: 0,
            total_folders: 0,
            files_with_text: 0,
            files_with_embedding: 0,
            cached_analyses: 0,
            db_path: String::new(),
        }
    });

    let jobs = state.analysis_jobs.read();
    let pending = jobs
        .values()
        .filter(|j| j.status == AnalysisStatus::Pending)
        .count();
    let running = jobs
        .values()
        .filter(|j| j.status == AnalysisStatus::Running)
        .count();

    Json(serde_json::json!({
        "files": store_stats.total_files,
        "folders": store_stats.total_folders,
        "filesWithText": store_stats.files_with_text,
        "filesWithEmbedding": store_stats.files_with_embedding,
        "cachedAnalyses": store_stats.cached_analyses,
        "analysisQueue": {
            "pending": pending,
            "running": running,
        },
    }))
}

/// GET /api/server-info — static configuration snapshot.
async fn get_server_info(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": "FolderLens",
        "version": env!("CARGO_PKG_VERSION"),
        "port": state.config.port,
        "embeddingDimension": state.config.embedding_dim,
        "similarityThreshold": state.config.similarity_threshold,
    }))
}
