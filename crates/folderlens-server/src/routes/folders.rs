//! Folder and file registration routes.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::info;

use crate::state::AppState;
use folderlens_store::NewFileRecord;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/folders/{folder_id}/files", post(register_file))
        .route("/folders/{folder_id}/files", get(list_folder_files))
}

/// POST /api/folders/{folder_id}/files — register or refresh one file.
async fn register_file(
    State(state): State<Arc<AppState>>,
    Path(folder_id): Path<String>,
    Json(new): Json<NewFileRecord>,
) -> (StatusCode, Json<serde_json::Value>) {
    if new.file_id.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "file_id is required" })),
        );
    }

    match state.store.register_file(&folder_id, &new) {
        Ok(()) => {
            info!("Registered file {} in folder {}", new.file_id, folder_id);
            (
                StatusCode::OK,
                Json(serde_json::json!({
                    "file_id": new.file_id,
                    "folder_id": folder_id,
                })),
            )
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": e.to_string() })),
        ),
    }
}

/// GET /api/folders/{folder_id}/files — list the folder's records.
async fn list_folder_files(
    State(state): State<Arc<AppState>>,
    Path(folder_id): Path<String>,
) -> (StatusCode, Json<serde_json::Value>) {
    match state.store.get_folder_files(&folder_id) {
        Ok(files) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "folder_id": folder_id,
                "total": files.len(),
                "files": files,
            })),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": e.to_string() })),
        ),
    }
}
