//! Analysis trigger and job polling routes.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::info;
use uuid::Uuid;

use crate::state::{AnalysisRequest, AppState};
use folderlens_runtime::{AnalysisJob, AnalysisStatus};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/folders/{folder_id}/analyze", post(trigger_analysis))
        .route("/analysis/{analysis_id}", get(get_analysis))
        .route("/analysis/{analysis_id}/cancel", post(cancel_analysis))
}

/// POST /api/folders/{folder_id}/analyze — queue a background analysis.
async fn trigger_analysis(
    State(state): State<Arc<AppState>>,
    Path(folder_id): Path<String>,
) -> (StatusCode, Json<serde_json::Value>) {
    let analysis_id = Uuid::new_v4().to_string();
    let job = AnalysisJob {
        analysis_id: analysis_id.clone(),
        folder_id: folder_id.clone(),
        status: AnalysisStatus::Pending,
        result: None,
        error: None,
        created_at: chrono::Utc::now().timestamp_millis(),
    };
    state.analysis_jobs.write().insert(analysis_id.clone(), job);

    if state
        .analysis_tx
        .send(AnalysisRequest {
            analysis_id: analysis_id.clone(),
            folder_id: folder_id.clone(),
        })
        .is_err()
    {
        state.analysis_jobs.write().remove(&analysis_id);
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({ "error": "Analysis worker unavailable" })),
        );
    }

    info!("Queued analysis {} for folder {}", analysis_id, folder_id);
    (
        StatusCode::ACCEPTED,
        Json(serde_json::json!({
            "analysis_id": analysis_id,
            "folder_id": folder_id,
            "status": AnalysisStatus::Pending,
        })),
    )
}

/// GET /api/analysis/{analysis_id} — poll job status and result.
async fn get_analysis(
    State(state): State<Arc<AppState>>,
    Path(analysis_id): Path<String>,
) -> (StatusCode, Json<serde_json::Value>) {
    let jobs = state.analysis_jobs.read();
    match jobs.get(&analysis_id) {
        Some(job) => (
            StatusCode::OK,
            Json(serde_json::to_value(job).unwrap_or_default()),
        ),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "Unknown analysis id" })),
        ),
    }
}

/// POST /api/analysis/{analysis_id}/cancel — terminate a queued or
/// running analysis. The worker discards any in-flight result.
async fn cancel_analysis(
    State(state): State<Arc<AppState>>,
    Path(analysis_id): Path<String>,
) -> (StatusCode, Json<serde_json::Value>) {
    let mut jobs = state.analysis_jobs.write();
    match jobs.get_mut(&analysis_id) {
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "Unknown analysis id" })),
        ),
        Some(job) if job.status.is_terminal() => (
            StatusCode::CONFLICT,
            Json(serde_json::json!({
                "error": "Analysis already finished",
                "status": job.status,
            })),
        ),
        Some(job) => {
            job.status = AnalysisStatus::Cancelled;
            info!("Cancelled analysis {}", analysis_id);
            (
                StatusCode::OK,
                Json(serde_json::json!({
                    "analysis_id": analysis_id,
                    "status": AnalysisStatus::Cancelled,
                })),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::state::testing::{queue_job, test_state};

    #[tokio::test]
    async fn test_cancel_pending_job() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);
        queue_job(&state, "job-1", "f1");

        let (status, body) =
            cancel_analysis(State(state.clone()), Path("job-1".to_string())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.0["status"], "cancelled");

        let jobs = state.analysis_jobs.read();
        assert_eq!(
            jobs.get("job-1").unwrap().status,
            AnalysisStatus::Cancelled
        );
    }

    #[tokio::test]
    async fn test_cancel_unknown_job() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);

        let (status, _) = cancel_analysis(State(state), Path("nope".to_string())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cancel_finished_job_conflicts() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);
        queue_job(&state, "job-1", "f1");
        state.analysis_jobs.write().get_mut("job-1").unwrap().status =
            AnalysisStatus::Completed;

        let (status, _) =
            cancel_analysis(State(state.clone()), Path("job-1".to_string())).await;
        assert_eq!(status, StatusCode::CONFLICT);

        // Terminal state is untouched
        let jobs = state.analysis_jobs.read();
        assert_eq!(
            jobs.get("job-1").unwrap().status,
            AnalysisStatus::Completed
        );
    }
}
