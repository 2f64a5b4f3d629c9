//! Background analysis worker.
//!
//! Jobs for different folders are independent, so the worker drains
//! the queue sequentially; the orchestrator itself does the per-folder
//! work. Every job the worker runs ends terminal, degraded or not;
//! a cancelled job keeps its Cancelled status and its in-flight
//! output is dropped.

use std::sync::Arc;

use tracing::{error, info};

use crate::state::AppState;
use folderlens_runtime::AnalysisStatus;

/// Start the background analysis worker task.
pub fn start_analysis_worker(state: Arc<AppState>) {
    let mut rx = match state.take_analysis_rx() {
        Some(rx) => rx,
        None => {
            error!("Analysis worker already started");
            return;
        }
    };

    tokio::spawn(async move {
        info!("Background analysis worker started");
        while let Some(request) = rx.recv().await {
            run_analysis_job(&state, &request.analysis_id, &request.folder_id).await;
        }
    });
}

async fn run_analysis_job(state: &AppState, analysis_id: &str, folder_id: &str) {
    {
        // A job cancelled while still queued is never started.
        let mut jobs = state.analysis_jobs.write();
        match jobs.get_mut(analysis_id) {
            Some(job) if !job.status.is_terminal() => job.status = AnalysisStatus::Running,
            _ => {
                info!("Analysis {} already terminal, skipping", analysis_id);
                return;
            }
        }
    }
    info!("Analysis {} started for folder {}", analysis_id, folder_id);

    match state.orchestrator.analyze_folder(folder_id).await {
        Ok(result) => {
            let mut jobs = state.analysis_jobs.write();
            if let Some(job) = jobs.get_mut(analysis_id) {
                // Cancelled mid-run: the in-flight result is discarded.
                if job.status.is_terminal() {
                    info!("Analysis {} terminated mid-run, discarding result", analysis_id);
                    return;
                }
                job.status = AnalysisStatus::Completed;
                job.result = Some(result);
            }
            info!("Analysis {} completed", analysis_id);
        }
        Err(e) => {
            let mut jobs = state.analysis_jobs.write();
            if let Some(job) = jobs.get_mut(analysis_id) {
                if job.status.is_terminal() {
                    info!("Analysis {} terminated mid-run, discarding error", analysis_id);
                    return;
                }
                job.status = AnalysisStatus::Failed;
                job.error = Some(e.to_string());
            }
            error!("Analysis {} failed: {}", analysis_id, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::state::testing::{queue_job, test_state};
    use folderlens_store::NewFileRecord;

    #[tokio::test]
    async fn test_empty_folder_job_completes() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);
        queue_job(&state, "job-1", "empty");

        run_analysis_job(&state, "job-1", "empty").await;

        let jobs = state.analysis_jobs.read();
        let job = jobs.get("job-1").unwrap();
        assert_eq!(job.status, AnalysisStatus::Completed);
        assert!(job.result.is_some());
        assert!(job.error.is_none());
    }

    #[tokio::test]
    async fn test_job_result_carries_folder_payload() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);
        state
            .store
            .register_file(
                "f1",
                &NewFileRecord {
                    file_id: "a".to_string(),
                    file_name: "a.txt".to_string(),
                    extension: ".txt".to_string(),
                    size_kb: 1.0,
                    file_path: String::new(),
                    ocr_text: Some("The district court adjourned the case.".to_string()),
                    modified_at: Some(1),
                },
            )
            .unwrap();
        queue_job(&state, "job-2", "f1");

        run_analysis_job(&state, "job-2", "f1").await;

        let jobs = state.analysis_jobs.read();
        let job = jobs.get("job-2").unwrap();
        assert_eq!(job.status, AnalysisStatus::Completed);
        let result = job.result.as_ref().unwrap();
        assert_eq!(result.total_files, 1);
        assert_eq!(result.summary.as_deref(), Some("narrative"));
    }

    #[tokio::test]
    async fn test_cancelled_job_is_never_started() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);
        queue_job(&state, "job-3", "f1");
        state.analysis_jobs.write().get_mut("job-3").unwrap().status =
            AnalysisStatus::Cancelled;

        run_analysis_job(&state, "job-3", "f1").await;

        let jobs = state.analysis_jobs.read();
        let job = jobs.get("job-3").unwrap();
        assert_eq!(job.status, AnalysisStatus::Cancelled);
        assert!(job.result.is_none());
        assert!(job.error.is_none());
    }
}
