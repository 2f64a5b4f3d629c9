//! Shared application state.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::mpsc;

use folderlens_core::FolderLensConfig;
use folderlens_runtime::{AnalysisJob, FolderAnalysisOrchestrator};
use folderlens_store::FileStore;

/// A request to analyze one folder, queued to the background worker.
pub struct AnalysisRequest {
    pub analysis_id: String,
    pub folder_id: String,
}

/// Shared application state accessible from all route handlers.
pub struct AppState {
    pub config: FolderLensConfig,
    pub store: Arc<FileStore>,
    pub orchestrator: Arc<FolderAnalysisOrchestrator>,
    pub analysis_jobs: RwLock<HashMap<String, AnalysisJob>>,
    pub analysis_tx: mpsc::UnboundedSender<AnalysisRequest>,
    analysis_rx: parking_lot::Mutex<Option<mpsc::UnboundedReceiver<AnalysisRequest>>>,
}

impl AppState {
    pub fn new(
        config: FolderLensConfig,
        store: Arc<FileStore>,
        orchestrator: Arc<FolderAnalysisOrchestrator>,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            config,
            store,
            orchestrator,
            analysis_jobs: RwLock::new(HashMap::new()),
            analysis_tx: tx,
            analysis_rx: parking_lot::Mutex::new(Some(rx)),
        }
    }

    /// Take the analysis receiver (can only be called once, by the worker).
    pub fn take_analysis_rx(&self) -> Option<mpsc::UnboundedReceiver<AnalysisRequest>> {
        self.analysis_rx.lock().take()
    }
}
