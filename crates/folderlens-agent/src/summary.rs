//! Fingerprint-gated grounded folder summary.

use std::sync::Arc;

use tracing::{debug, info, warn};

use folderlens_core::{Error, Result};
use folderlens_graph::{build_cooccurrence_graph, CooccurrenceGraph};
use folderlens_store::{compute_fingerprint, FileRecord, FileStore};

use crate::context::build_combined_context;
use crate::llm::LlmClient;
use crate::signals::extract_signals;

pub const INSUFFICIENT_INFO: &str = "Insufficient information in this folder.";

/// What `analyze` hands back to the orchestrator.
#[derive(Debug, Clone)]
pub struct SummaryOutcome {
    pub summary: String,
    pub entity_graph: CooccurrenceGraph,
    /// True when the result came from the fingerprint cache.
    pub cached: bool,
}

/// Produces one neutral narrative per folder, cached by fingerprint.
pub struct GroundedSummaryAgent {
    store: Arc<FileStore>,
    llm: Arc<dyn LlmClient>,
    max_context_chars: usize,
}

impl GroundedSummaryAgent {
    pub fn new(store: Arc<FileStore>, llm: Arc<dyn LlmClient>, max_context_chars: usize) -> Self {
        Self {
            store,
            llm,
            max_context_chars,
        }
    }

    /// Summarize a folder. Unchanged folders return the cached result
    /// without an LLM call; empty folders return a fixed answer and
    /// never touch the cache.
    pub async fn analyze(&self, folder_id: &str) -> Result<SummaryOutcome> {
        let files = self.store.get_folder_files(folder_id)?;
        if files.is_empty() {
            debug!("Folder {} has no files, skipping summary", folder_id);
            return Ok(SummaryOutcome {
                summary: INSUFFICIENT_INFO.to_string(),
                entity_graph: CooccurrenceGraph::default(),
                cached: false,
            });
        }

        let fingerprint = compute_fingerprint(&files);
        if let Some(cached) = self.store.get_cached_analysis(folder_id) {
            if cached.fingerprint == fingerprint {
                // A stored graph that no longer deserializes forces a
                // recompute rather than a hard failure.
                match serde_json::from_value::<CooccurrenceGraph>(cached.entity_graph.clone()) {
                    Ok(entity_graph) => {
                        info!("Folder {} unchanged, returning cached summary", folder_id);
                        return Ok(SummaryOutcome {
                            summary: cached.summary,
                            entity_graph,
                            cached: true,
                        });
                    }
                    Err(e) => {
                        warn!("Cached graph for folder {} unreadable: {}", folder_id, e);
                    }
                }
            }
        }

        let summary = self.generate_summary(&files).await?;
        let per_file: Vec<&[folderlens_ingest::Entity]> =
            files.iter().map(|f| f.nlp_entities.as_slice()).collect();
        let entity_graph = build_cooccurrence_graph(per_file);

        let graph_value = serde_json::to_value(&entity_graph)?;
        if let Err(e) = self
            .store
            .save_analysis(folder_id, &fingerprint, &summary, &graph_value)
        {
            warn!("Cache write failed for folder {}: {}", folder_id, e);
        }

        Ok(SummaryOutcome {
            summary,
            entity_graph,
            cached: false,
        })
    }

    async fn generate_summary(&self, files: &[FileRecord]) -> Result<String> {
        let context = build_combined_context(files, self.max_context_chars);
        let signals = extract_signals(files);
        let prompt = build_prompt(&context, &signals.render());

        let raw = self.llm.complete(&prompt).await?;
        let summary = raw.trim().to_string();
        if summary.is_empty() {
            return Err(Error::Grounding("LLM returned empty narrative".to_string()));
        }
        Ok(summary)
    }
}

fn build_prompt(context: &str, signals_block: &str) -> String {
    format!(
        "You are an institutional records analyst.\n\
         Write ONE unified, neutral, administrative narrative paragraph \
         using ONLY the information below.\n\
         Rules:\n\
         - Never refer to documents, files, OCR, pages, or sources.\n\
         - State only facts supported by the information given.\n\
         - If a category has no supporting information, omit it entirely. \
         Do not invent names, dates, amounts, or outcomes.\n\n\
         Verified signals:\n{}\n\n\
         Information:\n{}\n\n\
         Narrative:",
        signals_block, context
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use folderlens_store::NewFileRecord;

    struct CountingLlm {
        calls: AtomicUsize,
        reply: String,
    }

    impl CountingLlm {
        fn new(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                reply: reply.to_string(),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LlmClient for CountingLlm {
        async fn complete(&self, _prompt: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.reply.clone())
        }
    }

    struct FailingLlm;

    #[async_trait]
    impl LlmClient for FailingLlm {
        async fn complete(&self, _prompt: &str) -> Result<String> {
            Err(Error::Grounding("connection refused".to_string()))
        }
    }

    fn open_store(dir: &tempfile::TempDir) -> Arc<FileStore> {
        Arc::new(FileStore::open(dir.path()).unwrap())
    }

    fn register(store: &FileStore, folder: &str, id: &str, text: &str) {
        store
            .register_file(
                folder,
                &NewFileRecord {
                    file_id: id.to_string(),
                    file_name: format!("{id}.pdf"),
                    extension: ".pdf".to_string(),
                    size_kb: 1.0,
                    file_path: String::new(),
                    ocr_text: Some(text.to_string()),
                    modified_at: Some(1),
                },
            )
            .unwrap();
    }

    #[tokio::test]
    async fn test_empty_folder_fixed_summary_no_cache() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);
        let llm = CountingLlm::new("narrative");
        let agent = GroundedSummaryAgent::new(store.clone(), llm.clone(), 12_000);

        let outcome = agent.analyze("empty").await.unwrap();
        assert_eq!(outcome.summary, INSUFFICIENT_INFO);
        assert!(outcome.entity_graph.nodes.is_empty());
        assert_eq!(llm.call_count(), 0);
        assert!(store.get_cached_analysis("empty").is_none());
    }

    #[tokio::test]
    async fn test_unchanged_folder_hits_cache() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);
        register(&store, "f1", "a", "Rahul Sharma held under FIR 123 in Tihar Jail.");
        register(&store, "f1", "b", "Hearing adjourned to 15/03/2024 by the court.");

        let llm = CountingLlm::new("The folder records custodial proceedings.");
        let agent = GroundedSummaryAgent::new(store.clone(), llm.clone(), 12_000);

        let first = agent.analyze("f1").await.unwrap();
        assert!(!first.cached);
        assert_eq!(llm.call_count(), 1);

        let second = agent.analyze("f1").await.unwrap();
        assert!(second.cached);
        assert_eq!(second.summary, first.summary);
        assert_eq!(llm.call_count(), 1);
    }

    #[tokio::test]
    async fn test_content_change_invalidates_cache() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);
        register(&store, "f1", "a", &"x".repeat(500));
        register(&store, "f1", "b", &"y".repeat(300));

        let llm = CountingLlm::new("narrative");
        let agent = GroundedSummaryAgent::new(store.clone(), llm.clone(), 12_000);
        agent.analyze("f1").await.unwrap();
        assert_eq!(llm.call_count(), 1);

        // Re-OCR shifts one file's text length by one character
        store
            .update_file_text("b", &"y".repeat(301), &[], &[])
            .unwrap();
        let outcome = agent.analyze("f1").await.unwrap();
        assert!(!outcome.cached);
        assert_eq!(llm.call_count(), 2);
    }

    #[tokio::test]
    async fn test_unreadable_cached_graph_forces_recompute() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);
        register(&store, "f1", "a", "Rahul Sharma was seen near Tihar Jail.");

        // Poison the cache: current fingerprint, graph shape that no
        // longer deserializes.
        let files = store.get_folder_files("f1").unwrap();
        let fingerprint = compute_fingerprint(&files);
        store
            .save_analysis(
                "f1",
                &fingerprint,
                "stale narrative",
                &serde_json::json!({ "nodes": "not-a-list" }),
            )
            .unwrap();

        let llm = CountingLlm::new("fresh narrative");
        let agent = GroundedSummaryAgent::new(store.clone(), llm.clone(), 12_000);
        let outcome = agent.analyze("f1").await.unwrap();

        assert!(!outcome.cached);
        assert_eq!(outcome.summary, "fresh narrative");
        assert_eq!(llm.call_count(), 1);

        // The poisoned entry was overwritten and serves the next hit
        let cached = store.get_cached_analysis("f1").unwrap();
        assert_eq!(cached.summary, "fresh narrative");
        let again = agent.analyze("f1").await.unwrap();
        assert!(again.cached);
        assert_eq!(llm.call_count(), 1);
    }

    #[tokio::test]
    async fn test_entity_graph_built_and_cached() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);
        register(&store, "f1", "a", "placeholder");
        store
            .update_file_text(
                "a",
                "Rahul Sharma was seen near Tihar Jail.",
                &folderlens_ingest::extract_entities("Rahul Sharma was seen near Tihar Jail."),
                &[],
            )
            .unwrap();

        let llm = CountingLlm::new("narrative");
        let agent = GroundedSummaryAgent::new(store.clone(), llm.clone(), 12_000);
        let outcome = agent.analyze("f1").await.unwrap();
        assert!(!outcome.entity_graph.nodes.is_empty());
        assert!(!outcome.entity_graph.edges.is_empty());

        let cached = store.get_cached_analysis("f1").unwrap();
        assert_eq!(cached.summary, "narrative");
        assert!(cached.entity_graph.get("nodes").is_some());
    }

    #[tokio::test]
    async fn test_llm_failure_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);
        register(&store, "f1", "a", "some text");

        let agent = GroundedSummaryAgent::new(store.clone(), Arc::new(FailingLlm), 12_000);
        let err = agent.analyze("f1").await.unwrap_err();
        assert!(matches!(err, Error::Grounding(_)));
        assert!(store.get_cached_analysis("f1").is_none());
    }

    #[tokio::test]
    async fn test_empty_llm_reply_is_grounding_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);
        register(&store, "f1", "a", "some text");

        let agent =
            GroundedSummaryAgent::new(store.clone(), CountingLlm::new("   "), 12_000);
        let err = agent.analyze("f1").await.unwrap_err();
        assert!(matches!(err, Error::Grounding(_)));
    }
}
