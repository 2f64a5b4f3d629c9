//! The per-folder analysis pipeline.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use folderlens_agent::{GroundedSummaryAgent, INSUFFICIENT_INFO};
use folderlens_aggregate::FolderAggregator;
use folderlens_core::{Error, Result};
use folderlens_graph::{build_cooccurrence_graph, SimilarityGraphBuilder};
use folderlens_infer::EmbedderBackend;
use folderlens_ingest::{clean_ocr_text, extract_entities, extract_keywords, TextExtractor};
use folderlens_store::{FileRecord, FileStore};

use crate::types::FolderAnalysisResult;

/// Runs the full analysis pipeline for one folder at a time.
///
/// All collaborators are injected at construction; nothing here holds
/// the store lock across an external call.
pub struct FolderAnalysisOrchestrator {
    store: Arc<FileStore>,
    extractor: Arc<dyn TextExtractor>,
    embedder: Arc<dyn EmbedderBackend>,
    agent: Arc<GroundedSummaryAgent>,
    similarity_threshold: f32,
    old_file_age_days: i64,
}

impl FolderAnalysisOrchestrator {
    pub fn new(
        store: Arc<FileStore>,
        extractor: Arc<dyn TextExtractor>,
        embedder: Arc<dyn EmbedderBackend>,
        agent: Arc<GroundedSummaryAgent>,
        similarity_threshold: f32,
        old_file_age_days: i64,
    ) -> Self {
        Self {
            store,
            extractor,
            embedder,
            agent,
            similarity_threshold,
            old_file_age_days,
        }
    }

    /// Analyze one folder end to end. An empty folder is a valid empty
    /// result, not an error; only storage and pipeline faults fail the
    /// run.
    pub async fn analyze_folder(&self, folder_id: &str) -> Result<FolderAnalysisResult> {
        let mut files = self.store.get_folder_files(folder_id)?;
        if files.is_empty() {
            info!("Folder {} has no files", folder_id);
            return Ok(FolderAnalysisResult {
                folder_id: folder_id.to_string(),
                summary: Some(INSUFFICIENT_INFO.to_string()),
                ..Default::default()
            });
        }

        for file in &mut files {
            self.enrich_file(file).await?;
        }

        let aggregator = FolderAggregator::new(self.old_file_age_days);
        let stats = aggregator.aggregate(&files, Utc::now());
        let semantic_graph = SimilarityGraphBuilder::new(self.similarity_threshold).build(&files);

        let mut result = FolderAnalysisResult {
            folder_id: folder_id.to_string(),
            total_files: files.len(),
            stats,
            semantic_graph,
            ..Default::default()
        };

        // A narrative failure degrades the result instead of failing
        // the whole job.
        match self.agent.analyze(folder_id).await {
            Ok(outcome) => {
                result.summary = Some(outcome.summary);
                result.entity_graph = outcome.entity_graph;
                result.summary_cached = outcome.cached;
            }
            Err(Error::Grounding(msg)) => {
                warn!("Narrative failed for folder {}: {}", folder_id, msg);
                result.summary_error = Some(msg);
                result.entity_graph = cooccurrence_from(&files);
            }
            Err(e) => return Err(e),
        }

        info!(
            "Folder {} analyzed: {} files, {} similarity edges, {} entities",
            folder_id,
            result.total_files,
            result.semantic_graph.edges.len(),
            result.entity_graph.nodes.len()
        );
        Ok(result)
    }

    /// Fill in OCR text, entities/keywords, and the embedding for one
    /// file. Extraction faults degrade that file to empty text;
    /// embedding faults just leave the embedding absent.
    async fn enrich_file(&self, file: &mut FileRecord) -> Result<()> {
        if file.needs_text() {
            let text = match self.extract_text(file).await {
                Ok(t) => t,
                Err(e) => {
                    warn!("Extraction failed for {}: {}", file.file_id, e);
                    String::new()
                }
            };
            file.ocr_text = clean_ocr_text(&text);
        }

        if !file.ocr_text.is_empty() && file.nlp_entities.is_empty() && file.nlp_keywords.is_empty()
        {
            file.nlp_entities = extract_entities(&file.ocr_text);
            file.nlp_keywords = extract_keywords(&file.ocr_text);
            self.store.update_file_text(
                &file.file_id,
                &file.ocr_text,
                &file.nlp_entities,
                &file.nlp_keywords,
            )?;
        }

        if file.embedding.is_none() && self.embedder.is_available() {
            if let Some(vector) = self.embedder.embed(&file.ocr_text).await {
                let vector = vector.to_vec();
                if let Err(e) = self.store.update_file_embedding(&file.file_id, &vector) {
                    warn!("Embedding write failed for {}: {}", file.file_id, e);
                } else {
                    file.embedding = Some(vector);
                }
            }
        }
        Ok(())
    }

    async fn extract_text(&self, file: &FileRecord) -> Result<String> {
        let bytes = tokio::fs::read(&file.file_path)
            .await
            .map_err(|e| Error::Extraction(format!("read {}: {}", file.file_path, e)))?;
        self.extractor.extract(&bytes, &file.file_name).await
    }
}

fn cooccurrence_from(files: &[FileRecord]) -> folderlens_graph::CooccurrenceGraph {
    let per_file: Vec<&[folderlens_ingest::Entity]> =
        files.iter().map(|f| f.nlp_entities.as_slice()).collect();
    build_cooccurrence_graph(per_file)
}
