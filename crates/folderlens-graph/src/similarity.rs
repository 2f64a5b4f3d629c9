//! Embedding-based file similarity graph.
//!
//! Builds the full pairwise cosine matrix over all files with usable
//! embeddings and keeps every unordered pair at or above the threshold.
//! With normalized rows the matrix product (N, dim) @ (dim, N) is the
//! cosine matrix directly.

use ndarray::{Array1, Array2};
use petgraph::graph::UnGraph;
use tracing::debug;

use crate::types::*;
use folderlens_ingest::EntityLabel;
use folderlens_store::FileRecord;

pub const SEMANTIC_RELATIONSHIP: &str = "semantic_similarity";

/// Builds the file similarity graph for one folder.
pub struct SimilarityGraphBuilder {
    threshold: f32,
}

impl SimilarityGraphBuilder {
    /// `threshold` is inclusive: a pair scoring exactly the threshold
    /// gets an edge.
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    pub fn build(&self, files: &[FileRecord]) -> SemanticGraph {
        let qualifying: Vec<&FileRecord> = files
            .iter()
            .filter(|f| has_valid_embedding(f))
            .collect();

        // Mismatched dimensions are treated as malformed and dropped.
        // The reference dimension is the most common embedding length,
        // so one malformed vector never sinks the rest of the folder.
        let dim = match majority_dimension(&qualifying) {
            Some(dim) => dim,
            None => return SemanticGraph::default(),
        };
        let qualifying: Vec<&FileRecord> = qualifying
            .into_iter()
            .filter(|f| f.embedding.as_ref().map(|e| e.len()) == Some(dim))
            .collect();

        if qualifying.len() < 2 {
            return SemanticGraph::default();
        }

        let n = qualifying.len();
        let mut matrix = Array2::<f32>::zeros((n, n));
        let rows: Vec<Array1<f32>> = qualifying
            .iter()
            .map(|f| normalized_row(f.embedding.as_ref().unwrap()))
            .collect();
        for i in 0..n {
            for j in i..n {
                let score = rows[i].dot(&rows[j]);
                matrix[[i, j]] = score;
                matrix[[j, i]] = score;
            }
        }

        // Assemble in petgraph to get per-node degree for the metrics.
        let mut graph = UnGraph::<usize, f64>::default();
        let node_indices: Vec<_> = (0..n).map(|i| graph.add_node(i)).collect();
        for i in 0..n {
            for j in (i + 1)..n {
                let score = matrix[[i, j]];
                if score >= self.threshold {
                    let weight = (score as f64 * 1000.0).round() / 1000.0;
                    graph.add_edge(node_indices[i], node_indices[j], weight);
                }
            }
        }

        let edges: Vec<GraphEdge> = graph
            .edge_indices()
            .map(|e| {
                let (a, b) = graph.edge_endpoints(e).unwrap();
                GraphEdge {
                    source: qualifying[graph[a]].file_id.clone(),
                    target: qualifying[graph[b]].file_id.clone(),
                    weight: graph[e],
                    relationship: SEMANTIC_RELATIONSHIP.to_string(),
                }
            })
            .collect();

        let nodes: Vec<GraphNode> = qualifying
            .iter()
            .enumerate()
            .map(|(i, f)| GraphNode {
                id: f.file_id.clone(),
                label: f.file_name.clone(),
                metrics: NodeMetrics {
                    entity_count: f.nlp_entities.len(),
                    keyword_count: f.nlp_keywords.len(),
                    text_length: f.ocr_text.len(),
                    degree: graph.neighbors(node_indices[i]).count(),
                },
                details: build_details(f),
            })
            .collect();

        debug!(
            "Similarity graph: {} nodes, {} edges (threshold {})",
            nodes.len(),
            edges.len(),
            self.threshold
        );

        SemanticGraph { nodes, edges }
    }
}

fn majority_dimension(files: &[&FileRecord]) -> Option<usize> {
    let mut counts: std::collections::BTreeMap<usize, usize> = std::collections::BTreeMap::new();
    for f in files {
        if let Some(e) = &f.embedding {
            *counts.entry(e.len()).or_default() += 1;
        }
    }
    // Ties go to the smaller dimension, deterministically.
    counts
        .into_iter()
        .max_by_key(|&(len, count)| (count, std::cmp::Reverse(len)))
        .map(|(len, _)| len)
}

fn has_valid_embedding(file: &FileRecord) -> bool {
    match &file.embedding {
        Some(e) => !e.is_empty() && e.iter().all(|v| v.is_finite()),
        None => false,
    }
}

fn normalized_row(values: &[f32]) -> Array1<f32> {
    let v = Array1::from_vec(values.to_vec());
    let norm = v.dot(&v).sqrt();
    if norm < 1e-9 {
        v
    } else {
        v / norm
    }
}

fn build_details(file: &FileRecord) -> NodeDetails {
    let mut details = NodeDetails {
        preview: file.ocr_text.chars().take(160).collect(),
        ..Default::default()
    };

    for entity in &file.nlp_entities {
        match entity.label {
            EntityLabel::Person => details.persons.push(entity.text.clone()),
            EntityLabel::LegalCase => details.cases.push(entity.text.clone()),
            EntityLabel::Location => details.locations.push(entity.text.clone()),
            EntityLabel::Date => details.dates.push(entity.text.clone()),
            _ => {}
        }
    }

    // Mention counts come from the raw text since entity lists are
    // already deduplicated.
    let lower = file.ocr_text.to_lowercase();
    let mut mentions: Vec<MentionRow> = file
        .nlp_entities
        .iter()
        .map(|e| MentionRow {
            entity: e.text.clone(),
            label: e.label.to_string(),
            mentions: lower.matches(&e.text.to_lowercase()).count(),
        })
        .collect();
    mentions.sort_by(|a, b| b.mentions.cmp(&a.mentions).then(a.entity.cmp(&b.entity)));
    mentions.truncate(5);
    details.top_mentions = mentions;

    details
}
