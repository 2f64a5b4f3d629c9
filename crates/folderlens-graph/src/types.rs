//! Graph data types, shaped for direct frontend consumption.

use serde::{Deserialize, Serialize};

/// A node in the file similarity graph — one per file with a usable
/// embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    /// file_id.
    pub id: String,
    /// Display label (file name).
    pub label: String,
    pub metrics: NodeMetrics,
    pub details: NodeDetails,
}

/// Crude richness metrics for graph sizing/coloring in a UI.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeMetrics {
    pub entity_count: usize,
    pub keyword_count: usize,
    pub text_length: usize,
    /// Number of similarity edges touching this node.
    pub degree: usize,
}

/// Click-to-inspect payload for a file node.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeDetails {
    pub persons: Vec<String>,
    pub cases: Vec<String>,
    pub locations: Vec<String>,
    pub dates: Vec<String>,
    /// First ~160 characters of the file's text.
    pub preview: String,
    /// Top entities by raw mention count in this file's text.
    pub top_mentions: Vec<MentionRow>,
}

/// One row of the per-file entity mention table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MentionRow {
    pub entity: String,
    pub label: String,
    pub mentions: usize,
}

/// An undirected similarity edge, stored once per unordered pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    /// Cosine similarity, rounded to 3 decimals, >= the build threshold.
    pub weight: f64,
    pub relationship: String,
}

/// File similarity graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SemanticGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// A node in the entity co-occurrence graph, deduplicated by entity text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityNode {
    /// Entity text.
    pub id: String,
    /// Last-seen entity label.
    #[serde(rename = "type")]
    pub entity_type: String,
}

/// An edge marking two entities that appeared in the same file.
/// Parallel edges across files are intentional — consumers may
/// aggregate them into weights by counting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CooccurrenceEdge {
    pub source: String,
    pub target: String,
    pub relation: String,
}

/// Entity co-occurrence graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CooccurrenceGraph {
    pub nodes: Vec<EntityNode>,
    pub edges: Vec<CooccurrenceEdge>,
}
