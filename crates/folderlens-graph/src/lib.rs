//! FolderLens Graph — similarity and co-occurrence graphs.
//!
//! Two independent graph views over an enriched file set: a weighted
//! file-to-file similarity graph from embeddings, and an entity
//! co-occurrence graph from per-file entity lists. Both are rebuilt
//! fully on every non-cached analysis run.

pub mod cooccurrence;
pub mod similarity;
pub mod types;

pub use cooccurrence::build_cooccurrence_graph;
pub use similarity::SimilarityGraphBuilder;
pub use types::{
    CooccurrenceEdge, CooccurrenceGraph, EntityNode, GraphEdge, GraphNode, NodeDetails,
    NodeMetrics, SemanticGraph,
};
