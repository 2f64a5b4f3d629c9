//! Entity co-occurrence graph.
//!
//! An edge means two entities appeared in the same file. Edges are
//! emitted once per unordered pair per file and deliberately NOT
//! deduplicated across files — parallel edges carry the co-mention
//! count for consumers that aggregate.

use std::collections::HashMap;

use crate::types::{CooccurrenceEdge, CooccurrenceGraph, EntityNode};
use folderlens_ingest::Entity;

pub const COOCCURRENCE_RELATION: &str = "co_occurrence";

/// Build the co-occurrence graph from per-file entity lists.
///
/// Nodes are deduplicated by entity text with the last-seen label;
/// files with fewer than two distinct entity texts contribute no edges.
pub fn build_cooccurrence_graph<'a, I>(per_file_entities: I) -> CooccurrenceGraph
where
    I: IntoIterator<Item = &'a [Entity]>,
{
    let mut node_order: Vec<String> = Vec::new();
    let mut node_types: HashMap<String, String> = HashMap::new();
    let mut edges: Vec<CooccurrenceEdge> = Vec::new();

    for entities in per_file_entities {
        let mut texts: Vec<&str> = Vec::new();
        for entity in entities {
            if !node_types.contains_key(&entity.text) {
                node_order.push(entity.text.clone());
            }
            node_types.insert(entity.text.clone(), entity.label.to_string());
            if !texts.contains(&entity.text.as_str()) {
                texts.push(&entity.text);
            }
        }

        for i in 0..texts.len() {
            for j in (i + 1)..texts.len() {
                edges.push(CooccurrenceEdge {
                    source: texts[i].to_string(),
                    target: texts[j].to_string(),
                    relation: COOCCURRENCE_RELATION.to_string(),
                });
            }
        }
    }

    let nodes = node_order
        .into_iter()
        .map(|text| {
            let entity_type = node_types.get(&text).cloned().unwrap_or_default();
            EntityNode {
                id: text,
                entity_type,
            }
        })
        .collect();

    CooccurrenceGraph { nodes, edges }
}
