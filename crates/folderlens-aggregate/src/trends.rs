//! Entity/keyword rollups and frequency trend terms.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use folderlens_store::FileRecord;

static TREND_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[a-zA-Z]{4,}\b").unwrap());

/// A term with its folder-wide occurrence count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRow {
    pub text: String,
    pub count: usize,
}

/// Roll up per-file entities and keywords into folder-wide top lists.
///
/// Entities are counted by text across files, keywords by presence per
/// file. Returns `(entities, keywords)`, each capped at `cap`.
pub fn aggregate_rollups(files: &[FileRecord], cap: usize) -> (Vec<CountRow>, Vec<CountRow>) {
    let mut entity_counts: HashMap<String, usize> = HashMap::new();
    let mut keyword_counts: HashMap<String, usize> = HashMap::new();

    for f in files {
        for entity in &f.nlp_entities {
            *entity_counts.entry(entity.text.clone()).or_default() += 1;
        }
        for keyword in &f.nlp_keywords {
            *keyword_counts.entry(keyword.clone()).or_default() += 1;
        }
    }

    (top_rows(entity_counts, cap), top_rows(keyword_counts, cap))
}

/// Most frequent alphabetic words of 4+ letters across all OCR text,
/// lowercased. A cheap topical signal where no model is available.
pub fn extract_trend_terms(files: &[FileRecord], top_k: usize) -> Vec<CountRow> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for f in files {
        if f.ocr_text.is_empty() {
            continue;
        }
        let lower = f.ocr_text.to_lowercase();
        for m in TREND_WORD.find_iter(&lower) {
            *counts.entry(m.as_str().to_string()).or_default() += 1;
        }
    }
    top_rows(counts, top_k)
}

// Descending by count, ties broken alphabetically for stable output.
fn top_rows(counts: HashMap<String, usize>, cap: usize) -> Vec<CountRow> {
    let mut rows: Vec<CountRow> = counts
        .into_iter()
        .map(|(text, count)| CountRow { text, count })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count).then(a.text.cmp(&b.text)));
    rows.truncate(cap);
    rows
}
