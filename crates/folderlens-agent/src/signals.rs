//! Structured signal extraction.
//!
//! Everything here is computed without the model. The rendered block
//! is handed to the LLM next to the combined context so the narrative
//! stays anchored to facts that were actually observed.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use folderlens_ingest::EntityLabel;
use folderlens_store::FileRecord;

static MONEY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:Rs\.?|INR)\s?\d[\d,]*\b").unwrap());

static CUSTODIAL_TERMS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:custody|jail|prison|remand|warden)\b").unwrap());

static JUDICIAL_TERMS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:court|hearing|judge|judicial|adjourn\w*)\b").unwrap());

static FINANCIAL_TERMS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:account|transaction|payment|transfer)\b").unwrap());

const TOP_SIGNALS: usize = 5;
const MAX_DATES: usize = 15;
const MAX_AMOUNTS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountedSignal {
    pub text: String,
    pub count: usize,
}

/// Verifiable facts extracted across the whole folder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FolderSignals {
    /// Most mentioned people, by number of files mentioning them.
    pub individuals: Vec<CountedSignal>,
    pub case_references: Vec<CountedSignal>,
    pub locations: Vec<CountedSignal>,
    /// Distinct dates, sorted, capped.
    pub dates: Vec<String>,
    /// Distinct monetary amounts in first-seen order, capped.
    pub amounts: Vec<String>,
    /// Present administrative coverage categories.
    pub coverage: Vec<String>,
}

impl FolderSignals {
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
            && self.case_references.is_empty()
            && self.locations.is_empty()
            && self.dates.is_empty()
            && self.amounts.is_empty()
            && self.coverage.is_empty()
    }

    /// Serialize as the text block included in the grounding prompt.
    /// Empty categories are omitted entirely.
    pub fn render(&self) -> String {
        let mut lines = Vec::new();
        push_counted(&mut lines, "Key individuals", &self.individuals);
        push_counted(&mut lines, "Case references", &self.case_references);
        push_counted(&mut lines, "Locations", &self.locations);
        if !self.dates.is_empty() {
            lines.push(format!("Dates: {}", self.dates.join(", ")));
        }
        if !self.amounts.is_empty() {
            lines.push(format!("Amounts: {}", self.amounts.join(", ")));
        }
        if !self.coverage.is_empty() {
            lines.push(format!("Coverage: {}", self.coverage.join("; ")));
        }
        lines.join("\n")
    }
}

fn push_counted(lines: &mut Vec<String>, label: &str, signals: &[CountedSignal]) {
    if signals.is_empty() {
        return;
    }
    let rendered: Vec<String> = signals
        .iter()
        .map(|s| format!("{} ({})", s.text, s.count))
        .collect();
    lines.push(format!("{}: {}", label, rendered.join(", ")));
}

/// Extract folder-wide signals from enriched file records.
pub fn extract_signals(files: &[FileRecord]) -> FolderSignals {
    let mut person_counts: HashMap<String, usize> = HashMap::new();
    let mut case_counts: HashMap<String, usize> = HashMap::new();
    let mut location_counts: HashMap<String, usize> = HashMap::new();
    let mut dates: Vec<String> = Vec::new();
    let mut amounts: Vec<String> = Vec::new();

    for f in files {
        for entity in &f.nlp_entities {
            match entity.label {
                EntityLabel::Person => {
                    *person_counts.entry(entity.text.clone()).or_default() += 1;
                }
                EntityLabel::LegalCase => {
                    *case_counts.entry(entity.text.clone()).or_default() += 1;
                }
                EntityLabel::Location => {
                    *location_counts.entry(entity.text.clone()).or_default() += 1;
                }
                EntityLabel::Date => {
                    if !dates.contains(&entity.text) {
                        dates.push(entity.text.clone());
                    }
                }
                _ => {}
            }
        }
        for m in MONEY_PATTERN.find_iter(&f.ocr_text) {
            let amount = m.as_str().to_string();
            if !amounts.contains(&amount) && amounts.len() < MAX_AMOUNTS {
                amounts.push(amount);
            }
        }
    }

    dates.sort();
    dates.truncate(MAX_DATES);

    let combined: String = files
        .iter()
        .map(|f| f.ocr_text.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    let mut coverage = Vec::new();
    if CUSTODIAL_TERMS.is_match(&combined) {
        coverage.push("custodial tracking present".to_string());
    }
    if JUDICIAL_TERMS.is_match(&combined) {
        coverage.push("judicial oversight present".to_string());
    }
    if FINANCIAL_TERMS.is_match(&combined) || !amounts.is_empty() {
        coverage.push("financial records present".to_string());
    }

    FolderSignals {
        individuals: top_counted(person_counts),
        case_references: top_counted(case_counts),
        locations: top_counted(location_counts),
        dates,
        amounts,
        coverage,
    }
}

fn top_counted(counts: HashMap<String, usize>) -> Vec<CountedSignal> {
    let mut rows: Vec<CountedSignal> = counts
        .into_iter()
        .map(|(text, count)| CountedSignal { text, count })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count).then(a.text.cmp(&b.text)));
    rows.truncate(TOP_SIGNALS);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use folderlens_ingest::extract_entities;

    fn record(text: &str) -> FileRecord {
        FileRecord {
            file_id: "1".to_string(),
            folder_id: "f".to_string(),
            file_name: "a.pdf".to_string(),
            extension: ".pdf".to_string(),
            size_kb: 1.0,
            file_path: String::new(),
            ocr_text: text.to_string(),
            embedding: None,
            nlp_entities: extract_entities(text),
            nlp_keywords: Vec::new(),
            created_at: 0,
            modified_at: 0,
        }
    }

    #[test]
    fn test_counted_categories() {
        let files = vec![
            record("Rahul Sharma appeared before the court regarding FIR 123."),
            record("Rahul Sharma remains in Tihar Jail under FIR 123."),
            record("Amit Verma was transferred to Tihar Jail."),
        ];
        let signals = extract_signals(&files);

        assert_eq!(signals.individuals[0].text, "Rahul Sharma");
        assert_eq!(signals.individuals[0].count, 2);
        assert_eq!(signals.case_references[0].text, "FIR 123");
        assert_eq!(signals.case_references[0].count, 2);
        assert_eq!(signals.locations[0].text, "Tihar Jail");
        assert_eq!(signals.locations[0].count, 2);
    }

    #[test]
    fn test_dates_sorted_and_distinct() {
        let files = vec![
            record("Hearing on 15/03/2024 and again 15/03/2024."),
            record("Arrested on 02/01/2024."),
        ];
        let signals = extract_signals(&files);
        assert_eq!(signals.dates, vec!["02/01/2024", "15/03/2024"]);
    }

    #[test]
    fn test_amounts_and_financial_coverage() {
        let files = vec![record("A payment of Rs. 50,000 followed by INR 200.")];
        let signals = extract_signals(&files);
        assert_eq!(signals.amounts, vec!["Rs. 50,000", "INR 200"]);
        assert!(signals
            .coverage
            .contains(&"financial records present".to_string()));
    }

    #[test]
    fn test_coverage_flags() {
        let signals = extract_signals(&[record(
            "The prisoner remains in custody pending the next court hearing.",
        )]);
        assert!(signals
            .coverage
            .contains(&"custodial tracking present".to_string()));
        assert!(signals
            .coverage
            .contains(&"judicial oversight present".to_string()));
    }

    #[test]
    fn test_render_omits_empty_categories() {
        let signals = extract_signals(&[record("Nothing of note here.")]);
        let block = signals.render();
        assert!(!block.contains("Key individuals"));
        assert!(!block.contains("Amounts"));
    }

    #[test]
    fn test_empty_files() {
        let signals = extract_signals(&[]);
        assert!(signals.is_empty());
        assert_eq!(signals.render(), "");
    }
}
