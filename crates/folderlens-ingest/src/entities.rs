//! Typed entity and keyword extraction using regex patterns and fixed
//! vocabularies. Deterministic, no external calls.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Entity classification label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityLabel {
    Person,
    Org,
    Date,
    LegalCase,
    Account,
    Location,
    Other,
}

impl std::fmt::Display for EntityLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EntityLabel::Person => "PERSON",
            EntityLabel::Org => "ORG",
            EntityLabel::Date => "DATE",
            EntityLabel::LegalCase => "LEGAL_CASE",
            EntityLabel::Account => "ACCOUNT",
            EntityLabel::Location => "LOCATION",
            EntityLabel::Other => "OTHER",
        };
        write!(f, "{}", s)
    }
}

/// A typed entity extracted from text. The only entity shape in the
/// system — every downstream consumer takes `{text, label}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entity {
    pub text: String,
    pub label: EntityLabel,
}

impl Entity {
    pub fn new(text: impl Into<String>, label: EntityLabel) -> Self {
        Self {
            text: text.into(),
            label,
        }
    }
}

static PERSON_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z][a-z]+(?:\s[A-Z][a-z]+){1,2}\b").unwrap());
static DATE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{1,2}/\d{1,2}/\d{4}\b").unwrap());
static LEGAL_CASE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bFIR\s?\d+/?\d*|\bIPC\s*\d+").unwrap());
static ACCOUNT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{12,20}\b").unwrap());

// Institutional vocabularies. Alias matching is case-insensitive but the
// matched text is kept as it appears in the document (no merging of
// "Delhi Police" and "delhi police" — exact-string dedup only).
static ORG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Delhi Police|Police Department|Special Branch").unwrap());
static LOCATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Tihar Jail|Rohini Jail|New Delhi|Delhi").unwrap());

/// Domain keyword vocabulary, tested by presence against lowercased text.
const KEYWORD_VOCABULARY: [&str; 9] = [
    "court", "police", "criminal", "dossier", "prisoner", "adjourn", "district", "legal", "case",
];

/// Extract typed entities from raw text.
///
/// Runs a fixed ordered set of patterns, one per entity type, then
/// deduplicates by `(text, label)`. Returns an empty list for empty input.
pub fn extract_entities(text: &str) -> Vec<Entity> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let mut entities: Vec<Entity> = Vec::new();
    let mut seen: HashSet<(String, EntityLabel)> = HashSet::new();

    let passes: [(&Regex, EntityLabel); 6] = [
        (&PERSON_RE, EntityLabel::Person),
        (&DATE_RE, EntityLabel::Date),
        (&LEGAL_CASE_RE, EntityLabel::LegalCase),
        (&ACCOUNT_RE, EntityLabel::Account),
        (&ORG_RE, EntityLabel::Org),
        (&LOCATION_RE, EntityLabel::Location),
    ];

    for (re, label) in passes {
        for m in re.find_iter(text) {
            let matched = m.as_str().trim().to_string();
            if matched.is_empty() {
                continue;
            }
            if seen.insert((matched.clone(), label)) {
                entities.push(Entity::new(matched, label));
            }
        }
    }

    entities
}

/// Extract domain keywords present in the text.
///
/// Presence test only — no frequency ranking at file level.
pub fn extract_keywords(text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    let lower = text.to_lowercase();
    KEYWORD_VOCABULARY
        .iter()
        .filter(|w| lower.contains(*w))
        .map(|w| w.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_and_date() {
        let text = "Statement of Rajesh Kumar recorded on 12/03/2024.";
        let entities = extract_entities(text);
        assert!(entities.contains(&Entity::new("Rajesh Kumar", EntityLabel::Person)));
        assert!(entities.contains(&Entity::new("12/03/2024", EntityLabel::Date)));
    }

    #[test]
    fn test_legal_case_dedup() {
        let text = "FIR 123 was filed. The same FIR 123 is referenced again.";
        let entities = extract_entities(text);
        let cases: Vec<_> = entities
            .iter()
            .filter(|e| e.label == EntityLabel::LegalCase)
            .collect();
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].text, "FIR 123");
    }

    #[test]
    fn test_ipc_section() {
        let entities = extract_entities("Charged under IPC 302.");
        assert!(entities
            .iter()
            .any(|e| e.label == EntityLabel::LegalCase && e.text.contains("302")));
    }

    #[test]
    fn test_account_number() {
        let entities = extract_entities("Transferred to account 123456789012.");
        assert!(entities.contains(&Entity::new("123456789012", EntityLabel::Account)));
    }

    #[test]
    fn test_org_and_location_case_insensitive() {
        let entities = extract_entities("Report from delhi police regarding Tihar Jail inmates.");
        assert!(entities
            .iter()
            .any(|e| e.label == EntityLabel::Org && e.text.eq_ignore_ascii_case("delhi police")));
        assert!(entities.contains(&Entity::new("Tihar Jail", EntityLabel::Location)));
    }

    #[test]
    fn test_case_preserved_not_merged() {
        // "John Smith" and "john smith" stay distinct — exact-string dedup only
        let entities = extract_entities("Custody of Tihar Jail transferred. Record at tihar jail.");
        let locations: Vec<_> = entities
            .iter()
            .filter(|e| e.label == EntityLabel::Location)
            .collect();
        assert_eq!(locations.len(), 2);
    }

    #[test]
    fn test_empty_input() {
        assert!(extract_entities("").is_empty());
        assert!(extract_keywords("  ").is_empty());
    }

    #[test]
    fn test_keywords_presence_only() {
        let kws = extract_keywords("The court adjourned the case. COURT resumes tomorrow.");
        assert!(kws.contains(&"court".to_string()));
        assert!(kws.contains(&"adjourn".to_string()));
        assert!(kws.contains(&"case".to_string()));
        // presence, not frequency: "court" appears once despite two mentions
        assert_eq!(kws.iter().filter(|k| *k == "court").count(), 1);
    }
}
