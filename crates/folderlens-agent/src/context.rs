//! Combined-context construction.

use folderlens_ingest::clean_ocr_text;
use folderlens_store::FileRecord;

/// Concatenate the cleaned text of all files, head-truncated at
/// `max_chars`. Truncation is over the joined corpus, not per file,
/// so early files win when the folder is large.
pub fn build_combined_context(files: &[FileRecord], max_chars: usize) -> String {
    let parts: Vec<String> = files
        .iter()
        .map(|f| clean_ocr_text(&f.ocr_text))
        .filter(|t| !t.is_empty())
        .collect();

    let combined = parts.join("\n\n");
    if combined.chars().count() <= max_chars {
        combined
    } else {
        combined.chars().take(max_chars).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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
            nlp_entities: Vec::new(),
            nlp_keywords: Vec::new(),
            created_at: 0,
            modified_at: 0,
        }
    }

    #[test]
    fn test_joins_cleaned_text() {
        let files = vec![record("first  file\n\ntext"), record(""), record("second")];
        let context = build_combined_context(&files, 12_000);
        assert_eq!(context, "first file text\n\nsecond");
    }

    #[test]
    fn test_head_truncation() {
        let files = vec![record(&"a".repeat(100)), record(&"b".repeat(100))];
        let context = build_combined_context(&files, 50);
        assert_eq!(context.chars().count(), 50);
        assert!(context.chars().all(|c| c == 'a'));
    }

    #[test]
    fn test_empty_folder() {
        assert_eq!(build_combined_context(&[], 12_000), "");
    }
}
