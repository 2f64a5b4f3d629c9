//! OCR text cleanup and validity checks.

use once_cell::sync::Lazy;
use regex::Regex;

/// Minimum cleaned length for OCR text to count as usable content.
pub const MIN_OCR_LENGTH: usize = 20;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static NON_ASCII_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\x00-\x7F]+").unwrap());

/// Normalize OCR output: collapse whitespace, strip non-ASCII garbage.
pub fn clean_ocr_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let text = WHITESPACE_RE.replace_all(text, " ");
    let text = NON_ASCII_RE.replace_all(&text, " ");
    text.trim().to_string()
}

/// Whether cleaned OCR text is long enough to be worth embedding.
pub fn is_valid_ocr(text: &str) -> bool {
    text.trim().len() > MIN_OCR_LENGTH
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_collapse() {
        let cleaned = clean_ocr_text("FIR   123\n\n  filed\tby  police");
        assert_eq!(cleaned, "FIR 123 filed by police");
    }

    #[test]
    fn test_non_ascii_stripped() {
        let cleaned = clean_ocr_text("case № 42 — pending");
        assert!(!cleaned.contains('№'));
        assert!(cleaned.contains("case"));
    }

    #[test]
    fn test_validity_boundary() {
        assert!(!is_valid_ocr(""));
        assert!(!is_valid_ocr("a".repeat(20).as_str()));
        assert!(is_valid_ocr("a".repeat(21).as_str()));
    }
}
