//! Text extraction collaborator for files lacking OCR output.
//!
//! The real OCR service lives outside this system; `TextExtractor` is
//! the seam. `LocalTextExtractor` handles text-based formats directly
//! so plain files never need an OCR round-trip.

use async_trait::async_trait;
use folderlens_core::{Error, Result};

/// Supported file types, detected from extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    PlainText,
    Markdown,
    Pdf,
    Docx,
    Image,
    Unknown,
}

impl FileType {
    pub fn from_extension(ext: &str) -> Self {
        match ext.trim_start_matches('.').to_lowercase().as_str() {
            "txt" | "csv" | "log" => Self::PlainText,
            "md" | "mdx" => Self::Markdown,
            "pdf" => Self::Pdf,
            "docx" | "doc" => Self::Docx,
            "jpg" | "jpeg" | "png" | "tif" | "tiff" | "bmp" => Self::Image,
            _ => Self::Unknown,
        }
    }

    /// File types whose bytes are already text.
    pub fn is_text(&self) -> bool {
        matches!(self, Self::PlainText | Self::Markdown)
    }
}

/// External text-extraction collaborator (OCR fallback).
///
/// Implementations may perform OCR, translation, or format parsing;
/// this crate treats them as opaque.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Extract text from raw file bytes. An empty string means the file
    /// had no extractable text.
    async fn extract(&self, file_bytes: &[u8], file_name: &str) -> Result<String>;
}

/// Extractor that handles text-based formats locally and rejects
/// everything that needs real OCR.
pub struct LocalTextExtractor;

#[async_trait]
impl TextExtractor for LocalTextExtractor {
    async fn extract(&self, file_bytes: &[u8], file_name: &str) -> Result<String> {
        let ext = file_name.rsplit('.').next().unwrap_or("");
        let file_type = FileType::from_extension(ext);

        if file_type.is_text() {
            return String::from_utf8(file_bytes.to_vec())
                .map_err(|e| Error::Extraction(format!("{}: invalid UTF-8: {}", file_name, e)));
        }

        // Binary content with mostly-printable bytes is still worth a try
        let printable = file_bytes
            .iter()
            .filter(|b| b.is_ascii_graphic() || b.is_ascii_whitespace())
            .count();
        if file_type == FileType::Unknown && printable * 10 >= file_bytes.len() * 9 {
            return Ok(String::from_utf8_lossy(file_bytes).into_owned());
        }

        Err(Error::Extraction(format!(
            "{}: no local extractor for this format",
            file_name
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_plain_text() {
        let extractor = LocalTextExtractor;
        let text = extractor
            .extract(b"FIR 42 filed in district court", "note.txt")
            .await
            .unwrap();
        assert!(text.contains("FIR 42"));
    }

    #[tokio::test]
    async fn test_image_rejected() {
        let extractor = LocalTextExtractor;
        let result = extractor.extract(&[0xFF, 0xD8, 0xFF, 0x00], "scan.jpg").await;
        assert!(matches!(result, Err(Error::Extraction(_))));
    }

    #[test]
    fn test_file_type_detection() {
        assert_eq!(FileType::from_extension(".pdf"), FileType::Pdf);
        assert_eq!(FileType::from_extension("PNG"), FileType::Image);
        assert_eq!(FileType::from_extension("txt"), FileType::PlainText);
        assert_eq!(FileType::from_extension("xyz"), FileType::Unknown);
    }
}
