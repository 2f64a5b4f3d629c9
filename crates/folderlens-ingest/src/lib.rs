//! FolderLens Ingest — per-file text enrichment.
//!
//! Extracts typed entities and domain keywords from OCR'd text, cleans
//! raw OCR output, and provides the `TextExtractor` collaborator trait
//! for files that arrive without any extracted text.

pub mod clean;
pub mod entities;
pub mod file;

pub use clean::{clean_ocr_text, is_valid_ocr};
pub use entities::{extract_entities, extract_keywords, Entity, EntityLabel};
pub use file::{FileType, LocalTextExtractor, TextExtractor};
