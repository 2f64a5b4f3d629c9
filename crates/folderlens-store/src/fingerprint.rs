//! Folder content fingerprinting.
//!
//! The fingerprint is a cheap change-detector over a folder's file set,
//! not an integrity hash: same files with same extracted-text lengths
//! produce the same digest, and any addition, removal, or text change
//! produces a different one.

use sha2::{Digest, Sha256};

use crate::types::FileRecord;

/// Compute a deterministic fingerprint over `(file_id, text_len)` pairs.
///
/// Files are visited in file_id order so insertion order never matters.
pub fn compute_fingerprint(files: &[FileRecord]) -> String {
    let mut pairs: Vec<(&str, usize)> = files
        .iter()
        .map(|f| (f.file_id.as_str(), f.ocr_text.len()))
        .collect();
    pairs.sort();

    let mut hasher = Sha256::new();
    for (file_id, text_len) in pairs {
        hasher.update(file_id.as_bytes());
        hasher.update(b":");
        hasher.update(text_len.to_string().as_bytes());
        hasher.update(b"|");
    }
    hex::encode(hasher.finalize())
}
