//! Embedding provider trait.

use async_trait::async_trait;
use ndarray::Array1;

/// Texts at or below this length are not embedded.
pub const MIN_EMBED_CHARS: usize = 20;

/// Trait for embedding providers.
///
/// Implementations return an L2-normalized vector, or `None` when the
/// provider is unavailable or the input is below `MIN_EMBED_CHARS`.
#[async_trait]
pub trait EmbedderBackend: Send + Sync {
    /// Generate an embedding for a text string.
    async fn embed(&self, text: &str) -> Option<Array1<f32>>;

    /// Get the embedding dimension.
    fn dimension(&self) -> usize;

    /// Check if the provider is available.
    fn is_available(&self) -> bool;
}

/// Placeholder embedder that always returns None.
pub struct NoopEmbedder {
    dim: usize,
}

impl NoopEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }
}

#[async_trait]
impl EmbedderBackend for NoopEmbedder {
    async fn embed(&self, _text: &str) -> Option<Array1<f32>> {
        None
    }

    fn dimension(&self) -> usize {
        self.dim
    }

    fn is_available(&self) -> bool {
        false
    }
}

/// Normalize a vector in place to unit L2 norm. Returns None for
/// degenerate (near-zero) vectors.
pub fn l2_normalize(mut v: Array1<f32>) -> Option<Array1<f32>> {
    let norm = v.dot(&v).sqrt();
    if norm < 1e-9 {
        return None;
    }
    v /= norm;
    Some(v)
}
