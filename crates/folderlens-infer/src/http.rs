//! Remote embedding client for Ollama-style embeddings endpoints.

use async_trait::async_trait;
use ndarray::Array1;
use reqwest::Client;
use serde_json::json;
use tracing::{debug, warn};

use crate::embedder::{l2_normalize, EmbedderBackend, MIN_EMBED_CHARS};

/// Embedding client for `POST {base_url}/api/embeddings`.
///
/// Request: `{"model": ..., "prompt": ...}`; response: `{"embedding": [..]}`.
pub struct HttpEmbedder {
    client: Client,
    base_url: String,
    model: String,
    dim: usize,
}

impl HttpEmbedder {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, dim: usize) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            model: model.into(),
            dim,
        }
    }
}

#[async_trait]
impl EmbedderBackend for HttpEmbedder {
    async fn embed(&self, text: &str) -> Option<Array1<f32>> {
        if text.trim().len() <= MIN_EMBED_CHARS {
            return None;
        }

        let url = format!("{}/api/embeddings", self.base_url.trim_end_matches('/'));
        let body = json!({ "model": self.model, "prompt": text });

        let response = match self.client.post(&url).json(&body).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!("Embedding request failed: {}", e);
                return None;
            }
        };

        if !response.status().is_success() {
            warn!("Embedding API error: {}", response.status());
            return None;
        }

        let parsed: serde_json::Value = match response.json().await {
            Ok(v) => v,
            Err(e) => {
                warn!("Embedding response parse failed: {}", e);
                return None;
            }
        };

        let values: Vec<f32> = parsed
            .get("embedding")?
            .as_array()?
            .iter()
            .filter_map(|v| v.as_f64().map(|f| f as f32))
            .collect();

        if values.len() != self.dim {
            warn!(
                "Embedding dimension mismatch: got {}, expected {}",
                values.len(),
                self.dim
            );
            return None;
        }

        debug!("Embedded {} chars", text.len());
        l2_normalize(Array1::from_vec(values))
    }

    fn dimension(&self) -> usize {
        self.dim
    }

    fn is_available(&self) -> bool {
        true
    }
}
