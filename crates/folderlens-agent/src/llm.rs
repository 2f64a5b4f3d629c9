//! LLM text-completion clients.
//!
//! Two non-streaming backends behind one trait: a local Ollama server
//! and any OpenAI-compatible chat-completions endpoint.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::debug;

use folderlens_core::{Error, Result};

/// Synchronous request/response completion. Streaming is a UI concern
/// that lives outside this engine.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Client for a local Ollama server (`/api/generate`).
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            model: model.into(),
        }
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/api/generate", self.base_url.trim_end_matches('/'));
        debug!("Ollama completion via {} (model {})", url, self.model);

        let response = self
            .client
            .post(&url)
            .json(&json!({
                "model": self.model,
                "prompt": prompt,
                "stream": false,
            }))
            .send()
            .await
            .map_err(|e| Error::Grounding(format!("LLM request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Grounding(format!(
                "LLM returned status {}",
                response.status()
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| Error::Grounding(format!("LLM response unreadable: {}", e)))?;

        body["response"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| Error::Grounding("LLM response missing text".to_string()))
    }
}

/// Client for OpenAI-compatible chat-completions APIs (OpenAI, Groq,
/// self-hosted gateways).
pub struct OpenAiCompatClient {
    client: Client,
    url: String,
    model: String,
    api_key: String,
    temperature: f64,
    max_tokens: usize,
}

impl OpenAiCompatClient {
    pub fn new(
        url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
            model: model.into(),
            api_key: api_key.into(),
            temperature: 0.4,
            max_tokens: 512,
        }
    }
}

#[async_trait]
impl LlmClient for OpenAiCompatClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        debug!("Chat completion via {} (model {})", self.url, self.model);

        let body = json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
            "stream": false,
        });

        let response = self
            .client
            .post(&self.url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Grounding(format!("LLM request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(Error::Grounding(format!("API error {}: {}", status, text)));
        }

        let parsed: serde_json::Value = response
            .json()
            .await
            .map_err(|e| Error::Grounding(format!("LLM response unreadable: {}", e)))?;

        parsed["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| Error::Grounding("LLM response missing text".to_string()))
    }
}
