//! FolderLens Infer — embedding provider abstraction.
//!
//! The `EmbedderBackend` trait turns text into a fixed-length
//! L2-normalized vector. `HttpEmbedder` talks to an Ollama-style
//! embeddings endpoint; `NoopEmbedder` signals that no embedding
//! provider is configured (similarity graphs come out empty, everything
//! else still works).

pub mod embedder;
pub mod http;

pub use embedder::{l2_normalize, EmbedderBackend, NoopEmbedder, MIN_EMBED_CHARS};
pub use http::HttpEmbedder;
