//! FolderLens Agent — grounded folder narratives.
//!
//! Builds a bounded context from a folder's text, extracts verifiable
//! signals without the model's help, and makes a single constrained
//! LLM call to produce a neutral administrative narrative. The whole
//! step is gated behind a folder fingerprint so unchanged folders
//! never hit the model twice.

pub mod context;
pub mod llm;
pub mod signals;
pub mod summary;

pub use context::build_combined_context;
pub use llm::{LlmClient, OllamaClient, OpenAiCompatClient};
pub use signals::{extract_signals, FolderSignals};
pub use summary::{GroundedSummaryAgent, SummaryOutcome, INSUFFICIENT_INFO};
