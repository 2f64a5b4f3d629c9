//! FolderLens — folder semantic analysis server.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

mod routes;
mod state;
mod worker;

use state::AppState;

use folderlens_agent::{GroundedSummaryAgent, LlmClient, OllamaClient, OpenAiCompatClient};
use folderlens_infer::{EmbedderBackend, HttpEmbedder, NoopEmbedder};
use folderlens_ingest::LocalTextExtractor;
use folderlens_runtime::FolderAnalysisOrchestrator;
use folderlens_store::FileStore;

fn resolve_data_dir() -> PathBuf {
    std::env::var("FOLDERLENS_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data"))
}

fn create_embedder(config: &folderlens_core::FolderLensConfig) -> Arc<dyn EmbedderBackend> {
    match std::env::var("FOLDERLENS_EMBEDDING_URL") {
        Ok(base_url) => {
            let model = std::env::var("FOLDERLENS_EMBEDDING_MODEL")
                .unwrap_or_else(|_| "all-minilm".to_string());
            info!("Using HTTP embedder at {} (model {})", base_url, model);
            Arc::new(HttpEmbedder::new(base_url, model, config.embedding_dim))
        }
        Err(_) => {
            info!("No embedding endpoint configured, similarity graphs will be empty");
            Arc::new(NoopEmbedder::new(config.embedding_dim))
        }
    }
}

fn create_llm() -> Arc<dyn LlmClient> {
    if let Ok(api_key) = std::env::var("OPENAI_API_KEY") {
        let model =
            std::env::var("FOLDERLENS_LLM_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());
        info!("Using OpenAI-compatible LLM (model {})", model);
        return Arc::new(OpenAiCompatClient::new(
            "https://api.openai.com/v1/chat/completions",
            model,
            api_key,
        ));
    }
    let base_url =
        std::env::var("OLLAMA_URL").unwrap_or_else(|_| "http://localhost:11434".to_string());
    let model = std::env::var("FOLDERLENS_LLM_MODEL").unwrap_or_else(|_| "llama3".to_string());
    info!("Using Ollama LLM at {} (model {})", base_url, model);
    Arc::new(OllamaClient::new(base_url, model))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let data_dir = resolve_data_dir();
    info!("Data directory: {}", data_dir.display());

    let config = folderlens_core::FolderLensConfig::from_env(&data_dir)?;
    let port = config.port;

    let store = Arc::new(
        FileStore::open(&config.data_paths.db)
            .map_err(|e| anyhow::anyhow!("Failed to open store: {}", e))?,
    );

    let embedder = create_embedder(&config);
    let llm = create_llm();
    let agent = Arc::new(GroundedSummaryAgent::new(
        store.clone(),
        llm,
        config.max_context_chars,
    ));
    let orchestrator = Arc::new(FolderAnalysisOrchestrator::new(
        store.clone(),
        Arc::new(LocalTextExtractor),
        embedder,
        agent,
        config.similarity_threshold,
        config.old_file_age_days,
    ));

    let state = Arc::new(AppState::new(config, store, orchestrator));

    worker::start_analysis_worker(state.clone());

    let app = routes::build_router(state.clone());

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("FolderLens server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
