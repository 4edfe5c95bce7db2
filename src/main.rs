mod config;
mod error;
mod flow;
mod llm;
mod questionnaire;
mod routes;
mod session;
mod state;

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::ServerConfig;
use flow::StepGenerator;
use llm::{LlmClient, Oracle};
use questionnaire::QuestionCatalog;
use session::{InMemorySessionStore, SessionStore};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load env before the filter reads RUST_LOG
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env()?;

    let llm_client = LlmClient::from_env()?;
    info!(model = llm_client.model(), "LLM client initialized");
    let oracle: Arc<dyn Oracle> = Arc::new(llm_client);

    // Parse and classify once; POST /questionnaire/reload refreshes it
    let catalog = Arc::new(QuestionCatalog::load(&config.questionnaire_path, oracle.clone()).await);

    let store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());
    let flow = Arc::new(StepGenerator::new(oracle, catalog.clone(), store.clone()));

    let app = routes::router(
        AppState {
            store,
            catalog,
            flow,
        },
        config.enable_cors,
    );

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!("Question orchestrator listening on {}", config.bind_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
