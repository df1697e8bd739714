use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::AppState;
use medai_core::{AdviceService, CoreConfig};

/// Main entry point for the Med-AI service
///
/// Loads configuration, the knowledge base and the provider strategy once, then serves the
/// REST API and the web client on port 8000 (configurable via MEDAI_REST_ADDR).
///
/// # Environment Variables
/// - `MEDAI_REST_ADDR`: REST server address (default: "0.0.0.0:8000")
/// - `MEDAI_STATIC_DIR`: Directory holding `index.html` and assets (default: "public")
/// - `MEDAI_PROVIDER`: `ollama`, `groq`, `openrouter` or `gemini` (default: "ollama")
/// - `MEDAI_MODEL`, `MEDAI_PROVIDER_URL`: provider overrides
/// - `GROQ_API_KEY`, `OPENROUTER_API_KEY`, `GEMINI_API_KEY`: provider credentials
/// - `MEDAI_KNOWLEDGE_BASE`: knowledge base artifact path
/// - `MEDAI_LANGUAGE_MODE`: `translate` or `native`
/// - `MEDAI_TRANSLATE_URL`: translation endpoint override
///
/// Variables may also be set in `.env` or `env/.env`.
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the configuration is invalid (for example a missing API key),
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    dotenvy::from_path("env/.env").ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("medai_run=info".parse()?)
                .add_directive("medai_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("MEDAI_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".into());
    let static_dir =
        PathBuf::from(std::env::var("MEDAI_STATIC_DIR").unwrap_or_else(|_| "public".into()));

    let cfg = CoreConfig::from_lookup(|key| std::env::var(key).ok())?;
    let advice_service = AdviceService::from_config(&cfg)?;

    if !static_dir.is_dir() {
        tracing::warn!(
            "static directory {} does not exist; only the API will be served",
            static_dir.display()
        );
    }

    let app = api_rest::router(AppState { advice_service }, &static_dir);

    tracing::info!("++ Starting Med-AI REST on {}", rest_addr);
    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
