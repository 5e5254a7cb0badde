use tracing::info;

use doc_qa_server::config::Config;
use doc_qa_server::routes::{build_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present (development convenience)
    dotenvy::dotenv().ok();

    // Initialise tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "doc_qa_server=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env();
    info!(
        upload_dir = %config.upload_dir.display(),
        max_upload_bytes = config.max_upload_bytes,
        max_sessions = config.max_sessions,
        "configuration loaded"
    );

    // ── Router ────────────────────────────────────────────────────────────────
    let state = AppState::from_config(&config);
    let app = build_router(state, &config);

    // ── Listen ────────────────────────────────────────────────────────────────
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{addr}/");

    axum::serve(listener, app).await?;
    Ok(())
}
