use taskboard_backend::{config::DEFAULT_LOG_FILTER, router, AppState, Config, Database};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = Config::from_env()?;
    let db = Database::open(&config.database)?;
    let app = router(AppState::new(db), &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!(addr = %config.addr, static_dir = %config.static_dir.display(), "task board API listening");
    info!(origins = ?config.allowed_origins, "cross-origin allow-list");
    axum::serve(listener, app).await?;
    Ok(())
}
