//! Pessoas API server.
//!
//! Configuration comes from the environment (and `.env`): `PESSOAS_STORE`,
//! `DATABASE_URL`, `PORT`, see [`pessoas_api::config`].

use pessoas_api::{app, open_store, AppConfig, AppState};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pessoas_api=info")),
        )
        .init();

    let config = AppConfig::from_env()?;
    let store = open_store(&config).await.map_err(|e| {
        tracing::error!(error = %e, "store initialization failed; not serving");
        e
    })?;
    let router = app(AppState::new(store), config.body_limit);

    let listener = TcpListener::bind(config.listen_addr()).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
