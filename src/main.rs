//! Server: waits for PostgreSQL, ensures the contacts table, then serves the API.

use contacts_api::{app, connect, AppState, PgContactStore, Settings};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("contacts_api=info")),
        )
        .init();

    let settings = Arc::new(Settings::from_env()?);
    let pool = connect(&settings).await?;
    let state = AppState::new(Arc::new(PgContactStore::new(pool)), settings.clone());

    let listener = TcpListener::bind(("0.0.0.0", settings.api_port)).await?;
    tracing::info!(
        project = %settings.project_name,
        prefix = %settings.api_prefix,
        "listening on {}",
        listener.local_addr()?
    );
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
