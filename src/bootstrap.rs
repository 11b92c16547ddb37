//! Startup: wait until PostgreSQL accepts connections, then prepare the pool and table.

use crate::config::Settings;
use crate::error::AppError;
use crate::store::{ensure_contacts_table, ensure_database_exists};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{ConnectOptions, Connection, PgPool};
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// Call `probe` until it succeeds, sleeping `delay` between failures.
/// Returns the number of attempts made. `max_attempts: None` retries forever.
pub async fn wait_until_ready<F, Fut, E>(
    mut probe: F,
    delay: Duration,
    max_attempts: Option<u32>,
) -> Result<u32, AppError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), E>>,
    E: Display,
{
    let mut attempt: u32 = 0;
    loop {
        attempt += 1;
        match probe().await {
            Ok(()) => return Ok(attempt),
            Err(e) => {
                if max_attempts.is_some_and(|max| attempt >= max) {
                    return Err(AppError::Unavailable(format!(
                        "database not ready after {} attempts: {}",
                        attempt, e
                    )));
                }
                tracing::warn!(attempt, error = %e, "database is not ready, retrying in {:?}", delay);
                tokio::time::sleep(delay).await;
            }
        }
    }
}

/// Block until the configured PostgreSQL server accepts a connection.
pub async fn wait_for_database(settings: &Settings) -> Result<(), AppError> {
    let options = settings.probe_options()?;
    tracing::info!(
        host = %options.get_host(),
        port = options.get_port(),
        "waiting for database"
    );
    let attempts = wait_until_ready(
        || probe(options.clone()),
        settings.db_retry_delay,
        settings.db_max_attempts,
    )
    .await?;
    tracing::info!(attempts, "database is ready");
    Ok(())
}

async fn probe(options: PgConnectOptions) -> Result<(), sqlx::Error> {
    let conn = options.connect().await?;
    conn.close().await
}

/// Wait for the server, create the database if allowed, open the pool, and create the table.
pub async fn connect(settings: &Settings) -> Result<PgPool, AppError> {
    wait_for_database(settings).await?;
    let options = settings.connect_options()?;
    if settings.db_create_if_missing {
        ensure_database_exists(&options).await?;
    }
    let pool = PgPoolOptions::new()
        .max_connections(settings.db_max_connections)
        .connect_with(options)
        .await?;
    ensure_contacts_table(&pool).await?;
    Ok(pool)
}
