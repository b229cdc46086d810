//! PostgreSQL pool setup and schema migrations

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;

use crate::{
    config::DatabaseConfig,
    error::{Error, Result},
};

/// Connect to PostgreSQL, retrying with exponential backoff, then apply
/// the embedded migrations if `run_migrations` is set.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool> {
    let pool = create_pool_with_retries(config, config.max_retries).await?;

    if config.run_migrations {
        run_migrations(&pool).await?;
    }

    Ok(pool)
}

/// Apply the migrations under `migrations/`
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Database migrations applied");
    Ok(())
}

async fn create_pool_with_retries(config: &DatabaseConfig, max_retries: u32) -> Result<PgPool> {
    let mut attempt = 0;
    let base_delay = Duration::from_secs(config.retry_delay_secs);

    loop {
        match try_create_pool(config).await {
            Ok(pool) => {
                tracing::info!(
                    attempts = attempt + 1,
                    max_connections = config.max_connections,
                    min_connections = config.min_connections,
                    "Database connection pool created"
                );
                return Ok(pool);
            }
            Err(e) => {
                attempt += 1;

                if attempt > max_retries {
                    tracing::error!(
                        "Failed to connect to database after {} attempts: {}",
                        max_retries + 1,
                        e
                    );
                    return Err(e);
                }

                let delay = backoff_delay(base_delay, attempt);
                tracing::warn!(
                    "Database connection attempt {} failed: {}. Retrying in {:?}...",
                    attempt,
                    e,
                    delay
                );

                tokio::time::sleep(delay).await;
            }
        }
    }
}

/// `base * 2^(attempt - 1)`, saturating
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    let multiplier = 2_u32.saturating_pow(attempt.saturating_sub(1));
    base.saturating_mul(multiplier)
}

async fn try_create_pool(config: &DatabaseConfig) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connection_timeout_secs))
        .connect(&config.url)
        .await
        .map_err(|e| {
            Error::Database(format!(
                "cannot connect to '{}' ({}): {}",
                sanitize_connection_url(&config.url),
                categorize_db_error(&e),
                e
            ))
        })
}

/// Mask the password in a connection URL for logging
fn sanitize_connection_url(url: &str) -> String {
    let (Some(scheme_end), Some(at_pos)) = (url.find("://"), url.rfind('@')) else {
        return url.to_string();
    };
    let userinfo_start = scheme_end + 3;
    if at_pos < userinfo_start {
        return url.to_string();
    }

    match url[userinfo_start..at_pos].find(':') {
        Some(colon) => format!(
            "{}:***{}",
            &url[..userinfo_start + colon],
            &url[at_pos..]
        ),
        None => url.to_string(),
    }
}

fn categorize_db_error(err: &sqlx::Error) -> &'static str {
    use sqlx::Error;
    match err {
        Error::Configuration(_) => "configuration error",
        Error::Database(_) => "database rejected the connection",
        Error::Io(_) => "network I/O error",
        Error::Tls(_) => "TLS error",
        Error::PoolTimedOut => "pool timed out",
        Error::PoolClosed => "pool closed",
        _ => "connection error",
    }
}
