//! # Database Store
//!
//! Connection pool creation and startup connectivity verification.
//!
//! The pool is the one process-wide shared resource: created once at
//! startup, validated once, then borrowed per request. Schema is owned by
//! an external migration tool; this code never creates or alters tables.

// region: --- Modules
pub mod session;

pub use session::{with_session, Session};
// endregion: --- Modules

use crate::config::DatabaseSettings;
use anyhow::Context;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::time::Duration;

/// Type alias for the application connection pool.
pub type DbPool = SqlitePool;

/// Baseline number of pooled connections.
const POOL_SIZE: u32 = 10;

/// Additional connections allowed under load. Beyond `POOL_SIZE +
/// POOL_OVERFLOW`, session acquisition suspends until a connection returns.
const POOL_OVERFLOW: u32 = 20;

/// Upper bound on waiting for a pooled connection. The source system left
/// this unbounded; 30s keeps a saturated pool from wedging requests forever.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

/// Create the application connection pool.
///
/// Idle connections are liveness-checked before reuse, so a connection
/// dropped by the server is replaced instead of handed to a session.
pub async fn create_pool(settings: &DatabaseSettings) -> anyhow::Result<DbPool> {
    let options = settings
        .url
        .parse::<SqliteConnectOptions>()
        .with_context(|| format!("invalid DATABASE_URL: {}", settings.url))?
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(POOL_SIZE + POOL_OVERFLOW)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .test_before_acquire(true)
        .connect_with(options)
        .await
        .context("failed to open database pool")?;

    Ok(pool)
}

/// Startup verification: confirm the store is reachable.
///
/// Fatal on failure; the caller aborts startup rather than retrying.
pub async fn check_connectivity(pool: &DbPool) -> anyhow::Result<()> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .context("database unreachable at startup")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseSettings;

    fn memory_settings() -> DatabaseSettings {
        DatabaseSettings {
            url: "sqlite::memory:".to_string(),
            host: "db".to_string(),
            port: 3306,
            database: "email_agent".to_string(),
            user: "agent_user".to_string(),
            password: String::new(),
            root_password: String::new(),
        }
    }

    #[tokio::test]
    async fn create_pool_and_verify_connectivity() {
        let pool = create_pool(&memory_settings()).await.expect("pool");
        check_connectivity(&pool).await.expect("store reachable");
    }

    #[tokio::test]
    async fn create_pool_rejects_malformed_url() {
        let mut settings = memory_settings();
        settings.url = "not a database url".to_string();
        let err = create_pool(&settings).await.unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }
}
