//! # Request-Scoped Sessions
//!
//! One unit of work per request. [`with_session`] hands the caller a
//! transaction, commits when the caller's operation succeeds, and rolls
//! back (then re-raises the original fault) when it fails. The pooled
//! connection is released on every exit path: commit and rollback both
//! consume the transaction, and dropping it mid-fault rolls back too.
//!
//! Sessions are never shared across requests; concurrent callers check out
//! distinct connections from the pool.

use crate::error::Result;
use crate::model::store::DbPool;
use futures_util::future::BoxFuture;
use sqlx::{Sqlite, Transaction};

/// One unit-of-work scope against the store.
pub type Session = Transaction<'static, Sqlite>;

/// Run `op` inside a request-scoped session.
///
/// Exactly one of commit or rollback runs before the connection is
/// released. A rollback failure is logged but does not mask the caller's
/// fault.
///
/// # Example
///
/// ```rust,no_run
/// use lib_core::{with_session, DbPool, Result};
///
/// async fn touch(pool: &DbPool) -> Result<()> {
///     with_session(pool, |session| {
///         Box::pin(async move {
///             sqlx::query("UPDATE drafts SET seen = 1")
///                 .execute(&mut **session)
///                 .await?;
///             Ok(())
///         })
///     })
///     .await
/// }
/// ```
pub async fn with_session<T, F>(pool: &DbPool, op: F) -> Result<T>
where
    F: for<'s> FnOnce(&'s mut Session) -> BoxFuture<'s, Result<T>>,
{
    let mut session = pool.begin().await?;

    match op(&mut session).await {
        Ok(value) => {
            session.commit().await?;
            Ok(value)
        }
        Err(fault) => {
            if let Err(rollback_err) = session.rollback().await {
                tracing::error!(error = %rollback_err, "session rollback failed");
            }
            Err(fault)
        }
    }
}
