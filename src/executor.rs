//! Runs SQL text against a freshly opened connection.
//!
//! Each call opens its own connection on tokio's blocking pool and drops it
//! when done; connections are never shared between calls.

use async_trait::async_trait;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::engine::{Engine, EngineConnection, SqliteEngine};
use crate::error::Result;
use crate::value::Row;

/// Success marker for statements that return no rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Done {}

/// Async execution surface the client is written against.
#[async_trait]
pub trait SqlExecutor: Send + Sync {
    /// Run a row-returning statement.
    async fn execute_query(&self, path: &Path, sql: &str) -> Result<Vec<Row>>;

    /// Run a statement that returns no rows.
    async fn execute(&self, path: &Path, sql: &str) -> Result<Done>;

    /// Run `statements` inside one transaction, rolling back on failure.
    async fn execute_batch(&self, path: &Path, statements: &[String]) -> Result<Done>;
}

/// [`SqlExecutor`] over any [`Engine`].
#[derive(Debug, Clone)]
pub struct Executor<E = SqliteEngine> {
    engine: Arc<E>,
}

impl<E: Engine> Executor<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }

    async fn with_connection<T, F>(&self, path: &Path, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&E::Connection) -> Result<T> + Send + 'static,
    {
        let engine = Arc::clone(&self.engine);
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || {
            let conn = engine.open(&path)?;
            f(&conn)
        })
        .await?
    }
}

impl Default for Executor<SqliteEngine> {
    fn default() -> Self {
        Self::new(SqliteEngine::default())
    }
}

#[async_trait]
impl<E: Engine> SqlExecutor for Executor<E> {
    async fn execute_query(&self, path: &Path, sql: &str) -> Result<Vec<Row>> {
        let sql = sql.to_string();
        self.with_connection(path, move |conn| {
            tracing::debug!(sql = %sql, "executing sql");
            conn.all(&sql)
        })
        .await
    }

    async fn execute(&self, path: &Path, sql: &str) -> Result<Done> {
        let sql = sql.to_string();
        self.with_connection(path, move |conn| {
            tracing::debug!(sql = %sql, "executing sql");
            let affected = conn.run(&sql)?;
            tracing::trace!(affected, "statement complete");
            Ok(Done {})
        })
        .await
    }

    async fn execute_batch(&self, path: &Path, statements: &[String]) -> Result<Done> {
        let statements = statements.to_vec();
        let db = PathBuf::from(path);
        self.with_connection(path, move |conn| {
            run_batch(conn, &statements).inspect_err(|e| {
                tracing::warn!(path = %db.display(), error = %e, "batch rolled back");
            })?;
            Ok(Done {})
        })
        .await
    }
}

/// BEGIN, the joined body, then COMMIT or ROLLBACK, all on `conn`.
///
/// The body's error is returned even if the rollback itself fails.
pub(crate) fn run_batch<C: EngineConnection>(conn: &C, statements: &[String]) -> Result<()> {
    tracing::debug!(sql = "BEGIN", "executing sql");
    conn.exec("BEGIN")?;

    let body = statements.join("; ");
    tracing::debug!(sql = %body, "executing sql");
    match conn.exec(&body) {
        Ok(()) => {
            tracing::debug!(sql = "COMMIT", "executing sql");
            conn.exec("COMMIT")
        }
        Err(e) => {
            tracing::debug!(sql = "ROLLBACK", "executing sql");
            if let Err(rollback) = conn.exec("ROLLBACK") {
                tracing::error!(error = %rollback, "rollback failed");
            }
            Err(e)
        }
    }
}
