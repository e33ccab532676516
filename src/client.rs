//! Convenience layer: build a statement, resolve the database file, run it.

use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use crate::builder::Builder;
use crate::config::SqliteConfig;
use crate::engine::SqliteEngine;
use crate::error::{Error, Result};
use crate::executor::{Done, Executor, SqlExecutor};
use crate::value::{Record, Row};

/// SQLite client with an optional cached default database path.
///
/// Every method taking `path: Option<&Path>` uses the explicit path when
/// given and the cached one otherwise.
pub struct SqliteClient<X = Executor> {
    config: SqliteConfig,
    builder: Builder,
    executor: X,
    cached_path: RwLock<Option<PathBuf>>,
}

impl SqliteClient<Executor> {
    /// Create a client backed by `rusqlite`, seeding the cached path from
    /// `config.db_path`.
    pub fn from_config(config: SqliteConfig) -> Self {
        let engine = SqliteEngine::new(Duration::from_millis(config.busy_timeout_ms));
        Self::with_executor(config, Executor::new(engine))
    }
}

impl Default for SqliteClient<Executor> {
    fn default() -> Self {
        Self::from_config(SqliteConfig::default())
    }
}

impl<X: SqlExecutor> SqliteClient<X> {
    pub fn with_executor(config: SqliteConfig, executor: X) -> Self {
        Self {
            builder: Builder::new(config.build_options()),
            cached_path: RwLock::new(config.db_path.clone()),
            config,
            executor,
        }
    }

    pub fn config(&self) -> &SqliteConfig {
        &self.config
    }

    pub fn builder(&self) -> &Builder {
        &self.builder
    }

    /// Set the default database path, replacing any previous one.
    pub fn cache_db_path(&self, path: impl Into<PathBuf>) {
        let path = path.into();
        tracing::debug!(path = %path.display(), "caching default database path");
        *self
            .cached_path
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(path);
    }

    pub fn cached_db_path(&self) -> Option<PathBuf> {
        self.cached_path
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn resolve_path(&self, path: Option<&Path>) -> Result<PathBuf> {
        match path {
            Some(p) if !p.as_os_str().is_empty() => Ok(p.to_path_buf()),
            _ => self.cached_db_path().ok_or(Error::NoDatabasePath),
        }
    }

    fn check_filter(
        &self,
        table: &str,
        filter: Option<&Record>,
        operation: &'static str,
    ) -> Result<()> {
        let unfiltered = filter.map_or(true, Record::is_empty);
        if unfiltered && !self.config.allow_unfiltered_mutations {
            return Err(Error::UnfilteredMutation {
                table: table.to_string(),
                operation,
            });
        }
        Ok(())
    }

    pub async fn execute_query(&self, sql: &str, path: Option<&Path>) -> Result<Vec<Row>> {
        let path = self.resolve_path(path)?;
        self.executor.execute_query(&path, sql).await
    }

    pub async fn execute(&self, sql: &str, path: Option<&Path>) -> Result<Done> {
        let path = self.resolve_path(path)?;
        self.executor.execute(&path, sql).await
    }

    pub async fn execute_batch(&self, statements: &[String], path: Option<&Path>) -> Result<Done> {
        let path = self.resolve_path(path)?;
        self.executor.execute_batch(&path, statements).await
    }

    pub async fn execute_insert(
        &self,
        table: &str,
        body: &Record,
        path: Option<&Path>,
    ) -> Result<Done> {
        let sql = self.builder.build_insert(table, body)?;
        self.execute(&sql, path).await
    }

    /// Fails with [`Error::UnfilteredMutation`] when `filter` is absent or
    /// empty, unless the config allows it.
    pub async fn execute_update(
        &self,
        table: &str,
        set: &Record,
        filter: Option<&Record>,
        path: Option<&Path>,
    ) -> Result<Done> {
        self.check_filter(table, filter, "update")?;
        let sql = self.builder.build_update(table, set, filter)?;
        self.execute(&sql, path).await
    }

    pub async fn execute_delete(
        &self,
        table: &str,
        filter: Option<&Record>,
        path: Option<&Path>,
    ) -> Result<Done> {
        self.check_filter(table, filter, "delete")?;
        let sql = self.builder.build_delete(table, filter);
        self.execute(&sql, path).await
    }

    pub async fn execute_select(
        &self,
        table: &str,
        filter: Option<&Record>,
        path: Option<&Path>,
    ) -> Result<Vec<Row>> {
        let sql = self.builder.build_select(table, filter);
        self.execute_query(&sql, path).await
    }

    /// Whether at least one row matches `filter`.
    ///
    /// Any failure, including a missing table or database, reads as `false`.
    pub async fn record_exists(
        &self,
        table: &str,
        filter: Option<&Record>,
        path: Option<&Path>,
    ) -> bool {
        match self.execute_select(table, filter, path).await {
            Ok(rows) => !rows.is_empty(),
            Err(e) => {
                tracing::debug!(table, error = %e, "record lookup failed, treating as absent");
                false
            }
        }
    }
}
