//! The embedded database engine boundary.
//!
//! The executor only needs four things from the engine: open a file, run a
//! statement, run a query, and run a multi-statement script. A connection
//! belongs to exactly one blocking task for its whole life, so everything
//! issued on it runs strictly in order.

use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use std::time::Duration;

use crate::error::Result;
use crate::value::{Record, Row};

/// Opens connections to a database file.
pub trait Engine: Send + Sync + 'static {
    type Connection: EngineConnection;

    fn open(&self, path: &Path) -> Result<Self::Connection>;
}

/// Statement primitives on one open connection.
pub trait EngineConnection {
    /// Execute a statement that returns no rows; yields the affected row count.
    fn run(&self, sql: &str) -> Result<usize>;

    /// Execute a statement and collect every row it returns.
    fn all(&self, sql: &str) -> Result<Vec<Row>>;

    /// Execute zero or more `;`-separated statements.
    fn exec(&self, sql: &str) -> Result<()>;
}

/// [`Engine`] backed by `rusqlite`.
#[derive(Debug, Clone)]
pub struct SqliteEngine {
    busy_timeout: Duration,
}

impl Default for SqliteEngine {
    fn default() -> Self {
        Self::new(Duration::from_millis(5_000))
    }
}

impl SqliteEngine {
    pub fn new(busy_timeout: Duration) -> Self {
        Self { busy_timeout }
    }
}

impl Engine for SqliteEngine {
    type Connection = Connection;

    fn open(&self, path: &Path) -> Result<Connection> {
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(path, flags)?;
        conn.busy_timeout(self.busy_timeout)?;
        Ok(conn)
    }
}

impl EngineConnection for Connection {
    fn run(&self, sql: &str) -> Result<usize> {
        // Rows produced by the statement (PRAGMA, select) are stepped and discarded.
        {
            let mut stmt = self.prepare(sql)?;
            let mut rows = stmt.query([])?;
            while rows.next()?.is_some() {}
        }
        Ok(usize::try_from(self.changes()).unwrap_or(usize::MAX))
    }

    fn all(&self, sql: &str) -> Result<Vec<Row>> {
        let mut stmt = self.prepare(sql)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        let rows = stmt.query_map([], |row| {
            let mut record = Record::new();
            for (idx, name) in columns.iter().enumerate() {
                record.insert(name, row.get_ref(idx)?);
            }
            Ok(record)
        })?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    fn exec(&self, sql: &str) -> Result<()> {
        Ok(self.execute_batch(sql)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn all_maps_columns_in_select_order() {
        let dir = tempfile::tempdir().unwrap();
        let conn = SqliteEngine::default().open(&dir.path().join("t.db")).unwrap();
        conn.exec(
            "create table t (b text, a integer, c real, d blob);
             insert into t values ('x', 2, 1.5, null)",
        )
        .unwrap();

        let rows = conn.all("select * from t").unwrap();
        assert_eq!(rows.len(), 1);
        let cols: Vec<&str> = rows[0].columns().collect();
        assert_eq!(cols, vec!["b", "a", "c", "d"]);
        assert_eq!(rows[0].get("a"), Some(&Value::Integer(2)));
        assert_eq!(rows[0].get("c"), Some(&Value::Real(1.5)));
        assert_eq!(rows[0].get("d"), Some(&Value::Null));
    }

    #[test]
    fn run_reports_affected_rows() {
        let dir = tempfile::tempdir().unwrap();
        let conn = SqliteEngine::default().open(&dir.path().join("t.db")).unwrap();
        conn.exec("create table t (a integer); insert into t values (1); insert into t values (2)")
            .unwrap();
        assert_eq!(conn.run("update t set a = 5").unwrap(), 2);
    }

    #[test]
    fn run_ignores_returned_rows() {
        let dir = tempfile::tempdir().unwrap();
        let conn = SqliteEngine::default().open(&dir.path().join("t.db")).unwrap();
        conn.run("PRAGMA journal_mode = WAL").unwrap();
        conn.run("select 1").unwrap();

        let mode = conn.all("PRAGMA journal_mode").unwrap();
        assert_eq!(mode[0].get("journal_mode"), Some(&Value::Text("wal".into())));
    }

    #[test]
    fn run_surfaces_engine_errors() {
        let dir = tempfile::tempdir().unwrap();
        let conn = SqliteEngine::default().open(&dir.path().join("t.db")).unwrap();
        assert!(conn.run("insert into missing values (1)").is_err());
    }
}
