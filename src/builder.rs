//! SQL statement builder.
//!
//! Turns a table name plus [`Record`] data into SQL text. Nothing here does
//! I/O. Values are interpolated as quoted literals without escaping, so a
//! value must never contain a single quote; table and column names are
//! emitted as given.
//!
//! ```
//! use sqlite_query::{build_insert, Record};
//!
//! let body = Record::new().with_value("name", "Ann").with_value("age", 30);
//! let sql = build_insert("users", &body).unwrap();
//! assert_eq!(sql, "insert into users (name,age) values ('Ann','30')");
//! ```

use crate::error::{Error, Result};
use crate::value::{Record, Value};

/// Flags that alter generated SQL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Render null filters as `col is null` instead of `col = null`.
    ///
    /// `col = null` never matches a row in SQLite, so filters on null only
    /// work with this flag set.
    pub null_safe_where: bool,
}

/// Statement builder carrying [`BuildOptions`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Builder {
    options: BuildOptions,
}

impl Builder {
    pub fn new(options: BuildOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> BuildOptions {
        self.options
    }

    /// `insert into <table> (<cols>) values (<vals>)`.
    ///
    /// Falsy values (`0`, `''`, `false`, empty blobs) are written as `null`
    /// along with explicit nulls.
    pub fn build_insert(&self, table: &str, body: &Record) -> Result<String> {
        if body.is_empty() {
            return Err(Error::empty_record(table));
        }

        let columns: Vec<&str> = body.columns().collect();
        let values: Vec<String> = body
            .iter()
            .map(|(_, v)| {
                if v.is_falsy() {
                    "null".to_string()
                } else {
                    v.to_sql_literal()
                }
            })
            .collect();

        Ok(format!(
            "insert into {} ({}) values ({})",
            table,
            columns.join(","),
            values.join(",")
        ))
    }

    /// `update <table> set <col> = <val>, ...` followed by the where clause.
    pub fn build_update(
        &self,
        table: &str,
        set: &Record,
        filter: Option<&Record>,
    ) -> Result<String> {
        if set.is_empty() {
            return Err(Error::empty_record(table));
        }

        let assignments: Vec<String> = set
            .iter()
            .map(|(col, v)| format!("{} = {}", col, v.to_sql_literal()))
            .collect();

        Ok(format!(
            "update {} set {}{}",
            table,
            assignments.join(", "),
            self.build_where_clause(filter)
        ))
    }

    pub fn build_delete(&self, table: &str, filter: Option<&Record>) -> String {
        format!("delete from {}{}", table, self.build_where_clause(filter))
    }

    pub fn build_select(&self, table: &str, filter: Option<&Record>) -> String {
        format!("select * from {}{}", table, self.build_where_clause(filter))
    }

    /// ` where a = 'x' and b = 'y'`, or an empty string when there is
    /// nothing to filter on.
    pub fn build_where_clause(&self, filter: Option<&Record>) -> String {
        let Some(filter) = filter.filter(|f| !f.is_empty()) else {
            return String::new();
        };

        let predicates: Vec<String> = filter
            .iter()
            .map(|(col, v)| match v {
                Value::Null if self.options.null_safe_where => format!("{col} is null"),
                _ => format!("{} = {}", col, v.to_sql_literal()),
            })
            .collect();

        format!(" where {}", predicates.join(" and "))
    }
}

pub fn build_insert(table: &str, body: &Record) -> Result<String> {
    Builder::default().build_insert(table, body)
}

pub fn build_update(table: &str, set: &Record, filter: Option<&Record>) -> Result<String> {
    Builder::default().build_update(table, set, filter)
}

pub fn build_delete(table: &str, filter: Option<&Record>) -> String {
    Builder::default().build_delete(table, filter)
}

pub fn build_select(table: &str, filter: Option<&Record>) -> String {
    Builder::default().build_select(table, filter)
}

pub fn build_where_clause(filter: Option<&Record>) -> String {
    Builder::default().build_where_clause(filter)
}
