//! SQL building and execution helpers over an embedded SQLite file.
//!
//! # Intention
//!
//! - Build insert/update/delete/select statements from plain key/value data.
//! - Run raw SQL, row-returning queries, and transactional batches against a
//!   database file, with an optional cached default path.
//!
//! # Architectural Boundaries
//!
//! - [`builder`] is pure string construction; no I/O.
//! - [`engine`] is the only place that talks to `rusqlite`.
//! - [`executor`] opens one connection per call and runs it on the blocking pool.
//! - [`client`] glues the two together.
//!
//! Generated SQL interpolates values as unescaped literals. Inputs must come
//! from trusted callers and must not contain single quotes.

pub mod builder;
pub mod client;
pub mod config;
pub mod engine;
pub mod envelope;
pub mod error;
pub mod executor;
pub mod value;

pub use builder::{
    build_delete, build_insert, build_select, build_update, build_where_clause, BuildOptions,
    Builder,
};
pub use client::SqliteClient;
pub use config::{load_config, ConfigError, SqliteConfig};
pub use engine::{Engine, EngineConnection, SqliteEngine};
pub use envelope::{Envelope, EnvelopeData, IntoEnvelope, Status};
pub use error::{Error, Result};
pub use executor::{Done, Executor, SqlExecutor};
pub use value::{Record, Row, Value};
