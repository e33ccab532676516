//! Client configuration loading from file and environment variables.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::builder::BuildOptions;

/// SQLite client configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SqliteConfig {
    /// Default database file, used when a call passes no path.
    pub db_path: Option<PathBuf>,

    /// Busy timeout applied to every opened connection, in milliseconds.
    pub busy_timeout_ms: u64,

    /// Render null filters as `is null`.
    pub null_safe_where: bool,

    /// Permit update/delete statements without a where filter.
    pub allow_unfiltered_mutations: bool,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            busy_timeout_ms: 5_000,
            null_safe_where: false,
            allow_unfiltered_mutations: false,
        }
    }
}

impl SqliteConfig {
    /// Create a config with a default database path
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: Some(db_path.into()),
            ..Self::default()
        }
    }

    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            null_safe_where: self.null_safe_where,
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Loads configuration from a TOML file, falling back to defaults.
///
/// Environment variable overrides:
/// - `SQLITE_QUERY_DB_PATH` overrides `db_path`
/// - `SQLITE_QUERY_BUSY_TIMEOUT_MS` overrides `busy_timeout_ms`
/// - `SQLITE_QUERY_NULL_SAFE_WHERE` overrides `null_safe_where` ("true"/"1")
/// - `SQLITE_QUERY_ALLOW_UNFILTERED` overrides `allow_unfiltered_mutations` ("true"/"1")
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&Path>) -> Result<SqliteConfig, ConfigError> {
    let config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %p.display(), "config file not found, using defaults");
                SqliteConfig::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => SqliteConfig::default(),
    };

    Ok(apply_overrides(config, |key| std::env::var(key).ok()))
}

fn apply_overrides(mut config: SqliteConfig, var: impl Fn(&str) -> Option<String>) -> SqliteConfig {
    if let Some(db_path) = var("SQLITE_QUERY_DB_PATH") {
        config.db_path = Some(PathBuf::from(db_path));
    }
    if let Some(timeout) = var("SQLITE_QUERY_BUSY_TIMEOUT_MS") {
        if let Ok(parsed) = timeout.parse() {
            config.busy_timeout_ms = parsed;
        }
    }
    if let Some(flag) = var("SQLITE_QUERY_NULL_SAFE_WHERE") {
        config.null_safe_where = is_truthy(&flag);
    }
    if let Some(flag) = var("SQLITE_QUERY_ALLOW_UNFILTERED") {
        config.allow_unfiltered_mutations = is_truthy(&flag);
    }
    config
}

fn is_truthy(flag: &str) -> bool {
    flag == "true" || flag == "1"
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn parses_partial_toml() {
        let config: SqliteConfig = toml::from_str(
            r#"
            db_path = "/tmp/app.db"
            null_safe_where = true
            "#,
        )
        .unwrap();
        assert_eq!(config.db_path, Some(PathBuf::from("/tmp/app.db")));
        assert!(config.null_safe_where);
        assert_eq!(config.busy_timeout_ms, 5_000);
        assert!(!config.allow_unfiltered_mutations);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.busy_timeout_ms, SqliteConfig::default().busy_timeout_ms);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "busy_timeout_ms = \"soon\"").unwrap();
        let err = load_config(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn env_overrides_win() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("SQLITE_QUERY_DB_PATH", "/var/data.db"),
            ("SQLITE_QUERY_BUSY_TIMEOUT_MS", "250"),
            ("SQLITE_QUERY_ALLOW_UNFILTERED", "1"),
        ]);
        let config = apply_overrides(SqliteConfig::default(), |k| {
            env.get(k).map(|v| v.to_string())
        });
        assert_eq!(config.db_path, Some(PathBuf::from("/var/data.db")));
        assert_eq!(config.busy_timeout_ms, 250);
        assert!(config.allow_unfiltered_mutations);
        assert!(!config.null_safe_where);
    }
}
