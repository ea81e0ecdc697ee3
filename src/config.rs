//! Runtime configuration resolved once at startup.
//!
//! Both configs read plain environment variables. `from_lookup` takes any
//! `name -> value` function so tests can supply variables without touching the
//! process environment.

use std::env;
use std::path::PathBuf;

use crate::api::address::{normalize_base, PRIMARY_LOCAL_ADDRESS};
use crate::dialect::Dialect;
use crate::error::{ExamPrepError, Result};

/// Default SQLite database file, relative to the working directory.
pub const DEFAULT_SQLITE_PATH: &str = "database.sqlite";

/// The database engine selected for this process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineKind {
    /// Embedded single-file engine.
    Sqlite { path: PathBuf },
    /// Client-server engine reached through a connection string.
    Postgres { url: String },
}

impl EngineKind {
    /// The SQL dialect statements must be rewritten into for this engine.
    pub fn dialect(&self) -> Dialect {
        match self {
            EngineKind::Sqlite { .. } => Dialect::Sqlite,
            EngineKind::Postgres { .. } => Dialect::Postgres,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub engine: EngineKind,
}

impl DatabaseConfig {
    /// Resolve the engine from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Resolve the engine from an arbitrary variable lookup.
    ///
    /// `DB_TYPE=postgresql` or a non-empty `DATABASE_URL` selects PostgreSQL;
    /// anything else selects SQLite at `SQLITE_PATH` (default `database.sqlite`).
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_type = lookup("DB_TYPE").unwrap_or_default();
        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
        let wants_postgres = db_type.eq_ignore_ascii_case("postgresql");

        let engine = match database_url {
            Some(url) => EngineKind::Postgres { url },
            None if wants_postgres => {
                return Err(ExamPrepError::Config(
                    "DB_TYPE=postgresql requires DATABASE_URL".to_string(),
                ))
            }
            None => EngineKind::Sqlite {
                path: lookup("SQLITE_PATH")
                    .filter(|p| !p.trim().is_empty())
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_SQLITE_PATH)),
            },
        };

        Ok(Self { engine })
    }
}

/// Where the API client runs and which API address it should start from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Origin the client was loaded from, e.g. `http://localhost:5501` or `file://`.
    pub origin: String,
    /// Explicit API base address that wins over everything else.
    pub base_override: Option<String>,
}

impl ClientConfig {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            base_override: None,
        }
    }

    pub fn with_base_override(mut self, base: impl Into<String>) -> Self {
        self.base_override = Some(base.into());
        self
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Reads `EXAMPREP_ORIGIN` (default `file://`) and `API_BASE_URL`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            origin: lookup("EXAMPREP_ORIGIN").unwrap_or_else(|| "file://".to_string()),
            base_override: lookup("API_BASE_URL").filter(|b| !b.trim().is_empty()),
        }
    }

    /// True when the client was opened from the local filesystem.
    pub fn is_file_origin(&self) -> bool {
        self.origin.starts_with("file:")
    }

    /// The initial base address: the override, else the primary local server for
    /// file access, else `<origin>/api`.
    pub fn base_address(&self) -> String {
        let base = match &self.base_override {
            Some(base) => base.clone(),
            None if self.is_file_origin() => PRIMARY_LOCAL_ADDRESS.to_string(),
            None => format!("{}/api", self.origin.trim_end_matches('/')),
        };
        normalize_base(&base)
    }
}
