//! examprep - storage and API plumbing for an exam-preparation portal
//!
//! Statements are written once, SQLite style, and run on either SQLite or
//! PostgreSQL. The API client talks to the portal's HTTP routes and survives
//! being pointed at the wrong local server.
//!
//! # Example
//! ```ignore
//! use examprep::schema::Videos;
//! use examprep::{Database, SqlValue, Table, WhereClause};
//!
//! let db = Database::from_env().await?;
//!
//! // Raw statements use `?` placeholders on every engine
//! let inserted = db
//!     .execute(
//!         "INSERT INTO exams (name, code) VALUES (?, ?)",
//!         &[SqlValue::from("Union Public Service Commission"), SqlValue::from("UPSC")],
//!     )
//!     .await?;
//! let id = inserted.inserted_id();
//!
//! // Or build them
//! let videos = db
//!     .querier()
//!     .select()
//!     .columns(&[&Videos::columns().id, &Videos::columns().title])
//!     .from(Videos)
//!     .where_(WhereClause::eq(&Videos::columns().category, "Polity"))
//!     .execute()
//!     .await?
//!     .rows_json();
//! ```

pub mod api;
pub mod builders;
pub mod clauses;
pub mod config;
pub mod dialect;
pub mod drivers;
pub mod error;
pub mod logging;
pub mod querier;
pub mod schema;
pub mod traits;
pub mod types;

mod database;

// Re-export main types for convenient access
pub use api::{ApiClient, RequestOptions};
pub use clauses::WhereClause;
pub use config::{ClientConfig, DatabaseConfig, EngineKind};
pub use database::Database;
pub use dialect::{Dialect, Normalizer};
pub use error::{ExamPrepError, Result};
pub use querier::Querier;
pub use traits::{Column, ColumnRef, DatabaseDriver, Table};
pub use types::{ExecutionResult, Row, SqlValue};
