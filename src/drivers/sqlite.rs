use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use rusqlite::types::{Value, ValueRef};
use rusqlite::{params_from_iter, Connection};

use crate::error::{ExamPrepError, Result};
use crate::traits::DatabaseDriver;
use crate::types::{ExecutionResult, SqlValue};

/// Embedded single-file driver built on rusqlite.
///
/// rusqlite is blocking, so every statement runs on tokio's blocking pool while
/// holding the connection lock.
pub struct SqliteDriver {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteDriver {
    /// Open (or create) a database file. Foreign keys are enforced.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|e| {
            tracing::error!(path = %path.display(), error = %e, "Error opening SQLite database");
            ExamPrepError::ConnectionFailed(e.to_string())
        })?;
        tracing::info!(path = %path.display(), "Connected to SQLite database");
        Self::from_connection(conn)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| ExamPrepError::ConnectionFailed(e.to_string()))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON")
            .map_err(|e| ExamPrepError::ConnectionFailed(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    async fn with_connection<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = conn.lock();
            f(&conn)
        })
        .await
        .map_err(|e| ExamPrepError::QueryFailed(format!("SQLite worker failed: {}", e)))?
    }
}

/// True when the statement's leading keyword is `select`, ignoring case and
/// leading whitespace.
pub fn is_read_statement(sql: &str) -> bool {
    sql.trim_start()
        .get(..6)
        .is_some_and(|head| head.eq_ignore_ascii_case("select"))
}

#[async_trait]
impl DatabaseDriver for SqliteDriver {
    async fn execute(&self, sql: &str, params: &[SqlValue]) -> Result<ExecutionResult> {
        let sql = sql.to_string();
        let values: Vec<Value> = params.iter().map(to_sqlite_value).collect();

        self.with_connection(move |conn| {
            if is_read_statement(&sql) {
                read_all(conn, &sql, values)
            } else {
                write(conn, &sql, values)
            }
        })
        .await
    }

    async fn test_connection(&self) -> bool {
        let outcome = self
            .with_connection(|conn| {
                conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
                    .map_err(query_failed)
            })
            .await;
        match outcome {
            Ok(_) => {
                tracing::info!("SQLite connection test successful");
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "SQLite connection test failed");
                false
            }
        }
    }
}

fn query_failed(e: rusqlite::Error) -> ExamPrepError {
    ExamPrepError::QueryFailed(e.to_string())
}

fn read_all(conn: &Connection, sql: &str, values: Vec<Value>) -> Result<ExecutionResult> {
    let mut stmt = conn.prepare(sql).map_err(query_failed)?;
    let columns: Vec<String> = stmt
        .column_names()
        .into_iter()
        .map(String::from)
        .collect();

    let mut rows = stmt.query(params_from_iter(values)).map_err(query_failed)?;
    let mut result_rows = Vec::new();
    while let Some(row) = rows.next().map_err(query_failed)? {
        let mut row_values = Vec::with_capacity(columns.len());
        for idx in 0..columns.len() {
            let value = row.get_ref(idx).map_err(query_failed)?;
            row_values.push(from_sqlite_value(value));
        }
        result_rows.push(row_values);
    }

    Ok(ExecutionResult::from_rows(columns, result_rows))
}

/// Run a write and synthesize its result from the last inserted rowid and the
/// change count. Rows the statement may return (`RETURNING`) are drained.
fn write(conn: &Connection, sql: &str, values: Vec<Value>) -> Result<ExecutionResult> {
    let mut stmt = conn.prepare(sql).map_err(query_failed)?;
    let mut rows = stmt.query(params_from_iter(values)).map_err(query_failed)?;
    while rows.next().map_err(query_failed)?.is_some() {}
    drop(rows);

    Ok(ExecutionResult::from_write(
        conn.last_insert_rowid(),
        conn.changes() as u64,
    ))
}

fn to_sqlite_value(value: &SqlValue) -> Value {
    match value {
        SqlValue::Null => Value::Null,
        SqlValue::Text(s) => Value::Text(s.clone()),
        SqlValue::Int32(i) => Value::Integer(i64::from(*i)),
        SqlValue::Int64(i) => Value::Integer(*i),
        SqlValue::Float(f) => Value::Real(*f),
        SqlValue::Bool(b) => Value::Integer(i64::from(*b)),
    }
}

fn from_sqlite_value(value: ValueRef<'_>) -> SqlValue {
    match value {
        ValueRef::Null => SqlValue::Null,
        ValueRef::Integer(i) => SqlValue::Int64(i),
        ValueRef::Real(f) => SqlValue::Float(f),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            SqlValue::Text(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_read_statement() {
        assert!(is_read_statement("SELECT 1"));
        assert!(is_read_statement("\n   select * from exams"));
        assert!(!is_read_statement("INSERT INTO exams (name) VALUES (?)"));
        assert!(!is_read_statement("  update videos SET views = views + 1"));
        assert!(!is_read_statement("sel"));
        assert!(!is_read_statement(""));
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let driver = SqliteDriver::open_in_memory().unwrap();
        driver
            .execute(
                "CREATE TABLE exams (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL, code TEXT UNIQUE)",
                &[],
            )
            .await
            .unwrap();

        let inserted = driver
            .execute(
                "INSERT INTO exams (name, code) VALUES (?, ?)",
                &[SqlValue::from("JEE Main"), SqlValue::from("JEE")],
            )
            .await
            .unwrap();
        assert_eq!(inserted.inserted_id(), Some(1));
        assert_eq!(inserted.affected(), 1);

        let read = driver
            .execute("SELECT id, name, code FROM exams WHERE code = ?", &[SqlValue::from("JEE")])
            .await
            .unwrap();
        let row = read.single_row().unwrap();
        assert_eq!(row.get("id").unwrap(), &SqlValue::Int64(1));
        assert_eq!(row.get("name").unwrap().as_str(), Some("JEE Main"));
    }

    #[tokio::test]
    async fn test_constraint_violation_keeps_engine_message() {
        let driver = SqliteDriver::open_in_memory().unwrap();
        driver
            .execute("CREATE TABLE users (email TEXT UNIQUE)", &[])
            .await
            .unwrap();
        driver
            .execute("INSERT INTO users (email) VALUES (?)", &[SqlValue::from("a@b.c")])
            .await
            .unwrap();
        let err = driver
            .execute("INSERT INTO users (email) VALUES (?)", &[SqlValue::from("a@b.c")])
            .await
            .unwrap_err();
        match err {
            ExamPrepError::QueryFailed(message) => {
                assert!(message.contains("UNIQUE constraint failed: users.email"), "{message}")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_connection_check() {
        let driver = SqliteDriver::open_in_memory().unwrap();
        assert!(driver.test_connection().await);
    }
}
