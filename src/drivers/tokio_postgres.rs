use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use tokio_postgres::{types::ToSql, types::Type, Client, NoTls};

use crate::error::{ExamPrepError, Result};
use crate::traits::DatabaseDriver;
use crate::types::{ExecutionResult, SqlValue};

type Param = Box<dyn ToSql + Sync + Send>;

/// PostgreSQL driver implementation using tokio-postgres.
pub struct TokioPostgresDriver {
    client: Client,
}

impl TokioPostgresDriver {
    /// Connect to a PostgreSQL database.
    pub async fn connect(connection_string: &str) -> Result<Self> {
        let (client, connection) = tokio_postgres::connect(connection_string, NoTls)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Database connection failed");
                ExamPrepError::ConnectionFailed(e.to_string())
            })?;

        // Spawn the connection handler
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!(error = %e, "PostgreSQL connection error");
            }
        });

        tracing::info!("Connected to PostgreSQL database");
        Ok(Self { client })
    }
}

#[async_trait]
impl DatabaseDriver for TokioPostgresDriver {
    async fn execute(&self, sql: &str, params: &[SqlValue]) -> Result<ExecutionResult> {
        let statement = self.client.prepare(sql).await.map_err(query_failed)?;

        // Bind against the parameter types the server inferred, so `"42"` can feed
        // an integer column and `7` a text one, the way untyped parameters would.
        let converted: Vec<Param> = params
            .iter()
            .enumerate()
            .map(|(i, v)| to_sql_param(i + 1, v, statement.params().get(i)))
            .collect::<Result<_>>()?;

        let param_refs: Vec<&(dyn ToSql + Sync)> = converted
            .iter()
            .map(|b| b.as_ref() as &(dyn ToSql + Sync))
            .collect();

        if statement.columns().is_empty() {
            let affected = self
                .client
                .execute(&statement, &param_refs)
                .await
                .map_err(query_failed)?;
            return Ok(ExecutionResult::new(Vec::new(), affected));
        }

        let rows = self
            .client
            .query(&statement, &param_refs)
            .await
            .map_err(query_failed)?;

        let columns: Vec<String> = statement
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect();

        let result_rows = rows
            .iter()
            .map(pg_row_values)
            .collect::<Result<Vec<_>>>()?;

        Ok(ExecutionResult::from_rows(columns, result_rows))
    }

    async fn test_connection(&self) -> bool {
        match self.client.simple_query("SELECT NOW()").await {
            Ok(_) => {
                tracing::info!("Connected to PostgreSQL database");
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "Database connection failed");
                false
            }
        }
    }
}

/// Keep the server's own message for database errors.
fn query_failed(e: tokio_postgres::Error) -> ExamPrepError {
    let message = match e.as_db_error() {
        Some(db) => db.message().to_string(),
        None => e.to_string(),
    };
    ExamPrepError::QueryFailed(message)
}

fn invalid_param(index: usize, value: &SqlValue, ty: &Type) -> ExamPrepError {
    ExamPrepError::QueryFailed(format!(
        "invalid input for parameter ${} of type {}: {:?}",
        index,
        ty.name(),
        value
    ))
}

/// Convert a SqlValue to a boxed parameter accepted by the expected type.
/// Without a type hint the value's own type is used.
fn to_sql_param(index: usize, value: &SqlValue, ty: Option<&Type>) -> Result<Param> {
    let Some(ty) = ty else {
        return Ok(natural_param(value));
    };
    let invalid = || invalid_param(index, value, ty);

    let param: Param = match value {
        SqlValue::Null => typed_null(ty),
        SqlValue::Bool(b) => match *ty {
            Type::BOOL => Box::new(*b),
            Type::INT2 => Box::new(i16::from(*b)),
            Type::INT4 => Box::new(i32::from(*b)),
            Type::INT8 => Box::new(i64::from(*b)),
            Type::NUMERIC => Box::new(Decimal::from(u8::from(*b))),
            Type::TEXT | Type::VARCHAR | Type::BPCHAR => Box::new(b.to_string()),
            _ => Box::new(*b),
        },
        SqlValue::Int32(_) | SqlValue::Int64(_) => {
            let i = value.as_i64().ok_or_else(invalid)?;
            match *ty {
                Type::INT2 => Box::new(i16::try_from(i).map_err(|_| invalid())?),
                Type::INT4 => Box::new(i32::try_from(i).map_err(|_| invalid())?),
                Type::INT8 => Box::new(i),
                Type::FLOAT4 => Box::new(i as f32),
                Type::FLOAT8 => Box::new(i as f64),
                Type::BOOL => Box::new(i != 0),
                Type::NUMERIC => Box::new(Decimal::from(i)),
                Type::TEXT | Type::VARCHAR | Type::BPCHAR => Box::new(i.to_string()),
                _ => natural_param(value),
            }
        }
        SqlValue::Float(f) => match *ty {
            Type::FLOAT4 => Box::new(*f as f32),
            Type::NUMERIC => Box::new(Decimal::from_f64(*f).ok_or_else(invalid)?),
            Type::TEXT | Type::VARCHAR | Type::BPCHAR => Box::new(f.to_string()),
            _ => Box::new(*f),
        },
        SqlValue::Text(s) => {
            let trimmed = s.trim();
            match *ty {
                Type::INT2 => Box::new(trimmed.parse::<i16>().map_err(|_| invalid())?),
                Type::INT4 => Box::new(trimmed.parse::<i32>().map_err(|_| invalid())?),
                Type::INT8 => Box::new(trimmed.parse::<i64>().map_err(|_| invalid())?),
                Type::FLOAT4 => Box::new(trimmed.parse::<f32>().map_err(|_| invalid())?),
                Type::FLOAT8 => Box::new(trimmed.parse::<f64>().map_err(|_| invalid())?),
                Type::BOOL => Box::new(parse_bool(trimmed).ok_or_else(invalid)?),
                Type::NUMERIC => Box::new(parse_decimal(trimmed).ok_or_else(invalid)?),
                Type::DATE => Box::new(
                    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| invalid())?,
                ),
                Type::TIMESTAMP => Box::new(parse_timestamp(trimmed).ok_or_else(invalid)?),
                Type::TIMESTAMPTZ => Box::new(parse_timestamptz(trimmed).ok_or_else(invalid)?),
                _ => Box::new(s.clone()),
            }
        }
    };
    Ok(param)
}

fn natural_param(value: &SqlValue) -> Param {
    match value {
        SqlValue::Null => Box::new(None::<String>),
        SqlValue::Text(s) => Box::new(s.clone()),
        SqlValue::Int32(i) => Box::new(*i),
        SqlValue::Int64(i) => Box::new(*i),
        SqlValue::Float(f) => Box::new(*f),
        SqlValue::Bool(b) => Box::new(*b),
    }
}

/// tokio-postgres type-checks NULLs too, so pick an Option of a matching type.
fn typed_null(ty: &Type) -> Param {
    match *ty {
        Type::BOOL => Box::new(None::<bool>),
        Type::INT2 => Box::new(None::<i16>),
        Type::INT4 => Box::new(None::<i32>),
        Type::INT8 => Box::new(None::<i64>),
        Type::FLOAT4 => Box::new(None::<f32>),
        Type::FLOAT8 => Box::new(None::<f64>),
        Type::NUMERIC => Box::new(None::<Decimal>),
        Type::DATE => Box::new(None::<NaiveDate>),
        Type::TIMESTAMP => Box::new(None::<NaiveDateTime>),
        Type::TIMESTAMPTZ => Box::new(None::<DateTime<Utc>>),
        _ => Box::new(None::<String>),
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "t" | "1" | "yes" => Some(true),
        "false" | "f" | "0" | "no" => Some(false),
        _ => None,
    }
}

/// Plain or scientific notation, e.g. `18.52` or `1.852e1`.
fn parse_decimal(s: &str) -> Option<Decimal> {
    s.parse::<Decimal>()
        .ok()
        .or_else(|| Decimal::from_scientific(s).ok())
}

/// Whole NUMERIC values come back as integers, like SQLite's SUM of integers;
/// fractional ones as floats, like its AVG. Values too large for either keep
/// their exact text.
fn numeric_value(d: Decimal) -> SqlValue {
    let d = d.normalize();
    let converted = if d.scale() == 0 {
        d.to_i64().map(SqlValue::Int64)
    } else {
        d.to_f64().map(SqlValue::Float)
    };
    converted.unwrap_or_else(|| SqlValue::Text(d.to_string()))
}

fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| parse_timestamptz(s).map(|dt| dt.naive_utc()))
}

fn parse_timestamptz(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|naive| naive.and_utc())
        })
}

/// Decode every column of a row by its reported type.
fn pg_row_values(row: &tokio_postgres::Row) -> Result<Vec<SqlValue>> {
    let mut values = Vec::with_capacity(row.columns().len());
    for (idx, col) in row.columns().iter().enumerate() {
        let decoded = match *col.type_() {
            Type::BOOL => row
                .try_get::<_, Option<bool>>(idx)
                .map(|v| v.map(SqlValue::Bool)),
            Type::INT2 => row
                .try_get::<_, Option<i16>>(idx)
                .map(|v| v.map(|i| SqlValue::Int32(i32::from(i)))),
            Type::INT4 => row
                .try_get::<_, Option<i32>>(idx)
                .map(|v| v.map(SqlValue::Int32)),
            Type::INT8 => row
                .try_get::<_, Option<i64>>(idx)
                .map(|v| v.map(SqlValue::Int64)),
            Type::FLOAT4 => row
                .try_get::<_, Option<f32>>(idx)
                .map(|v| v.map(|f| SqlValue::Float(f64::from(f)))),
            Type::FLOAT8 => row
                .try_get::<_, Option<f64>>(idx)
                .map(|v| v.map(SqlValue::Float)),
            Type::NUMERIC => row
                .try_get::<_, Option<Decimal>>(idx)
                .map(|v| v.map(numeric_value)),
            // Same text shape SQLite's datetime() produces.
            Type::TIMESTAMP => row
                .try_get::<_, Option<NaiveDateTime>>(idx)
                .map(|v| v.map(|ts| SqlValue::Text(ts.format("%Y-%m-%d %H:%M:%S").to_string()))),
            Type::TIMESTAMPTZ => row
                .try_get::<_, Option<DateTime<Utc>>>(idx)
                .map(|v| v.map(|ts| SqlValue::Text(ts.to_rfc3339()))),
            Type::DATE => row
                .try_get::<_, Option<NaiveDate>>(idx)
                .map(|v| v.map(|d| SqlValue::Text(d.to_string()))),
            _ => row
                .try_get::<_, Option<String>>(idx)
                .map(|v| v.map(SqlValue::Text)),
        }
        .map_err(|e| {
            ExamPrepError::QueryFailed(format!(
                "cannot decode column {} of type {}: {}",
                col.name(),
                col.type_().name(),
                e
            ))
        })?;
        values.push(decoded.unwrap_or(SqlValue::Null));
    }
    Ok(values)
}
