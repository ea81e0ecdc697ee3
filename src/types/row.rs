use serde_json::{Map, Value as JsonValue};

use crate::{
    error::{ExamPrepError, Result},
    types::SqlValue,
    Column,
};

/// Column name of the synthetic row returned for writes on the embedded engine.
pub const INSERTED_ID_COLUMN: &str = "id";

/// A single result row. Columns keep the order and names the engine reported.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Vec<String>,
    values: Vec<SqlValue>,
}

impl Row {
    /// Creates a new Row from column names and values in the same order.
    pub fn new(columns: Vec<String>, values: Vec<SqlValue>) -> Self {
        Self { columns, values }
    }

    /// Gets a value by column name. A named column with no value is not found.
    pub fn get(&self, name: &str) -> Result<&SqlValue> {
        self.columns
            .iter()
            .position(|c| c == name)
            .and_then(|i| self.values.get(i))
            .ok_or_else(|| ExamPrepError::ColumnNotFound(name.to_string()))
    }

    /// Gets a value by typed column.
    pub fn get_column<T: Column + ?Sized>(&self, column: &T) -> Result<&SqlValue> {
        self.get(column.column_name())
            .map_err(|_| ExamPrepError::ColumnNotFound(column.qualified_name()))
    }

    /// Returns all column names in this row.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    /// Returns the number of columns in this row.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if this row has no columns.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The row as a JSON object keyed by column name.
    pub fn to_json(&self) -> JsonValue {
        let object: Map<String, JsonValue> = self
            .columns
            .iter()
            .zip(self.values.iter())
            .map(|(col, val)| (col.clone(), val.to_json()))
            .collect();
        JsonValue::Object(object)
    }
}

/// Uniform result of executing one statement, whichever engine ran it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExecutionResult {
    rows: Vec<Row>,
    affected: u64,
}

impl ExecutionResult {
    pub fn new(rows: Vec<Row>, affected: u64) -> Self {
        Self { rows, affected }
    }

    /// Result of a read. `affected` is the number of rows returned.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<SqlValue>>) -> Self {
        let rows: Vec<Row> = rows
            .into_iter()
            .map(|values| Row::new(columns.clone(), values))
            .collect();
        let affected = rows.len() as u64;
        Self { rows, affected }
    }

    /// Result of a write that reports a generated identifier.
    pub fn from_write(last_insert_id: i64, affected: u64) -> Self {
        let row = Row::new(
            vec![INSERTED_ID_COLUMN.to_string()],
            vec![SqlValue::Int64(last_insert_id)],
        );
        Self {
            rows: vec![row],
            affected,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Rows written or read by the statement.
    pub fn affected(&self) -> u64 {
        self.affected
    }

    /// The `id` column of the first row, if any.
    pub fn inserted_id(&self) -> Option<i64> {
        self.rows
            .first()
            .and_then(|row| row.get(INSERTED_ID_COLUMN).ok())
            .and_then(SqlValue::as_i64)
    }

    /// Extracts a single row from the result.
    /// Returns an error if the result contains zero or more than one row.
    pub fn single_row(self) -> Result<Row> {
        if self.rows.len() != 1 {
            return Err(ExamPrepError::UnexpectedRowCount {
                expected: 1,
                actual: self.rows.len(),
            });
        }
        self.rows
            .into_iter()
            .next()
            .ok_or(ExamPrepError::UnexpectedRowCount {
                expected: 1,
                actual: 0,
            })
    }

    /// Returns all rows from the result.
    pub fn rows(self) -> Vec<Row> {
        self.rows
    }

    /// Returns a reference to the rows without consuming the result.
    pub fn rows_ref(&self) -> &[Row] {
        &self.rows
    }

    /// All rows as a JSON array of objects.
    pub fn rows_json(&self) -> JsonValue {
        JsonValue::Array(self.rows.iter().map(Row::to_json).collect())
    }

    /// Returns the number of rows in this result.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if this result contains no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
