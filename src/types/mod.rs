mod row;
mod sql_value;

pub use row::{ExecutionResult, Row, INSERTED_ID_COLUMN};
pub use sql_value::SqlValue;
