mod sqlite;
mod tokio_postgres;

pub use self::in_memory_test::{InMemoryTestDriver, InMemoryTestResponseBuilder, RecordedQuery};
pub use self::sqlite::{is_read_statement, SqliteDriver};
pub use self::tokio_postgres::TokioPostgresDriver;
