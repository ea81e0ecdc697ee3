use thiserror::Error;

/// Error type for examprep operations
#[derive(Debug, Error)]
pub enum ExamPrepError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// The database engine rejected a statement. The engine's message is kept intact.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Statement has {expected} placeholder(s) but {actual} parameter(s) were supplied")]
    ParameterCountMismatch { expected: usize, actual: usize },

    #[error("Expected {expected} row(s), got {actual}")]
    UnexpectedRowCount { expected: usize, actual: usize },

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// Terminal API failure. Carries the application-supplied error text when the
    /// server sent one, otherwise the HTTP status line or the transport error.
    #[error("{0}")]
    RequestFailed(String),

    #[error("Token storage error: {0}")]
    TokenStore(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type alias for examprep operations
pub type Result<T> = std::result::Result<T, ExamPrepError>;
