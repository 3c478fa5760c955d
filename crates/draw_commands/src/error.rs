use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DrawError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("service error: {0}")]
    ServiceError(String),

    #[error("malformed command: {0}")]
    MalformedCommand(String),

    #[error("insufficient arguments for {operation}: expected at least {expected}, got {got}")]
    InsufficientArguments {
        operation: String,
        expected: usize,
        got: usize,
    },

    #[error("parse error: {0}")]
    ParseError(String),

    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("io error: {0}")]
    Io(String),
}
