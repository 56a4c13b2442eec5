use thiserror::Error;

/// Errors raised by the room-finding core. Each is scoped to a single request.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("unparseable time {value:?}")]
    UnparseableTime { value: String },
    #[error("unknown building {0:?}")]
    UnknownBuilding(String),
}
