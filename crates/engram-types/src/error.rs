//! Shared error types for the Engram system.

use thiserror::Error;

/// Top-level error type for the Engram system.
#[derive(Error, Debug)]
pub enum EngramError {
    /// A persisted collection could not be written back to disk.
    #[error("Storage error: {0}")]
    Storage(String),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A configuration error occurred.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An LLM driver error occurred.
    #[error("LLM driver error: {0}")]
    LlmDriver(String),

    /// A user command could not be parsed.
    #[error("Command parse error: {0}")]
    CommandParse(String),

    /// The named procedure does not exist in procedural memory.
    #[error("Procedure not found: {0}")]
    ProcedureNotFound(String),

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Alias for Result with EngramError.
pub type EngramResult<T> = Result<T, EngramError>;
