//! Error types for CauseMap

use thiserror::Error;

use crate::types::EventId;

/// Result type alias for CauseMap operations
pub type Result<T> = std::result::Result<T, CauseMapError>;

/// Main error type for CauseMap
#[derive(Error, Debug)]
pub enum CauseMapError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Category registry error: {0}")]
    Registry(String),

    #[error("Event not found: {0}")]
    NotFound(EventId),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CauseMapError {
    /// HTTP status code used when the error crosses the network boundary
    pub fn status_code(&self) -> u16 {
        match self {
            CauseMapError::InvalidInput(_) => 400,
            CauseMapError::NotFound(_) => 404,
            _ => 500,
        }
    }
}
