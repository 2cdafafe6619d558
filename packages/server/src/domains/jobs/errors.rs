use std::time::Duration;

use thiserror::Error;

use crate::kernel::StoreError;

/// Failures of job post operations
#[derive(Error, Debug)]
pub enum JobsError {
    /// Bad input, including ids that name no stored job post
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl JobsError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        JobsError::InvalidArgument(message.into())
    }

    /// Short, stable label for logs
    pub fn kind(&self) -> &'static str {
        match self {
            JobsError::InvalidArgument(_) => "invalid_argument",
            JobsError::UnsupportedOperation(_) => "unsupported_operation",
            JobsError::Timeout(_) => "timeout",
            JobsError::Store(StoreError::Conflict { .. }) => "conflict",
            JobsError::Store(_) => "storage",
            JobsError::Serialization(_) => "serialization",
            JobsError::Internal(_) => "internal",
        }
    }
}
