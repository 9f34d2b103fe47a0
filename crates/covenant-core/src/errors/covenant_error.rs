use std::time::Duration;

use super::ErrorKind;

/// Top-level error type for the contract analysis core.
/// Every subsystem error ultimately reports one of the §7 kinds via `kind()`.
#[derive(Debug, thiserror::Error)]
pub enum CovenantError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("transient failure: {0}")]
    Transient(String),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("integrity error: {0}")]
    Integrity(String),

    #[error("fatal error: {0}")]
    Fatal(String),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("config error: {0}")]
    ConfigError(String),
}

pub type CovenantResult<T> = Result<T, CovenantError>;

impl CovenantError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CovenantError::InvalidInput(_) => ErrorKind::InvalidInput,
            CovenantError::NotFound(_) => ErrorKind::NotFound,
            CovenantError::Transient(_) => ErrorKind::Transient,
            CovenantError::Timeout(_) => ErrorKind::Timeout,
            CovenantError::ServiceUnavailable(_) => ErrorKind::ServiceUnavailable,
            CovenantError::Integrity(_) => ErrorKind::Integrity,
            CovenantError::Fatal(_) | CovenantError::ConfigError(_) => ErrorKind::Fatal,
            CovenantError::SerializationError(_) => ErrorKind::Integrity,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }
}
