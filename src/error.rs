use serde::{Deserialize, Serialize};
use std::fmt;

/// Structured error codes surfaced to the embedding shell.
/// These let the UI distinguish between error types and decide whether to
/// show a validation hint, offer a retry, or treat the failure as fatal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RosterErrorCode {
    /// Input validation failed (empty name, unknown clan id, etc.)
    ValidationFailed,
    /// Lookup by id found no matching row
    NotFound,
    /// The underlying store failed to open or execute a statement
    DatabaseError,
    /// Schema migration failed (store left at its prior version)
    MigrationFailed,
    /// Remote roster service unreachable or returned an error status
    NetworkError,
    /// Internal error (unexpected condition)
    Internal,
}

impl fmt::Display for RosterErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RosterErrorCode::ValidationFailed => write!(f, "validation_failed"),
            RosterErrorCode::NotFound => write!(f, "not_found"),
            RosterErrorCode::DatabaseError => write!(f, "database_error"),
            RosterErrorCode::MigrationFailed => write!(f, "migration_failed"),
            RosterErrorCode::NetworkError => write!(f, "network_error"),
            RosterErrorCode::Internal => write!(f, "internal"),
        }
    }
}

/// Structured error with code, message, and optional details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterError {
    /// Error code for programmatic handling
    pub code: RosterErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional context (offending field, endpoint path, etc.)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl RosterError {
    pub fn new(code: RosterErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Attach additional context (e.g. a field name or request path) to an error.
    pub fn with_details(
        code: RosterErrorCode,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            details: Some(details.into()),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(RosterErrorCode::ValidationFailed, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(RosterErrorCode::NotFound, message)
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::new(RosterErrorCode::DatabaseError, message)
    }

    pub fn migration_failed(message: impl Into<String>) -> Self {
        Self::new(RosterErrorCode::MigrationFailed, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(RosterErrorCode::NetworkError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(RosterErrorCode::Internal, message)
    }
}

impl fmt::Display for RosterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for RosterError {}

impl From<std::io::Error> for RosterError {
    fn from(err: std::io::Error) -> Self {
        let code = match err.kind() {
            std::io::ErrorKind::NotFound => RosterErrorCode::NotFound,
            _ => RosterErrorCode::DatabaseError,
        };
        RosterError::new(code, err.to_string())
    }
}

impl From<sea_orm::DbErr> for RosterError {
    fn from(err: sea_orm::DbErr) -> Self {
        match err {
            sea_orm::DbErr::RecordNotFound(msg) => RosterError::not_found(msg),
            other => RosterError::database(other.to_string()),
        }
    }
}

impl From<reqwest::Error> for RosterError {
    fn from(err: reqwest::Error) -> Self {
        RosterError::network(err.to_string())
    }
}

/// Result type alias for roster operations
pub type RosterResult<T> = std::result::Result<T, RosterError>;
