//! Unified error types for all layers of the application.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug, Display};
use thiserror::Error;

/// The backend an `Unavailable` error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// The durable record store.
    Store,
    /// The side cache.
    Cache,
}

impl Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Store => write!(f, "store"),
            Self::Cache => write!(f, "cache"),
        }
    }
}

/// Error classification, independent of any operation context attached to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    InvalidInput,
    Validation,
    Unavailable(Backend),
    Timeout,
    Configuration,
    Internal,
}

/// Unified error type for Roster.
#[derive(Error, Debug)]
pub enum RosterError {
    // ============ Domain Errors ============
    /// No record at the given identity.
    #[error("Resource not found: {resource_type} with id {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// Uniqueness violation (duplicate username or email).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Malformed input that reached the store.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Request validation failure raised before the store is reached.
    #[error("Validation error: {0}")]
    Validation(String),

    // ============ Infrastructure Errors ============
    /// Transport or connection failure talking to a backend.
    #[error("{backend} unavailable: {message}")]
    Unavailable { backend: Backend, message: String },

    /// A deadline elapsed before the backend answered.
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    // ============ Internal Errors ============
    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// An error annotated with the operation and identity it failed for.
    #[error("{operation} failed for {target}: {source}")]
    Context {
        operation: &'static str,
        target: String,
        #[source]
        source: Box<RosterError>,
    },

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RosterError {
    /// Returns the classification of this error, looking through context wrappers.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Unavailable { backend, .. } => ErrorKind::Unavailable(*backend),
            Self::Timeout(_) => ErrorKind::Timeout,
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::Internal(_) | Self::Other(_) => ErrorKind::Internal,
            Self::Context { source, .. } => source.kind(),
        }
    }

    /// Returns the innermost error beneath any context wrappers.
    #[must_use]
    pub fn root(&self) -> &Self {
        match self {
            Self::Context { source, .. } => source.root(),
            other => other,
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::NotFound => 404,
            ErrorKind::InvalidInput | ErrorKind::Validation => 400,
            ErrorKind::Conflict => 409,
            ErrorKind::Unavailable(_) | ErrorKind::Timeout => 503,
            ErrorKind::Configuration | ErrorKind::Internal => 500,
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self.kind() {
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Conflict => "CONFLICT",
            ErrorKind::InvalidInput => "INVALID_INPUT",
            ErrorKind::Validation => "VALIDATION_ERROR",
            ErrorKind::Unavailable(Backend::Store) => "STORE_UNAVAILABLE",
            ErrorKind::Unavailable(Backend::Cache) => "CACHE_UNAVAILABLE",
            ErrorKind::Timeout => "TIMEOUT",
            ErrorKind::Configuration => "CONFIGURATION_ERROR",
            ErrorKind::Internal => "INTERNAL_ERROR",
        }
    }

    /// Creates a not found error for a resource.
    #[must_use]
    pub fn not_found<T: ToString>(resource_type: &'static str, id: T) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// Creates a conflict error.
    #[must_use]
    pub fn conflict<T: Into<String>>(message: T) -> Self {
        Self::Conflict(message.into())
    }

    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input<T: Into<String>>(message: T) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a store unavailability error.
    #[must_use]
    pub fn store_unavailable<T: Into<String>>(message: T) -> Self {
        Self::Unavailable {
            backend: Backend::Store,
            message: message.into(),
        }
    }

    /// Creates a cache unavailability error.
    #[must_use]
    pub fn cache_unavailable<T: Into<String>>(message: T) -> Self {
        Self::Unavailable {
            backend: Backend::Cache,
            message: message.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }

    /// Wraps this error with the operation and target it failed for.
    #[must_use]
    pub fn context(self, operation: &'static str, target: impl Display) -> Self {
        Self::Context {
            operation,
            target: target.to_string(),
            source: Box::new(self),
        }
    }

    /// Checks if this error is a missing record.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// Checks if this error is a uniqueness conflict.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        self.kind() == ErrorKind::Conflict
    }

    /// Checks if this error is retriable by the caller.
    #[must_use]
    pub fn is_retriable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Unavailable(_) | ErrorKind::Timeout)
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for RosterError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => Self::NotFound {
                resource_type: "database_row",
                id: "unknown".to_string(),
            },
            sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
                // unique_violation
                Some("23505") => Self::Conflict(db_err.message().to_string()),
                // not_null_violation, check_violation, string_data_right_truncation,
                // invalid_text_representation
                Some("23502" | "23514" | "22001" | "22P02") => {
                    Self::InvalidInput(db_err.message().to_string())
                }
                // query_canceled (statement_timeout)
                Some("57014") => Self::Timeout(db_err.message().to_string()),
                _ => Self::Internal(format!("Database error: {}", err)),
            },
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::WorkerCrashed => Self::store_unavailable(err.to_string()),
            _ => Self::Internal(format!("Database error: {}", err)),
        }
    }
}

impl From<serde_json::Error> for RosterError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON serialization error: {}", err))
    }
}

/// Serializable error response for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional field-level errors for validation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
    /// Request ID for correlating with server logs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// Field-level validation error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldError {
    /// Field name
    pub field: String,
    /// Error message
    pub message: String,
    /// Error code
    pub code: String,
}

impl ErrorResponse {
    /// Creates a new error response from a `RosterError`.
    #[must_use]
    pub fn from_error(error: &RosterError) -> Self {
        Self {
            code: error.error_code().to_string(),
            message: error.to_string(),
            details: None,
            request_id: None,
        }
    }

    /// Sets the request ID.
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Sets field-level validation errors.
    #[must_use]
    pub fn with_details(mut self, details: Vec<FieldError>) -> Self {
        self.details = Some(details);
        self
    }
}

impl From<&RosterError> for ErrorResponse {
    fn from(error: &RosterError) -> Self {
        Self::from_error(error)
    }
}
