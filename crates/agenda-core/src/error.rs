//! Error types for the visit agenda library.

use std::path::PathBuf;

use thiserror::Error;
use uuid::Uuid;

/// Comprehensive error type for all agenda operations.
#[derive(Error, Debug)]
pub enum AgendaError {
    /// An agenda was requested without any selected client
    #[error("Select at least one client before generating the agenda")]
    NoClientsSelected,
    /// A submission was requested for an empty plan
    #[error("There are no planned visits to submit")]
    NoVisits,
    /// The gateway base URL could not be parsed
    #[error("Invalid visit service URL: {url}")]
    InvalidUrl { url: String },
    /// The remote service answered with something that is not HTTP
    #[error("Invalid response from the visit service")]
    InvalidResponse,
    /// The remote service answered with a non-2xx status
    #[error("{message}")]
    ServerError { status: u16, message: String },
    /// Location permission is denied or restricted
    #[error("Location permission denied")]
    LocationDenied,
    /// No location fix could be obtained
    #[error("Location unavailable: {reason}")]
    LocationUnavailable { reason: String },
    /// Remote payloads could not be decoded
    #[error("Could not decode visit service response: {source}")]
    Decoding {
        #[source]
        source: serde_json::Error,
    },
    /// Transport level failures
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// Visit not found in the current plan
    #[error("Visit {id} not found in the current plan")]
    VisitNotFound { id: Uuid },
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// Database connection or query errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Local serialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
}

/// Builder for creating database errors with optional context.
pub struct DatabaseErrorBuilder {
    message: String,
}

impl DatabaseErrorBuilder {
    /// Create a new database error builder with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error with the given source.
    pub fn with_source(self, source: rusqlite::Error) -> AgendaError {
        AgendaError::Database {
            message: self.message,
            source,
        }
    }
}

/// Builder for creating input validation errors.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    /// Create a new invalid input error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> AgendaError {
        AgendaError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl AgendaError {
    /// Creates a builder for database errors.
    pub fn database(message: impl Into<String>) -> DatabaseErrorBuilder {
        DatabaseErrorBuilder::new(message)
    }

    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Whether the error was raised by local validation, before any state
    /// change or remote call happened.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AgendaError::NoClientsSelected
                | AgendaError::NoVisits
                | AgendaError::InvalidInput { .. }
                | AgendaError::VisitNotFound { .. }
        )
    }

    /// Whether the error came from the remote visit service or the transport
    /// in front of it.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            AgendaError::InvalidUrl { .. }
                | AgendaError::InvalidResponse
                | AgendaError::ServerError { .. }
                | AgendaError::Decoding { .. }
                | AgendaError::Network(_)
        )
    }
}

/// Specialized extension trait for database-related Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| AgendaError::database(message).with_source(e))
    }
}

/// Result type alias for agenda operations
pub type Result<T> = std::result::Result<T, AgendaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_displays_body_text() {
        let err = AgendaError::ServerError {
            status: 422,
            message: "client 10 is inactive".to_string(),
        };
        assert_eq!(err.to_string(), "client 10 is inactive");
        assert!(err.is_remote());
        assert!(!err.is_validation());
    }

    #[test]
    fn test_validation_classification() {
        assert!(AgendaError::NoClientsSelected.is_validation());
        assert!(AgendaError::NoVisits.is_validation());
        assert!(AgendaError::invalid_input("to_index")
            .with_reason("out of range")
            .is_validation());
        assert!(!AgendaError::LocationDenied.is_validation());
        assert!(!AgendaError::LocationDenied.is_remote());
    }

    #[test]
    fn test_invalid_input_builder() {
        let err = AgendaError::invalid_input("offsets").with_reason("offset 7 out of range");
        assert_eq!(
            err.to_string(),
            "Invalid input for field 'offsets': offset 7 out of range"
        );
    }
}
