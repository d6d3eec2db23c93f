//! Unified application error types for the vault server.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the `?` operator. Callers branch only on
//! [`ErrorKind`]; messages are informational.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// Malformed identifier or missing required blob/nonce field.
    Validation,
    /// The caller could not be authenticated.
    Authentication,
    /// The resource is absent, soft-deleted, or the caller holds no grant.
    NotFound,
    /// A scoped mutation affected zero rows; missing and forbidden are not
    /// distinguished.
    NotFoundOrDenied,
    /// The caller's access level is insufficient for the operation.
    AccessDenied,
    /// A grant already exists for the (resource, user) pair.
    KeyConflict,
    /// Creating a resource and its owner grant failed; nothing was committed.
    CreateFailed,
    /// An atomic unit could not begin or commit, or was aborted by the store.
    TransactionFailure,
    /// A database error occurred outside an atomic unit.
    Database,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An internal server error occurred.
    Internal,
}

impl ErrorKind {
    /// Return the machine-readable code for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "VALIDATION_ERROR",
            Self::Authentication => "UNAUTHORIZED",
            Self::NotFound => "NOT_FOUND",
            Self::NotFoundOrDenied => "NOT_FOUND_OR_DENIED",
            Self::AccessDenied => "ACCESS_DENIED",
            Self::KeyConflict => "KEY_CONFLICT",
            Self::CreateFailed => "CREATE_FAILED",
            Self::TransactionFailure => "TRANSACTION_FAILURE",
            Self::Database => "DATABASE",
            Self::Configuration => "CONFIGURATION",
            Self::Serialization => "SERIALIZATION",
            Self::Internal => "INTERNAL",
        }
    }

    /// Whether errors of this kind are server faults whose message must not
    /// reach the caller.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::CreateFailed
                | Self::TransactionFailure
                | Self::Database
                | Self::Configuration
                | Self::Serialization
                | Self::Internal
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The unified application error used throughout the vault server.
///
/// All crate-specific errors are mapped into `AppError` using `From` impls
/// or explicit `.map_err()` calls.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Re-tag this error with a different kind, prefixing the message with
    /// operation context and keeping the original as the source.
    pub fn context(self, kind: ErrorKind, message: impl Into<String>) -> Self {
        let message = format!("{}: {}", message.into(), self.message);
        Self::with_source(kind, message, self)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authentication, message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a not-found-or-denied error.
    pub fn not_found_or_denied(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFoundOrDenied, message)
    }

    /// Create an access-denied error.
    pub fn access_denied(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AccessDenied, message)
    }

    /// Create a key-conflict error.
    pub fn key_conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::KeyConflict, message)
    }

    /// Create a transaction-failure error.
    pub fn transaction_failure(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TransactionFailure, message)
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Whether this error has the given kind.
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Internal, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
