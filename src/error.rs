//! Error taxonomy shared by the persistence layer, the factory, and the
//! strategies. The UI is the only place that turns these into user-facing
//! text; everything below it propagates with `?`.

use rusqlite::{Error as SqlError, ErrorCode};
use thiserror::Error;

/// Result alias used across the library.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Input rejected before it reached storage. Nothing was written.
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// SQLite refused the statement because of a UNIQUE, FOREIGN KEY, or CHECK
    /// constraint.
    #[error("{operation} violates a constraint: {source}")]
    Constraint {
        operation: &'static str,
        #[source]
        source: SqlError,
    },

    /// Any other SQLite failure.
    #[error("{operation} failed: {source}")]
    Storage {
        operation: &'static str,
        #[source]
        source: SqlError,
    },

    #[error("database is not connected")]
    NotConnected,

    /// A persisted row could not be mapped back onto a domain value.
    #[error("invalid persisted data: {0}")]
    InvalidData(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// Wrap a rusqlite error with the name of the operation that produced it,
    /// splitting constraint violations out so callers can tell "duplicate
    /// username" apart from "disk is full".
    pub(crate) fn storage(operation: &'static str, source: SqlError) -> Self {
        if matches!(
            source.sqlite_error_code(),
            Some(ErrorCode::ConstraintViolation)
        ) {
            Self::Constraint { operation, source }
        } else {
            Self::Storage { operation, source }
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Self::Constraint { .. })
    }
}
