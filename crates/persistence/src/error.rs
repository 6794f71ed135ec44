// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::result::DatabaseErrorKind;
use shiftly_domain::DomainError;

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// A database error occurred.
    DatabaseError(String),
    /// Database connection failed.
    DatabaseConnectionFailed(String),
    /// Database migration failed.
    MigrationFailed(String),
    /// Query execution failed.
    QueryFailed(String),
    /// Serialization/deserialization error.
    SerializationError(String),
    /// A stored row could not be turned back into a domain value.
    ReconstructionError(String),
    /// Initialization error.
    InitializationError(String),
    /// Foreign key enforcement is not enabled.
    ForeignKeyEnforcementNotEnabled,
    /// The requested resource was not found.
    NotFound(String),
    /// A uniqueness constraint rejected the write.
    UniqueViolation(String),
    /// A foreign key constraint rejected the write.
    ForeignKeyViolation(String),
    /// A check or not-null constraint rejected the write.
    ConstraintViolation(String),
    /// A scheduling rule failed when re-validated inside the write transaction.
    RuleViolation(DomainError),
    /// One step of a multi-step write failed; nothing was committed.
    StepFailed {
        /// The step that failed.
        step: &'static str,
        /// The underlying failure.
        message: String,
    },
}

impl PersistenceError {
    /// Attributes a database failure to a named step of a multi-step write.
    ///
    /// Constraint and rule failures keep their kind; only opaque database
    /// failures are wrapped.
    #[must_use]
    pub fn during(self, step: &'static str) -> Self {
        match self {
            Self::DatabaseError(message) | Self::QueryFailed(message) => {
                Self::StepFailed { step, message }
            }
            other => other,
        }
    }
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::DatabaseConnectionFailed(msg) => {
                write!(f, "Database connection failed: {msg}")
            }
            Self::MigrationFailed(msg) => write!(f, "Migration failed: {msg}"),
            Self::QueryFailed(msg) => write!(f, "Query failed: {msg}"),
            Self::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
            Self::ReconstructionError(msg) => write!(f, "Stored data is invalid: {msg}"),
            Self::InitializationError(msg) => write!(f, "Initialization error: {msg}"),
            Self::ForeignKeyEnforcementNotEnabled => {
                write!(f, "Foreign key enforcement is not enabled")
            }
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::UniqueViolation(msg) => write!(f, "Uniqueness violation: {msg}"),
            Self::ForeignKeyViolation(msg) => write!(f, "Foreign key violation: {msg}"),
            Self::ConstraintViolation(msg) => write!(f, "Constraint violation: {msg}"),
            Self::RuleViolation(err) => write!(f, "{err}"),
            Self::StepFailed { step, message } => {
                write!(f, "Failed while {step}: {message}")
            }
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Self::NotFound("Record not found".to_string()),
            diesel::result::Error::DatabaseError(kind, info) => {
                let message: String = info.message().to_string();
                match kind {
                    DatabaseErrorKind::UniqueViolation => Self::UniqueViolation(message),
                    DatabaseErrorKind::ForeignKeyViolation => Self::ForeignKeyViolation(message),
                    DatabaseErrorKind::CheckViolation | DatabaseErrorKind::NotNullViolation => {
                        Self::ConstraintViolation(message)
                    }
                    _ => Self::DatabaseError(message),
                }
            }
            _ => Self::DatabaseError(err.to_string()),
        }
    }
}

impl From<DomainError> for PersistenceError {
    fn from(err: DomainError) -> Self {
        Self::RuleViolation(err)
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::DatabaseConnectionFailed(err.to_string())
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}
