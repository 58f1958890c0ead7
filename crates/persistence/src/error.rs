// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use leave_desk::CoreError;

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
    /// A stored row could not be turned back into a domain value.
    ReconstructionError(String),
    /// Serialization/deserialization error.
    SerializationError(String),
    /// Initialization error.
    InitializationError(String),
    /// Foreign key enforcement is not enabled.
    ForeignKeyEnforcementNotEnabled,
    /// The requested staff member does not exist or is inactive.
    StaffNotFound(i64),
    /// The requested period does not exist.
    PeriodNotFound(i64),
    /// The requested leave application does not exist.
    ApplicationNotFound(i64),
    /// Reference data points across institutions.
    ReferenceMismatch(String),
    /// Calendar, timetable or directory data could not be loaded.
    ReferenceDataUnavailable {
        /// The store that failed.
        dependency: String,
        message: String,
    },
    /// A guarded write found a newer version than the one it read.
    ConcurrentModification {
        /// The kind of record (e.g., "`leave_application`").
        entity: String,
        /// The record key.
        key: String,
    },
    /// A substitute was booked for the slot by a concurrent submission.
    SubstituteAlreadyBooked {
        substitute_id: i64,
        date: String,
        period_id: i64,
    },
    /// The workflow refused the transition.
    TransitionRejected(CoreError),
    /// The requested resource was not found.
    NotFound(String),
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
            Self::ReconstructionError(msg) => write!(f, "Reconstruction error: {msg}"),
            Self::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
            Self::InitializationError(msg) => write!(f, "Initialization error: {msg}"),
            Self::ForeignKeyEnforcementNotEnabled => {
                write!(f, "Foreign key enforcement is not enabled")
            }
            Self::StaffNotFound(id) => write!(f, "Staff member not found: {id}"),
            Self::PeriodNotFound(id) => write!(f, "Period not found: {id}"),
            Self::ApplicationNotFound(id) => write!(f, "Leave application not found: {id}"),
            Self::ReferenceMismatch(msg) => write!(f, "Reference mismatch: {msg}"),
            Self::ReferenceDataUnavailable {
                dependency,
                message,
            } => write!(f, "{dependency} data unavailable: {message}"),
            Self::ConcurrentModification { entity, key } => {
                write!(f, "{entity} {key} was modified concurrently")
            }
            Self::SubstituteAlreadyBooked {
                substitute_id,
                date,
                period_id,
            } => write!(
                f,
                "Substitute {substitute_id} is already booked on {date} for period {period_id}"
            ),
            Self::TransitionRejected(err) => write!(f, "Transition rejected: {err}"),
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Self::NotFound("Record not found".to_string()),
            _ => Self::DatabaseError(err.to_string()),
        }
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

impl From<CoreError> for PersistenceError {
    fn from(err: CoreError) -> Self {
        Self::TransitionRejected(err)
    }
}
