// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use leave_desk::CoreError;
use leave_desk_domain::DomainError;
use leave_desk_persistence::PersistenceError;

/// The message returned when a transition is refused because the
/// application, or the acting stage, has already been decided.
pub const ALREADY_DECIDED: &str = "this application has already been decided";

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role}")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed - the actor does not have permission.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// Who may perform the action.
        required_role: String,
    },
    /// Invalid input was provided. Nothing was changed.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A chosen substitute cannot cover a slot. The caller must re-select.
    SubstituteConflict {
        /// The date of the slot (ISO 8601).
        date: String,
        /// The period of the slot.
        period_id: i64,
        /// The substitute that was chosen.
        substitute_id: i64,
        /// A human-readable description of the conflict.
        message: String,
    },
    /// The application is no longer in a state that allows the action.
    InvalidStateTransition {
        /// A generic description; race details are not exposed.
        message: String,
    },
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Calendar, timetable, directory or storage data was unavailable.
    ///
    /// Retryable.
    DependencyUnavailable {
        /// The dependency that failed.
        dependency: String,
        /// A human-readable description of the failure.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl ApiError {
    /// Builds the generic state-transition error.
    #[must_use]
    pub fn already_decided() -> Self {
        Self::InvalidStateTransition {
            message: String::from(ALREADY_DECIDED),
        }
    }

    /// Builds the state-transition error for an approver acting out of turn.
    #[must_use]
    pub fn awaiting_stage(expected: &str) -> Self {
        Self::InvalidStateTransition {
            message: format!("this application is awaiting {expected} approval"),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::SubstituteConflict { message, .. } => {
                write!(f, "Substitute conflict: {message}")
            }
            Self::InvalidStateTransition { message } => write!(f, "{message}"),
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::DependencyUnavailable {
                dependency,
                message,
            } => {
                write!(f, "{dependency} unavailable, retry later: {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::Unauthorized {
                action,
                required_role,
            },
        }
    }
}

fn invalid(field: &str, err: &DomainError) -> ApiError {
    ApiError::InvalidInput {
        field: String::from(field),
        message: err.to_string(),
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::MissingDateRange
        | DomainError::InvalidDateRange { .. }
        | DomainError::RangeTooLong { .. }
        | DomainError::DateArithmeticOverflow { .. } => invalid("range", &err),
        DomainError::DateParseError { .. } => invalid("date", &err),
        DomainError::ReasonTooShort { .. } | DomainError::MissingRejectionReason => {
            invalid("reason", &err)
        }
        DomainError::InvalidName(_) => invalid("name", &err),
        DomainError::InvalidApplicantType(_) => invalid("applicant_type", &err),
        DomainError::InvalidLeaveType(_) => invalid("leave_type", &err),
        DomainError::InvalidLeaveStatus(_) => invalid("status", &err),
        DomainError::InvalidApprovalStage(_) => invalid("stage", &err),
        DomainError::InvalidDayOfWeek(_) => invalid("day_of_week", &err),
        DomainError::InvalidMonth(_) => invalid("month", &err),
        DomainError::UnassignedSlot { date, period_id }
        | DomainError::UnknownSlot { date, period_id }
        | DomainError::DuplicateSelection { date, period_id } => ApiError::InvalidInput {
            field: format!("selections[{date}/{period_id}]"),
            message: err.to_string(),
        },
        DomainError::InvalidSubstitute { .. } => invalid("substitute_id", &err),
        DomainError::SubstituteUnavailable {
            substitute_id,
            date,
            period_id,
            ..
        } => ApiError::SubstituteConflict {
            date: date.to_string(),
            period_id,
            substitute_id,
            message: err.to_string(),
        },
        DomainError::InvalidStatusTransition { .. } | DomainError::StageAlreadyApproved { .. } => {
            ApiError::already_decided()
        }
        DomainError::ApprovalStageMismatch { ref expected, .. } => {
            ApiError::awaiting_stage(expected)
        }
        DomainError::InsufficientBalance { .. } => ApiError::DomainRuleViolation {
            rule: String::from("sufficient_balance"),
            message: err.to_string(),
        },
        DomainError::RestoreExceedsUsage { .. } => ApiError::DomainRuleViolation {
            rule: String::from("restore_within_usage"),
            message: err.to_string(),
        },
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::InconsistentApplication { .. } => ApiError::Internal {
            message: err.to_string(),
        },
    }
}

/// Translates a persistence error into an API error.
///
/// The losing side of a concurrent transition sees the same generic
/// state-transition error as any other refused transition.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::TransitionRejected(core_err) => translate_core_error(core_err),
        PersistenceError::StaffNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Staff member"),
            message: format!("Staff member {id} does not exist or is inactive"),
        },
        PersistenceError::PeriodNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Period"),
            message: format!("Period {id} does not exist"),
        },
        PersistenceError::ApplicationNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Leave application"),
            message: format!("Leave application {id} does not exist"),
        },
        PersistenceError::NotFound(message) => ApiError::ResourceNotFound {
            resource_type: String::from("Record"),
            message,
        },
        PersistenceError::ReferenceMismatch(message) => ApiError::DomainRuleViolation {
            rule: String::from("same_institution"),
            message,
        },
        PersistenceError::ReferenceDataUnavailable {
            dependency,
            message,
        } => ApiError::DependencyUnavailable {
            dependency,
            message,
        },
        PersistenceError::SubstituteAlreadyBooked {
            substitute_id,
            ref date,
            period_id,
        } => ApiError::SubstituteConflict {
            date: date.clone(),
            period_id,
            substitute_id,
            message: err.to_string(),
        },
        PersistenceError::ConcurrentModification { ref entity, .. }
            if entity == "leave_application" =>
        {
            ApiError::already_decided()
        }
        PersistenceError::ConcurrentModification { .. } => ApiError::DependencyUnavailable {
            dependency: String::from("ledger"),
            message: err.to_string(),
        },
        PersistenceError::DatabaseError(_) | PersistenceError::DatabaseConnectionFailed(_) => {
            ApiError::DependencyUnavailable {
                dependency: String::from("database"),
                message: err.to_string(),
            }
        }
        PersistenceError::MigrationFailed(_)
        | PersistenceError::QueryFailed(_)
        | PersistenceError::ReconstructionError(_)
        | PersistenceError::SerializationError(_)
        | PersistenceError::InitializationError(_)
        | PersistenceError::ForeignKeyEnforcementNotEnabled => ApiError::Internal {
            message: err.to_string(),
        },
    }
}
