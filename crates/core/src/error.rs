// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use leave_desk_domain::DomainError;

/// Errors that can occur during workflow transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A domain rule was violated.
    DomainViolation(DomainError),
    /// A stored application does not satisfy workflow invariants.
    InconsistentApplication {
        /// The application, if persisted.
        application_id: Option<i64>,
        /// What was inconsistent.
        message: String,
    },
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::InconsistentApplication {
                application_id,
                message,
            } => match application_id {
                Some(id) => write!(f, "Application {id} is inconsistent: {message}"),
                None => write!(f, "Application is inconsistent: {message}"),
            },
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}
