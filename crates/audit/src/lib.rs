// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use leave_desk_domain::LeaveApplication;

#[cfg(test)]
mod tests;

/// Represents the person performing a workflow action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// The staff identifier of the actor.
    pub id: i64,
    /// The role the actor acted in (e.g., "applicant", "`final_authority`").
    pub role: String,
}

impl Actor {
    /// Creates a new Actor.
    ///
    /// # Arguments
    ///
    /// * `id` - The staff identifier of the actor
    /// * `role` - The role the actor acted in
    #[must_use]
    pub const fn new(id: i64, role: String) -> Self {
        Self { id, role }
    }
}

/// Represents the request that triggered an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cause {
    /// A unique identifier for this cause (e.g., request ID).
    pub id: String,
    /// A description of the cause.
    pub description: String,
}

impl Cause {
    /// Creates a new Cause.
    #[must_use]
    pub const fn new(id: String, description: String) -> Self {
        Self { id, description }
    }
}

/// Represents the workflow action performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// The name of the action (e.g., "`SubmitLeave`", "`ApproveLeave`").
    pub name: String,
    /// Optional additional details about the action.
    pub details: Option<String>,
}

impl Action {
    pub const SUBMIT: &'static str = "SubmitLeave";
    pub const APPROVE: &'static str = "ApproveLeave";
    pub const REJECT: &'static str = "RejectLeave";
    pub const CANCEL: &'static str = "CancelLeave";

    /// Creates a new Action.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the action
    /// * `details` - Optional additional details
    #[must_use]
    pub const fn new(name: String, details: Option<String>) -> Self {
        Self { name, details }
    }
}

/// A snapshot of an application's mutable state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSnapshot {
    pub data: String,
}

impl StateSnapshot {
    /// Creates a new `StateSnapshot`.
    #[must_use]
    pub const fn new(data: String) -> Self {
        Self { data }
    }

    /// Captures the state of a leave application.
    #[must_use]
    pub fn of(application: &LeaveApplication) -> Self {
        Self::new(application.state_summary())
    }

    /// The snapshot used before an application exists.
    #[must_use]
    pub fn absent() -> Self {
        Self::new(String::from("status=none"))
    }
}

/// An immutable audit event representing a workflow transition.
///
/// Every successful submit, approve, reject, or cancel produces exactly one
/// audit event. Events capture:
/// - Who performed the action (actor)
/// - Why it was performed (cause)
/// - What action was performed (action)
/// - The application state before and after the transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// The application the event belongs to.
    ///
    /// `None` only for a submission that has not been persisted yet.
    pub application_id: Option<i64>,
    pub actor: Actor,
    pub cause: Cause,
    pub action: Action,
    pub before: StateSnapshot,
    pub after: StateSnapshot,
}

impl AuditEvent {
    /// Creates a new `AuditEvent`.
    ///
    /// # Arguments
    ///
    /// * `application_id` - The application, if already persisted
    /// * `actor` - The actor who initiated the change
    /// * `cause` - The reason for the change
    /// * `action` - The action that was performed
    /// * `before` - The state before the transition
    /// * `after` - The state after the transition
    #[must_use]
    pub const fn new(
        application_id: Option<i64>,
        actor: Actor,
        cause: Cause,
        action: Action,
        before: StateSnapshot,
        after: StateSnapshot,
    ) -> Self {
        Self {
            application_id,
            actor,
            cause,
            action,
            before,
            after,
        }
    }

    /// Binds the event to a newly assigned application id.
    #[must_use]
    pub fn with_application_id(self, application_id: i64) -> Self {
        Self {
            application_id: Some(application_id),
            ..self
        }
    }
}
