// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use leave_desk_audit::AuditEvent;
use leave_desk_domain::{
    BalancePolicy, LeaveApplication, LeaveBalance, NonWorkingDays, SubstituteAvailability,
    TimetableEntry,
};

/// Everything a submission is decided against.
///
/// The context is loaded by the caller for the requested range, inside the
/// same atomic unit that persists the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionContext {
    /// Weekends and holidays of the applicant's institution in the range.
    pub non_working: NonWorkingDays,
    /// The applicant's recurring timetable.
    pub timetable: Vec<TimetableEntry>,
    /// Who can cover classes at the applicant's institution.
    pub availability: SubstituteAvailability,
    /// The applicant's ledger records for the months of the range.
    pub balances: Vec<LeaveBalance>,
    pub policy: BalancePolicy,
    pub min_reason_length: usize,
}

/// Everything a decision on an existing application is made against.
///
/// Loaded in the same atomic unit that persists the transition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransitionContext {
    /// The applicant's ledger records for the months of the application.
    pub balances: Vec<LeaveBalance>,
    /// Who can cover classes at the application's institution, without the
    /// application's own bookings.
    pub availability: SubstituteAvailability,
}

/// The result of a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionResult {
    /// The new pending application, not yet persisted.
    pub application: LeaveApplication,
    /// The audit event recording the submission.
    pub audit_event: AuditEvent,
}

/// The result of a successful workflow transition.
///
/// Transitions are atomic: they either succeed completely or fail without side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The application after the transition.
    pub application: LeaveApplication,
    /// Ledger records changed by the transition.
    ///
    /// Non-empty only for a final approval or a cancellation after approval.
    pub balance_updates: Vec<LeaveBalance>,
    /// The audit event recording this transition.
    pub audit_event: AuditEvent,
}
