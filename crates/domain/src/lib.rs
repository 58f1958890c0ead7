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
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod application;
mod calendar;
mod error;
mod leave_balance;
mod leave_days;
mod leave_status;
mod substitute;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use application::LeaveApplication;
pub use calendar::{NonWorkingDays, WeekendRule, resolve_non_working_days};
pub use leave_balance::{
    BalancePolicy, DEFAULT_MONTHLY_CREDIT, LeaveBalance, LeaveSplit, MonthAllocation,
    allocate_paid_days, group_by_month,
};
pub use leave_days::{LeaveDayCalculation, calculate_leave_days, chargeable_dates};
pub use leave_status::{
    ApprovalStage, LeaveStatus, approval_chain, first_stage, next_stage, stage_precedes,
};
pub use substitute::{
    AffectedSlot, AvailableSubstitute, SlotSelection, StaffLeave, SubstituteAssignment,
    SubstituteAvailability, SubstituteBooking, SubstituteChoice, find_affected_slots,
    resolve_substitute_assignments,
};

// Re-export public types
pub use error::DomainError;
pub use types::{
    ApplicantType, DateRange, Holiday, LeaveType, Period, Scope, StaffMember, TimetableEntry,
    parse_iso_date, weekday_from_number,
};
pub use validation::{
    MAX_RANGE_DAYS, MIN_REASON_LENGTH, validate_leave_request, validate_month, validate_period,
    validate_range_length, validate_rejection_reason, validate_staff_member,
};
