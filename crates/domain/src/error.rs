// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::Date;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// No date range was supplied.
    MissingDateRange,
    /// The date range ends before it starts.
    InvalidDateRange {
        /// The requested start date.
        start: Date,
        /// The requested end date.
        end: Date,
    },
    /// The date range spans more days than one application may cover.
    RangeTooLong {
        /// Days in the requested range.
        days: u32,
        /// The longest accepted range.
        maximum: u32,
    },
    /// Failed to parse date from string.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
    /// Date arithmetic overflow.
    DateArithmeticOverflow {
        /// Description of the operation that failed.
        operation: String,
    },
    /// The leave reason is shorter than the business minimum.
    ReasonTooShort {
        /// The length of the supplied reason (trimmed, in characters).
        length: usize,
        /// The minimum accepted length.
        minimum: usize,
    },
    /// A rejection was attempted without a reason.
    MissingRejectionReason,
    /// A name or label is empty.
    InvalidName(String),
    /// Applicant type string is not recognised.
    InvalidApplicantType(String),
    /// Leave type string is not recognised.
    InvalidLeaveType(String),
    /// Leave status string is not recognised.
    InvalidLeaveStatus(String),
    /// Approval stage string is not recognised.
    InvalidApprovalStage(String),
    /// Day-of-week number is outside 1..=7.
    InvalidDayOfWeek(u8),
    /// Month number is outside 1..=12.
    InvalidMonth(u8),
    /// An affected teaching slot has no substitute selection.
    UnassignedSlot {
        /// The date of the slot.
        date: Date,
        /// The period of the slot.
        period_id: i64,
    },
    /// A substitute selection refers to a slot that is not affected by the leave.
    UnknownSlot {
        /// The date named by the selection.
        date: Date,
        /// The period named by the selection.
        period_id: i64,
    },
    /// More than one selection names the same slot.
    DuplicateSelection {
        /// The date named twice.
        date: Date,
        /// The period named twice.
        period_id: i64,
    },
    /// The chosen substitute cannot cover the slot.
    SubstituteUnavailable {
        /// The chosen substitute.
        substitute_id: i64,
        /// The date of the slot.
        date: Date,
        /// The period of the slot.
        period_id: i64,
        /// Why the substitute is unavailable.
        reason: String,
    },
    /// The chosen substitute is not an eligible candidate at all.
    InvalidSubstitute {
        /// The chosen substitute.
        substitute_id: i64,
        /// Why the candidate is not eligible.
        reason: String,
    },
    /// The requested status transition is not permitted.
    InvalidStatusTransition {
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
        /// Why the transition was refused.
        reason: String,
    },
    /// The approver's role does not match the application's approval stage.
    ApprovalStageMismatch {
        /// The stage the application is waiting on.
        expected: String,
        /// The stage the approver acted as.
        actual: String,
    },
    /// The approver acted for a stage the application has already passed.
    StageAlreadyApproved {
        /// The stage the approver acted as.
        stage: String,
    },
    /// Consuming paid days would overdraw a monthly balance.
    InsufficientBalance {
        /// The balance year.
        year: i32,
        /// The balance month (1-12).
        month: u8,
        /// Days requested.
        requested: u32,
        /// Days remaining.
        remaining: u32,
    },
    /// Restoring paid days would exceed what was consumed.
    RestoreExceedsUsage {
        /// The balance year.
        year: i32,
        /// The balance month (1-12).
        month: u8,
        /// Days to restore.
        restore: u32,
        /// Days currently used.
        used: u32,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingDateRange => write!(f, "A start and end date must be selected"),
            Self::InvalidDateRange { start, end } => {
                write!(f, "Start date {start} is after end date {end}")
            }
            Self::RangeTooLong { days, maximum } => {
                write!(f, "Range spans {days} days; at most {maximum} are allowed")
            }
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
            Self::DateArithmeticOverflow { operation } => {
                write!(f, "Date arithmetic overflow while {operation}")
            }
            Self::ReasonTooShort { length, minimum } => {
                write!(
                    f,
                    "Reason must be at least {minimum} characters, got {length}"
                )
            }
            Self::MissingRejectionReason => write!(f, "A rejection reason is required"),
            Self::InvalidName(msg) => write!(f, "Invalid name: {msg}"),
            Self::InvalidApplicantType(value) => write!(f, "Invalid applicant type: {value}"),
            Self::InvalidLeaveType(value) => write!(f, "Invalid leave type: {value}"),
            Self::InvalidLeaveStatus(value) => write!(f, "Invalid leave status: {value}"),
            Self::InvalidApprovalStage(value) => write!(f, "Invalid approval stage: {value}"),
            Self::InvalidDayOfWeek(value) => {
                write!(f, "Invalid day of week: {value}. Must be between 1 and 7")
            }
            Self::InvalidMonth(value) => {
                write!(f, "Invalid month: {value}. Must be between 1 and 12")
            }
            Self::UnassignedSlot { date, period_id } => {
                write!(
                    f,
                    "No substitute selection for the class on {date}, period {period_id}"
                )
            }
            Self::UnknownSlot { date, period_id } => {
                write!(
                    f,
                    "Selection for {date}, period {period_id} does not match an affected class"
                )
            }
            Self::DuplicateSelection { date, period_id } => {
                write!(f, "More than one selection for {date}, period {period_id}")
            }
            Self::SubstituteUnavailable {
                substitute_id,
                date,
                period_id,
                reason,
            } => {
                write!(
                    f,
                    "Substitute {substitute_id} is not available on {date}, period {period_id}: {reason}"
                )
            }
            Self::InvalidSubstitute {
                substitute_id,
                reason,
            } => {
                write!(f, "Staff member {substitute_id} cannot substitute: {reason}")
            }
            Self::InvalidStatusTransition { from, to, reason } => {
                write!(f, "Cannot transition from '{from}' to '{to}': {reason}")
            }
            Self::ApprovalStageMismatch { expected, actual } => {
                write!(
                    f,
                    "Application is awaiting '{expected}' approval, not '{actual}'"
                )
            }
            Self::StageAlreadyApproved { stage } => {
                write!(f, "The '{stage}' approval has already been given")
            }
            Self::InsufficientBalance {
                year,
                month,
                requested,
                remaining,
            } => {
                write!(
                    f,
                    "Cannot consume {requested} paid days in {year}-{month:02}: only {remaining} remaining"
                )
            }
            Self::RestoreExceedsUsage {
                year,
                month,
                restore,
                used,
            } => {
                write!(
                    f,
                    "Cannot restore {restore} paid days in {year}-{month:02}: only {used} used"
                )
            }
        }
    }
}

impl std::error::Error for DomainError {}
