// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::{DateRange, Period, StaffMember};

/// Minimum number of characters in a leave reason.
pub const MIN_REASON_LENGTH: usize = 10;

/// Longest range, in days, a single request may span.
pub const MAX_RANGE_DAYS: u32 = 366;

/// Validates that a range is no longer than [`MAX_RANGE_DAYS`].
///
/// # Errors
///
/// Returns `DomainError::RangeTooLong` if the range spans more days.
pub fn validate_range_length(range: &DateRange) -> Result<(), DomainError> {
    let days: u32 = range.total_days();
    if days > MAX_RANGE_DAYS {
        return Err(DomainError::RangeTooLong {
            days,
            maximum: MAX_RANGE_DAYS,
        });
    }
    Ok(())
}

/// Validates the input of a leave request.
///
/// # Arguments
///
/// * `range` - The requested range, if one was selected
/// * `reason` - The free-text reason
/// * `min_reason_length` - Minimum accepted reason length
///
/// # Returns
///
/// * `Ok(DateRange)` with the validated range
/// * `Err(DomainError)` if any precondition fails
///
/// # Errors
///
/// Returns an error if:
/// - No range was selected, or it spans more than [`MAX_RANGE_DAYS`]
/// - The trimmed reason is shorter than `min_reason_length` characters
pub fn validate_leave_request(
    range: Option<DateRange>,
    reason: &str,
    min_reason_length: usize,
) -> Result<DateRange, DomainError> {
    let Some(range) = range else {
        return Err(DomainError::MissingDateRange);
    };
    validate_range_length(&range)?;

    // Rule: length is counted in characters, ignoring surrounding whitespace
    let length: usize = reason.trim().chars().count();
    if length < min_reason_length {
        return Err(DomainError::ReasonTooShort {
            length,
            minimum: min_reason_length,
        });
    }

    Ok(range)
}

/// Validates that a rejection carries a reason.
///
/// # Errors
///
/// Returns `DomainError::MissingRejectionReason` if the reason is blank.
pub fn validate_rejection_reason(reason: &str) -> Result<(), DomainError> {
    if reason.trim().is_empty() {
        return Err(DomainError::MissingRejectionReason);
    }
    Ok(())
}

/// Validates a month number.
///
/// # Errors
///
/// Returns `DomainError::InvalidMonth` for values outside 1..=12.
pub const fn validate_month(month: u8) -> Result<u8, DomainError> {
    match month {
        1..=12 => Ok(month),
        _ => Err(DomainError::InvalidMonth(month)),
    }
}

/// Validates the fields of a staff directory record.
///
/// # Errors
///
/// Returns `DomainError::InvalidName` if the name is blank.
pub fn validate_staff_member(staff: &StaffMember) -> Result<(), DomainError> {
    if staff.name.trim().is_empty() {
        return Err(DomainError::InvalidName(String::from(
            "Staff name cannot be empty",
        )));
    }
    Ok(())
}

/// Validates the fields of a period definition.
///
/// # Errors
///
/// Returns `DomainError::InvalidName` if the label is blank.
pub fn validate_period(period: &Period) -> Result<(), DomainError> {
    if period.label.trim().is_empty() {
        return Err(DomainError::InvalidName(String::from(
            "Period label cannot be empty",
        )));
    }
    Ok(())
}
