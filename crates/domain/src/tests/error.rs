// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::DomainError;
use time::macros::date;

#[test]
fn test_domain_error_display() {
    let err: DomainError = DomainError::MissingDateRange;
    assert_eq!(format!("{err}"), "A start and end date must be selected");

    let err: DomainError = DomainError::InvalidDateRange {
        start: date!(2026 - 03 - 10),
        end: date!(2026 - 03 - 02),
    };
    assert_eq!(
        format!("{err}"),
        "Start date 2026-03-10 is after end date 2026-03-02"
    );

    let err: DomainError = DomainError::ReasonTooShort {
        length: 4,
        minimum: 10,
    };
    assert_eq!(
        format!("{err}"),
        "Reason must be at least 10 characters, got 4"
    );

    let err: DomainError = DomainError::InvalidName(String::from("test"));
    assert_eq!(format!("{err}"), "Invalid name: test");

    let err: DomainError = DomainError::InvalidLeaveType(String::from("annual"));
    assert_eq!(format!("{err}"), "Invalid leave type: annual");

    let err: DomainError = DomainError::InvalidDayOfWeek(9);
    assert_eq!(
        format!("{err}"),
        "Invalid day of week: 9. Must be between 1 and 7"
    );

    let err: DomainError = DomainError::UnassignedSlot {
        date: date!(2026 - 03 - 03),
        period_id: 4,
    };
    assert_eq!(
        format!("{err}"),
        "No substitute selection for the class on 2026-03-03, period 4"
    );

    let err: DomainError = DomainError::SubstituteUnavailable {
        substitute_id: 7,
        date: date!(2026 - 03 - 03),
        period_id: 4,
        reason: String::from("is on leave that day"),
    };
    assert_eq!(
        format!("{err}"),
        "Substitute 7 is not available on 2026-03-03, period 4: is on leave that day"
    );

    let err: DomainError = DomainError::InsufficientBalance {
        year: 2026,
        month: 3,
        requested: 2,
        remaining: 1,
    };
    assert_eq!(
        format!("{err}"),
        "Cannot consume 2 paid days in 2026-03: only 1 remaining"
    );

    let err: DomainError = DomainError::ApprovalStageMismatch {
        expected: String::from("final_authority"),
        actual: String::from("institution_management"),
    };
    assert_eq!(
        format!("{err}"),
        "Application is awaiting 'final_authority' approval, not 'institution_management'"
    );

    let err: DomainError = DomainError::StageAlreadyApproved {
        stage: String::from("institution_management"),
    };
    assert_eq!(
        format!("{err}"),
        "The 'institution_management' approval has already been given"
    );

    let err: DomainError = DomainError::RangeTooLong {
        days: 730,
        maximum: 366,
    };
    assert_eq!(format!("{err}"), "Range spans 730 days; at most 366 are allowed");
}

#[test]
fn test_domain_error_is_std_error() {
    let err: Box<dyn std::error::Error> = Box::new(DomainError::MissingRejectionReason);
    assert_eq!(err.to_string(), "A rejection reason is required");
}
