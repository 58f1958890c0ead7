// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    ApplicantType, DateRange, DomainError, MAX_RANGE_DAYS, MIN_REASON_LENGTH, Period,
    StaffMember, validate_leave_request, validate_month, validate_period, validate_range_length,
    validate_rejection_reason, validate_staff_member,
};
use time::macros::date;

fn create_test_range() -> DateRange {
    DateRange::new(date!(2026 - 03 - 02), date!(2026 - 03 - 06)).unwrap()
}

#[test]
fn test_validate_leave_request_accepts_valid_input() {
    let range: DateRange = validate_leave_request(
        Some(create_test_range()),
        "Family function out of town",
        MIN_REASON_LENGTH,
    )
    .unwrap();
    assert_eq!(range, create_test_range());
}

#[test]
fn test_validate_leave_request_requires_range() {
    let result = validate_leave_request(None, "Family function out of town", MIN_REASON_LENGTH);
    assert_eq!(result, Err(DomainError::MissingDateRange));
}

#[test]
fn test_range_length_is_capped() {
    // 2028 is a leap year: a full year is exactly the cap
    let leap_year: DateRange = DateRange::new(date!(2028 - 01 - 01), date!(2028 - 12 - 31)).unwrap();
    assert_eq!(leap_year.total_days(), MAX_RANGE_DAYS);
    assert!(validate_range_length(&leap_year).is_ok());

    let too_long: DateRange = DateRange::new(date!(2028 - 01 - 01), date!(2029 - 01 - 01)).unwrap();
    assert_eq!(
        validate_range_length(&too_long),
        Err(DomainError::RangeTooLong {
            days: 367,
            maximum: MAX_RANGE_DAYS,
        })
    );

    let century: DateRange = DateRange::new(date!(2000 - 01 - 01), date!(2099 - 12 - 31)).unwrap();
    assert!(matches!(
        validate_leave_request(Some(century), "Family function out of town", MIN_REASON_LENGTH),
        Err(DomainError::RangeTooLong { .. })
    ));
}

#[test]
fn test_validate_leave_request_reason_boundary() {
    // Exactly ten characters passes, nine fails
    assert!(validate_leave_request(Some(create_test_range()), "0123456789", 10).is_ok());

    let result = validate_leave_request(Some(create_test_range()), "012345678", 10);
    assert_eq!(
        result,
        Err(DomainError::ReasonTooShort {
            length: 9,
            minimum: 10,
        })
    );
}

#[test]
fn test_validate_leave_request_ignores_padding() {
    let result = validate_leave_request(Some(create_test_range()), "   fever   ", 10);
    assert!(matches!(
        result,
        Err(DomainError::ReasonTooShort { length: 5, .. })
    ));
}

#[test]
fn test_validate_rejection_reason() {
    assert!(validate_rejection_reason("Exam week").is_ok());
    assert_eq!(
        validate_rejection_reason("  "),
        Err(DomainError::MissingRejectionReason)
    );
}

#[test]
fn test_validate_month() {
    assert_eq!(validate_month(1), Ok(1));
    assert_eq!(validate_month(12), Ok(12));
    assert_eq!(validate_month(0), Err(DomainError::InvalidMonth(0)));
    assert_eq!(validate_month(13), Err(DomainError::InvalidMonth(13)));
}

#[test]
fn test_validate_reference_records() {
    let staff: StaffMember = StaffMember {
        staff_id: 1,
        institution_id: 1,
        name: String::from(" "),
        applicant_type: ApplicantType::Staff,
        is_active: true,
    };
    assert!(matches!(
        validate_staff_member(&staff),
        Err(DomainError::InvalidName(_))
    ));

    let period: Period = Period {
        period_id: 1,
        institution_id: 1,
        label: String::from("Period 1"),
        display_order: 1,
    };
    assert!(validate_period(&period).is_ok());
}
