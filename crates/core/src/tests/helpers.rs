// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    LeaveRequest, SubmissionContext, SubmissionResult, TransitionContext, apply_submission,
};
use leave_desk_audit::{Actor, Cause};
use leave_desk_domain::{
    ApplicantType, BalancePolicy, DateRange, Holiday, LeaveApplication, LeaveBalance, LeaveType,
    MIN_REASON_LENGTH, NonWorkingDays, Scope, SlotSelection, StaffMember, SubstituteAvailability,
    SubstituteChoice, TimetableEntry, WeekendRule, resolve_non_working_days,
};
use time::Weekday;
use time::macros::date;

pub const INSTITUTION: i64 = 1;
pub const APPLICANT: i64 = 10;
pub const FREE_COLLEAGUE: i64 = 20;
pub const BUSY_COLLEAGUE: i64 = 30;

pub fn create_test_actor(id: i64, role: &str) -> Actor {
    Actor::new(id, String::from(role))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-456"), String::from("Leave workflow request"))
}

pub fn create_test_staff(staff_id: i64, applicant_type: ApplicantType) -> StaffMember {
    StaffMember {
        staff_id,
        institution_id: INSTITUTION,
        name: format!("Staff {staff_id}"),
        applicant_type,
        is_active: true,
    }
}

pub fn create_test_entry(staff_id: i64, day_of_week: Weekday, period_id: i64) -> TimetableEntry {
    TimetableEntry {
        staff_id,
        institution_id: INSTITUTION,
        day_of_week,
        period_id,
        period_order: i32::try_from(period_id).unwrap(),
        class_id: 500 + period_id,
        subject: String::from("Physics"),
        room: None,
    }
}

/// Tuesday 2026-03-03 through Thursday 2026-03-05.
pub fn create_test_range() -> DateRange {
    DateRange::new(date!(2026 - 03 - 03), date!(2026 - 03 - 05)).unwrap()
}

/// Context where the applicant teaches period 1 every Tuesday and the
/// busy colleague teaches the same period.
pub fn create_test_context(range: &DateRange, holidays: &[Holiday]) -> SubmissionContext {
    let non_working: NonWorkingDays = resolve_non_working_days(
        Scope::Institution(INSTITUTION),
        range,
        holidays,
        &WeekendRule::default(),
    );
    let applicant_entry: TimetableEntry = create_test_entry(APPLICANT, Weekday::Tuesday, 1);

    SubmissionContext {
        non_working,
        timetable: vec![applicant_entry.clone()],
        availability: SubstituteAvailability {
            institution_id: INSTITUTION,
            roster: vec![
                create_test_staff(APPLICANT, ApplicantType::Staff),
                create_test_staff(FREE_COLLEAGUE, ApplicantType::Staff),
                create_test_staff(BUSY_COLLEAGUE, ApplicantType::Staff),
            ],
            commitments: vec![
                applicant_entry,
                create_test_entry(BUSY_COLLEAGUE, Weekday::Tuesday, 1),
            ],
            bookings: Vec::new(),
            on_leave: Vec::new(),
        },
        balances: vec![create_test_balance(1, 0)],
        policy: BalancePolicy::default(),
        min_reason_length: MIN_REASON_LENGTH,
    }
}

pub fn create_test_balance(credited_days: u32, used_days: u32) -> LeaveBalance {
    LeaveBalance {
        applicant_id: APPLICANT,
        year: 2026,
        month: 3,
        credited_days,
        used_days,
    }
}

/// Decision context with the given ledger and the availability of
/// [`create_test_context`], which has no bookings.
pub fn create_test_transition(balances: &[LeaveBalance]) -> TransitionContext {
    TransitionContext {
        balances: balances.to_vec(),
        availability: create_test_context(&create_test_range(), &[]).availability,
    }
}

pub fn create_test_request(applicant_type: ApplicantType, choice: SubstituteChoice) -> LeaveRequest {
    LeaveRequest {
        applicant: create_test_staff(APPLICANT, applicant_type),
        range: Some(create_test_range()),
        leave_type: LeaveType::Casual,
        reason: String::from("Sister's wedding in another city"),
        selections: vec![SlotSelection {
            date: date!(2026 - 03 - 03),
            period_id: 1,
            choice,
        }],
    }
}

/// Submits a valid request and returns the pending application with an id.
pub fn create_test_pending(applicant_type: ApplicantType) -> LeaveApplication {
    let request: LeaveRequest =
        create_test_request(applicant_type, SubstituteChoice::Substitute(FREE_COLLEAGUE));
    let result: SubmissionResult = apply_submission(
        &request,
        &create_test_context(&create_test_range(), &[]),
        create_test_actor(APPLICANT, "applicant"),
        create_test_cause(),
    )
    .unwrap();

    LeaveApplication {
        application_id: Some(77),
        ..result.application
    }
}
