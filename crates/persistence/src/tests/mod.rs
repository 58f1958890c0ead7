// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod reference_tests;

use leave_desk::{
    Command, LeaveRequest, SubmissionResult, TransitionResult, apply, apply_submission,
};
use leave_desk_audit::{Actor, Cause};
use leave_desk_domain::{
    ApplicantType, BalancePolicy, DateRange, LeaveType, Period, SlotSelection, StaffMember,
    SubstituteChoice, TimetableEntry, WeekendRule,
};
use time::Weekday;
use time::macros::date;

use crate::{ContextSettings, Persistence, PersistenceError};

pub const INSTITUTION: i64 = 1;
pub const OTHER_INSTITUTION: i64 = 2;

/// Reference data shared by the workflow tests.
///
/// The applicant and the busy colleague both teach period one on
/// Tuesdays; the free colleague teaches nothing; the officer has no
/// classes.
pub struct Fixture {
    pub persistence: Persistence,
    pub applicant: StaffMember,
    pub free_colleague: StaffMember,
    pub busy_colleague: StaffMember,
    pub officer: StaffMember,
    pub period: Period,
}

pub fn create_test_actor(id: i64) -> Actor {
    Actor::new(id, String::from("tester"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("test-cause"), String::from("Test operation"))
}

pub fn create_test_settings() -> ContextSettings {
    ContextSettings {
        policy: BalancePolicy::default(),
        weekend_rule: WeekendRule::default(),
        min_reason_length: 10,
    }
}

/// Tuesday 2026-03-03 through Thursday 2026-03-05.
pub fn create_test_range() -> DateRange {
    DateRange::new(date!(2026 - 03 - 03), date!(2026 - 03 - 05)).unwrap()
}

pub fn create_test_member(name: &str, applicant_type: ApplicantType) -> StaffMember {
    StaffMember {
        staff_id: 0,
        institution_id: INSTITUTION,
        name: name.to_string(),
        applicant_type,
        is_active: true,
    }
}

pub fn create_test_entry(staff_id: i64, period_id: i64, class_id: i64) -> TimetableEntry {
    TimetableEntry {
        staff_id,
        institution_id: INSTITUTION,
        day_of_week: Weekday::Tuesday,
        period_id,
        period_order: 0,
        class_id,
        subject: String::from("Mathematics"),
        room: Some(String::from("B-12")),
    }
}

pub fn seed_fixture(mut persistence: Persistence) -> Fixture {
    let applicant: StaffMember = persistence
        .register_staff(&create_test_member("Asha", ApplicantType::Staff))
        .unwrap();
    let free_colleague: StaffMember = persistence
        .register_staff(&create_test_member("Bilal", ApplicantType::Staff))
        .unwrap();
    let busy_colleague: StaffMember = persistence
        .register_staff(&create_test_member("Chen", ApplicantType::Staff))
        .unwrap();
    let officer: StaffMember = persistence
        .register_staff(&create_test_member("Dara", ApplicantType::Officer))
        .unwrap();
    let period: Period = persistence
        .add_period(&Period {
            period_id: 0,
            institution_id: INSTITUTION,
            label: String::from("Period 1"),
            display_order: 1,
        })
        .unwrap();

    persistence
        .add_timetable_entry(&create_test_entry(applicant.staff_id, period.period_id, 101))
        .unwrap();
    persistence
        .add_timetable_entry(&create_test_entry(
            busy_colleague.staff_id,
            period.period_id,
            102,
        ))
        .unwrap();

    Fixture {
        persistence,
        applicant,
        free_colleague,
        busy_colleague,
        officer,
        period,
    }
}

pub fn create_test_fixture() -> Fixture {
    seed_fixture(Persistence::new_in_memory().unwrap())
}

impl Fixture {
    /// Covers the applicant's Tuesday class with `choice`.
    pub fn selection(&self, choice: SubstituteChoice) -> SlotSelection {
        SlotSelection {
            date: date!(2026 - 03 - 03),
            period_id: self.period.period_id,
            choice,
        }
    }

    pub fn submit(
        &mut self,
        applicant: &StaffMember,
        selections: Vec<SlotSelection>,
    ) -> Result<SubmissionResult, PersistenceError> {
        submit_with(&mut self.persistence, applicant, selections)
    }

    /// Submits the applicant's standard request covered by the free colleague.
    pub fn submit_covered(&mut self) -> i64 {
        let applicant: StaffMember = self.applicant.clone();
        let selection: SlotSelection =
            self.selection(SubstituteChoice::Substitute(self.free_colleague.staff_id));
        self.submit(&applicant, vec![selection])
            .unwrap()
            .application
            .application_id
            .unwrap()
    }
}

pub fn submit_with(
    persistence: &mut Persistence,
    applicant: &StaffMember,
    selections: Vec<SlotSelection>,
) -> Result<SubmissionResult, PersistenceError> {
    let request: LeaveRequest = LeaveRequest {
        applicant: applicant.clone(),
        range: Some(create_test_range()),
        leave_type: LeaveType::Casual,
        reason: String::from("Family function out of town"),
        selections,
    };
    persistence.submit_leave_application(
        applicant.staff_id,
        &create_test_range(),
        &create_test_settings(),
        |_, context| {
            apply_submission(
                &request,
                context,
                create_test_actor(request.applicant.staff_id),
                create_test_cause(),
            )
        },
    )
}

pub fn decide(
    persistence: &mut Persistence,
    application_id: i64,
    command: &Command,
) -> Result<TransitionResult, PersistenceError> {
    persistence.transition_leave_application(application_id, |application, context| {
        apply(
            application,
            context,
            command,
            &BalancePolicy::default(),
            create_test_actor(command.issuer_id()),
            create_test_cause(),
        )
    })
}
