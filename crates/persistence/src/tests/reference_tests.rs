// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use leave_desk_domain::{
    ApplicantType, BalancePolicy, DateRange, Holiday, LeaveBalance, NonWorkingDays, Period, Scope,
    StaffMember, TimetableEntry, WeekendRule,
};
use time::Weekday;
use time::macros::date;

use super::{
    Fixture, INSTITUTION, OTHER_INSTITUTION, create_test_entry, create_test_fixture,
    create_test_member,
};
use crate::PersistenceError;

#[test]
fn test_register_staff_assigns_ids() {
    let fixture: Fixture = create_test_fixture();

    assert!(fixture.applicant.staff_id > 0);
    assert_ne!(fixture.applicant.staff_id, fixture.free_colleague.staff_id);
    assert_eq!(fixture.officer.applicant_type, ApplicantType::Officer);
}

#[test]
fn test_deactivated_staff_leave_the_active_roster() {
    let mut fixture: Fixture = create_test_fixture();
    fixture
        .persistence
        .set_staff_active(fixture.busy_colleague.staff_id, false)
        .unwrap();

    let active: Vec<StaffMember> = fixture.persistence.list_active_staff(INSTITUTION).unwrap();
    let everyone: Vec<StaffMember> = fixture
        .persistence
        .list_institution_staff(INSTITUTION)
        .unwrap();

    assert_eq!(active.len(), 3);
    assert!(active.iter().all(|s| s.staff_id != fixture.busy_colleague.staff_id));
    assert_eq!(everyone.len(), 4);
}

#[test]
fn test_set_staff_active_unknown_staff() {
    let mut fixture: Fixture = create_test_fixture();
    let result: Result<(), PersistenceError> = fixture.persistence.set_staff_active(999, true);
    assert_eq!(result, Err(PersistenceError::StaffNotFound(999)));
}

#[test]
fn test_recurring_assignments_carry_period_order() {
    let mut fixture: Fixture = create_test_fixture();
    let second: Period = fixture
        .persistence
        .add_period(&Period {
            period_id: 0,
            institution_id: INSTITUTION,
            label: String::from("Period 2"),
            display_order: 2,
        })
        .unwrap();
    fixture
        .persistence
        .add_timetable_entry(&TimetableEntry {
            day_of_week: Weekday::Monday,
            ..create_test_entry(fixture.applicant.staff_id, second.period_id, 103)
        })
        .unwrap();

    let entries: Vec<TimetableEntry> = fixture
        .persistence
        .get_recurring_assignments(fixture.applicant.staff_id)
        .unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].day_of_week, Weekday::Monday);
    assert_eq!(entries[0].period_order, 2);
    assert_eq!(entries[1].day_of_week, Weekday::Tuesday);
    assert_eq!(entries[1].period_order, 1);
    assert_eq!(entries[1].room.as_deref(), Some("B-12"));
}

#[test]
fn test_timetable_entry_rejects_foreign_period() {
    let mut fixture: Fixture = create_test_fixture();
    let foreign: Period = fixture
        .persistence
        .add_period(&Period {
            period_id: 0,
            institution_id: OTHER_INSTITUTION,
            label: String::from("Period 1"),
            display_order: 1,
        })
        .unwrap();

    let result: Result<TimetableEntry, PersistenceError> = fixture
        .persistence
        .add_timetable_entry(&create_test_entry(
            fixture.applicant.staff_id,
            foreign.period_id,
            104,
        ));

    assert!(matches!(result, Err(PersistenceError::ReferenceMismatch(_))));
}

#[test]
fn test_timetable_entry_unknown_period() {
    let mut fixture: Fixture = create_test_fixture();
    let result: Result<TimetableEntry, PersistenceError> = fixture
        .persistence
        .add_timetable_entry(&create_test_entry(fixture.applicant.staff_id, 999, 104));
    assert_eq!(result, Err(PersistenceError::PeriodNotFound(999)));
}

#[test]
fn test_institution_holidays_extend_company_holidays() {
    let mut fixture: Fixture = create_test_fixture();
    let persistence = &mut fixture.persistence;
    persistence
        .add_holiday(&Holiday::new(
            date!(2026 - 03 - 04),
            String::from("Founders Day"),
            Scope::Company,
        ))
        .unwrap();
    persistence
        .add_holiday(&Holiday::new(
            date!(2026 - 03 - 05),
            String::from("Annual Sports Day"),
            Scope::Institution(INSTITUTION),
        ))
        .unwrap();
    persistence
        .add_holiday(&Holiday::new(
            date!(2026 - 03 - 03),
            String::from("Other Campus Day"),
            Scope::Institution(OTHER_INSTITUTION),
        ))
        .unwrap();

    let company: Vec<Holiday> = persistence.list_holidays(Scope::Company, 2026).unwrap();
    let institution: Vec<Holiday> = persistence
        .list_holidays(Scope::Institution(INSTITUTION), 2026)
        .unwrap();
    let next_year: Vec<Holiday> = persistence
        .list_holidays(Scope::Institution(INSTITUTION), 2027)
        .unwrap();

    assert_eq!(company.len(), 1);
    assert_eq!(company[0].name, "Founders Day");
    assert_eq!(institution.len(), 2);
    assert_eq!(institution[1].scope, Scope::Institution(INSTITUTION));
    assert!(next_year.is_empty());
}

#[test]
fn test_resolve_non_working_days_for_institution() {
    let mut fixture: Fixture = create_test_fixture();
    fixture
        .persistence
        .add_holiday(&Holiday::new(
            date!(2026 - 03 - 07),
            String::from("Saturday Festival"),
            Scope::Company,
        ))
        .unwrap();
    fixture
        .persistence
        .add_holiday(&Holiday::new(
            date!(2026 - 03 - 04),
            String::from("Annual Sports Day"),
            Scope::Institution(INSTITUTION),
        ))
        .unwrap();

    let range: DateRange = DateRange::new(date!(2026 - 03 - 02), date!(2026 - 03 - 08)).unwrap();
    let resolved: NonWorkingDays = fixture
        .persistence
        .resolve_non_working_days(
            Scope::Institution(INSTITUTION),
            &range,
            &WeekendRule::default(),
        )
        .unwrap();

    assert_eq!(resolved.weekends.len(), 2);
    assert_eq!(resolved.holidays.len(), 2);
    assert!(resolved.is_weekend(date!(2026 - 03 - 07)));
    assert!(resolved.is_holiday(date!(2026 - 03 - 04)));
}

#[test]
fn test_get_balance_does_not_store_opening_record() {
    let mut fixture: Fixture = create_test_fixture();
    let policy: BalancePolicy = BalancePolicy::new(2);
    let applicant_id: i64 = fixture.applicant.staff_id;

    let preview: LeaveBalance = fixture
        .persistence
        .get_balance(applicant_id, 2026, 3, &policy)
        .unwrap();
    assert_eq!(preview.remaining(), 2);

    let opened: LeaveBalance = fixture
        .persistence
        .get_or_create_balance(applicant_id, 2026, 3, &policy)
        .unwrap();
    assert_eq!(opened, preview);

    // The stored record wins over a changed policy.
    let stored: LeaveBalance = fixture
        .persistence
        .get_balance(applicant_id, 2026, 3, &BalancePolicy::new(5))
        .unwrap();
    assert_eq!(stored.credited_days, 2);
}

#[test]
fn test_registered_member_keeps_fields() {
    let mut fixture: Fixture = create_test_fixture();
    let stored: StaffMember = fixture
        .persistence
        .register_staff(&create_test_member("Esi", ApplicantType::Officer))
        .unwrap();
    let loaded: StaffMember = fixture.persistence.get_staff(stored.staff_id).unwrap();
    assert_eq!(loaded, stored);
}
