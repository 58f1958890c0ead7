// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use leave_desk_domain::AvailableSubstitute;

use super::helpers::{INSTITUTION, OTHER_INSTITUTION, TUESDAY, World, create_test_world};
use crate::{
    AddHolidayRequest, AffectedSlotsRequest, ApiError, AvailableSubstitutesRequest,
    GetBalanceRequest, HolidayInfo, ListApplicationsRequest, ListHolidaysRequest,
    PreviewLeaveRequest, PreviewLeaveResponse, SetStaffActiveRequest, add_holiday,
    get_affected_slots, get_application, get_available_substitutes, get_balance,
    list_active_staff, list_applications, list_holidays, list_periods, preview_leave_calculation,
    set_staff_active,
};

fn holiday(world: &mut World, date: &str, name: &str, institution_id: Option<i64>) -> HolidayInfo {
    let admin = world.admin.clone();
    add_holiday(
        &mut world.persistence,
        &AddHolidayRequest {
            date: date.to_string(),
            name: name.to_string(),
            institution_id,
        },
        &admin,
    )
    .unwrap()
}

fn preview(world: &mut World, start: &str, end: &str, applicant_id: Option<i64>) -> PreviewLeaveResponse {
    let admin = world.admin.clone();
    preview_leave_calculation(
        &mut world.persistence,
        &world.config,
        &PreviewLeaveRequest {
            start_date: Some(start.to_string()),
            end_date: Some(end.to_string()),
            institution_id: Some(INSTITUTION),
            applicant_id,
        },
        &admin,
    )
    .unwrap()
}

fn candidates(world: &mut World, date: Option<&str>, day_of_week: Option<u8>) -> Vec<AvailableSubstitute> {
    let applicant = world.applicant.clone();
    get_available_substitutes(
        &mut world.persistence,
        &AvailableSubstitutesRequest {
            applicant_id: world.applicant.id,
            period_id: world.period_id,
            date: date.map(str::to_string),
            day_of_week,
        },
        &applicant,
    )
    .unwrap()
    .candidates
}

#[test]
fn test_preview_excludes_midweek_holiday() {
    let mut world: World = create_test_world();
    holiday(&mut world, "2026-03-04", "Founders Day", None);

    let response: PreviewLeaveResponse = preview(&mut world, "2026-03-02", "2026-03-06", None);

    assert_eq!(response.calculation.total_calendar_days, 5);
    assert_eq!(response.calculation.weekends_in_range, 0);
    assert_eq!(response.calculation.holidays_in_range, 1);
    assert_eq!(response.calculation.actual_leave_days, 4);
    assert_eq!(response.holidays.len(), 1);
    assert_eq!(response.holidays[0].name, "Founders Day");
    assert!(response.split.is_none());
}

#[test]
fn test_preview_weekend_holiday_counts_once() {
    let mut world: World = create_test_world();
    holiday(&mut world, "2026-03-07", "Spring Fair", Some(INSTITUTION));

    let response: PreviewLeaveResponse = preview(&mut world, "2026-03-07", "2026-03-08", None);

    assert_eq!(response.calculation.total_calendar_days, 2);
    assert_eq!(response.calculation.weekends_in_range, 2);
    assert_eq!(response.calculation.holidays_in_range, 0);
    assert_eq!(response.calculation.actual_leave_days, 0);
    assert_eq!(response.weekend_dates, vec!["2026-03-07", "2026-03-08"]);
    assert!(response.holidays.is_empty());
}

#[test]
fn test_preview_ignores_other_institution_holiday() {
    let mut world: World = create_test_world();
    holiday(&mut world, "2026-03-04", "Campus Closure", Some(OTHER_INSTITUTION));

    let response: PreviewLeaveResponse = preview(&mut world, "2026-03-02", "2026-03-06", None);

    assert_eq!(response.calculation.actual_leave_days, 5);
}

#[test]
fn test_preview_split_for_named_applicant() {
    let mut world: World = create_test_world();
    let applicant_id: i64 = world.applicant.id;

    let response: PreviewLeaveResponse =
        preview(&mut world, "2026-03-30", "2026-04-02", Some(applicant_id));

    let split = response.split.unwrap();
    assert_eq!(split.actual_leave_days, 4);
    assert_eq!(split.paid_days, 2);
    assert_eq!(split.lop_days, 2);
    assert_eq!(split.allocations.len(), 2);
}

fn preview_request(start: Option<&str>, end: Option<&str>, applicant_id: Option<i64>) -> PreviewLeaveRequest {
    PreviewLeaveRequest {
        start_date: start.map(str::to_string),
        end_date: end.map(str::to_string),
        institution_id: None,
        applicant_id,
    }
}

#[test]
fn test_preview_without_range_is_all_zero() {
    let mut world: World = create_test_world();
    let applicant = world.applicant.clone();

    for (start, end) in [(None, None), (Some("2026-03-02"), None)] {
        let response: PreviewLeaveResponse = preview_leave_calculation(
            &mut world.persistence,
            &world.config,
            &preview_request(start, end, Some(applicant.id)),
            &applicant,
        )
        .unwrap();

        assert_eq!(response.calculation.total_calendar_days, 0);
        assert_eq!(response.calculation.weekends_in_range, 0);
        assert_eq!(response.calculation.holidays_in_range, 0);
        assert_eq!(response.calculation.actual_leave_days, 0);
        assert!(response.weekend_dates.is_empty());
        assert!(response.holidays.is_empty());
        assert!(response.split.is_none());
    }
}

#[test]
fn test_preview_rejects_inverted_or_overlong_range() {
    let mut world: World = create_test_world();
    let admin = world.admin.clone();

    for (start, end) in [("2026-03-06", "2026-03-02"), ("2000-01-01", "2099-12-31")] {
        let result = preview_leave_calculation(
            &mut world.persistence,
            &world.config,
            &preview_request(Some(start), Some(end), None),
            &admin,
        );
        assert!(
            matches!(result, Err(ApiError::InvalidInput { ref field, .. }) if field == "range"),
            "{start}..{end}"
        );
    }
}

#[test]
fn test_balance_defaults_to_monthly_credit() {
    let mut world: World = create_test_world();
    let applicant = world.applicant.clone();

    let balance = get_balance(
        &mut world.persistence,
        &world.config,
        &GetBalanceRequest {
            applicant_id: applicant.id,
            year: 2026,
            month: 7,
        },
        &applicant,
    )
    .unwrap();

    assert_eq!(balance.credited_days, 1);
    assert_eq!(balance.used_days, 0);
    assert_eq!(balance.balance_remaining, 1);

    let invalid = get_balance(
        &mut world.persistence,
        &world.config,
        &GetBalanceRequest {
            applicant_id: applicant.id,
            year: 2026,
            month: 13,
        },
        &applicant,
    );
    assert!(matches!(
        invalid,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "month"
    ));
}

#[test]
fn test_affected_slots_skip_holidays() {
    let mut world: World = create_test_world();
    let applicant = world.applicant.clone();
    let request: AffectedSlotsRequest = AffectedSlotsRequest {
        applicant_id: applicant.id,
        start_date: Some(String::from(TUESDAY)),
        end_date: Some(String::from("2026-03-05")),
    };

    let before = get_affected_slots(&mut world.persistence, &world.config, &request, &applicant)
        .unwrap()
        .slots;
    assert_eq!(before.len(), 2);
    assert_eq!(before[0].date.to_string(), TUESDAY);
    assert_eq!(before[0].class_id, 101);
    assert_eq!(before[1].class_id, 102);

    holiday(&mut world, "2026-03-04", "Founders Day", None);
    let after = get_affected_slots(&mut world.persistence, &world.config, &request, &applicant)
        .unwrap()
        .slots;
    assert_eq!(after.len(), 1);
    assert_eq!(after[0].class_id, 101);
}

#[test]
fn test_candidates_flag_teaching_colleague() {
    let mut world: World = create_test_world();
    let busy_id: i64 = world.busy_colleague.id;
    let free_id: i64 = world.free_colleague.id;

    let by_date: Vec<AvailableSubstitute> = candidates(&mut world, Some(TUESDAY), None);
    let by_weekday: Vec<AvailableSubstitute> = candidates(&mut world, None, Some(2));

    for list in [&by_date, &by_weekday] {
        assert!(list.iter().all(|c| c.staff_id != world.applicant.id));
        let busy = list.iter().find(|c| c.staff_id == busy_id).unwrap();
        assert!(!busy.is_available);
        assert!(busy.reason.is_some());
        assert!(list.iter().find(|c| c.staff_id == free_id).unwrap().is_available);
    }
}

#[test]
fn test_candidates_reject_disagreeing_weekday() {
    let mut world: World = create_test_world();
    let applicant = world.applicant.clone();
    let mut request: AvailableSubstitutesRequest = AvailableSubstitutesRequest {
        applicant_id: applicant.id,
        period_id: world.period_id,
        date: Some(String::from(TUESDAY)),
        day_of_week: Some(3),
    };

    let mismatch = get_available_substitutes(&mut world.persistence, &request, &applicant);
    assert!(matches!(
        mismatch,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "day_of_week"
    ));

    request.date = None;
    request.day_of_week = None;
    let neither = get_available_substitutes(&mut world.persistence, &request, &applicant);
    assert!(matches!(
        neither,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "date"
    ));
}

#[test]
fn test_deactivated_staff_are_not_candidates() {
    let mut world: World = create_test_world();
    let admin = world.admin.clone();
    let free_id: i64 = world.free_colleague.id;

    let updated = set_staff_active(
        &mut world.persistence,
        &SetStaffActiveRequest {
            staff_id: free_id,
            is_active: false,
        },
        &admin,
    )
    .unwrap();
    assert!(!updated.is_active);

    let list: Vec<AvailableSubstitute> = candidates(&mut world, Some(TUESDAY), None);
    assert!(list.iter().all(|c| c.staff_id != free_id));

    let staff = list_active_staff(&mut world.persistence, INSTITUTION).unwrap().staff;
    assert!(staff.iter().all(|s| s.staff_id != free_id));
}

#[test]
fn test_list_applications_is_narrowed_by_role() {
    let mut world: World = create_test_world();
    world.submit_covered();

    let manager = world.manager.clone();
    let managed = list_applications(
        &mut world.persistence,
        &ListApplicationsRequest::default(),
        &manager,
    )
    .unwrap();
    assert_eq!(managed.applications.len(), 1);

    let foreign = world.foreign_manager.clone();
    let unrelated = list_applications(
        &mut world.persistence,
        &ListApplicationsRequest::default(),
        &foreign,
    )
    .unwrap();
    assert!(unrelated.applications.is_empty());

    let officer = world.officer.clone();
    let own = list_applications(
        &mut world.persistence,
        &ListApplicationsRequest::default(),
        &officer,
    )
    .unwrap();
    assert!(own.applications.is_empty());

    let pending = list_applications(
        &mut world.persistence,
        &ListApplicationsRequest {
            status: Some(String::from("pending")),
            year: Some(2026),
            ..ListApplicationsRequest::default()
        },
        &manager,
    )
    .unwrap();
    assert_eq!(pending.applications.len(), 1);

    let bad_status = list_applications(
        &mut world.persistence,
        &ListApplicationsRequest {
            status: Some(String::from("archived")),
            ..ListApplicationsRequest::default()
        },
        &manager,
    );
    assert!(matches!(
        bad_status,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "status"
    ));
}

#[test]
fn test_get_missing_application_is_not_found() {
    let mut world: World = create_test_world();
    let admin = world.admin.clone();

    let result = get_application(&mut world.persistence, 4242, &admin);

    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_reference_listings() {
    let mut world: World = create_test_world();
    holiday(&mut world, "2026-01-26", "Republic Day", None);
    holiday(&mut world, "2026-03-04", "Founders Day", Some(INSTITUTION));
    holiday(&mut world, "2026-03-05", "Campus Closure", Some(OTHER_INSTITUTION));

    let institution = list_holidays(
        &mut world.persistence,
        &ListHolidaysRequest {
            year: 2026,
            institution_id: Some(INSTITUTION),
        },
    )
    .unwrap();
    let names: Vec<&str> = institution.holidays.iter().map(|h| h.name.as_str()).collect();
    assert_eq!(names, vec!["Republic Day", "Founders Day"]);

    let company = list_holidays(
        &mut world.persistence,
        &ListHolidaysRequest {
            year: 2026,
            institution_id: None,
        },
    )
    .unwrap();
    assert_eq!(company.holidays.len(), 1);
    assert_eq!(company.holidays[0].institution_id, None);

    let periods = list_periods(&mut world.persistence, INSTITUTION).unwrap().periods;
    assert_eq!(periods.len(), 1);
    assert_eq!(periods[0].period_id, world.period_id);
}
