// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use leave_desk_audit::Cause;
use leave_desk_domain::SubstituteChoice;
use leave_desk_persistence::Persistence;

use crate::{
    AddPeriodRequest, AddTimetableEntryRequest, ApiError, ApiResult, AuthenticatedActor,
    AuthenticationService, LeaveApplicationResponse, LeaveConfig, RegisterStaffRequest, Role,
    SlotSelectionRequest, SubmitLeaveRequest, add_period, add_timetable_entry, approve_leave,
    register_staff, submit_leave,
};

pub const INSTITUTION: i64 = 1;
pub const OTHER_INSTITUTION: i64 = 2;

/// Tuesday of the standard leave range.
pub const TUESDAY: &str = "2026-03-03";
/// Wednesday of the standard leave range.
pub const WEDNESDAY: &str = "2026-03-04";

pub fn create_test_admin() -> AuthenticatedActor {
    AuthenticatedActor::new(900, Role::Admin, None)
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("api-req-456"), String::from("API request"))
}

/// Reference data and actors shared by the API tests.
///
/// The applicant teaches period one on Tuesdays and Wednesdays. Chen
/// teaches period one on Tuesdays. Bilal teaches nothing. Dara is an
/// officer without classes.
pub struct World {
    pub persistence: Persistence,
    pub config: LeaveConfig,
    pub admin: AuthenticatedActor,
    pub applicant: AuthenticatedActor,
    pub free_colleague: AuthenticatedActor,
    pub busy_colleague: AuthenticatedActor,
    pub officer: AuthenticatedActor,
    pub manager: AuthenticatedActor,
    pub foreign_manager: AuthenticatedActor,
    pub authority: AuthenticatedActor,
    pub period_id: i64,
}

fn register(
    persistence: &mut Persistence,
    admin: &AuthenticatedActor,
    institution_id: i64,
    name: &str,
    applicant_type: &str,
) -> i64 {
    register_staff(
        persistence,
        &RegisterStaffRequest {
            institution_id,
            name: name.to_string(),
            applicant_type: applicant_type.to_string(),
        },
        admin,
    )
    .unwrap()
    .staff_id
}

fn teach(
    persistence: &mut Persistence,
    admin: &AuthenticatedActor,
    staff_id: i64,
    day_of_week: u8,
    period_id: i64,
    class_id: i64,
) {
    add_timetable_entry(
        persistence,
        &AddTimetableEntryRequest {
            staff_id,
            day_of_week,
            period_id,
            class_id,
            subject: String::from("Physics"),
            room: None,
        },
        admin,
    )
    .unwrap();
}

pub fn authenticate(persistence: &mut Persistence, staff_id: i64, role: Role) -> AuthenticatedActor {
    AuthenticationService::authenticate(persistence, staff_id, role).unwrap()
}

pub fn create_test_world() -> World {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let admin: AuthenticatedActor = create_test_admin();

    let applicant_id: i64 = register(&mut persistence, &admin, INSTITUTION, "Asha", "staff");
    let free_id: i64 = register(&mut persistence, &admin, INSTITUTION, "Bilal", "staff");
    let busy_id: i64 = register(&mut persistence, &admin, INSTITUTION, "Chen", "staff");
    let officer_id: i64 = register(&mut persistence, &admin, INSTITUTION, "Dara", "officer");
    let manager_id: i64 = register(&mut persistence, &admin, INSTITUTION, "Esme", "staff");
    let foreign_id: i64 = register(&mut persistence, &admin, OTHER_INSTITUTION, "Femi", "staff");
    let authority_id: i64 = register(&mut persistence, &admin, OTHER_INSTITUTION, "Gita", "officer");

    let period_id: i64 = add_period(
        &mut persistence,
        &AddPeriodRequest {
            institution_id: INSTITUTION,
            label: String::from("Period 1"),
            display_order: 1,
        },
        &admin,
    )
    .unwrap()
    .period
    .period_id;

    teach(&mut persistence, &admin, applicant_id, 2, period_id, 101);
    teach(&mut persistence, &admin, applicant_id, 3, period_id, 102);
    teach(&mut persistence, &admin, busy_id, 2, period_id, 201);

    World {
        applicant: authenticate(&mut persistence, applicant_id, Role::Applicant),
        free_colleague: authenticate(&mut persistence, free_id, Role::Applicant),
        busy_colleague: authenticate(&mut persistence, busy_id, Role::Applicant),
        officer: authenticate(&mut persistence, officer_id, Role::Applicant),
        manager: authenticate(&mut persistence, manager_id, Role::InstitutionManagement),
        foreign_manager: authenticate(&mut persistence, foreign_id, Role::InstitutionManagement),
        authority: authenticate(&mut persistence, authority_id, Role::FinalAuthority),
        persistence,
        config: LeaveConfig::default(),
        admin,
        period_id,
    }
}

pub fn selection(date: &str, period_id: i64, choice: SubstituteChoice) -> SlotSelectionRequest {
    SlotSelectionRequest {
        date: date.to_string(),
        period_id,
        choice,
    }
}

/// Tuesday 2026-03-03 through Thursday 2026-03-05.
pub fn create_submit_request(
    applicant_id: i64,
    selections: Vec<SlotSelectionRequest>,
) -> SubmitLeaveRequest {
    SubmitLeaveRequest {
        applicant_id,
        start_date: Some(String::from(TUESDAY)),
        end_date: Some(String::from("2026-03-05")),
        leave_type: String::from("casual"),
        reason: String::from("Family wedding out of town"),
        selections,
    }
}

impl World {
    /// Selections covering both of the applicant's classes with Bilal.
    pub fn covered_selections(&self) -> Vec<SlotSelectionRequest> {
        let cover: SubstituteChoice = SubstituteChoice::Substitute(self.free_colleague.id);
        vec![
            selection(TUESDAY, self.period_id, cover),
            selection(WEDNESDAY, self.period_id, cover),
        ]
    }

    pub fn submit(
        &mut self,
        request: &SubmitLeaveRequest,
        actor: &AuthenticatedActor,
    ) -> Result<ApiResult<LeaveApplicationResponse>, ApiError> {
        submit_leave(
            &mut self.persistence,
            &self.config,
            request,
            actor,
            create_test_cause(),
        )
    }

    /// Submits the applicant's standard request with both classes covered.
    pub fn submit_covered(&mut self) -> i64 {
        let request: SubmitLeaveRequest =
            create_submit_request(self.applicant.id, self.covered_selections());
        let applicant: AuthenticatedActor = self.applicant.clone();
        self.submit(&request, &applicant)
            .unwrap()
            .response
            .application
            .application_id
    }

    pub fn approve(
        &mut self,
        application_id: i64,
        actor: &AuthenticatedActor,
    ) -> Result<ApiResult<LeaveApplicationResponse>, ApiError> {
        approve_leave(
            &mut self.persistence,
            &self.config,
            application_id,
            actor,
            create_test_cause(),
        )
    }
}
