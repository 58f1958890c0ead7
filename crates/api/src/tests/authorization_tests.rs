// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::str::FromStr;

use super::helpers::{INSTITUTION, World, create_submit_request, create_test_cause, create_test_world};
use crate::{
    AddPeriodRequest, ApiError, AuthError, AuthenticatedActor, AuthenticationService,
    RegisterStaffRequest, Role, SetStaffActiveRequest, SubmitLeaveRequest, add_period,
    cancel_leave, get_application, register_staff, set_staff_active,
};

fn assert_unauthorized<T: std::fmt::Debug>(result: Result<T, ApiError>) {
    assert!(
        matches!(result, Err(ApiError::Unauthorized { .. })),
        "expected Unauthorized, got {result:?}"
    );
}

#[test]
fn test_role_parsing() {
    assert_eq!(Role::from_str("Final_Authority").unwrap(), Role::FinalAuthority);
    assert_eq!(Role::from_str(" admin ").unwrap(), Role::Admin);
    assert!(matches!(
        Role::from_str("principal"),
        Err(AuthError::AuthenticationFailed { .. })
    ));
    assert_eq!(Role::InstitutionManagement.to_string(), "institution_management");
}

#[test]
fn test_authentication_checks_directory() {
    let mut world: World = create_test_world();

    assert!(AuthenticationService::authenticate(&mut world.persistence, 0, Role::Applicant).is_err());
    assert!(
        AuthenticationService::authenticate(&mut world.persistence, 4242, Role::Applicant).is_err()
    );

    let admin: AuthenticatedActor =
        AuthenticationService::authenticate(&mut world.persistence, 4242, Role::Admin).unwrap();
    assert_eq!(admin.institution_id, None);

    let manager: AuthenticatedActor = AuthenticationService::authenticate(
        &mut world.persistence,
        world.manager.id,
        Role::InstitutionManagement,
    )
    .unwrap();
    assert_eq!(manager.institution_id, Some(INSTITUTION));
}

#[test]
fn test_inactive_staff_cannot_authenticate() {
    let mut world: World = create_test_world();
    let admin = world.admin.clone();
    set_staff_active(
        &mut world.persistence,
        &SetStaffActiveRequest {
            staff_id: world.free_colleague.id,
            is_active: false,
        },
        &admin,
    )
    .unwrap();

    let result = AuthenticationService::authenticate(
        &mut world.persistence,
        world.free_colleague.id,
        Role::Applicant,
    );

    assert!(matches!(result, Err(AuthError::AuthenticationFailed { .. })));
}

#[test]
fn test_reference_data_requires_admin() {
    let mut world: World = create_test_world();
    let manager = world.manager.clone();

    assert_unauthorized(register_staff(
        &mut world.persistence,
        &RegisterStaffRequest {
            institution_id: INSTITUTION,
            name: String::from("Hana"),
            applicant_type: String::from("staff"),
        },
        &manager,
    ));
    assert_unauthorized(add_period(
        &mut world.persistence,
        &AddPeriodRequest {
            institution_id: INSTITUTION,
            label: String::from("Period 2"),
            display_order: 2,
        },
        &manager,
    ));
}

#[test]
fn test_applicant_cannot_submit_for_colleague() {
    let mut world: World = create_test_world();
    let request: SubmitLeaveRequest = create_submit_request(world.free_colleague.id, Vec::new());
    let applicant = world.applicant.clone();

    assert_unauthorized(world.submit(&request, &applicant));
}

#[test]
fn test_admin_may_submit_on_behalf() {
    let mut world: World = create_test_world();
    let request: SubmitLeaveRequest = create_submit_request(world.free_colleague.id, Vec::new());
    let admin = world.admin.clone();

    let result = world.submit(&request, &admin).unwrap();

    assert_eq!(result.response.application.applicant_id, world.free_colleague.id);
    assert_eq!(result.audit_event.actor.id, admin.id);
}

#[test]
fn test_only_approvers_of_the_institution_decide() {
    let mut world: World = create_test_world();
    let application_id: i64 = world.submit_covered();

    let applicant = world.applicant.clone();
    let colleague = world.free_colleague.clone();
    let foreign = world.foreign_manager.clone();
    let admin = world.admin.clone();

    assert_unauthorized(world.approve(application_id, &applicant));
    assert_unauthorized(world.approve(application_id, &colleague));
    assert_unauthorized(world.approve(application_id, &foreign));
    assert_unauthorized(world.approve(application_id, &admin));
}

#[test]
fn test_approver_cannot_decide_own_application() {
    let mut world: World = create_test_world();
    let manager = world.manager.clone();
    let request: SubmitLeaveRequest = create_submit_request(manager.id, Vec::new());
    let application_id: i64 = world
        .submit(&request, &manager)
        .unwrap()
        .response
        .application
        .application_id;

    assert_unauthorized(world.approve(application_id, &manager));
}

#[test]
fn test_only_applicant_or_admin_cancels() {
    let mut world: World = create_test_world();
    let application_id: i64 = world.submit_covered();
    let manager = world.manager.clone();

    assert_unauthorized(cancel_leave(
        &mut world.persistence,
        &world.config,
        application_id,
        &manager,
        create_test_cause(),
    ));

    let admin = world.admin.clone();
    let cancelled = cancel_leave(
        &mut world.persistence,
        &world.config,
        application_id,
        &admin,
        create_test_cause(),
    )
    .unwrap();
    assert_eq!(cancelled.response.application.status, "cancelled");
}

#[test]
fn test_view_is_limited_to_owner_and_approvers() {
    let mut world: World = create_test_world();
    let application_id: i64 = world.submit_covered();

    let colleague = world.free_colleague.clone();
    let foreign = world.foreign_manager.clone();
    assert_unauthorized(get_application(&mut world.persistence, application_id, &colleague));
    assert_unauthorized(get_application(&mut world.persistence, application_id, &foreign));

    for viewer in [
        world.applicant.clone(),
        world.manager.clone(),
        world.authority.clone(),
        world.admin.clone(),
    ] {
        assert!(get_application(&mut world.persistence, application_id, &viewer).is_ok());
    }
}
