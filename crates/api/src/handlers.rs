// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for state-changing and read-only operations.

use std::str::FromStr;

use leave_desk::{
    Command, LeaveRequest, SubmissionResult, TransitionResult, apply, apply_submission,
};
use leave_desk_audit::{Actor, AuditEvent, Cause};
use leave_desk_domain::{
    AffectedSlot, ApplicantType, ApprovalStage, AvailableSubstitute, BalancePolicy, DateRange, DomainError, Holiday,
    LeaveApplication, LeaveBalance, LeaveDayCalculation, LeaveSplit, LeaveStatus, LeaveType,
    MonthAllocation, NonWorkingDays, Period, Scope, SlotSelection, StaffMember,
    SubstituteAvailability, TimetableEntry, allocate_paid_days, calculate_leave_days,
    chargeable_dates, find_affected_slots, group_by_month, parse_iso_date,
    validate_leave_request, validate_month, validate_period, validate_range_length,
    validate_staff_member, weekday_from_number,
};
use leave_desk_persistence::{ApplicationFilter, Persistence, PersistenceError};
use time::{Date, Weekday};
use tracing::{debug, info, warn};

use crate::auth::{AuthenticatedActor, AuthorizationService, Role};
use crate::config::LeaveConfig;
use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::request_response::{
    AddHolidayRequest, AddPeriodRequest, AddTimetableEntryRequest, AffectedSlotsRequest,
    AffectedSlotsResponse, ApplicationHistoryResponse, ApplicationInfo, AuditEventInfo,
    AvailableSubstitutesRequest, AvailableSubstitutesResponse, BalanceResponse, GetBalanceRequest,
    HolidayDate, HolidayInfo, LeaveApplicationResponse, ListApplicationsRequest,
    ListApplicationsResponse, ListHolidaysRequest, ListHolidaysResponse, ListPeriodsResponse,
    ListStaffResponse, PeriodResponse, PreviewLeaveRequest, PreviewLeaveResponse,
    RegisterStaffRequest, RejectLeaveRequest, SetStaffActiveRequest, StaffInfo,
    SubmitLeaveRequest, TimetableEntryResponse,
};

/// The response of a workflow operation together with the audit event it wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResult<T> {
    /// The API response.
    pub response: T,
    /// The audit event generated by this operation.
    pub audit_event: AuditEvent,
}

/// Logs a refused operation and translates the error.
fn refused(operation: &str, err: PersistenceError) -> ApiError {
    warn!(operation, error = %err, "Leave operation refused");
    translate_persistence_error(err)
}

fn invalid_input(operation: &str, err: DomainError) -> ApiError {
    warn!(operation, error = %err, "Invalid input");
    translate_domain_error(err)
}

/// Parses an optional pair of ISO dates into a range.
///
/// Returns `None` unless both ends are present. A present range must not
/// exceed the longest accepted span.
fn parse_optional_range(
    start: Option<&str>,
    end: Option<&str>,
) -> Result<Option<DateRange>, DomainError> {
    match (start, end) {
        (Some(start), Some(end)) => {
            let range: DateRange = DateRange::parse(start, end)?;
            validate_range_length(&range)?;
            Ok(Some(range))
        }
        _ => Ok(None),
    }
}

fn require_range(start: Option<&str>, end: Option<&str>) -> Result<DateRange, DomainError> {
    parse_optional_range(start, end)?.ok_or(DomainError::MissingDateRange)
}

// ============================================================================
// Workflow
// ============================================================================

/// Submits a leave application.
///
/// This function:
/// - Verifies the actor may submit for the applicant
/// - Validates the range and reason before touching persistence
/// - Re-checks every chosen substitute inside the submission transaction
/// - Returns the pending application with its audit event
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `config` - Ledger, weekend and validation settings
/// * `request` - The API request
/// * `authenticated_actor` - The authenticated actor performing this action
/// * `cause` - The cause or reason for this action
///
/// # Errors
///
/// Returns an error if:
/// - The actor is neither the applicant nor an Admin
/// - The range is missing or inverted, or the reason is too short
/// - An affected slot has no selection
/// - A chosen substitute is busy (`SubstituteConflict`)
/// - Calendar, timetable or directory data is unavailable
pub fn submit_leave(
    persistence: &mut Persistence,
    config: &LeaveConfig,
    request: &SubmitLeaveRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<ApiResult<LeaveApplicationResponse>, ApiError> {
    const OPERATION: &str = "submit_leave";
    AuthorizationService::authorize_submit(authenticated_actor, request.applicant_id)?;

    let leave_type: LeaveType =
        LeaveType::from_str(&request.leave_type).map_err(|e| invalid_input(OPERATION, e))?;
    let range: DateRange = parse_optional_range(
        request.start_date.as_deref(),
        request.end_date.as_deref(),
    )
    .and_then(|range| validate_leave_request(range, &request.reason, config.min_reason_length))
    .map_err(|e| invalid_input(OPERATION, e))?;

    let selections: Vec<SlotSelection> = request
        .selections
        .iter()
        .map(|s| {
            Ok(SlotSelection {
                date: parse_iso_date(&s.date)?,
                period_id: s.period_id,
                choice: s.choice,
            })
        })
        .collect::<Result<_, DomainError>>()
        .map_err(|e| invalid_input(OPERATION, e))?;

    let actor: Actor = authenticated_actor.to_audit_actor();
    let submitted: SubmissionResult = persistence
        .submit_leave_application(
            request.applicant_id,
            &range,
            &config.context_settings(),
            |applicant, context| {
                let leave_request: LeaveRequest = LeaveRequest {
                    applicant: applicant.clone(),
                    range: Some(range),
                    leave_type,
                    reason: request.reason.clone(),
                    selections,
                };
                apply_submission(&leave_request, context, actor, cause)
            },
        )
        .map_err(|e| refused(OPERATION, e))?;

    let application: &LeaveApplication = &submitted.application;
    Ok(ApiResult {
        response: LeaveApplicationResponse {
            application: ApplicationInfo::from(application),
            message: format!(
                "Submitted leave application {}: {} chargeable days ({} paid, {} loss of pay)",
                application.application_id.unwrap_or_default(),
                application.total_days(),
                application.paid_days(),
                application.lop_days()
            ),
        },
        audit_event: submitted.audit_event,
    })
}

/// Runs a decision through the atomic transition primitive.
fn decide(
    persistence: &mut Persistence,
    config: &LeaveConfig,
    application_id: i64,
    command: &Command,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
    operation: &str,
) -> Result<TransitionResult, ApiError> {
    let actor: Actor = authenticated_actor.to_audit_actor();
    let policy: BalancePolicy = config.balance_policy;
    let result: TransitionResult = persistence
        .transition_leave_application(application_id, |application, context| {
            apply(application, context, command, &policy, actor, cause)
        })
        .map_err(|e| refused(operation, e))?;

    info!(
        application_id,
        actor_id = authenticated_actor.id,
        status = %result.application.status,
        operation,
        "Leave application transitioned"
    );
    Ok(result)
}

fn load_application(
    persistence: &mut Persistence,
    application_id: i64,
) -> Result<LeaveApplication, ApiError> {
    persistence
        .get_leave_application(application_id)
        .map_err(translate_persistence_error)
}

fn transition_response(result: TransitionResult, message: String) -> ApiResult<LeaveApplicationResponse> {
    ApiResult {
        response: LeaveApplicationResponse {
            application: ApplicationInfo::from(&result.application),
            message,
        },
        audit_event: result.audit_event,
    }
}

/// Approves a pending application at the actor's approval stage.
///
/// The final approval re-derives the paid/LOP split from the current
/// ledger and consumes it in the same transaction. Of two concurrent
/// approvals, exactly one succeeds.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `config` - Ledger settings
/// * `application_id` - The application to approve
/// * `authenticated_actor` - The approver
/// * `cause` - The cause or reason for this action
///
/// # Errors
///
/// Returns an error if:
/// - The actor holds no approving role for this application
/// - The application is not pending at the actor's stage (`InvalidStateTransition`)
/// - A booked substitute can no longer cover their class (`SubstituteConflict`)
pub fn approve_leave(
    persistence: &mut Persistence,
    config: &LeaveConfig,
    application_id: i64,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<ApiResult<LeaveApplicationResponse>, ApiError> {
    let current: LeaveApplication = load_application(persistence, application_id)?;
    let stage: ApprovalStage =
        AuthorizationService::authorize_decision(authenticated_actor, &current, "approve_leave")?;

    let command: Command = Command::Approve {
        approver_id: authenticated_actor.id,
        stage,
    };
    let result: TransitionResult = decide(
        persistence,
        config,
        application_id,
        &command,
        authenticated_actor,
        cause,
        "approve_leave",
    )?;

    let message: String = match result.application.approval_stage {
        Some(next) => format!("Approved at {stage}; awaiting {next}"),
        None => format!(
            "Approved: {} paid, {} loss of pay",
            result.application.paid_days(),
            result.application.lop_days()
        ),
    };
    Ok(transition_response(result, message))
}

/// Rejects a pending application.
///
/// # Errors
///
/// Returns an error if:
/// - The actor holds no approving role for this application
/// - The application is not pending at the actor's stage (`InvalidStateTransition`)
/// - The reason is blank
pub fn reject_leave(
    persistence: &mut Persistence,
    config: &LeaveConfig,
    application_id: i64,
    request: &RejectLeaveRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<ApiResult<LeaveApplicationResponse>, ApiError> {
    let current: LeaveApplication = load_application(persistence, application_id)?;
    let stage: ApprovalStage =
        AuthorizationService::authorize_decision(authenticated_actor, &current, "reject_leave")?;

    let command: Command = Command::Reject {
        rejector_id: authenticated_actor.id,
        stage,
        reason: request.reason.clone(),
    };
    let result: TransitionResult = decide(
        persistence,
        config,
        application_id,
        &command,
        authenticated_actor,
        cause,
        "reject_leave",
    )?;

    Ok(transition_response(
        result,
        format!("Rejected leave application {application_id}"),
    ))
}

/// Cancels a pending or approved application.
///
/// Cancelling an approved application restores every paid day it consumed
/// and releases its substitute bookings.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is neither the applicant nor an Admin
/// - The application is already rejected or cancelled (`InvalidStateTransition`)
pub fn cancel_leave(
    persistence: &mut Persistence,
    config: &LeaveConfig,
    application_id: i64,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<ApiResult<LeaveApplicationResponse>, ApiError> {
    let current: LeaveApplication = load_application(persistence, application_id)?;
    AuthorizationService::authorize_cancel(authenticated_actor, &current)?;

    let command: Command = Command::Cancel {
        requester_id: authenticated_actor.id,
    };
    let result: TransitionResult = decide(
        persistence,
        config,
        application_id,
        &command,
        authenticated_actor,
        cause,
        "cancel_leave",
    )?;

    let message: String = if current.status == LeaveStatus::Approved {
        format!(
            "Cancelled leave application {application_id}; {} paid days restored",
            current.paid_days()
        )
    } else {
        format!("Cancelled leave application {application_id}")
    };
    Ok(transition_response(result, message))
}

// ============================================================================
// Reads
// ============================================================================

/// Previews the day count of a range, and optionally the paid/LOP split.
///
/// Nothing is stored; ledger months without a record report the opening
/// balance. Without a range every count is zero.
///
/// # Errors
///
/// Returns an error if:
/// - The range is malformed, inverted or too long
/// - A named applicant does not exist or may not be viewed by the actor
/// - Calendar data is unavailable
pub fn preview_leave_calculation(
    persistence: &mut Persistence,
    config: &LeaveConfig,
    request: &PreviewLeaveRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<PreviewLeaveResponse, ApiError> {
    let range: Option<DateRange> =
        parse_optional_range(request.start_date.as_deref(), request.end_date.as_deref())
            .map_err(|e| invalid_input("preview_leave_calculation", e))?;

    let applicant: Option<StaffMember> = match request.applicant_id {
        Some(applicant_id) => {
            let member: StaffMember = persistence
                .get_staff(applicant_id)
                .map_err(translate_persistence_error)?;
            AuthorizationService::authorize_view(
                authenticated_actor,
                member.staff_id,
                member.institution_id,
            )?;
            Some(member)
        }
        None => None,
    };

    let Some(range) = range else {
        debug!("Previewed leave calculation without a range");
        return Ok(PreviewLeaveResponse {
            calculation: calculate_leave_days(None, &NonWorkingDays::default()),
            weekend_dates: Vec::new(),
            holidays: Vec::new(),
            split: None,
        });
    };

    let scope: Scope = Scope::from_institution(
        request
            .institution_id
            .or_else(|| applicant.as_ref().map(|a| a.institution_id)),
    );
    let non_working: NonWorkingDays = persistence
        .resolve_non_working_days(scope, &range, &config.weekend_rule)
        .map_err(translate_persistence_error)?;
    let calculation: LeaveDayCalculation = calculate_leave_days(Some(&range), &non_working);

    let split: Option<LeaveSplit> = match &applicant {
        Some(member) => {
            let months: Vec<MonthAllocation> =
                group_by_month(&chargeable_dates(&range, &non_working));
            let mut balances: Vec<LeaveBalance> = Vec::with_capacity(months.len());
            for month in &months {
                balances.push(
                    persistence
                        .get_balance(member.staff_id, month.year, month.month, &config.balance_policy)
                        .map_err(translate_persistence_error)?,
                );
            }
            Some(allocate_paid_days(&months, &balances, &config.balance_policy))
        }
        None => None,
    };

    let holidays: Vec<HolidayDate> = non_working
        .holidays
        .iter()
        .filter(|date| !non_working.is_weekend(**date))
        .map(|date| HolidayDate {
            date: date.to_string(),
            name: non_working
                .holiday_names
                .get(date)
                .cloned()
                .unwrap_or_default(),
        })
        .collect();

    debug!(
        start = %range.start(),
        end = %range.end(),
        actual_leave_days = calculation.actual_leave_days,
        "Previewed leave calculation"
    );

    Ok(PreviewLeaveResponse {
        calculation,
        weekend_dates: non_working.weekends.iter().map(Date::to_string).collect(),
        holidays,
        split,
    })
}

/// Returns an applicant's balance for a month.
///
/// # Errors
///
/// Returns an error if the month is invalid, the applicant does not exist,
/// or the actor may not view the applicant.
pub fn get_balance(
    persistence: &mut Persistence,
    config: &LeaveConfig,
    request: &GetBalanceRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<BalanceResponse, ApiError> {
    let month: u8 = validate_month(request.month).map_err(|e| invalid_input("get_balance", e))?;
    let member: StaffMember = persistence
        .get_staff(request.applicant_id)
        .map_err(translate_persistence_error)?;
    AuthorizationService::authorize_view(
        authenticated_actor,
        member.staff_id,
        member.institution_id,
    )?;

    let balance: LeaveBalance = persistence
        .get_balance(
            member.staff_id,
            request.year,
            month,
            &config.balance_policy,
        )
        .map_err(translate_persistence_error)?;
    Ok(BalanceResponse::from(&balance))
}

/// Lists the applicant's teaching slots that a range affects.
///
/// # Errors
///
/// Returns an error if the range is missing, the applicant does not exist
/// or may not be viewed, or calendar or timetable data is unavailable.
pub fn get_affected_slots(
    persistence: &mut Persistence,
    config: &LeaveConfig,
    request: &AffectedSlotsRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<AffectedSlotsResponse, ApiError> {
    let range: DateRange = require_range(request.start_date.as_deref(), request.end_date.as_deref())
        .map_err(|e| invalid_input("get_affected_slots", e))?;
    let member: StaffMember = persistence
        .get_staff(request.applicant_id)
        .map_err(translate_persistence_error)?;
    AuthorizationService::authorize_view(
        authenticated_actor,
        member.staff_id,
        member.institution_id,
    )?;

    let non_working: NonWorkingDays = persistence
        .resolve_non_working_days(
            Scope::Institution(member.institution_id),
            &range,
            &config.weekend_rule,
        )
        .map_err(translate_persistence_error)?;
    let timetable: Vec<TimetableEntry> = persistence
        .get_recurring_assignments(member.staff_id)
        .map_err(translate_persistence_error)?;

    let slots: Vec<AffectedSlot> =
        find_affected_slots(&timetable, member.institution_id, &range, &non_working);
    Ok(AffectedSlotsResponse { slots })
}

/// Lists the colleagues who could cover a period, busy ones included.
///
/// # Errors
///
/// Returns an error if neither a date nor a weekday is given, if they
/// disagree, if the applicant does not exist or may not be viewed, or if
/// directory or timetable data is unavailable.
pub fn get_available_substitutes(
    persistence: &mut Persistence,
    request: &AvailableSubstitutesRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<AvailableSubstitutesResponse, ApiError> {
    const OPERATION: &str = "get_available_substitutes";
    let date: Option<Date> = request
        .date
        .as_deref()
        .map(parse_iso_date)
        .transpose()
        .map_err(|e| invalid_input(OPERATION, e))?;
    let numbered: Option<Weekday> = request
        .day_of_week
        .map(weekday_from_number)
        .transpose()
        .map_err(|e| invalid_input(OPERATION, e))?;

    let day_of_week: Weekday = match (date, numbered) {
        (Some(date), Some(day)) if date.weekday() != day => {
            return Err(ApiError::InvalidInput {
                field: String::from("day_of_week"),
                message: format!("{date} is a {}, not a {day}", date.weekday()),
            });
        }
        (Some(date), _) => date.weekday(),
        (None, Some(day)) => day,
        (None, None) => {
            return Err(ApiError::InvalidInput {
                field: String::from("date"),
                message: String::from("Either a date or a day of week is required"),
            });
        }
    };

    let member: StaffMember = persistence
        .get_staff(request.applicant_id)
        .map_err(translate_persistence_error)?;
    AuthorizationService::authorize_view(
        authenticated_actor,
        member.staff_id,
        member.institution_id,
    )?;

    let availability: SubstituteAvailability = persistence
        .load_substitute_availability(member.institution_id)
        .map_err(translate_persistence_error)?;
    let candidates: Vec<AvailableSubstitute> =
        availability.candidates_for(day_of_week, request.period_id, date, member.staff_id);
    Ok(AvailableSubstitutesResponse { candidates })
}

/// Lists leave applications.
///
/// Applicants only see their own applications and institution management
/// only its institution; the filter is narrowed accordingly.
///
/// # Errors
///
/// Returns an error if a filter value is invalid or asks for data the
/// actor may not view.
pub fn list_applications(
    persistence: &mut Persistence,
    request: &ListApplicationsRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<ListApplicationsResponse, ApiError> {
    const OPERATION: &str = "list_applications";
    let status: Option<LeaveStatus> = request
        .status
        .as_deref()
        .map(LeaveStatus::from_str)
        .transpose()
        .map_err(|e| invalid_input(OPERATION, e))?;
    let applicant_type: Option<ApplicantType> = request
        .applicant_type
        .as_deref()
        .map(ApplicantType::from_str)
        .transpose()
        .map_err(|e| invalid_input(OPERATION, e))?;

    let mut filter: ApplicationFilter = ApplicationFilter {
        applicant_id: request.applicant_id,
        institution_id: request.institution_id,
        year: request.year,
        status,
        applicant_type,
    };

    match authenticated_actor.role {
        Role::Applicant => {
            if filter.applicant_id.is_some_and(|id| id != authenticated_actor.id) {
                return Err(ApiError::Unauthorized {
                    action: String::from(OPERATION),
                    required_role: String::from("the applicant"),
                });
            }
            filter.applicant_id = Some(authenticated_actor.id);
        }
        Role::InstitutionManagement => {
            if filter.institution_id.is_some()
                && filter.institution_id != authenticated_actor.institution_id
            {
                return Err(ApiError::Unauthorized {
                    action: String::from(OPERATION),
                    required_role: String::from("InstitutionManagement of that institution"),
                });
            }
            filter.institution_id = authenticated_actor.institution_id;
        }
        Role::FinalAuthority | Role::Admin => {}
    }

    let applications: Vec<LeaveApplication> = persistence
        .list_leave_applications(&filter)
        .map_err(translate_persistence_error)?;
    debug!(count = applications.len(), "Listed leave applications");

    Ok(ListApplicationsResponse {
        applications: applications.iter().map(ApplicationInfo::from).collect(),
    })
}

/// Retrieves one leave application.
///
/// # Errors
///
/// Returns an error if the application does not exist or may not be viewed.
pub fn get_application(
    persistence: &mut Persistence,
    application_id: i64,
    authenticated_actor: &AuthenticatedActor,
) -> Result<ApplicationInfo, ApiError> {
    let application: LeaveApplication = load_application(persistence, application_id)?;
    AuthorizationService::authorize_view(
        authenticated_actor,
        application.applicant_id,
        application.institution_id,
    )?;
    Ok(ApplicationInfo::from(&application))
}

/// Retrieves the audit trail of an application, oldest first.
///
/// # Errors
///
/// Returns an error if the application does not exist or may not be viewed.
pub fn get_application_history(
    persistence: &mut Persistence,
    application_id: i64,
    authenticated_actor: &AuthenticatedActor,
) -> Result<ApplicationHistoryResponse, ApiError> {
    let application: LeaveApplication = load_application(persistence, application_id)?;
    AuthorizationService::authorize_view(
        authenticated_actor,
        application.applicant_id,
        application.institution_id,
    )?;

    let events: Vec<AuditEvent> = persistence
        .get_application_history(application_id)
        .map_err(translate_persistence_error)?;
    Ok(ApplicationHistoryResponse {
        application_id,
        events: events.iter().map(AuditEventInfo::from).collect(),
    })
}

// ============================================================================
// Reference data
// ============================================================================

/// Registers a staff member. Admin only.
///
/// # Errors
///
/// Returns an error if the actor is not an Admin, the name is blank, or the
/// applicant type is unknown.
pub fn register_staff(
    persistence: &mut Persistence,
    request: &RegisterStaffRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<StaffInfo, ApiError> {
    AuthorizationService::authorize_reference_data(authenticated_actor, "register_staff")?;

    let applicant_type: ApplicantType = ApplicantType::from_str(&request.applicant_type)
        .map_err(|e| invalid_input("register_staff", e))?;
    let member: StaffMember = StaffMember {
        staff_id: 0,
        institution_id: request.institution_id,
        name: request.name.trim().to_string(),
        applicant_type,
        is_active: true,
    };
    validate_staff_member(&member).map_err(|e| invalid_input("register_staff", e))?;

    let stored: StaffMember = persistence
        .register_staff(&member)
        .map_err(translate_persistence_error)?;
    info!(
        staff_id = stored.staff_id,
        institution_id = stored.institution_id,
        "Registered staff member"
    );
    Ok(StaffInfo::from(&stored))
}

/// Activates or deactivates a staff member. Admin only.
///
/// Inactive staff cannot apply for leave and are never offered as substitutes.
///
/// # Errors
///
/// Returns an error if the actor is not an Admin or the staff member does not exist.
pub fn set_staff_active(
    persistence: &mut Persistence,
    request: &SetStaffActiveRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<StaffInfo, ApiError> {
    AuthorizationService::authorize_reference_data(authenticated_actor, "set_staff_active")?;
    persistence
        .set_staff_active(request.staff_id, request.is_active)
        .map_err(translate_persistence_error)?;
    let member: StaffMember = persistence
        .get_staff(request.staff_id)
        .map_err(translate_persistence_error)?;
    info!(
        staff_id = member.staff_id,
        is_active = member.is_active,
        "Updated staff status"
    );
    Ok(StaffInfo::from(&member))
}

/// Lists the active staff of an institution.
///
/// # Errors
///
/// Returns a dependency error if the directory cannot be read.
pub fn list_active_staff(
    persistence: &mut Persistence,
    institution_id: i64,
) -> Result<ListStaffResponse, ApiError> {
    let staff: Vec<StaffMember> = persistence
        .list_active_staff(institution_id)
        .map_err(translate_persistence_error)?;
    Ok(ListStaffResponse {
        staff: staff.iter().map(StaffInfo::from).collect(),
    })
}

/// Adds a teaching period. Admin only.
///
/// # Errors
///
/// Returns an error if the actor is not an Admin, the label is blank, or
/// the label is already used at the institution.
pub fn add_period(
    persistence: &mut Persistence,
    request: &AddPeriodRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<PeriodResponse, ApiError> {
    AuthorizationService::authorize_reference_data(authenticated_actor, "add_period")?;

    let period: Period = Period {
        period_id: 0,
        institution_id: request.institution_id,
        label: request.label.trim().to_string(),
        display_order: request.display_order,
    };
    validate_period(&period).map_err(|e| invalid_input("add_period", e))?;

    let stored: Period = persistence
        .add_period(&period)
        .map_err(translate_persistence_error)?;
    info!(
        period_id = stored.period_id,
        institution_id = stored.institution_id,
        "Added period"
    );
    Ok(PeriodResponse { period: stored })
}

/// Lists an institution's periods in display order.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_periods(
    persistence: &mut Persistence,
    institution_id: i64,
) -> Result<ListPeriodsResponse, ApiError> {
    let periods: Vec<Period> = persistence
        .list_periods(institution_id)
        .map_err(translate_persistence_error)?;
    Ok(ListPeriodsResponse { periods })
}

/// Adds a recurring timetable entry. Admin only.
///
/// # Errors
///
/// Returns an error if the actor is not an Admin, the weekday is invalid,
/// the subject is blank, the staff member or period does not exist, or
/// they belong to different institutions.
pub fn add_timetable_entry(
    persistence: &mut Persistence,
    request: &AddTimetableEntryRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<TimetableEntryResponse, ApiError> {
    const OPERATION: &str = "add_timetable_entry";
    AuthorizationService::authorize_reference_data(authenticated_actor, OPERATION)?;

    let day_of_week: Weekday =
        weekday_from_number(request.day_of_week).map_err(|e| invalid_input(OPERATION, e))?;
    if request.subject.trim().is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("subject"),
            message: String::from("Subject cannot be empty"),
        });
    }

    let entry: TimetableEntry = TimetableEntry {
        staff_id: request.staff_id,
        institution_id: 0,
        day_of_week,
        period_id: request.period_id,
        period_order: 0,
        class_id: request.class_id,
        subject: request.subject.trim().to_string(),
        room: request.room.clone(),
    };
    let stored: TimetableEntry = persistence
        .add_timetable_entry(&entry)
        .map_err(translate_persistence_error)?;
    info!(
        staff_id = stored.staff_id,
        period_id = stored.period_id,
        day_of_week = %stored.day_of_week,
        "Added timetable entry"
    );
    Ok(TimetableEntryResponse { entry: stored })
}

/// Adds a company or institution holiday. Admin only.
///
/// # Errors
///
/// Returns an error if the actor is not an Admin, the date is invalid, or
/// the name is blank.
pub fn add_holiday(
    persistence: &mut Persistence,
    request: &AddHolidayRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<HolidayInfo, ApiError> {
    AuthorizationService::authorize_reference_data(authenticated_actor, "add_holiday")?;

    let date: Date = parse_iso_date(&request.date).map_err(|e| invalid_input("add_holiday", e))?;
    if request.name.trim().is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("name"),
            message: String::from("Holiday name cannot be empty"),
        });
    }

    let holiday: Holiday = Holiday::new(
        date,
        request.name.trim().to_string(),
        Scope::from_institution(request.institution_id),
    );
    let holiday_id: i64 = persistence
        .add_holiday(&holiday)
        .map_err(translate_persistence_error)?;
    info!(holiday_id, date = %date, "Added holiday");

    Ok(HolidayInfo {
        holiday_id: Some(holiday_id),
        ..HolidayInfo::from(&holiday)
    })
}

/// Lists the holidays visible to a calendar scope in a year.
///
/// An institution scope includes company holidays.
///
/// # Errors
///
/// Returns a dependency error if the calendar cannot be read.
pub fn list_holidays(
    persistence: &mut Persistence,
    request: &ListHolidaysRequest,
) -> Result<ListHolidaysResponse, ApiError> {
    let holidays: Vec<Holiday> = persistence
        .list_holidays(Scope::from_institution(request.institution_id), request.year)
        .map_err(translate_persistence_error)?;
    Ok(ListHolidaysResponse {
        holidays: holidays.iter().map(HolidayInfo::from).collect(),
    })
}
