// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Dates cross the boundary as ISO 8601 strings and enumerations as their
//! snake case names; both are parsed by the handlers.

use leave_desk_audit::AuditEvent;
use leave_desk_domain::{
    AffectedSlot, AvailableSubstitute, Holiday, LeaveApplication, LeaveBalance,
    LeaveDayCalculation, LeaveSplit, MonthAllocation, Period, StaffMember, SubstituteAssignment,
    SubstituteChoice, TimetableEntry,
};
use serde::{Deserialize, Serialize};

// ============================================================================
// Workflow
// ============================================================================

/// The selection for one affected slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSelectionRequest {
    /// The date of the slot (ISO 8601).
    pub date: String,
    pub period_id: i64,
    #[serde(default)]
    pub choice: SubstituteChoice,
}

/// API request to submit a leave application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitLeaveRequest {
    pub applicant_id: i64,
    /// First day of leave (ISO 8601); required.
    pub start_date: Option<String>,
    /// Last day of leave (ISO 8601); required.
    pub end_date: Option<String>,
    /// `sick` or `casual`.
    pub leave_type: String,
    pub reason: String,
    /// One selection per affected slot.
    #[serde(default)]
    pub selections: Vec<SlotSelectionRequest>,
}

/// API request to reject a leave application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectLeaveRequest {
    pub reason: String,
}

/// A leave application as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationInfo {
    pub application_id: i64,
    pub applicant_id: i64,
    pub applicant_type: String,
    pub institution_id: i64,
    pub start_date: String,
    pub end_date: String,
    pub leave_type: String,
    pub reason: String,
    pub total_calendar_days: u32,
    pub weekends_in_range: u32,
    pub holidays_in_range: u32,
    pub total_days: u32,
    pub paid_days: u32,
    pub lop_days: u32,
    pub status: String,
    /// The stage awaiting a decision, while pending.
    pub approval_stage: Option<String>,
    pub management_approved_by: Option<i64>,
    pub final_approved_by: Option<i64>,
    pub rejected_by: Option<i64>,
    pub rejection_reason: Option<String>,
    pub cancelled_by: Option<i64>,
    pub months: Vec<MonthAllocation>,
    pub substitute_assignments: Vec<SubstituteAssignment>,
    pub version: i64,
}

impl From<&LeaveApplication> for ApplicationInfo {
    fn from(application: &LeaveApplication) -> Self {
        Self {
            application_id: application.application_id.unwrap_or_default(),
            applicant_id: application.applicant_id,
            applicant_type: application.applicant_type.to_string(),
            institution_id: application.institution_id,
            start_date: application.range.start().to_string(),
            end_date: application.range.end().to_string(),
            leave_type: application.leave_type.to_string(),
            reason: application.reason.clone(),
            total_calendar_days: application.days.total_calendar_days,
            weekends_in_range: application.days.weekends_in_range,
            holidays_in_range: application.days.holidays_in_range,
            total_days: application.total_days(),
            paid_days: application.paid_days(),
            lop_days: application.lop_days(),
            status: application.status.to_string(),
            approval_stage: application.approval_stage.map(|s| s.to_string()),
            management_approved_by: application.management_approved_by,
            final_approved_by: application.final_approved_by,
            rejected_by: application.rejected_by,
            rejection_reason: application.rejection_reason.clone(),
            cancelled_by: application.cancelled_by,
            months: application.split.allocations.clone(),
            substitute_assignments: application.substitute_assignments.clone(),
            version: application.version,
        }
    }
}

/// API response for a workflow operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveApplicationResponse {
    pub application: ApplicationInfo,
    /// A success message.
    pub message: String,
}

/// API request to list leave applications. Every field narrows the result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListApplicationsRequest {
    pub applicant_id: Option<i64>,
    pub institution_id: Option<i64>,
    /// Calendar year the leave overlaps.
    pub year: Option<i32>,
    pub status: Option<String>,
    pub applicant_type: Option<String>,
}

/// API response listing leave applications, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListApplicationsResponse {
    pub applications: Vec<ApplicationInfo>,
}

/// One entry of an application's audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEventInfo {
    pub actor_id: i64,
    pub actor_role: String,
    pub cause_id: String,
    pub cause_description: String,
    pub action: String,
    pub details: Option<String>,
    pub before: String,
    pub after: String,
}

impl From<&AuditEvent> for AuditEventInfo {
    fn from(event: &AuditEvent) -> Self {
        Self {
            actor_id: event.actor.id,
            actor_role: event.actor.role.clone(),
            cause_id: event.cause.id.clone(),
            cause_description: event.cause.description.clone(),
            action: event.action.name.clone(),
            details: event.action.details.clone(),
            before: event.before.data.clone(),
            after: event.after.data.clone(),
        }
    }
}

/// API response with an application's audit trail, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationHistoryResponse {
    pub application_id: i64,
    pub events: Vec<AuditEventInfo>,
}

// ============================================================================
// Calculation and matching
// ============================================================================

/// API request to preview the day count of a range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewLeaveRequest {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    /// Institution calendar to apply. Defaults to the applicant's institution,
    /// then to the company calendar.
    pub institution_id: Option<i64>,
    /// When given, the paid/LOP split against this applicant's current balance is included.
    pub applicant_id: Option<i64>,
}

/// A holiday as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayInfo {
    pub holiday_id: Option<i64>,
    pub date: String,
    pub name: String,
    /// `None` for company holidays.
    pub institution_id: Option<i64>,
}

impl From<&Holiday> for HolidayInfo {
    fn from(holiday: &Holiday) -> Self {
        Self {
            holiday_id: None,
            date: holiday.date.to_string(),
            name: holiday.name.clone(),
            institution_id: holiday.scope.institution_id(),
        }
    }
}

/// A named non-working date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayDate {
    pub date: String,
    pub name: String,
}

/// API response for a leave day preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewLeaveResponse {
    pub calculation: LeaveDayCalculation,
    /// Weekend dates in the range.
    pub weekend_dates: Vec<String>,
    /// Holidays in the range that are not weekends.
    pub holidays: Vec<HolidayDate>,
    /// Split against the current ledger, if an applicant was named.
    pub split: Option<LeaveSplit>,
}

/// API request for a monthly balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetBalanceRequest {
    pub applicant_id: i64,
    pub year: i32,
    pub month: u8,
}

/// API response for a monthly balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub applicant_id: i64,
    pub year: i32,
    pub month: u8,
    pub credited_days: u32,
    pub used_days: u32,
    pub balance_remaining: u32,
}

impl From<&LeaveBalance> for BalanceResponse {
    fn from(balance: &LeaveBalance) -> Self {
        Self {
            applicant_id: balance.applicant_id,
            year: balance.year,
            month: balance.month,
            credited_days: balance.credited_days,
            used_days: balance.used_days,
            balance_remaining: balance.remaining(),
        }
    }
}

/// API request for the slots a leave range affects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffectedSlotsRequest {
    pub applicant_id: i64,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// API response listing affected slots in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffectedSlotsResponse {
    pub slots: Vec<AffectedSlot>,
}

/// API request for substitute candidates.
///
/// Either `date` or `day_of_week` (1 = Monday .. 7 = Sunday) is required;
/// a date also checks bookings and leave on that day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableSubstitutesRequest {
    pub applicant_id: i64,
    pub period_id: i64,
    pub date: Option<String>,
    pub day_of_week: Option<u8>,
}

/// API response listing candidates, busy ones included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableSubstitutesResponse {
    pub candidates: Vec<AvailableSubstitute>,
}

// ============================================================================
// Reference data
// ============================================================================

/// API request to register a staff member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterStaffRequest {
    pub institution_id: i64,
    pub name: String,
    /// `officer` or `staff`.
    pub applicant_type: String,
}

/// API request to activate or deactivate a staff member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetStaffActiveRequest {
    pub staff_id: i64,
    pub is_active: bool,
}

/// A staff member as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffInfo {
    pub staff_id: i64,
    pub institution_id: i64,
    pub name: String,
    pub applicant_type: String,
    pub is_active: bool,
}

impl From<&StaffMember> for StaffInfo {
    fn from(member: &StaffMember) -> Self {
        Self {
            staff_id: member.staff_id,
            institution_id: member.institution_id,
            name: member.name.clone(),
            applicant_type: member.applicant_type.to_string(),
            is_active: member.is_active,
        }
    }
}

/// API response listing staff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListStaffResponse {
    pub staff: Vec<StaffInfo>,
}

/// API request to add a teaching period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddPeriodRequest {
    pub institution_id: i64,
    pub label: String,
    pub display_order: i32,
}

/// API response for a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodResponse {
    pub period: Period,
}

/// API response listing an institution's periods in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListPeriodsResponse {
    pub periods: Vec<Period>,
}

/// API request to add a recurring timetable entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddTimetableEntryRequest {
    pub staff_id: i64,
    /// 1 = Monday .. 7 = Sunday.
    pub day_of_week: u8,
    pub period_id: i64,
    pub class_id: i64,
    pub subject: String,
    pub room: Option<String>,
}

/// API response for a timetable entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimetableEntryResponse {
    pub entry: TimetableEntry,
}

/// API request to add a holiday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddHolidayRequest {
    pub date: String,
    pub name: String,
    /// `None` adds a company holiday.
    pub institution_id: Option<i64>,
}

/// API request to list holidays of a calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListHolidaysRequest {
    pub year: i32,
    pub institution_id: Option<i64>,
}

/// API response listing holidays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListHolidaysResponse {
    pub holidays: Vec<HolidayInfo>,
}
