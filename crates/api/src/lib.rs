// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for Leave Desk.
//!
//! Every operation authenticates and authorizes its actor, validates raw
//! input before touching storage, runs the workflow through the atomic
//! persistence primitives, and translates every lower-level error into an
//! [`ApiError`]. Domain, core and persistence errors never cross this
//! boundary unchanged.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod auth;
mod config;
mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthenticationService, AuthorizationService, Role};
pub use config::{ConfigError, LeaveConfig, parse_weekday_name};
pub use error::{
    ALREADY_DECIDED, ApiError, AuthError, translate_core_error, translate_domain_error,
    translate_persistence_error,
};
pub use handlers::{
    ApiResult, add_holiday, add_period, add_timetable_entry, approve_leave, cancel_leave,
    get_affected_slots, get_application, get_application_history, get_available_substitutes,
    get_balance, list_active_staff, list_applications, list_holidays, list_periods,
    preview_leave_calculation, register_staff, reject_leave, set_staff_active, submit_leave,
};
pub use request_response::{
    AddHolidayRequest, AddPeriodRequest, AddTimetableEntryRequest, AffectedSlotsRequest,
    AffectedSlotsResponse, ApplicationHistoryResponse, ApplicationInfo, AuditEventInfo,
    AvailableSubstitutesRequest, AvailableSubstitutesResponse, BalanceResponse, GetBalanceRequest,
    HolidayDate, HolidayInfo, LeaveApplicationResponse, ListApplicationsRequest,
    ListApplicationsResponse, ListHolidaysRequest, ListHolidaysResponse, ListPeriodsResponse,
    ListStaffResponse, PeriodResponse, PreviewLeaveRequest, PreviewLeaveResponse,
    RegisterStaffRequest, RejectLeaveRequest, SetStaffActiveRequest, SlotSelectionRequest,
    StaffInfo, SubmitLeaveRequest, TimetableEntryResponse,
};
