// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Leave application queries.
//!
//! An application is stored across three tables: the application row,
//! its per-month allocations, and its substitute assignments. The
//! functions here reassemble the full `LeaveApplication`.

use diesel::SqliteConnection;
use diesel::prelude::*;
use leave_desk_domain::{
    ApplicantType, ApprovalStage, DateRange, DomainError, LeaveApplication, LeaveDayCalculation,
    LeaveSplit, LeaveStatus, LeaveType, MonthAllocation, StaffLeave, SubstituteAssignment,
    SubstituteBooking,
};
use tracing::debug;

use crate::convert::{count_value, month_value, parse_date, parse_weekday};
use crate::data_models::ApplicationFilter;
use crate::diesel_schema::{leave_application_months, leave_applications, substitute_assignments};
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = leave_applications)]
struct ApplicationRow {
    application_id: i64,
    applicant_id: i64,
    applicant_type: String,
    institution_id: i64,
    start_date: String,
    end_date: String,
    leave_type: String,
    reason: String,
    total_calendar_days: i32,
    weekends_in_range: i32,
    holidays_in_range: i32,
    total_days: i32,
    paid_days: i32,
    lop_days: i32,
    status: String,
    approval_stage: Option<String>,
    management_approved_by: Option<i64>,
    final_approved_by: Option<i64>,
    rejected_by: Option<i64>,
    rejection_reason: Option<String>,
    cancelled_by: Option<i64>,
    version: i64,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = leave_application_months)]
struct MonthRow {
    year: i32,
    month: i32,
    chargeable_days: i32,
    paid_days: i32,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = substitute_assignments)]
struct AssignmentRow {
    original_staff_id: i64,
    substitute_staff_id: Option<i64>,
    institution_id: i64,
    slot_date: String,
    day_of_week: i32,
    period_id: i64,
    class_id: i64,
    subject: String,
    room: Option<String>,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = substitute_assignments)]
struct BookingRow {
    application_id: i64,
    substitute_staff_id: Option<i64>,
    institution_id: i64,
    slot_date: String,
    period_id: i64,
}

fn malformed(err: DomainError) -> PersistenceError {
    PersistenceError::ReconstructionError(err.to_string())
}

fn live_statuses() -> [&'static str; 2] {
    [LeaveStatus::Pending.as_str(), LeaveStatus::Approved.as_str()]
}

fn load_months(
    conn: &mut SqliteConnection,
    application_id: i64,
) -> Result<Vec<MonthAllocation>, PersistenceError> {
    let rows: Vec<MonthRow> = leave_application_months::table
        .filter(leave_application_months::application_id.eq(application_id))
        .order((
            leave_application_months::year.asc(),
            leave_application_months::month.asc(),
        ))
        .select(MonthRow::as_select())
        .load::<MonthRow>(conn)?;

    rows.into_iter()
        .map(|row| {
            Ok(MonthAllocation {
                year: row.year,
                month: month_value(row.month)?,
                chargeable_days: count_value(row.chargeable_days, "chargeable_days")?,
                paid_days: count_value(row.paid_days, "paid_days")?,
            })
        })
        .collect()
}

fn load_assignments(
    conn: &mut SqliteConnection,
    application_id: i64,
) -> Result<Vec<SubstituteAssignment>, PersistenceError> {
    let rows: Vec<AssignmentRow> = substitute_assignments::table
        .filter(substitute_assignments::application_id.eq(application_id))
        .order(substitute_assignments::assignment_id.asc())
        .select(AssignmentRow::as_select())
        .load::<AssignmentRow>(conn)?;

    rows.into_iter()
        .map(|row| {
            Ok(SubstituteAssignment {
                original_staff_id: row.original_staff_id,
                substitute_staff_id: row.substitute_staff_id,
                institution_id: row.institution_id,
                date: parse_date(&row.slot_date)?,
                day_of_week: parse_weekday(row.day_of_week)?,
                period_id: row.period_id,
                class_id: row.class_id,
                subject: row.subject,
                room: row.room,
            })
        })
        .collect()
}

fn reconstruct(
    conn: &mut SqliteConnection,
    row: ApplicationRow,
) -> Result<LeaveApplication, PersistenceError> {
    let range: DateRange = DateRange::parse(&row.start_date, &row.end_date).map_err(malformed)?;
    let applicant_type: ApplicantType = row.applicant_type.parse().map_err(malformed)?;
    let leave_type: LeaveType = row.leave_type.parse().map_err(malformed)?;
    let status: LeaveStatus = row.status.parse().map_err(malformed)?;
    let approval_stage: Option<ApprovalStage> = row
        .approval_stage
        .as_deref()
        .map(str::parse::<ApprovalStage>)
        .transpose()
        .map_err(malformed)?;

    let total_days: u32 = count_value(row.total_days, "total_days")?;
    let days: LeaveDayCalculation = LeaveDayCalculation {
        total_calendar_days: count_value(row.total_calendar_days, "total_calendar_days")?,
        weekends_in_range: count_value(row.weekends_in_range, "weekends_in_range")?,
        holidays_in_range: count_value(row.holidays_in_range, "holidays_in_range")?,
        actual_leave_days: total_days,
    };
    let split: LeaveSplit = LeaveSplit {
        actual_leave_days: total_days,
        paid_days: count_value(row.paid_days, "paid_days")?,
        lop_days: count_value(row.lop_days, "lop_days")?,
        allocations: load_months(conn, row.application_id)?,
    };

    Ok(LeaveApplication {
        application_id: Some(row.application_id),
        applicant_id: row.applicant_id,
        applicant_type,
        institution_id: row.institution_id,
        range,
        leave_type,
        reason: row.reason,
        days,
        split,
        status,
        approval_stage,
        management_approved_by: row.management_approved_by,
        final_approved_by: row.final_approved_by,
        rejected_by: row.rejected_by,
        rejection_reason: row.rejection_reason,
        cancelled_by: row.cancelled_by,
        substitute_assignments: load_assignments(conn, row.application_id)?,
        version: row.version,
    })
}

/// Retrieves one leave application with its month allocations and
/// substitute assignments.
///
/// # Errors
///
/// Returns `PersistenceError::ApplicationNotFound` if no such application
/// exists, or an error if the stored rows are malformed.
pub fn get_leave_application(
    conn: &mut SqliteConnection,
    application_id: i64,
) -> Result<LeaveApplication, PersistenceError> {
    let row: ApplicationRow = leave_applications::table
        .filter(leave_applications::application_id.eq(application_id))
        .select(ApplicationRow::as_select())
        .first::<ApplicationRow>(conn)
        .optional()?
        .ok_or(PersistenceError::ApplicationNotFound(application_id))?;
    reconstruct(conn, row)
}

/// Lists leave applications matching a filter, newest first.
///
/// # Errors
///
/// Returns an error if the query fails or a row is malformed.
pub fn list_leave_applications(
    conn: &mut SqliteConnection,
    filter: &ApplicationFilter,
) -> Result<Vec<LeaveApplication>, PersistenceError> {
    let mut query = leave_applications::table
        .select(ApplicationRow::as_select())
        .order(leave_applications::application_id.desc())
        .into_boxed();

    if let Some(applicant_id) = filter.applicant_id {
        query = query.filter(leave_applications::applicant_id.eq(applicant_id));
    }
    if let Some(institution_id) = filter.institution_id {
        query = query.filter(leave_applications::institution_id.eq(institution_id));
    }
    if let Some(year) = filter.year {
        query = query
            .filter(leave_applications::start_date.le(format!("{year:04}-12-31")))
            .filter(leave_applications::end_date.ge(format!("{year:04}-01-01")));
    }
    if let Some(status) = filter.status {
        query = query.filter(leave_applications::status.eq(status.as_str()));
    }
    if let Some(applicant_type) = filter.applicant_type {
        query = query.filter(leave_applications::applicant_type.eq(applicant_type.as_str()));
    }

    let rows: Vec<ApplicationRow> = query.load::<ApplicationRow>(conn)?;
    debug!(count = rows.len(), "Listed leave applications");
    rows.into_iter().map(|row| reconstruct(conn, row)).collect()
}

/// Lists the live (pending or approved) leave of an institution's staff.
///
/// # Errors
///
/// Returns an error if the query fails or a row is malformed.
pub fn list_live_leave(
    conn: &mut SqliteConnection,
    institution_id: i64,
) -> Result<Vec<StaffLeave>, PersistenceError> {
    let rows: Vec<(i64, String, String)> = leave_applications::table
        .filter(leave_applications::institution_id.eq(institution_id))
        .filter(leave_applications::status.eq_any(live_statuses()))
        .select((
            leave_applications::applicant_id,
            leave_applications::start_date,
            leave_applications::end_date,
        ))
        .load::<(i64, String, String)>(conn)?;

    rows.into_iter()
        .map(|(staff_id, start, end)| {
            Ok(StaffLeave {
                staff_id,
                range: DateRange::parse(&start, &end).map_err(malformed)?,
            })
        })
        .collect()
}

/// Lists the active substitute bookings at an institution.
///
/// Bookings of rejected or cancelled applications are released and never
/// returned.
///
/// # Errors
///
/// Returns an error if the query fails or a row is malformed.
pub fn list_active_bookings(
    conn: &mut SqliteConnection,
    institution_id: i64,
) -> Result<Vec<SubstituteBooking>, PersistenceError> {
    let rows: Vec<BookingRow> = substitute_assignments::table
        .filter(substitute_assignments::institution_id.eq(institution_id))
        .filter(substitute_assignments::is_active.eq(1))
        .filter(substitute_assignments::substitute_staff_id.is_not_null())
        .select(BookingRow::as_select())
        .load::<BookingRow>(conn)?;

    rows.into_iter()
        .filter_map(|row| {
            row.substitute_staff_id.map(|substitute_staff_id| {
                Ok(SubstituteBooking {
                    application_id: row.application_id,
                    substitute_staff_id,
                    institution_id: row.institution_id,
                    date: parse_date(&row.slot_date)?,
                    period_id: row.period_id,
                })
            })
        })
        .collect()
}
