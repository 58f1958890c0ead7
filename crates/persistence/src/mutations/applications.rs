// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Leave application writes.

use diesel::SqliteConnection;
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use leave_desk_domain::{LeaveApplication, MonthAllocation, SubstituteAssignment};
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::convert::{count_column, date_text, weekday_number};
use crate::diesel_schema::{leave_application_months, leave_applications, substitute_assignments};
use crate::error::PersistenceError;

/// Inserts a new application with its month allocations and substitute
/// assignments.
///
/// # Returns
///
/// The application id assigned by the database.
///
/// # Errors
///
/// Returns `PersistenceError::SubstituteAlreadyBooked` if an assignment
/// collides with an active booking, or an error if any insert fails.
pub fn insert_application(
    conn: &mut SqliteConnection,
    application: &LeaveApplication,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(leave_applications::table)
        .values((
            leave_applications::applicant_id.eq(application.applicant_id),
            leave_applications::applicant_type.eq(application.applicant_type.as_str()),
            leave_applications::institution_id.eq(application.institution_id),
            leave_applications::start_date.eq(date_text(application.range.start())),
            leave_applications::end_date.eq(date_text(application.range.end())),
            leave_applications::leave_type.eq(application.leave_type.as_str()),
            leave_applications::reason.eq(&application.reason),
            leave_applications::total_calendar_days
                .eq(count_column(application.days.total_calendar_days)?),
            leave_applications::weekends_in_range
                .eq(count_column(application.days.weekends_in_range)?),
            leave_applications::holidays_in_range
                .eq(count_column(application.days.holidays_in_range)?),
            leave_applications::total_days.eq(count_column(application.total_days())?),
            leave_applications::paid_days.eq(count_column(application.paid_days())?),
            leave_applications::lop_days.eq(count_column(application.lop_days())?),
            leave_applications::status.eq(application.status.as_str()),
            leave_applications::approval_stage.eq(application.approval_stage.map(|s| s.as_str())),
            leave_applications::version.eq(application.version),
        ))
        .execute(conn)?;

    let application_id: i64 = conn.get_last_insert_rowid()?;

    replace_month_allocations(conn, application_id, &application.split.allocations)?;
    for assignment in &application.substitute_assignments {
        insert_assignment(conn, application_id, assignment)?;
    }

    info!(
        application_id,
        applicant_id = application.applicant_id,
        slots = application.substitute_assignments.len(),
        "Inserted leave application"
    );
    Ok(application_id)
}

fn insert_assignment(
    conn: &mut SqliteConnection,
    application_id: i64,
    assignment: &SubstituteAssignment,
) -> Result<(), PersistenceError> {
    let result: Result<usize, diesel::result::Error> =
        diesel::insert_into(substitute_assignments::table)
            .values((
                substitute_assignments::application_id.eq(application_id),
                substitute_assignments::original_staff_id.eq(assignment.original_staff_id),
                substitute_assignments::substitute_staff_id.eq(assignment.substitute_staff_id),
                substitute_assignments::institution_id.eq(assignment.institution_id),
                substitute_assignments::slot_date.eq(date_text(assignment.date)),
                substitute_assignments::day_of_week.eq(weekday_number(assignment.day_of_week)),
                substitute_assignments::period_id.eq(assignment.period_id),
                substitute_assignments::class_id.eq(assignment.class_id),
                substitute_assignments::subject.eq(&assignment.subject),
                substitute_assignments::room.eq(assignment.room.as_deref()),
                substitute_assignments::is_active.eq(1),
            ))
            .execute(conn);

    match (result, assignment.substitute_staff_id) {
        (Ok(_), _) => Ok(()),
        (
            Err(diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _)),
            Some(substitute_id),
        ) => Err(PersistenceError::SubstituteAlreadyBooked {
            substitute_id,
            date: date_text(assignment.date),
            period_id: assignment.period_id,
        }),
        (Err(err), _) => Err(PersistenceError::from(err)),
    }
}

/// Replaces the stored month allocations of an application.
///
/// # Errors
///
/// Returns an error if the delete or an insert fails.
pub fn replace_month_allocations(
    conn: &mut SqliteConnection,
    application_id: i64,
    allocations: &[MonthAllocation],
) -> Result<(), PersistenceError> {
    diesel::delete(
        leave_application_months::table
            .filter(leave_application_months::application_id.eq(application_id)),
    )
    .execute(conn)?;

    for allocation in allocations {
        diesel::insert_into(leave_application_months::table)
            .values((
                leave_application_months::application_id.eq(application_id),
                leave_application_months::year.eq(allocation.year),
                leave_application_months::month.eq(i32::from(allocation.month)),
                leave_application_months::chargeable_days
                    .eq(count_column(allocation.chargeable_days)?),
                leave_application_months::paid_days.eq(count_column(allocation.paid_days)?),
            ))
            .execute(conn)?;
    }
    Ok(())
}

/// Writes the decision fields of an application if it is still at
/// `expected_version`.
///
/// The new version is taken from `application.version`.
///
/// # Errors
///
/// Returns `PersistenceError::ConcurrentModification` if the stored
/// version differs, or an error if the update fails.
pub fn update_application_guarded(
    conn: &mut SqliteConnection,
    application: &LeaveApplication,
    expected_version: i64,
) -> Result<(), PersistenceError> {
    let application_id: i64 = application.application_id.ok_or_else(|| {
        PersistenceError::NotFound(String::from("application has not been persisted"))
    })?;

    let updated: usize = diesel::update(leave_applications::table)
        .filter(leave_applications::application_id.eq(application_id))
        .filter(leave_applications::version.eq(expected_version))
        .set((
            leave_applications::paid_days.eq(count_column(application.paid_days())?),
            leave_applications::lop_days.eq(count_column(application.lop_days())?),
            leave_applications::status.eq(application.status.as_str()),
            leave_applications::approval_stage.eq(application.approval_stage.map(|s| s.as_str())),
            leave_applications::management_approved_by.eq(application.management_approved_by),
            leave_applications::final_approved_by.eq(application.final_approved_by),
            leave_applications::rejected_by.eq(application.rejected_by),
            leave_applications::rejection_reason.eq(application.rejection_reason.as_deref()),
            leave_applications::cancelled_by.eq(application.cancelled_by),
            leave_applications::version.eq(application.version),
            leave_applications::updated_at.eq(diesel::dsl::sql::<diesel::sql_types::Text>(
                "CURRENT_TIMESTAMP",
            )),
        ))
        .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::ConcurrentModification {
            entity: String::from("leave_application"),
            key: application_id.to_string(),
        });
    }
    debug!(
        application_id,
        version = application.version,
        status = %application.status,
        "Updated leave application"
    );
    Ok(())
}

/// Releases the substitute bookings of an application.
///
/// # Returns
///
/// The number of bookings released.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn release_bookings(
    conn: &mut SqliteConnection,
    application_id: i64,
) -> Result<usize, PersistenceError> {
    let released: usize = diesel::update(substitute_assignments::table)
        .filter(substitute_assignments::application_id.eq(application_id))
        .filter(substitute_assignments::is_active.eq(1))
        .set(substitute_assignments::is_active.eq(0))
        .execute(conn)?;
    debug!(application_id, released, "Released substitute bookings");
    Ok(released)
}
