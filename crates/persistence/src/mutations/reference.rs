// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reference data maintenance.

use diesel::SqliteConnection;
use diesel::prelude::*;
use leave_desk_domain::{Holiday, Period, StaffMember, TimetableEntry};
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::convert::{date_text, flag_column, weekday_number};
use crate::diesel_schema::{holidays, periods, staff, timetable_entries};
use crate::error::PersistenceError;

/// Inserts a staff member and returns the assigned id.
///
/// The `staff_id` of `member` is ignored.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_staff(
    conn: &mut SqliteConnection,
    member: &StaffMember,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(staff::table)
        .values((
            staff::institution_id.eq(member.institution_id),
            staff::name.eq(&member.name),
            staff::applicant_type.eq(member.applicant_type.as_str()),
            staff::is_active.eq(flag_column(member.is_active)),
        ))
        .execute(conn)?;

    let staff_id: i64 = conn.get_last_insert_rowid()?;
    info!(
        staff_id,
        institution_id = member.institution_id,
        "Registered staff member"
    );
    Ok(staff_id)
}

/// Activates or deactivates a staff member.
///
/// # Errors
///
/// Returns `PersistenceError::StaffNotFound` if no row was updated.
pub fn set_staff_active(
    conn: &mut SqliteConnection,
    staff_id: i64,
    is_active: bool,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(staff::table)
        .filter(staff::staff_id.eq(staff_id))
        .set(staff::is_active.eq(flag_column(is_active)))
        .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::StaffNotFound(staff_id));
    }
    info!(staff_id, is_active, "Updated staff activity");
    Ok(())
}

/// Inserts a period and returns the assigned id.
///
/// # Errors
///
/// Returns an error if the insert fails or the label is taken.
pub fn insert_period(conn: &mut SqliteConnection, period: &Period) -> Result<i64, PersistenceError> {
    diesel::insert_into(periods::table)
        .values((
            periods::institution_id.eq(period.institution_id),
            periods::label.eq(&period.label),
            periods::display_order.eq(period.display_order),
        ))
        .execute(conn)?;

    let period_id: i64 = conn.get_last_insert_rowid()?;
    info!(period_id, institution_id = period.institution_id, "Added period");
    Ok(period_id)
}

/// Inserts a recurring timetable entry and returns the assigned id.
///
/// `period_order` is derived from the period and not stored.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_timetable_entry(
    conn: &mut SqliteConnection,
    entry: &TimetableEntry,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(timetable_entries::table)
        .values((
            timetable_entries::staff_id.eq(entry.staff_id),
            timetable_entries::institution_id.eq(entry.institution_id),
            timetable_entries::day_of_week.eq(weekday_number(entry.day_of_week)),
            timetable_entries::period_id.eq(entry.period_id),
            timetable_entries::class_id.eq(entry.class_id),
            timetable_entries::subject.eq(&entry.subject),
            timetable_entries::room.eq(entry.room.as_deref()),
        ))
        .execute(conn)?;

    let entry_id: i64 = conn.get_last_insert_rowid()?;
    info!(
        entry_id,
        staff_id = entry.staff_id,
        period_id = entry.period_id,
        "Added timetable entry"
    );
    Ok(entry_id)
}

/// Inserts a holiday and returns the assigned id.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_holiday(conn: &mut SqliteConnection, holiday: &Holiday) -> Result<i64, PersistenceError> {
    diesel::insert_into(holidays::table)
        .values((
            holidays::holiday_date.eq(date_text(holiday.date)),
            holidays::name.eq(&holiday.name),
            holidays::institution_id.eq(holiday.scope.institution_id()),
        ))
        .execute(conn)?;

    let holiday_id: i64 = conn.get_last_insert_rowid()?;
    info!(holiday_id, date = %holiday.date, "Added holiday");
    Ok(holiday_id)
}
