// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reference data queries: the directory, timetable and calendar stores.

use diesel::SqliteConnection;
use diesel::prelude::*;
use leave_desk_domain::{
    ApplicantType, DateRange, Holiday, Period, Scope, StaffMember, TimetableEntry,
};
use tracing::debug;

use crate::convert::{date_text, flag_value, parse_date, parse_weekday};
use crate::diesel_schema::{holidays, periods, staff, timetable_entries};
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = staff)]
struct StaffRow {
    staff_id: i64,
    institution_id: i64,
    name: String,
    applicant_type: String,
    is_active: i32,
}

impl StaffRow {
    fn into_domain(self) -> Result<StaffMember, PersistenceError> {
        let applicant_type: ApplicantType = self
            .applicant_type
            .parse()
            .map_err(|e: leave_desk_domain::DomainError| {
                PersistenceError::ReconstructionError(e.to_string())
            })?;
        Ok(StaffMember {
            staff_id: self.staff_id,
            institution_id: self.institution_id,
            name: self.name,
            applicant_type,
            is_active: flag_value(self.is_active),
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = periods)]
struct PeriodRow {
    period_id: i64,
    institution_id: i64,
    label: String,
    display_order: i32,
}

impl From<PeriodRow> for Period {
    fn from(row: PeriodRow) -> Self {
        Self {
            period_id: row.period_id,
            institution_id: row.institution_id,
            label: row.label,
            display_order: row.display_order,
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = timetable_entries)]
struct TimetableRow {
    staff_id: i64,
    institution_id: i64,
    day_of_week: i32,
    period_id: i64,
    class_id: i64,
    subject: String,
    room: Option<String>,
}

impl TimetableRow {
    fn into_domain(self, period_order: i32) -> Result<TimetableEntry, PersistenceError> {
        Ok(TimetableEntry {
            staff_id: self.staff_id,
            institution_id: self.institution_id,
            day_of_week: parse_weekday(self.day_of_week)?,
            period_id: self.period_id,
            period_order,
            class_id: self.class_id,
            subject: self.subject,
            room: self.room,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = holidays)]
struct HolidayRow {
    holiday_date: String,
    name: String,
    institution_id: Option<i64>,
}

/// Retrieves one staff member, active or not.
///
/// # Errors
///
/// Returns `PersistenceError::StaffNotFound` if no such staff member exists.
pub fn get_staff(conn: &mut SqliteConnection, staff_id: i64) -> Result<StaffMember, PersistenceError> {
    let row: StaffRow = staff::table
        .filter(staff::staff_id.eq(staff_id))
        .select(StaffRow::as_select())
        .first::<StaffRow>(conn)
        .optional()?
        .ok_or(PersistenceError::StaffNotFound(staff_id))?;
    row.into_domain()
}

/// Lists the active staff of an institution, ordered by id.
///
/// # Errors
///
/// Returns an error if the query fails or a row is malformed.
pub fn list_active_staff(
    conn: &mut SqliteConnection,
    institution_id: i64,
) -> Result<Vec<StaffMember>, PersistenceError> {
    let rows: Vec<StaffRow> = staff::table
        .filter(staff::institution_id.eq(institution_id))
        .filter(staff::is_active.eq(1))
        .order(staff::staff_id.asc())
        .select(StaffRow::as_select())
        .load::<StaffRow>(conn)?;
    debug!(institution_id, count = rows.len(), "Loaded active staff");
    rows.into_iter().map(StaffRow::into_domain).collect()
}

/// Lists every staff member of an institution, including inactive ones.
///
/// # Errors
///
/// Returns an error if the query fails or a row is malformed.
pub fn list_institution_staff(
    conn: &mut SqliteConnection,
    institution_id: i64,
) -> Result<Vec<StaffMember>, PersistenceError> {
    let rows: Vec<StaffRow> = staff::table
        .filter(staff::institution_id.eq(institution_id))
        .order(staff::staff_id.asc())
        .select(StaffRow::as_select())
        .load::<StaffRow>(conn)?;
    rows.into_iter().map(StaffRow::into_domain).collect()
}

/// Retrieves one period.
///
/// # Errors
///
/// Returns `PersistenceError::PeriodNotFound` if no such period exists.
pub fn get_period(conn: &mut SqliteConnection, period_id: i64) -> Result<Period, PersistenceError> {
    let row: PeriodRow = periods::table
        .filter(periods::period_id.eq(period_id))
        .select(PeriodRow::as_select())
        .first::<PeriodRow>(conn)
        .optional()?
        .ok_or(PersistenceError::PeriodNotFound(period_id))?;
    Ok(Period::from(row))
}

/// Lists the periods of an institution in display order.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_periods(
    conn: &mut SqliteConnection,
    institution_id: i64,
) -> Result<Vec<Period>, PersistenceError> {
    let rows: Vec<PeriodRow> = periods::table
        .filter(periods::institution_id.eq(institution_id))
        .order((periods::display_order.asc(), periods::period_id.asc()))
        .select(PeriodRow::as_select())
        .load::<PeriodRow>(conn)?;
    Ok(rows.into_iter().map(Period::from).collect())
}

/// Retrieves the recurring weekly teaching commitments of one staff member.
///
/// # Errors
///
/// Returns an error if the query fails or a row is malformed.
pub fn get_recurring_assignments(
    conn: &mut SqliteConnection,
    staff_id: i64,
) -> Result<Vec<TimetableEntry>, PersistenceError> {
    let rows: Vec<(TimetableRow, i32)> = timetable_entries::table
        .inner_join(periods::table)
        .filter(timetable_entries::staff_id.eq(staff_id))
        .order((
            timetable_entries::day_of_week.asc(),
            periods::display_order.asc(),
            timetable_entries::class_id.asc(),
        ))
        .select((TimetableRow::as_select(), periods::display_order))
        .load::<(TimetableRow, i32)>(conn)?;
    rows.into_iter()
        .map(|(row, order)| row.into_domain(order))
        .collect()
}

/// Retrieves the whole recurring timetable of an institution.
///
/// # Errors
///
/// Returns an error if the query fails or a row is malformed.
pub fn list_institution_timetable(
    conn: &mut SqliteConnection,
    institution_id: i64,
) -> Result<Vec<TimetableEntry>, PersistenceError> {
    let rows: Vec<(TimetableRow, i32)> = timetable_entries::table
        .inner_join(periods::table)
        .filter(timetable_entries::institution_id.eq(institution_id))
        .select((TimetableRow::as_select(), periods::display_order))
        .load::<(TimetableRow, i32)>(conn)?;
    debug!(institution_id, count = rows.len(), "Loaded institution timetable");
    rows.into_iter()
        .map(|(row, order)| row.into_domain(order))
        .collect()
}

/// Lists the holidays visible to `scope` inside an inclusive range.
///
/// Company scope sees organization-wide holidays only. An institution
/// scope sees organization-wide holidays plus its own.
///
/// # Errors
///
/// Returns an error if the query fails or a row is malformed.
pub fn list_holidays_in_range(
    conn: &mut SqliteConnection,
    scope: Scope,
    range: &DateRange,
) -> Result<Vec<Holiday>, PersistenceError> {
    let mut query = holidays::table
        .filter(holidays::holiday_date.ge(date_text(range.start())))
        .filter(holidays::holiday_date.le(date_text(range.end())))
        .order((holidays::holiday_date.asc(), holidays::holiday_id.asc()))
        .select(HolidayRow::as_select())
        .into_boxed();

    query = match scope {
        Scope::Company => query.filter(holidays::institution_id.is_null()),
        Scope::Institution(id) => query.filter(
            holidays::institution_id
                .is_null()
                .or(holidays::institution_id.eq(id)),
        ),
    };

    let rows: Vec<HolidayRow> = query.load::<HolidayRow>(conn)?;
    rows.into_iter()
        .map(|row| {
            Ok(Holiday::new(
                parse_date(&row.holiday_date)?,
                row.name,
                Scope::from_institution(row.institution_id),
            ))
        })
        .collect()
}
