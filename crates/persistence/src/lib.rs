// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for Leave Desk.
//!
//! This crate stores the reference data the leave workflow reads (staff
//! directory, periods, recurring timetable, holiday calendar) and the
//! workflow's own records (applications, month allocations, substitute
//! bookings, the monthly balance ledger and the audit trail). It is built
//! on Diesel with the `SQLite` backend.
//!
//! ## Atomic transitions
//!
//! Every workflow write goes through one of two primitives:
//!
//! - [`Persistence::submit_leave_application`]
//! - [`Persistence::transition_leave_application`]
//!
//! Each opens an immediate transaction, loads the current records,
//! hands them to the caller's decision function, and writes the outcome
//! before committing. Writers are serialized by the database lock, and
//! every update is additionally guarded by the version it read, so a
//! second approval always observes the first one's result.
//!
//! Substitute bookings are protected by a partial unique index over
//! active bookings; a colliding insert fails the whole submission.
//!
//! ## Testing
//!
//! - Tests run against uniquely named in-memory databases
//! - Cross-connection races are exercised against a temporary file database

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use leave_desk::{SubmissionContext, SubmissionResult, TransitionContext, TransitionResult};
use leave_desk_audit::AuditEvent;
use leave_desk_domain::{
    BalancePolicy, DateRange, Holiday, LeaveApplication, LeaveBalance, LeaveStatus,
    MonthAllocation, NonWorkingDays, Period, Scope, StaffMember, SubstituteAvailability,
    TimetableEntry, WeekendRule, chargeable_dates, group_by_month, resolve_non_working_days,
};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use time::{Date, Month};
use tracing::{info, warn};

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

mod backend;
mod convert;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use data_models::ApplicationFilter;
pub use error::PersistenceError;

use backend::PersistenceBackend;
use queries::VersionedBalance;

/// Settings used when loading a submission context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextSettings {
    pub policy: BalancePolicy,
    pub weekend_rule: WeekendRule,
    pub min_reason_length: usize,
}

/// Replaces storage failures while reading reference data with a
/// retryable dependency error naming the store.
fn as_dependency_failure(dependency: &str, err: PersistenceError) -> PersistenceError {
    match err {
        PersistenceError::DatabaseError(message)
        | PersistenceError::QueryFailed(message)
        | PersistenceError::ReconstructionError(message) => {
            PersistenceError::ReferenceDataUnavailable {
                dependency: dependency.to_string(),
                message,
            }
        }
        other => other,
    }
}

fn resolve_calendar(
    conn: &mut SqliteConnection,
    scope: Scope,
    range: &DateRange,
    weekend_rule: &WeekendRule,
) -> Result<NonWorkingDays, PersistenceError> {
    let holidays: Vec<Holiday> = queries::list_holidays_in_range(conn, scope, range)
        .map_err(|e| as_dependency_failure("calendar", e))?;
    Ok(resolve_non_working_days(scope, range, &holidays, weekend_rule))
}

fn load_availability(
    conn: &mut SqliteConnection,
    institution_id: i64,
) -> Result<SubstituteAvailability, PersistenceError> {
    let roster: Vec<StaffMember> = queries::list_active_staff(conn, institution_id)
        .map_err(|e| as_dependency_failure("directory", e))?;
    let commitments: Vec<TimetableEntry> = queries::list_institution_timetable(conn, institution_id)
        .map_err(|e| as_dependency_failure("timetable", e))?;

    Ok(SubstituteAvailability {
        institution_id,
        roster,
        commitments,
        bookings: queries::list_active_bookings(conn, institution_id)?,
        on_leave: queries::list_live_leave(conn, institution_id)?,
    })
}

fn load_context(
    conn: &mut SqliteConnection,
    applicant: &StaffMember,
    range: &DateRange,
    settings: &ContextSettings,
) -> Result<SubmissionContext, PersistenceError> {
    let scope: Scope = Scope::Institution(applicant.institution_id);
    let non_working: NonWorkingDays = resolve_calendar(conn, scope, range, &settings.weekend_rule)?;
    let timetable: Vec<TimetableEntry> = queries::get_recurring_assignments(conn, applicant.staff_id)
        .map_err(|e| as_dependency_failure("timetable", e))?;
    let availability: SubstituteAvailability = load_availability(conn, applicant.institution_id)?;

    let months: Vec<MonthAllocation> = group_by_month(&chargeable_dates(range, &non_working));
    let mut balances: Vec<LeaveBalance> = Vec::with_capacity(months.len());
    for month in &months {
        if let Some(found) = queries::find_balance(conn, applicant.staff_id, month.year, month.month)? {
            balances.push(found.balance);
        }
    }

    Ok(SubmissionContext {
        non_working,
        timetable,
        availability,
        balances,
        policy: settings.policy,
        min_reason_length: settings.min_reason_length,
    })
}

fn year_range(year: i32) -> Result<DateRange, PersistenceError> {
    let out_of_range = |_| PersistenceError::QueryFailed(format!("year {year} is out of range"));
    let start: Date = Date::from_calendar_date(year, Month::January, 1).map_err(out_of_range)?;
    let end: Date = Date::from_calendar_date(year, Month::December, 31).map_err(out_of_range)?;
    DateRange::new(start, end).map_err(|e| PersistenceError::QueryFailed(e.to_string()))
}

/// Persistence adapter for the leave workflow.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique shared in-memory database via atomic
    /// counter, so tests are isolated.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:memdb_leave_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// Several adapters may open the same file; their workflow writes are
    /// serialized by the database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        self.conn.verify_foreign_key_enforcement()
    }

    // ========================================================================
    // Reference data
    // ========================================================================

    /// Registers a staff member.
    ///
    /// # Returns
    ///
    /// The stored staff member with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn register_staff(&mut self, member: &StaffMember) -> Result<StaffMember, PersistenceError> {
        let staff_id: i64 = mutations::insert_staff(&mut self.conn, member)?;
        Ok(StaffMember {
            staff_id,
            ..member.clone()
        })
    }

    /// Activates or deactivates a staff member.
    ///
    /// # Errors
    ///
    /// Returns an error if the staff member does not exist.
    pub fn set_staff_active(&mut self, staff_id: i64, is_active: bool) -> Result<(), PersistenceError> {
        mutations::set_staff_active(&mut self.conn, staff_id, is_active)
    }

    /// Retrieves one staff member.
    ///
    /// # Errors
    ///
    /// Returns an error if the staff member does not exist.
    pub fn get_staff(&mut self, staff_id: i64) -> Result<StaffMember, PersistenceError> {
        queries::get_staff(&mut self.conn, staff_id)
    }

    /// Lists the active staff of an institution.
    ///
    /// # Errors
    ///
    /// Returns a dependency error if the directory cannot be read.
    pub fn list_active_staff(
        &mut self,
        institution_id: i64,
    ) -> Result<Vec<StaffMember>, PersistenceError> {
        queries::list_active_staff(&mut self.conn, institution_id)
            .map_err(|e| as_dependency_failure("directory", e))
    }

    /// Lists every staff member of an institution, including inactive ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_institution_staff(
        &mut self,
        institution_id: i64,
    ) -> Result<Vec<StaffMember>, PersistenceError> {
        queries::list_institution_staff(&mut self.conn, institution_id)
    }

    /// Adds a teaching period.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn add_period(&mut self, period: &Period) -> Result<Period, PersistenceError> {
        let period_id: i64 = mutations::insert_period(&mut self.conn, period)?;
        Ok(Period {
            period_id,
            ..period.clone()
        })
    }

    /// Lists the periods of an institution in display order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_periods(&mut self, institution_id: i64) -> Result<Vec<Period>, PersistenceError> {
        queries::list_periods(&mut self.conn, institution_id)
    }

    /// Adds a recurring timetable entry.
    ///
    /// The entry's institution is taken from the staff member, and its
    /// period order from the period.
    ///
    /// # Errors
    ///
    /// Returns an error if the staff member or period does not exist, if
    /// they belong to different institutions, or if the insert fails.
    pub fn add_timetable_entry(
        &mut self,
        entry: &TimetableEntry,
    ) -> Result<TimetableEntry, PersistenceError> {
        self.conn.immediate_transaction(|conn| {
            let member: StaffMember = queries::get_staff(conn, entry.staff_id)?;
            let period: Period = queries::get_period(conn, entry.period_id)?;
            if period.institution_id != member.institution_id {
                return Err(PersistenceError::ReferenceMismatch(format!(
                    "period {} belongs to institution {}, staff member {} to institution {}",
                    period.period_id, period.institution_id, member.staff_id, member.institution_id
                )));
            }

            let stored: TimetableEntry = TimetableEntry {
                institution_id: member.institution_id,
                period_order: period.display_order,
                ..entry.clone()
            };
            mutations::insert_timetable_entry(conn, &stored)?;
            Ok(stored)
        })
    }

    /// Retrieves the recurring teaching commitments of a staff member.
    ///
    /// # Errors
    ///
    /// Returns a dependency error if the timetable cannot be read.
    pub fn get_recurring_assignments(
        &mut self,
        staff_id: i64,
    ) -> Result<Vec<TimetableEntry>, PersistenceError> {
        queries::get_recurring_assignments(&mut self.conn, staff_id)
            .map_err(|e| as_dependency_failure("timetable", e))
    }

    /// Adds a holiday.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn add_holiday(&mut self, holiday: &Holiday) -> Result<i64, PersistenceError> {
        mutations::insert_holiday(&mut self.conn, holiday)
    }

    /// Lists the holidays visible to `scope` in a calendar year.
    ///
    /// # Errors
    ///
    /// Returns a dependency error if the calendar cannot be read.
    pub fn list_holidays(&mut self, scope: Scope, year: i32) -> Result<Vec<Holiday>, PersistenceError> {
        let range: DateRange = year_range(year)?;
        queries::list_holidays_in_range(&mut self.conn, scope, &range)
            .map_err(|e| as_dependency_failure("calendar", e))
    }

    /// Resolves weekends and holidays of `scope` inside `range`.
    ///
    /// # Errors
    ///
    /// Returns a dependency error if the calendar cannot be read.
    pub fn resolve_non_working_days(
        &mut self,
        scope: Scope,
        range: &DateRange,
        weekend_rule: &WeekendRule,
    ) -> Result<NonWorkingDays, PersistenceError> {
        resolve_calendar(&mut self.conn, scope, range, weekend_rule)
    }

    /// Loads who can cover classes at an institution right now.
    ///
    /// # Errors
    ///
    /// Returns a dependency error if the directory or timetable cannot be read.
    pub fn load_substitute_availability(
        &mut self,
        institution_id: i64,
    ) -> Result<SubstituteAvailability, PersistenceError> {
        load_availability(&mut self.conn, institution_id)
    }

    // ========================================================================
    // Balance ledger
    // ========================================================================

    /// Returns an applicant's ledger record for a month without storing it.
    ///
    /// Months with no record report the opening balance of `policy`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_balance(
        &mut self,
        applicant_id: i64,
        year: i32,
        month: u8,
        policy: &BalancePolicy,
    ) -> Result<LeaveBalance, PersistenceError> {
        Ok(
            queries::find_balance(&mut self.conn, applicant_id, year, month)?.map_or_else(
                || LeaveBalance::opening(applicant_id, year, month, policy),
                |found| found.balance,
            ),
        )
    }

    /// Returns an applicant's ledger record for a month, opening it with
    /// the credit of `policy` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the query or insert fails.
    pub fn get_or_create_balance(
        &mut self,
        applicant_id: i64,
        year: i32,
        month: u8,
        policy: &BalancePolicy,
    ) -> Result<LeaveBalance, PersistenceError> {
        self.conn.immediate_transaction(|conn| {
            if let Some(found) = queries::find_balance(conn, applicant_id, year, month)? {
                return Ok(found.balance);
            }
            let opening: LeaveBalance = LeaveBalance::opening(applicant_id, year, month, policy);
            Ok(mutations::insert_balance(conn, &opening)?.balance)
        })
    }

    // ========================================================================
    // Workflow
    // ========================================================================

    /// Loads everything a submission for `applicant` over `range` is
    /// decided against.
    ///
    /// # Errors
    ///
    /// Returns a dependency error if reference data cannot be read.
    pub fn load_submission_context(
        &mut self,
        applicant: &StaffMember,
        range: &DateRange,
        settings: &ContextSettings,
    ) -> Result<SubmissionContext, PersistenceError> {
        load_context(&mut self.conn, applicant, range, settings)
    }

    /// Submits a leave application atomically.
    ///
    /// Inside one immediate transaction this loads the applicant and a
    /// fresh submission context, lets `decide` build the application, and
    /// stores the application, its month allocations, its substitute
    /// bookings and the audit event. Availability is therefore re-checked
    /// against every booking committed before this transaction began.
    ///
    /// # Arguments
    ///
    /// * `applicant_id` - The applying staff member
    /// * `range` - The requested range
    /// * `settings` - Ledger, weekend and validation settings
    /// * `decide` - Builds the application from the applicant and context
    ///
    /// # Returns
    ///
    /// The submission with the application id assigned and bound into
    /// the audit event.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The applicant does not exist or is inactive
    /// - Reference data cannot be read
    /// - `decide` rejects the submission
    /// - A chosen substitute was booked concurrently
    pub fn submit_leave_application<F>(
        &mut self,
        applicant_id: i64,
        range: &DateRange,
        settings: &ContextSettings,
        decide: F,
    ) -> Result<SubmissionResult, PersistenceError>
    where
        F: FnOnce(&StaffMember, &SubmissionContext) -> Result<SubmissionResult, leave_desk::CoreError>,
    {
        let result: Result<SubmissionResult, PersistenceError> =
            self.conn.immediate_transaction(|conn| {
                let applicant: StaffMember = queries::get_staff(conn, applicant_id)?;
                if !applicant.is_active {
                    return Err(PersistenceError::StaffNotFound(applicant_id));
                }

                let context: SubmissionContext = load_context(conn, &applicant, range, settings)?;
                let decided: SubmissionResult = decide(&applicant, &context)?;

                let application_id: i64 = mutations::insert_application(conn, &decided.application)?;
                let audit_event: AuditEvent =
                    decided.audit_event.with_application_id(application_id);
                mutations::persist_audit_event(conn, &audit_event)?;

                Ok(SubmissionResult {
                    application: LeaveApplication {
                        application_id: Some(application_id),
                        ..decided.application
                    },
                    audit_event,
                })
            });

        match &result {
            Ok(submitted) => info!(
                application_id = submitted.application.application_id,
                applicant_id,
                paid_days = submitted.application.paid_days(),
                lop_days = submitted.application.lop_days(),
                "Committed leave submission"
            ),
            Err(err) => warn!(applicant_id, error = %err, "Leave submission rolled back"),
        }
        result
    }

    /// Applies a workflow decision to an application atomically.
    ///
    /// Inside one immediate transaction this loads the application, the
    /// applicant's ledger records for its months and the substitute
    /// availability of its institution (minus its own bookings), lets
    /// `decide` compute the transition, and writes the application, changed ledger records,
    /// released bookings and the audit event. Every write is guarded by the
    /// version read in the same transaction.
    ///
    /// # Arguments
    ///
    /// * `application_id` - The application to transition
    /// * `decide` - Computes the transition from the application and context
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The application does not exist
    /// - Directory or timetable data cannot be read
    /// - `decide` rejects the transition
    /// - A guarded write finds a newer version
    pub fn transition_leave_application<F>(
        &mut self,
        application_id: i64,
        decide: F,
    ) -> Result<TransitionResult, PersistenceError>
    where
        F: FnOnce(&LeaveApplication, &TransitionContext) -> Result<TransitionResult, leave_desk::CoreError>,
    {
        let result: Result<TransitionResult, PersistenceError> =
            self.conn.immediate_transaction(|conn| {
                let current: LeaveApplication = queries::get_leave_application(conn, application_id)?;

                let mut ledger: Vec<VersionedBalance> = Vec::new();
                for allocation in &current.split.allocations {
                    if let Some(found) = queries::find_balance(
                        conn,
                        current.applicant_id,
                        allocation.year,
                        allocation.month,
                    )? {
                        ledger.push(found);
                    }
                }
                let context: TransitionContext = TransitionContext {
                    balances: ledger.iter().map(|v| v.balance.clone()).collect(),
                    availability: load_availability(conn, current.institution_id)?
                        .without_application(application_id),
                };

                let decided: TransitionResult = decide(&current, &context)?;

                mutations::update_application_guarded(conn, &decided.application, current.version)?;
                if decided.application.split.allocations != current.split.allocations {
                    mutations::replace_month_allocations(
                        conn,
                        application_id,
                        &decided.application.split.allocations,
                    )?;
                }

                for update in &decided.balance_updates {
                    match ledger.iter().find(|v| v.balance.is_for(update.year, update.month)) {
                        Some(read) => {
                            mutations::update_balance_guarded(conn, update, read.version)?;
                        }
                        None => {
                            mutations::insert_balance(conn, update)?;
                        }
                    }
                }

                if matches!(
                    decided.application.status,
                    LeaveStatus::Rejected | LeaveStatus::Cancelled
                ) {
                    mutations::release_bookings(conn, application_id)?;
                }

                mutations::persist_audit_event(conn, &decided.audit_event)?;
                Ok(decided)
            });

        match &result {
            Ok(transitioned) => info!(
                application_id,
                status = %transitioned.application.status,
                version = transitioned.application.version,
                ledger_updates = transitioned.balance_updates.len(),
                "Committed leave transition"
            ),
            Err(err) => warn!(application_id, error = %err, "Leave transition rolled back"),
        }
        result
    }

    /// Retrieves one leave application.
    ///
    /// # Errors
    ///
    /// Returns an error if the application does not exist.
    pub fn get_leave_application(
        &mut self,
        application_id: i64,
    ) -> Result<LeaveApplication, PersistenceError> {
        queries::get_leave_application(&mut self.conn, application_id)
    }

    /// Lists leave applications matching a filter, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_leave_applications(
        &mut self,
        filter: &ApplicationFilter,
    ) -> Result<Vec<LeaveApplication>, PersistenceError> {
        queries::list_leave_applications(&mut self.conn, filter)
    }

    /// Retrieves the audit trail of an application, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the application does not exist or events cannot
    /// be deserialized.
    pub fn get_application_history(
        &mut self,
        application_id: i64,
    ) -> Result<Vec<AuditEvent>, PersistenceError> {
        queries::get_leave_application(&mut self.conn, application_id)?;
        queries::get_application_history(&mut self.conn, application_id)
    }
}
