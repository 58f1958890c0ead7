// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use leave_desk_domain::LeaveBalance;
use tracing::debug;

use crate::convert::count_column;
use crate::diesel_schema::leave_balances;
use crate::error::PersistenceError;
use crate::queries::VersionedBalance;

/// Opens a ledger record at version 1.
///
/// # Errors
///
/// Returns an error if the record already exists or the insert fails.
pub fn insert_balance(
    conn: &mut SqliteConnection,
    balance: &LeaveBalance,
) -> Result<VersionedBalance, PersistenceError> {
    diesel::insert_into(leave_balances::table)
        .values((
            leave_balances::applicant_id.eq(balance.applicant_id),
            leave_balances::year.eq(balance.year),
            leave_balances::month.eq(i32::from(balance.month)),
            leave_balances::credited_days.eq(count_column(balance.credited_days)?),
            leave_balances::used_days.eq(count_column(balance.used_days)?),
            leave_balances::version.eq(1_i64),
        ))
        .execute(conn)?;

    debug!(
        applicant_id = balance.applicant_id,
        year = balance.year,
        month = balance.month,
        "Opened leave balance"
    );
    Ok(VersionedBalance {
        balance: balance.clone(),
        version: 1,
    })
}

/// Writes a ledger record if it is still at `expected_version`.
///
/// # Returns
///
/// The new version of the record.
///
/// # Errors
///
/// Returns `PersistenceError::ConcurrentModification` if the stored
/// version differs, or an error if the update fails.
pub fn update_balance_guarded(
    conn: &mut SqliteConnection,
    balance: &LeaveBalance,
    expected_version: i64,
) -> Result<i64, PersistenceError> {
    let next_version: i64 = expected_version + 1;
    let updated: usize = diesel::update(leave_balances::table)
        .filter(leave_balances::applicant_id.eq(balance.applicant_id))
        .filter(leave_balances::year.eq(balance.year))
        .filter(leave_balances::month.eq(i32::from(balance.month)))
        .filter(leave_balances::version.eq(expected_version))
        .set((
            leave_balances::credited_days.eq(count_column(balance.credited_days)?),
            leave_balances::used_days.eq(count_column(balance.used_days)?),
            leave_balances::version.eq(next_version),
        ))
        .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::ConcurrentModification {
            entity: String::from("leave_balance"),
            key: format!(
                "{}/{}-{:02}",
                balance.applicant_id, balance.year, balance.month
            ),
        });
    }
    Ok(next_version)
}
