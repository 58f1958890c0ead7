// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use leave_desk_domain::LeaveBalance;

use crate::convert::{count_value, month_value};
use crate::diesel_schema::leave_balances;
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = leave_balances)]
struct BalanceRow {
    applicant_id: i64,
    year: i32,
    month: i32,
    credited_days: i32,
    used_days: i32,
    version: i64,
}

/// A ledger record together with the version its guarded update must match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedBalance {
    pub balance: LeaveBalance,
    pub version: i64,
}

/// Looks up the ledger record of one applicant month.
///
/// # Errors
///
/// Returns an error if the query fails or the row is malformed.
pub fn find_balance(
    conn: &mut SqliteConnection,
    applicant_id: i64,
    year: i32,
    month: u8,
) -> Result<Option<VersionedBalance>, PersistenceError> {
    let row: Option<BalanceRow> = leave_balances::table
        .filter(leave_balances::applicant_id.eq(applicant_id))
        .filter(leave_balances::year.eq(year))
        .filter(leave_balances::month.eq(i32::from(month)))
        .select(BalanceRow::as_select())
        .first::<BalanceRow>(conn)
        .optional()?;

    row.map(|row| {
        Ok(VersionedBalance {
            balance: LeaveBalance {
                applicant_id: row.applicant_id,
                year: row.year,
                month: month_value(row.month)?,
                credited_days: count_value(row.credited_days, "credited_days")?,
                used_days: count_value(row.used_days, "used_days")?,
            },
            version: row.version,
        })
    })
    .transpose()
}
