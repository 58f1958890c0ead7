// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Monthly leave balance ledger rules and the paid/LOP split.
//!
//! Balances are kept per (applicant, year, month). A month with no record
//! opens with the configured monthly credit. Paid days are consumed only
//! when an application is finally approved and are restored when an
//! approved application is cancelled.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use time::Date;

/// Days credited to a month that has no balance record yet.
pub const DEFAULT_MONTHLY_CREDIT: u32 = 1;

/// Deployment policy for the balance ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalancePolicy {
    /// Paid leave days credited per month.
    pub monthly_credit: u32,
}

impl BalancePolicy {
    /// Creates a policy with the given monthly credit.
    #[must_use]
    pub const fn new(monthly_credit: u32) -> Self {
        Self { monthly_credit }
    }
}

impl Default for BalancePolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MONTHLY_CREDIT)
    }
}

/// A monthly leave balance record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveBalance {
    pub applicant_id: i64,
    pub year: i32,
    /// Month number, 1-12.
    pub month: u8,
    /// Paid days credited for the month.
    pub credited_days: u32,
    /// Paid days consumed by approved applications.
    pub used_days: u32,
}

impl LeaveBalance {
    /// Creates the opening balance for a month with no record.
    #[must_use]
    pub const fn opening(applicant_id: i64, year: i32, month: u8, policy: &BalancePolicy) -> Self {
        Self {
            applicant_id,
            year,
            month,
            credited_days: policy.monthly_credit,
            used_days: 0,
        }
    }

    /// Returns the days of paid leave left for the month.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.credited_days.saturating_sub(self.used_days)
    }

    /// Returns true if this record belongs to the given month.
    #[must_use]
    pub const fn is_for(&self, year: i32, month: u8) -> bool {
        self.year == year && self.month == month
    }

    /// Consumes paid days from the balance.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InsufficientBalance` if fewer than `days` remain.
    pub fn consume(&mut self, days: u32) -> Result<(), DomainError> {
        if days > self.remaining() {
            return Err(DomainError::InsufficientBalance {
                year: self.year,
                month: self.month,
                requested: days,
                remaining: self.remaining(),
            });
        }
        self.used_days += days;
        Ok(())
    }

    /// Re-credits previously consumed paid days.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::RestoreExceedsUsage` if more days would be
    /// restored than were consumed.
    pub fn restore(&mut self, days: u32) -> Result<(), DomainError> {
        if days > self.used_days {
            return Err(DomainError::RestoreExceedsUsage {
                year: self.year,
                month: self.month,
                restore: days,
                used: self.used_days,
            });
        }
        self.used_days -= days;
        Ok(())
    }
}

/// Chargeable and paid days of an application falling in one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthAllocation {
    pub year: i32,
    /// Month number, 1-12.
    pub month: u8,
    pub chargeable_days: u32,
    pub paid_days: u32,
}

impl MonthAllocation {
    /// Returns the loss-of-pay days of the month.
    #[must_use]
    pub const fn lop_days(&self) -> u32 {
        self.chargeable_days.saturating_sub(self.paid_days)
    }
}

/// The paid/LOP split of an application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveSplit {
    pub actual_leave_days: u32,
    pub paid_days: u32,
    pub lop_days: u32,
    /// Per-month breakdown in chronological order.
    pub allocations: Vec<MonthAllocation>,
}

/// Groups chargeable dates by calendar month.
///
/// The returned allocations carry chargeable counts only; paid days are zero.
#[must_use]
pub fn group_by_month(dates: &[Date]) -> Vec<MonthAllocation> {
    let mut months: Vec<MonthAllocation> = Vec::new();
    for date in dates {
        let year: i32 = date.year();
        let month: u8 = u8::from(date.month());
        match months.iter_mut().find(|m| m.year == year && m.month == month) {
            Some(existing) => existing.chargeable_days += 1,
            None => months.push(MonthAllocation {
                year,
                month,
                chargeable_days: 1,
                paid_days: 0,
            }),
        }
    }
    months.sort_by_key(|m| (m.year, m.month));
    months
}

/// Splits chargeable days into paid and loss-of-pay days.
///
/// Each month is charged against that month's remaining balance. Months
/// without a balance record use the opening balance of `policy`.
///
/// # Arguments
///
/// * `months` - Chargeable days grouped by month
/// * `balances` - Current ledger records of the applicant
/// * `policy` - The ledger policy for months with no record
#[must_use]
pub fn allocate_paid_days(
    months: &[MonthAllocation],
    balances: &[LeaveBalance],
    policy: &BalancePolicy,
) -> LeaveSplit {
    let allocations: Vec<MonthAllocation> = months
        .iter()
        .map(|month| {
            let available: u32 = balances
                .iter()
                .find(|b| b.is_for(month.year, month.month))
                .map_or(policy.monthly_credit, LeaveBalance::remaining);
            MonthAllocation {
                paid_days: month.chargeable_days.min(available),
                ..*month
            }
        })
        .collect();

    let actual_leave_days: u32 = allocations.iter().map(|m| m.chargeable_days).sum();
    let paid_days: u32 = allocations.iter().map(|m| m.paid_days).sum();

    LeaveSplit {
        actual_leave_days,
        paid_days,
        lop_days: actual_leave_days - paid_days,
        allocations,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use time::macros::date;

    fn balance(year: i32, month: u8, credited_days: u32, used_days: u32) -> LeaveBalance {
        LeaveBalance {
            applicant_id: 1,
            year,
            month,
            credited_days,
            used_days,
        }
    }

    #[test]
    fn test_one_day_balance_three_day_request() {
        let months: Vec<MonthAllocation> = group_by_month(&[
            date!(2026 - 03 - 03),
            date!(2026 - 03 - 04),
            date!(2026 - 03 - 05),
        ]);
        let split: LeaveSplit =
            allocate_paid_days(&months, &[balance(2026, 3, 1, 0)], &BalancePolicy::default());

        assert_eq!(split.actual_leave_days, 3);
        assert_eq!(split.paid_days, 1);
        assert_eq!(split.lop_days, 2);
    }

    #[test]
    fn test_missing_record_uses_policy_credit() {
        let months: Vec<MonthAllocation> =
            group_by_month(&[date!(2026 - 03 - 03), date!(2026 - 03 - 04)]);
        let split: LeaveSplit = allocate_paid_days(&months, &[], &BalancePolicy::new(2));

        assert_eq!(split.paid_days, 2);
        assert_eq!(split.lop_days, 0);
    }

    #[test]
    fn test_exhausted_balance_is_all_lop() {
        let months: Vec<MonthAllocation> = group_by_month(&[date!(2026 - 03 - 03)]);
        let split: LeaveSplit =
            allocate_paid_days(&months, &[balance(2026, 3, 1, 1)], &BalancePolicy::default());

        assert_eq!(split.paid_days, 0);
        assert_eq!(split.lop_days, 1);
    }

    #[test]
    fn test_split_charges_each_month_separately() {
        let months: Vec<MonthAllocation> = group_by_month(&[
            date!(2026 - 03 - 30),
            date!(2026 - 03 - 31),
            date!(2026 - 04 - 01),
        ]);
        assert_eq!(months.len(), 2);

        let split: LeaveSplit = allocate_paid_days(
            &months,
            &[balance(2026, 3, 1, 0), balance(2026, 4, 1, 0)],
            &BalancePolicy::default(),
        );

        assert_eq!(split.allocations[0].chargeable_days, 2);
        assert_eq!(split.allocations[0].paid_days, 1);
        assert_eq!(split.allocations[0].lop_days(), 1);
        assert_eq!(split.allocations[1].chargeable_days, 1);
        assert_eq!(split.allocations[1].paid_days, 1);
        assert_eq!(split.paid_days, 2);
        assert_eq!(split.lop_days, 1);
    }

    #[test]
    fn test_split_conservation() {
        for credit in 0..5 {
            for used in 0..5 {
                let months: Vec<MonthAllocation> = group_by_month(&[
                    date!(2026 - 05 - 04),
                    date!(2026 - 05 - 05),
                    date!(2026 - 05 - 06),
                ]);
                let ledger: LeaveBalance = balance(2026, 5, credit, used);
                let split: LeaveSplit =
                    allocate_paid_days(&months, &[ledger.clone()], &BalancePolicy::default());

                assert_eq!(split.paid_days + split.lop_days, split.actual_leave_days);
                assert!(split.paid_days <= ledger.remaining());
            }
        }
    }

    #[test]
    fn test_empty_dates_yield_empty_split() {
        let split: LeaveSplit = allocate_paid_days(&[], &[], &BalancePolicy::default());
        assert_eq!(split, LeaveSplit::default());
    }

    #[test]
    fn test_consume_and_restore() {
        let mut ledger: LeaveBalance = balance(2026, 3, 2, 0);

        ledger.consume(2).unwrap();
        assert_eq!(ledger.remaining(), 0);

        let err: DomainError = ledger.consume(1).unwrap_err();
        assert!(matches!(err, DomainError::InsufficientBalance { .. }));

        ledger.restore(2).unwrap();
        assert_eq!(ledger.remaining(), 2);

        let err: DomainError = ledger.restore(1).unwrap_err();
        assert!(matches!(err, DomainError::RestoreExceedsUsage { .. }));
    }

    #[test]
    fn test_opening_balance() {
        let ledger: LeaveBalance = LeaveBalance::opening(9, 2026, 6, &BalancePolicy::new(3));
        assert_eq!(ledger.applicant_id, 9);
        assert_eq!(ledger.remaining(), 3);
        assert!(ledger.is_for(2026, 6));
    }
}
