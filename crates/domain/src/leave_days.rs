// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Leave day calculation.
//!
//! Converts a requested date range into a calendar-aware count of
//! chargeable leave days. A holiday that falls on a weekend is counted
//! once, as a weekend.

use crate::calendar::NonWorkingDays;
use crate::types::DateRange;
use serde::{Deserialize, Serialize};
use time::Date;

/// Breakdown of a requested range into calendar, excluded and chargeable days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveDayCalculation {
    /// Inclusive number of days in the range.
    pub total_calendar_days: u32,
    /// Days in the range that are weekends.
    pub weekends_in_range: u32,
    /// Days in the range that are holidays and not already weekends.
    pub holidays_in_range: u32,
    /// Chargeable days (`total - weekends - holidays`, never negative).
    pub actual_leave_days: u32,
}

/// Calculates the chargeable leave days of a range.
///
/// A missing range yields an all-zero result.
///
/// # Arguments
///
/// * `range` - The requested range, if one has been selected
/// * `non_working` - Weekend and holiday dates resolved for the range
#[must_use]
pub fn calculate_leave_days(
    range: Option<&DateRange>,
    non_working: &NonWorkingDays,
) -> LeaveDayCalculation {
    let Some(range) = range else {
        return LeaveDayCalculation::default();
    };

    let mut weekends_in_range: u32 = 0;
    let mut holidays_in_range: u32 = 0;

    for date in range.dates() {
        if non_working.is_weekend(date) {
            weekends_in_range += 1;
        } else if non_working.is_holiday(date) {
            holidays_in_range += 1;
        }
    }

    let total_calendar_days: u32 = range.total_days();
    let actual_leave_days: u32 = total_calendar_days
        .saturating_sub(weekends_in_range)
        .saturating_sub(holidays_in_range);

    LeaveDayCalculation {
        total_calendar_days,
        weekends_in_range,
        holidays_in_range,
        actual_leave_days,
    }
}

/// Returns the chargeable dates of a range in ascending order.
#[must_use]
pub fn chargeable_dates(range: &DateRange, non_working: &NonWorkingDays) -> Vec<Date> {
    range
        .dates()
        .filter(|date| !non_working.is_non_working(*date))
        .collect()
}
