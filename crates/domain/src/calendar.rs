// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Calendar day resolution.
//!
//! Resolves which dates of a range are weekends and which are holidays
//! for a given calendar scope. Institution holidays extend the
//! organization-wide calendar; they never replace it.

use crate::types::{DateRange, Holiday, Scope};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use time::{Date, Weekday};

/// The fixed set of weekdays treated as weekend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekendRule {
    days: Vec<Weekday>,
}

impl WeekendRule {
    /// Creates a weekend rule from the given weekdays.
    ///
    /// Duplicates are ignored.
    #[must_use]
    pub fn new(days: &[Weekday]) -> Self {
        let mut unique: Vec<Weekday> = Vec::with_capacity(days.len());
        for day in days {
            if !unique.contains(day) {
                unique.push(*day);
            }
        }
        Self { days: unique }
    }

    /// Returns true if the date falls on a weekend day.
    #[must_use]
    pub fn is_weekend(&self, date: Date) -> bool {
        self.days.contains(&date.weekday())
    }

    /// Returns the configured weekend days.
    #[must_use]
    pub fn days(&self) -> &[Weekday] {
        &self.days
    }
}

impl Default for WeekendRule {
    fn default() -> Self {
        Self::new(&[Weekday::Saturday, Weekday::Sunday])
    }
}

/// Weekend and holiday dates found inside a range.
///
/// A date may appear in both sets; callers decide how overlaps count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonWorkingDays {
    pub weekends: BTreeSet<Date>,
    pub holidays: BTreeSet<Date>,
    /// Holiday names keyed by date. Same-day holidays are joined with ", ".
    pub holiday_names: BTreeMap<Date, String>,
}

impl NonWorkingDays {
    /// Returns true if the date is a weekend.
    #[must_use]
    pub fn is_weekend(&self, date: Date) -> bool {
        self.weekends.contains(&date)
    }

    /// Returns true if the date is a holiday.
    #[must_use]
    pub fn is_holiday(&self, date: Date) -> bool {
        self.holidays.contains(&date)
    }

    /// Returns true if the date is a weekend or a holiday.
    #[must_use]
    pub fn is_non_working(&self, date: Date) -> bool {
        self.is_weekend(date) || self.is_holiday(date)
    }
}

/// Returns true if a holiday of `holiday_scope` applies to a query in `scope`.
const fn holiday_applies(holiday_scope: Scope, scope: Scope) -> bool {
    match (holiday_scope, scope) {
        (Scope::Company, _) => true,
        (Scope::Institution(holiday_inst), Scope::Institution(query_inst)) => {
            holiday_inst == query_inst
        }
        (Scope::Institution(_), Scope::Company) => false,
    }
}

/// Resolves weekends and holidays inside `range` for `scope`.
///
/// Both bounds of the range are inclusive. Holidays outside the range or
/// belonging to another institution are ignored.
///
/// # Arguments
///
/// * `scope` - Organization-wide or a specific institution
/// * `range` - The inclusive date range to inspect
/// * `holidays` - Candidate holidays supplied by the calendar store
/// * `weekend_rule` - The fixed weekend pattern
#[must_use]
pub fn resolve_non_working_days(
    scope: Scope,
    range: &DateRange,
    holidays: &[Holiday],
    weekend_rule: &WeekendRule,
) -> NonWorkingDays {
    let weekends: BTreeSet<Date> = range
        .dates()
        .filter(|date| weekend_rule.is_weekend(*date))
        .collect();

    let mut result: NonWorkingDays = NonWorkingDays {
        weekends,
        ..NonWorkingDays::default()
    };

    for holiday in holidays
        .iter()
        .filter(|h| range.contains(h.date) && holiday_applies(h.scope, scope))
    {
        result.holidays.insert(holiday.date);
        result
            .holiday_names
            .entry(holiday.date)
            .and_modify(|names| {
                names.push_str(", ");
                names.push_str(&holiday.name);
            })
            .or_insert_with(|| holiday.name.clone());
    }

    result
}
