// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::{Date, Weekday};

/// Parses an ISO 8601 calendar date (`YYYY-MM-DD`).
///
/// # Errors
///
/// Returns `DomainError::DateParseError` if the string is not a valid date.
pub fn parse_iso_date(value: &str) -> Result<Date, DomainError> {
    Date::parse(
        value.trim(),
        time::macros::format_description!("[year]-[month]-[day]"),
    )
    .map_err(|e| DomainError::DateParseError {
        date_string: value.to_string(),
        error: e.to_string(),
    })
}

/// Converts a 1-based (Monday = 1) day number into a `Weekday`.
///
/// # Errors
///
/// Returns `DomainError::InvalidDayOfWeek` for values outside 1..=7.
pub const fn weekday_from_number(value: u8) -> Result<Weekday, DomainError> {
    match value {
        1 => Ok(Weekday::Monday),
        2 => Ok(Weekday::Tuesday),
        3 => Ok(Weekday::Wednesday),
        4 => Ok(Weekday::Thursday),
        5 => Ok(Weekday::Friday),
        6 => Ok(Weekday::Saturday),
        7 => Ok(Weekday::Sunday),
        _ => Err(DomainError::InvalidDayOfWeek(value)),
    }
}

/// The kind of person applying for leave.
///
/// Applicant type selects the approval chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicantType {
    /// Officer deployed to an institution by the organization.
    Officer,
    /// Staff member employed by the institution.
    Staff,
}

impl ApplicantType {
    /// Returns the string representation used for persistence and the API.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Officer => "officer",
            Self::Staff => "staff",
        }
    }
}

impl FromStr for ApplicantType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "officer" => Ok(Self::Officer),
            "staff" => Ok(Self::Staff),
            _ => Err(DomainError::InvalidApplicantType(s.to_string())),
        }
    }
}

impl std::fmt::Display for ApplicantType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Category of leave being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum LeaveType {
    /// Sick leave.
    Sick,
    /// Casual leave.
    Casual,
}

impl LeaveType {
    /// Returns the string representation used for persistence and the API.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sick => "sick",
            Self::Casual => "casual",
        }
    }
}

impl FromStr for LeaveType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sick" => Ok(Self::Sick),
            "casual" => Ok(Self::Casual),
            _ => Err(DomainError::InvalidLeaveType(s.to_string())),
        }
    }
}

impl std::fmt::Display for LeaveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Calendar scope: the whole organization or one institution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// Organization-wide calendar.
    Company,
    /// Calendar of a single institution.
    Institution(i64),
}

impl Scope {
    /// Returns the institution identifier, if this is an institution scope.
    #[must_use]
    pub const fn institution_id(&self) -> Option<i64> {
        match self {
            Self::Company => None,
            Self::Institution(id) => Some(*id),
        }
    }

    /// Builds a scope from an optional institution identifier.
    #[must_use]
    pub const fn from_institution(institution_id: Option<i64>) -> Self {
        match institution_id {
            Some(id) => Self::Institution(id),
            None => Self::Company,
        }
    }
}

/// An inclusive range of calendar dates.
///
/// Construction guarantees `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    start: Date,
    end: Date,
}

impl DateRange {
    /// Creates a new inclusive date range.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidDateRange` if `start` is after `end`.
    pub fn new(start: Date, end: Date) -> Result<Self, DomainError> {
        if start > end {
            return Err(DomainError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parses a range from two ISO 8601 date strings.
    ///
    /// # Errors
    ///
    /// Returns an error if either date fails to parse or the range is inverted.
    pub fn parse(start: &str, end: &str) -> Result<Self, DomainError> {
        Self::new(parse_iso_date(start)?, parse_iso_date(end)?)
    }

    /// Returns the first day of the range.
    #[must_use]
    pub const fn start(&self) -> Date {
        self.start
    }

    /// Returns the last day of the range.
    #[must_use]
    pub const fn end(&self) -> Date {
        self.end
    }

    /// Returns the inclusive number of calendar days in the range.
    #[must_use]
    pub fn total_days(&self) -> u32 {
        let span: i64 = (self.end - self.start).whole_days() + 1;
        u32::try_from(span).unwrap_or(u32::MAX)
    }

    /// Returns true if the date falls inside the range.
    #[must_use]
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }

    /// Returns true if the two ranges share at least one day.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Iterates every date of the range in ascending order.
    pub fn dates(&self) -> impl Iterator<Item = Date> + use<> {
        let end: Date = self.end;
        std::iter::successors(Some(self.start), move |day| {
            day.next_day().filter(|next| *next <= end)
        })
    }
}

/// A dated holiday for a given scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    /// The holiday date.
    pub date: Date,
    /// Display name of the holiday.
    pub name: String,
    /// The calendar the holiday belongs to.
    pub scope: Scope,
}

impl Holiday {
    /// Creates a new holiday.
    #[must_use]
    pub const fn new(date: Date, name: String, scope: Scope) -> Self {
        Self { date, name, scope }
    }
}

/// A staff member as known to the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    pub staff_id: i64,
    pub institution_id: i64,
    pub name: String,
    pub applicant_type: ApplicantType,
    pub is_active: bool,
}

/// A teaching period of an institution's day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub period_id: i64,
    pub institution_id: i64,
    pub label: String,
    /// Position of the period within the day; lower sorts first.
    pub display_order: i32,
}

/// A recurring weekly teaching commitment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimetableEntry {
    pub staff_id: i64,
    pub institution_id: i64,
    pub day_of_week: Weekday,
    pub period_id: i64,
    /// Display order of the period, carried for slot ordering.
    pub period_order: i32,
    pub class_id: i64,
    pub subject: String,
    pub room: Option<String>,
}
