// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Conversions between domain values and their column representations.

use leave_desk_domain::{parse_iso_date, weekday_from_number};
use time::{Date, Weekday};

use crate::error::PersistenceError;

/// Column text for a date (`YYYY-MM-DD`).
pub fn date_text(date: Date) -> String {
    date.to_string()
}

/// Parses a stored date column.
pub fn parse_date(value: &str) -> Result<Date, PersistenceError> {
    parse_iso_date(value).map_err(|e| PersistenceError::ReconstructionError(e.to_string()))
}

/// Stored day-of-week number, Monday = 1.
pub fn weekday_number(day: Weekday) -> i32 {
    i32::from(day.number_from_monday())
}

/// Parses a stored day-of-week number.
pub fn parse_weekday(value: i32) -> Result<Weekday, PersistenceError> {
    let number: u8 = u8::try_from(value)
        .map_err(|_| PersistenceError::ReconstructionError(format!("day {value} out of range")))?;
    weekday_from_number(number).map_err(|e| PersistenceError::ReconstructionError(e.to_string()))
}

/// Converts a day count for storage.
pub fn count_column(value: u32) -> Result<i32, PersistenceError> {
    i32::try_from(value)
        .map_err(|_| PersistenceError::SerializationError(format!("count {value} out of range")))
}

/// Converts a stored day count.
pub fn count_value(value: i32, column: &str) -> Result<u32, PersistenceError> {
    u32::try_from(value).map_err(|_| {
        PersistenceError::ReconstructionError(format!("{column} is negative: {value}"))
    })
}

/// Converts a stored month number.
pub fn month_value(value: i32) -> Result<u8, PersistenceError> {
    u8::try_from(value)
        .ok()
        .filter(|m| (1..=12).contains(m))
        .ok_or_else(|| PersistenceError::ReconstructionError(format!("invalid month {value}")))
}

/// Converts a stored boolean flag.
pub const fn flag_value(value: i32) -> bool {
    value != 0
}

/// Converts a boolean for storage.
pub fn flag_column(value: bool) -> i32 {
    i32::from(value)
}
