// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Deployment configuration for the leave workflow.

use leave_desk_domain::{BalancePolicy, MIN_REASON_LENGTH, WeekendRule};
use leave_desk_persistence::ContextSettings;
use thiserror::Error;
use time::Weekday;

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A weekend day name was not recognised.
    #[error("Unknown weekday '{0}'")]
    UnknownWeekday(String),

    /// Every day of the week was declared a weekend.
    #[error("At least one working day is required")]
    NoWorkingDays,

    /// The minimum reason length must be positive.
    #[error("Minimum reason length must be at least 1")]
    InvalidReasonLength,
}

/// Settings passed explicitly into every operation that needs them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveConfig {
    /// Credit applied to months with no ledger record.
    pub balance_policy: BalancePolicy,
    /// Weekdays treated as weekend.
    pub weekend_rule: WeekendRule,
    /// Minimum trimmed length of a leave reason.
    pub min_reason_length: usize,
}

impl Default for LeaveConfig {
    fn default() -> Self {
        Self {
            balance_policy: BalancePolicy::default(),
            weekend_rule: WeekendRule::default(),
            min_reason_length: MIN_REASON_LENGTH,
        }
    }
}

impl LeaveConfig {
    /// Builds a configuration from raw settings.
    ///
    /// # Arguments
    ///
    /// * `monthly_credit` - Paid days credited to a month with no record
    /// * `weekend_days` - Weekday names, e.g. `["saturday", "sunday"]`
    /// * `min_reason_length` - Minimum reason length
    ///
    /// # Errors
    ///
    /// Returns an error if a weekday is unknown, if every day is a weekend,
    /// or if the reason length is zero.
    pub fn new<S: AsRef<str>>(
        monthly_credit: u32,
        weekend_days: &[S],
        min_reason_length: usize,
    ) -> Result<Self, ConfigError> {
        if min_reason_length == 0 {
            return Err(ConfigError::InvalidReasonLength);
        }

        let days: Vec<Weekday> = weekend_days
            .iter()
            .map(|name| parse_weekday_name(name.as_ref()))
            .collect::<Result<_, _>>()?;
        let weekend_rule: WeekendRule = WeekendRule::new(&days);
        if weekend_rule.days().len() >= 7 {
            return Err(ConfigError::NoWorkingDays);
        }

        Ok(Self {
            balance_policy: BalancePolicy::new(monthly_credit),
            weekend_rule,
            min_reason_length,
        })
    }

    /// Returns the settings the persistence layer loads contexts with.
    #[must_use]
    pub fn context_settings(&self) -> ContextSettings {
        ContextSettings {
            policy: self.balance_policy,
            weekend_rule: self.weekend_rule.clone(),
            min_reason_length: self.min_reason_length,
        }
    }
}

/// Parses an English weekday name or its three-letter abbreviation.
///
/// # Errors
///
/// Returns `ConfigError::UnknownWeekday` for anything else.
pub fn parse_weekday_name(name: &str) -> Result<Weekday, ConfigError> {
    match name.trim().to_lowercase().as_str() {
        "monday" | "mon" => Ok(Weekday::Monday),
        "tuesday" | "tue" => Ok(Weekday::Tuesday),
        "wednesday" | "wed" => Ok(Weekday::Wednesday),
        "thursday" | "thu" => Ok(Weekday::Thursday),
        "friday" | "fri" => Ok(Weekday::Friday),
        "saturday" | "sat" => Ok(Weekday::Saturday),
        "sunday" | "sun" => Ok(Weekday::Sunday),
        _ => Err(ConfigError::UnknownWeekday(name.to_string())),
    }
}
