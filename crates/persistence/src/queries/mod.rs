// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Query modules for persistence layer.
//!
//! This module contains all read-only queries for the persistence layer.
//!
//! ## Module Organization
//!
//! - `reference`: Staff directory, periods, timetable and holiday calendar
//! - `balances`: Monthly leave balance ledger
//! - `applications`: Leave applications, month allocations and bookings
//! - `audit`: Application history
//!
//! Functions take a `&mut SqliteConnection` and never open transactions;
//! transaction boundaries belong to the `Persistence` adapter in `lib.rs`.

pub mod applications;
pub mod audit;
pub mod balances;
pub mod reference;

pub use applications::{
    get_leave_application, list_active_bookings, list_leave_applications, list_live_leave,
};
pub use audit::get_application_history;
pub use balances::{VersionedBalance, find_balance};
pub use reference::{
    get_period, get_recurring_assignments, get_staff, list_active_staff,
    list_holidays_in_range, list_institution_staff, list_institution_timetable, list_periods,
};
