// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Mutation modules.
//!
//! This module contains all state-changing operations for the persistence layer.
//! Mutations use Diesel DSL, with `last_insert_rowid()` provided by the
//! `backend` module.
//!
//! ## Module Organization
//!
//! - `reference`: Staff, periods, timetable entries and holidays
//! - `balances`: Version-guarded ledger writes
//! - `applications`: Applications, month allocations and substitute bookings
//! - `audit`: Audit event persistence
//!
//! Guarded writes return `PersistenceError::ConcurrentModification` when the
//! stored version no longer matches the one the caller read.

pub mod applications;
pub mod audit;
pub mod balances;
pub mod reference;

pub use applications::{
    insert_application, release_bookings, replace_month_allocations, update_application_guarded,
};
pub use audit::persist_audit_event;
pub use balances::{insert_balance, update_balance_guarded};
pub use reference::{
    insert_holiday, insert_period, insert_staff, insert_timetable_entry, set_staff_active,
};
