// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Substitute matching for classes affected by leave.
//!
//! This module expands an applicant's recurring timetable into the concrete
//! teaching slots that fall on chargeable leave days, evaluates which
//! colleagues can cover each slot, and resolves the applicant's per-slot
//! selections into substitute assignments.
//!
//! Every affected slot must end in exactly one of two explicit outcomes:
//! a chosen substitute or "no substitution required". A slot left
//! unselected blocks submission.

use crate::calendar::NonWorkingDays;
use crate::error::DomainError;
use crate::types::{DateRange, StaffMember, TimetableEntry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use time::{Date, Weekday};

const REASON_TEACHING: &str = "has their own class in this period";
const REASON_BOOKED: &str = "is already substituting in this period";
const REASON_ON_LEAVE: &str = "is on leave that day";
const REASON_SELECTED_TWICE: &str = "is already selected for another class in this period";
const REASON_INACTIVE: &str = "is no longer an active staff member of this institution";

/// A teaching commitment of the applicant on a chargeable leave day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffectedSlot {
    pub date: Date,
    pub day_of_week: Weekday,
    pub period_id: i64,
    /// Display order of the period; used for ordering only.
    pub period_order: i32,
    pub institution_id: i64,
    pub class_id: i64,
    pub subject: String,
    pub room: Option<String>,
}

impl AffectedSlot {
    /// Returns true if this slot is identified by the given date and period.
    #[must_use]
    pub fn is_at(&self, date: Date, period_id: i64) -> bool {
        self.date == date && self.period_id == period_id
    }
}

/// Enumerates the teaching slots affected by a leave range.
///
/// Entries from other institutions are ignored. Dates that are weekends or
/// holidays are skipped because the institution is closed anyway.
///
/// Results are ordered by date, then period display order, then period id.
///
/// # Arguments
///
/// * `entries` - The applicant's recurring timetable entries
/// * `institution_id` - The institution the leave is taken at
/// * `range` - The leave range
/// * `non_working` - Weekends and holidays resolved for the range
#[must_use]
pub fn find_affected_slots(
    entries: &[TimetableEntry],
    institution_id: i64,
    range: &DateRange,
    non_working: &NonWorkingDays,
) -> Vec<AffectedSlot> {
    let mut slots: Vec<AffectedSlot> = Vec::new();

    for date in range.dates().filter(|d| !non_working.is_non_working(*d)) {
        let day_of_week: Weekday = date.weekday();
        for entry in entries
            .iter()
            .filter(|e| e.institution_id == institution_id && e.day_of_week == day_of_week)
        {
            slots.push(AffectedSlot {
                date,
                day_of_week,
                period_id: entry.period_id,
                period_order: entry.period_order,
                institution_id,
                class_id: entry.class_id,
                subject: entry.subject.clone(),
                room: entry.room.clone(),
            });
        }
    }

    slots.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then(a.period_order.cmp(&b.period_order))
            .then(a.period_id.cmp(&b.period_id))
            .then(a.class_id.cmp(&b.class_id))
    });
    slots
}

/// A substitute already booked by a live application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubstituteBooking {
    pub application_id: i64,
    pub substitute_staff_id: i64,
    pub institution_id: i64,
    pub date: Date,
    pub period_id: i64,
}

/// Leave held by a colleague through a live application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffLeave {
    pub staff_id: i64,
    pub range: DateRange,
}

/// A candidate substitute for a slot.
///
/// Busy candidates are still listed so callers can present them as
/// disabled options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableSubstitute {
    pub staff_id: i64,
    pub name: String,
    pub is_available: bool,
    /// Why the candidate is busy; `None` when available.
    pub reason: Option<String>,
}

/// Snapshot of everything that decides who can cover a class at an institution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubstituteAvailability {
    pub institution_id: i64,
    /// Staff of the institution.
    pub roster: Vec<StaffMember>,
    /// Recurring timetable of the whole institution.
    pub commitments: Vec<TimetableEntry>,
    /// Active substitute bookings of live applications.
    pub bookings: Vec<SubstituteBooking>,
    /// Live leave of the institution's staff.
    pub on_leave: Vec<StaffLeave>,
}

impl SubstituteAvailability {
    /// Drops the bookings held by `application_id`, so an application is
    /// not found in conflict with itself.
    #[must_use]
    pub fn without_application(mut self, application_id: i64) -> Self {
        self.bookings.retain(|b| b.application_id != application_id);
        self
    }

    /// Returns why `staff_id` cannot cover the given period, if they cannot.
    ///
    /// Booking and leave checks need a concrete date and are skipped
    /// without one.
    fn busy_reason(
        &self,
        staff_id: i64,
        day_of_week: Weekday,
        period_id: i64,
        date: Option<Date>,
    ) -> Option<&'static str> {
        let teaching: bool = self.commitments.iter().any(|c| {
            c.staff_id == staff_id
                && c.institution_id == self.institution_id
                && c.day_of_week == day_of_week
                && c.period_id == period_id
        });
        if teaching {
            return Some(REASON_TEACHING);
        }

        let date: Date = date?;

        let booked: bool = self.bookings.iter().any(|b| {
            b.substitute_staff_id == staff_id
                && b.institution_id == self.institution_id
                && b.date == date
                && b.period_id == period_id
        });
        if booked {
            return Some(REASON_BOOKED);
        }

        let on_leave: bool = self
            .on_leave
            .iter()
            .any(|l| l.staff_id == staff_id && l.range.contains(date));
        if on_leave {
            return Some(REASON_ON_LEAVE);
        }

        None
    }

    /// Lists the candidates for a period, available or not.
    ///
    /// The candidate pool is every active staff member of the institution
    /// except `exclude_staff_id`.
    ///
    /// # Arguments
    ///
    /// * `day_of_week` - The weekday of the period
    /// * `period_id` - The period to cover
    /// * `date` - The concrete date, when known
    /// * `exclude_staff_id` - The applicant, who cannot cover their own class
    #[must_use]
    pub fn candidates_for(
        &self,
        day_of_week: Weekday,
        period_id: i64,
        date: Option<Date>,
        exclude_staff_id: i64,
    ) -> Vec<AvailableSubstitute> {
        self.roster
            .iter()
            .filter(|s| {
                s.is_active
                    && s.institution_id == self.institution_id
                    && s.staff_id != exclude_staff_id
            })
            .map(|s| {
                let reason: Option<&str> = self.busy_reason(s.staff_id, day_of_week, period_id, date);
                AvailableSubstitute {
                    staff_id: s.staff_id,
                    name: s.name.clone(),
                    is_available: reason.is_none(),
                    reason: reason.map(str::to_string),
                }
            })
            .collect()
    }

    /// Checks that a candidate can cover a slot.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidSubstitute` if the candidate is the
    /// applicant or not an active member of the institution, and
    /// `DomainError::SubstituteUnavailable` if they are busy.
    pub fn check(
        &self,
        substitute_id: i64,
        applicant_id: i64,
        slot: &AffectedSlot,
    ) -> Result<(), DomainError> {
        if substitute_id == applicant_id {
            return Err(DomainError::InvalidSubstitute {
                substitute_id,
                reason: "an applicant cannot substitute for their own class".to_string(),
            });
        }

        let eligible: bool = self.roster.iter().any(|s| {
            s.staff_id == substitute_id && s.is_active && s.institution_id == self.institution_id
        });
        if !eligible {
            return Err(DomainError::InvalidSubstitute {
                substitute_id,
                reason: "not an active staff member of this institution".to_string(),
            });
        }

        match self.busy_reason(substitute_id, slot.day_of_week, slot.period_id, Some(slot.date)) {
            Some(reason) => Err(DomainError::SubstituteUnavailable {
                substitute_id,
                date: slot.date,
                period_id: slot.period_id,
                reason: reason.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Re-checks the substitutes of stored assignments against this snapshot.
    ///
    /// Assignments that need no substitution always pass.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SubstituteUnavailable` for the first substitute
    /// who has since left the roster or become busy.
    pub fn verify_assignments(
        &self,
        assignments: &[SubstituteAssignment],
    ) -> Result<(), DomainError> {
        for assignment in assignments {
            let Some(substitute_id) = assignment.substitute_staff_id else {
                continue;
            };

            let still_eligible: bool = self.roster.iter().any(|s| {
                s.staff_id == substitute_id
                    && s.is_active
                    && s.institution_id == self.institution_id
            });
            let reason: Option<&str> = if still_eligible {
                self.busy_reason(
                    substitute_id,
                    assignment.day_of_week,
                    assignment.period_id,
                    Some(assignment.date),
                )
            } else {
                Some(REASON_INACTIVE)
            };

            if let Some(reason) = reason {
                return Err(DomainError::SubstituteUnavailable {
                    substitute_id,
                    date: assignment.date,
                    period_id: assignment.period_id,
                    reason: reason.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// The selection made for one affected slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "substitute_id", rename_all = "snake_case")]
pub enum SubstituteChoice {
    /// Nothing chosen yet.
    #[default]
    Unselected,
    /// A named colleague covers the class.
    Substitute(i64),
    /// The class explicitly needs no cover.
    NoSubstitutionRequired,
}

/// The applicant's selection for the slot at `date` and `period_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSelection {
    pub date: Date,
    pub period_id: i64,
    pub choice: SubstituteChoice,
}

/// One covered (or explicitly uncovered) teaching slot of an application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubstituteAssignment {
    pub original_staff_id: i64,
    /// `None` means no substitution is required.
    pub substitute_staff_id: Option<i64>,
    pub institution_id: i64,
    pub date: Date,
    pub day_of_week: Weekday,
    pub period_id: i64,
    pub class_id: i64,
    pub subject: String,
    pub room: Option<String>,
}

/// Resolves per-slot selections into substitute assignments.
///
/// Every affected slot must have a selection other than `Unselected`, and
/// every selection must name an affected slot exactly once. Chosen substitutes are
/// re-checked against `availability`, and the same colleague cannot be
/// picked twice for one date and period.
///
/// # Arguments
///
/// * `applicant_id` - The staff member taking leave
/// * `slots` - Affected slots in display order
/// * `selections` - The applicant's choices
/// * `availability` - Current availability snapshot of the institution
///
/// # Errors
///
/// Returns `DomainError::UnknownSlot`, `DomainError::DuplicateSelection`,
/// `DomainError::UnassignedSlot`,
/// `DomainError::InvalidSubstitute`, or `DomainError::SubstituteUnavailable`.
pub fn resolve_substitute_assignments(
    applicant_id: i64,
    slots: &[AffectedSlot],
    selections: &[SlotSelection],
    availability: &SubstituteAvailability,
) -> Result<Vec<SubstituteAssignment>, DomainError> {
    if let Some(stray) = selections
        .iter()
        .find(|sel| !slots.iter().any(|slot| slot.is_at(sel.date, sel.period_id)))
    {
        return Err(DomainError::UnknownSlot {
            date: stray.date,
            period_id: stray.period_id,
        });
    }

    let mut named: BTreeSet<(Date, i64)> = BTreeSet::new();
    if let Some(repeated) = selections
        .iter()
        .find(|sel| !named.insert((sel.date, sel.period_id)))
    {
        return Err(DomainError::DuplicateSelection {
            date: repeated.date,
            period_id: repeated.period_id,
        });
    }

    let mut assignments: Vec<SubstituteAssignment> = Vec::with_capacity(slots.len());
    let mut chosen: Vec<(i64, Date, i64)> = Vec::new();

    for slot in slots {
        let choice: SubstituteChoice = selections
            .iter()
            .find(|sel| slot.is_at(sel.date, sel.period_id))
            .map_or(SubstituteChoice::Unselected, |sel| sel.choice);

        let substitute_staff_id: Option<i64> = match choice {
            SubstituteChoice::Unselected => {
                return Err(DomainError::UnassignedSlot {
                    date: slot.date,
                    period_id: slot.period_id,
                });
            }
            SubstituteChoice::NoSubstitutionRequired => None,
            SubstituteChoice::Substitute(substitute_id) => {
                availability.check(substitute_id, applicant_id, slot)?;

                let key: (i64, Date, i64) = (substitute_id, slot.date, slot.period_id);
                if chosen.contains(&key) {
                    return Err(DomainError::SubstituteUnavailable {
                        substitute_id,
                        date: slot.date,
                        period_id: slot.period_id,
                        reason: REASON_SELECTED_TWICE.to_string(),
                    });
                }
                chosen.push(key);
                Some(substitute_id)
            }
        };

        assignments.push(SubstituteAssignment {
            original_staff_id: applicant_id,
            substitute_staff_id,
            institution_id: slot.institution_id,
            date: slot.date,
            day_of_week: slot.day_of_week,
            period_id: slot.period_id,
            class_id: slot.class_id,
            subject: slot.subject.clone(),
            room: slot.room.clone(),
        });
    }

    Ok(assignments)
}
