// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::leave_balance::LeaveSplit;
use crate::leave_days::LeaveDayCalculation;
use crate::leave_status::{ApprovalStage, LeaveStatus};
use crate::substitute::SubstituteAssignment;
use crate::types::{ApplicantType, DateRange, LeaveType};
use serde::{Deserialize, Serialize};

/// One request for time off.
///
/// Applications are created in `Pending` and only change through workflow
/// transitions. They are never deleted; cancellation is a status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveApplication {
    /// `None` until the application has been persisted.
    pub application_id: Option<i64>,
    pub applicant_id: i64,
    pub applicant_type: ApplicantType,
    pub institution_id: i64,
    pub range: DateRange,
    pub leave_type: LeaveType,
    pub reason: String,
    /// Calendar breakdown of the range.
    pub days: LeaveDayCalculation,
    /// Paid/LOP split. A preview while pending, authoritative once approved.
    pub split: LeaveSplit,
    pub status: LeaveStatus,
    /// The stage awaiting a decision; `None` once decided.
    pub approval_stage: Option<ApprovalStage>,
    pub management_approved_by: Option<i64>,
    pub final_approved_by: Option<i64>,
    pub rejected_by: Option<i64>,
    pub rejection_reason: Option<String>,
    pub cancelled_by: Option<i64>,
    pub substitute_assignments: Vec<SubstituteAssignment>,
    /// Optimistic concurrency version, bumped on every transition.
    pub version: i64,
}

impl LeaveApplication {
    /// Returns the chargeable leave days.
    #[must_use]
    pub const fn total_days(&self) -> u32 {
        self.split.actual_leave_days
    }

    /// Returns the paid leave days.
    #[must_use]
    pub const fn paid_days(&self) -> u32 {
        self.split.paid_days
    }

    /// Returns the loss-of-pay days.
    #[must_use]
    pub const fn lop_days(&self) -> u32 {
        self.split.lop_days
    }

    /// Short description of the mutable state, used for audit snapshots.
    #[must_use]
    pub fn state_summary(&self) -> String {
        let stage: &str = self.approval_stage.as_ref().map_or("none", ApprovalStage::as_str);
        format!(
            "status={} stage={} paid_days={} lop_days={}",
            self.status.as_str(),
            stage,
            self.split.paid_days,
            self.split.lop_days
        )
    }
}
