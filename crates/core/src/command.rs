// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use leave_desk_domain::{ApprovalStage, DateRange, LeaveType, SlotSelection, StaffMember};

/// A decision on an existing leave application, as data only.
///
/// Commands are the only way to request a status change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Approve at the given stage of the approval chain.
    Approve {
        /// The approving staff member.
        approver_id: i64,
        /// The stage the approver acts for.
        stage: ApprovalStage,
    },
    /// Reject a pending application.
    Reject {
        /// The rejecting staff member.
        rejector_id: i64,
        /// The stage the rejector acts for.
        stage: ApprovalStage,
        /// Why the application was rejected.
        reason: String,
    },
    /// Withdraw a pending or approved application.
    Cancel {
        /// The applicant or administrator withdrawing the application.
        requester_id: i64,
    },
}

impl Command {
    /// Returns the staff id of the person issuing the command.
    #[must_use]
    pub const fn issuer_id(&self) -> i64 {
        match self {
            Self::Approve { approver_id, .. } => *approver_id,
            Self::Reject { rejector_id, .. } => *rejector_id,
            Self::Cancel { requester_id } => *requester_id,
        }
    }
}

/// A new leave request as entered by the applicant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveRequest {
    /// The applicant's directory record.
    pub applicant: StaffMember,
    /// The requested range; `None` if none was selected.
    pub range: Option<DateRange>,
    pub leave_type: LeaveType,
    pub reason: String,
    /// One selection per affected teaching slot.
    pub selections: Vec<SlotSelection>,
}
