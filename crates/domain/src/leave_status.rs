// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Leave status tracking and transition logic.
//!
//! This module defines the leave application lifecycle and the approval
//! chain per applicant type. Status only changes through explicit
//! approve, reject, and cancel decisions.

use crate::error::DomainError;
use crate::types::ApplicantType;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Lifecycle state of a leave application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveStatus {
    /// Submitted and awaiting a decision
    Pending,
    /// Finally approved; paid days have been consumed
    Approved,
    /// Rejected by an approver
    Rejected,
    /// Withdrawn by the applicant or an administrator
    Cancelled,
}

impl LeaveStatus {
    /// Returns the string representation of the status.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a status from its string representation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidLeaveStatus` if the string is not a valid status.
    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(DomainError::InvalidLeaveStatus(s.to_string())),
        }
    }

    /// Returns true if no approval decision can be taken in this status.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Returns true if the application still holds days and substitute bookings.
    #[must_use]
    pub const fn is_live(&self) -> bool {
        matches!(self, Self::Pending | Self::Approved)
    }

    /// Validates if a transition from this status to another is permitted.
    ///
    /// `Pending` may move to any other status. `Approved` may only be
    /// cancelled. `Rejected` and `Cancelled` admit nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the transition is not allowed.
    pub fn validate_transition(&self, new_status: Self) -> Result<(), DomainError> {
        let valid: bool = match self {
            Self::Pending => !matches!(new_status, Self::Pending),
            Self::Approved => matches!(new_status, Self::Cancelled),
            Self::Rejected | Self::Cancelled => false,
        };

        if valid {
            Ok(())
        } else {
            Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
                reason: "this application has already been decided".to_string(),
            })
        }
    }
}

impl FromStr for LeaveStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A level of the approval chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStage {
    /// Management of the applicant's institution
    InstitutionManagement,
    /// Organization-level final authority
    FinalAuthority,
}

impl ApprovalStage {
    /// Returns the string representation of the stage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InstitutionManagement => "institution_management",
            Self::FinalAuthority => "final_authority",
        }
    }
}

impl FromStr for ApprovalStage {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "institution_management" => Ok(Self::InstitutionManagement),
            "final_authority" => Ok(Self::FinalAuthority),
            _ => Err(DomainError::InvalidApprovalStage(s.to_string())),
        }
    }
}

impl std::fmt::Display for ApprovalStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Returns the ordered approval chain for an applicant type.
#[must_use]
pub const fn approval_chain(applicant_type: ApplicantType) -> &'static [ApprovalStage] {
    match applicant_type {
        ApplicantType::Staff => &[ApprovalStage::InstitutionManagement],
        ApplicantType::Officer => &[
            ApprovalStage::InstitutionManagement,
            ApprovalStage::FinalAuthority,
        ],
    }
}

/// Returns the first stage an application of this type waits on.
#[must_use]
pub const fn first_stage(applicant_type: ApplicantType) -> ApprovalStage {
    match applicant_type {
        ApplicantType::Staff | ApplicantType::Officer => ApprovalStage::InstitutionManagement,
    }
}

/// Returns the stage after `current`, or `None` if `current` is final.
#[must_use]
pub fn next_stage(applicant_type: ApplicantType, current: ApprovalStage) -> Option<ApprovalStage> {
    let chain: &[ApprovalStage] = approval_chain(applicant_type);
    chain
        .iter()
        .position(|stage| *stage == current)
        .and_then(|index| chain.get(index + 1))
        .copied()
}

/// Returns true if `stage` comes before `current` in the chain of
/// `applicant_type`, that is, `stage` has already been passed.
#[must_use]
pub fn stage_precedes(
    applicant_type: ApplicantType,
    stage: ApprovalStage,
    current: ApprovalStage,
) -> bool {
    let chain: &[ApprovalStage] = approval_chain(applicant_type);
    let position = |wanted: ApprovalStage| chain.iter().position(|s| *s == wanted);
    matches!((position(stage), position(current)), (Some(a), Some(b)) if a < b)
}
