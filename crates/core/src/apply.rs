// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::{Command, LeaveRequest};
use crate::error::CoreError;
use crate::state::{SubmissionContext, SubmissionResult, TransitionContext, TransitionResult};
use leave_desk_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use leave_desk_domain::{
    AffectedSlot, ApprovalStage, BalancePolicy, DateRange, DomainError, LeaveApplication,
    LeaveBalance, LeaveDayCalculation, LeaveSplit, LeaveStatus, MonthAllocation,
    SubstituteAssignment, allocate_paid_days, calculate_leave_days, chargeable_dates,
    find_affected_slots, first_stage, group_by_month, next_stage, resolve_substitute_assignments,
    stage_precedes, validate_leave_request, validate_rejection_reason,
};

/// Applies a leave request, producing a new pending application and audit event.
///
/// The paid/LOP split computed here is a preview against the current
/// ledger; no balance is consumed on submission.
///
/// # Arguments
///
/// * `request` - The applicant's request
/// * `context` - Calendar, timetable, availability and ledger data for the range
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
///
/// # Returns
///
/// * `Ok(SubmissionResult)` containing the new application and audit event
/// * `Err(CoreError)` if the request is invalid
///
/// # Errors
///
/// Returns an error if:
/// - No range was selected or the reason is too short
/// - An affected slot has no selection, or a selection names no affected slot
/// - A chosen substitute is ineligible or busy
pub fn apply_submission(
    request: &LeaveRequest,
    context: &SubmissionContext,
    actor: Actor,
    cause: Cause,
) -> Result<SubmissionResult, CoreError> {
    let applicant_id: i64 = request.applicant.staff_id;
    let institution_id: i64 = request.applicant.institution_id;

    let range: DateRange =
        validate_leave_request(request.range, &request.reason, context.min_reason_length)?;

    let days: LeaveDayCalculation = calculate_leave_days(Some(&range), &context.non_working);
    let months: Vec<MonthAllocation> =
        group_by_month(&chargeable_dates(&range, &context.non_working));
    let split: LeaveSplit = allocate_paid_days(&months, &context.balances, &context.policy);

    let slots: Vec<AffectedSlot> =
        find_affected_slots(&context.timetable, institution_id, &range, &context.non_working);
    let substitute_assignments: Vec<SubstituteAssignment> = resolve_substitute_assignments(
        applicant_id,
        &slots,
        &request.selections,
        &context.availability,
    )?;

    let application: LeaveApplication = LeaveApplication {
        application_id: None,
        applicant_id,
        applicant_type: request.applicant.applicant_type,
        institution_id,
        range,
        leave_type: request.leave_type,
        reason: request.reason.trim().to_string(),
        days,
        split,
        status: LeaveStatus::Pending,
        approval_stage: Some(first_stage(request.applicant.applicant_type)),
        management_approved_by: None,
        final_approved_by: None,
        rejected_by: None,
        rejection_reason: None,
        cancelled_by: None,
        substitute_assignments,
        version: 1,
    };

    let action: Action = Action::new(
        String::from(Action::SUBMIT),
        Some(format!(
            "Requested {} leave {} to {}: {} chargeable days, {} affected classes",
            application.leave_type,
            range.start(),
            range.end(),
            application.total_days(),
            application.substitute_assignments.len()
        )),
    );
    let audit_event: AuditEvent = AuditEvent::new(
        None,
        actor,
        cause,
        action,
        StateSnapshot::absent(),
        StateSnapshot::of(&application),
    );

    Ok(SubmissionResult {
        application,
        audit_event,
    })
}

/// Applies a decision to an application, producing the new application,
/// changed ledger records, and an audit event.
///
/// Every approval re-checks the stored substitute assignments against
/// the availability in `context`. A final approval re-derives the paid/LOP
/// split from the ledger in `context` and consumes it. Cancelling an approved application restores every paid
/// day recorded in its month allocations.
///
/// # Arguments
///
/// * `application` - The current application (immutable)
/// * `context` - The applicant's current ledger and the institution's substitute availability
/// * `command` - The decision to apply
/// * `policy` - Ledger policy for months with no record
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
///
/// # Errors
///
/// Returns an error if:
/// - The application has already been decided
/// - The actor's stage is not the stage the application waits on
/// - A stored substitute can no longer cover their class
/// - A rejection carries no reason
/// - The ledger cannot absorb the consumption or restoration
#[allow(clippy::too_many_lines)]
pub fn apply(
    application: &LeaveApplication,
    context: &TransitionContext,
    command: &Command,
    policy: &BalancePolicy,
    actor: Actor,
    cause: Cause,
) -> Result<TransitionResult, CoreError> {
    let before: StateSnapshot = StateSnapshot::of(application);
    let mut next: LeaveApplication = application.clone();
    next.version = application.version + 1;

    let (action, balance_updates): (Action, Vec<LeaveBalance>) = match command {
        Command::Approve { approver_id, stage } => {
            application.status.validate_transition(LeaveStatus::Approved)?;
            let current: ApprovalStage = awaited_stage(application, *stage)?;
            context
                .availability
                .verify_assignments(&application.substitute_assignments)?;

            if current == ApprovalStage::InstitutionManagement {
                next.management_approved_by = Some(*approver_id);
            }

            match next_stage(application.applicant_type, current) {
                Some(following) => {
                    next.approval_stage = Some(following);
                    let action: Action = Action::new(
                        String::from(Action::APPROVE),
                        Some(format!("Approved at {current}; awaiting {following}")),
                    );
                    (action, Vec::new())
                }
                None => {
                    let (split, updates): (LeaveSplit, Vec<LeaveBalance>) =
                        consume_paid_days(application, &context.balances, policy)?;
                    next.split = split;
                    next.status = LeaveStatus::Approved;
                    next.approval_stage = None;
                    next.final_approved_by = Some(*approver_id);
                    let action: Action = Action::new(
                        String::from(Action::APPROVE),
                        Some(format!(
                            "Final approval at {current}: {} paid, {} loss of pay",
                            next.split.paid_days, next.split.lop_days
                        )),
                    );
                    (action, updates)
                }
            }
        }
        Command::Reject {
            rejector_id,
            stage,
            reason,
        } => {
            application.status.validate_transition(LeaveStatus::Rejected)?;
            let current: ApprovalStage = awaited_stage(application, *stage)?;
            validate_rejection_reason(reason)?;

            next.status = LeaveStatus::Rejected;
            next.approval_stage = None;
            next.rejected_by = Some(*rejector_id);
            next.rejection_reason = Some(reason.trim().to_string());
            let action: Action = Action::new(
                String::from(Action::REJECT),
                Some(format!("Rejected at {current}: {}", reason.trim())),
            );
            (action, Vec::new())
        }
        Command::Cancel { requester_id } => {
            application.status.validate_transition(LeaveStatus::Cancelled)?;

            let was_approved: bool = application.status == LeaveStatus::Approved;
            let updates: Vec<LeaveBalance> = if was_approved {
                restore_paid_days(application, &context.balances, policy)?
            } else {
                Vec::new()
            };
            let restored: u32 = if was_approved {
                application.paid_days()
            } else {
                0
            };

            next.status = LeaveStatus::Cancelled;
            next.approval_stage = None;
            next.cancelled_by = Some(*requester_id);
            let action: Action = Action::new(
                String::from(Action::CANCEL),
                Some(format!(
                    "Cancelled from {}; {restored} paid days restored",
                    application.status
                )),
            );
            (action, updates)
        }
    };

    let audit_event: AuditEvent = AuditEvent::new(
        application.application_id,
        actor,
        cause,
        action,
        before,
        StateSnapshot::of(&next),
    );

    Ok(TransitionResult {
        application: next,
        balance_updates,
        audit_event,
    })
}

/// Returns the stage the application waits on, if it matches `acting`.
///
/// Acting for a stage that has already been passed is reported apart from
/// acting out of turn.
fn awaited_stage(
    application: &LeaveApplication,
    acting: ApprovalStage,
) -> Result<ApprovalStage, CoreError> {
    let current: ApprovalStage =
        application
            .approval_stage
            .ok_or_else(|| CoreError::InconsistentApplication {
                application_id: application.application_id,
                message: String::from("pending application has no approval stage"),
            })?;

    if stage_precedes(application.applicant_type, acting, current) {
        return Err(CoreError::DomainViolation(
            DomainError::StageAlreadyApproved {
                stage: acting.to_string(),
            },
        ));
    }
    if current != acting {
        return Err(CoreError::DomainViolation(
            DomainError::ApprovalStageMismatch {
                expected: current.to_string(),
                actual: acting.to_string(),
            },
        ));
    }
    Ok(current)
}

/// Finds the ledger record for a month, or opens one.
fn balance_for(
    applicant_id: i64,
    balances: &[LeaveBalance],
    year: i32,
    month: u8,
    policy: &BalancePolicy,
) -> LeaveBalance {
    balances
        .iter()
        .find(|b| b.is_for(year, month))
        .cloned()
        .unwrap_or_else(|| LeaveBalance::opening(applicant_id, year, month, policy))
}

/// Re-derives the split against current balances and consumes the paid days.
fn consume_paid_days(
    application: &LeaveApplication,
    balances: &[LeaveBalance],
    policy: &BalancePolicy,
) -> Result<(LeaveSplit, Vec<LeaveBalance>), CoreError> {
    let split: LeaveSplit = allocate_paid_days(&application.split.allocations, balances, policy);

    let mut updates: Vec<LeaveBalance> = Vec::new();
    for allocation in split.allocations.iter().filter(|a| a.paid_days > 0) {
        let mut ledger: LeaveBalance = balance_for(
            application.applicant_id,
            balances,
            allocation.year,
            allocation.month,
            policy,
        );
        ledger.consume(allocation.paid_days)?;
        updates.push(ledger);
    }

    Ok((split, updates))
}

/// Restores the paid days consumed at approval.
fn restore_paid_days(
    application: &LeaveApplication,
    balances: &[LeaveBalance],
    policy: &BalancePolicy,
) -> Result<Vec<LeaveBalance>, CoreError> {
    let mut updates: Vec<LeaveBalance> = Vec::new();
    for allocation in application
        .split
        .allocations
        .iter()
        .filter(|a| a.paid_days > 0)
    {
        let mut ledger: LeaveBalance = balance_for(
            application.applicant_id,
            balances,
            allocation.year,
            allocation.month,
            policy,
        );
        ledger.restore(allocation.paid_days)?;
        updates.push(ledger);
    }
    Ok(updates)
}
