// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization types and services.
//!
//! Identity comes from the surrounding application; this module only
//! checks that the claimed staff member exists and decides what each role
//! may do. Who approves whom is decided here, not in the workflow.

use leave_desk_audit::Actor;
use leave_desk_domain::{ApprovalStage, LeaveApplication, StaffMember};
use leave_desk_persistence::{Persistence, PersistenceError};
use std::str::FromStr;

use crate::error::AuthError;

/// Actor roles for authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// A staff member acting on their own leave.
    Applicant,
    /// Institution management: the first approval stage.
    InstitutionManagement,
    /// The organization's final approval authority.
    FinalAuthority,
    /// Maintains reference data and may act on any application.
    Admin,
}

impl Role {
    /// Returns the string representation used in audit records and headers.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Applicant => "applicant",
            Self::InstitutionManagement => "institution_management",
            Self::FinalAuthority => "final_authority",
            Self::Admin => "admin",
        }
    }

    /// Returns the approval stage this role decides, if any.
    #[must_use]
    pub const fn approval_stage(&self) -> Option<ApprovalStage> {
        match self {
            Self::InstitutionManagement => Some(ApprovalStage::InstitutionManagement),
            Self::FinalAuthority => Some(ApprovalStage::FinalAuthority),
            Self::Applicant | Self::Admin => None,
        }
    }
}

impl FromStr for Role {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "applicant" => Ok(Self::Applicant),
            "institution_management" => Ok(Self::InstitutionManagement),
            "final_authority" => Ok(Self::FinalAuthority),
            "admin" => Ok(Self::Admin),
            _ => Err(AuthError::AuthenticationFailed {
                reason: format!(
                    "Invalid role '{s}'. Must be applicant, institution_management, final_authority or admin"
                ),
            }),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An authenticated actor with an associated role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The staff identifier of this actor.
    pub id: i64,
    /// The role assigned to this actor.
    pub role: Role,
    /// The actor's institution; `None` for administrators outside the directory.
    pub institution_id: Option<i64>,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    ///
    /// # Arguments
    ///
    /// * `id` - The staff identifier of this actor
    /// * `role` - The role assigned to this actor
    /// * `institution_id` - The actor's institution, if known
    #[must_use]
    pub const fn new(id: i64, role: Role, institution_id: Option<i64>) -> Self {
        Self {
            id,
            role,
            institution_id,
        }
    }

    /// Converts this authenticated actor into an audit Actor.
    #[must_use]
    pub fn to_audit_actor(&self) -> Actor {
        Actor::new(self.id, String::from(self.role.as_str()))
    }

    const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }
}

/// Resolves claimed identities against the staff directory.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Authenticates a claimed identity.
    ///
    /// Administrators need not appear in the directory. Every other role
    /// must be an active staff member, whose institution is attached to
    /// the returned actor.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `staff_id` - The claimed staff identifier
    /// * `role` - The claimed role
    ///
    /// # Errors
    ///
    /// Returns an error if the identifier is not positive or the staff
    /// member does not exist or is inactive.
    pub fn authenticate(
        persistence: &mut Persistence,
        staff_id: i64,
        role: Role,
    ) -> Result<AuthenticatedActor, AuthError> {
        if staff_id <= 0 {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Actor ID must be a positive staff identifier"),
            });
        }

        if role == Role::Admin {
            let institution_id: Option<i64> = persistence
                .get_staff(staff_id)
                .ok()
                .map(|member| member.institution_id);
            return Ok(AuthenticatedActor::new(staff_id, role, institution_id));
        }

        let member: StaffMember = persistence
            .get_staff(staff_id)
            .map_err(Self::map_persistence_error)?;
        if !member.is_active {
            return Err(AuthError::AuthenticationFailed {
                reason: format!("Staff member {staff_id} is inactive"),
            });
        }

        Ok(AuthenticatedActor::new(
            staff_id,
            role,
            Some(member.institution_id),
        ))
    }

    fn map_persistence_error(err: PersistenceError) -> AuthError {
        match err {
            PersistenceError::StaffNotFound(id) => AuthError::AuthenticationFailed {
                reason: format!("Unknown staff member {id}"),
            },
            _ => AuthError::AuthenticationFailed {
                reason: format!("Directory error: {err}"),
            },
        }
    }
}

/// Authorization service for enforcing role-based access control.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks that an actor may maintain reference data.
    ///
    /// Only Admin actors may register staff or edit periods, timetables
    /// and holidays.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_reference_data(
        actor: &AuthenticatedActor,
        action: &str,
    ) -> Result<(), AuthError> {
        match actor.role {
            Role::Admin => Ok(()),
            Role::Applicant | Role::InstitutionManagement | Role::FinalAuthority => {
                Err(AuthError::Unauthorized {
                    action: String::from(action),
                    required_role: String::from("Admin role"),
                })
            }
        }
    }

    /// Checks that an actor may submit leave for `applicant_id`.
    ///
    /// Applicants submit their own leave; Admin may submit on anyone's behalf.
    ///
    /// # Errors
    ///
    /// Returns an error otherwise.
    pub fn authorize_submit(
        actor: &AuthenticatedActor,
        applicant_id: i64,
    ) -> Result<(), AuthError> {
        if actor.is_admin() || actor.id == applicant_id {
            return Ok(());
        }
        Err(AuthError::Unauthorized {
            action: String::from("submit_leave"),
            required_role: String::from("the applicant or the Admin role"),
        })
    }

    /// Checks that an actor may approve or reject an application and
    /// returns the approval stage they act for.
    ///
    /// Institution management decides only for its own institution. Nobody
    /// decides their own application.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor holds no approving role, belongs to
    /// another institution, or is the applicant.
    pub fn authorize_decision(
        actor: &AuthenticatedActor,
        application: &LeaveApplication,
        action: &str,
    ) -> Result<ApprovalStage, AuthError> {
        let Some(stage) = actor.role.approval_stage() else {
            return Err(AuthError::Unauthorized {
                action: String::from(action),
                required_role: String::from("InstitutionManagement or FinalAuthority role"),
            });
        };

        if actor.id == application.applicant_id {
            return Err(AuthError::Unauthorized {
                action: String::from(action),
                required_role: String::from("an approver other than the applicant"),
            });
        }

        if stage == ApprovalStage::InstitutionManagement
            && actor.institution_id != Some(application.institution_id)
        {
            return Err(AuthError::Unauthorized {
                action: String::from(action),
                required_role: format!(
                    "InstitutionManagement role at institution {}",
                    application.institution_id
                ),
            });
        }

        Ok(stage)
    }

    /// Checks that an actor may cancel an application.
    ///
    /// Only the applicant or an Admin may cancel.
    ///
    /// # Errors
    ///
    /// Returns an error otherwise.
    pub fn authorize_cancel(
        actor: &AuthenticatedActor,
        application: &LeaveApplication,
    ) -> Result<(), AuthError> {
        if actor.is_admin() || actor.id == application.applicant_id {
            return Ok(());
        }
        Err(AuthError::Unauthorized {
            action: String::from("cancel_leave"),
            required_role: String::from("the applicant or the Admin role"),
        })
    }

    /// Checks that an actor may read leave data of a staff member.
    ///
    /// Applicants read their own data, institution management reads its
    /// institution, and final authorities and Admin read everything.
    ///
    /// # Errors
    ///
    /// Returns an error otherwise.
    pub fn authorize_view(
        actor: &AuthenticatedActor,
        applicant_id: i64,
        institution_id: i64,
    ) -> Result<(), AuthError> {
        let permitted: bool = match actor.role {
            Role::Admin | Role::FinalAuthority => true,
            Role::InstitutionManagement => actor.institution_id == Some(institution_id),
            Role::Applicant => actor.id == applicant_id,
        };
        if permitted {
            Ok(())
        } else {
            Err(AuthError::Unauthorized {
                action: String::from("view_leave"),
                required_role: String::from(
                    "the applicant, their institution management, FinalAuthority or Admin",
                ),
            })
        }
    }
}
