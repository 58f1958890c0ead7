// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Actor extraction for the server.
//!
//! Identity is asserted by the fronting application through request
//! headers. This module resolves the claimed identity against the staff
//! directory before any handler runs.

use std::str::FromStr;

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use leave_desk_api::{AuthenticatedActor, AuthenticationService, Role};
use leave_desk_audit::Cause;
use tracing::{debug, warn};

use crate::AppState;

/// Header carrying the acting staff identifier.
pub const ACTOR_ID_HEADER: &str = "x-actor-id";
/// Header carrying the role the actor claims.
pub const ACTOR_ROLE_HEADER: &str = "x-actor-role";
/// Optional header naming the request for the audit trail.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Extractor for the authenticated actor and the audit cause of a request.
///
/// # Usage
///
/// ```ignore
/// async fn my_handler(
///     ActorSession(actor, cause): ActorSession,
/// ) -> Result<Json<Response>, HttpError> {
///     // actor: AuthenticatedActor
///     // cause: Cause
///     Ok(Json(Response { ... }))
/// }
/// ```
///
/// # Errors
///
/// Returns HTTP 401 Unauthorized if:
/// - Either actor header is missing or not valid UTF-8
/// - The actor ID is not a number or the role is unknown
/// - The staff member does not exist or is inactive
pub struct ActorSession(pub AuthenticatedActor, pub Cause);

fn header<'a>(headers: &'a HeaderMap, name: &'static str) -> Result<&'a str, SessionError> {
    headers
        .get(name)
        .ok_or(SessionError::MissingHeader(name))?
        .to_str()
        .map_err(|_| SessionError::InvalidHeader(name))
}

impl FromRequestParts<AppState> for ActorSession {
    type Rejection = SessionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let actor_id: i64 = header(&parts.headers, ACTOR_ID_HEADER)?
            .trim()
            .parse::<i64>()
            .map_err(|_| SessionError::InvalidHeader(ACTOR_ID_HEADER))?;
        let role: Role = Role::from_str(header(&parts.headers, ACTOR_ROLE_HEADER)?)
            .map_err(|e| SessionError::Rejected(e.to_string()))?;

        let mut persistence = state.persistence.lock().await;
        let actor: AuthenticatedActor =
            AuthenticationService::authenticate(&mut persistence, actor_id, role).map_err(|e| {
                warn!(actor_id, role = %role, error = %e, "Actor authentication failed");
                SessionError::Rejected(e.to_string())
            })?;
        drop(persistence);

        let request_id: String = header(&parts.headers, REQUEST_ID_HEADER)
            .map_or_else(|_| format!("actor-{actor_id}"), str::to_string);
        let cause: Cause = Cause::new(
            request_id,
            format!("{} {}", parts.method, parts.uri.path()),
        );

        debug!(actor_id, role = %role, "Actor authenticated");
        Ok(Self(actor, cause))
    }
}

/// Actor extraction errors, returned as HTTP 401.
#[derive(Debug)]
pub enum SessionError {
    /// A required header is absent.
    MissingHeader(&'static str),
    /// A header is not valid UTF-8 or not a number.
    InvalidHeader(&'static str),
    /// The claimed identity was refused.
    Rejected(String),
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let message: String = match self {
            Self::MissingHeader(name) => format!("Missing {name} header"),
            Self::InvalidHeader(name) => format!("Invalid {name} header"),
            Self::Rejected(reason) => reason,
        };
        crate::HttpError {
            status: StatusCode::UNAUTHORIZED,
            code: "authentication_failed",
            message,
            field: None,
        }
        .into_response()
    }
}
