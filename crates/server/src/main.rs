// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod session;

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use leave_desk_api::{
    AddHolidayRequest, AddPeriodRequest, AddTimetableEntryRequest, AffectedSlotsRequest,
    AffectedSlotsResponse, ApiError, ApiResult, ApplicationHistoryResponse, ApplicationInfo,
    AuditEventInfo, AvailableSubstitutesRequest, AvailableSubstitutesResponse, BalanceResponse,
    ConfigError, GetBalanceRequest, HolidayInfo, LeaveApplicationResponse, LeaveConfig,
    ListApplicationsRequest, ListApplicationsResponse, ListHolidaysRequest, ListHolidaysResponse,
    ListPeriodsResponse, ListStaffResponse, PeriodResponse, PreviewLeaveRequest,
    PreviewLeaveResponse, RegisterStaffRequest, RejectLeaveRequest, SetStaffActiveRequest,
    StaffInfo, SubmitLeaveRequest, TimetableEntryResponse, add_holiday, add_period,
    add_timetable_entry, approve_leave, cancel_leave, get_affected_slots, get_application,
    get_application_history, get_available_substitutes, get_balance, list_active_staff,
    list_applications, list_holidays, list_periods, preview_leave_calculation, register_staff,
    reject_leave, set_staff_active, submit_leave,
};
use leave_desk_persistence::{Persistence, PersistenceError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::session::ActorSession;

/// Leave Desk Server - HTTP server for leave applications and class cover
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Paid leave days credited to each month with no ledger record
    #[arg(long, default_value_t = 1)]
    monthly_leave_credit: u32,

    /// Comma-separated weekday names treated as weekend
    #[arg(long, value_delimiter = ',', default_value = "saturday,sunday")]
    weekend_days: Vec<String>,

    /// Minimum length of a leave reason, ignoring surrounding whitespace
    #[arg(long, default_value_t = 10)]
    min_reason_length: usize,
}

/// Startup errors.
#[derive(Debug, Error)]
enum ServerError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("persistence initialization failed: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("invalid listen address: {0}")]
    Address(#[from] std::net::AddrParseError),

    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Application state shared across handlers.
///
/// Persistence is a single connection behind a mutex; the workflow's own
/// transactions and version guards still decide every race.
#[derive(Clone)]
pub struct AppState {
    persistence: Arc<Mutex<Persistence>>,
    config: Arc<LeaveConfig>,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Machine-readable error kind.
    code: String,
    /// Error message.
    message: String,
    /// The offending field or slot, when the caller can correct it.
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<String>,
}

/// HTTP error wrapper that implements `IntoResponse`.
pub struct HttpError {
    status: StatusCode,
    code: &'static str,
    message: String,
    field: Option<String>,
}

impl HttpError {
    const fn new(status: StatusCode, code: &'static str, message: String) -> Self {
        Self {
            status,
            code,
            message,
            field: None,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            code: String::from(self.code),
            message: self.message,
            field: self.field,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let message: String = err.to_string();
        let http: Self = match err {
            ApiError::AuthenticationFailed { .. } => {
                Self::new(StatusCode::UNAUTHORIZED, "authentication_failed", message)
            }
            ApiError::Unauthorized { .. } => {
                Self::new(StatusCode::FORBIDDEN, "unauthorized", message)
            }
            ApiError::InvalidInput { field, .. } => Self {
                field: Some(field),
                ..Self::new(StatusCode::BAD_REQUEST, "invalid_input", message)
            },
            ApiError::SubstituteConflict {
                date, period_id, ..
            } => Self {
                field: Some(format!("selections[{date}/{period_id}]")),
                ..Self::new(StatusCode::CONFLICT, "substitute_conflict", message)
            },
            ApiError::InvalidStateTransition { .. } => {
                Self::new(StatusCode::CONFLICT, "invalid_state_transition", message)
            }
            ApiError::DomainRuleViolation { .. } => Self::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                "domain_rule_violation",
                message,
            ),
            ApiError::ResourceNotFound { .. } => {
                Self::new(StatusCode::NOT_FOUND, "not_found", message)
            }
            ApiError::DependencyUnavailable { .. } => Self::new(
                StatusCode::SERVICE_UNAVAILABLE,
                "dependency_unavailable",
                message,
            ),
            ApiError::Internal { .. } => {
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal", message)
            }
        };

        if http.status.is_server_error() {
            error!(code = http.code, message = %http.message, "Request failed");
        } else {
            warn!(code = http.code, message = %http.message, "Request refused");
        }
        http
    }
}

/// API response for workflow operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WorkflowApiResponse {
    /// Success indicator.
    success: bool,
    /// A success message.
    message: String,
    /// The application after the operation.
    application: ApplicationInfo,
    /// The audit record written by the operation.
    audit: AuditEventInfo,
}

impl From<ApiResult<LeaveApplicationResponse>> for WorkflowApiResponse {
    fn from(result: ApiResult<LeaveApplicationResponse>) -> Self {
        Self {
            success: true,
            message: result.response.message,
            application: result.response.application,
            audit: AuditEventInfo::from(&result.audit_event),
        }
    }
}

// ============================================================================
// Workflow handlers
// ============================================================================

/// Handler for POST `/applications` endpoint.
async fn handle_submit_leave(
    AxumState(app_state): AxumState<AppState>,
    ActorSession(actor, cause): ActorSession,
    Json(req): Json<SubmitLeaveRequest>,
) -> Result<Json<WorkflowApiResponse>, HttpError> {
    info!(
        actor_id = actor.id,
        applicant_id = req.applicant_id,
        "Handling submit_leave request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let result: ApiResult<LeaveApplicationResponse> =
        submit_leave(&mut persistence, &app_state.config, &req, &actor, cause)?;
    drop(persistence);

    Ok(Json(WorkflowApiResponse::from(result)))
}

/// Handler for POST `/applications/{id}/approve` endpoint.
async fn handle_approve_leave(
    AxumState(app_state): AxumState<AppState>,
    ActorSession(actor, cause): ActorSession,
    Path(application_id): Path<i64>,
) -> Result<Json<WorkflowApiResponse>, HttpError> {
    info!(actor_id = actor.id, application_id, "Handling approve_leave request");

    let mut persistence = app_state.persistence.lock().await;
    let result: ApiResult<LeaveApplicationResponse> = approve_leave(
        &mut persistence,
        &app_state.config,
        application_id,
        &actor,
        cause,
    )?;
    drop(persistence);

    Ok(Json(WorkflowApiResponse::from(result)))
}

/// Handler for POST `/applications/{id}/reject` endpoint.
async fn handle_reject_leave(
    AxumState(app_state): AxumState<AppState>,
    ActorSession(actor, cause): ActorSession,
    Path(application_id): Path<i64>,
    Json(req): Json<RejectLeaveRequest>,
) -> Result<Json<WorkflowApiResponse>, HttpError> {
    info!(actor_id = actor.id, application_id, "Handling reject_leave request");

    let mut persistence = app_state.persistence.lock().await;
    let result: ApiResult<LeaveApplicationResponse> = reject_leave(
        &mut persistence,
        &app_state.config,
        application_id,
        &req,
        &actor,
        cause,
    )?;
    drop(persistence);

    Ok(Json(WorkflowApiResponse::from(result)))
}

/// Handler for POST `/applications/{id}/cancel` endpoint.
async fn handle_cancel_leave(
    AxumState(app_state): AxumState<AppState>,
    ActorSession(actor, cause): ActorSession,
    Path(application_id): Path<i64>,
) -> Result<Json<WorkflowApiResponse>, HttpError> {
    info!(actor_id = actor.id, application_id, "Handling cancel_leave request");

    let mut persistence = app_state.persistence.lock().await;
    let result: ApiResult<LeaveApplicationResponse> = cancel_leave(
        &mut persistence,
        &app_state.config,
        application_id,
        &actor,
        cause,
    )?;
    drop(persistence);

    Ok(Json(WorkflowApiResponse::from(result)))
}

/// Handler for GET `/applications` endpoint.
async fn handle_list_applications(
    AxumState(app_state): AxumState<AppState>,
    ActorSession(actor, _cause): ActorSession,
    Query(query): Query<ListApplicationsRequest>,
) -> Result<Json<ListApplicationsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListApplicationsResponse = list_applications(&mut persistence, &query, &actor)?;
    drop(persistence);
    Ok(Json(response))
}

/// Handler for GET `/applications/{id}` endpoint.
async fn handle_get_application(
    AxumState(app_state): AxumState<AppState>,
    ActorSession(actor, _cause): ActorSession,
    Path(application_id): Path<i64>,
) -> Result<Json<ApplicationInfo>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ApplicationInfo = get_application(&mut persistence, application_id, &actor)?;
    drop(persistence);
    Ok(Json(response))
}

/// Handler for GET `/applications/{id}/history` endpoint.
async fn handle_get_application_history(
    AxumState(app_state): AxumState<AppState>,
    ActorSession(actor, _cause): ActorSession,
    Path(application_id): Path<i64>,
) -> Result<Json<ApplicationHistoryResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ApplicationHistoryResponse =
        get_application_history(&mut persistence, application_id, &actor)?;
    drop(persistence);
    Ok(Json(response))
}

// ============================================================================
// Calculation and matching handlers
// ============================================================================

/// Handler for GET `/leave/preview` endpoint.
async fn handle_preview_leave(
    AxumState(app_state): AxumState<AppState>,
    ActorSession(actor, _cause): ActorSession,
    Query(query): Query<PreviewLeaveRequest>,
) -> Result<Json<PreviewLeaveResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: PreviewLeaveResponse =
        preview_leave_calculation(&mut persistence, &app_state.config, &query, &actor)?;
    drop(persistence);
    Ok(Json(response))
}

/// Handler for GET `/leave/affected_slots` endpoint.
async fn handle_affected_slots(
    AxumState(app_state): AxumState<AppState>,
    ActorSession(actor, _cause): ActorSession,
    Query(query): Query<AffectedSlotsRequest>,
) -> Result<Json<AffectedSlotsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: AffectedSlotsResponse =
        get_affected_slots(&mut persistence, &app_state.config, &query, &actor)?;
    drop(persistence);
    Ok(Json(response))
}

/// Handler for GET `/substitutes` endpoint.
async fn handle_available_substitutes(
    AxumState(app_state): AxumState<AppState>,
    ActorSession(actor, _cause): ActorSession,
    Query(query): Query<AvailableSubstitutesRequest>,
) -> Result<Json<AvailableSubstitutesResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: AvailableSubstitutesResponse =
        get_available_substitutes(&mut persistence, &query, &actor)?;
    drop(persistence);
    Ok(Json(response))
}

/// Handler for GET `/balances` endpoint.
async fn handle_get_balance(
    AxumState(app_state): AxumState<AppState>,
    ActorSession(actor, _cause): ActorSession,
    Query(query): Query<GetBalanceRequest>,
) -> Result<Json<BalanceResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: BalanceResponse =
        get_balance(&mut persistence, &app_state.config, &query, &actor)?;
    drop(persistence);
    Ok(Json(response))
}

// ============================================================================
// Reference data handlers
// ============================================================================

/// Handler for POST `/staff` endpoint.
async fn handle_register_staff(
    AxumState(app_state): AxumState<AppState>,
    ActorSession(actor, _cause): ActorSession,
    Json(req): Json<RegisterStaffRequest>,
) -> Result<Json<StaffInfo>, HttpError> {
    info!(actor_id = actor.id, institution_id = req.institution_id, "Handling register_staff request");
    let mut persistence = app_state.persistence.lock().await;
    let response: StaffInfo = register_staff(&mut persistence, &req, &actor)?;
    drop(persistence);
    Ok(Json(response))
}

/// Handler for POST `/staff/active` endpoint.
async fn handle_set_staff_active(
    AxumState(app_state): AxumState<AppState>,
    ActorSession(actor, _cause): ActorSession,
    Json(req): Json<SetStaffActiveRequest>,
) -> Result<Json<StaffInfo>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: StaffInfo = set_staff_active(&mut persistence, &req, &actor)?;
    drop(persistence);
    Ok(Json(response))
}

/// Handler for GET `/institutions/{id}/staff` endpoint.
async fn handle_list_staff(
    AxumState(app_state): AxumState<AppState>,
    ActorSession(_actor, _cause): ActorSession,
    Path(institution_id): Path<i64>,
) -> Result<Json<ListStaffResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListStaffResponse = list_active_staff(&mut persistence, institution_id)?;
    drop(persistence);
    Ok(Json(response))
}

/// Handler for POST `/periods` endpoint.
async fn handle_add_period(
    AxumState(app_state): AxumState<AppState>,
    ActorSession(actor, _cause): ActorSession,
    Json(req): Json<AddPeriodRequest>,
) -> Result<Json<PeriodResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: PeriodResponse = add_period(&mut persistence, &req, &actor)?;
    drop(persistence);
    Ok(Json(response))
}

/// Handler for GET `/institutions/{id}/periods` endpoint.
async fn handle_list_periods(
    AxumState(app_state): AxumState<AppState>,
    ActorSession(_actor, _cause): ActorSession,
    Path(institution_id): Path<i64>,
) -> Result<Json<ListPeriodsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListPeriodsResponse = list_periods(&mut persistence, institution_id)?;
    drop(persistence);
    Ok(Json(response))
}

/// Handler for POST `/timetable` endpoint.
async fn handle_add_timetable_entry(
    AxumState(app_state): AxumState<AppState>,
    ActorSession(actor, _cause): ActorSession,
    Json(req): Json<AddTimetableEntryRequest>,
) -> Result<Json<TimetableEntryResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: TimetableEntryResponse = add_timetable_entry(&mut persistence, &req, &actor)?;
    drop(persistence);
    Ok(Json(response))
}

/// Handler for POST `/holidays` endpoint.
async fn handle_add_holiday(
    AxumState(app_state): AxumState<AppState>,
    ActorSession(actor, _cause): ActorSession,
    Json(req): Json<AddHolidayRequest>,
) -> Result<Json<HolidayInfo>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: HolidayInfo = add_holiday(&mut persistence, &req, &actor)?;
    drop(persistence);
    Ok(Json(response))
}

/// Handler for GET `/holidays` endpoint.
async fn handle_list_holidays(
    AxumState(app_state): AxumState<AppState>,
    ActorSession(_actor, _cause): ActorSession,
    Query(query): Query<ListHolidaysRequest>,
) -> Result<Json<ListHolidaysResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListHolidaysResponse = list_holidays(&mut persistence, &query)?;
    drop(persistence);
    Ok(Json(response))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/applications",
            post(handle_submit_leave).get(handle_list_applications),
        )
        .route("/applications/{id}", get(handle_get_application))
        .route(
            "/applications/{id}/history",
            get(handle_get_application_history),
        )
        .route("/applications/{id}/approve", post(handle_approve_leave))
        .route("/applications/{id}/reject", post(handle_reject_leave))
        .route("/applications/{id}/cancel", post(handle_cancel_leave))
        .route("/leave/preview", get(handle_preview_leave))
        .route("/leave/affected_slots", get(handle_affected_slots))
        .route("/substitutes", get(handle_available_substitutes))
        .route("/balances", get(handle_get_balance))
        .route("/staff", post(handle_register_staff))
        .route("/staff/active", post(handle_set_staff_active))
        .route("/institutions/{id}/staff", get(handle_list_staff))
        .route("/institutions/{id}/periods", get(handle_list_periods))
        .route("/periods", post(handle_add_period))
        .route("/timetable", post(handle_add_timetable_entry))
        .route(
            "/holidays",
            post(handle_add_holiday).get(handle_list_holidays),
        )
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Leave Desk Server");

    let config: LeaveConfig = LeaveConfig::new(
        args.monthly_leave_credit,
        &args.weekend_days,
        args.min_reason_length,
    )?;
    info!(
        monthly_leave_credit = args.monthly_leave_credit,
        weekend_days = ?args.weekend_days,
        min_reason_length = args.min_reason_length,
        "Loaded leave configuration"
    );

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        config: Arc::new(config),
    };

    let app: Router = build_router(app_state);

    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
