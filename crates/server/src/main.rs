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
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod extract;
mod identity;

use axum::{
    Json, Router,
    extract::State as AxumState,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use shiftly_api::{
    ApiError, AssignShiftRequest, AuditEventInfo, AuthenticatedActor, AvailabilityInfo,
    CreateNeedRequest, CreateStoreRequest, DecideSwapRequest, ErrorKind, MemberInfo,
    MembershipInfo, NeedInfo, RequestSwapRequest, ShiftInfo, StoreConfigInfo, StoreInfo,
    StoreSummaryInfo, SubmitAvailabilityRequest, SwapRequestInfo, TransitionWeekRequest,
    UpdateConfigRequest, UpdateRoleRequest, WeekCoverageResponse, WeekInfo, WeekRequest,
    assign_shift, create_need, create_store, decide_swap, delete_need, get_config,
    get_or_create_week, get_week, join_store, list_audit_events, list_availability, list_members,
    list_my_shifts, list_my_shifts_in_week, list_my_stores, list_needs, list_recent_weeks,
    list_shifts_for_week, list_swap_requests, remove_member, request_swap, submit_availability,
    sync_profile, transition_week, unassign_shift, update_config, update_role, week_coverage,
    withdraw_availability,
};
use shiftly_persistence::Persistence;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, error, info, warn};

use crate::extract::{ValidJson, ValidPath, ValidQuery};
use crate::identity::CallerIdentity;

/// Number of weeks returned by `GET /stores/{id}/weeks` without `limit`.
const DEFAULT_RECENT_WEEKS: i64 = 8;

/// Shiftly Server - HTTP server for weekly shift scheduling
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Address to bind the server to
    #[arg(short, long, default_value = "127.0.0.1")]
    bind: IpAddr,
}

/// Application state shared across handlers.
///
/// Every request holds the lock for its whole read-validate-write
/// sequence, so operations on the same database are serialized.
#[derive(Clone)]
struct AppState {
    /// The persistence layer.
    persistence: Arc<Mutex<Persistence>>,
}

/// Query parameters for `GET /stores/{id}/weeks`.
#[derive(Debug, Clone, Deserialize)]
struct RecentWeeksQuery {
    /// Maximum number of weeks to return.
    limit: Option<i64>,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Machine-checkable error category.
    kind: String,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
#[derive(Debug)]
pub struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error category.
    kind: ErrorKind,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            kind: self.kind.as_str().to_string(),
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

/// Maps an error category to its HTTP status.
const fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::Authentication => StatusCode::UNAUTHORIZED,
        ErrorKind::Permission => StatusCode::FORBIDDEN,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::DependencyFailure => StatusCode::SERVICE_UNAVAILABLE,
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let kind: ErrorKind = err.kind();
        match kind {
            ErrorKind::DependencyFailure => error!(error = %err, "Dependency failure"),
            ErrorKind::Permission | ErrorKind::Authentication => {
                warn!(error = %err, "Request refused");
            }
            _ => debug!(error = %err, "Request rejected"),
        }
        Self {
            status: status_for(kind),
            kind,
            message: err.to_string(),
        }
    }
}

/// Locks persistence and records the caller's current profile claims.
///
/// Every authenticated handler goes through here first.
async fn synced_persistence<'a>(
    app_state: &'a AppState,
    actor: &AuthenticatedActor,
) -> Result<MutexGuard<'a, Persistence>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    sync_profile(&mut persistence, actor)?;
    Ok(persistence)
}

/// Handler for POST `/stores` endpoint.
///
/// Creates a store with the caller as its first manager.
async fn handle_create_store(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(actor): CallerIdentity,
    ValidJson(req): ValidJson<CreateStoreRequest>,
) -> Result<(StatusCode, Json<StoreInfo>), HttpError> {
    info!(user_id = %actor.user_id, name = %req.name, "Handling create_store request");

    let mut persistence = synced_persistence(&app_state, &actor).await?;
    let store: StoreInfo = create_store(&mut persistence, &req, &actor)?;
    drop(persistence);

    Ok((StatusCode::CREATED, Json(store)))
}

/// Handler for GET `/stores` endpoint.
async fn handle_list_my_stores(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(actor): CallerIdentity,
) -> Result<Json<Vec<StoreSummaryInfo>>, HttpError> {
    let mut persistence = synced_persistence(&app_state, &actor).await?;
    Ok(Json(list_my_stores(&mut persistence, &actor)?))
}

/// Handler for POST `/stores/{store_id}/join` endpoint.
async fn handle_join_store(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(actor): CallerIdentity,
    ValidPath(store_id): ValidPath<i64>,
) -> Result<(StatusCode, Json<MembershipInfo>), HttpError> {
    info!(user_id = %actor.user_id, store_id, "Handling join_store request");

    let mut persistence = synced_persistence(&app_state, &actor).await?;
    let membership: MembershipInfo = join_store(&mut persistence, store_id, &actor)?;
    drop(persistence);

    Ok((StatusCode::CREATED, Json(membership)))
}

/// Handler for GET `/stores/{store_id}/members` endpoint.
async fn handle_list_members(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(actor): CallerIdentity,
    ValidPath(store_id): ValidPath<i64>,
) -> Result<Json<Vec<MemberInfo>>, HttpError> {
    let mut persistence = synced_persistence(&app_state, &actor).await?;
    Ok(Json(list_members(&mut persistence, store_id, &actor)?))
}

/// Handler for PUT `/stores/{store_id}/members/{user_id}` endpoint.
async fn handle_update_role(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(actor): CallerIdentity,
    ValidPath((store_id, user_id)): ValidPath<(i64, String)>,
    ValidJson(req): ValidJson<UpdateRoleRequest>,
) -> Result<Json<MembershipInfo>, HttpError> {
    info!(
        user_id = %actor.user_id,
        store_id,
        target = %user_id,
        role = %req.role,
        "Handling update_role request"
    );

    let mut persistence = synced_persistence(&app_state, &actor).await?;
    Ok(Json(update_role(
        &mut persistence,
        store_id,
        &user_id,
        &req,
        &actor,
    )?))
}

/// Handler for DELETE `/stores/{store_id}/members/{user_id}` endpoint.
async fn handle_remove_member(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(actor): CallerIdentity,
    ValidPath((store_id, user_id)): ValidPath<(i64, String)>,
) -> Result<StatusCode, HttpError> {
    info!(
        user_id = %actor.user_id,
        store_id,
        target = %user_id,
        "Handling remove_member request"
    );

    let mut persistence = synced_persistence(&app_state, &actor).await?;
    remove_member(&mut persistence, store_id, &user_id, &actor)?;
    drop(persistence);

    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET `/stores/{store_id}/config` endpoint.
async fn handle_get_config(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(actor): CallerIdentity,
    ValidPath(store_id): ValidPath<i64>,
) -> Result<Json<StoreConfigInfo>, HttpError> {
    let mut persistence = synced_persistence(&app_state, &actor).await?;
    Ok(Json(get_config(&mut persistence, store_id, &actor)?))
}

/// Handler for PUT `/stores/{store_id}/config` endpoint.
async fn handle_update_config(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(actor): CallerIdentity,
    ValidPath(store_id): ValidPath<i64>,
    ValidJson(req): ValidJson<UpdateConfigRequest>,
) -> Result<Json<StoreConfigInfo>, HttpError> {
    info!(user_id = %actor.user_id, store_id, "Handling update_config request");

    let mut persistence = synced_persistence(&app_state, &actor).await?;
    Ok(Json(update_config(&mut persistence, store_id, &req, &actor)?))
}

/// Handler for POST `/stores/{store_id}/weeks` endpoint.
///
/// Returns the week containing the reference date, creating it if needed.
async fn handle_get_or_create_week(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(actor): CallerIdentity,
    ValidPath(store_id): ValidPath<i64>,
    ValidJson(req): ValidJson<WeekRequest>,
) -> Result<Json<WeekInfo>, HttpError> {
    info!(
        user_id = %actor.user_id,
        store_id,
        reference_date = %req.reference_date,
        "Handling get_or_create_week request"
    );

    let mut persistence = synced_persistence(&app_state, &actor).await?;
    Ok(Json(get_or_create_week(
        &mut persistence,
        store_id,
        &req,
        &actor,
    )?))
}

/// Handler for GET `/stores/{store_id}/weeks` endpoint.
async fn handle_list_recent_weeks(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(actor): CallerIdentity,
    ValidPath(store_id): ValidPath<i64>,
    ValidQuery(query): ValidQuery<RecentWeeksQuery>,
) -> Result<Json<Vec<WeekInfo>>, HttpError> {
    let limit: i64 = query.limit.unwrap_or(DEFAULT_RECENT_WEEKS);

    let mut persistence = synced_persistence(&app_state, &actor).await?;
    Ok(Json(list_recent_weeks(
        &mut persistence,
        store_id,
        limit,
        &actor,
    )?))
}

/// Handler for GET `/weeks/{week_id}` endpoint.
async fn handle_get_week(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(actor): CallerIdentity,
    ValidPath(week_id): ValidPath<i64>,
) -> Result<Json<WeekInfo>, HttpError> {
    let mut persistence = synced_persistence(&app_state, &actor).await?;
    Ok(Json(get_week(&mut persistence, week_id, &actor)?))
}

/// Handler for POST `/weeks/{week_id}/status` endpoint.
async fn handle_transition_week(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(actor): CallerIdentity,
    ValidPath(week_id): ValidPath<i64>,
    ValidJson(req): ValidJson<TransitionWeekRequest>,
) -> Result<Json<WeekInfo>, HttpError> {
    info!(
        user_id = %actor.user_id,
        week_id,
        status = %req.status,
        "Handling transition_week request"
    );

    let mut persistence = synced_persistence(&app_state, &actor).await?;
    Ok(Json(transition_week(&mut persistence, week_id, &req, &actor)?))
}

/// Handler for GET `/weeks/{week_id}/needs` endpoint.
async fn handle_list_needs(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(actor): CallerIdentity,
    ValidPath(week_id): ValidPath<i64>,
) -> Result<Json<Vec<NeedInfo>>, HttpError> {
    let mut persistence = synced_persistence(&app_state, &actor).await?;
    Ok(Json(list_needs(&mut persistence, week_id, &actor)?))
}

/// Handler for POST `/weeks/{week_id}/needs` endpoint.
async fn handle_create_need(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(actor): CallerIdentity,
    ValidPath(week_id): ValidPath<i64>,
    ValidJson(req): ValidJson<CreateNeedRequest>,
) -> Result<(StatusCode, Json<NeedInfo>), HttpError> {
    info!(
        user_id = %actor.user_id,
        week_id,
        weekday = req.weekday,
        "Handling create_need request"
    );

    let mut persistence = synced_persistence(&app_state, &actor).await?;
    let need: NeedInfo = create_need(&mut persistence, week_id, &req, &actor)?;
    drop(persistence);

    Ok((StatusCode::CREATED, Json(need)))
}

/// Handler for DELETE `/needs/{need_id}` endpoint.
async fn handle_delete_need(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(actor): CallerIdentity,
    ValidPath(need_id): ValidPath<i64>,
) -> Result<StatusCode, HttpError> {
    info!(user_id = %actor.user_id, need_id, "Handling delete_need request");

    let mut persistence = synced_persistence(&app_state, &actor).await?;
    delete_need(&mut persistence, need_id, &actor)?;
    drop(persistence);

    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET `/weeks/{week_id}/availability` endpoint.
async fn handle_list_availability(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(actor): CallerIdentity,
    ValidPath(week_id): ValidPath<i64>,
) -> Result<Json<Vec<AvailabilityInfo>>, HttpError> {
    let mut persistence = synced_persistence(&app_state, &actor).await?;
    Ok(Json(list_availability(&mut persistence, week_id, &actor)?))
}

/// Handler for POST `/weeks/{week_id}/availability` endpoint.
///
/// The submission deadline is checked against the current wall clock.
async fn handle_submit_availability(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(actor): CallerIdentity,
    ValidPath(week_id): ValidPath<i64>,
    ValidJson(req): ValidJson<SubmitAvailabilityRequest>,
) -> Result<(StatusCode, Json<AvailabilityInfo>), HttpError> {
    info!(
        user_id = %actor.user_id,
        week_id,
        weekday = req.weekday,
        "Handling submit_availability request"
    );

    let mut persistence = synced_persistence(&app_state, &actor).await?;
    let entry: AvailabilityInfo = submit_availability(
        &mut persistence,
        week_id,
        &req,
        &actor,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok((StatusCode::CREATED, Json(entry)))
}

/// Handler for DELETE `/availability/{availability_id}` endpoint.
async fn handle_withdraw_availability(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(actor): CallerIdentity,
    ValidPath(availability_id): ValidPath<i64>,
) -> Result<StatusCode, HttpError> {
    info!(
        user_id = %actor.user_id,
        availability_id,
        "Handling withdraw_availability request"
    );

    let mut persistence = synced_persistence(&app_state, &actor).await?;
    withdraw_availability(
        &mut persistence,
        availability_id,
        &actor,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET `/weeks/{week_id}/shifts` endpoint.
async fn handle_list_shifts_for_week(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(actor): CallerIdentity,
    ValidPath(week_id): ValidPath<i64>,
) -> Result<Json<Vec<ShiftInfo>>, HttpError> {
    let mut persistence = synced_persistence(&app_state, &actor).await?;
    Ok(Json(list_shifts_for_week(&mut persistence, week_id, &actor)?))
}

/// Handler for GET `/weeks/{week_id}/shifts/mine` endpoint.
async fn handle_list_my_shifts_in_week(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(actor): CallerIdentity,
    ValidPath(week_id): ValidPath<i64>,
) -> Result<Json<Vec<ShiftInfo>>, HttpError> {
    let mut persistence = synced_persistence(&app_state, &actor).await?;
    Ok(Json(list_my_shifts_in_week(
        &mut persistence,
        week_id,
        &actor,
    )?))
}

/// Handler for GET `/shifts/mine` endpoint.
async fn handle_list_my_shifts(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(actor): CallerIdentity,
) -> Result<Json<Vec<ShiftInfo>>, HttpError> {
    let mut persistence = synced_persistence(&app_state, &actor).await?;
    Ok(Json(list_my_shifts(&mut persistence, &actor)?))
}

/// Handler for POST `/weeks/{week_id}/shifts` endpoint.
async fn handle_assign_shift(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(actor): CallerIdentity,
    ValidPath(week_id): ValidPath<i64>,
    ValidJson(req): ValidJson<AssignShiftRequest>,
) -> Result<(StatusCode, Json<ShiftInfo>), HttpError> {
    info!(
        user_id = %actor.user_id,
        week_id,
        target = %req.user_id,
        need_id = ?req.need_id,
        "Handling assign_shift request"
    );

    let mut persistence = synced_persistence(&app_state, &actor).await?;
    let shift: ShiftInfo = assign_shift(&mut persistence, week_id, &req, &actor)?;
    drop(persistence);

    Ok((StatusCode::CREATED, Json(shift)))
}

/// Handler for DELETE `/shifts/{shift_id}` endpoint.
async fn handle_unassign_shift(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(actor): CallerIdentity,
    ValidPath(shift_id): ValidPath<i64>,
) -> Result<StatusCode, HttpError> {
    info!(user_id = %actor.user_id, shift_id, "Handling unassign_shift request");

    let mut persistence = synced_persistence(&app_state, &actor).await?;
    unassign_shift(&mut persistence, shift_id, &actor)?;
    drop(persistence);

    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET `/weeks/{week_id}/coverage` endpoint.
async fn handle_week_coverage(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(actor): CallerIdentity,
    ValidPath(week_id): ValidPath<i64>,
) -> Result<Json<WeekCoverageResponse>, HttpError> {
    let mut persistence = synced_persistence(&app_state, &actor).await?;
    Ok(Json(week_coverage(&mut persistence, week_id, &actor)?))
}

/// Handler for POST `/shifts/{shift_id}/swap` endpoint.
async fn handle_request_swap(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(actor): CallerIdentity,
    ValidPath(shift_id): ValidPath<i64>,
    ValidJson(req): ValidJson<RequestSwapRequest>,
) -> Result<(StatusCode, Json<SwapRequestInfo>), HttpError> {
    info!(
        user_id = %actor.user_id,
        shift_id,
        target = %req.target_id,
        "Handling request_swap request"
    );

    let mut persistence = synced_persistence(&app_state, &actor).await?;
    let swap: SwapRequestInfo = request_swap(&mut persistence, shift_id, &req, &actor)?;
    drop(persistence);

    Ok((StatusCode::CREATED, Json(swap)))
}

/// Handler for POST `/swaps/{swap_id}/decision` endpoint.
async fn handle_decide_swap(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(actor): CallerIdentity,
    ValidPath(swap_id): ValidPath<i64>,
    ValidJson(req): ValidJson<DecideSwapRequest>,
) -> Result<Json<SwapRequestInfo>, HttpError> {
    info!(
        user_id = %actor.user_id,
        swap_id,
        decision = %req.decision,
        "Handling decide_swap request"
    );

    let mut persistence = synced_persistence(&app_state, &actor).await?;
    Ok(Json(decide_swap(&mut persistence, swap_id, &req, &actor)?))
}

/// Handler for GET `/stores/{store_id}/swaps` endpoint.
async fn handle_list_swap_requests(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(actor): CallerIdentity,
    ValidPath(store_id): ValidPath<i64>,
) -> Result<Json<Vec<SwapRequestInfo>>, HttpError> {
    let mut persistence = synced_persistence(&app_state, &actor).await?;
    Ok(Json(list_swap_requests(&mut persistence, store_id, &actor)?))
}

/// Handler for GET `/stores/{store_id}/audit` endpoint.
async fn handle_list_audit_events(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(actor): CallerIdentity,
    ValidPath(store_id): ValidPath<i64>,
) -> Result<Json<Vec<AuditEventInfo>>, HttpError> {
    let mut persistence = synced_persistence(&app_state, &actor).await?;
    Ok(Json(list_audit_events(&mut persistence, store_id, &actor)?))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/stores", post(handle_create_store).get(handle_list_my_stores))
        .route("/stores/{store_id}/join", post(handle_join_store))
        .route("/stores/{store_id}/members", get(handle_list_members))
        .route(
            "/stores/{store_id}/members/{user_id}",
            put(handle_update_role).delete(handle_remove_member),
        )
        .route(
            "/stores/{store_id}/config",
            get(handle_get_config).put(handle_update_config),
        )
        .route(
            "/stores/{store_id}/weeks",
            post(handle_get_or_create_week).get(handle_list_recent_weeks),
        )
        .route("/stores/{store_id}/swaps", get(handle_list_swap_requests))
        .route("/stores/{store_id}/audit", get(handle_list_audit_events))
        .route("/weeks/{week_id}", get(handle_get_week))
        .route("/weeks/{week_id}/status", post(handle_transition_week))
        .route(
            "/weeks/{week_id}/needs",
            get(handle_list_needs).post(handle_create_need),
        )
        .route(
            "/weeks/{week_id}/availability",
            get(handle_list_availability).post(handle_submit_availability),
        )
        .route(
            "/weeks/{week_id}/shifts",
            get(handle_list_shifts_for_week).post(handle_assign_shift),
        )
        .route(
            "/weeks/{week_id}/shifts/mine",
            get(handle_list_my_shifts_in_week),
        )
        .route("/weeks/{week_id}/coverage", get(handle_week_coverage))
        .route("/needs/{need_id}", delete(handle_delete_need))
        .route(
            "/availability/{availability_id}",
            delete(handle_withdraw_availability),
        )
        .route("/shifts/mine", get(handle_list_my_shifts))
        .route("/shifts/{shift_id}", delete(handle_unassign_shift))
        .route("/shifts/{shift_id}/swap", post(handle_request_swap))
        .route("/swaps/{swap_id}/decision", post(handle_decide_swap))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Shiftly Server");

    let mut persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };
    persistence.verify_foreign_key_enforcement()?;

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
    };

    let app: Router = build_router(app_state);

    let addr: SocketAddr = SocketAddr::new(args.bind, args.port);
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
