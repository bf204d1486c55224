use axum::{
    extract::{Extension, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use kuma_common::{HeartbeatRecord, MessageResponse, MonitorRecord, MonitorStateResponse};
use sea_orm::{ConnectionTrait, DatabaseTransaction, TransactionTrait};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::db::entities::monitor;
use crate::db::services::{heartbeat_service, monitor_service};
use crate::scheduler::{apply_transition, MonitorScheduler};
use crate::web::error::ApiError;
use crate::web::extract::{ApiJson, ApiPath, ApiQuery};
use crate::web::models::monitor_models::{heartbeat_record, monitor_record, MonitorPayload};
use crate::web::models::AuthenticatedUser;
use crate::web::AppState;

fn monitor_not_found() -> ApiError {
    ApiError::NotFound("Monitor not found".to_string())
}

async fn latest_heartbeat<C: ConnectionTrait>(
    db: &C,
    monitor_id: i32,
) -> Result<Option<HeartbeatRecord>, ApiError> {
    let Some(latest) = heartbeat_service::get_previous_heartbeat(db, monitor_id).await? else {
        return Ok(None);
    };
    let uptime = heartbeat_service::get_uptime_24h(db, monitor_id).await?;
    heartbeat_record(latest, uptime).map(Some)
}

/// Runs the scheduler side of a change from `previous` to `current` and
/// commits `txn` only when it succeeded. On failure the transaction is rolled
/// back and the scheduler is pointed back at `previous`.
async fn reconcile_and_commit(
    scheduler: &dyn MonitorScheduler,
    txn: DatabaseTransaction,
    previous: &monitor::Model,
    current: &monitor::Model,
) -> Result<(), ApiError> {
    let outcome = match apply_transition(scheduler, previous, current).await {
        Ok(()) => txn.commit().await.map_err(ApiError::from),
        Err(e) => {
            drop(txn);
            Err(ApiError::from(e))
        }
    };

    if let Err(e) = &outcome {
        warn!(monitor_id = current.id, error = %e, "Monitor change rolled back.");
        if let Err(restore_err) = apply_transition(scheduler, current, previous).await {
            error!(monitor_id = current.id, error = %restore_err, "Failed to restore scheduler state after rollback.");
        }
    }
    outcome
}

async fn list_monitors(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<MonitorRecord>>, ApiError> {
    let db = &app_state.db_pool;
    let monitors = monitor_service::list_monitors_by_user_id(db, authenticated_user.id).await?;

    let mut records = Vec::with_capacity(monitors.len());
    for monitor in monitors {
        let latest = latest_heartbeat(db, monitor.id).await?;
        records.push(monitor_record(monitor, latest));
    }
    Ok(Json(records))
}

async fn get_monitor(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    ApiPath(monitor_id): ApiPath<i32>,
) -> Result<Json<MonitorRecord>, ApiError> {
    let db = &app_state.db_pool;
    let monitor = monitor_service::find_monitor_for_user(db, monitor_id, authenticated_user.id)
        .await?
        .ok_or_else(monitor_not_found)?;
    let latest = latest_heartbeat(db, monitor.id).await?;
    Ok(Json(monitor_record(monitor, latest)))
}

async fn create_monitor(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<MonitorPayload>,
) -> Result<(StatusCode, Json<MonitorRecord>), ApiError> {
    let new_monitor = payload.into_new_monitor(authenticated_user.id, Utc::now())?;

    let txn = app_state.db_pool.begin().await?;
    let created = monitor_service::insert_monitor(&txn, new_monitor).await?;
    if created.active {
        app_state.scheduler.start(&created).await?;
    }
    if let Err(e) = txn.commit().await {
        if created.active {
            app_state.scheduler.stop(created.id).await;
        }
        return Err(e.into());
    }

    info!(
        user_id = authenticated_user.id,
        monitor_id = created.id,
        monitor_type = %created.monitor_type,
        "Monitor created."
    );
    Ok((StatusCode::CREATED, Json(monitor_record(created, None))))
}

async fn update_monitor(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    ApiPath(monitor_id): ApiPath<i32>,
    ApiJson(payload): ApiJson<MonitorPayload>,
) -> Result<Json<MonitorRecord>, ApiError> {
    let _guard = app_state.monitor_locks.lock(monitor_id).await;

    let txn = app_state.db_pool.begin().await?;
    let previous = monitor_service::find_monitor_for_user(&txn, monitor_id, authenticated_user.id)
        .await?
        .ok_or_else(monitor_not_found)?;

    let mut updated = previous.clone();
    payload.apply_to(&mut updated)?;

    let current = if updated == previous {
        txn.commit().await?;
        previous
    } else {
        let saved = monitor_service::save_monitor(&txn, updated).await?;
        reconcile_and_commit(app_state.scheduler.as_ref(), txn, &previous, &saved).await?;
        info!(user_id = authenticated_user.id, monitor_id, "Monitor updated.");
        saved
    };

    let latest = latest_heartbeat(&app_state.db_pool, current.id).await?;
    Ok(Json(monitor_record(current, latest)))
}

async fn delete_monitor(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    ApiPath(monitor_id): ApiPath<i32>,
) -> Result<Json<MessageResponse>, ApiError> {
    let _guard = app_state.monitor_locks.lock(monitor_id).await;

    let txn = app_state.db_pool.begin().await?;
    let monitor = monitor_service::find_monitor_for_user(&txn, monitor_id, authenticated_user.id)
        .await?
        .ok_or_else(monitor_not_found)?;

    app_state.scheduler.stop(monitor_id).await;

    let deleted = match monitor_service::delete_monitor_with_dependents(&txn, monitor_id).await {
        Ok(_) => txn.commit().await,
        Err(e) => Err(e),
    };
    if let Err(e) = deleted {
        if monitor.active {
            if let Err(restart_err) = app_state.scheduler.start(&monitor).await {
                error!(monitor_id, error = %restart_err, "Failed to restart monitor after aborted delete.");
            }
        }
        return Err(e.into());
    }

    app_state.monitor_locks.forget(monitor_id);
    info!(user_id = authenticated_user.id, monitor_id, "Monitor deleted.");
    Ok(Json(MessageResponse {
        message: "Monitor deleted successfully".to_string(),
    }))
}

/// Moves a monitor to `active`. Already being in that state is a no-op.
async fn set_monitor_active(
    app_state: &AppState,
    user_id: i32,
    monitor_id: i32,
    active: bool,
) -> Result<monitor::Model, ApiError> {
    let _guard = app_state.monitor_locks.lock(monitor_id).await;

    let txn = app_state.db_pool.begin().await?;
    let previous = monitor_service::find_monitor_for_user(&txn, monitor_id, user_id)
        .await?
        .ok_or_else(monitor_not_found)?;
    if previous.active == active {
        txn.commit().await?;
        return Ok(previous);
    }

    let mut updated = previous.clone();
    updated.active = active;
    let current = monitor_service::save_monitor(&txn, updated).await?;
    reconcile_and_commit(app_state.scheduler.as_ref(), txn, &previous, &current).await?;
    Ok(current)
}

async fn pause_monitor(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    ApiPath(monitor_id): ApiPath<i32>,
) -> Result<Json<MonitorStateResponse>, ApiError> {
    let monitor = set_monitor_active(&app_state, authenticated_user.id, monitor_id, false).await?;
    Ok(Json(MonitorStateResponse {
        message: "Monitor paused successfully".to_string(),
        active: monitor.active,
    }))
}

async fn resume_monitor(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    ApiPath(monitor_id): ApiPath<i32>,
) -> Result<Json<MonitorStateResponse>, ApiError> {
    let monitor = set_monitor_active(&app_state, authenticated_user.id, monitor_id, true).await?;
    Ok(Json(MonitorStateResponse {
        message: "Monitor resumed successfully".to_string(),
        active: monitor.active,
    }))
}

#[derive(Deserialize, Debug, Default)]
pub struct HeartbeatQuery {
    limit: Option<String>,
    offset: Option<String>,
}

impl HeartbeatQuery {
    /// Values are read as signed 64-bit so they always fit a bound SQL
    /// integer. A limit that is not a positive number falls back to the
    /// default, as does an offset that is not a non-negative number.
    fn page(&self) -> (u64, u64) {
        let limit = parse_bound(self.limit.as_deref())
            .filter(|limit| *limit > 0)
            .unwrap_or(heartbeat_service::DEFAULT_HEARTBEAT_LIMIT);
        let offset = parse_bound(self.offset.as_deref()).unwrap_or(0);
        (limit, offset)
    }
}

fn parse_bound(raw: Option<&str>) -> Option<u64> {
    raw.and_then(|raw| raw.trim().parse::<i64>().ok())
        .and_then(|value| u64::try_from(value).ok())
}

async fn list_monitor_heartbeats(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    ApiPath(monitor_id): ApiPath<i32>,
    ApiQuery(query): ApiQuery<HeartbeatQuery>,
) -> Result<Json<Vec<HeartbeatRecord>>, ApiError> {
    let db = &app_state.db_pool;
    monitor_service::find_monitor_for_user(db, monitor_id, authenticated_user.id)
        .await?
        .ok_or_else(monitor_not_found)?;

    let (limit, offset) = query.page();
    let heartbeats = heartbeat_service::list_heartbeats(db, monitor_id, limit, offset).await?;
    let records = heartbeats
        .into_iter()
        .map(|heartbeat| heartbeat_record(heartbeat, None))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(records))
}

pub fn create_monitor_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_monitors).post(create_monitor))
        .route(
            "/{id}",
            get(get_monitor).put(update_monitor).delete(delete_monitor),
        )
        .route("/{id}/pause", post(pause_monitor))
        .route("/{id}/resume", post(resume_monitor))
        .route("/{id}/heartbeats", get(list_monitor_heartbeats))
}
