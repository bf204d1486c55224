use axum::{
    extract::{Extension, State},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use kuma_common::SystemInfo;
use std::sync::Arc;

use crate::db::services::monitor_service;
use crate::web::error::ApiError;
use crate::web::models::AuthenticatedUser;
use crate::web::AppState;

async fn get_system_info(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<SystemInfo>, ApiError> {
    let monitor_count =
        monitor_service::count_monitors_by_user_id(&app_state.db_pool, authenticated_user.id)
            .await?;
    Ok(Json(SystemInfo {
        version: crate::VERSION.to_string(),
        monitor_count,
        server_time: Utc::now(),
    }))
}

pub fn create_info_router() -> Router<Arc<AppState>> {
    Router::new().route("/info", get(get_system_info))
}
