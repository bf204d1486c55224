use axum::{
    extract::{Extension, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use tracing::info;

use crate::db::{entities::maintenance, services::maintenance_service};
use crate::web::error::ApiError;
use crate::web::extract::ApiJson;
use crate::web::models::maintenance_models::CreateMaintenanceRequest;
use crate::web::models::AuthenticatedUser;
use crate::web::AppState;

async fn list_maintenance(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<maintenance::Model>>, ApiError> {
    let windows =
        maintenance_service::get_maintenance_by_user_id(&app_state.db_pool, authenticated_user.id)
            .await?;
    Ok(Json(windows))
}

async fn create_maintenance(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<CreateMaintenanceRequest>,
) -> Result<(StatusCode, Json<maintenance::Model>), ApiError> {
    let window = payload.into_new_maintenance()?;
    let created =
        maintenance_service::create_maintenance(&app_state.db_pool, authenticated_user.id, window)
            .await?;
    info!(user_id = authenticated_user.id, maintenance_id = created.id, "Maintenance window created.");
    Ok((StatusCode::CREATED, Json(created)))
}

pub fn create_maintenance_router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(list_maintenance).post(create_maintenance))
}
