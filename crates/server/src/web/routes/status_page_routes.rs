use axum::{
    extract::{Extension, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use sea_orm::SqlErr;
use std::sync::Arc;
use tracing::info;

use crate::db::entities::status_page;
use crate::db::services::{monitor_service, status_page_service};
use crate::web::error::ApiError;
use crate::web::extract::{ApiJson, ApiPath};
use crate::web::models::monitor_models::monitor_record;
use crate::web::models::status_page_models::{CreateStatusPageRequest, StatusPageDetails};
use crate::web::models::AuthenticatedUser;
use crate::web::AppState;

fn slug_taken() -> ApiError {
    ApiError::Conflict("Slug already exists".to_string())
}

async fn list_status_pages(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<status_page::Model>>, ApiError> {
    let pages =
        status_page_service::get_status_pages_by_user_id(&app_state.db_pool, authenticated_user.id)
            .await?;
    Ok(Json(pages))
}

async fn get_status_page(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    ApiPath(slug): ApiPath<String>,
) -> Result<Json<StatusPageDetails>, ApiError> {
    let db = &app_state.db_pool;
    let page = status_page_service::find_status_page_for_user(db, &slug, authenticated_user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Status page not found".to_string()))?;

    let monitors = status_page_service::get_monitors_for_status_page(db, page.id)
        .await?
        .into_iter()
        .map(|monitor| monitor_record(monitor, None))
        .collect();
    Ok(Json(StatusPageDetails { page, monitors }))
}

async fn create_status_page(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<CreateStatusPageRequest>,
) -> Result<(StatusCode, Json<status_page::Model>), ApiError> {
    let db = &app_state.db_pool;
    let new_page = payload.into_new_status_page()?;

    if status_page_service::slug_exists(db, &new_page.slug).await? {
        return Err(slug_taken());
    }

    let owned =
        monitor_service::filter_owned_monitor_ids(db, authenticated_user.id, &new_page.monitor_ids)
            .await?;
    if owned.len() != new_page.monitor_ids.len() {
        return Err(ApiError::Validation(
            "monitorIds must only reference your own monitors".to_string(),
        ));
    }

    // A concurrent insert of the same slug surfaces as a unique violation.
    let page = status_page_service::create_status_page(db, authenticated_user.id, new_page)
        .await
        .map_err(|db_err| match db_err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => slug_taken(),
            _ => ApiError::from(db_err),
        })?;

    info!(user_id = authenticated_user.id, slug = %page.slug, "Status page created.");
    Ok((StatusCode::CREATED, Json(page)))
}

pub fn create_status_page_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_status_pages).post(create_status_page))
        .route("/{slug}", get(get_status_page))
}
