use axum::{
    extract::{Extension, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use std::sync::Arc;

use crate::db::{entities::tag, services::tag_service};
use crate::web::error::ApiError;
use crate::web::extract::ApiJson;
use crate::web::models::tag_models::CreateTagRequest;
use crate::web::models::AuthenticatedUser;
use crate::web::AppState;

async fn create_tag_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<CreateTagRequest>,
) -> Result<(StatusCode, Json<tag::Model>), ApiError> {
    let (name, color) = payload.into_parts()?;
    let tag_model =
        tag_service::create_tag(&app_state.db_pool, authenticated_user.id, &name, &color).await?;
    Ok((StatusCode::CREATED, Json(tag_model)))
}

async fn get_user_tags_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<tag::Model>>, ApiError> {
    let tags = tag_service::get_tags_by_user_id(&app_state.db_pool, authenticated_user.id).await?;
    Ok(Json(tags))
}

pub fn create_tags_router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(get_user_tags_handler).post(create_tag_handler))
}
