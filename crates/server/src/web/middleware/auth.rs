use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::services::auth_service;
use crate::web::{error::ApiError, AppState};

/// Resolves the caller from HTTP Basic credentials and stores the
/// [`AuthenticatedUser`](crate::web::models::AuthenticatedUser) in the
/// request extensions. Every versioned route sits behind this layer.
pub async fn auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let credentials = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(auth_service::parse_basic_authorization)
        .ok_or(ApiError::Unauthorized)?;

    let authenticated_user = auth_service::authenticate(&state.db_pool, credentials).await?;
    req.extensions_mut().insert(authenticated_user);
    Ok(next.run(req).await)
}
