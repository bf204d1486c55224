use axum::{
    http::{Method, StatusCode},
    middleware as axum_middleware,
    routing::get,
    Json, Router,
};
use kuma_common::{ErrorBody, API_PREFIX};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::scheduler::{MonitorLocks, MonitorScheduler};
use crate::web::{middleware::auth, routes::*};

pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod routes;

pub struct AppState {
    pub db_pool: DatabaseConnection,
    pub scheduler: Arc<dyn MonitorScheduler>,
    pub monitor_locks: MonitorLocks,
}

async fn health_check_handler() -> &'static str {
    "OK"
}

async fn not_found_handler() -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            error: "Not found".to_string(),
        }),
    )
}

pub fn create_axum_router(
    db_pool: DatabaseConnection,
    scheduler: Arc<dyn MonitorScheduler>,
) -> Router {
    let app_state = Arc::new(AppState {
        db_pool,
        scheduler,
        monitor_locks: MonitorLocks::new(),
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(vec![Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any);

    let api_v2 = Router::new()
        .nest("/monitors", monitor_routes::create_monitor_router())
        .nest("/status-pages", status_page_routes::create_status_page_router())
        .nest("/tags", tag_routes::create_tags_router())
        .nest("/maintenance", maintenance_routes::create_maintenance_router())
        .merge(info_routes::create_info_router())
        .route_layer(axum_middleware::from_fn_with_state(app_state.clone(), auth::auth));

    Router::new()
        .route("/api/health", get(health_check_handler))
        .nest(API_PREFIX, api_v2)
        .fallback(not_found_handler)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}
