pub mod maintenance_models;
pub mod monitor_models;
pub mod status_page_models;
pub mod tag_models;

/// The caller resolved by the auth middleware.
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub id: i32,
    pub username: String,
}
