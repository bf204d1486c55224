use base64::{engine::general_purpose::STANDARD, Engine as _};
use sea_orm::DatabaseConnection;
use tracing::{debug, warn};

use crate::db::services::user_service;
use crate::web::error::ApiError;
use crate::web::models::AuthenticatedUser;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

/// Parses an `Authorization: Basic <base64(user:password)>` header value.
pub fn parse_basic_authorization(header_value: &str) -> Option<BasicCredentials> {
    let (scheme, encoded) = header_value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    // The password may itself contain ':'.
    let (username, password) = decoded.split_once(':')?;
    if username.is_empty() {
        return None;
    }
    Some(BasicCredentials {
        username: username.to_string(),
        password: password.to_string(),
    })
}

/// Resolves credentials to an active user whose bcrypt hash matches.
pub async fn authenticate(
    db: &DatabaseConnection,
    credentials: BasicCredentials,
) -> Result<AuthenticatedUser, ApiError> {
    let user = user_service::find_active_user_by_username(db, &credentials.username)
        .await?
        .ok_or_else(|| {
            debug!(username = %credentials.username, "No active user for credentials.");
            ApiError::Unauthorized
        })?;

    let password_hash = user.password.clone().ok_or(ApiError::Unauthorized)?;
    let password = credentials.password;

    let verified = tokio::task::spawn_blocking(move || bcrypt::verify(password, &password_hash))
        .await
        .map_err(|e| ApiError::Internal(format!("Password verification task failed: {e}")))?;

    match verified {
        Ok(true) => Ok(AuthenticatedUser {
            id: user.id,
            username: user.username,
        }),
        Ok(false) => Err(ApiError::Unauthorized),
        Err(e) => {
            warn!(user_id = user.id, error = %e, "Stored password hash could not be verified.");
            Err(ApiError::Unauthorized)
        }
    }
}
