//! Dashboard login.

use axum::{extract::State, Json};
use chrono::{Duration, Utc};
use tracing::{info, warn};
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use domain::models::{DashboardUser, LoginRequest, LoginResponse};
use persistence::repositories::DashboardUserRepository;
use shared::password::verify_password;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// POST /api/login
///
/// Checks a dashboard account's password. The response carries the account
/// and the time until which the frontend may consider it signed in.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    request.validate()?;

    let repo = DashboardUserRepository::new(state.pool.clone());
    let Some(entity) = repo.find_by_username(request.username.trim()).await? else {
        warn!(username = %request.username, "Login for unknown account");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.into()));
    };

    let user: DashboardUser = entity.into();
    if !user.is_active() {
        warn!(user_id = user.id, "Login for inactive account");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.into()));
    }

    if !verify_password(&request.password, &user.password_hash)? {
        warn!(user_id = user.id, "Login with wrong password");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.into()));
    }

    let expires_at = Utc::now() + Duration::hours(state.config.session.ttl_hours);

    info!(user_id = user.id, user_type = %user.user_type, "Dashboard user logged in");

    Ok(Json(LoginResponse { user, expires_at }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::routes::testing::{json, send, test_app};

    #[tokio::test]
    async fn test_login_rejects_empty_credentials() {
        let (status, body) = send(
            test_app(),
            json("POST", "/api/login", json!({ "username": "", "password": "" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_login_rejects_malformed_body() {
        let (status, _) = send(
            test_app(),
            json("POST", "/api/login", json!({ "user": "admin" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
