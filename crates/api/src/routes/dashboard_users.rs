//! Dashboard account administration.
//!
//! At least one active admin account must remain, so demoting, disabling
//! or deleting the last one is refused.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::{info, warn};
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use domain::models::{
    ChangePasswordRequest, CreateDashboardUserRequest, DashboardUser, UpdateDashboardUserRequest,
};
use persistence::repositories::DashboardUserRepository;
use shared::password::{hash_password, verify_password};

/// GET /api/dashboard-users
pub async fn list_dashboard_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<DashboardUser>>, ApiError> {
    let repo = DashboardUserRepository::new(state.pool.clone());
    let users = repo.list().await?;
    Ok(Json(users.into_iter().map(Into::into).collect()))
}

/// POST /api/dashboard-users
pub async fn create_dashboard_user(
    State(state): State<AppState>,
    Json(request): Json<CreateDashboardUserRequest>,
) -> Result<(StatusCode, Json<DashboardUser>), ApiError> {
    request.validate()?;

    let password_hash = hash_password(&request.password)?;
    let repo = DashboardUserRepository::new(state.pool.clone());
    let user = repo
        .create(
            request.username.trim(),
            &password_hash,
            request.user_type.as_deref().unwrap_or("viewer"),
            request.status.as_deref().unwrap_or("active"),
        )
        .await
        .map_err(|e| match ApiError::from(e) {
            ApiError::Conflict(_) => ApiError::Conflict("Username already taken".into()),
            other => other,
        })?;

    info!(dashboard_user_id = user.id, user_type = %user.user_type, "Dashboard user created");

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// PUT /api/dashboard-users/:id
pub async fn update_dashboard_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateDashboardUserRequest>,
) -> Result<Json<DashboardUser>, ApiError> {
    request.validate()?;

    let repo = DashboardUserRepository::new(state.pool.clone());
    let current: DashboardUser = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Dashboard user not found".into()))?
        .into();

    let demoted = request.user_type.as_deref().is_some_and(|t| t != "admin");
    let disabled = request.status.as_deref().is_some_and(|s| s != "active");
    if is_active_admin(&current) && (demoted || disabled) {
        ensure_other_admin(&repo).await?;
    }

    let user = repo
        .update_profile(
            id,
            request.username.as_deref().map(str::trim),
            request.user_type.as_deref(),
            request.status.as_deref(),
        )
        .await
        .map_err(|e| match ApiError::from(e) {
            ApiError::Conflict(_) => ApiError::Conflict("Username already taken".into()),
            other => other,
        })?
        .ok_or_else(|| ApiError::NotFound("Dashboard user not found".into()))?;

    info!(dashboard_user_id = id, "Dashboard user updated");

    Ok(Json(user.into()))
}

/// PUT /api/dashboard-users/:id/password
pub async fn change_password(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<StatusCode, ApiError> {
    request.validate()?;

    let repo = DashboardUserRepository::new(state.pool.clone());
    let user = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Dashboard user not found".into()))?;

    if !verify_password(&request.current_password, &user.password_hash)? {
        warn!(dashboard_user_id = id, "Password change with wrong current password");
        return Err(ApiError::Unauthorized("Current password is incorrect".into()));
    }

    let password_hash = hash_password(&request.new_password)?;
    if !repo.update_password(id, &password_hash).await? {
        return Err(ApiError::NotFound("Dashboard user not found".into()));
    }

    info!(dashboard_user_id = id, "Dashboard user password changed");

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/dashboard-users/:id
pub async fn delete_dashboard_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let repo = DashboardUserRepository::new(state.pool.clone());
    let current: DashboardUser = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Dashboard user not found".into()))?
        .into();

    if is_active_admin(&current) {
        ensure_other_admin(&repo).await?;
    }

    if !repo.delete(id).await? {
        return Err(ApiError::NotFound("Dashboard user not found".into()));
    }

    info!(dashboard_user_id = id, "Dashboard user deleted");

    Ok(StatusCode::NO_CONTENT)
}

fn is_active_admin(user: &DashboardUser) -> bool {
    user.user_type == "admin" && user.is_active()
}

async fn ensure_other_admin(repo: &DashboardUserRepository) -> Result<(), ApiError> {
    if repo.count_active_admins().await? <= 1 {
        return Err(ApiError::Conflict(
            "At least one active admin account is required".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use chrono::Utc;
    use serde_json::json;

    use crate::routes::testing::{json, send, test_app};

    fn account(user_type: &str, status: &str) -> DashboardUser {
        DashboardUser {
            id: 1,
            username: "ops".into(),
            password_hash: String::new(),
            user_type: user_type.into(),
            status: status.into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_is_active_admin() {
        assert!(is_active_admin(&account("admin", "active")));
        assert!(!is_active_admin(&account("admin", "inactive")));
        assert!(!is_active_admin(&account("viewer", "active")));
    }

    #[tokio::test]
    async fn test_create_rejects_short_password() {
        let (status, body) = send(
            test_app(),
            json(
                "POST",
                "/api/dashboard-users",
                json!({ "username": "ops", "password": "short" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_update_rejects_unknown_type() {
        let (status, _) = send(
            test_app(),
            json("PUT", "/api/dashboard-users/1", json!({ "type": "root" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
