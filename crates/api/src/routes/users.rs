//! Monitored user routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use domain::models::{CreateUserRequest, ListUsersQuery, UpdateUserRequest, User};
use persistence::repositories::{NewUser, UserChanges, UserRepository};

/// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<Vec<User>>, ApiError> {
    let status = query.status.as_deref().filter(|s| !s.is_empty());
    if let Some(status) = status {
        shared::validation::validate_status(status)
            .map_err(|_| ApiError::Validation(format!("Unknown status '{}'", status)))?;
    }

    let repo = UserRepository::new(state.pool.clone());
    let users = repo.list(status).await?;

    Ok(Json(users.into_iter().map(Into::into).collect()))
}

/// GET /api/users/:id
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<User>, ApiError> {
    let repo = UserRepository::new(state.pool.clone());
    let user = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    Ok(Json(user.into()))
}

/// POST /api/users
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    request.validate()?;

    let repo = UserRepository::new(state.pool.clone());
    let user = repo
        .create(NewUser {
            name: request.name.trim(),
            email: request.email.trim(),
            phone: request.phone.as_deref().filter(|p| !p.is_empty()),
            status: request.status.as_deref().unwrap_or("active"),
            usertype_id: request.usertype_id,
        })
        .await?;

    info!(user_id = user.id, "User created");

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// PUT /api/users/:id
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<User>, ApiError> {
    request.validate()?;

    let repo = UserRepository::new(state.pool.clone());
    let user = repo
        .update(
            id,
            UserChanges {
                name: request.name.as_deref().map(str::trim),
                email: request.email.as_deref().map(str::trim),
                phone: request.phone.as_deref(),
                status: request.status.as_deref(),
                usertype_id: request.usertype_id,
            },
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    info!(user_id = id, "User updated");

    Ok(Json(user.into()))
}

/// DELETE /api/users/:id
///
/// Removes the user together with their sessions, shift and mappings.
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let repo = UserRepository::new(state.pool.clone());
    if !repo.delete(id).await? {
        return Err(ApiError::NotFound("User not found".into()));
    }

    info!(user_id = id, "User deleted");

    Ok(StatusCode::NO_CONTENT)
}
