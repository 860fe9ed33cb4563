//! User type routes.

use axum::{extract::State, http::StatusCode, Json};
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use domain::models::{CreateUserTypeRequest, UserType};
use persistence::repositories::UserRepository;

/// GET /api/usertypes
pub async fn list_usertypes(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserType>>, ApiError> {
    let repo = UserRepository::new(state.pool.clone());
    let types = repo.list_usertypes().await?;
    Ok(Json(types.into_iter().map(Into::into).collect()))
}

/// POST /api/usertypes
pub async fn create_usertype(
    State(state): State<AppState>,
    Json(request): Json<CreateUserTypeRequest>,
) -> Result<(StatusCode, Json<UserType>), ApiError> {
    request.validate()?;

    let repo = UserRepository::new(state.pool.clone());
    let usertype = repo
        .create_usertype(request.name.trim())
        .await
        .map_err(|e| match ApiError::from(e) {
            ApiError::Conflict(_) => {
                ApiError::Conflict(format!("User type '{}' already exists", request.name.trim()))
            }
            other => other,
        })?;

    info!(usertype_id = usertype.id, name = %usertype.name, "User type created");

    Ok((StatusCode::CREATED, Json(usertype.into())))
}
