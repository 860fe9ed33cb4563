//! Agent mapping routes.
//!
//! Monitoring agents report a device id and/or Windows username. These
//! routes manage which user each identity belongs to and resolve agents
//! that have not been mapped yet.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use domain::models::{
    CreateDeviceMappingRequest, CreateWindowsUsernameMappingRequest, DeviceMapping,
    MapUserToSessionRequest, RegisterUserFromSessionRequest, SessionMappingResult,
    UnregisteredSession, WindowsUsernameMapping,
};
use persistence::repositories::{
    MappingRepository, NewUser, SessionOutcome, SessionResolution, UserRepository,
};

fn mapping_conflict(err: sqlx::Error, what: &str) -> ApiError {
    match ApiError::from(err) {
        ApiError::Conflict(_) => ApiError::Conflict(format!("{} is already mapped", what)),
        other => other,
    }
}

fn resolved(outcome: SessionOutcome) -> Result<SessionResolution, ApiError> {
    match outcome {
        SessionOutcome::Resolved(resolution) => Ok(resolution),
        SessionOutcome::Missing => Err(ApiError::NotFound("Unregistered session not found".into())),
        SessionOutcome::NoIdentity => Err(ApiError::Validation(
            "Unregistered session has no device id or Windows username to map".into(),
        )),
    }
}

fn into_result(resolution: SessionResolution) -> SessionMappingResult {
    SessionMappingResult {
        user_id: resolution.user_id,
        device_mapping: resolution.device_mapping.map(Into::into),
        windows_username_mapping: resolution.windows_username_mapping.map(Into::into),
    }
}

/// GET /api/device-mappings
pub async fn list_device_mappings(
    State(state): State<AppState>,
) -> Result<Json<Vec<DeviceMapping>>, ApiError> {
    let repo = MappingRepository::new(state.pool.clone());
    let mappings = repo.list_device_mappings().await?;
    Ok(Json(mappings.into_iter().map(Into::into).collect()))
}

/// POST /api/device-mappings
pub async fn create_device_mapping(
    State(state): State<AppState>,
    Json(request): Json<CreateDeviceMappingRequest>,
) -> Result<(StatusCode, Json<DeviceMapping>), ApiError> {
    request.validate()?;

    let repo = MappingRepository::new(state.pool.clone());
    let mapping = repo
        .create_device_mapping(request.device_id.trim(), request.user_id)
        .await
        .map_err(|e| mapping_conflict(e, "Device"))?;

    info!(mapping_id = mapping.id, user_id = mapping.user_id, "Device mapping created");

    Ok((StatusCode::CREATED, Json(mapping.into())))
}

/// DELETE /api/device-mappings/:id
pub async fn delete_device_mapping(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let repo = MappingRepository::new(state.pool.clone());
    if !repo.delete_device_mapping(id).await? {
        return Err(ApiError::NotFound("Device mapping not found".into()));
    }

    info!(mapping_id = id, "Device mapping deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/windows-username-mappings
pub async fn list_windows_username_mappings(
    State(state): State<AppState>,
) -> Result<Json<Vec<WindowsUsernameMapping>>, ApiError> {
    let repo = MappingRepository::new(state.pool.clone());
    let mappings = repo.list_windows_username_mappings().await?;
    Ok(Json(mappings.into_iter().map(Into::into).collect()))
}

/// POST /api/windows-username-mappings
pub async fn create_windows_username_mapping(
    State(state): State<AppState>,
    Json(request): Json<CreateWindowsUsernameMappingRequest>,
) -> Result<(StatusCode, Json<WindowsUsernameMapping>), ApiError> {
    request.validate()?;

    let repo = MappingRepository::new(state.pool.clone());
    let mapping = repo
        .create_windows_username_mapping(request.windows_username.trim(), request.user_id)
        .await
        .map_err(|e| mapping_conflict(e, "Windows username"))?;

    info!(
        mapping_id = mapping.id,
        user_id = mapping.user_id,
        "Windows username mapping created"
    );

    Ok((StatusCode::CREATED, Json(mapping.into())))
}

/// DELETE /api/windows-username-mappings/:id
pub async fn delete_windows_username_mapping(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let repo = MappingRepository::new(state.pool.clone());
    if !repo.delete_windows_username_mapping(id).await? {
        return Err(ApiError::NotFound("Windows username mapping not found".into()));
    }

    info!(mapping_id = id, "Windows username mapping deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/unregistered-sessions
pub async fn list_unregistered_sessions(
    State(state): State<AppState>,
) -> Result<Json<Vec<UnregisteredSession>>, ApiError> {
    let repo = MappingRepository::new(state.pool.clone());
    let sessions = repo.list_unregistered_sessions().await?;
    Ok(Json(sessions.into_iter().map(Into::into).collect()))
}

/// POST /api/register-user-from-session
///
/// Creates a user from an unregistered agent and maps the agent to it in a
/// single transaction.
pub async fn register_user_from_session(
    State(state): State<AppState>,
    Json(request): Json<RegisterUserFromSessionRequest>,
) -> Result<(StatusCode, Json<SessionMappingResult>), ApiError> {
    request.validate()?;

    let repo = MappingRepository::new(state.pool.clone());
    let resolution = repo
        .register_user_from_session(
            request.session_id,
            NewUser {
                name: request.name.trim(),
                email: request.email.trim(),
                phone: request.phone.as_deref(),
                status: "active",
                usertype_id: request.usertype_id,
            },
        )
        .await
        .map_err(|e| mapping_conflict(e, "User or agent identity"))
        .and_then(resolved)?;

    info!(
        session_id = request.session_id,
        user_id = resolution.user_id,
        "User registered from session"
    );

    Ok((StatusCode::CREATED, Json(into_result(resolution))))
}

/// POST /api/map-user-to-session
pub async fn map_user_to_session(
    State(state): State<AppState>,
    Json(request): Json<MapUserToSessionRequest>,
) -> Result<Json<SessionMappingResult>, ApiError> {
    if !UserRepository::new(state.pool.clone())
        .exists(request.user_id)
        .await?
    {
        return Err(ApiError::NotFound("User not found".into()));
    }

    let repo = MappingRepository::new(state.pool.clone());
    let resolution = repo
        .map_session_to_user(request.session_id, request.user_id)
        .await
        .map_err(|e| mapping_conflict(e, "Agent identity"))
        .and_then(resolved)?;

    info!(
        session_id = request.session_id,
        user_id = request.user_id,
        "Session mapped to user"
    );

    Ok(Json(into_result(resolution)))
}
