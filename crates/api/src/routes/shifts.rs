//! Shift assignment routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use domain::models::{ShiftOption, UpsertShiftRequest, UserShift};
use persistence::repositories::{ShiftRepository, UserRepository};

/// GET /api/shifts
pub async fn list_shifts(State(state): State<AppState>) -> Result<Json<Vec<UserShift>>, ApiError> {
    let repo = ShiftRepository::new(state.pool.clone());
    let shifts = repo.list().await?;
    Ok(Json(shifts.into_iter().map(Into::into).collect()))
}

/// GET /api/shifts/options
///
/// Distinct shift windows for the dashboard's shift selector. Each option's
/// `value` is accepted as-is by the `shift` report parameter.
pub async fn shift_options(
    State(state): State<AppState>,
) -> Result<Json<Vec<ShiftOption>>, ApiError> {
    let repo = ShiftRepository::new(state.pool.clone());
    let options = repo.options().await?;
    Ok(Json(options.into_iter().map(Into::into).collect()))
}

/// PUT /api/shifts/:user_id
pub async fn upsert_shift(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(request): Json<UpsertShiftRequest>,
) -> Result<Json<UserShift>, ApiError> {
    let window = request.window()?;

    if !UserRepository::new(state.pool.clone()).exists(user_id).await? {
        return Err(ApiError::NotFound("User not found".into()));
    }

    let repo = ShiftRepository::new(state.pool.clone());
    let shift = repo.upsert(user_id, window).await?;

    info!(user_id, shift = %window, "Shift assigned");

    Ok(Json(shift.into()))
}

/// DELETE /api/shifts/:user_id
pub async fn delete_shift(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let repo = ShiftRepository::new(state.pool.clone());
    if !repo.delete_for_user(user_id).await? {
        return Err(ApiError::NotFound("No shift assigned to this user".into()));
    }

    info!(user_id, "Shift removed");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::routes::testing::{json, send, test_app};

    #[tokio::test]
    async fn test_upsert_rejects_bad_times() {
        let (status, body) = send(
            test_app(),
            json(
                "PUT",
                "/api/shifts/3",
                json!({ "shift_start": "9am", "shift_end": "17:00" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_upsert_rejects_zero_length_shift() {
        let (status, _) = send(
            test_app(),
            json(
                "PUT",
                "/api/shifts/3",
                json!({ "shift_start": "09:00", "shift_end": "09:00:00" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
