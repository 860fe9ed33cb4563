//! Per-user session timeline.

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use domain::models::filter::{parse_date, parse_user_id};
use domain::models::{ReportTimezone, UserTimeline};
use persistence::repositories::UserRepository;

/// Query parameters for `GET /api/user-timeline`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimelineQuery {
    pub user: Option<String>,
    pub date: Option<String>,
    pub timezone: Option<String>,
}

/// GET /api/user-timeline
///
/// Sessions of one user on one local day. `date` defaults to today in the
/// requested timezone.
pub async fn user_timeline(
    State(state): State<AppState>,
    Query(query): Query<TimelineQuery>,
) -> Result<Json<UserTimeline>, ApiError> {
    let user_id = parse_user_id(query.user.as_deref())?
        .ok_or_else(|| ApiError::Validation("user is required".into()))?;

    let tz = match query.timezone.as_deref().map(str::trim) {
        None | Some("") => state.config.reports.timezone(),
        Some(name) => name.parse::<ReportTimezone>()?,
    };

    let date = match query.date.as_deref().map(str::trim) {
        None | Some("") => tz.today(Utc::now()),
        Some(token) => parse_date(token)?,
    };

    if !UserRepository::new(state.pool.clone()).exists(user_id).await? {
        return Err(ApiError::NotFound("User not found".into()));
    }

    let timeline = state.reports().timeline(user_id, date, tz).await?;

    info!(
        user_id,
        date = %date,
        sessions = timeline.entries.len(),
        "Fetched user timeline"
    );

    Ok(Json(timeline))
}
