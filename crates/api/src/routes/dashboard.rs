//! Dashboard overview route.

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use tracing::info;

use super::summary::report_filter;
use crate::app::AppState;
use crate::error::ApiError;
use domain::models::{DashboardOverview, ReportQuery};

/// GET /api/dashboard
///
/// KPIs, top apps, the most and least productive users and the activity
/// level distribution in one response.
pub async fn overview(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<DashboardOverview>, ApiError> {
    let filter = report_filter(&state, &query)?;
    let overview = state.reports().overview(&filter, Utc::now()).await?;

    info!(
        range = %filter.range,
        shift = %filter.shift,
        active_users = overview.kpis.active_users,
        "Fetched dashboard overview"
    );

    Ok(Json(overview))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::routes::testing::{get, send, test_app};

    #[tokio::test]
    async fn test_overview_rejects_bad_user() {
        let (status, body) = send(test_app(), get("/api/dashboard?user=someone")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].as_str().unwrap().contains("someone"));
    }
}
