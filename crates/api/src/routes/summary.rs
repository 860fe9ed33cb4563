//! Summary report routes.
//!
//! Every endpoint accepts the shared filter parameters `range`, `shift`,
//! `user` and `timezone`.

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use domain::models::{
    ChartsResponse, KpiSummary, ReportFilter, ReportQuery, TopApp, UserActivity, UserBreakdown,
};

/// Upper bound for `limit` on the top apps endpoint.
pub const MAX_TOP_APPS_LIMIT: i64 = 100;

const APP_CATEGORIES: &[&str] = &["productive", "wasted", "neutral"];

/// Query parameters for `GET /api/summary/top-apps`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TopAppsQuery {
    #[serde(flatten)]
    pub filter: ReportQuery,
    pub limit: Option<String>,
    pub category: Option<String>,
}

/// Parses the shared filter parameters, defaulting the timezone from config.
pub fn report_filter(state: &AppState, query: &ReportQuery) -> Result<ReportFilter, ApiError> {
    Ok(ReportFilter::from_query(
        query,
        state.config.reports.timezone(),
    )?)
}

fn parse_limit(token: Option<&str>, default: i64) -> Result<i64, ApiError> {
    match token.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(default.clamp(1, MAX_TOP_APPS_LIMIT)),
        Some(s) => match s.parse::<i64>() {
            Ok(n) if (1..=MAX_TOP_APPS_LIMIT).contains(&n) => Ok(n),
            _ => Err(ApiError::Validation(format!(
                "limit must be between 1 and {}",
                MAX_TOP_APPS_LIMIT
            ))),
        },
    }
}

fn parse_category(token: Option<&str>) -> Result<Option<&str>, ApiError> {
    match token.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(c) if APP_CATEGORIES.contains(&c) => Ok(Some(c)),
        Some(c) => Err(ApiError::Validation(format!(
            "Unknown category '{}'. Expected productive, wasted or neutral",
            c
        ))),
    }
}

/// GET /api/summary/kpis
pub async fn kpis(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<KpiSummary>, ApiError> {
    let filter = report_filter(&state, &query)?;
    let summary = state.reports().kpis(&filter, Utc::now()).await?;

    info!(
        range = %filter.range,
        shift = %filter.shift,
        user_id = ?filter.user_id,
        active_users = summary.active_users,
        "Fetched KPI summary"
    );

    Ok(Json(summary))
}

/// GET /api/summary/top-apps
pub async fn top_apps(
    State(state): State<AppState>,
    Query(query): Query<TopAppsQuery>,
) -> Result<Json<Vec<TopApp>>, ApiError> {
    let filter = report_filter(&state, &query.filter)?;
    let limit = parse_limit(query.limit.as_deref(), state.config.reports.top_apps_limit)?;
    let category = parse_category(query.category.as_deref())?;

    let apps = state.reports().top_apps(&filter, category, limit).await?;

    info!(range = %filter.range, limit, count = apps.len(), "Fetched top apps");

    Ok(Json(apps))
}

/// GET /api/summary/users-activity
pub async fn users_activity(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<Vec<UserActivity>>, ApiError> {
    let filter = report_filter(&state, &query)?;
    let rows = state.reports().users_activity(&filter).await?;

    info!(range = %filter.range, count = rows.len(), "Fetched users activity");

    Ok(Json(rows))
}

/// GET /api/summary/user-breakdown
pub async fn user_breakdown(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<Vec<UserBreakdown>>, ApiError> {
    let filter = report_filter(&state, &query)?;
    let rows = state.reports().user_breakdown(&filter).await?;

    info!(range = %filter.range, count = rows.len(), "Fetched user breakdown");

    Ok(Json(rows))
}

/// GET /api/summary/charts
pub async fn charts(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<ChartsResponse>, ApiError> {
    let filter = report_filter(&state, &query)?;
    let charts = state.reports().charts(&filter, Utc::now()).await?;

    info!(range = %filter.range, days = charts.daily.len(), "Fetched chart series");

    Ok(Json(charts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    use crate::routes::testing::{get, send, test_app};

    #[test]
    fn test_parse_limit() {
        assert_eq!(parse_limit(None, 10).unwrap(), 10);
        assert_eq!(parse_limit(Some(""), 10).unwrap(), 10);
        assert_eq!(parse_limit(Some("25"), 10).unwrap(), 25);
        assert_eq!(parse_limit(None, 500).unwrap(), MAX_TOP_APPS_LIMIT);
        assert!(parse_limit(Some("0"), 10).is_err());
        assert!(parse_limit(Some("101"), 10).is_err());
        assert!(parse_limit(Some("ten"), 10).is_err());
    }

    #[test]
    fn test_parse_category() {
        assert_eq!(parse_category(None).unwrap(), None);
        assert_eq!(parse_category(Some("wasted")).unwrap(), Some("wasted"));
        assert!(parse_category(Some("idle")).is_err());
    }

    #[tokio::test]
    async fn test_kpis_rejects_malformed_range() {
        let (status, body) = send(test_app(), get("/api/summary/kpis?range=fortnightly")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
        assert!(body["message"].as_str().unwrap().contains("fortnightly"));
    }

    #[tokio::test]
    async fn test_charts_rejects_inverted_custom_range() {
        let (status, _) = send(
            test_app(),
            get("/api/summary/charts?range=custom:2024-03-10:2024-03-01"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_charts_rejects_unbounded_custom_range() {
        let (status, body) = send(
            test_app(),
            get("/api/summary/charts?range=custom:0001-01-01:9999-12-31"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
        assert!(body["message"].as_str().unwrap().contains("at most 366"));

        let (status, _) = send(
            test_app(),
            get("/api/summary/charts?range=custom:0001-01-01:%2B262000-12-31"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_users_activity_rejects_unknown_timezone() {
        let (status, body) = send(
            test_app(),
            get("/api/summary/users-activity?timezone=Mars%2FOlympus"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].as_str().unwrap().contains("Mars/Olympus"));
    }

    #[tokio::test]
    async fn test_user_breakdown_rejects_bad_shift() {
        let (status, _) = send(
            test_app(),
            get("/api/summary/user-breakdown?shift=morning"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_top_apps_rejects_bad_limit() {
        let (status, body) = send(test_app(), get("/api/summary/top-apps?limit=1000")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].as_str().unwrap().contains("limit"));
    }
}
