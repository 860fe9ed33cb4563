//! Report response models for the summary, dashboard and timeline endpoints.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

use super::metrics::{ActivityDistribution, ActivityLevel, CategoryTotals, LateStartSummary};
use shared::duration::{format_duration, seconds_to_hours};

/// A time quantity rendered three ways for the frontend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeValue {
    pub seconds: i64,
    pub hours: f64,
    pub formatted: String,
}

impl TimeValue {
    pub fn from_seconds(seconds: i64) -> Self {
        TimeValue {
            seconds,
            hours: seconds_to_hours(seconds),
            formatted: format_duration(seconds),
        }
    }
}

impl From<i64> for TimeValue {
    fn from(seconds: i64) -> Self {
        TimeValue::from_seconds(seconds)
    }
}

/// Per-category times of one aggregate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTimes {
    pub total_time: TimeValue,
    pub productive_time: TimeValue,
    pub wasted_time: TimeValue,
    pub neutral_time: TimeValue,
    pub idle_time: TimeValue,
    pub break_time: TimeValue,
}

impl From<&CategoryTotals> for CategoryTimes {
    fn from(totals: &CategoryTotals) -> Self {
        CategoryTimes {
            total_time: totals.tracked().into(),
            productive_time: totals.productive.into(),
            wasted_time: totals.wasted.into(),
            neutral_time: totals.neutral.into(),
            idle_time: totals.idle.into(),
            break_time: totals.break_time.into(),
        }
    }
}

/// `GET /api/summary/kpis`
#[derive(Debug, Clone, Serialize)]
pub struct KpiSummary {
    pub range: String,
    pub timezone: String,
    pub total_users: i64,
    pub active_users: i64,
    #[serde(flatten)]
    pub times: CategoryTimes,
    pub average_time_per_user: TimeValue,
    pub productivity_percentage: f64,
    pub idle_percentage: f64,
    pub tracked_target_percentage: f64,
    pub productive_target_percentage: f64,
    pub activity_level: ActivityLevel,
}

/// One ranked entry of `GET /api/summary/top-apps`.
#[derive(Debug, Clone, Serialize)]
pub struct TopApp {
    pub rank: usize,
    pub domain_or_app: String,
    pub category: String,
    pub time: TimeValue,
    pub share_percentage: f64,
}

/// One row of `GET /api/summary/users-activity`.
#[derive(Debug, Clone, Serialize)]
pub struct UserActivity {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub session_count: i64,
    #[serde(flatten)]
    pub times: CategoryTimes,
    pub productivity_percentage: f64,
    pub activity_level: ActivityLevel,
    pub shift: Option<String>,
    pub first_activity: Option<NaiveTime>,
    #[serde(flatten)]
    pub late_start: LateStartSummary,
}

/// One entry of `GET /api/summary/user-breakdown`.
#[derive(Debug, Clone, Serialize)]
pub struct UserBreakdown {
    pub user_id: i64,
    pub name: String,
    pub total_time: TimeValue,
    pub productive_percentage: f64,
    pub wasted_percentage: f64,
    pub neutral_percentage: f64,
    pub idle_percentage: f64,
    pub break_percentage: f64,
    pub top_apps: Vec<TopApp>,
}

/// Hour-of-day chart bucket.
#[derive(Debug, Clone, Serialize)]
pub struct HourlyPoint {
    pub hour: u32,
    pub label: String,
    #[serde(flatten)]
    pub totals: CategoryTotals,
}

/// Day chart bucket.
#[derive(Debug, Clone, Serialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub totals: CategoryTotals,
    pub productivity_percentage: f64,
}

/// `GET /api/summary/charts`
#[derive(Debug, Clone, Serialize)]
pub struct ChartsResponse {
    pub hourly: Vec<HourlyPoint>,
    pub daily: Vec<DailyPoint>,
    pub activity_levels: ActivityDistribution,
}

/// `GET /api/dashboard`
#[derive(Debug, Clone, Serialize)]
pub struct DashboardOverview {
    pub kpis: KpiSummary,
    pub top_apps: Vec<TopApp>,
    pub top_users: Vec<UserActivity>,
    pub bottom_users: Vec<UserActivity>,
    pub activity_levels: ActivityDistribution,
}

/// One session in `GET /api/user-timeline`.
#[derive(Debug, Clone, Serialize)]
pub struct TimelineEntry {
    pub session_id: i64,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    #[serde(flatten)]
    pub totals: CategoryTotals,
    pub dominant_category: String,
}

/// `GET /api/user-timeline`
#[derive(Debug, Clone, Serialize)]
pub struct UserTimeline {
    pub user_id: i64,
    pub date: NaiveDate,
    pub timezone: String,
    pub entries: Vec<TimelineEntry>,
    pub totals: CategoryTotals,
    pub total_time: TimeValue,
}
