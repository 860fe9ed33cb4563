//! Aggregation result rows for the report queries.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use sqlx::FromRow;

use domain::models::CategoryTotals;

/// Summed session times. Every column is `COALESCE(SUM(...), 0)::BIGINT`.
#[derive(Debug, Clone, Copy, Default, FromRow)]
pub struct CategoryTotalsEntity {
    pub total_time: i64,
    pub productive_time: i64,
    pub wasted_time: i64,
    pub neutral_time: i64,
    pub idle_time: i64,
    pub break_time: i64,
}

impl From<CategoryTotalsEntity> for CategoryTotals {
    fn from(entity: CategoryTotalsEntity) -> Self {
        CategoryTotals {
            total: entity.total_time,
            productive: entity.productive_time,
            wasted: entity.wasted_time,
            neutral: entity.neutral_time,
            idle: entity.idle_time,
            break_time: entity.break_time,
        }
    }
}

/// Totals over every session matching a filter.
#[derive(Debug, Clone, FromRow)]
pub struct KpiTotalsEntity {
    pub active_users: i64,
    #[sqlx(flatten)]
    pub totals: CategoryTotalsEntity,
}

/// Totals for one user.
#[derive(Debug, Clone, FromRow)]
pub struct UserTotalsEntity {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub session_count: i64,
    #[sqlx(flatten)]
    pub totals: CategoryTotalsEntity,
}

/// Time per app or domain.
#[derive(Debug, Clone, FromRow)]
pub struct AppUsageEntity {
    pub domain_or_app: String,
    pub category: String,
    pub time_spent: i64,
}

/// Time per app or domain, per user.
#[derive(Debug, Clone, FromRow)]
pub struct UserAppUsageEntity {
    pub user_id: i64,
    pub domain_or_app: String,
    pub category: String,
    pub time_spent: i64,
}

/// Totals for one local hour of the day.
#[derive(Debug, Clone, FromRow)]
pub struct HourlyTotalsEntity {
    pub hour: i32,
    #[sqlx(flatten)]
    pub totals: CategoryTotalsEntity,
}

/// Totals for one local day.
#[derive(Debug, Clone, FromRow)]
pub struct DailyTotalsEntity {
    pub day: NaiveDate,
    #[sqlx(flatten)]
    pub totals: CategoryTotalsEntity,
}

/// Earliest local session start of a user on a day.
#[derive(Debug, Clone, FromRow)]
pub struct FirstActivityEntity {
    pub user_id: i64,
    pub day: NaiveDate,
    pub first_activity: NaiveTime,
}

/// One session with local start and end times.
#[derive(Debug, Clone, FromRow)]
pub struct TimelineSessionEntity {
    pub id: i64,
    pub local_start: NaiveDateTime,
    pub local_end: NaiveDateTime,
    #[sqlx(flatten)]
    pub totals: CategoryTotalsEntity,
}
