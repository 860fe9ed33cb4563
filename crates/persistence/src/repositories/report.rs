//! Report repository.
//!
//! Aggregations over `stealth_sessions` and `session_usage_breakdown` shared
//! by the summary, dashboard and timeline endpoints. Every query starts from
//! the same filter predicates (see [`crate::filter`]).

use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::entities::{
    AppUsageEntity, DailyTotalsEntity, FirstActivityEntity, HourlyTotalsEntity, KpiTotalsEntity,
    TimelineSessionEntity, UserAppUsageEntity, UserTotalsEntity,
};
use crate::filter::{push_local_date, push_local_timestamp, push_report_filters, totals_columns};
use domain::models::{ReportFilter, ReportTimezone};

/// Repository for report aggregations.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: PgPool,
}

impl ReportRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Totals over all sessions matching the filter.
    pub async fn kpi_totals(&self, filter: &ReportFilter) -> Result<KpiTotalsEntity, sqlx::Error> {
        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "SELECT COUNT(DISTINCT s.user_id) AS active_users, {} \
             FROM stealth_sessions s WHERE ",
            totals_columns("s")
        ));
        push_report_filters(&mut builder, filter, "s");

        builder
            .build_query_as::<KpiTotalsEntity>()
            .fetch_one(&self.pool)
            .await
    }

    /// Number of active users the filter applies to, with or without sessions.
    pub async fn count_tracked_users(&self, filter: &ReportFilter) -> Result<i64, sqlx::Error> {
        let mut builder =
            QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM users u WHERE u.status = 'active'");

        if let Some(window) = filter.shift.window() {
            builder.push(" AND u.id IN (SELECT user_id FROM user_shifts WHERE shift_start = ");
            builder.push_bind(window.start);
            builder.push(" AND shift_end = ");
            builder.push_bind(window.end);
            builder.push(")");
        }
        if let Some(user_id) = filter.user_id {
            builder.push(" AND u.id = ");
            builder.push_bind(user_id);
        }

        builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
    }

    /// Per-user totals, most productive first.
    pub async fn user_totals(
        &self,
        filter: &ReportFilter,
    ) -> Result<Vec<UserTotalsEntity>, sqlx::Error> {
        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "SELECT u.id AS user_id, u.name, u.email, COUNT(s.id) AS session_count, {} \
             FROM stealth_sessions s \
             JOIN users u ON u.id = s.user_id \
             WHERE ",
            totals_columns("s")
        ));
        push_report_filters(&mut builder, filter, "s");
        builder.push(" GROUP BY u.id, u.name, u.email ORDER BY productive_time DESC, u.name");

        builder
            .build_query_as::<UserTotalsEntity>()
            .fetch_all(&self.pool)
            .await
    }

    /// Apps and domains ranked by time spent.
    pub async fn top_apps(
        &self,
        filter: &ReportFilter,
        category: Option<&str>,
        limit: i64,
    ) -> Result<Vec<AppUsageEntity>, sqlx::Error> {
        let mut builder = QueryBuilder::<Postgres>::new(
            "SELECT b.domain_or_app, b.category, COALESCE(SUM(b.time_spent), 0)::BIGINT AS time_spent \
             FROM session_usage_breakdown b \
             JOIN stealth_sessions s ON s.id = b.session_id \
             WHERE ",
        );
        push_report_filters(&mut builder, filter, "s");
        if let Some(category) = category {
            builder.push(" AND b.category = ");
            builder.push_bind(category.to_string());
        }
        builder.push(" GROUP BY b.domain_or_app, b.category ORDER BY time_spent DESC, b.domain_or_app LIMIT ");
        builder.push_bind(limit);

        builder
            .build_query_as::<AppUsageEntity>()
            .fetch_all(&self.pool)
            .await
    }

    /// Total breakdown time, the denominator of app shares.
    pub async fn app_time_total(
        &self,
        filter: &ReportFilter,
        category: Option<&str>,
    ) -> Result<i64, sqlx::Error> {
        let mut builder = QueryBuilder::<Postgres>::new(
            "SELECT COALESCE(SUM(b.time_spent), 0)::BIGINT \
             FROM session_usage_breakdown b \
             JOIN stealth_sessions s ON s.id = b.session_id \
             WHERE ",
        );
        push_report_filters(&mut builder, filter, "s");
        if let Some(category) = category {
            builder.push(" AND b.category = ");
            builder.push_bind(category.to_string());
        }

        builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
    }

    /// The `per_user` most used apps of every user.
    pub async fn top_apps_per_user(
        &self,
        filter: &ReportFilter,
        per_user: i64,
    ) -> Result<Vec<UserAppUsageEntity>, sqlx::Error> {
        let mut builder = QueryBuilder::<Postgres>::new(
            "SELECT user_id, domain_or_app, category, time_spent FROM ( \
                SELECT s.user_id, b.domain_or_app, b.category, \
                       COALESCE(SUM(b.time_spent), 0)::BIGINT AS time_spent, \
                       ROW_NUMBER() OVER ( \
                           PARTITION BY s.user_id ORDER BY SUM(b.time_spent) DESC, b.domain_or_app \
                       ) AS position \
                FROM session_usage_breakdown b \
                JOIN stealth_sessions s ON s.id = b.session_id \
                WHERE ",
        );
        push_report_filters(&mut builder, filter, "s");
        builder.push(" GROUP BY s.user_id, b.domain_or_app, b.category) ranked WHERE position <= ");
        builder.push_bind(per_user);
        builder.push(" ORDER BY user_id, time_spent DESC");

        builder
            .build_query_as::<UserAppUsageEntity>()
            .fetch_all(&self.pool)
            .await
    }

    /// Totals per local hour of day. Hours without sessions are absent.
    pub async fn hourly_totals(
        &self,
        filter: &ReportFilter,
    ) -> Result<Vec<HourlyTotalsEntity>, sqlx::Error> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT EXTRACT(HOUR FROM ");
        push_local_timestamp(&mut builder, "s.created_at", filter.timezone);
        builder.push(format!(
            ")::INT AS hour, {} FROM stealth_sessions s WHERE ",
            totals_columns("s")
        ));
        push_report_filters(&mut builder, filter, "s");
        builder.push(" GROUP BY 1 ORDER BY 1");

        builder
            .build_query_as::<HourlyTotalsEntity>()
            .fetch_all(&self.pool)
            .await
    }

    /// Totals per local day. Days without sessions are absent.
    pub async fn daily_totals(
        &self,
        filter: &ReportFilter,
    ) -> Result<Vec<DailyTotalsEntity>, sqlx::Error> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT ");
        push_local_date(&mut builder, "s.created_at", filter.timezone);
        builder.push(format!(
            " AS day, {} FROM stealth_sessions s WHERE ",
            totals_columns("s")
        ));
        push_report_filters(&mut builder, filter, "s");
        builder.push(" GROUP BY 1 ORDER BY 1");

        builder
            .build_query_as::<DailyTotalsEntity>()
            .fetch_all(&self.pool)
            .await
    }

    /// Earliest local session start per user and day.
    pub async fn first_activities(
        &self,
        filter: &ReportFilter,
    ) -> Result<Vec<FirstActivityEntity>, sqlx::Error> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT s.user_id, ");
        push_local_date(&mut builder, "s.created_at", filter.timezone);
        builder.push(" AS day, MIN(");
        push_local_timestamp(&mut builder, "s.created_at", filter.timezone);
        builder.push(")::time AS first_activity FROM stealth_sessions s WHERE ");
        push_report_filters(&mut builder, filter, "s");
        builder.push(" GROUP BY 1, 2 ORDER BY 1, 2");

        builder
            .build_query_as::<FirstActivityEntity>()
            .fetch_all(&self.pool)
            .await
    }

    /// Sessions of one user on one local day, in start order.
    pub async fn user_sessions_on(
        &self,
        user_id: i64,
        date: NaiveDate,
        tz: ReportTimezone,
    ) -> Result<Vec<TimelineSessionEntity>, sqlx::Error> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT s.id, ");
        push_local_timestamp(&mut builder, "s.created_at", tz);
        builder.push(" AS local_start, ");
        push_local_timestamp(&mut builder, "s.last_updated", tz);
        builder.push(
            " AS local_end, \
             COALESCE(s.total_time, 0) AS total_time, \
             COALESCE(s.productive_time, 0) AS productive_time, \
             COALESCE(s.wasted_time, 0) AS wasted_time, \
             COALESCE(s.neutral_time, 0) AS neutral_time, \
             COALESCE(s.idle_time, 0) AS idle_time, \
             COALESCE(s.break_time, 0) AS break_time \
             FROM stealth_sessions s WHERE s.user_id = ",
        );
        builder.push_bind(user_id);
        builder.push(" AND ");
        push_local_date(&mut builder, "s.created_at", tz);
        builder.push(" = ");
        builder.push_bind(date);
        builder.push(" ORDER BY s.created_at");

        builder
            .build_query_as::<TimelineSessionEntity>()
            .fetch_all(&self.pool)
            .await
    }
}
