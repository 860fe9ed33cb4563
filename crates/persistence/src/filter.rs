//! Translation of report filters into SQL predicates.
//!
//! All values are bound as parameters; only column names and fixed SQL
//! keywords are pushed as text.
//!
//! When the report timezone is UTC, local dates are computed with
//! `DATE(column)` against `CURRENT_DATE`, which relies on the session
//! timezone being UTC (the sqlx default). Any other timezone is bound and
//! applied with `AT TIME ZONE`.

use sqlx::{Postgres, QueryBuilder};

use domain::models::{DateRange, ReportFilter, ReportTimezone};

/// Pushes the local calendar date of a `TIMESTAMPTZ` column.
pub fn push_local_date(builder: &mut QueryBuilder<'_, Postgres>, column: &str, tz: ReportTimezone) {
    if tz.is_utc() {
        builder.push(format!("DATE({})", column));
    } else {
        builder.push(format!("({} AT TIME ZONE ", column));
        builder.push_bind(tz.name());
        builder.push(")::date");
    }
}

/// Pushes the local wall-clock timestamp of a `TIMESTAMPTZ` column.
pub fn push_local_timestamp(
    builder: &mut QueryBuilder<'_, Postgres>,
    column: &str,
    tz: ReportTimezone,
) {
    if tz.is_utc() {
        builder.push(format!("({} AT TIME ZONE 'UTC')", column));
    } else {
        builder.push(format!("({} AT TIME ZONE ", column));
        builder.push_bind(tz.name());
        builder.push(")");
    }
}

/// Pushes the current local date.
pub fn push_today(builder: &mut QueryBuilder<'_, Postgres>, tz: ReportTimezone) {
    if tz.is_utc() {
        builder.push("CURRENT_DATE");
    } else {
        builder.push("(NOW() AT TIME ZONE ");
        builder.push_bind(tz.name());
        builder.push(")::date");
    }
}

/// Pushes the date-range predicate for a `TIMESTAMPTZ` column.
pub fn push_date_predicate(
    builder: &mut QueryBuilder<'_, Postgres>,
    range: &DateRange,
    column: &str,
    tz: ReportTimezone,
) {
    push_local_date(builder, column, tz);
    match range {
        DateRange::Daily => {
            builder.push(" = ");
            push_today(builder, tz);
        }
        DateRange::Yesterday => {
            builder.push(" = ");
            push_today(builder, tz);
            builder.push(" - 1");
        }
        DateRange::Weekly => {
            builder.push(" >= DATE_TRUNC('week', ");
            push_today(builder, tz);
            builder.push(")");
        }
        DateRange::Monthly => {
            builder.push(" >= DATE_TRUNC('month', ");
            push_today(builder, tz);
            builder.push(")");
        }
        DateRange::Custom { start, end } => {
            builder.push(" BETWEEN ");
            builder.push_bind(*start);
            builder.push(" AND ");
            builder.push_bind(*end);
        }
    }
}

/// Pushes the predicates of a report filter against the sessions table
/// aliased as `alias`, joined with `AND`, without a leading keyword.
pub fn push_report_filters(
    builder: &mut QueryBuilder<'_, Postgres>,
    filter: &ReportFilter,
    alias: &str,
) {
    push_date_predicate(
        builder,
        &filter.range,
        &format!("{}.created_at", alias),
        filter.timezone,
    );

    if let Some(window) = filter.shift.window() {
        builder.push(format!(
            " AND {}.user_id IN (SELECT user_id FROM user_shifts WHERE shift_start = ",
            alias
        ));
        builder.push_bind(window.start);
        builder.push(" AND shift_end = ");
        builder.push_bind(window.end);
        builder.push(")");
    }

    if let Some(user_id) = filter.user_id {
        builder.push(format!(" AND {}.user_id = ", alias));
        builder.push_bind(user_id);
    }
}

/// Summed session columns, aliased to match `CategoryTotalsEntity`.
pub fn totals_columns(alias: &str) -> String {
    [
        "total_time",
        "productive_time",
        "wasted_time",
        "neutral_time",
        "idle_time",
        "break_time",
    ]
    .iter()
    .map(|column| format!("COALESCE(SUM({alias}.{column}), 0)::BIGINT AS {column}"))
    .collect::<Vec<_>>()
    .join(", ")
}
