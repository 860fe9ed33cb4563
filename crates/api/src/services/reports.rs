//! Report assembly.
//!
//! Runs the aggregation queries for a filter concurrently and shapes the
//! rows into response models: formatted durations, percentages, targets,
//! activity levels and late starts.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::PgPool;
use std::collections::{BTreeMap, HashMap};

use crate::config::ReportsConfig;
use domain::models::{
    ActivityDistribution, CategoryTimes, CategoryTotals, ChartsResponse, DailyPoint,
    DashboardOverview, HourlyPoint, KpiSummary, LateStartSummary, RangeTargets, ReportFilter,
    ReportTimezone, ShiftWindow, TimeValue, TimelineEntry, TopApp, UserActivity, UserBreakdown,
    UserTimeline,
};
use persistence::entities::{
    AppUsageEntity, DailyTotalsEntity, FirstActivityEntity, HourlyTotalsEntity, KpiTotalsEntity,
    TimelineSessionEntity, UserAppUsageEntity, UserShiftEntity, UserTotalsEntity,
};
use persistence::repositories::{ReportRepository, ShiftRepository};
use shared::duration::percentage;

/// Apps listed per user in the breakdown.
const BREAKDOWN_APPS_PER_USER: i64 = 5;

/// Entries in each top/bottom list of the dashboard overview.
const OVERVIEW_LIST_SIZE: usize = 5;

/// Builds report responses from the database.
#[derive(Debug, Clone)]
pub struct ReportService {
    reports: ReportRepository,
    shifts: ShiftRepository,
    late_grace_minutes: i64,
}

impl ReportService {
    pub fn new(pool: PgPool, config: &ReportsConfig) -> Self {
        Self {
            reports: ReportRepository::new(pool.clone()),
            shifts: ShiftRepository::new(pool),
            late_grace_minutes: config.late_grace_minutes,
        }
    }

    pub async fn kpis(
        &self,
        filter: &ReportFilter,
        now: DateTime<Utc>,
    ) -> Result<KpiSummary, sqlx::Error> {
        let (totals, tracked_users) = tokio::try_join!(
            self.reports.kpi_totals(filter),
            self.reports.count_tracked_users(filter),
        )?;
        Ok(build_kpis(filter, filter.today(now), tracked_users, totals))
    }

    pub async fn top_apps(
        &self,
        filter: &ReportFilter,
        category: Option<&str>,
        limit: i64,
    ) -> Result<Vec<TopApp>, sqlx::Error> {
        let (apps, total) = tokio::try_join!(
            self.reports.top_apps(filter, category, limit),
            self.reports.app_time_total(filter, category),
        )?;
        Ok(rank_apps(apps, total))
    }

    pub async fn users_activity(
        &self,
        filter: &ReportFilter,
    ) -> Result<Vec<UserActivity>, sqlx::Error> {
        let (users, first_activities, shifts) = tokio::try_join!(
            self.reports.user_totals(filter),
            self.reports.first_activities(filter),
            self.shifts.list(),
        )?;
        Ok(build_user_activity(
            users,
            first_activities,
            shifts,
            self.late_grace_minutes,
        ))
    }

    pub async fn user_breakdown(
        &self,
        filter: &ReportFilter,
    ) -> Result<Vec<UserBreakdown>, sqlx::Error> {
        let (users, apps) = tokio::try_join!(
            self.reports.user_totals(filter),
            self.reports.top_apps_per_user(filter, BREAKDOWN_APPS_PER_USER),
        )?;
        Ok(build_breakdown(users, apps))
    }

    pub async fn charts(
        &self,
        filter: &ReportFilter,
        now: DateTime<Utc>,
    ) -> Result<ChartsResponse, sqlx::Error> {
        let (hourly, daily, users) = tokio::try_join!(
            self.reports.hourly_totals(filter),
            self.reports.daily_totals(filter),
            self.reports.user_totals(filter),
        )?;

        let days = filter.range.days(filter.today(now));
        Ok(ChartsResponse {
            hourly: fill_hourly(hourly),
            daily: fill_daily(&days, daily),
            activity_levels: distribution(&users),
        })
    }

    pub async fn overview(
        &self,
        filter: &ReportFilter,
        now: DateTime<Utc>,
    ) -> Result<DashboardOverview, sqlx::Error> {
        let (kpis, top_apps, users) = tokio::try_join!(
            self.kpis(filter, now),
            self.top_apps(filter, None, OVERVIEW_LIST_SIZE as i64),
            self.users_activity(filter),
        )?;
        Ok(build_overview(kpis, top_apps, users))
    }

    pub async fn timeline(
        &self,
        user_id: i64,
        date: NaiveDate,
        tz: ReportTimezone,
    ) -> Result<UserTimeline, sqlx::Error> {
        let sessions = self.reports.user_sessions_on(user_id, date, tz).await?;
        Ok(build_timeline(user_id, date, tz, sessions))
    }
}

pub fn build_kpis(
    filter: &ReportFilter,
    today: NaiveDate,
    tracked_users: i64,
    entity: KpiTotalsEntity,
) -> KpiSummary {
    let totals = CategoryTotals::from(entity.totals);
    let tracked = totals.tracked();
    let active_users = entity.active_users;

    let average = if active_users > 0 {
        tracked / active_users
    } else {
        0
    };

    // Users with sessions but no longer active still count towards targets.
    let targets = RangeTargets::for_range(&filter.range, today).scaled(tracked_users.max(active_users));

    KpiSummary {
        range: filter.range.to_string(),
        timezone: filter.timezone.to_string(),
        total_users: tracked_users,
        active_users,
        times: CategoryTimes::from(&totals),
        average_time_per_user: TimeValue::from_seconds(average),
        productivity_percentage: totals.productivity_percentage(),
        idle_percentage: percentage(totals.idle, tracked),
        tracked_target_percentage: percentage(tracked, targets.tracked),
        productive_target_percentage: percentage(totals.productive, targets.productive),
        activity_level: totals.activity_level(),
    }
}

pub fn rank_apps(apps: Vec<AppUsageEntity>, total: i64) -> Vec<TopApp> {
    apps.into_iter()
        .enumerate()
        .map(|(index, app)| TopApp {
            rank: index + 1,
            share_percentage: percentage(app.time_spent, total),
            time: TimeValue::from_seconds(app.time_spent),
            domain_or_app: app.domain_or_app,
            category: app.category,
        })
        .collect()
}

pub fn build_user_activity(
    users: Vec<UserTotalsEntity>,
    first_activities: Vec<FirstActivityEntity>,
    shifts: Vec<UserShiftEntity>,
    grace_minutes: i64,
) -> Vec<UserActivity> {
    let shifts: HashMap<i64, ShiftWindow> = shifts
        .into_iter()
        .map(|s| (s.user_id, ShiftWindow::new(s.shift_start, s.shift_end)))
        .collect();

    let mut firsts: HashMap<i64, BTreeMap<NaiveDate, NaiveTime>> = HashMap::new();
    for row in first_activities {
        firsts
            .entry(row.user_id)
            .or_default()
            .insert(row.day, row.first_activity);
    }

    users
        .into_iter()
        .map(|user| {
            let totals = CategoryTotals::from(user.totals);
            let shift = shifts.get(&user.user_id);
            let days = firsts.get(&user.user_id);

            let late_start = match (shift, days) {
                (Some(shift), Some(days)) => LateStartSummary::from_first_activities(
                    days.values().copied(),
                    shift,
                    grace_minutes,
                ),
                _ => LateStartSummary::default(),
            };

            UserActivity {
                user_id: user.user_id,
                name: user.name,
                email: user.email,
                session_count: user.session_count,
                times: CategoryTimes::from(&totals),
                productivity_percentage: totals.productivity_percentage(),
                activity_level: totals.activity_level(),
                shift: shift.map(ToString::to_string),
                first_activity: days.and_then(|d| d.values().next_back().copied()),
                late_start,
            }
        })
        .collect()
}

pub fn build_breakdown(
    users: Vec<UserTotalsEntity>,
    apps: Vec<UserAppUsageEntity>,
) -> Vec<UserBreakdown> {
    let mut apps_by_user: HashMap<i64, Vec<AppUsageEntity>> = HashMap::new();
    for app in apps {
        apps_by_user
            .entry(app.user_id)
            .or_default()
            .push(AppUsageEntity {
                domain_or_app: app.domain_or_app,
                category: app.category,
                time_spent: app.time_spent,
            });
    }

    users
        .into_iter()
        .map(|user| {
            let totals = CategoryTotals::from(user.totals);
            let tracked = totals.tracked();
            let apps = apps_by_user.remove(&user.user_id).unwrap_or_default();

            UserBreakdown {
                user_id: user.user_id,
                name: user.name,
                total_time: TimeValue::from_seconds(tracked),
                productive_percentage: percentage(totals.productive, tracked),
                wasted_percentage: percentage(totals.wasted, tracked),
                neutral_percentage: percentage(totals.neutral, tracked),
                idle_percentage: percentage(totals.idle, tracked),
                break_percentage: percentage(totals.break_time, tracked),
                top_apps: rank_apps(apps, tracked),
            }
        })
        .collect()
}

/// One point per hour of the day, zeroes where nothing was tracked.
pub fn fill_hourly(rows: Vec<HourlyTotalsEntity>) -> Vec<HourlyPoint> {
    let mut by_hour: HashMap<i32, CategoryTotals> = rows
        .into_iter()
        .map(|row| (row.hour, CategoryTotals::from(row.totals)))
        .collect();

    (0..24u32)
        .map(|hour| HourlyPoint {
            hour,
            label: format!("{:02}:00", hour),
            totals: by_hour.remove(&(hour as i32)).unwrap_or_default(),
        })
        .collect()
}

/// One point per day of the range, zeroes where nothing was tracked.
pub fn fill_daily(days: &[NaiveDate], rows: Vec<DailyTotalsEntity>) -> Vec<DailyPoint> {
    let mut by_day: BTreeMap<NaiveDate, CategoryTotals> = days
        .iter()
        .map(|day| (*day, CategoryTotals::default()))
        .collect();
    for row in rows {
        by_day.insert(row.day, CategoryTotals::from(row.totals));
    }

    by_day
        .into_iter()
        .map(|(date, totals)| DailyPoint {
            date,
            productivity_percentage: totals.productivity_percentage(),
            totals,
        })
        .collect()
}

pub fn distribution(users: &[UserTotalsEntity]) -> ActivityDistribution {
    users
        .iter()
        .map(|user| CategoryTotals::from(user.totals).activity_level())
        .collect()
}

/// Splits users into the most and least productive, without overlap.
pub fn build_overview(
    kpis: KpiSummary,
    top_apps: Vec<TopApp>,
    mut users: Vec<UserActivity>,
) -> DashboardOverview {
    let activity_levels = users.iter().map(|u| u.activity_level).collect();

    users.sort_by(|a, b| {
        b.productivity_percentage
            .total_cmp(&a.productivity_percentage)
            .then_with(|| a.name.cmp(&b.name))
    });

    let split = users.len().min(OVERVIEW_LIST_SIZE);
    let mut rest = users.split_off(split);
    rest.reverse();
    rest.truncate(OVERVIEW_LIST_SIZE);

    DashboardOverview {
        kpis,
        top_apps,
        top_users: users,
        bottom_users: rest,
        activity_levels,
    }
}

pub fn build_timeline(
    user_id: i64,
    date: NaiveDate,
    tz: ReportTimezone,
    sessions: Vec<TimelineSessionEntity>,
) -> UserTimeline {
    let mut day_totals = CategoryTotals::default();
    let entries = sessions
        .into_iter()
        .map(|session| {
            let totals = CategoryTotals::from(session.totals);
            day_totals += totals;
            TimelineEntry {
                session_id: session.id,
                start: session.local_start,
                end: session.local_end,
                dominant_category: totals.dominant_category().to_string(),
                totals,
            }
        })
        .collect();

    UserTimeline {
        user_id,
        date,
        timezone: tz.to_string(),
        entries,
        total_time: TimeValue::from_seconds(day_totals.tracked()),
        totals: day_totals,
    }
}
