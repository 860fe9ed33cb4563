//! Derived productivity metrics.
//!
//! Activity levels, per-range targets and late-start detection are computed
//! here once and shared by every report endpoint.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::filter::{DateRange, ShiftWindow};
use shared::duration::{percentage, round_to};

/// Summed time per category, in seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotals {
    pub total: i64,
    pub productive: i64,
    pub wasted: i64,
    pub neutral: i64,
    pub idle: i64,
    #[serde(rename = "break")]
    pub break_time: i64,
}

impl CategoryTotals {
    /// Time spent working on something, whatever its category.
    pub fn active(&self) -> i64 {
        self.productive + self.wasted + self.neutral
    }

    /// Tracked time. Falls back to the sum of the categories when the
    /// recorded total is missing.
    pub fn tracked(&self) -> i64 {
        if self.total > 0 {
            self.total
        } else {
            self.active() + self.idle + self.break_time
        }
    }

    /// Active over tracked time, in `0.0..=1.0` for consistent rows.
    pub fn activity_ratio(&self) -> f64 {
        let tracked = self.tracked();
        if tracked <= 0 {
            return 0.0;
        }
        self.active() as f64 / tracked as f64
    }

    pub fn productivity_percentage(&self) -> f64 {
        percentage(self.productive, self.tracked())
    }

    pub fn activity_level(&self) -> ActivityLevel {
        ActivityLevel::from_ratio(self.activity_ratio())
    }

    /// Name of the largest category; ties resolve in declaration order.
    pub fn dominant_category(&self) -> &'static str {
        let candidates = [
            ("productive", self.productive),
            ("wasted", self.wasted),
            ("neutral", self.neutral),
            ("idle", self.idle),
            ("break", self.break_time),
        ];
        candidates
            .iter()
            .fold(("none", 0), |best, (name, value)| {
                if *value > best.1 {
                    (*name, *value)
                } else {
                    best
                }
            })
            .0
    }
}

impl std::ops::AddAssign for CategoryTotals {
    fn add_assign(&mut self, rhs: Self) {
        self.total += rhs.total;
        self.productive += rhs.productive;
        self.wasted += rhs.wasted;
        self.neutral += rhs.neutral;
        self.idle += rhs.idle;
        self.break_time += rhs.break_time;
    }
}

/// Qualitative activity tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivityLevel {
    #[serde(rename = "Very High")]
    VeryHigh,
    High,
    Low,
    #[serde(rename = "Very Low")]
    VeryLow,
}

impl ActivityLevel {
    pub const VERY_HIGH_THRESHOLD: f64 = 0.75;
    pub const HIGH_THRESHOLD: f64 = 0.50;
    pub const LOW_THRESHOLD: f64 = 0.25;

    /// Buckets an active/tracked ratio.
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio >= Self::VERY_HIGH_THRESHOLD {
            ActivityLevel::VeryHigh
        } else if ratio >= Self::HIGH_THRESHOLD {
            ActivityLevel::High
        } else if ratio >= Self::LOW_THRESHOLD {
            ActivityLevel::Low
        } else {
            ActivityLevel::VeryLow
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::VeryHigh => "Very High",
            ActivityLevel::High => "High",
            ActivityLevel::Low => "Low",
            ActivityLevel::VeryLow => "Very Low",
        }
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Count of users per activity level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityDistribution {
    pub very_high: i64,
    pub high: i64,
    pub low: i64,
    pub very_low: i64,
}

impl ActivityDistribution {
    pub fn record(&mut self, level: ActivityLevel) {
        match level {
            ActivityLevel::VeryHigh => self.very_high += 1,
            ActivityLevel::High => self.high += 1,
            ActivityLevel::Low => self.low += 1,
            ActivityLevel::VeryLow => self.very_low += 1,
        }
    }

    pub fn total(&self) -> i64 {
        self.very_high + self.high + self.low + self.very_low
    }
}

impl FromIterator<ActivityLevel> for ActivityDistribution {
    fn from_iter<I: IntoIterator<Item = ActivityLevel>>(iter: I) -> Self {
        let mut distribution = ActivityDistribution::default();
        for level in iter {
            distribution.record(level);
        }
        distribution
    }
}

const HOUR: i64 = 3600;

/// Per-user targets for a reporting range, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeTargets {
    pub tracked: i64,
    pub productive: i64,
}

impl RangeTargets {
    pub const DAILY: RangeTargets = RangeTargets {
        tracked: 8 * HOUR,
        productive: 6 * HOUR,
    };
    pub const WEEKLY: RangeTargets = RangeTargets {
        tracked: 40 * HOUR,
        productive: 30 * HOUR,
    };
    pub const MONTHLY: RangeTargets = RangeTargets {
        tracked: 160 * HOUR,
        productive: 120 * HOUR,
    };

    /// Targets for one user over `range`. Custom ranges scale the daily
    /// target by their length in days.
    pub fn for_range(range: &DateRange, today: NaiveDate) -> Self {
        match range {
            DateRange::Daily | DateRange::Yesterday => Self::DAILY,
            DateRange::Weekly => Self::WEEKLY,
            DateRange::Monthly => Self::MONTHLY,
            DateRange::Custom { .. } => {
                let days = range.day_count(today);
                RangeTargets {
                    tracked: Self::DAILY.tracked * days,
                    productive: Self::DAILY.productive * days,
                }
            }
        }
    }

    /// Targets for a group of `users`.
    pub fn scaled(&self, users: i64) -> Self {
        let users = users.max(0);
        RangeTargets {
            tracked: self.tracked * users,
            productive: self.productive * users,
        }
    }
}

/// Minutes a user started after their shift, beyond the grace period.
///
/// Returns `None` when on time. For overnight shifts, activity in the
/// post-midnight part of the shift counts as a continuation, not a start.
pub fn late_minutes(first_activity: NaiveTime, shift: &ShiftWindow, grace_minutes: i64) -> Option<i64> {
    if shift.is_overnight() && first_activity < shift.start {
        return None;
    }
    let late = (first_activity - shift.start).num_minutes();
    if late > grace_minutes {
        Some(late)
    } else {
        None
    }
}

/// Late-start statistics over several days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LateStartSummary {
    pub late_days: i64,
    pub average_late_minutes: f64,
}

impl LateStartSummary {
    /// Summarizes the first activity of each day against a shift.
    pub fn from_first_activities<I>(first_activities: I, shift: &ShiftWindow, grace_minutes: i64) -> Self
    where
        I: IntoIterator<Item = NaiveTime>,
    {
        let lateness: Vec<i64> = first_activities
            .into_iter()
            .filter_map(|first| late_minutes(first, shift, grace_minutes))
            .collect();

        if lateness.is_empty() {
            return Self::default();
        }

        let sum: i64 = lateness.iter().sum();
        LateStartSummary {
            late_days: lateness.len() as i64,
            average_late_minutes: round_to(sum as f64 / lateness.len() as f64, 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn totals(productive: i64, wasted: i64, neutral: i64, idle: i64, break_time: i64) -> CategoryTotals {
        CategoryTotals {
            total: productive + wasted + neutral + idle + break_time,
            productive,
            wasted,
            neutral,
            idle,
            break_time,
        }
    }

    #[test]
    fn test_activity_level_thresholds() {
        assert_eq!(ActivityLevel::from_ratio(0.8), ActivityLevel::VeryHigh);
        assert_eq!(ActivityLevel::from_ratio(0.75), ActivityLevel::VeryHigh);
        assert_eq!(ActivityLevel::from_ratio(0.74), ActivityLevel::High);
        assert_eq!(ActivityLevel::from_ratio(0.5), ActivityLevel::High);
        assert_eq!(ActivityLevel::from_ratio(0.25), ActivityLevel::Low);
        assert_eq!(ActivityLevel::from_ratio(0.1), ActivityLevel::VeryLow);
        assert_eq!(ActivityLevel::from_ratio(0.0), ActivityLevel::VeryLow);
    }

    #[test]
    fn test_activity_level_serialization() {
        assert_eq!(
            serde_json::to_string(&ActivityLevel::VeryHigh).unwrap(),
            "\"Very High\""
        );
        assert_eq!(
            serde_json::to_string(&ActivityLevel::Low).unwrap(),
            "\"Low\""
        );
        assert_eq!(ActivityLevel::VeryLow.to_string(), "Very Low");
    }

    #[test]
    fn test_category_totals_ratio() {
        let t = totals(3000, 1000, 1000, 2000, 1000);
        assert_eq!(t.active(), 5000);
        assert_eq!(t.tracked(), 8000);
        assert_eq!(t.activity_ratio(), 0.625);
        assert_eq!(t.activity_level(), ActivityLevel::High);
        assert_eq!(t.productivity_percentage(), 37.5);
        assert_eq!(t.dominant_category(), "productive");
    }

    #[test]
    fn test_category_totals_empty() {
        let t = CategoryTotals::default();
        assert_eq!(t.activity_ratio(), 0.0);
        assert_eq!(t.activity_level(), ActivityLevel::VeryLow);
        assert_eq!(t.dominant_category(), "none");
    }

    #[test]
    fn test_category_totals_missing_total() {
        let t = CategoryTotals {
            total: 0,
            productive: 600,
            idle: 400,
            ..Default::default()
        };
        assert_eq!(t.tracked(), 1000);
    }

    #[test]
    fn test_category_totals_add_assign() {
        let mut a = totals(10, 0, 0, 5, 0);
        a += totals(20, 1, 2, 0, 3);
        assert_eq!(a.productive, 30);
        assert_eq!(a.total, 41);
        assert_eq!(a.break_time, 3);
    }

    #[test]
    fn test_category_totals_break_field_name() {
        let json = serde_json::to_value(totals(1, 0, 0, 0, 2)).unwrap();
        assert_eq!(json["break"], 2);
        assert!(json.get("break_time").is_none());
    }

    #[test]
    fn test_distribution_from_levels() {
        let dist: ActivityDistribution = [
            ActivityLevel::VeryHigh,
            ActivityLevel::VeryHigh,
            ActivityLevel::Low,
        ]
        .into_iter()
        .collect();
        assert_eq!(dist.very_high, 2);
        assert_eq!(dist.low, 1);
        assert_eq!(dist.total(), 3);
    }

    #[test]
    fn test_range_targets() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 14).unwrap();
        assert_eq!(RangeTargets::for_range(&DateRange::Daily, today).tracked, 8 * 3600);
        assert_eq!(RangeTargets::for_range(&DateRange::Yesterday, today), RangeTargets::DAILY);
        assert_eq!(RangeTargets::for_range(&DateRange::Weekly, today).productive, 30 * 3600);
        assert_eq!(RangeTargets::for_range(&DateRange::Monthly, today).tracked, 160 * 3600);

        let custom = DateRange::Custom {
            start: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 3, 3).unwrap(),
        };
        let targets = RangeTargets::for_range(&custom, today);
        assert_eq!(targets.tracked, 24 * 3600);
        assert_eq!(targets.productive, 18 * 3600);
    }

    #[test]
    fn test_range_targets_scaled() {
        let scaled = RangeTargets::DAILY.scaled(3);
        assert_eq!(scaled.tracked, 24 * 3600);
        assert_eq!(RangeTargets::DAILY.scaled(-1).tracked, 0);
    }

    #[test]
    fn test_late_minutes_day_shift() {
        let shift = ShiftWindow::new(time(9, 0), time(17, 0));
        assert_eq!(late_minutes(time(8, 50), &shift, 0), None);
        assert_eq!(late_minutes(time(9, 0), &shift, 0), None);
        assert_eq!(late_minutes(time(9, 20), &shift, 0), Some(20));
        assert_eq!(late_minutes(time(9, 4), &shift, 5), None);
        assert_eq!(late_minutes(time(9, 6), &shift, 5), Some(6));
    }

    #[test]
    fn test_late_minutes_overnight_shift() {
        let shift = ShiftWindow::new(time(22, 0), time(6, 0));
        assert_eq!(late_minutes(time(22, 30), &shift, 0), Some(30));
        assert_eq!(late_minutes(time(1, 0), &shift, 0), None);
        assert_eq!(late_minutes(time(21, 45), &shift, 0), None);
    }

    #[test]
    fn test_late_start_summary() {
        let shift = ShiftWindow::new(time(9, 0), time(17, 0));
        let summary = LateStartSummary::from_first_activities(
            [time(9, 10), time(8, 55), time(9, 25)],
            &shift,
            0,
        );
        assert_eq!(summary.late_days, 2);
        assert_eq!(summary.average_late_minutes, 17.5);

        let none = LateStartSummary::from_first_activities([time(8, 0)], &shift, 0);
        assert_eq!(none, LateStartSummary::default());
    }
}
