//! Report filter models.
//!
//! Every summary endpoint accepts the same four query parameters:
//! `range`, `shift`, `user` and `timezone`. They are parsed once into a
//! [`ReportFilter`] which the persistence layer turns into SQL predicates.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use crate::errors::FilterError;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Longest custom range accepted, in days.
pub const MAX_CUSTOM_RANGE_DAYS: i64 = 366;

/// Reporting period selected by the `range` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateRange {
    #[default]
    Daily,
    Yesterday,
    Weekly,
    Monthly,
    /// Inclusive custom period.
    Custom { start: NaiveDate, end: NaiveDate },
}

impl DateRange {
    /// Parses an optional range token; a missing or empty token means `Daily`.
    pub fn parse(token: Option<&str>) -> Result<Self, FilterError> {
        match token.map(str::trim) {
            None | Some("") => Ok(DateRange::Daily),
            Some(s) => s.parse(),
        }
    }

    /// First and last day (inclusive) covered by the range.
    ///
    /// Weeks start on Monday, matching `DATE_TRUNC('week', ...)` in Postgres.
    pub fn bounds(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        match *self {
            DateRange::Daily => (today, today),
            DateRange::Yesterday => {
                let yesterday = today - Duration::days(1);
                (yesterday, yesterday)
            }
            DateRange::Weekly => {
                let offset = today.weekday().num_days_from_monday() as i64;
                (today - Duration::days(offset), today)
            }
            DateRange::Monthly => (today.with_day(1).unwrap_or(today), today),
            DateRange::Custom { start, end } => (start, end),
        }
    }

    /// Number of calendar days in the range.
    pub fn day_count(&self, today: NaiveDate) -> i64 {
        let (start, end) = self.bounds(today);
        (end - start).num_days() + 1
    }

    /// Every day of the range in ascending order.
    pub fn days(&self, today: NaiveDate) -> Vec<NaiveDate> {
        let (start, end) = self.bounds(today);
        start
            .iter_days()
            .take_while(|day| *day <= end)
            .collect()
    }
}

impl FromStr for DateRange {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" | "today" => Ok(DateRange::Daily),
            "yesterday" => Ok(DateRange::Yesterday),
            "weekly" => Ok(DateRange::Weekly),
            "monthly" => Ok(DateRange::Monthly),
            lower if lower.starts_with("custom:") => {
                let mut parts = s.splitn(3, ':').skip(1);
                let (Some(start), Some(end)) = (parts.next(), parts.next()) else {
                    return Err(FilterError::InvalidRange(s.to_string()));
                };
                let start = parse_iso_date(start)
                    .ok_or_else(|| FilterError::InvalidRange(s.to_string()))?;
                let end = parse_iso_date(end)
                    .ok_or_else(|| FilterError::InvalidRange(s.to_string()))?;
                if start > end {
                    return Err(FilterError::InvertedRange {
                        start: start.to_string(),
                        end: end.to_string(),
                    });
                }
                let days = (end - start).num_days() + 1;
                if days > MAX_CUSTOM_RANGE_DAYS {
                    return Err(FilterError::RangeTooLong {
                        days,
                        max: MAX_CUSTOM_RANGE_DAYS,
                    });
                }
                Ok(DateRange::Custom { start, end })
            }
            _ => Err(FilterError::InvalidRange(s.to_string())),
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateRange::Daily => write!(f, "daily"),
            DateRange::Yesterday => write!(f, "yesterday"),
            DateRange::Weekly => write!(f, "weekly"),
            DateRange::Monthly => write!(f, "monthly"),
            DateRange::Custom { start, end } => write!(
                f,
                "custom:{}:{}",
                start.format(DATE_FORMAT),
                end.format(DATE_FORMAT)
            ),
        }
    }
}

/// A recurring time-of-day window assigned to a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShiftWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl ShiftWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// A shift whose end is before its start crosses midnight.
    pub fn is_overnight(&self) -> bool {
        self.end < self.start
    }

    /// Whether a time of day falls inside the shift.
    pub fn contains(&self, time: NaiveTime) -> bool {
        if self.is_overnight() {
            time >= self.start || time < self.end
        } else {
            time >= self.start && time < self.end
        }
    }
}

impl FromStr for ShiftWindow {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s
            .split_once('-')
            .ok_or_else(|| FilterError::InvalidShift(s.to_string()))?;
        let start = parse_time_of_day(start).ok_or_else(|| FilterError::InvalidShift(s.to_string()))?;
        let end = parse_time_of_day(end).ok_or_else(|| FilterError::InvalidShift(s.to_string()))?;
        Ok(ShiftWindow { start, end })
    }
}

impl fmt::Display for ShiftWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            self.start.format("%H:%M:%S"),
            self.end.format("%H:%M:%S")
        )
    }
}

/// Accepts `HH:MM:SS` and `HH:MM`.
pub fn parse_time_of_day(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .ok()
}

/// Shift selector: every user, or only users assigned to one window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShiftFilter {
    #[default]
    All,
    Window(ShiftWindow),
}

impl ShiftFilter {
    pub fn parse(token: Option<&str>) -> Result<Self, FilterError> {
        match token.map(str::trim) {
            None | Some("") => Ok(ShiftFilter::All),
            Some(s) if s.eq_ignore_ascii_case("all") => Ok(ShiftFilter::All),
            Some(s) => s.parse().map(ShiftFilter::Window),
        }
    }

    pub fn window(&self) -> Option<&ShiftWindow> {
        match self {
            ShiftFilter::All => None,
            ShiftFilter::Window(window) => Some(window),
        }
    }
}

impl fmt::Display for ShiftFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShiftFilter::All => write!(f, "All"),
            ShiftFilter::Window(window) => window.fmt(f),
        }
    }
}

/// IANA timezone used to decide which local day a session belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportTimezone(Tz);

impl ReportTimezone {
    pub fn utc() -> Self {
        ReportTimezone(Tz::UTC)
    }

    pub fn tz(&self) -> Tz {
        self.0
    }

    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    pub fn is_utc(&self) -> bool {
        matches!(self.0, Tz::UTC | Tz::Etc__UTC)
    }

    /// The current local date in this timezone.
    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.0).date_naive()
    }
}

impl Default for ReportTimezone {
    fn default() -> Self {
        Self::utc()
    }
}

impl FromStr for ReportTimezone {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<Tz>()
            .map(ReportTimezone)
            .map_err(|_| FilterError::InvalidTimezone(s.to_string()))
    }
}

impl fmt::Display for ReportTimezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raw query parameters shared by the summary endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportQuery {
    pub range: Option<String>,
    pub shift: Option<String>,
    pub user: Option<String>,
    pub timezone: Option<String>,
}

/// Parsed report filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReportFilter {
    pub range: DateRange,
    pub shift: ShiftFilter,
    pub user_id: Option<i64>,
    pub timezone: ReportTimezone,
}

impl ReportFilter {
    /// Builds a filter from query parameters, falling back to `default_tz`
    /// when no timezone is supplied.
    pub fn from_query(
        query: &ReportQuery,
        default_tz: ReportTimezone,
    ) -> Result<Self, FilterError> {
        let timezone = match query.timezone.as_deref().map(str::trim) {
            None | Some("") => default_tz,
            Some(name) => name.parse()?,
        };

        Ok(ReportFilter {
            range: DateRange::parse(query.range.as_deref())?,
            shift: ShiftFilter::parse(query.shift.as_deref())?,
            user_id: parse_user_id(query.user.as_deref())?,
            timezone,
        })
    }

    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        self.timezone.today(now)
    }

    /// Same filter restricted to one user.
    pub fn for_user(&self, user_id: i64) -> Self {
        ReportFilter {
            user_id: Some(user_id),
            ..*self
        }
    }
}

/// Parses the `user` parameter; empty and `all` mean no user filter.
pub fn parse_user_id(token: Option<&str>) -> Result<Option<i64>, FilterError> {
    match token.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) if s.eq_ignore_ascii_case("all") => Ok(None),
        Some(s) => s
            .parse::<i64>()
            .ok()
            .filter(|id| *id > 0)
            .map(Some)
            .ok_or_else(|| FilterError::InvalidUser(s.to_string())),
    }
}

/// Parses a `YYYY-MM-DD` date parameter.
pub fn parse_date(token: &str) -> Result<NaiveDate, FilterError> {
    parse_iso_date(token).ok_or_else(|| FilterError::InvalidDate(token.to_string()))
}

/// Strict `YYYY-MM-DD`: `%Y` alone would also take signed and five-digit years.
fn parse_iso_date(token: &str) -> Option<NaiveDate> {
    let token = token.trim();
    let shaped = token.len() == 10
        && token.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shaped {
        return None;
    }
    NaiveDate::parse_from_str(token, DATE_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_parse_range_tokens() {
        assert_eq!(DateRange::parse(None).unwrap(), DateRange::Daily);
        assert_eq!(DateRange::parse(Some("")).unwrap(), DateRange::Daily);
        assert_eq!(DateRange::parse(Some("daily")).unwrap(), DateRange::Daily);
        assert_eq!(
            DateRange::parse(Some("yesterday")).unwrap(),
            DateRange::Yesterday
        );
        assert_eq!(DateRange::parse(Some("WEEKLY")).unwrap(), DateRange::Weekly);
        assert_eq!(DateRange::parse(Some("monthly")).unwrap(), DateRange::Monthly);
    }

    #[test]
    fn test_parse_custom_range() {
        let range = DateRange::parse(Some("custom:2024-03-01:2024-03-15")).unwrap();
        assert_eq!(
            range,
            DateRange::Custom {
                start: date(2024, 3, 1),
                end: date(2024, 3, 15)
            }
        );
        assert_eq!(range.to_string(), "custom:2024-03-01:2024-03-15");
    }

    #[test]
    fn test_parse_custom_range_rejects_bad_input() {
        assert!(matches!(
            DateRange::parse(Some("custom:2024-03-01")),
            Err(FilterError::InvalidRange(_))
        ));
        assert!(matches!(
            DateRange::parse(Some("custom:2024-13-01:2024-03-15")),
            Err(FilterError::InvalidRange(_))
        ));
        assert!(matches!(
            DateRange::parse(Some("custom:2024-03-15:2024-03-01")),
            Err(FilterError::InvertedRange { .. })
        ));
        assert!(matches!(
            DateRange::parse(Some("fortnightly")),
            Err(FilterError::InvalidRange(_))
        ));
    }

    #[test]
    fn test_parse_custom_range_rejects_oversized_years() {
        for token in [
            "custom:0001-01-01:+262000-12-31",
            "custom:2024-01-01:12024-01-01",
            "custom:24-01-01:2024-01-31",
            "custom:2024-1-01:2024-01-31",
        ] {
            assert!(
                matches!(DateRange::parse(Some(token)), Err(FilterError::InvalidRange(_))),
                "{} should be rejected",
                token
            );
        }
    }

    #[test]
    fn test_parse_custom_range_caps_length() {
        // 2024 is a leap year, so a full calendar year is the longest accepted span
        let year = DateRange::parse(Some("custom:2024-01-01:2024-12-31")).unwrap();
        assert_eq!(year.day_count(date(2024, 12, 31)), MAX_CUSTOM_RANGE_DAYS);

        assert_eq!(
            DateRange::parse(Some("custom:2024-01-01:2025-01-01")),
            Err(FilterError::RangeTooLong {
                days: 367,
                max: MAX_CUSTOM_RANGE_DAYS
            })
        );
        assert!(matches!(
            DateRange::parse(Some("custom:0001-01-01:9999-12-31")),
            Err(FilterError::RangeTooLong { .. })
        ));
    }

    #[test]
    fn test_parse_date_is_strict() {
        assert_eq!(parse_date("2024-03-11").unwrap(), date(2024, 3, 11));
        assert!(parse_date("+2024-03-11").is_err());
        assert!(parse_date("20240-03-11").is_err());
        assert!(parse_date("2024-02-30").is_err());
    }

    #[test]
    fn test_range_bounds() {
        // 2024-03-14 is a Thursday
        let today = date(2024, 3, 14);
        assert_eq!(DateRange::Daily.bounds(today), (today, today));
        assert_eq!(
            DateRange::Yesterday.bounds(today),
            (date(2024, 3, 13), date(2024, 3, 13))
        );
        assert_eq!(DateRange::Weekly.bounds(today), (date(2024, 3, 11), today));
        assert_eq!(DateRange::Monthly.bounds(today), (date(2024, 3, 1), today));
    }

    #[test]
    fn test_range_day_count_and_days() {
        let today = date(2024, 3, 14);
        assert_eq!(DateRange::Daily.day_count(today), 1);
        assert_eq!(DateRange::Weekly.day_count(today), 4);
        let custom = DateRange::Custom {
            start: date(2024, 2, 27),
            end: date(2024, 3, 2),
        };
        // 2024 is a leap year
        assert_eq!(custom.day_count(today), 5);
        let days = custom.days(today);
        assert_eq!(days.first(), Some(&date(2024, 2, 27)));
        assert_eq!(days.get(2), Some(&date(2024, 2, 29)));
        assert_eq!(days.last(), Some(&date(2024, 3, 2)));
    }

    #[test]
    fn test_parse_shift() {
        assert_eq!(ShiftFilter::parse(None).unwrap(), ShiftFilter::All);
        assert_eq!(ShiftFilter::parse(Some("All")).unwrap(), ShiftFilter::All);
        assert_eq!(ShiftFilter::parse(Some("all")).unwrap(), ShiftFilter::All);

        let shift = ShiftFilter::parse(Some("09:00:00-17:30:00")).unwrap();
        assert_eq!(
            shift,
            ShiftFilter::Window(ShiftWindow::new(time(9, 0), time(17, 30)))
        );
        assert_eq!(shift.to_string(), "09:00:00-17:30:00");

        let short = ShiftFilter::parse(Some("22:00-06:00")).unwrap();
        assert_eq!(short.to_string(), "22:00:00-06:00:00");
    }

    #[test]
    fn test_parse_shift_rejects_garbage() {
        assert!(ShiftFilter::parse(Some("morning")).is_err());
        assert!(ShiftFilter::parse(Some("25:00:00-26:00:00")).is_err());
        assert!(ShiftFilter::parse(Some("09:00:00")).is_err());
    }

    #[test]
    fn test_shift_contains() {
        let day = ShiftWindow::new(time(9, 0), time(17, 0));
        assert!(!day.is_overnight());
        assert!(day.contains(time(9, 0)));
        assert!(day.contains(time(16, 59)));
        assert!(!day.contains(time(17, 0)));

        let night = ShiftWindow::new(time(22, 0), time(6, 0));
        assert!(night.is_overnight());
        assert!(night.contains(time(23, 0)));
        assert!(night.contains(time(2, 0)));
        assert!(!night.contains(time(12, 0)));
    }

    #[test]
    fn test_timezone_parsing_and_today() {
        let tz: ReportTimezone = "Asia/Karachi".parse().unwrap();
        assert_eq!(tz.name(), "Asia/Karachi");
        assert!(!tz.is_utc());

        // 21:00 UTC is already the next day in Karachi (UTC+5)
        let now = Utc.with_ymd_and_hms(2024, 3, 14, 21, 0, 0).unwrap();
        assert_eq!(tz.today(now), date(2024, 3, 15));
        assert_eq!(ReportTimezone::utc().today(now), date(2024, 3, 14));

        assert!(matches!(
            "Mars/Olympus".parse::<ReportTimezone>(),
            Err(FilterError::InvalidTimezone(_))
        ));
    }

    #[test]
    fn test_parse_user_id() {
        assert_eq!(parse_user_id(None).unwrap(), None);
        assert_eq!(parse_user_id(Some("all")).unwrap(), None);
        assert_eq!(parse_user_id(Some("42")).unwrap(), Some(42));
        assert!(parse_user_id(Some("abc")).is_err());
        assert!(parse_user_id(Some("-3")).is_err());
    }

    #[test]
    fn test_filter_from_query() {
        let query = ReportQuery {
            range: Some("weekly".into()),
            shift: Some("09:00:00-17:00:00".into()),
            user: Some("7".into()),
            timezone: None,
        };
        let default_tz: ReportTimezone = "Europe/Berlin".parse().unwrap();
        let filter = ReportFilter::from_query(&query, default_tz).unwrap();
        assert_eq!(filter.range, DateRange::Weekly);
        assert_eq!(filter.user_id, Some(7));
        assert_eq!(filter.timezone, default_tz);
        assert!(filter.shift.window().is_some());
    }

    #[test]
    fn test_filter_from_query_bad_timezone() {
        let query = ReportQuery {
            timezone: Some("Nowhere/City".into()),
            ..Default::default()
        };
        let err = ReportFilter::from_query(&query, ReportTimezone::utc()).unwrap_err();
        assert_eq!(err, FilterError::InvalidTimezone("Nowhere/City".into()));
    }

    #[test]
    fn test_for_user_keeps_other_fields() {
        let filter = ReportFilter {
            range: DateRange::Monthly,
            ..Default::default()
        };
        let scoped = filter.for_user(3);
        assert_eq!(scoped.user_id, Some(3));
        assert_eq!(scoped.range, DateRange::Monthly);
    }
}
