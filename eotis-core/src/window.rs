//! Visible-day windows for the day, week and month views.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, LayoutResult};
use crate::event::CalendarEvent;
use crate::time::{
    end_of_month, end_of_week, start_of_day_utc, start_of_month, start_of_week, to_wall_clock,
};

/// Calendar zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    #[default]
    Week,
    Month,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Day => "day",
            Granularity::Week => "week",
            Granularity::Month => "month",
        }
    }

    /// Day and week views lay events out on the hourly grid; month does not.
    pub fn has_time_grid(&self) -> bool {
        !matches!(self, Granularity::Month)
    }
}

impl FromStr for Granularity {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(Granularity::Day),
            "week" => Ok(Granularity::Week),
            "month" => Ok(Granularity::Month),
            _ => Err(LayoutError::UnknownGranularity(s.to_string())),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The ordered, contiguous run of days visible in a view.
///
/// Day indices handed out by the layout engine are positions in `days()`.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewWindow {
    granularity: Granularity,
    reference: NaiveDate,
    days: Vec<NaiveDate>,
    timezone: Tz,
}

/// Build the visible days for `reference` at `granularity`.
///
/// - Day: just `reference`
/// - Week: the seven days starting at the Monday on or before `reference`
/// - Month: whole weeks covering the reference month, Monday to Sunday
///
/// The window reads instants in UTC until `in_timezone` says otherwise.
pub fn build_view_window(reference: NaiveDate, granularity: Granularity) -> ViewWindow {
    let (first, last) = match granularity {
        Granularity::Day => (reference, reference),
        Granularity::Week => (start_of_week(reference), end_of_week(reference)),
        Granularity::Month => (
            start_of_week(start_of_month(reference)),
            end_of_week(end_of_month(reference)),
        ),
    };

    let days = first.iter_days().take_while(|d| *d <= last).collect();

    ViewWindow {
        granularity,
        reference,
        days,
        timezone: Tz::UTC,
    }
}

impl ViewWindow {
    /// Parse-and-build convenience for string granularities.
    pub fn parse(reference: NaiveDate, granularity: &str) -> LayoutResult<Self> {
        Ok(build_view_window(reference, granularity.parse()?))
    }

    /// Read event instants as wall-clock time in `timezone`.
    pub fn in_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn reference(&self) -> NaiveDate {
        self.reference
    }

    pub fn days(&self) -> &[NaiveDate] {
        &self.days
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn first_day(&self) -> NaiveDate {
        self.days.first().copied().unwrap_or(self.reference)
    }

    pub fn last_day(&self) -> NaiveDate {
        self.days.last().copied().unwrap_or(self.reference)
    }

    /// Column of `day`, if visible.
    pub fn index_of(&self, day: NaiveDate) -> Option<usize> {
        let offset = (day - self.first_day()).num_days();
        usize::try_from(offset).ok().filter(|i| *i < self.days.len())
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.index_of(day).is_some()
    }

    /// Days that belong to the reference month (month view's date list).
    /// For day and week windows this is every visible day.
    pub fn month_days(&self) -> Vec<NaiveDate> {
        match self.granularity {
            Granularity::Month => self
                .days
                .iter()
                .copied()
                .filter(|d| d.year() == self.reference.year() && d.month() == self.reference.month())
                .collect(),
            _ => self.days.clone(),
        }
    }

    /// `instant` as wall-clock time in this window's timezone.
    pub fn wall_clock(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        to_wall_clock(instant, &self.timezone)
    }

    /// Calendar day an event is anchored to.
    ///
    /// All-day events carry a date, not an instant: their start is read as a
    /// plain UTC date with no timezone shift. Timed events use the start's
    /// wall-clock date in this window's timezone.
    pub fn anchor_day(&self, event: &CalendarEvent) -> NaiveDate {
        if event.all_day {
            event.start.date_naive()
        } else {
            self.wall_clock(event.start).date()
        }
    }

    /// Half-open UTC range `[first midnight, midnight after the last day)`.
    pub fn utc_bounds(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let from = start_of_day_utc(self.first_day(), &self.timezone);
        let to = start_of_day_utc(self.last_day() + Duration::days(1), &self.timezone);
        (from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Weekday};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_window_is_seven_days_from_monday() {
        for d in 17..=23 {
            let window = build_view_window(date(2025, 3, d), Granularity::Week);
            assert_eq!(window.len(), 7);
            assert_eq!(window.days()[0], date(2025, 3, 17));
            assert_eq!(window.days()[0].weekday(), Weekday::Mon);
            assert_eq!(window.last_day(), date(2025, 3, 23));
        }
    }

    #[test]
    fn test_week_window_across_year_boundary() {
        let window = build_view_window(date(2026, 1, 1), Granularity::Week);
        assert_eq!(window.first_day(), date(2025, 12, 29));
        assert_eq!(window.last_day(), date(2026, 1, 4));
    }

    #[test]
    fn test_day_window_is_reference_date() {
        let window = build_view_window(date(2025, 3, 19), Granularity::Day);
        assert_eq!(window.days(), &[date(2025, 3, 19)]);
        assert_eq!(window.index_of(date(2025, 3, 19)), Some(0));
        assert_eq!(window.index_of(date(2025, 3, 20)), None);
        assert_eq!(window.index_of(date(2025, 3, 18)), None);
    }

    #[test]
    fn test_month_window_covers_whole_weeks() {
        // March 2025 starts on a Saturday and ends on a Monday
        let window = build_view_window(date(2025, 3, 12), Granularity::Month);
        assert_eq!(window.first_day(), date(2025, 2, 24));
        assert_eq!(window.last_day(), date(2025, 4, 6));
        assert_eq!(window.len(), 42);
        assert_eq!(window.month_days().len(), 31);
        assert_eq!(window.month_days()[0], date(2025, 3, 1));
    }

    #[test]
    fn test_month_window_exact_four_weeks() {
        // February 2021 runs Monday 1st to Sunday 28th
        let window = build_view_window(date(2021, 2, 10), Granularity::Month);
        assert_eq!(window.len(), 28);
        assert_eq!(window.month_days().len(), 28);
    }

    #[test]
    fn test_unknown_granularity_is_rejected() {
        assert!(matches!(
            "fortnight".parse::<Granularity>(),
            Err(LayoutError::UnknownGranularity(g)) if g == "fortnight"
        ));
        assert!(ViewWindow::parse(date(2025, 3, 17), "").is_err());
        assert_eq!(" Week ".parse::<Granularity>().unwrap(), Granularity::Week);
    }

    #[test]
    fn test_utc_bounds_follow_timezone() {
        let tz: Tz = "America/New_York".parse().unwrap();
        let window = build_view_window(date(2025, 3, 17), Granularity::Day).in_timezone(tz);
        let (from, to) = window.utc_bounds();
        assert_eq!(from, Utc.with_ymd_and_hms(2025, 3, 17, 4, 0, 0).unwrap());
        assert_eq!(to, Utc.with_ymd_and_hms(2025, 3, 18, 4, 0, 0).unwrap());
    }

    #[test]
    fn test_all_day_anchor_ignores_timezone() {
        let tz: Tz = "America/New_York".parse().unwrap();
        let window = build_view_window(date(2025, 3, 17), Granularity::Week).in_timezone(tz);
        let start = Utc.with_ymd_and_hms(2025, 3, 19, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 3, 20, 0, 0, 0).unwrap();

        let all_day = CalendarEvent::new("inset", "INSET", start, end).all_day();
        assert_eq!(window.anchor_day(&all_day), date(2025, 3, 19));

        // The same instant as a timed event is Tuesday evening in New York
        let timed = CalendarEvent::new("call", "Call", start, end);
        assert_eq!(window.anchor_day(&timed), date(2025, 3, 18));
    }

    #[test]
    fn test_build_is_deterministic() {
        let a = build_view_window(date(2025, 3, 20), Granularity::Month);
        let b = build_view_window(date(2025, 3, 20), Granularity::Month);
        assert_eq!(a, b);
    }
}
