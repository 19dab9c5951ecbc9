//! Date/time helpers shared by the window builder, bucketer and mapper.
//!
//! All grid arithmetic happens on wall-clock values in the viewer's timezone.
//! Instants are stored as UTC and converted at the edge.

use chrono::{
    DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone,
    Timelike, Utc,
};
use chrono_tz::Tz;

use crate::error::{LayoutError, LayoutResult};

pub const MINUTES_PER_HOUR: i64 = 60;
pub const MINUTES_PER_DAY: i64 = 24 * MINUTES_PER_HOUR;

/// Whole minutes elapsed since midnight (seconds are dropped).
pub fn minutes_since_midnight(time: NaiveTime) -> i64 {
    i64::from(time.num_seconds_from_midnight()) / 60
}

/// Whole minutes from `start` to `end`. Negative when the interval is inverted.
pub fn duration_minutes(start: NaiveDateTime, end: NaiveDateTime) -> i64 {
    (end - start).num_minutes()
}

/// Monday on or before `date` (ISO week start).
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Sunday on or after `date`.
pub fn end_of_week(date: NaiveDate) -> NaiveDate {
    start_of_week(date) + Duration::days(6)
}

pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

pub fn end_of_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    match NaiveDate::from_ymd_opt(year, month, 1) {
        Some(next) => next - Duration::days(1),
        None => date,
    }
}

/// Convert a UTC instant into wall-clock time in `tz`.
pub fn to_wall_clock(instant: DateTime<Utc>, tz: &Tz) -> NaiveDateTime {
    instant.with_timezone(tz).naive_local()
}

/// Convert a wall-clock time in `tz` back to UTC.
///
/// Ambiguous times (DST fall-back) resolve to the earlier instant. Times inside
/// a spring-forward gap have no local reading and are taken as UTC.
pub fn to_utc(local: NaiveDateTime, tz: &Tz) -> DateTime<Utc> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
        LocalResult::None => tz.from_utc_datetime(&local).with_timezone(&Utc),
    }
}

/// Midnight at the start of `day` in `tz`, as UTC.
pub fn start_of_day_utc(day: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    to_utc(day.and_time(NaiveTime::MIN), tz)
}

/// Parse YYYY-MM-DD
pub fn parse_date(s: &str) -> LayoutResult<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| LayoutError::InvalidDate(s.to_string()))
}

pub fn parse_timezone(name: &str) -> LayoutResult<Tz> {
    name.parse::<Tz>()
        .map_err(|_| LayoutError::UnknownTimezone(name.to_string()))
}
