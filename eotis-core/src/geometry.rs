//! Interval-to-pixel mapping for the 24-hour time grid.
//!
//! A day column is `24 * hour_height` pixels tall. An event's top edge sits at
//! its start's minutes-since-midnight scaled by `hour_height / 60`, and its
//! height is its duration scaled the same way.
//!
//! Degenerate intervals (zero length, inverted, or shorter than the minimum
//! visible size) are drawn `min_event_height` pixels tall. A minimum-height
//! block that would poke out below midnight is moved up so it ends on the
//! grid's bottom edge.

use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, LayoutResult};
use crate::time::{MINUTES_PER_HOUR, duration_minutes, minutes_since_midnight};

pub const DEFAULT_HOUR_HEIGHT: f64 = 60.0;

/// Minimum drawn height in pixels (a quarter hour at the default scale).
pub const DEFAULT_MIN_EVENT_HEIGHT: f64 = 15.0;

/// Pixel scale of the time grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridMetrics {
    /// Pixels per hour
    pub hour_height: f64,
    /// Height given to degenerate or very short intervals
    pub min_event_height: f64,
    /// Cut events that run past midnight at the bottom of the grid.
    /// Off by default: an event is drawn at full length from its start.
    pub clip_overflow: bool,
}

impl Default for GridMetrics {
    fn default() -> Self {
        GridMetrics {
            hour_height: DEFAULT_HOUR_HEIGHT,
            min_event_height: DEFAULT_MIN_EVENT_HEIGHT,
            clip_overflow: false,
        }
    }
}

/// Vertical placement of a block within a day column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalSpan {
    pub top: f64,
    pub height: f64,
    /// Whether the minimum height was applied
    pub clamped: bool,
}

impl VerticalSpan {
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

impl GridMetrics {
    pub fn new(hour_height: f64) -> Self {
        GridMetrics {
            hour_height,
            ..Default::default()
        }
    }

    pub fn with_min_event_height(mut self, min_event_height: f64) -> Self {
        self.min_event_height = min_event_height;
        self
    }

    pub fn with_clip_overflow(mut self, clip_overflow: bool) -> Self {
        self.clip_overflow = clip_overflow;
        self
    }

    pub fn validate(&self) -> LayoutResult<()> {
        if !self.hour_height.is_finite() || self.hour_height <= 0.0 {
            return Err(LayoutError::Config(format!(
                "hour_height must be a positive number, got {}",
                self.hour_height
            )));
        }
        if !self.min_event_height.is_finite()
            || self.min_event_height <= 0.0
            || self.min_event_height > self.grid_height()
        {
            return Err(LayoutError::Config(format!(
                "min_event_height must be above 0 and at most {}, got {}",
                self.grid_height(),
                self.min_event_height
            )));
        }
        Ok(())
    }

    pub fn pixels_per_minute(&self) -> f64 {
        self.hour_height / MINUTES_PER_HOUR as f64
    }

    /// Total height of one day column.
    pub fn grid_height(&self) -> f64 {
        self.hour_height * 24.0
    }

    /// Vertical offset of a time of day.
    pub fn offset_for(&self, time: NaiveTime) -> f64 {
        minutes_since_midnight(time) as f64 * self.pixels_per_minute()
    }

    /// Map a wall-clock interval onto the grid of `start`'s day.
    pub fn span(&self, start: NaiveDateTime, end: NaiveDateTime) -> VerticalSpan {
        let grid = self.grid_height();
        let top = self.offset_for(start.time());
        let raw = duration_minutes(start, end) as f64 * self.pixels_per_minute();

        let clamped = raw < self.min_event_height;
        let mut height = raw.max(self.min_event_height);
        if self.clip_overflow {
            height = height.min((grid - top).max(self.min_event_height));
        }

        let top = if clamped || self.clip_overflow {
            top.min(grid - height).max(0.0)
        } else {
            top
        };

        VerticalSpan {
            top,
            height,
            clamped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, day)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_one_pixel_per_minute_at_default_scale() {
        let span = GridMetrics::default().span(at(17, 9, 0), at(17, 10, 0));
        assert_eq!(span.top, 540.0);
        assert_eq!(span.height, 60.0);
        assert!(!span.clamped);
    }

    #[test]
    fn test_scales_with_hour_height() {
        let span = GridMetrics::new(120.0).span(at(17, 9, 30), at(17, 9, 45));
        assert_eq!(span.top, 1140.0);
        assert_eq!(span.height, 30.0);
    }

    #[test]
    fn test_zero_length_event_gets_minimum_height() {
        let metrics = GridMetrics::default();
        let span = metrics.span(at(17, 14, 0), at(17, 14, 0));
        assert_eq!(span.top, 840.0);
        assert_eq!(span.height, DEFAULT_MIN_EVENT_HEIGHT);
        assert!(span.clamped);
    }

    #[test]
    fn test_inverted_event_gets_minimum_height() {
        let span = GridMetrics::default().span(at(17, 11, 0), at(17, 10, 0));
        assert_eq!(span.top, 660.0);
        assert_eq!(span.height, DEFAULT_MIN_EVENT_HEIGHT);
    }

    #[test]
    fn test_minimum_height_block_stays_inside_grid() {
        let metrics = GridMetrics::default();
        let span = metrics.span(at(17, 23, 55), at(17, 23, 55));
        assert_eq!(span.height, DEFAULT_MIN_EVENT_HEIGHT);
        assert_eq!(span.bottom(), metrics.grid_height());
    }

    #[test]
    fn test_overnight_event_is_not_clipped_by_default() {
        let span = GridMetrics::default().span(at(17, 23, 0), at(18, 1, 0));
        assert_eq!(span.top, 1380.0);
        assert_eq!(span.height, 120.0);
    }

    #[test]
    fn test_overnight_event_clipped_when_enabled() {
        let metrics = GridMetrics::default().with_clip_overflow(true);
        let span = metrics.span(at(17, 23, 0), at(18, 1, 0));
        assert_eq!(span.top, 1380.0);
        assert_eq!(span.height, 60.0);
        assert_eq!(span.bottom(), metrics.grid_height());
    }

    #[test]
    fn test_events_contained_in_day_stay_inside_grid() {
        let metrics = GridMetrics::default();
        for (sh, sm, eh, em) in [(0, 0, 0, 0), (0, 0, 23, 59), (12, 30, 13, 0), (23, 59, 23, 59)] {
            let span = metrics.span(at(17, sh, sm), at(17, eh, em));
            assert!(span.top >= 0.0);
            assert!(span.bottom() <= metrics.grid_height(), "{sh}:{sm}-{eh}:{em}");
        }
    }

    #[test]
    fn test_validate_rejects_bad_scale() {
        assert!(GridMetrics::new(0.0).validate().is_err());
        assert!(GridMetrics::new(f64::NAN).validate().is_err());
        assert!(GridMetrics::default().with_min_event_height(-1.0).validate().is_err());
        assert!(GridMetrics::default().with_min_event_height(0.0).validate().is_err());
        assert!(GridMetrics::default().validate().is_ok());
    }
}
