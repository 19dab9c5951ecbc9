//! Current-time indicator.
//!
//! `current_time_position` places the "now" line for a given instant.
//! `IndicatorTicker` keeps that position fresh while a view is on screen by
//! recomputing it on a fixed cadence in a background Tokio task.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, trace};

use crate::geometry::GridMetrics;
use crate::window::ViewWindow;

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// Position of the "now" line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeIndicator {
    pub day_index: usize,
    pub top_offset: f64,
}

/// Where the "now" line goes, or `None` if today is not a visible column.
///
/// Month windows have no hourly grid and never show the line.
pub fn current_time_position(
    window: &ViewWindow,
    metrics: &GridMetrics,
    now: DateTime<Utc>,
) -> Option<TimeIndicator> {
    if !window.granularity().has_time_grid() {
        return None;
    }

    let local = window.wall_clock(now);
    let day_index = window.index_of(local.date())?;

    Some(TimeIndicator {
        day_index,
        top_offset: metrics.offset_for(local.time()),
    })
}

/// Source of "now" for the ticker.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Recurring refresh of the current-time indicator.
///
/// The first position is computed synchronously in `spawn`; after that the
/// background task recomputes it every `refresh` and publishes changes on a
/// watch channel. `stop` (or dropping the ticker) cancels the task. A tick
/// that races with `stop` publishes nothing.
pub struct IndicatorTicker {
    receiver: watch::Receiver<Option<TimeIndicator>>,
    stopped: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl IndicatorTicker {
    /// Start refreshing. Must be called from within a Tokio runtime.
    pub fn spawn<C: Clock>(
        window: ViewWindow,
        metrics: GridMetrics,
        refresh: Duration,
        clock: C,
    ) -> Self {
        let initial = current_time_position(&window, &metrics, clock.now());
        let (sender, receiver) = watch::channel(initial);
        let stopped = Arc::new(AtomicBool::new(false));
        let task_stopped = Arc::clone(&stopped);

        debug!(
            view = %window.granularity(),
            first_day = %window.first_day(),
            refresh_secs = refresh.as_secs(),
            "starting current-time indicator"
        );

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(refresh);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick fires immediately; the initial value is already published
            interval.tick().await;

            loop {
                interval.tick().await;
                if task_stopped.load(Ordering::Acquire) {
                    break;
                }

                let position = current_time_position(&window, &metrics, clock.now());
                trace!(?position, "current-time indicator tick");
                sender.send_if_modified(|current| {
                    if *current == position {
                        return false;
                    }
                    *current = position;
                    true
                });
            }
        });

        IndicatorTicker {
            receiver,
            stopped,
            handle: Some(handle),
        }
    }

    /// Receiver that wakes whenever the position changes.
    pub fn subscribe(&self) -> watch::Receiver<Option<TimeIndicator>> {
        self.receiver.clone()
    }

    /// Latest published position.
    pub fn current(&self) -> Option<TimeIndicator> {
        *self.receiver.borrow()
    }

    pub fn is_running(&self) -> bool {
        !self.stopped.load(Ordering::Acquire)
    }

    /// Cancel the refresh task. Safe to call more than once.
    pub fn stop(&mut self) {
        if self.stopped.swap(true, Ordering::AcqRel) {
            return;
        }
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
        debug!("stopped current-time indicator");
    }
}

impl Drop for IndicatorTicker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::{Granularity, build_view_window};
    use chrono::{NaiveDate, TimeZone};
    use chrono_tz::Tz;
    use std::sync::Mutex;

    #[derive(Clone)]
    struct ManualClock(Arc<Mutex<DateTime<Utc>>>);

    impl ManualClock {
        fn at(now: DateTime<Utc>) -> Self {
            ManualClock(Arc::new(Mutex::new(now)))
        }

        fn advance(&self, by: chrono::Duration) {
            let mut now = self.0.lock().unwrap();
            *now += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock().unwrap()
        }
    }

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 17).unwrap()
    }

    fn utc(d: u32, h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, d, h, m, 0).unwrap()
    }

    #[test]
    fn test_position_in_week() {
        let window = build_view_window(monday(), Granularity::Week);
        let position = current_time_position(&window, &GridMetrics::default(), utc(19, 14, 30));
        assert_eq!(
            position,
            Some(TimeIndicator {
                day_index: 2,
                top_offset: 870.0
            })
        );
    }

    #[test]
    fn test_none_when_today_not_visible() {
        let window = build_view_window(monday(), Granularity::Week);
        let metrics = GridMetrics::default();
        assert_eq!(current_time_position(&window, &metrics, utc(24, 9, 0)), None);
        assert_eq!(current_time_position(&window, &metrics, utc(16, 23, 59)), None);

        let day = build_view_window(monday(), Granularity::Day);
        assert_eq!(current_time_position(&day, &metrics, utc(18, 0, 0)), None);
    }

    #[test]
    fn test_none_for_month_view() {
        let window = build_view_window(monday(), Granularity::Month);
        assert_eq!(
            current_time_position(&window, &GridMetrics::default(), utc(17, 9, 0)),
            None
        );
    }

    #[test]
    fn test_position_uses_window_timezone() {
        let tz: Tz = "Asia/Tokyo".parse().unwrap();
        let window = build_view_window(monday(), Granularity::Week).in_timezone(tz);
        // Sunday 16th 15:00 UTC is Monday 17th 00:00 in Tokyo
        let position = current_time_position(&window, &GridMetrics::default(), utc(16, 15, 0));
        assert_eq!(
            position,
            Some(TimeIndicator {
                day_index: 0,
                top_offset: 0.0
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_publishes_each_refresh() {
        let clock = ManualClock::at(utc(17, 9, 0));
        let window = build_view_window(monday(), Granularity::Week);
        let ticker = IndicatorTicker::spawn(
            window,
            GridMetrics::default(),
            DEFAULT_REFRESH_INTERVAL,
            clock.clone(),
        );
        let mut rx = ticker.subscribe();

        assert_eq!(
            ticker.current(),
            Some(TimeIndicator {
                day_index: 0,
                top_offset: 540.0
            })
        );

        clock.advance(chrono::Duration::minutes(1));
        rx.changed().await.unwrap();
        let position = *rx.borrow_and_update();
        assert_eq!(position.map(|p| p.top_offset), Some(541.0));

        clock.advance(chrono::Duration::minutes(1));
        rx.changed().await.unwrap();
        assert_eq!(ticker.current().map(|p| p.top_offset), Some(542.0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_clears_position_when_day_leaves_window() {
        let clock = ManualClock::at(utc(23, 23, 59));
        let window = build_view_window(monday(), Granularity::Week);
        let ticker = IndicatorTicker::spawn(
            window,
            GridMetrics::default(),
            DEFAULT_REFRESH_INTERVAL,
            clock.clone(),
        );
        let mut rx = ticker.subscribe();
        assert_eq!(ticker.current().map(|p| p.day_index), Some(6));

        clock.advance(chrono::Duration::minutes(1));
        rx.changed().await.unwrap();
        assert_eq!(ticker.current(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stopped_ticker_never_publishes() {
        let clock = ManualClock::at(utc(17, 9, 0));
        let window = build_view_window(monday(), Granularity::Week);
        let mut ticker = IndicatorTicker::spawn(
            window,
            GridMetrics::default(),
            DEFAULT_REFRESH_INTERVAL,
            clock.clone(),
        );
        let mut rx = ticker.subscribe();

        ticker.stop();
        ticker.stop();
        assert!(!ticker.is_running());

        clock.advance(chrono::Duration::minutes(5));
        tokio::time::advance(Duration::from_secs(300)).await;

        // Sender went away with the aborted task without sending anything new
        assert!(rx.changed().await.is_err());
        assert_eq!(ticker.current().map(|p| p.top_offset), Some(540.0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_ticker_cancels_task() {
        let clock = ManualClock::at(utc(17, 9, 0));
        let window = build_view_window(monday(), Granularity::Week);
        let ticker = IndicatorTicker::spawn(
            window,
            GridMetrics::default(),
            DEFAULT_REFRESH_INTERVAL,
            clock,
        );
        let mut rx = ticker.subscribe();

        drop(ticker);

        assert!(rx.changed().await.is_err());
    }
}
