//! Event geometry for a view window.
//!
//! `compute_layout` is a pure function of its inputs: events outside the
//! window are dropped, all-day events get a lane slot, and timed events get a
//! column plus a vertical span from `GridMetrics::span`. Overlapping events
//! are placed independently; see `overlap::assign_columns` for side-by-side
//! placement.

use serde::Serialize;
use tracing::debug;

use crate::bucket::day_index;
use crate::event::CalendarEvent;
use crate::geometry::GridMetrics;
use crate::window::ViewWindow;

/// Placement of one event in a window.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "lane", rename_all = "camelCase")]
pub enum Geometry {
    /// Block on the hourly grid
    #[serde(rename_all = "camelCase")]
    Timed {
        id: String,
        day_index: usize,
        top_offset: f64,
        height: f64,
    },
    /// Slot in the all-day lane above the grid
    #[serde(rename_all = "camelCase")]
    AllDay { id: String, day_index: usize },
}

impl Geometry {
    pub fn id(&self) -> &str {
        match self {
            Geometry::Timed { id, .. } | Geometry::AllDay { id, .. } => id,
        }
    }

    pub fn day_index(&self) -> usize {
        match self {
            Geometry::Timed { day_index, .. } | Geometry::AllDay { day_index, .. } => *day_index,
        }
    }

    pub fn is_all_day(&self) -> bool {
        matches!(self, Geometry::AllDay { .. })
    }

    /// `(top, bottom)` for timed blocks.
    pub fn vertical_range(&self) -> Option<(f64, f64)> {
        match self {
            Geometry::Timed {
                top_offset, height, ..
            } => Some((*top_offset, top_offset + height)),
            Geometry::AllDay { .. } => None,
        }
    }
}

/// Lay out `events` in `window`, preserving input order.
///
/// Month windows have no hourly grid, so every visible event there is placed
/// in the all-day lane of its date cell.
pub fn compute_layout(
    events: &[CalendarEvent],
    window: &ViewWindow,
    metrics: &GridMetrics,
) -> Vec<Geometry> {
    let timed_grid = window.granularity().has_time_grid();

    events
        .iter()
        .filter_map(|event| {
            let Some(day_index) = day_index(window, event) else {
                debug!(event_id = %event.id, "event starts outside view window, skipping");
                return None;
            };

            if event.all_day || !timed_grid {
                return Some(Geometry::AllDay {
                    id: event.id.clone(),
                    day_index,
                });
            }

            if event.is_inverted() {
                debug!(event_id = %event.id, "event ends before it starts");
            }

            let span = metrics.span(window.wall_clock(event.start), window.wall_clock(event.end));
            if span.clamped {
                debug!(
                    event_id = %event.id,
                    height = span.height,
                    "interval shorter than minimum height, clamping"
                );
            }

            Some(Geometry::Timed {
                id: event.id.clone(),
                day_index,
                top_offset: span.top,
                height: span.height,
            })
        })
        .collect()
}

/// One render pass split into the hourly grid and the all-day lane.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LayoutPass {
    pub timed: Vec<Geometry>,
    pub all_day: Vec<Geometry>,
}

impl LayoutPass {
    pub fn compute(events: &[CalendarEvent], window: &ViewWindow, metrics: &GridMetrics) -> Self {
        let (all_day, timed) = compute_layout(events, window, metrics)
            .into_iter()
            .partition(Geometry::is_all_day);
        LayoutPass { timed, all_day }
    }

    pub fn len(&self) -> usize {
        self.timed.len() + self.all_day.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timed.is_empty() && self.all_day.is_empty()
    }

    /// All geometry for column `day_index`, all-day lane first.
    pub fn for_day(&self, day_index: usize) -> impl Iterator<Item = &Geometry> {
        self.all_day
            .iter()
            .chain(self.timed.iter())
            .filter(move |g| g.day_index() == day_index)
    }
}
