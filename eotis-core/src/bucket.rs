//! Day bucketing: which column of a window an event belongs to.
//!
//! Only the start matters. An event that runs into later days is anchored to
//! its first day and never continues into the next column. All-day events are
//! anchored to their calendar date regardless of the window's timezone.

use chrono::NaiveDate;

use crate::event::CalendarEvent;
use crate::window::ViewWindow;

/// Column of `event` in `window`, or `None` when its start day is not visible.
pub fn day_index(window: &ViewWindow, event: &CalendarEvent) -> Option<usize> {
    window.index_of(window.anchor_day(event))
}

/// Events anchored to `day`, all-day first, then timed by start.
///
/// This is the month view's "events on the selected date" list.
pub fn events_on_day<'a>(
    events: &'a [CalendarEvent],
    window: &ViewWindow,
    day: NaiveDate,
) -> Vec<&'a CalendarEvent> {
    let mut matching: Vec<&CalendarEvent> = events
        .iter()
        .filter(|e| window.anchor_day(e) == day)
        .collect();
    matching.sort_by_key(|e| (!e.all_day, e.start));
    matching
}
