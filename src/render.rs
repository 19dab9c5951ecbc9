//! Terminal rendering for layout results.
//!
//! Extension traits and helpers that turn eotis-core values into colored
//! text with owo_colors.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use eotis_core::bucket::events_on_day;
use eotis_core::overlap::ColumnSlot;
use eotis_core::{
    CalendarEvent, EventKind, Geometry, Granularity, LayoutPass, TimeIndicator, ViewWindow,
};
use owo_colors::OwoColorize;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for ViewWindow {
    fn render(&self) -> String {
        let title = match self.granularity() {
            Granularity::Day => self.reference().format("%A %-d %B %Y").to_string(),
            Granularity::Week => format!("Week of {}", self.first_day().format("%a %-d %b %Y")),
            Granularity::Month => self.reference().format("%B %Y").to_string(),
        };

        let zone = format!("({})", self.timezone());
        let mut lines = vec![format!("📅 {} {}", title.bold(), zone.dimmed())];
        let in_month = self.month_days();

        for (index, day) in self.days().iter().enumerate() {
            let label = format!("{:>3}  {}", index, format_day(*day));
            if in_month.contains(day) {
                lines.push(label);
            } else {
                lines.push(label.dimmed().to_string());
            }
        }

        lines.join("\n")
    }
}

/// Render a layout pass grouped by day column.
pub fn render_layout(
    events: &[CalendarEvent],
    window: &ViewWindow,
    pass: &LayoutPass,
    slots: Option<&[ColumnSlot]>,
) -> String {
    let by_id: HashMap<&str, &CalendarEvent> = events.iter().map(|e| (e.id.as_str(), e)).collect();
    let slot_by_id: HashMap<&str, &ColumnSlot> = slots
        .unwrap_or_default()
        .iter()
        .map(|s| (s.id.as_str(), s))
        .collect();

    let mut lines = Vec::new();

    for (index, day) in window.days().iter().enumerate() {
        let geometry: Vec<&Geometry> = pass.for_day(index).collect();
        if geometry.is_empty() {
            continue;
        }

        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push(format_day(*day).bold().to_string());

        for g in geometry {
            let Some(event) = by_id.get(g.id()) else {
                continue;
            };
            let title = colorize_kind(event);

            match g {
                Geometry::AllDay { .. } => {
                    lines.push(format!("  {:<13} {}", "all-day".dimmed(), title));
                }
                Geometry::Timed {
                    top_offset, height, ..
                } => {
                    let start = window.wall_clock(event.start).format("%H:%M");
                    let end = window.wall_clock(event.end).format("%H:%M");
                    let column = slot_by_id
                        .get(g.id())
                        .map(|s| format!(" col {}/{}", s.column + 1, s.columns))
                        .unwrap_or_default();
                    let placement = format!("top {top_offset:.0} h {height:.0}{column}");
                    lines.push(format!("  {start}-{end}   {} {}", title, placement.dimmed()));
                }
            }
        }
    }

    lines.join("\n")
}

/// Render the month view as a date list, one block per day with events.
pub fn render_month(events: &[CalendarEvent], window: &ViewWindow) -> String {
    let mut lines = Vec::new();

    for day in window.month_days() {
        let on_day = events_on_day(events, window, day);
        if on_day.is_empty() {
            continue;
        }

        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push(format_day(day).bold().to_string());

        for event in on_day {
            let time = if event.all_day {
                "all-day".to_string()
            } else {
                window.wall_clock(event.start).format("%H:%M").to_string()
            };
            lines.push(format!("  {:<8} {}", time.dimmed(), colorize_kind(event)));
        }
    }

    lines.join("\n")
}

/// Render the current-time indicator line.
pub fn render_indicator(window: &ViewWindow, position: Option<TimeIndicator>) -> String {
    let now = window.wall_clock(Utc::now()).format("%H:%M");
    match position {
        Some(p) => {
            let day = window
                .days()
                .get(p.day_index)
                .map(|d| format_day(*d))
                .unwrap_or_default();
            format!(
                "{} {} {}",
                "▶".red(),
                format!("{now} {day}").bold(),
                format!("(column {}, top {:.0})", p.day_index, p.top_offset).dimmed()
            )
        }
        None => format!("{now} {}", "not visible in this view".dimmed()),
    }
}

fn colorize_kind(event: &CalendarEvent) -> String {
    match event.kind() {
        EventKind::Lesson => event.title.cyan().to_string(),
        EventKind::Meeting => event.title.yellow().to_string(),
    }
}

/// Human-readable day label (e.g. "Mon 17 Mar")
fn format_day(day: NaiveDate) -> String {
    day.format("%a %-d %b").to_string()
}
