//! Time-grid layout engine for the EOTIS Hub calendar.
//!
//! This crate turns a list of calendar events into pixel geometry for the
//! day and week views, builds the set of visible days for each view, and
//! positions the current-time indicator:
//! - `window` derives the visible days from a reference date and granularity
//! - `layout` buckets events into day columns and maps them onto the 24-hour grid
//! - `indicator` computes (and periodically refreshes) the "now" line
//!
//! Persistence is not handled here. Events arrive through the `source` traits
//! as plain immutable values and every layout pass is recomputed from scratch.

pub mod bucket;
pub mod config;
pub mod error;
pub mod event;
pub mod geometry;
pub mod indicator;
pub mod layout;
pub mod overlap;
pub mod source;
pub mod time;
pub mod window;

// Re-export the types most callers need at crate root
pub use error::{LayoutError, LayoutResult};
pub use event::{CalendarEvent, EventKind};
pub use geometry::GridMetrics;
pub use indicator::{IndicatorTicker, TimeIndicator, current_time_position};
pub use layout::{Geometry, LayoutPass, compute_layout};
pub use window::{Granularity, ViewWindow, build_view_window};
