//! Error types for the layout engine.

use thiserror::Error;

/// Errors that can occur while building views or loading events.
///
/// Data-quality problems in the events themselves (inverted intervals,
/// events outside the visible window) are not errors: they are clamped or
/// skipped during layout.
#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("Unknown view granularity '{0}' (expected day, week or month)")]
    UnknownGranularity(String),

    #[error("Invalid date '{0}'. Expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Event not found: {0}")]
    EventNotFound(String),

    #[error("Duplicate event id: {0}")]
    DuplicateEvent(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for layout operations.
pub type LayoutResult<T> = Result<T, LayoutError>;
