//! Timestamps and flight windows.
//!
//! All times are naive local timestamps with minute resolution, stored and
//! displayed as `YYYY-MM-DD HH:MM`.

use chrono::{Duration, Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Storage and display format for timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Alternative accepted input format (ISO 8601 `T` separator).
const ISO_INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Parse a `YYYY-MM-DD HH:MM` (or `YYYY-MM-DDTHH:MM`) timestamp.
///
/// # Errors
///
/// Returns [`Error::InvalidTimestamp`] if the input matches neither format.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime> {
    let trimmed = value.trim();
    NaiveDateTime::parse_from_str(trimmed, TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, ISO_INPUT_FORMAT))
        .map_err(|_| Error::InvalidTimestamp {
            value: value.to_string(),
        })
}

/// Format a timestamp for storage and display.
#[must_use]
pub fn format_timestamp(timestamp: &NaiveDateTime) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Convert a duration to fractional hours.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn hours(duration: Duration) -> f64 {
    duration.num_minutes() as f64 / 60.0
}

/// Round an hour total to two decimal places.
#[must_use]
pub fn round_hours(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// The current local time, truncated to the minute.
#[must_use]
pub fn now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now)
}

/// A departure/arrival interval.
///
/// Callers are expected to keep `arrival > departure`; nothing here enforces
/// it, and the arithmetic stays total for inverted windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlightWindow {
    /// Departure time.
    pub departure: NaiveDateTime,
    /// Arrival time.
    pub arrival: NaiveDateTime,
}

impl FlightWindow {
    /// Create a window from a departure and an arrival.
    #[must_use]
    pub fn new(departure: NaiveDateTime, arrival: NaiveDateTime) -> Self {
        Self { departure, arrival }
    }

    /// Inclusive overlap: windows that merely touch at an endpoint overlap.
    #[must_use]
    pub fn overlaps(&self, other: &FlightWindow) -> bool {
        self.departure <= other.arrival && self.arrival >= other.departure
    }

    /// Length of the window.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.arrival - self.departure
    }

    /// Length of the window in hours.
    #[must_use]
    pub fn duration_hours(&self) -> f64 {
        hours(self.duration())
    }

    /// Whether the arrival is strictly after the departure.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.arrival > self.departure
    }
}

impl std::fmt::Display for FlightWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} to {}",
            format_timestamp(&self.departure),
            format_timestamp(&self.arrival)
        )
    }
}

#[cfg(test)]
pub(crate) fn ts(value: &str) -> NaiveDateTime {
    parse_timestamp(value).expect("valid test timestamp")
}
