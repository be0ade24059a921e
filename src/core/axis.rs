//! Time axis: linear maps between calendar time and pixel offsets.
//!
//! Two scales share one origin (the first event). The transcript and ruler
//! use the vertical density, the image strip the horizontal one. Offsets are
//! not clamped; times outside the range land before zero or past the extent.

use chrono::{NaiveDateTime, TimeDelta};

use super::event::NormalizedEvent;

/// Pixels per second on the transcript/ruler axis.
pub const PIXELS_PER_SECOND_VERTICAL: f64 = 20.0;
/// Pixels per second on the image strip axis.
pub const PIXELS_PER_SECOND_HORIZONTAL: f64 = 10.0;

/// Pixel density of one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Density(pub f64);

impl Density {
    pub fn pixels_per_second(self) -> f64 {
        self.0
    }
}

/// Both axis densities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Densities {
    pub vertical: Density,
    pub horizontal: Density,
}

impl Default for Densities {
    fn default() -> Self {
        Self {
            vertical: Density(PIXELS_PER_SECOND_VERTICAL),
            horizontal: Density(PIXELS_PER_SECOND_HORIZONTAL),
        }
    }
}

/// Span covered by the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeRange {
    /// First and last event dates; `None` for fewer than two events.
    pub fn from_events(events: &[NormalizedEvent]) -> Option<Self> {
        match events {
            [first, .., last] => Some(Self {
                start: first.date,
                end: last.date,
            }),
            _ => None,
        }
    }

    pub fn duration_seconds(&self) -> f64 {
        seconds_between(self.start, self.end)
    }

    pub fn contains(&self, t: NaiveDateTime) -> bool {
        self.start <= t && t <= self.end
    }
}

/// Duration in seconds of an optional range; 0 when unset.
pub fn total_duration_seconds(range: Option<&TimeRange>) -> f64 {
    range.map_or(0.0, TimeRange::duration_seconds)
}

/// Signed seconds from `from` to `to`, millisecond resolution.
pub fn seconds_between(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    (to - from).num_milliseconds() as f64 / 1000.0
}

/// Time range plus densities: everything needed to place things on either axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisMapping {
    pub range: TimeRange,
    pub densities: Densities,
}

impl AxisMapping {
    pub fn new(range: TimeRange, densities: Densities) -> Self {
        Self { range, densities }
    }

    pub fn start(&self) -> NaiveDateTime {
        self.range.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.range.end
    }

    pub fn total_duration_seconds(&self) -> f64 {
        self.range.duration_seconds()
    }

    pub fn vertical_offset(&self, t: NaiveDateTime) -> f64 {
        seconds_between(self.range.start, t) * self.densities.vertical.pixels_per_second()
    }

    pub fn horizontal_offset(&self, t: NaiveDateTime) -> f64 {
        seconds_between(self.range.start, t) * self.densities.horizontal.pixels_per_second()
    }

    /// Scrollable height of the vertical panes.
    pub fn vertical_extent(&self) -> f64 {
        self.vertical_offset(self.range.end)
    }

    /// Scrollable width of the image strip.
    pub fn horizontal_extent(&self) -> f64 {
        self.horizontal_offset(self.range.end)
    }

    /// Inverse of [`vertical_offset`](Self::vertical_offset), rounded to the
    /// nearest millisecond.
    pub fn time_at_vertical(&self, offset: f64) -> NaiveDateTime {
        let ms = (offset / self.densities.vertical.pixels_per_second() * 1000.0).round();
        self.range.start + TimeDelta::milliseconds(ms as i64)
    }

    /// Inverse of [`horizontal_offset`](Self::horizontal_offset).
    pub fn time_at_horizontal(&self, offset: f64) -> NaiveDateTime {
        let ms = (offset / self.densities.horizontal.pixels_per_second() * 1000.0).round();
        self.range.start + TimeDelta::milliseconds(ms as i64)
    }
}
