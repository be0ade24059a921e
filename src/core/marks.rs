//! Ruler ticks, one per calendar second.

use chrono::{NaiveDateTime, TimeDelta, Timelike};

use super::event::format_clock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkKind {
    /// Second zero of a minute.
    Minute,
    /// Second divisible by ten.
    TenSecond,
    Second,
}

impl MarkKind {
    pub fn classify(t: NaiveDateTime) -> Self {
        match t.second() {
            0 => MarkKind::Minute,
            s if s % 10 == 0 => MarkKind::TenSecond,
            _ => MarkKind::Second,
        }
    }

    /// Minute and ten-second marks are labelled.
    pub fn is_labelled(self) -> bool {
        !matches!(self, MarkKind::Second)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeMark {
    pub time: NaiveDateTime,
    pub kind: MarkKind,
    /// `HH:MM:SS` for labelled kinds.
    pub label: Option<String>,
}

impl TimeMark {
    fn at(time: NaiveDateTime) -> Self {
        let kind = MarkKind::classify(time);
        let label = kind.is_labelled().then(|| format_clock(time));
        Self { time, kind, label }
    }
}

/// Lazy tick sequence from the first whole second after `start` through `end`.
///
/// Cloning restarts from the clone point, so a fresh `time_marks` call or a
/// clone taken before iteration walks the full sequence again.
#[derive(Debug, Clone)]
pub struct TimeMarks {
    next: NaiveDateTime,
    end: NaiveDateTime,
}

/// Ticks for `start..=end`, first tick at `trunc_to_second(start) + 1s`.
pub fn time_marks(start: NaiveDateTime, end: NaiveDateTime) -> TimeMarks {
    let whole = start.with_nanosecond(0).unwrap_or(start);
    TimeMarks {
        next: whole + TimeDelta::seconds(1),
        end,
    }
}

impl Iterator for TimeMarks {
    type Item = TimeMark;

    fn next(&mut self) -> Option<TimeMark> {
        if self.next > self.end {
            return None;
        }
        let mark = TimeMark::at(self.next);
        self.next += TimeDelta::seconds(1);
        Some(mark)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = if self.next > self.end {
            0
        } else {
            ((self.end - self.next).num_seconds() + 1) as usize
        };
        (n, Some(n))
    }
}

impl ExactSizeIterator for TimeMarks {}
