//! Log events: raw feed records and their normalized, merged form.
//!
//! The feed is a flat JSON array of transcription lines and captured images.
//! Several transcription lines often share one timestamp (the recorder emits a
//! line per speaker turn); those are collapsed into a single entry so that the
//! transcript pane shows one row per instant.
//!
//! Normalization keeps input order. It never sorts: the feed is produced in
//! time order and the viewer trusts that.

use chrono::{DateTime, NaiveDateTime, Timelike};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Separator placed between merged transcription contents.
pub const MERGE_SEPARATOR: &str = " => ";

/// Accepted timestamp layouts, tried in order before RFC 3339.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EventError {
    #[error("unparseable timestamp {0:?}")]
    BadTimestamp(String),
}

/// Record as delivered by the feed.
///
/// `Unknown` stands for any entry the viewer cannot show: an unrecognized
/// `type`, or a known type missing its fields. It still occupies its place in
/// the sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RawEvent {
    Transcription {
        timestamp: String,
        #[serde(default)]
        content: String,
    },
    Image {
        timestamp: String,
        path: String,
    },
    #[serde(other)]
    Unknown,
}

impl RawEvent {
    pub fn transcription(timestamp: impl Into<String>, content: impl Into<String>) -> Self {
        RawEvent::Transcription {
            timestamp: timestamp.into(),
            content: content.into(),
        }
    }

    pub fn image(timestamp: impl Into<String>, path: impl Into<String>) -> Self {
        RawEvent::Image {
            timestamp: timestamp.into(),
            path: path.into(),
        }
    }
}

/// Payload of a normalized event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    Transcription { content: String },
    Image { path: String },
}

/// Event with its parsed calendar time. The original timestamp string is kept
/// because merging compares strings, not parsed times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedEvent {
    pub timestamp: String,
    pub date: NaiveDateTime,
    pub kind: EventKind,
}

impl NormalizedEvent {
    pub fn is_transcription(&self) -> bool {
        matches!(self.kind, EventKind::Transcription { .. })
    }

    pub fn is_image(&self) -> bool {
        matches!(self.kind, EventKind::Image { .. })
    }

    pub fn content(&self) -> Option<&str> {
        match &self.kind {
            EventKind::Transcription { content } => Some(content),
            EventKind::Image { .. } => None,
        }
    }

    pub fn path(&self) -> Option<&str> {
        match &self.kind {
            EventKind::Image { path } => Some(path),
            EventKind::Transcription { .. } => None,
        }
    }

    /// Time-of-day portion used in pane labels.
    pub fn time_of_day(&self) -> String {
        time_of_day(&self.timestamp, self.date)
    }

    /// Convert back to the feed representation.
    pub fn to_raw(&self) -> RawEvent {
        match &self.kind {
            EventKind::Transcription { content } => RawEvent::transcription(&self.timestamp, content),
            EventKind::Image { path } => RawEvent::image(&self.timestamp, path),
        }
    }
}

/// Output of [`normalize`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Normalized {
    pub events: Vec<NormalizedEvent>,
    /// Entries dropped: unknown or incomplete records and unparseable timestamps.
    pub skipped: usize,
}

impl Normalized {
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn transcription_count(&self) -> usize {
        self.events.iter().filter(|e| e.is_transcription()).count()
    }

    pub fn image_count(&self) -> usize {
        self.events.iter().filter(|e| e.is_image()).count()
    }
}

/// Parse a feed timestamp into a zone-less calendar time.
///
/// RFC 3339 input keeps the wall clock of its own offset, so labels match what
/// the recorder wrote.
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime, EventError> {
    let trimmed = s.trim();
    for fmt in TIMESTAMP_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(dt);
        }
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.naive_local())
        .map_err(|_| EventError::BadTimestamp(s.to_string()))
}

/// Text after the date part of `timestamp`, or `HH:MM:SS` of `date` when the
/// string has no separable time part.
pub fn time_of_day(timestamp: &str, date: NaiveDateTime) -> String {
    match timestamp.trim().split_once([' ', 'T']) {
        Some((_, time)) if !time.is_empty() => time.to_string(),
        _ => format_clock(date),
    }
}

/// `HH:MM:SS` of a calendar time.
pub fn format_clock(t: NaiveDateTime) -> String {
    format!("{:02}:{:02}:{:02}", t.hour(), t.minute(), t.second())
}

/// Merge adjacent same-timestamp transcriptions and attach parsed dates.
///
/// A transcription whose timestamp string equals the last emitted entry's
/// (itself a transcription) is appended to it with [`MERGE_SEPARATOR`].
/// Everything else becomes a new entry. Entries with a malformed timestamp are
/// skipped; they do not reset the last emitted entry. `Unknown` records are
/// skipped too, but they end the current merge run.
pub fn normalize(raw: impl IntoIterator<Item = RawEvent>) -> Normalized {
    let mut out = Normalized::default();
    // Set by an `Unknown` record between two same-timestamp transcriptions.
    let mut run_broken = false;

    for item in raw {
        let (timestamp, kind) = match item {
            RawEvent::Transcription { timestamp, content } => (timestamp, EventKind::Transcription { content }),
            RawEvent::Image { timestamp, path } => (timestamp, EventKind::Image { path }),
            RawEvent::Unknown => {
                warn!("Skipping log entry of unknown type");
                out.skipped += 1;
                run_broken = true;
                continue;
            }
        };
        let date = match parse_timestamp(&timestamp) {
            Ok(date) => date,
            Err(e) => {
                warn!("Skipping log entry: {}", e);
                out.skipped += 1;
                continue;
            }
        };

        if !run_broken
            && let EventKind::Transcription { content } = &kind
            && let Some(last) = out.events.last_mut()
            && last.timestamp == timestamp
            && let EventKind::Transcription { content: existing } = &mut last.kind
        {
            existing.push_str(MERGE_SEPARATOR);
            existing.push_str(content);
            continue;
        }

        out.events.push(NormalizedEvent { timestamp, date, kind });
        run_broken = false;
    }

    debug!(
        "Normalized {} entries ({} transcriptions, {} images, {} skipped)",
        out.len(),
        out.transcription_count(),
        out.image_count(),
        out.skipped
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raws(items: &[(&str, &str, &str)]) -> Vec<RawEvent> {
        items
            .iter()
            .map(|(kind, ts, payload)| match *kind {
                "t" => RawEvent::transcription(*ts, *payload),
                _ => RawEvent::image(*ts, *payload),
            })
            .collect()
    }

    fn contents(n: &Normalized) -> Vec<String> {
        n.events
            .iter()
            .map(|e| match &e.kind {
                EventKind::Transcription { content } => format!("t:{}", content),
                EventKind::Image { path } => format!("i:{}", path),
            })
            .collect()
    }

    #[test]
    fn test_merges_adjacent_same_timestamp() {
        let n = normalize(raws(&[
            ("t", "2024-01-01 10:00:00", "a"),
            ("t", "2024-01-01 10:00:00", "b"),
            ("i", "2024-01-01 10:00:05", "/x.png"),
        ]));
        assert_eq!(n.len(), 2);
        assert_eq!(n.events[0].content(), Some("a => b"));
        assert_eq!(n.events[1].path(), Some("/x.png"));
        assert_eq!(n.skipped, 0);
    }

    #[test]
    fn test_merge_joins_whole_run_in_order() {
        let n = normalize(raws(&[
            ("t", "2024-01-01 10:00:00", "one"),
            ("t", "2024-01-01 10:00:00", "two"),
            ("t", "2024-01-01 10:00:00", "three"),
            ("t", "2024-01-01 10:00:01", "four"),
        ]));
        assert_eq!(contents(&n), vec!["t:one => two => three", "t:four"]);
    }

    #[test]
    fn test_image_breaks_merge_run() {
        let n = normalize(raws(&[
            ("t", "2024-01-01 10:00:00", "a"),
            ("i", "2024-01-01 10:00:00", "/p.png"),
            ("t", "2024-01-01 10:00:00", "b"),
        ]));
        assert_eq!(contents(&n), vec!["t:a", "i:/p.png", "t:b"]);
    }

    #[test]
    fn test_images_never_merge() {
        let n = normalize(raws(&[
            ("i", "2024-01-01 10:00:00", "/a.png"),
            ("i", "2024-01-01 10:00:00", "/b.png"),
        ]));
        assert_eq!(n.len(), 2);
    }

    #[test]
    fn test_merge_compares_strings_not_instants() {
        // Same instant, different spelling: not merged.
        let n = normalize(raws(&[
            ("t", "2024-01-01 10:00:00", "a"),
            ("t", "2024-01-01T10:00:00", "b"),
        ]));
        assert_eq!(n.len(), 2);
        assert_eq!(n.events[0].date, n.events[1].date);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let first = normalize(raws(&[
            ("t", "2024-01-01 10:00:00", "a"),
            ("t", "2024-01-01 10:00:00", "b"),
            ("i", "2024-01-01 10:00:02", "/x.png"),
            ("t", "2024-01-01 10:00:03", "c"),
            ("t", "2024-01-01 10:00:04", "d"),
        ]));
        let second = normalize(first.events.iter().map(NormalizedEvent::to_raw));
        assert_eq!(first, second);
    }

    #[test]
    fn test_order_preserved() {
        let n = normalize(raws(&[
            ("i", "2024-01-01 10:00:00", "/1.png"),
            ("t", "2024-01-01 10:00:01", "x"),
            ("i", "2024-01-01 10:00:02", "/2.png"),
            ("t", "2024-01-01 10:00:03", "y"),
        ]));
        assert_eq!(contents(&n), vec!["i:/1.png", "t:x", "i:/2.png", "t:y"]);
    }

    #[test]
    fn test_bad_timestamp_skipped_without_breaking_merge() {
        let n = normalize(raws(&[
            ("t", "2024-01-01 10:00:00", "a"),
            ("t", "yesterday-ish", "lost"),
            ("t", "2024-01-01 10:00:00", "b"),
        ]));
        assert_eq!(n.skipped, 1);
        assert_eq!(contents(&n), vec!["t:a => b"]);
    }

    #[test]
    fn test_unknown_entry_skipped_and_ends_merge_run() {
        let n = normalize(vec![
            RawEvent::transcription("2024-01-01 10:00:00", "a"),
            RawEvent::Unknown,
            RawEvent::transcription("2024-01-01 10:00:00", "b"),
            RawEvent::image("2024-01-01 10:00:05", "/x.png"),
        ]);
        assert_eq!(n.skipped, 1);
        assert_eq!(contents(&n), vec!["t:a", "t:b", "i:/x.png"]);
    }

    #[test]
    fn test_unrecognized_type_deserializes_as_unknown() {
        let raw: RawEvent =
            serde_json::from_str(r#"{"type":"audio","timestamp":"2024-01-01 10:00:01","path":"/a.wav"}"#).unwrap();
        assert_eq!(raw, RawEvent::Unknown);
    }

    #[test]
    fn test_empty_input() {
        let n = normalize(Vec::new());
        assert!(n.is_empty());
        assert_eq!(n.skipped, 0);
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let plain = parse_timestamp("2024-01-01 10:00:05").unwrap();
        assert_eq!(format_clock(plain), "10:00:05");

        let iso = parse_timestamp("2024-01-01T10:00:05.250").unwrap();
        assert_eq!(iso.and_utc().timestamp_subsec_millis(), 250);

        let rfc = parse_timestamp("2024-01-01T10:00:05+09:00").unwrap();
        assert_eq!(rfc, plain);

        assert_eq!(
            parse_timestamp("not a date"),
            Err(EventError::BadTimestamp("not a date".into()))
        );
    }

    #[test]
    fn test_time_of_day() {
        let date = parse_timestamp("2024-01-01 10:00:05").unwrap();
        assert_eq!(time_of_day("2024-01-01 10:00:05", date), "10:00:05");
        assert_eq!(time_of_day("2024-01-01T10:00:05", date), "10:00:05");
        assert_eq!(time_of_day("20240101", date), "10:00:05");
    }

    #[test]
    fn test_raw_event_json_shape() {
        let json = r#"[
            {"timestamp": "2024-01-01 10:00:00", "type": "transcription", "content": "hi"},
            {"timestamp": "2024-01-01 10:00:05", "type": "image", "path": "/x.png", "extra": 1}
        ]"#;
        let events: Vec<RawEvent> = serde_json::from_str(json).unwrap();
        assert_eq!(
            events,
            vec![
                RawEvent::transcription("2024-01-01 10:00:00", "hi"),
                RawEvent::image("2024-01-01 10:00:05", "/x.png"),
            ]
        );
    }
}
