//! Pane layouts: positioned elements for the three panes.
//!
//! Each function is pure `(events, mapping) -> PaneLayout`. The egui side only
//! draws what is in here, so nothing is re-derived per scroll tick.

use std::ops::Range;

use chrono::NaiveDateTime;
use log::warn;

use super::axis::AxisMapping;
use super::event::{EventKind, NormalizedEvent};
use super::marks::{MarkKind, time_marks};

/// Element placed at `offset` pixels along its pane's axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Positioned<T> {
    pub offset: f64,
    pub item: T,
}

/// All elements of one pane plus the sizer extent along the pane axis.
#[derive(Debug, Clone, PartialEq)]
pub struct PaneLayout<T> {
    pub extent: f64,
    pub items: Vec<Positioned<T>>,
}

impl<T> Default for PaneLayout<T> {
    fn default() -> Self {
        Self {
            extent: 0.0,
            items: Vec::new(),
        }
    }
}

impl<T> PaneLayout<T> {
    /// Layout with `items` stable-sorted by offset. Feeds are normally in time
    /// order already; ties keep their input order.
    pub fn new(extent: f64, mut items: Vec<Positioned<T>>, pane: &str) -> Self {
        if items.windows(2).any(|w| w[1].offset < w[0].offset) {
            warn!("{} entries are out of time order; sorting by time", pane);
            items.sort_by(|a, b| a.offset.total_cmp(&b.offset));
        }
        Self { extent, items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Positions of the items with `lo <= offset < hi`.
    pub fn visible_range(&self, lo: f64, hi: f64) -> Range<usize> {
        let first = self.items.partition_point(|p| p.offset < lo);
        let last = self.items.partition_point(|p| p.offset < hi);
        first..last.max(first)
    }

    /// Items with `lo <= offset < hi`.
    pub fn visible(&self, lo: f64, hi: f64) -> &[Positioned<T>] {
        &self.items[self.visible_range(lo, hi)]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptItem {
    /// Index into the normalized event list.
    pub event_index: usize,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RulerTick {
    pub kind: MarkKind,
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageItem {
    pub event_index: usize,
    pub path: String,
    pub date: NaiveDateTime,
    /// Time of day shown under the thumbnail.
    pub label: String,
}

/// One row per transcription, at its vertical offset.
pub fn layout_transcript(events: &[NormalizedEvent], mapping: &AxisMapping) -> PaneLayout<TranscriptItem> {
    let items = events
        .iter()
        .enumerate()
        .filter_map(|(event_index, event)| match &event.kind {
            EventKind::Transcription { content } => Some(Positioned {
                offset: mapping.vertical_offset(event.date),
                item: TranscriptItem {
                    event_index,
                    label: format!("[{}] {}", event.time_of_day(), content),
                },
            }),
            EventKind::Image { .. } => None,
        })
        .collect();

    PaneLayout::new(mapping.vertical_extent(), items, "Transcript")
}

/// One tick per second of the range.
pub fn layout_ruler(mapping: &AxisMapping) -> PaneLayout<RulerTick> {
    let items = time_marks(mapping.start(), mapping.end())
        .map(|mark| Positioned {
            offset: mapping.vertical_offset(mark.time),
            item: RulerTick {
                kind: mark.kind,
                label: mark.label,
            },
        })
        .collect();

    PaneLayout {
        extent: mapping.vertical_extent(),
        items,
    }
}

/// One thumbnail per image, at its horizontal offset.
pub fn layout_images(events: &[NormalizedEvent], mapping: &AxisMapping) -> PaneLayout<ImageItem> {
    let items = events
        .iter()
        .enumerate()
        .filter_map(|(event_index, event)| match &event.kind {
            EventKind::Image { path } => Some(Positioned {
                offset: mapping.horizontal_offset(event.date),
                item: ImageItem {
                    event_index,
                    path: path.clone(),
                    date: event.date,
                    label: event.time_of_day(),
                },
            }),
            EventKind::Transcription { .. } => None,
        })
        .collect();

    PaneLayout::new(mapping.horizontal_extent(), items, "Image")
}
