//! Compute-once view model.
//!
//! Built when the feed arrives and never mutated. Panes and the scroll
//! synchronizer borrow it; nothing about the log lives in globals.

use chrono::NaiveDateTime;
use log::{info, warn};

use super::axis::{AxisMapping, Densities, TimeRange};
use super::event::{Normalized, NormalizedEvent};
use super::layout::{ImageItem, PaneLayout, RulerTick, TranscriptItem, layout_images, layout_ruler, layout_transcript};

#[derive(Debug, Clone, Default)]
pub struct ViewModel {
    pub events: Vec<NormalizedEvent>,
    /// Entries dropped during normalization.
    pub skipped: usize,
    /// `None` for fewer than two events: nothing is laid out.
    pub mapping: Option<AxisMapping>,
    pub transcript: PaneLayout<TranscriptItem>,
    pub ruler: PaneLayout<RulerTick>,
    /// Sorted by time, so `images.items` positions double as image indices.
    pub images: PaneLayout<ImageItem>,
}

impl ViewModel {
    pub fn build(normalized: Normalized, densities: Densities) -> Self {
        let Normalized { events, skipped } = normalized;
        let mapping = TimeRange::from_events(&events).map(|range| AxisMapping::new(range, densities));

        let Some(mapping) = mapping else {
            info!("Log has {} entries, nothing to lay out", events.len());
            return Self {
                events,
                skipped,
                ..Default::default()
            };
        };

        if mapping.range.end < mapping.range.start {
            warn!(
                "Log ends before it starts ({} < {}); panes will be empty",
                mapping.range.end, mapping.range.start
            );
        }

        let transcript = layout_transcript(&events, &mapping);
        let ruler = layout_ruler(&mapping);
        let images = layout_images(&events, &mapping);

        info!(
            "View model: {:.1}s span, {} transcript rows, {} ruler ticks, {} images",
            mapping.total_duration_seconds(),
            transcript.len(),
            ruler.len(),
            images.len()
        );

        Self {
            events,
            skipped,
            mapping: Some(mapping),
            transcript,
            ruler,
            images,
        }
    }

    pub fn has_timeline(&self) -> bool {
        self.mapping.is_some()
    }

    pub fn total_duration_seconds(&self) -> f64 {
        self.mapping.as_ref().map_or(0.0, AxisMapping::total_duration_seconds)
    }

    pub fn image(&self, index: usize) -> Option<&ImageItem> {
        self.images.items.get(index).map(|p| &p.item)
    }

    /// Index (into `images.items`) of the latest image at or before `t`.
    pub fn active_image_at(&self, t: NaiveDateTime) -> Option<usize> {
        let count = self.images.items.partition_point(|p| p.item.date <= t);
        count.checked_sub(1)
    }

    /// Same answer as [`active_image_at`](Self::active_image_at) by scanning
    /// from the last image backwards.
    pub fn active_image_linear(&self, t: NaiveDateTime) -> Option<usize> {
        self.images.items.iter().rposition(|p| p.item.date <= t)
    }
}
