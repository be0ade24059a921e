//! Scroll synchronizer.
//!
//! The transcript pane is the primary scroller. Every scroll tick turns its
//! vertical offset back into a time and derives, from that time alone, what
//! the other panes show:
//!
//! ```text
//!  transcript scroll_y ──▶ current_time ──┬──▶ time label
//!                                         ├──▶ ruler scroll_y   (= scroll_y)
//!                                         ├──▶ image scroll_x   (horizontal map)
//!                                         └──▶ active image ──▶ focused preview
//! ```
//!
//! The ruler shares the vertical density, so it copies the pixel offset. The
//! image strip has its own density and is re-derived through time.

use chrono::NaiveDateTime;
use log::trace;

use super::event::format_clock;
use super::view_model::ViewModel;

/// Everything the panes need for one scroll position.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncFrame {
    pub scroll_offset: f64,
    pub current_time: NaiveDateTime,
    pub time_label: String,
    pub ruler_scroll: f64,
    pub image_scroll_x: f64,
    /// Index into `ViewModel::images.items`.
    pub active_image: Option<usize>,
    /// Path of the active image, shown in the preview panel.
    pub focused_image: Option<String>,
}

impl SyncFrame {
    pub fn is_highlighted(&self, image_index: usize) -> bool {
        self.active_image == Some(image_index)
    }
}

/// Derive the synchronized state for transcript offset `scroll_offset`.
///
/// `None` when the log has no time range.
pub fn sync_frame(model: &ViewModel, scroll_offset: f64) -> Option<SyncFrame> {
    let mapping = model.mapping.as_ref()?;

    let current_time = mapping.time_at_vertical(scroll_offset);
    let active_image = model.active_image_at(current_time);
    let focused_image = active_image
        .and_then(|i| model.image(i))
        .map(|img| img.path.clone());

    Some(SyncFrame {
        scroll_offset,
        current_time,
        time_label: format_clock(current_time),
        ruler_scroll: scroll_offset,
        image_scroll_x: mapping.horizontal_offset(current_time),
        active_image,
        focused_image,
    })
}

/// Holds the last derived frame so callers can tell when something changed.
#[derive(Debug, Clone, Default)]
pub struct ScrollSync {
    last: Option<SyncFrame>,
}

impl ScrollSync {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&SyncFrame> {
        self.last.as_ref()
    }

    /// Handle one scroll event. Returns true when the derived frame differs
    /// from the previous one.
    pub fn on_scroll(&mut self, model: &ViewModel, scroll_offset: f64) -> bool {
        if self.last.as_ref().is_some_and(|f| f.scroll_offset == scroll_offset) {
            return false;
        }

        let frame = sync_frame(model, scroll_offset);
        let changed = frame != self.last;
        if changed && let Some(f) = &frame {
            let prev_active = self.last.as_ref().and_then(|l| l.active_image);
            if prev_active != f.active_image {
                trace!(
                    "Active image {:?} -> {:?} at {}",
                    prev_active, f.active_image, f.time_label
                );
            }
        }
        self.last = frame;
        changed
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::axis::Densities;
    use crate::core::event::{RawEvent, normalize, parse_timestamp};

    fn scenario() -> ViewModel {
        ViewModel::build(
            normalize(vec![
                RawEvent::transcription("2024-01-01 10:00:00", "a"),
                RawEvent::transcription("2024-01-01 10:00:00", "b"),
                RawEvent::image("2024-01-01 10:00:05", "/x.png"),
            ]),
            Densities::default(),
        )
    }

    #[test]
    fn test_scenario_merge_and_image_offset() {
        let vm = scenario();
        assert_eq!(vm.events.len(), 2);
        assert_eq!(vm.events[0].content(), Some("a => b"));
        assert_eq!(vm.images.items[0].offset, 50.0);
    }

    #[test]
    fn test_top_of_log() {
        let vm = scenario();
        let f = sync_frame(&vm, 0.0).unwrap();
        assert_eq!(f.time_label, "10:00:00");
        assert_eq!(f.ruler_scroll, 0.0);
        assert_eq!(f.image_scroll_x, 0.0);
        assert_eq!(f.active_image, None);
        assert_eq!(f.focused_image, None);
    }

    #[test]
    fn test_scroll_to_image_time_activates_it() {
        let vm = scenario();
        let mapping = vm.mapping.unwrap();
        let image_y = mapping.vertical_offset(parse_timestamp("2024-01-01 10:00:05").unwrap());
        assert_eq!(image_y, 100.0);

        let f = sync_frame(&vm, image_y).unwrap();
        assert_eq!(f.active_image, Some(0));
        assert!(f.is_highlighted(0));
        assert_eq!(f.focused_image.as_deref(), Some("/x.png"));
        assert_eq!(f.image_scroll_x, 50.0);
        assert_eq!(f.ruler_scroll, 100.0);

        let before = sync_frame(&vm, image_y - 1.0).unwrap();
        assert_eq!(before.active_image, None);
    }

    #[test]
    fn test_horizontal_rederived_through_time() {
        let vm = scenario();
        let f = sync_frame(&vm, 37.0).unwrap();
        // 37 px / 20 px/s = 1.85 s -> 18.5 px at 10 px/s
        assert_eq!(f.image_scroll_x, 18.5);
        assert_eq!(f.ruler_scroll, 37.0);
    }

    #[test]
    fn test_no_timeline_no_frame() {
        let vm = ViewModel::build(
            normalize(vec![RawEvent::image("2024-01-01 10:00:00", "/x.png")]),
            Densities::default(),
        );
        assert!(sync_frame(&vm, 0.0).is_none());
        let mut sync = ScrollSync::new();
        assert!(!sync.on_scroll(&vm, 10.0));
        assert!(sync.last().is_none());
    }

    #[test]
    fn test_on_scroll_reports_changes() {
        let vm = scenario();
        let mut sync = ScrollSync::new();
        assert!(sync.on_scroll(&vm, 0.0));
        assert!(!sync.on_scroll(&vm, 0.0));
        assert!(sync.on_scroll(&vm, 120.0));
        assert_eq!(sync.last().unwrap().active_image, Some(0));
        sync.reset();
        assert!(sync.last().is_none());
    }
}
