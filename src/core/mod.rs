//! Core time-axis engine - independent of UI.
//!
//! Leaf-first: `event` (normalizer) → `axis` + `marks` (mapping) → `layout`
//! (pane elements) → `view_model` (built once) → `sync` (per scroll tick).

pub mod axis;
pub mod event;
pub mod layout;
pub mod marks;
pub mod sync;
pub mod view_model;

// Re-exports for convenience
pub use axis::{AxisMapping, Densities, TimeRange};
pub use event::{EventKind, Normalized, NormalizedEvent, RawEvent, normalize};
pub use sync::{ScrollSync, SyncFrame, sync_frame};
pub use view_model::ViewModel;
