//! logview - time-synchronized transcript and image log viewer library
//!
//! Re-exports all modules for use by the binary target.

// Time-axis engine (normalization, mapping, layouts, scroll sync)
pub mod core;

// Feed access
pub mod feed;

// App modules
pub mod app;
pub mod cli;
pub mod paths;
pub mod widgets;

pub use core::event::{NormalizedEvent, RawEvent, normalize};
pub use core::sync::{ScrollSync, SyncFrame};
pub use core::view_model::ViewModel;
pub use feed::{FeedResponse, FeedSource};
