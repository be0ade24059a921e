//! UI widgets: pane adapters and the status bar.

pub mod panes;
pub mod status;

pub use status::StatusBar;
