//! Log feed access.
//!
//! # Purpose
//!
//! Fetches the raw event list the viewer displays. The feed is produced by an
//! external service; this module only reads it.
//!
//! # Sources
//!
//! | Source | Location |
//! |--------|----------|
//! | HTTP   | `GET <base>/api/<endpoint>/<log>` |
//! | File   | local JSON document of the same shape |
//!
//! Either way the body is a JSON array of events or `{"error": "..."}`.
//!
//! # Threading
//!
//! ```text
//! ┌──────────────────────┐     crossbeam channel     ┌──────────────────┐
//! │  logview-feed thread │  ─── LoadOutcome ──────▶  │  UI thread       │
//! │  (blocking ureq)     │                           │  (polls per frame)│
//! └──────────────────────┘                           └──────────────────┘
//! ```
//!
//! One fetch per session. No retries, no cancellation.

mod client;
mod loader;

pub use client::{DEFAULT_ENDPOINT, FeedError, FeedResponse, FeedSource, fetch, parse_feed};
pub use loader::{FeedLoader, LoadOutcome};
