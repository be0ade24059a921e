//! Viewer session: what is shown for one loaded feed.

use log::{error, info, warn};

use crate::core::axis::Densities;
use crate::core::event::normalize;
use crate::core::layout::{PaneLayout, TranscriptItem};
use crate::core::view_model::ViewModel;
use crate::feed::{FeedResponse, LoadOutcome};

/// Message shown when the feed could not be fetched or parsed.
pub const LOAD_FAILED_MESSAGE: &str = "Error loading log data.";

#[derive(Debug, Default)]
pub enum SessionState {
    #[default]
    Loading,
    Failed {
        message: String,
    },
    Ready(Box<ViewModel>),
}

/// What the transcript pane displays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TranscriptView<'a> {
    Loading,
    /// A single message element, no sizer.
    Message(&'a str),
    Rows(&'a PaneLayout<TranscriptItem>),
}

impl SessionState {
    /// Turn a load outcome into the session state. Called once per session.
    pub fn from_outcome(outcome: LoadOutcome, densities: Densities) -> Self {
        match outcome {
            Ok(FeedResponse::Events(raw)) => {
                info!("Feed delivered {} raw entries", raw.len());
                let normalized = normalize(raw);
                if normalized.skipped > 0 {
                    warn!("{} entries skipped (unknown, incomplete or bad timestamp)", normalized.skipped);
                }
                SessionState::Ready(Box::new(ViewModel::build(normalized, densities)))
            }
            Ok(FeedResponse::Error { error }) => {
                warn!("Feed returned error: {}", error);
                SessionState::Failed {
                    message: format!("Error loading log data: {}", error),
                }
            }
            Err(e) => {
                error!("Error fetching log feed: {:#}", anyhow::Error::from(e));
                SessionState::Failed {
                    message: LOAD_FAILED_MESSAGE.to_string(),
                }
            }
        }
    }

    pub fn view_model(&self) -> Option<&ViewModel> {
        match self {
            SessionState::Ready(vm) => Some(vm),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Loading)
    }

    /// Status bar note for this state: the failure message, otherwise empty.
    pub fn status_message(&self) -> String {
        match self {
            SessionState::Failed { message } => message.clone(),
            SessionState::Loading | SessionState::Ready(_) => String::new(),
        }
    }

    pub fn transcript_view(&self) -> TranscriptView<'_> {
        match self {
            SessionState::Loading => TranscriptView::Loading,
            SessionState::Failed { message } => TranscriptView::Message(message),
            SessionState::Ready(vm) => TranscriptView::Rows(&vm.transcript),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event::RawEvent;
    use crate::feed::{FeedError, parse_feed};

    #[test]
    fn test_error_document_shows_single_message() {
        let outcome = parse_feed(r#"{"error":"not found"}"#.as_bytes(), "test");
        let state = SessionState::from_outcome(outcome, Densities::default());
        assert_eq!(
            state.transcript_view(),
            TranscriptView::Message("Error loading log data: not found")
        );
        assert!(state.view_model().is_none());
    }

    #[test]
    fn test_transport_failure_shows_generic_message() {
        let outcome: LoadOutcome = Err(FeedError::Status {
            url: "http://x/api/gobi-log/a".into(),
            code: 502,
        });
        let state = SessionState::from_outcome(outcome, Densities::default());
        assert_eq!(state.transcript_view(), TranscriptView::Message(LOAD_FAILED_MESSAGE));
        assert_eq!(state.status_message(), LOAD_FAILED_MESSAGE);
    }

    #[test]
    fn test_dead_loader_shows_generic_message() {
        let outcome: LoadOutcome = Err(FeedError::LoaderGone {
            source_name: "day.json".into(),
        });
        let state = SessionState::from_outcome(outcome, Densities::default());
        assert!(!state.is_loading());
        assert_eq!(state.transcript_view(), TranscriptView::Message(LOAD_FAILED_MESSAGE));
    }

    #[test]
    fn test_unknown_entry_renders_rest_of_feed() {
        let body = r#"[
            {"timestamp":"2024-01-01 10:00:00","type":"transcription","content":"a"},
            {"timestamp":"2024-01-01 10:00:01","type":"audio","path":"/a.wav"},
            {"timestamp":"2024-01-01 10:00:05","type":"image","path":"/x.png"}
        ]"#;
        let state = SessionState::from_outcome(parse_feed(body.as_bytes(), "test"), Densities::default());
        let vm = state.view_model().unwrap();
        assert_eq!(vm.events.len(), 2);
        assert_eq!(vm.skipped, 1);
        assert_eq!(vm.images.len(), 1);
        assert!(state.status_message().is_empty());
    }

    #[test]
    fn test_events_build_view_model() {
        let outcome = Ok(FeedResponse::Events(vec![
            RawEvent::transcription("2024-01-01 10:00:00", "a"),
            RawEvent::transcription("2024-01-01 10:00:00", "b"),
            RawEvent::image("2024-01-01 10:00:05", "/x.png"),
        ]));
        let state = SessionState::from_outcome(outcome, Densities::default());
        let vm = state.view_model().unwrap();
        assert_eq!(vm.events.len(), 2);
        match state.transcript_view() {
            TranscriptView::Rows(rows) => {
                assert_eq!(rows.len(), 1);
                assert_eq!(rows.extent, 100.0);
            }
            other => panic!("unexpected transcript view {:?}", other),
        }
    }

    #[test]
    fn test_empty_feed_is_ready_but_blank() {
        let state = SessionState::from_outcome(Ok(FeedResponse::Events(Vec::new())), Densities::default());
        let vm = state.view_model().unwrap();
        assert!(!vm.has_timeline());
        assert!(matches!(state.transcript_view(), TranscriptView::Rows(rows) if rows.is_empty() && rows.extent == 0.0));
    }

    #[test]
    fn test_default_is_loading() {
        let state = SessionState::default();
        assert!(state.is_loading());
        assert_eq!(state.transcript_view(), TranscriptView::Loading);
    }
}
