//! Background feed loading.
//!
//! The fetch is the only blocking operation in the viewer. It runs once on
//! its own thread and hands the result to the UI thread through a channel.

use std::thread;

use crossbeam_channel::{Receiver, TryRecvError, bounded};
use log::{debug, warn};

use super::client::{FeedError, FeedResponse, FeedSource, fetch};

/// Result of one load attempt.
pub type LoadOutcome = Result<FeedResponse, FeedError>;

/// Handle to an in-flight fetch.
pub struct FeedLoader {
    source: FeedSource,
    rx: Receiver<LoadOutcome>,
    _handle: thread::JoinHandle<()>,
}

impl FeedLoader {
    /// Start fetching `source` on a background thread.
    ///
    /// `on_done` runs on that thread after the outcome is sent; the UI uses it
    /// to request a repaint.
    pub fn spawn<F>(source: FeedSource, on_done: F) -> std::io::Result<Self>
    where
        F: FnOnce() + Send + 'static,
    {
        let (tx, rx) = bounded(1);
        let thread_source = source.clone();

        let handle = thread::Builder::new()
            .name("logview-feed".to_string())
            .spawn(move || {
                debug!("Feed loader started for {}", thread_source);
                let outcome = fetch(&thread_source);
                // Receiver gone means the session was replaced; nothing to do.
                let _ = tx.send(outcome);
                on_done();
                debug!("Feed loader finished");
            })?;

        Ok(Self {
            source,
            rx,
            _handle: handle,
        })
    }

    pub fn source(&self) -> &FeedSource {
        &self.source
    }

    /// Non-blocking check for the outcome. `Some` exactly once; a loader
    /// thread that died without sending yields `FeedError::LoaderGone`.
    pub fn poll(&self) -> Option<LoadOutcome> {
        match self.rx.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                warn!("Feed loader thread for {} exited without a result", self.source);
                Some(Err(self.gone()))
            }
        }
    }

    /// Block until the outcome arrives. Used by tests and headless callers.
    pub fn wait(self) -> LoadOutcome {
        self.rx.recv().unwrap_or_else(|_| Err(self.gone()))
    }

    fn gone(&self) -> FeedError {
        FeedError::LoaderGone {
            source_name: self.source.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loader_delivers_file_outcome() {
        let path = std::env::temp_dir().join("logview_loader_feed.json");
        std::fs::write(&path, r#"{"error":"gone"}"#).unwrap();

        let loader = FeedLoader::spawn(FeedSource::File(path.clone()), || {}).unwrap();
        assert_eq!(loader.source(), &FeedSource::File(path.clone()));

        let outcome = loader.wait();
        assert_eq!(outcome.unwrap(), FeedResponse::Error { error: "gone".into() });
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_loader_reports_failure() {
        let path = std::env::temp_dir().join("logview_loader_missing.json");
        let loader = FeedLoader::spawn(FeedSource::File(path), || {}).unwrap();
        assert!(matches!(loader.wait(), Err(FeedError::Io { .. })));
    }

    #[test]
    fn test_dead_loader_thread_is_terminal() {
        let (tx, rx) = bounded::<LoadOutcome>(1);
        let loader = FeedLoader {
            source: FeedSource::File("day.json".into()),
            rx,
            _handle: thread::spawn(move || drop(tx)),
        };
        let outcome = loop {
            if let Some(outcome) = loader.poll() {
                break outcome;
            }
            thread::yield_now();
        };
        assert!(matches!(outcome, Err(FeedError::LoaderGone { .. })));
    }
}
