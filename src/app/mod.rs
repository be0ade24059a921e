//! Application module - LogViewApp and related functionality.
//!
//! - `session` - session state derived from one feed load (pure, testable)
//! - `run` - eframe::App implementation (panel layout, per-frame flow)

mod run;
pub mod session;

use eframe::egui;
use log::{error, info};

use crate::core::axis::Densities;
use crate::core::sync::ScrollSync;
use crate::feed::{FeedLoader, FeedSource};
use crate::widgets::StatusBar;

use session::{LOAD_FAILED_MESSAGE, SessionState};

/// Main application state.
///
/// One session per feed. Opening or reloading a feed replaces the session
/// wholesale; nothing carries over.
pub struct LogViewApp {
    pub source: Option<FeedSource>,
    pub state: SessionState,
    pub sync: ScrollSync,
    pub status_bar: StatusBar,
    /// Loader URIs for `ViewModel::images`, same order.
    pub image_uris: Vec<String>,
    loader: Option<FeedLoader>,
    densities: Densities,
    /// Strip offset to apply on the next frame, set by transcript scrolls.
    pending_strip_scroll: Option<f32>,
}

impl LogViewApp {
    pub fn new(cc: &eframe::CreationContext<'_>, source: Option<FeedSource>) -> Self {
        egui_extras::install_image_loaders(&cc.egui_ctx);

        let mut app = Self {
            source: None,
            state: SessionState::Loading,
            sync: ScrollSync::new(),
            status_bar: StatusBar::new(),
            image_uris: Vec::new(),
            loader: None,
            densities: Densities::default(),
            pending_strip_scroll: None,
        };

        match source {
            Some(source) => app.start_session(source, &cc.egui_ctx),
            None => {
                app.state = SessionState::Failed {
                    message: "No log selected. Use Open to pick a log file.".to_string(),
                };
            }
        }
        app
    }

    /// Begin a fresh session for `source`.
    pub fn start_session(&mut self, source: FeedSource, ctx: &egui::Context) {
        info!("Starting session for {}", source);

        self.state = SessionState::Loading;
        self.loader = None;
        self.sync.reset();
        self.image_uris.clear();
        self.pending_strip_scroll = None;
        ctx.forget_all_images();
        ctx.send_viewport_cmd(egui::ViewportCommand::Title(format!(
            "logview • {}",
            source.display_name()
        )));

        let repaint_ctx = ctx.clone();
        match FeedLoader::spawn(source.clone(), move || repaint_ctx.request_repaint()) {
            Ok(loader) => {
                self.status_bar.set_message(format!("Fetching {}", loader.source()));
                self.loader = Some(loader);
            }
            Err(e) => {
                error!("Failed to start feed loader: {}", e);
                self.state = SessionState::Failed {
                    message: LOAD_FAILED_MESSAGE.to_string(),
                };
                self.status_bar.set_message(self.state.status_message());
            }
        }
        self.source = Some(source);
    }

    /// Pick up the load outcome if it has arrived.
    fn poll_loader(&mut self) {
        let Some(outcome) = self.loader.as_ref().and_then(FeedLoader::poll) else {
            return;
        };
        self.loader = None;
        self.state = SessionState::from_outcome(outcome, self.densities);
        self.status_bar.set_message(self.state.status_message());

        if let (Some(vm), Some(source)) = (self.state.view_model(), &self.source) {
            self.image_uris = vm
                .images
                .items
                .iter()
                .map(|img| source.resolve_image(&img.item.path))
                .collect();
        }
    }

    /// Feed one transcript scroll position through the synchronizer.
    /// Returns true when the panes need another frame to catch up.
    fn on_transcript_scroll(&mut self, offset: f32) -> bool {
        let Some(vm) = self.state.view_model() else {
            return false;
        };
        if !self.sync.on_scroll(vm, offset as f64) {
            return false;
        }
        self.pending_strip_scroll = self.sync.last().map(|f| f.image_scroll_x as f32);
        true
    }

    fn focused_uri(&self) -> Option<&str> {
        let index = self.sync.last()?.active_image?;
        self.image_uris.get(index).map(String::as_str)
    }
}
