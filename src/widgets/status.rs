use eframe::egui;

use crate::app::session::SessionState;
use crate::core::sync::SyncFrame;
use crate::feed::FeedSource;

/// Status bar at the bottom of the window
pub struct StatusBar {
    pub current_message: String,
}

impl Default for StatusBar {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusBar {
    pub fn new() -> Self {
        Self {
            current_message: String::new(),
        }
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.current_message = message.into();
    }

    pub fn render(
        &self,
        ctx: &egui::Context,
        source: Option<&FeedSource>,
        state: &SessionState,
        frame: Option<&SyncFrame>,
    ) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                // Feed
                match source {
                    Some(source) => ui.monospace(source.display_name()),
                    None => ui.monospace("No feed"),
                };

                ui.separator();

                match state {
                    SessionState::Loading => {
                        ui.monospace("Loading...");
                    }
                    SessionState::Failed { .. } => {
                        ui.monospace("Failed");
                    }
                    SessionState::Ready(vm) => {
                        let transcripts = vm.events.iter().filter(|e| e.is_transcription()).count();
                        ui.monospace(format!("{} lines | {} images", transcripts, vm.images.len()));
                        if vm.skipped > 0 {
                            ui.separator();
                            ui.monospace(format!("{} skipped", vm.skipped));
                        }
                        ui.separator();
                        ui.monospace(format_duration(vm.total_duration_seconds()));
                    }
                }

                // Active image
                if let Some(frame) = frame {
                    ui.separator();
                    match frame.active_image {
                        Some(i) => ui.monospace(format!("image #{}", i + 1)),
                        None => ui.monospace("no image"),
                    };
                }

                if !self.current_message.is_empty() {
                    ui.separator();
                    ui.monospace(self.current_message.as_str());
                }
            });
        });
    }
}

/// `H:MM:SS` for a span in seconds.
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0).round() as u64;
    format!("{}:{:02}:{:02}", total / 3600, total / 60 % 60, total % 60)
}
