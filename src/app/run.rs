//! Main application loop - eframe::App implementation.
//!
//! Panel order matters to egui: outer panels first, central panel last.
//! The transcript (central) is therefore drawn after the panes it drives;
//! when its offset changes a repaint is requested so the ruler and strip
//! catch up on the next pass.

use eframe::egui;
use log::{info, trace};

use crate::app::LogViewApp;
use crate::feed::FeedSource;
use crate::widgets::panes;

const STRIP_HEIGHT: f32 = 150.0;
const PREVIEW_WIDTH: f32 = 360.0;

impl eframe::App for LogViewApp {
    /// Flow:
    /// 1. Pick up the feed outcome if it arrived
    /// 2. Top bar (current time, open/reload)
    /// 3. Status bar, image strip, preview, ruler
    /// 4. Transcript, then run the synchronizer on its offset
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_loader();

        let frame = self.sync.last().cloned();
        let mut open_request: Option<FeedSource> = None;

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let label = frame.as_ref().map_or("--:--:--", |f| f.time_label.as_str());
                ui.heading(egui::RichText::new(label).monospace());
                ui.separator();

                if ui.button("Open…").clicked()
                    && let Some(path) = rfd::FileDialog::new()
                        .add_filter("Log feed", &["json"])
                        .set_title("Open Log Feed")
                        .pick_file()
                {
                    open_request = Some(FeedSource::File(path));
                }
                if ui
                    .add_enabled(self.source.is_some(), egui::Button::new("Reload"))
                    .clicked()
                {
                    open_request = self.source.clone();
                }
            });
        });

        if let Some(source) = open_request {
            info!("Opening {}", source);
            self.start_session(source, ctx);
        }

        self.status_bar
            .render(ctx, self.source.as_ref(), &self.state, frame.as_ref());

        let strip_scroll = self.pending_strip_scroll.take();
        let vm = self.state.view_model();

        egui::TopBottomPanel::bottom("image_strip")
            .resizable(true)
            .default_height(STRIP_HEIGHT)
            .show(ctx, |ui| {
                if let Some(vm) = vm {
                    panes::image_strip(ui, &vm.images, &self.image_uris, frame.as_ref(), strip_scroll);
                }
            });

        egui::SidePanel::right("focused_image")
            .resizable(true)
            .default_width(PREVIEW_WIDTH)
            .show(ctx, |ui| panes::focused_image(ui, self.focused_uri()));

        egui::SidePanel::left("ruler")
            .resizable(false)
            .exact_width(panes::RULER_WIDTH)
            .show(ctx, |ui| {
                if let Some(vm) = vm {
                    let scroll = frame.as_ref().map_or(0.0, |f| f.ruler_scroll as f32);
                    panes::ruler_pane(ui, &vm.ruler, scroll);
                }
            });

        let offset = egui::CentralPanel::default()
            .show(ctx, |ui| panes::transcript_pane(ui, self.state.transcript_view()))
            .inner;

        if let Some(offset) = offset
            && self.on_transcript_scroll(offset)
        {
            trace!("Transcript scrolled to {:.1}px", offset);
            ctx.request_repaint();
        }
    }
}
