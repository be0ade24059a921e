//! egui adapters for the three scroll-linked panes and the preview.
//!
//! Every pane is a `ScrollArea` holding one sizer rect whose extent comes from
//! the view model. Elements are painted at `sizer.min + offset`; only the
//! slice visible in the viewport is realized each frame.

use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, Ui, Vec2};
use eframe::egui::scroll_area::ScrollBarVisibility;

use crate::app::session::TranscriptView;
use crate::core::layout::{ImageItem, PaneLayout, RulerTick};
use crate::core::marks::MarkKind;
use crate::core::sync::SyncFrame;

pub const TRANSCRIPT_ROW_HEIGHT: f32 = 18.0;
pub const RULER_WIDTH: f32 = 72.0;
pub const THUMB_WIDTH: f32 = 120.0;
const THUMB_LABEL_HEIGHT: f32 = 16.0;

const HIGHLIGHT: Color32 = Color32::from_rgb(255, 220, 100);

/// Draw the transcript pane. Returns its vertical scroll offset when it holds
/// rows, which drives everything else.
pub fn transcript_pane(ui: &mut Ui, view: TranscriptView<'_>) -> Option<f32> {
    let rows = match view {
        TranscriptView::Loading => {
            ui.centered_and_justified(|ui| ui.spinner());
            return None;
        }
        TranscriptView::Message(message) => {
            ui.label(message);
            return None;
        }
        TranscriptView::Rows(rows) => rows,
    };

    let output = egui::ScrollArea::vertical()
        .id_salt("transcript_scroll")
        .auto_shrink([false, false])
        .show_viewport(ui, |ui, viewport| {
            let width = ui.available_width();
            let (sizer, _) = ui.allocate_exact_size(Vec2::new(width, rows.extent as f32), Sense::hover());

            let lo = (viewport.min.y - TRANSCRIPT_ROW_HEIGHT) as f64;
            for row in rows.visible(lo, viewport.max.y as f64) {
                let row_rect = Rect::from_min_size(
                    Pos2::new(sizer.min.x + 4.0, sizer.min.y + row.offset as f32),
                    Vec2::new(width - 8.0, TRANSCRIPT_ROW_HEIGHT),
                );
                ui.put(row_rect, egui::Label::new(row.item.label.as_str()).truncate())
                    .on_hover_text(row.item.label.as_str());
            }
        });

    Some(output.state.offset.y)
}

/// Draw the ruler, pinned to `scroll` (the transcript offset).
pub fn ruler_pane(ui: &mut Ui, ruler: &PaneLayout<RulerTick>, scroll: f32) {
    egui::ScrollArea::vertical()
        .id_salt("ruler_scroll")
        .auto_shrink([false, false])
        .scroll_bar_visibility(ScrollBarVisibility::AlwaysHidden)
        .vertical_scroll_offset(scroll)
        .show_viewport(ui, |ui, viewport| {
            let (sizer, _) = ui.allocate_exact_size(
                Vec2::new(ui.available_width(), ruler.extent as f32),
                Sense::hover(),
            );
            let painter = ui.painter();
            let color = ui.visuals().weak_text_color();

            for tick in ruler.visible((viewport.min.y - 8.0) as f64, (viewport.max.y + 8.0) as f64) {
                let y = sizer.min.y + tick.offset as f32;
                let len = match tick.item.kind {
                    MarkKind::Minute => 24.0,
                    MarkKind::TenSecond => 14.0,
                    MarkKind::Second => 5.0,
                };
                painter.line_segment(
                    [Pos2::new(sizer.max.x - len, y), Pos2::new(sizer.max.x, y)],
                    Stroke::new(1.0, color),
                );
                if let Some(label) = &tick.item.label {
                    let font = match tick.item.kind {
                        MarkKind::Minute => FontId::monospace(11.0),
                        _ => FontId::monospace(9.0),
                    };
                    painter.text(
                        Pos2::new(sizer.max.x - len - 3.0, y),
                        Align2::RIGHT_CENTER,
                        label,
                        font,
                        color,
                    );
                }
            }
        });
}

/// Draw the horizontal image strip.
///
/// `scroll_to` is applied only when set, so the strip follows the transcript
/// but can still be browsed by hand between transcript scrolls.
pub fn image_strip(
    ui: &mut Ui,
    images: &PaneLayout<ImageItem>,
    uris: &[String],
    frame: Option<&SyncFrame>,
    scroll_to: Option<f32>,
) {
    let mut area = egui::ScrollArea::horizontal()
        .id_salt("image_strip_scroll")
        .auto_shrink([false, false]);
    if let Some(x) = scroll_to {
        area = area.horizontal_scroll_offset(x);
    }

    area.show_viewport(ui, |ui, viewport| {
        let height = ui.available_height();
        // Room past the extent so the last thumbnail is reachable.
        let (sizer, _) = ui.allocate_exact_size(
            Vec2::new(images.extent as f32 + THUMB_WIDTH, height),
            Sense::hover(),
        );

        let lo = (viewport.min.x - THUMB_WIDTH) as f64;
        for index in images.visible_range(lo, viewport.max.x as f64) {
            let image = &images.items[index];
            let container = Rect::from_min_size(
                Pos2::new(sizer.min.x + image.offset as f32, sizer.min.y),
                Vec2::new(THUMB_WIDTH, height),
            );
            let thumb = Rect::from_min_max(
                container.min + Vec2::splat(3.0),
                Pos2::new(container.max.x - 3.0, container.max.y - THUMB_LABEL_HEIGHT),
            );

            if let Some(uri) = uris.get(index) {
                ui.put(thumb, egui::Image::new(uri.clone()).fit_to_exact_size(thumb.size()))
                    .on_hover_text(image.item.path.as_str());
            }

            let painter = ui.painter();
            painter.text(
                Pos2::new(container.center().x, container.max.y - 2.0),
                Align2::CENTER_BOTTOM,
                &image.item.label,
                FontId::monospace(10.0),
                ui.visuals().text_color(),
            );

            if frame.is_some_and(|f| f.is_highlighted(index)) {
                painter.rect_stroke(
                    container.shrink(1.0),
                    4.0,
                    Stroke::new(2.0, HIGHLIGHT),
                    egui::epaint::StrokeKind::Middle,
                );
            }
        }
    });
}

/// Large preview of the active image; hidden when none is active.
pub fn focused_image(ui: &mut Ui, uri: Option<&str>) {
    match uri {
        Some(uri) => {
            ui.centered_and_justified(|ui| {
                ui.add(egui::Image::new(uri.to_string()).shrink_to_fit());
            });
        }
        None => {
            ui.centered_and_justified(|ui| {
                ui.weak("No image at this time");
            });
        }
    }
}
