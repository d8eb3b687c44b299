use egui::Color32;

use super::HistoryEngine;
use crate::surface::Surface;

/// Which transient layers go on top of the committed history
#[derive(Debug, Clone, Copy)]
struct Layers {
    live_ink: bool,
    preview: bool,
}

impl HistoryEngine {
    /// Full redraw: `background`, then every committed mark in order, then
    /// the preview on top. `scale` multiplies all coordinates and sizes.
    pub fn render_all(&self, surface: &mut Surface, scale: f32, background: Color32) {
        self.paint(surface, scale, background, Layers {
            live_ink: false,
            preview: true,
        });
    }

    /// Like [`Self::render_all`], with the mark in progress drawn at full
    /// opacity between the history and the preview
    pub fn render_live(&self, surface: &mut Surface, scale: f32, background: Color32) {
        self.paint(surface, scale, background, Layers {
            live_ink: true,
            preview: true,
        });
    }

    /// Committed history only, for export
    pub fn render_export(&self, surface: &mut Surface, scale: f32, background: Color32) {
        self.paint(surface, scale, background, Layers {
            live_ink: false,
            preview: false,
        });
    }

    fn paint(&self, surface: &mut Surface, scale: f32, background: Color32, layers: Layers) {
        surface.fill(background);

        for mark in self.committed() {
            mark.render(surface, scale);
        }

        if layers.live_ink {
            if let Some(mark) = self.in_progress() {
                mark.render(surface, scale);
            }
        }

        if layers.preview {
            if let Some(preview) = self.preview() {
                preview.render_preview(surface, scale);
            }
        }
    }
}
