use egui::{pos2, vec2, Color32, Rect, Sense};

use crate::PaintApp;

pub fn central_panel(app: &mut PaintApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let canvas_size = vec2(app.settings().width as f32, app.settings().height as f32);
        let available = ui.available_size();
        // Whole-pixel display zoom keeps the NEAREST-sampled canvas crisp
        let zoom = (available.x / canvas_size.x)
            .min(available.y / canvas_size.y)
            .floor()
            .max(1.0);

        let (rect, response) = ui.allocate_exact_size(canvas_size * zoom, Sense::drag());
        if response.hovered() {
            ctx.set_cursor_icon(egui::CursorIcon::Crosshair);
        }

        app.handle_canvas_input(ctx, rect, zoom);

        let texture = app.canvas_texture(ctx).id();
        let uv = Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));
        let painter = ui.painter();
        painter.image(texture, rect, uv, Color32::WHITE);
        painter.rect_stroke(rect, 0.0, ui.visuals().widgets.noninteractive.bg_stroke);
    });
}
