use egui::color_picker::{color_edit_button_srgba, Alpha};

use crate::components::ToolButton;
use crate::tool::ActiveTool;
use crate::PaintApp;

pub fn tools_panel(app: &mut PaintApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(200.0)
        .show(ctx, |ui| {
            ui.heading("Tools");
            marker_section(app, ui);
            ui.separator();
            sticker_section(app, ui);
            ui.separator();
            history_section(app, ui);

            if let Some(status) = app.status() {
                ui.separator();
                ui.label(status);
            }
        });
}

fn marker_section(app: &mut PaintApp, ui: &mut egui::Ui) {
    let active = app.tools().active();
    let thickness = app.tools().marker().thickness;
    let thin = app.settings().thin_thickness;
    let thick = app.settings().thick_thickness;

    ui.label("Marker");
    ui.horizontal(|ui| {
        let is_thin = active == ActiveTool::Marker && thickness == thin;
        if ToolButton::new("✏", is_thin).show(ui).clicked() {
            app.select_marker(thin);
        }
        let is_thick = active == ActiveTool::Marker && thickness == thick;
        if ToolButton::new("🖊", is_thick).show(ui).clicked() {
            app.select_marker(thick);
        }

        let mut color = app.tools().marker().color;
        if color_edit_button_srgba(ui, &mut color, Alpha::Opaque).changed() {
            app.set_color(color);
        }
    });
}

fn sticker_section(app: &mut PaintApp, ui: &mut egui::Ui) {
    let stickers = app.settings().stickers.clone();
    let selected = (app.tools().active() == ActiveTool::Sticker).then(|| app.tools().sticker().glyph.clone());

    ui.label("Stickers");
    ui.horizontal_wrapped(|ui| {
        for glyph in &stickers {
            let is_selected = selected.as_deref() == Some(glyph.as_str());
            if ToolButton::new(glyph, is_selected).show(ui).clicked() {
                log::info!("Sticker selected from UI: {}", glyph);
                app.select_sticker(glyph);
            }
        }
    });

    ui.horizontal(|ui| {
        let field = ui.add(egui::TextEdit::singleline(app.custom_sticker_mut()).desired_width(80.0).hint_text("Custom"));
        let submitted = field.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if ui.button("Add").clicked() || submitted {
            app.add_custom_sticker();
        }
    });

    let mut rotation = app.tools().sticker().rotation;
    if ui
        .add(egui::Slider::new(&mut rotation, 0.0..=359.0).text("Rotation").suffix("°"))
        .changed()
    {
        app.set_rotation(rotation);
    }

    let mut size = app.tools().sticker().size;
    if ui.add(egui::Slider::new(&mut size, 8.0..=96.0).text("Size")).changed() {
        app.set_sticker_size(size);
    }
}

fn history_section(app: &mut PaintApp, ui: &mut egui::Ui) {
    ui.horizontal(|ui| {
        let can_undo = app.engine().can_undo();
        let can_redo = app.engine().can_redo();

        if ui.add_enabled(can_undo, egui::Button::new("Undo")).clicked() {
            app.apply(crate::input::InputEvent::Undo);
        }
        if ui.add_enabled(can_redo, egui::Button::new("Redo")).clicked() {
            app.apply(crate::input::InputEvent::Redo);
        }
        if ui.button("Clear").clicked() {
            app.apply(crate::input::InputEvent::Clear);
        }
    });

    ui.horizontal(|ui| {
        ui.label(format!("History: {}", app.engine().committed().len()));
        ui.label(format!("Redo: {}", app.engine().redo_len()));
    });

    #[cfg(not(target_arch = "wasm32"))]
    {
        if ui.button("Export PNG").clicked() {
            app.export();
        }
    }
}
