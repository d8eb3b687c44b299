use std::path::Path;
use std::sync::Arc;

use egui::{Color32, Rect, TextureHandle, TextureOptions};
use log::{info, warn};

use crate::event::LoggingHandler;
use crate::glyph::GlyphRasterizer;
use crate::history::HistoryEngine;
use crate::input::{route_event, InputEvent, InputHandler};
use crate::panels::{central_panel, tools_panel};
use crate::settings::{CanvasSettings, SETTINGS_FILE};
use crate::surface::Surface;
use crate::tool::ToolBox;

/// The on-screen canvas: its pixels and the texture showing them
struct CanvasView {
    surface: Surface,
    texture: TextureHandle,
}

/// We derive Deserialize/Serialize so we can persist settings and tool
/// state on shutdown. The drawing itself is not persisted.
#[derive(serde::Deserialize, serde::Serialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct PaintApp {
    settings: CanvasSettings,
    tools: ToolBox,
    #[serde(skip)]
    engine: HistoryEngine,
    #[serde(skip)]
    input: InputHandler,
    #[serde(skip)]
    canvas: Option<CanvasView>,
    #[serde(skip, default = "GlyphRasterizer::shared")]
    glyphs: Arc<GlyphRasterizer>,
    /// Text typed into the custom sticker field
    #[serde(skip)]
    custom_sticker: String,
    /// Last message shown under the tool panel
    #[serde(skip)]
    status: Option<String>,
}

impl Default for PaintApp {
    fn default() -> Self {
        Self::with_settings(CanvasSettings::default())
    }
}

impl PaintApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let restored: Option<Self> = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY));

        let mut app = match restored {
            Some(app) if app.settings.validate().is_ok() && app.tools.validate().is_ok() => {
                info!("⚙️ Restored settings and tools from app storage");
                let glyphs = glyphs_for(&app.settings);
                Self { glyphs, ..app }
            }
            Some(_) => {
                warn!("⚠️ Stored settings or tools are invalid, starting fresh");
                Self::default()
            }
            None => Self::with_settings(CanvasSettings::load_or_default(Path::new(SETTINGS_FILE))),
        };

        app.engine.subscribe(Box::new(LoggingHandler));
        app
    }

    pub fn with_settings(settings: CanvasSettings) -> Self {
        Self {
            tools: ToolBox::from_settings(&settings),
            glyphs: glyphs_for(&settings),
            settings,
            engine: HistoryEngine::new(),
            input: InputHandler::new(),
            canvas: None,
            custom_sticker: String::new(),
            status: None,
        }
    }

    pub fn settings(&self) -> &CanvasSettings {
        &self.settings
    }

    pub fn tools(&self) -> &ToolBox {
        &self.tools
    }

    pub fn engine(&self) -> &HistoryEngine {
        &self.engine
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn custom_sticker_mut(&mut self) -> &mut String {
        &mut self.custom_sticker
    }

    /// Routes one input event into the engine, logging rejected input
    pub fn apply(&mut self, event: InputEvent) {
        if let Err(err) = route_event(&event, &mut self.engine, &self.tools) {
            warn!("⚠️ Ignored {:?}: {}", event, err);
        }
    }

    pub fn select_marker(&mut self, thickness: f32) {
        self.tools.select_marker(thickness);
        self.apply(InputEvent::ToolChanged);
    }

    pub fn select_sticker(&mut self, glyph: &str) {
        self.tools.select_sticker(glyph);
        self.apply(InputEvent::ToolChanged);
    }

    pub fn set_color(&mut self, color: Color32) {
        self.tools.set_color(color);
        self.apply(InputEvent::ToolChanged);
    }

    pub fn set_rotation(&mut self, degrees: f32) {
        self.tools.set_rotation(degrees);
        self.apply(InputEvent::ToolChanged);
    }

    pub fn set_sticker_size(&mut self, size: f32) {
        self.tools.set_sticker_size(size);
        self.apply(InputEvent::ToolChanged);
    }

    /// Adds the typed glyph to the palette and selects it
    pub fn add_custom_sticker(&mut self) {
        let glyph = std::mem::take(&mut self.custom_sticker);
        let glyph = glyph.trim();
        if glyph.is_empty() {
            return;
        }
        self.settings.add_sticker(glyph);
        self.select_sticker(glyph);
    }

    /// Writes the committed drawing to the configured export path
    #[cfg(not(target_arch = "wasm32"))]
    pub fn export(&mut self) {
        let path = self.settings.export_path.clone();
        let result = crate::export::export_png(&self.engine, &self.settings, Arc::clone(&self.glyphs), &path);
        self.status = Some(match result {
            Ok(()) => format!("Saved {}", path.display()),
            Err(err) => {
                warn!("⚠️ Export failed: {}", err);
                format!("Export failed: {}", err)
            }
        });
    }

    /// Lays out input for this frame's canvas rect and feeds it to the engine
    pub fn handle_canvas_input(&mut self, ctx: &egui::Context, rect: Rect, zoom: f32) {
        self.input.set_canvas_rect(rect, zoom);
        for event in self.input.process_input(ctx) {
            self.apply(event);
        }
    }

    /// The canvas texture, re-rendered from the history when anything changed
    pub fn canvas_texture(&mut self, ctx: &egui::Context) -> &TextureHandle {
        let redraw = self.engine.take_needs_redraw();
        let background = self.settings.background;

        let view = match self.canvas.take() {
            Some(mut view) => {
                if redraw {
                    self.engine.render_live(&mut view.surface, 1.0, background);
                    view.texture.set(view.surface.to_color_image(), TextureOptions::NEAREST);
                }
                view
            }
            None => {
                let mut surface =
                    Surface::with_glyphs(self.settings.width, self.settings.height, Arc::clone(&self.glyphs));
                self.engine.render_live(&mut surface, 1.0, background);
                let texture = ctx.load_texture("canvas", surface.to_color_image(), TextureOptions::NEAREST);
                CanvasView { surface, texture }
            }
        };

        &self.canvas.insert(view).texture
    }
}

/// Bundled fonts, with the configured font file in front when it loads
fn glyphs_for(settings: &CanvasSettings) -> Arc<GlyphRasterizer> {
    let Some(path) = &settings.font_path else {
        return GlyphRasterizer::shared();
    };
    match GlyphRasterizer::load_font_file(path) {
        Ok(font) => Arc::new(GlyphRasterizer::with_primary_font(font)),
        Err(err) => {
            warn!("⚠️ Could not load sticker font {}: {}", path.display(), err);
            GlyphRasterizer::shared()
        }
    }
}

impl eframe::App for PaintApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        tools_panel(self, ctx);
        central_panel(self, ctx);
    }
}
