use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use image::ImageFormat;
use log::info;

use crate::error::CanvasResult;
use crate::glyph::GlyphRasterizer;
use crate::history::HistoryEngine;
use crate::settings::CanvasSettings;
use crate::surface::Surface;

/// Renders the committed history onto a fresh surface of
/// `canvas size × export_scale`, leaving the engine untouched
pub fn export_surface(engine: &HistoryEngine, settings: &CanvasSettings, glyphs: Arc<GlyphRasterizer>) -> Surface {
    let (width, height) = settings.export_size();
    let mut surface = Surface::with_glyphs(width, height, glyphs);
    engine.render_export(&mut surface, settings.export_scale, settings.background);
    surface
}

/// PNG bytes of `surface`
pub fn encode_png(surface: &Surface) -> CanvasResult<Vec<u8>> {
    let mut bytes = Cursor::new(Vec::new());
    surface.as_image().write_to(&mut bytes, ImageFormat::Png)?;
    Ok(bytes.into_inner())
}

/// Exports the committed history as a PNG file at `path`
pub fn export_png(
    engine: &HistoryEngine,
    settings: &CanvasSettings,
    glyphs: Arc<GlyphRasterizer>,
    path: &Path,
) -> CanvasResult<()> {
    let surface = export_surface(engine, settings, glyphs);
    let bytes = encode_png(&surface)?;
    std::fs::write(path, bytes)?;
    info!(
        "💾 Exported {} marks at {}x{} to {}",
        engine.committed().len(),
        surface.width(),
        surface.height(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::{MarkerParams, ToolParams};
    use egui::{pos2, Color32};

    #[test]
    fn test_export_is_scaled() {
        let mut engine = HistoryEngine::new();
        let marker = ToolParams::Marker(MarkerParams {
            thickness: 2.0,
            color: Color32::from_rgb(0, 0, 255),
        });
        engine.begin_mark(pos2(10.0, 10.0), &marker).unwrap();
        engine.extend_mark(pos2(30.0, 10.0));
        engine.commit_mark();

        let settings = CanvasSettings {
            width: 40,
            height: 20,
            ..Default::default()
        };
        let surface = export_surface(&engine, &settings, GlyphRasterizer::shared());
        assert_eq!((surface.width(), surface.height()), (160, 80));
        // (20, 10) on the canvas lands on (80, 40) in the export
        assert_eq!(surface.pixel(80, 40), Some([0, 0, 255, 255]));
        assert_eq!(surface.pixel(80, 5), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_png_signature() {
        let engine = HistoryEngine::new();
        let settings = CanvasSettings {
            width: 8,
            height: 8,
            export_scale: 1.0,
            ..Default::default()
        };
        let bytes = encode_png(&export_surface(&engine, &settings, GlyphRasterizer::shared())).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }
}
