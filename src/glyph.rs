use std::path::Path;
use std::sync::{Arc, OnceLock};

use ab_glyph::{point, Font, FontArc, ScaleFont};
use log::{debug, error, info, warn};

use crate::error::{CanvasError, CanvasResult};

/// Fonts bundled with egui, in fallback order
const DEFAULT_FONTS: [(&str, &[u8]); 3] = [
    ("Ubuntu-Light", epaint_default_fonts::UBUNTU_LIGHT),
    ("NotoEmoji-Regular", epaint_default_fonts::NOTO_EMOJI_REGULAR),
    ("emoji-icon-font", epaint_default_fonts::EMOJI_ICON),
];

/// Largest em size handed to the rasterizer; bigger requests are clamped
pub const MAX_GLYPH_PX: f32 = 4096.0;
/// Largest bitmap `rasterize` will allocate
const MAX_BITMAP_PIXELS: u64 = 4096 * 4096;

static SHARED: OnceLock<Arc<GlyphRasterizer>> = OnceLock::new();

/// Single-channel coverage bitmap of a laid-out sticker glyph
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphBitmap {
    pub width: u32,
    pub height: u32,
    coverage: Vec<f32>,
}

impl GlyphBitmap {
    /// Coverage of the pixel at `(x, y)`; zero outside the bitmap
    pub fn coverage_at(&self, x: i64, y: i64) -> f32 {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return 0.0;
        }
        self.coverage[(y as u32 * self.width + x as u32) as usize]
    }

    /// Bilinear sample with pixel centers at `i + 0.5`
    pub fn sample(&self, x: f32, y: f32) -> f32 {
        let fx = x - 0.5;
        let fy = y - 0.5;
        let x0 = fx.floor();
        let y0 = fy.floor();
        let tx = fx - x0;
        let ty = fy - y0;
        let (x0, y0) = (x0 as i64, y0 as i64);

        let top = self.coverage_at(x0, y0) * (1.0 - tx) + self.coverage_at(x0 + 1, y0) * tx;
        let bottom = self.coverage_at(x0, y0 + 1) * (1.0 - tx) + self.coverage_at(x0 + 1, y0 + 1) * tx;
        top * (1.0 - ty) + bottom * ty
    }

    /// True if no pixel has any ink
    pub fn is_blank(&self) -> bool {
        self.coverage.iter().all(|c| *c <= 0.0)
    }
}

/// Lays out sticker text over a chain of fonts and rasterizes it with `ab_glyph`.
///
/// Each character uses the first font that has a glyph for it, so plain
/// symbols and emoji can be mixed in one sticker.
pub struct GlyphRasterizer {
    fonts: Vec<FontArc>,
}

impl std::fmt::Debug for GlyphRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlyphRasterizer")
            .field("fonts", &self.fonts.len())
            .finish()
    }
}

impl GlyphRasterizer {
    pub fn new(fonts: Vec<FontArc>) -> Self {
        Self { fonts }
    }

    /// egui's bundled fonts
    pub fn with_default_fonts() -> Self {
        let mut fonts = Vec::with_capacity(DEFAULT_FONTS.len());
        for (name, data) in DEFAULT_FONTS {
            match FontArc::try_from_slice(data) {
                Ok(font) => fonts.push(font),
                Err(err) => error!("❌ Failed to parse bundled font {}: {}", name, err),
            }
        }
        debug!("Loaded {} bundled sticker fonts", fonts.len());
        Self { fonts }
    }

    /// The default rasterizer, parsed once per process and shared read-only
    pub fn shared() -> Arc<Self> {
        SHARED.get_or_init(|| Arc::new(Self::with_default_fonts())).clone()
    }

    /// Default fonts with `font` consulted first
    pub fn with_primary_font(font: FontArc) -> Self {
        let mut rasterizer = Self::with_default_fonts();
        rasterizer.fonts.insert(0, font);
        rasterizer
    }

    /// Reads a TrueType/OpenType file for use as a sticker font
    pub fn load_font_file(path: &Path) -> CanvasResult<FontArc> {
        let bytes = std::fs::read(path)?;
        let font = FontArc::try_from_vec(bytes).map_err(|err| {
            CanvasError::InvalidParameters(format!("{}: {}", path.display(), err))
        })?;
        info!("🔤 Loaded sticker font {}", path.display());
        Ok(font)
    }

    pub fn font_count(&self) -> usize {
        self.fonts.len()
    }

    fn font_for(&self, ch: char) -> Option<&FontArc> {
        self.fonts
            .iter()
            .find(|font| font.glyph_id(ch).0 != 0)
            .or_else(|| self.fonts.first())
    }

    /// Rasterizes `text` on one line at `px_size` pixels per em, at most
    /// [`MAX_GLYPH_PX`].
    ///
    /// The bitmap is cropped to the ink, so its center is the visual center
    /// of the text. Returns `None` when nothing would be drawn or the bitmap
    /// would be too large.
    pub fn rasterize(&self, text: &str, px_size: f32) -> Option<GlyphBitmap> {
        if !px_size.is_finite() || px_size <= 0.0 {
            return None;
        }
        let px_size = px_size.min(MAX_GLYPH_PX);

        let mut outlined = Vec::new();
        let mut cursor_x = 0.0f32;
        for ch in text.chars() {
            let Some(font) = self.font_for(ch) else {
                continue;
            };
            let scaled = font.as_scaled(px_size);
            let glyph_id = font.glyph_id(ch);
            let glyph = glyph_id.with_scale_and_position(px_size, point(cursor_x, scaled.ascent()));
            cursor_x += scaled.h_advance(glyph_id);
            if let Some(glyph) = font.outline_glyph(glyph) {
                outlined.push(glyph);
            }
        }

        let first = outlined.first()?.px_bounds();
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.min.x, first.min.y, first.max.x, first.max.y);
        for glyph in &outlined[1..] {
            let bounds = glyph.px_bounds();
            min_x = min_x.min(bounds.min.x);
            min_y = min_y.min(bounds.min.y);
            max_x = max_x.max(bounds.max.x);
            max_y = max_y.max(bounds.max.y);
        }

        let (origin_x, origin_y) = (min_x.floor(), min_y.floor());
        let width = (max_x.ceil() - origin_x).max(0.0) as u32;
        let height = (max_y.ceil() - origin_y).max(0.0) as u32;
        if width == 0 || height == 0 {
            return None;
        }
        if width as u64 * height as u64 > MAX_BITMAP_PIXELS {
            warn!("⚠️ Sticker {:?} would rasterize to {}x{}, skipping", text, width, height);
            return None;
        }

        let mut coverage = vec![0.0f32; width as usize * height as usize];
        for glyph in &outlined {
            let bounds = glyph.px_bounds();
            let offset_x = (bounds.min.x - origin_x) as u32;
            let offset_y = (bounds.min.y - origin_y) as u32;
            glyph.draw(|px, py, value| {
                let x = offset_x + px;
                let y = offset_y + py;
                if x < width && y < height {
                    let idx = (y * width + x) as usize;
                    coverage[idx] = (coverage[idx] + value).min(1.0);
                }
            });
        }

        Some(GlyphBitmap {
            width,
            height,
            coverage,
        })
    }
}
