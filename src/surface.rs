use std::sync::Arc;

use egui::{Color32, Pos2, Rect};
use image::{Rgba, RgbaImage};

use crate::glyph::GlyphRasterizer;
use crate::mark::common::distance_to_line_segment;

/// An owned RGBA raster that marks render onto.
///
/// Pixels are stored unmultiplied, one `Rgba<u8>` per pixel. The surface also
/// carries the glyph rasterizer stickers use, so that a mark only needs the
/// surface and a scale to draw itself.
pub struct Surface {
    pixels: RgbaImage,
    glyphs: Arc<GlyphRasterizer>,
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("width", &self.pixels.width())
            .field("height", &self.pixels.height())
            .field("fonts", &self.glyphs.font_count())
            .finish()
    }
}

impl Surface {
    /// Creates a transparent surface using the shared default fonts
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_glyphs(width, height, GlyphRasterizer::shared())
    }

    /// Creates a transparent surface that rasterizes stickers with `glyphs`
    pub fn with_glyphs(width: u32, height: u32, glyphs: Arc<GlyphRasterizer>) -> Self {
        Self {
            pixels: RgbaImage::new(width, height),
            glyphs,
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn glyphs(&self) -> &GlyphRasterizer {
        &self.glyphs
    }

    /// Overwrites every pixel with `color`
    pub fn fill(&mut self, color: Color32) {
        let fill = Rgba(color.to_srgba_unmultiplied());
        for pixel in self.pixels.pixels_mut() {
            *pixel = fill;
        }
    }

    /// Unmultiplied RGBA at `(x, y)`, or `None` outside the surface
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        Some(self.pixels.get_pixel(x, y).0)
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Snapshot for uploading as an egui texture
    pub fn to_color_image(&self) -> egui::ColorImage {
        let size = [self.width() as usize, self.height() as usize];
        egui::ColorImage::from_rgba_unmultiplied(size, self.pixels.as_raw())
    }

    /// An empty coverage mask over the part of `rect` that lies on the surface
    pub(crate) fn coverage_mask(&self, rect: Rect) -> Option<CoverageMask> {
        if !rect.is_finite() || !rect.is_positive() {
            return None;
        }
        let x0 = rect.min.x.floor().max(0.0) as u32;
        let y0 = rect.min.y.floor().max(0.0) as u32;
        let x1 = (rect.max.x.ceil().max(0.0) as u32).min(self.width());
        let y1 = (rect.max.y.ceil().max(0.0) as u32).min(self.height());
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(CoverageMask::new(x0, y0, x1 - x0, y1 - y0))
    }

    /// Composites `color` through `mask` with source-over blending.
    ///
    /// `opacity` scales the whole mask uniformly, so a mark with overlapping
    /// geometry still blends exactly once per pixel.
    pub(crate) fn blend_mask(&mut self, mask: &CoverageMask, color: Color32, opacity: f32) {
        let [sr, sg, sb, _] = color.to_srgba_unmultiplied();
        let src = [sr as f32, sg as f32, sb as f32];
        let opacity = opacity.clamp(0.0, 1.0);

        for (x, y, coverage) in mask.covered() {
            let alpha = coverage * opacity;
            if alpha <= 0.0 {
                continue;
            }
            let pixel = self.pixels.get_pixel_mut(x, y);
            let dst_alpha = pixel[3] as f32 / 255.0;
            let out_alpha = alpha + dst_alpha * (1.0 - alpha);
            if out_alpha <= 0.0 {
                continue;
            }
            for channel in 0..3 {
                let dst = pixel[channel] as f32;
                let out = (src[channel] * alpha + dst * dst_alpha * (1.0 - alpha)) / out_alpha;
                pixel[channel] = out.round().clamp(0.0, 255.0) as u8;
            }
            pixel[3] = (out_alpha * 255.0).round().clamp(0.0, 255.0) as u8;
        }
    }
}

/// Per-pixel coverage in `[0, 1]` over a window of a surface.
///
/// Shapes are stamped into the mask with max-accumulation before it is
/// blended, which keeps joins between stroke segments seamless.
#[derive(Debug, Clone)]
pub(crate) struct CoverageMask {
    x0: u32,
    y0: u32,
    width: u32,
    height: u32,
    coverage: Vec<f32>,
}

impl CoverageMask {
    fn new(x0: u32, y0: u32, width: u32, height: u32) -> Self {
        Self {
            x0,
            y0,
            width,
            height,
            coverage: vec![0.0; width as usize * height as usize],
        }
    }

    fn accumulate(&mut self, x: u32, y: u32, value: f32) {
        let idx = ((y - self.y0) * self.width + (x - self.x0)) as usize;
        let slot = &mut self.coverage[idx];
        *slot = slot.max(value.clamp(0.0, 1.0));
    }

    /// Stamps a capsule: the segment `a..b` swept by a disc of `radius`.
    /// Round caps fall out of the distance test, and `a == b` gives a dot.
    pub(crate) fn stamp_segment(&mut self, a: Pos2, b: Pos2, radius: f32) {
        let reach = radius + 1.0;
        let x_min = (a.x.min(b.x) - reach).floor().max(self.x0 as f32) as u32;
        let y_min = (a.y.min(b.y) - reach).floor().max(self.y0 as f32) as u32;
        let x_max = ((a.x.max(b.x) + reach).ceil().max(0.0) as u32).min(self.x0 + self.width);
        let y_max = ((a.y.max(b.y) + reach).ceil().max(0.0) as u32).min(self.y0 + self.height);

        for y in y_min..y_max {
            for x in x_min..x_max {
                let center = Pos2::new(x as f32 + 0.5, y as f32 + 0.5);
                let distance = distance_to_line_segment(center, a, b);
                let coverage = radius + 0.5 - distance;
                if coverage > 0.0 {
                    self.accumulate(x, y, coverage);
                }
            }
        }
    }

    pub(crate) fn stamp_disc(&mut self, center: Pos2, radius: f32) {
        self.stamp_segment(center, center, radius);
    }

    /// Sets every cell from `coverage_at(surface_x, surface_y)`
    pub(crate) fn fill_with(&mut self, coverage_at: impl Fn(u32, u32) -> f32) {
        for y in self.y0..self.y0 + self.height {
            for x in self.x0..self.x0 + self.width {
                self.accumulate(x, y, coverage_at(x, y));
            }
        }
    }

    /// Surface coordinates and coverage of every non-empty cell
    pub(crate) fn covered(&self) -> impl Iterator<Item = (u32, u32, f32)> + '_ {
        self.coverage
            .iter()
            .enumerate()
            .filter(|(_, coverage)| **coverage > 0.0)
            .map(|(idx, coverage)| {
                let idx = idx as u32;
                (self.x0 + idx % self.width, self.y0 + idx / self.width, *coverage)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    fn white_surface() -> Surface {
        let mut surface = Surface::with_glyphs(16, 16, Arc::new(GlyphRasterizer::new(Vec::new())));
        surface.fill(Color32::WHITE);
        surface
    }

    #[test]
    fn test_fill_and_pixel() {
        let surface = white_surface();
        assert_eq!(surface.pixel(0, 0), Some([255, 255, 255, 255]));
        assert_eq!(surface.pixel(15, 15), Some([255, 255, 255, 255]));
        assert_eq!(surface.pixel(16, 0), None);
    }

    #[test]
    fn test_mask_is_clipped_to_surface() {
        let surface = white_surface();
        let rect = Rect::from_min_max(pos2(-5.0, -5.0), pos2(4.0, 100.0));
        let mask = surface.coverage_mask(rect).unwrap();
        assert_eq!((mask.x0, mask.y0, mask.width, mask.height), (0, 0, 4, 16));

        let off_surface = Rect::from_min_max(pos2(20.0, 20.0), pos2(30.0, 30.0));
        assert!(surface.coverage_mask(off_surface).is_none());
    }

    #[test]
    fn test_blend_full_and_half_opacity() {
        let mut surface = white_surface();
        let rect = Rect::from_min_max(pos2(0.0, 0.0), pos2(16.0, 16.0));
        let mut mask = surface.coverage_mask(rect).unwrap();
        mask.stamp_disc(pos2(8.0, 8.0), 3.0);

        surface.blend_mask(&mask, Color32::BLACK, 1.0);
        assert_eq!(surface.pixel(8, 8), Some([0, 0, 0, 255]));
        assert_eq!(surface.pixel(0, 0), Some([255, 255, 255, 255]));

        let mut half = white_surface();
        half.blend_mask(&mask, Color32::BLACK, 0.5);
        let [r, g, b, a] = half.pixel(8, 8).unwrap();
        assert_eq!(a, 255);
        assert!(r == g && g == b);
        assert!((126..=129).contains(&r), "half-opacity black over white was {r}");
    }

    #[test]
    fn test_overlapping_stamps_blend_once() {
        let mut surface = white_surface();
        let rect = Rect::from_min_max(pos2(0.0, 0.0), pos2(16.0, 16.0));
        let mut mask = surface.coverage_mask(rect).unwrap();
        mask.stamp_segment(pos2(2.0, 8.0), pos2(8.0, 8.0), 2.0);
        mask.stamp_segment(pos2(8.0, 8.0), pos2(14.0, 8.0), 2.0);
        surface.blend_mask(&mask, Color32::BLACK, 0.5);

        // The shared joint is no darker than the middle of either segment
        assert_eq!(surface.pixel(8, 8), surface.pixel(4, 8));
        assert_eq!(surface.pixel(8, 8), surface.pixel(11, 8));
    }
}
