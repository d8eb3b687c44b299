use egui::{Color32, Pos2, Rect, Vec2};
use log::warn;

use super::common::{self, RenderMode, EDGE_PADDING};
use super::MarkId;
use crate::surface::Surface;

/// Stickers are always inked in this color
pub const STICKER_INK: Color32 = Color32::BLACK;

/// A glyph placed at a point, optionally rotated about it
#[derive(Debug, Clone, PartialEq)]
pub struct Sticker {
    id: MarkId,
    anchor: Pos2,
    glyph: String,
    size: f32,
    rotation: f32,
}

impl Sticker {
    pub(crate) fn new(id: MarkId, anchor: Pos2, glyph: &str, size: f32, rotation: f32) -> Self {
        Self {
            id,
            anchor,
            glyph: glyph.to_owned(),
            size,
            rotation: common::normalize_degrees(rotation),
        }
    }

    pub fn id(&self) -> MarkId {
        self.id
    }

    pub fn anchor(&self) -> Pos2 {
        self.anchor
    }

    pub fn glyph(&self) -> &str {
        &self.glyph
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    /// Rotation in degrees, within `[0, 360)`
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub(crate) fn render(&self, surface: &mut Surface, scale: f32, mode: RenderMode) {
        let Some(bitmap) = surface.glyphs().rasterize(&self.glyph, self.size * scale) else {
            warn!("⚠️ No font can draw sticker {:?}", self.glyph);
            return;
        };

        let anchor = common::scale_point(self.anchor, scale);
        let half_w = bitmap.width as f32 / 2.0;
        let half_h = bitmap.height as f32 / 2.0;
        let (sin, cos) = self.rotation.to_radians().sin_cos();

        // Extent of the rotated bitmap around the anchor
        let extent = Vec2::new(
            half_w * cos.abs() + half_h * sin.abs(),
            half_w * sin.abs() + half_h * cos.abs(),
        );
        let area = Rect::from_center_size(anchor, (extent + Vec2::splat(EDGE_PADDING)) * 2.0);
        let Some(mut mask) = surface.coverage_mask(area) else {
            return;
        };

        // Map each surface pixel back into the unrotated bitmap
        mask.fill_with(|x, y| {
            let dx = x as f32 + 0.5 - anchor.x;
            let dy = y as f32 + 0.5 - anchor.y;
            let local_x = dx * cos + dy * sin;
            let local_y = -dx * sin + dy * cos;
            bitmap.sample(local_x + half_w, local_y + half_h)
        });

        surface.blend_mask(&mask, STICKER_INK, mode.opacity());
    }
}
