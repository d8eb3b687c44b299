use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::error::{CanvasError, CanvasResult};
use crate::mark::common::normalize_degrees;
use crate::mark::{factory, Mark, MarkKind, Point};
use crate::settings::CanvasSettings;

/// Thickest marker, in canvas pixels
pub const MAX_THICKNESS: f32 = 64.0;
/// Largest sticker, in canvas pixels per em
pub const MAX_STICKER_SIZE: f32 = 512.0;
/// Longest sticker text, in characters
pub const MAX_STICKER_CHARS: usize = 8;

/// Parameters captured by a stroke when it is begun
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkerParams {
    pub thickness: f32,
    pub color: Color32,
}

impl MarkerParams {
    pub fn validate(&self) -> CanvasResult<()> {
        if !self.thickness.is_finite() || self.thickness <= 0.0 || self.thickness > MAX_THICKNESS {
            return Err(CanvasError::InvalidParameters(format!(
                "marker thickness must be in (0, {}], got {}",
                MAX_THICKNESS, self.thickness
            )));
        }
        Ok(())
    }
}

/// Parameters captured by a sticker when it is placed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StickerParams {
    pub glyph: String,
    pub size: f32,
    /// Degrees; normalized into `[0, 360)` when the sticker is created
    pub rotation: f32,
}

impl StickerParams {
    pub fn validate(&self) -> CanvasResult<()> {
        if self.glyph.trim().is_empty() {
            return Err(CanvasError::InvalidParameters("sticker glyph is empty".to_owned()));
        }
        if self.glyph.chars().count() > MAX_STICKER_CHARS {
            return Err(CanvasError::InvalidParameters(format!(
                "sticker text is longer than {} characters",
                MAX_STICKER_CHARS
            )));
        }
        if !self.size.is_finite() || self.size <= 0.0 || self.size > MAX_STICKER_SIZE {
            return Err(CanvasError::InvalidParameters(format!(
                "sticker size must be in (0, {}], got {}",
                MAX_STICKER_SIZE, self.size
            )));
        }
        Ok(())
    }
}

/// Snapshot of the active tool handed to `HistoryEngine::begin_mark`.
/// The variant decides which kind of mark is begun.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ToolParams {
    Marker(MarkerParams),
    Sticker(StickerParams),
}

impl ToolParams {
    pub fn kind(&self) -> MarkKind {
        match self {
            ToolParams::Marker(_) => MarkKind::Stroke,
            ToolParams::Sticker(_) => MarkKind::Sticker,
        }
    }

    pub fn validate(&self) -> CanvasResult<()> {
        match self {
            ToolParams::Marker(params) => params.validate(),
            ToolParams::Sticker(params) => params.validate(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActiveTool {
    Marker,
    Sticker,
}

/// The user's current tool selection, consulted by the next pointer press.
///
/// Changing it never touches marks already begun: `params` hands out a copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolBox {
    active: ActiveTool,
    marker: MarkerParams,
    sticker: StickerParams,
}

impl Default for ToolBox {
    fn default() -> Self {
        Self::from_settings(&CanvasSettings::default())
    }
}

impl ToolBox {
    /// Thin black marker selected, first palette sticker ready
    pub fn from_settings(settings: &CanvasSettings) -> Self {
        Self {
            active: ActiveTool::Marker,
            marker: MarkerParams {
                thickness: settings.thin_thickness,
                color: Color32::BLACK,
            },
            sticker: StickerParams {
                glyph: settings.stickers.first().cloned().unwrap_or_else(|| "★".to_owned()),
                size: settings.sticker_size,
                rotation: 0.0,
            },
        }
    }

    pub fn active(&self) -> ActiveTool {
        self.active
    }

    pub fn marker(&self) -> &MarkerParams {
        &self.marker
    }

    pub fn sticker(&self) -> &StickerParams {
        &self.sticker
    }

    /// Selects the marker with the given thickness, clamped to [`MAX_THICKNESS`].
    /// Non-positive thicknesses are ignored.
    pub fn select_marker(&mut self, thickness: f32) {
        if thickness.is_finite() && thickness > 0.0 {
            self.marker.thickness = thickness.min(MAX_THICKNESS);
        }
        self.active = ActiveTool::Marker;
    }

    /// Selects a sticker glyph. Blank or overlong glyphs are ignored.
    pub fn select_sticker(&mut self, glyph: &str) {
        let glyph = glyph.trim();
        if !glyph.is_empty() && glyph.chars().count() <= MAX_STICKER_CHARS {
            self.sticker.glyph = glyph.to_owned();
        }
        self.active = ActiveTool::Sticker;
    }

    pub fn set_color(&mut self, color: Color32) {
        let [r, g, b, _] = color.to_srgba_unmultiplied();
        self.marker.color = Color32::from_rgb(r, g, b);
    }

    pub fn set_rotation(&mut self, degrees: f32) {
        self.sticker.rotation = normalize_degrees(degrees);
    }

    pub fn set_sticker_size(&mut self, size: f32) {
        if size.is_finite() && size > 0.0 {
            self.sticker.size = size.min(MAX_STICKER_SIZE);
        }
    }

    /// Checks both tools, whichever is active
    pub fn validate(&self) -> CanvasResult<()> {
        self.marker.validate()?;
        self.sticker.validate()
    }

    /// Copy of the active tool's parameters
    pub fn params(&self) -> ToolParams {
        match self.active {
            ActiveTool::Marker => ToolParams::Marker(self.marker),
            ActiveTool::Sticker => ToolParams::Sticker(self.sticker.clone()),
        }
    }

    /// What the next press at `at` would produce: a marker dot or the sticker
    pub fn preview_at(&self, at: Point) -> Mark {
        match self.active {
            ActiveTool::Marker => factory::begin_stroke(at, &self.marker),
            ActiveTool::Sticker => factory::create_sticker(at, &self.sticker),
        }
    }
}
