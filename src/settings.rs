use std::fs;
use std::path::{Path, PathBuf};

use egui::Color32;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tool::{MAX_STICKER_CHARS, MAX_STICKER_SIZE, MAX_THICKNESS};

/// Settings file looked up in the working directory on native builds
pub const SETTINGS_FILE: &str = "sketchpad.json";

/// Largest canvas side, in pixels
pub const MAX_CANVAS_SIDE: u32 = 4096;
/// Pixel budget of one exported image (8192 x 8192)
pub const MAX_EXPORT_PIXELS: u64 = 8192 * 8192;

/// Errors that can occur while loading or saving settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to serialize settings: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Failed to write settings: {0}")]
    WriteError(#[from] std::io::Error),

    #[error("Failed to read settings file: {0}")]
    ReadError(String),

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),
}

/// Result type for settings operations
pub type SettingsResult<T> = Result<T, SettingsError>;

/// Canvas and tool configuration.
///
/// Missing fields take their defaults, so old files keep loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasSettings {
    pub width: u32,
    pub height: u32,
    pub background: Color32,
    /// Export resolution as a multiple of the canvas size
    pub export_scale: f32,
    pub export_path: PathBuf,
    pub thin_thickness: f32,
    pub thick_thickness: f32,
    pub sticker_size: f32,
    /// Sticker palette, including any custom stickers the user added
    pub stickers: Vec<String>,
    /// Extra font consulted before the bundled ones when drawing stickers
    pub font_path: Option<PathBuf>,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            width: 256,
            height: 256,
            background: Color32::WHITE,
            export_scale: 4.0,
            export_path: PathBuf::from("sketchpad.png"),
            thin_thickness: 2.0,
            thick_thickness: 6.0,
            sticker_size: 28.0,
            stickers: vec!["★".to_owned(), "🌸".to_owned(), "🎈".to_owned()],
            font_path: None,
        }
    }
}

impl CanvasSettings {
    /// Load settings from a JSON file and validate them
    pub fn load(path: &Path) -> SettingsResult<Self> {
        let json = fs::read_to_string(path)
            .map_err(|e| SettingsError::ReadError(format!("{}: {}", path.display(), e)))?;
        let settings: Self = serde_json::from_str(&json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings, falling back to defaults when the file is missing or bad
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(settings) => {
                info!("⚙️ Loaded settings from {}", path.display());
                settings
            }
            Err(err) => {
                warn!("⚠️ Ignoring settings file: {}", err);
                Self::default()
            }
        }
    }

    /// Save settings as pretty-printed JSON
    pub fn save(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> SettingsResult<()> {
        let invalid = |msg: String| Err(SettingsError::InvalidSettings(msg));

        if self.width == 0 || self.height == 0 || self.width > MAX_CANVAS_SIDE || self.height > MAX_CANVAS_SIDE {
            return invalid(format!("canvas size {}x{} out of range", self.width, self.height));
        }
        if !self.export_scale.is_finite() || self.export_scale <= 0.0 || self.export_scale > 16.0 {
            return invalid(format!("export scale {} out of range", self.export_scale));
        }
        let (export_w, export_h) = self.export_size();
        if export_w as u64 * export_h as u64 > MAX_EXPORT_PIXELS {
            return invalid(format!("export size {}x{} exceeds the pixel budget", export_w, export_h));
        }
        for (name, value, max) in [
            ("thin_thickness", self.thin_thickness, MAX_THICKNESS),
            ("thick_thickness", self.thick_thickness, MAX_THICKNESS),
            ("sticker_size", self.sticker_size, MAX_STICKER_SIZE),
        ] {
            if !value.is_finite() || value <= 0.0 || value > max {
                return invalid(format!("{} must be in (0, {}], got {}", name, max, value));
            }
        }
        if self
            .stickers
            .iter()
            .any(|glyph| glyph.trim().is_empty() || glyph.chars().count() > MAX_STICKER_CHARS)
        {
            return invalid("sticker palette contains a blank or overlong sticker".to_owned());
        }
        Ok(())
    }

    /// Pixel size of an exported image
    pub fn export_size(&self) -> (u32, u32) {
        let scale = |len: u32| ((len as f32 * self.export_scale).round() as u32).max(1);
        (scale(self.width), scale(self.height))
    }

    /// Appends a custom sticker to the palette.
    ///
    /// Returns false for blank or overlong glyphs and for glyphs already in the palette.
    pub fn add_sticker(&mut self, glyph: &str) -> bool {
        let glyph = glyph.trim();
        if glyph.is_empty()
            || glyph.chars().count() > MAX_STICKER_CHARS
            || self.stickers.iter().any(|existing| existing == glyph)
        {
            return false;
        }
        info!("➕ Added custom sticker {:?}", glyph);
        self.stickers.push(glyph.to_owned());
        true
    }
}
