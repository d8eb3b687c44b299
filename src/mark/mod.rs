use egui::Pos2;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub(crate) mod common;
mod sticker;
mod stroke;

pub use common::PREVIEW_OPACITY;
pub use sticker::{Sticker, STICKER_INK};
pub use stroke::Stroke;

use crate::surface::Surface;
use common::RenderMode;

/// Surface-local pixel coordinates
pub type Point = Pos2;

/// Identity of a mark from the moment it is begun until it is discarded.
/// Undo and redo move the same mark, so its id never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarkId(Uuid);

impl MarkId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MarkId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MarkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkKind {
    Stroke,
    Sticker,
}

/// Everything that can be drawn on the canvas.
///
/// Marks are immutable once committed; rendering never changes them.
#[derive(Debug, Clone, PartialEq)]
pub enum Mark {
    Stroke(Stroke),
    Sticker(Sticker),
}

impl Mark {
    pub fn id(&self) -> MarkId {
        match self {
            Mark::Stroke(s) => s.id(),
            Mark::Sticker(s) => s.id(),
        }
    }

    pub fn kind(&self) -> MarkKind {
        match self {
            Mark::Stroke(_) => MarkKind::Stroke,
            Mark::Sticker(_) => MarkKind::Sticker,
        }
    }

    pub fn as_stroke(&self) -> Option<&Stroke> {
        match self {
            Mark::Stroke(s) => Some(s),
            Mark::Sticker(_) => None,
        }
    }

    pub fn as_sticker(&self) -> Option<&Sticker> {
        match self {
            Mark::Sticker(s) => Some(s),
            Mark::Stroke(_) => None,
        }
    }

    /// Draws the mark onto `surface`, with every coordinate and size multiplied by `scale`
    pub fn render(&self, surface: &mut Surface, scale: f32) {
        self.render_with(surface, scale, RenderMode::Committed);
    }

    /// Draws the mark as a half-opacity hint of what committing it would look like
    pub fn render_preview(&self, surface: &mut Surface, scale: f32) {
        self.render_with(surface, scale, RenderMode::Preview);
    }

    fn render_with(&self, surface: &mut Surface, scale: f32, mode: RenderMode) {
        match self {
            Mark::Stroke(s) => s.render(surface, scale, mode),
            Mark::Sticker(s) => s.render(surface, scale, mode),
        }
    }
}

/// Factory functions for creating marks
pub mod factory {
    use super::*;
    use crate::error::{CanvasError, CanvasResult};
    use crate::tool::{MarkerParams, StickerParams, ToolParams};

    /// A one-point stroke at `start`, as begun by a pointer press
    pub fn begin_stroke(start: Point, params: &MarkerParams) -> Mark {
        Mark::Stroke(Stroke::new(MarkId::new(), start, params.thickness, params.color))
    }

    pub fn create_sticker(anchor: Point, params: &StickerParams) -> Mark {
        Mark::Sticker(Sticker::new(
            MarkId::new(),
            anchor,
            &params.glyph,
            params.size,
            params.rotation,
        ))
    }

    /// A finished stroke through `points`
    pub fn create_stroke(points: &[Point], params: &MarkerParams) -> CanvasResult<Mark> {
        params.validate()?;
        let Some((first, rest)) = points.split_first() else {
            return Err(CanvasError::InvalidParameters(
                "a stroke needs at least one point".to_owned(),
            ));
        };
        let mut stroke = Stroke::new(MarkId::new(), *first, params.thickness, params.color);
        for point in rest {
            stroke.add_point(*point);
        }
        Ok(Mark::Stroke(stroke))
    }

    /// The mark a pointer press at `anchor` starts with the given tool
    pub fn from_tool(anchor: Point, tool: &ToolParams) -> CanvasResult<Mark> {
        tool.validate()?;
        Ok(match tool {
            ToolParams::Marker(params) => begin_stroke(anchor, params),
            ToolParams::Sticker(params) => create_sticker(anchor, params),
        })
    }
}
