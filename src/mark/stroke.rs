use egui::{Color32, Pos2};

use super::common::{self, RenderMode, EDGE_PADDING};
use super::MarkId;
use crate::surface::Surface;

/// Freehand polyline drawn with a marker
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    id: MarkId,
    points: Vec<Pos2>,
    thickness: f32,
    color: Color32,
}

impl Stroke {
    /// Starts a stroke at `start`. Any alpha in `color` is dropped; strokes are opaque.
    pub(crate) fn new(id: MarkId, start: Pos2, thickness: f32, color: Color32) -> Self {
        let [r, g, b, _] = color.to_srgba_unmultiplied();
        Self {
            id,
            points: vec![start],
            thickness,
            color: Color32::from_rgb(r, g, b),
        }
    }

    pub fn id(&self) -> MarkId {
        self.id
    }

    /// The points that make up this stroke, in drawing order
    pub fn points(&self) -> &[Pos2] {
        &self.points
    }

    pub fn thickness(&self) -> f32 {
        self.thickness
    }

    pub fn color(&self) -> Color32 {
        self.color
    }

    /// Only the history engine calls this, and only on its in-progress stroke
    pub(crate) fn add_point(&mut self, point: Pos2) {
        self.points.push(point);
    }

    pub(crate) fn render(&self, surface: &mut Surface, scale: f32, mode: RenderMode) {
        // A lone point only shows up as the preview dot
        if self.points.len() < 2 && mode == RenderMode::Committed {
            return;
        }

        let radius = self.thickness * scale / 2.0;
        let scaled: Vec<Pos2> = self
            .points
            .iter()
            .map(|point| common::scale_point(*point, scale))
            .collect();

        let area = common::calculate_bounds(&scaled, radius + EDGE_PADDING);
        let Some(mut mask) = surface.coverage_mask(area) else {
            return;
        };

        match scaled.as_slice() {
            [] => return,
            [dot] => mask.stamp_disc(*dot, radius),
            segments => {
                for pair in segments.windows(2) {
                    mask.stamp_segment(pair[0], pair[1], radius);
                }
            }
        }

        surface.blend_mask(&mask, self.color, mode.opacity());
    }
}
