use egui::{Pos2, Rect};

/// Opacity used for every preview rendering
pub const PREVIEW_OPACITY: f32 = 0.5;

/// Extra pixels around a mark's geometry so antialiased edges are never clipped
pub(crate) const EDGE_PADDING: f32 = 1.0;

/// How a mark is being drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RenderMode {
    Committed,
    Preview,
}

impl RenderMode {
    pub(crate) fn opacity(self) -> f32 {
        match self {
            RenderMode::Committed => 1.0,
            RenderMode::Preview => PREVIEW_OPACITY,
        }
    }
}

/// Distance from `point` to the closest point of the segment `a..b`
pub(crate) fn distance_to_line_segment(point: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_sq();
    let t = if len_sq > 0.0 {
        ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    point.distance(a + ab * t)
}

/// Smallest rect holding every point, grown by `padding` on each side
pub(crate) fn calculate_bounds(points: &[Pos2], padding: f32) -> Rect {
    if points.is_empty() {
        return Rect::NOTHING;
    }
    Rect::from_points(points).expand(padding)
}

/// Scale a surface-local point into a surface rendered `scale` times larger
pub(crate) fn scale_point(point: Pos2, scale: f32) -> Pos2 {
    (point.to_vec2() * scale).to_pos2()
}

/// Wrap an angle in degrees into `[0, 360)`. Non-finite angles become 0.
pub(crate) fn normalize_degrees(degrees: f32) -> f32 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid rounds up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}
