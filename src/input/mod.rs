use egui::{Context, Key, Order, PointerButton, Pos2, Rect};

mod router;
pub use router::route_event;

use crate::mark::Point;

/// Canvas-level input, in surface-local coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Primary button pressed over the canvas
    PointerDown { position: Point },
    /// Pointer moved over the canvas, with or without the button held
    PointerMove { position: Point },
    /// Primary button released, wherever the pointer is
    PointerUp { position: Point },
    /// Pointer left the canvas
    PointerLeave,
    /// The user picked another tool or changed its parameters
    ToolChanged,
    Undo,
    Redo,
    Clear,
}

/// Turns raw egui input into [`InputEvent`]s for one canvas
#[derive(Debug, Default)]
pub struct InputHandler {
    canvas_rect: Option<Rect>,
    /// Zoom between screen points and surface pixels
    pixels_per_point: f32,
    hovering: bool,
    pressed: bool,
}

impl InputHandler {
    pub fn new() -> Self {
        Self {
            pixels_per_point: 1.0,
            ..Default::default()
        }
    }

    /// Where the canvas was laid out this frame, and how many screen points
    /// one surface pixel spans
    pub fn set_canvas_rect(&mut self, rect: Rect, point_scale: f32) {
        self.canvas_rect = Some(rect);
        self.pixels_per_point = if point_scale > 0.0 { 1.0 / point_scale } else { 1.0 };
    }

    fn to_local(&self, rect: Rect, pos: Pos2) -> Point {
        ((pos - rect.min) * self.pixels_per_point).to_pos2()
    }

    /// Process raw egui input and generate our InputEvents.
    ///
    /// The pointer only counts as over the canvas when no window, popup or
    /// tooltip sits on top of it at that spot.
    pub fn process_input(&mut self, ctx: &Context) -> Vec<InputEvent> {
        let mut events = Vec::new();
        let Some(rect) = self.canvas_rect else {
            return events;
        };
        let keyboard_free = !ctx.wants_keyboard_input();
        let hover = ctx
            .input(|input| input.pointer.hover_pos())
            .filter(|pos| rect.contains(*pos))
            .filter(|pos| !covered_by_area(ctx, *pos));

        ctx.input(|input| {
            if let Some(pos) = hover {
                let position = self.to_local(rect, pos);
                if input.pointer.button_pressed(PointerButton::Primary) {
                    self.pressed = true;
                    events.push(InputEvent::PointerDown { position });
                } else if input.pointer.is_moving() || !self.hovering {
                    events.push(InputEvent::PointerMove { position });
                }
            }

            if self.pressed && input.pointer.button_released(PointerButton::Primary) {
                self.pressed = false;
                let last = input
                    .pointer
                    .interact_pos()
                    .or(input.pointer.latest_pos())
                    .unwrap_or(rect.min);
                events.push(InputEvent::PointerUp {
                    position: self.to_local(rect, last),
                });
            }

            if hover.is_none() && self.hovering {
                events.push(InputEvent::PointerLeave);
            }
            self.hovering = hover.is_some();

            if keyboard_free {
                let command = input.modifiers.command;
                if command && (input.key_pressed(Key::Y) || (input.modifiers.shift && input.key_pressed(Key::Z))) {
                    events.push(InputEvent::Redo);
                } else if command && input.key_pressed(Key::Z) {
                    events.push(InputEvent::Undo);
                }
            }
        });

        events
    }
}

/// True if a floating area (popup, window, tooltip) is on top at `pos`.
/// Panels live on the background layer, which never counts.
fn covered_by_area(ctx: &Context, pos: Pos2) -> bool {
    ctx.layer_id_at(pos)
        .is_some_and(|layer| layer.order != Order::Background)
}
