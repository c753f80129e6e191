use egui::{Context, Pos2, Rect};

/// Pointer input for the canvas, in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(Pos2),
    Move(Pos2),
    Up(Pos2),
    /// The pointer left the canvas surface
    Leave,
}

/// Handles converting raw egui input into canvas [`PointerEvent`]s
#[derive(Debug, Default)]
pub struct InputHandler {
    last_pointer_pos: Option<Pos2>,
    canvas_rect: Option<Rect>,
    /// Whether the last known position was over the canvas
    inside: bool,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the on-screen rectangle of the canvas
    pub fn set_canvas_rect(&mut self, rect: Rect) {
        self.canvas_rect = Some(rect);
    }

    fn is_over_canvas(&self, pos: Pos2) -> bool {
        self.canvas_rect.is_some_and(|rect| rect.contains(pos))
    }

    /// Process this frame's egui pointer state
    pub fn process_input(&mut self, ctx: &Context) -> Vec<PointerEvent> {
        let (hover, pressed, released) = ctx.input(|input| {
            (
                input.pointer.hover_pos(),
                input.pointer.primary_pressed(),
                input.pointer.primary_released(),
            )
        });
        self.process_pointer(hover, pressed, released)
    }

    /// Turn one frame of primary-button pointer state into events
    pub fn process_pointer(&mut self, hover: Option<Pos2>, pressed: bool, released: bool) -> Vec<PointerEvent> {
        let mut events = Vec::new();
        let was_inside = self.inside;
        let inside = hover.is_some_and(|pos| self.is_over_canvas(pos));

        if let Some(pos) = hover {
            if inside && Some(pos) != self.last_pointer_pos {
                events.push(PointerEvent::Move(pos));
            }
            if inside && pressed {
                events.push(PointerEvent::Down(pos));
            }
            if inside && released {
                events.push(PointerEvent::Up(pos));
            }
        }
        if was_inside && !inside {
            events.push(PointerEvent::Leave);
        }

        self.inside = inside;
        self.last_pointer_pos = hover;
        events
    }
}
