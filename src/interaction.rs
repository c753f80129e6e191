use egui::{CursorIcon, Pos2, Vec2};

use crate::config::CanvasConfig;
use crate::geometry::{Handle, HandleGeometry, hit_test_handle, local_to_world, world_to_local};
use crate::overlay::DrawingOverlay;
use crate::scene::{ImageId, ImageUpdate, PlacedImage, Scene};
use crate::tools::DrawingTools;

/// Everything a resize needs, captured at pointer-down from the pre-gesture
/// geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeGesture {
    pub id: ImageId,
    pub handle: Handle,
    /// Radians
    pub rotation: f32,
    pub start_center: Pos2,
    pub start_size: Vec2,
    /// World position of the side or corner opposite `handle`. Stays fixed
    /// for the whole gesture.
    pub anchor: Pos2,
}

impl ResizeGesture {
    pub fn begin(image: &PlacedImage, handle: Handle) -> Self {
        let rotation = image.rotation_radians();
        let start_center = image.center();
        Self {
            id: image.id,
            handle,
            rotation,
            start_center,
            start_size: image.size,
            anchor: start_center + local_to_world(handle.anchor_local(image.size), rotation),
        }
    }

    /// New top-left position and size for the pointer at `point`
    pub fn resize_to(&self, point: Pos2, min_size: f32) -> (Pos2, Vec2) {
        let local = world_to_local(point, self.start_center, self.rotation);
        let mut size = self.start_size;
        if self.handle.moves_x() {
            size.x = (2.0 * local.x.abs()).max(min_size);
        }
        if self.handle.moves_y() {
            size.y = (2.0 * local.y.abs()).max(min_size);
        }

        let center = self.anchor - local_to_world(self.handle.anchor_local(size), self.rotation);
        (center - size / 2.0, size)
    }
}

/// What the current gesture is doing
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Drawing,
    DraggingImage {
        id: ImageId,
        /// Reference point of the last move
        last_point: Pos2,
    },
    ResizingImage(ResizeGesture),
}

impl InteractionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, InteractionState::Idle)
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self, InteractionState::Drawing)
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, InteractionState::DraggingImage { .. })
    }

    pub fn is_resizing(&self) -> bool {
        matches!(self, InteractionState::ResizingImage(_))
    }
}

/// Cursor the host should show over the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorHint {
    Crosshair,
    Grab,
    Grabbing,
    Resize(Handle),
}

impl CursorHint {
    pub fn cursor_icon(&self) -> CursorIcon {
        match self {
            CursorHint::Crosshair => CursorIcon::Crosshair,
            CursorHint::Grab => CursorIcon::Grab,
            CursorHint::Grabbing => CursorIcon::Grabbing,
            CursorHint::Resize(handle) => match handle {
                Handle::N | Handle::S => CursorIcon::ResizeVertical,
                Handle::E | Handle::W => CursorIcon::ResizeHorizontal,
                Handle::NW | Handle::SE => CursorIcon::ResizeNwSe,
                Handle::NE | Handle::SW => CursorIcon::ResizeNeSw,
            },
        }
    }
}

/// Turns pointer events in canvas coordinates into drawing, dragging,
/// resizing or selection.
#[derive(Debug)]
pub struct InteractionController {
    state: InteractionState,
    handles: HandleGeometry,
    min_image_size: f32,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(&CanvasConfig::default())
    }
}

impl InteractionController {
    pub fn new(config: &CanvasConfig) -> Self {
        Self {
            state: InteractionState::Idle,
            handles: HandleGeometry {
                size: config.handle_size,
                tolerance: config.handle_tolerance,
            },
            min_image_size: config.min_image_size,
        }
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn pointer_down(
        &mut self,
        point: Pos2,
        scene: &mut Scene,
        overlay: &mut DrawingOverlay,
        tools: &DrawingTools,
    ) {
        // A down without a matching up still ends the previous gesture
        self.finish(overlay);

        if tools.mode.is_drawing() {
            overlay.begin_stroke(point, tools);
            self.state = InteractionState::Drawing;
            return;
        }

        if let Some(selected) = scene.selected() {
            if let Some(handle) = hit_test_handle(point, selected, &self.handles) {
                log::debug!("Resizing image {} from handle {}", selected.id, handle.as_str());
                self.state = InteractionState::ResizingImage(ResizeGesture::begin(selected, handle));
                return;
            }
        }

        match scene.image_at(point).map(|image| image.id) {
            Some(id) => {
                scene.select(Some(id));
                self.state = InteractionState::DraggingImage { id, last_point: point };
                log::debug!("Dragging image {}", id);
            }
            None => {
                if scene.selected_id().is_some() {
                    scene.select(None);
                }
            }
        }
    }

    pub fn pointer_move(
        &mut self,
        point: Pos2,
        scene: &mut Scene,
        overlay: &mut DrawingOverlay,
        tools: &DrawingTools,
    ) {
        match &mut self.state {
            InteractionState::Idle => {}
            // The host may switch to select mid-stroke; stop painting until the up
            InteractionState::Drawing if !tools.mode.is_drawing() => {}
            InteractionState::Drawing => overlay.extend_stroke(point, tools),
            InteractionState::DraggingImage { id, last_point } => {
                let delta = point - *last_point;
                *last_point = point;
                if let Some(image) = scene.image(*id) {
                    let position = image.position + delta;
                    scene.update_image(*id, ImageUpdate::position(position));
                }
            }
            InteractionState::ResizingImage(gesture) => {
                let (position, size) = gesture.resize_to(point, self.min_image_size);
                scene.update_image(gesture.id, ImageUpdate::bounds(position, size));
            }
        }
    }

    /// Pointer up or leave: back to idle whatever the gesture was
    pub fn pointer_up(&mut self, overlay: &mut DrawingOverlay) {
        self.finish(overlay);
    }

    /// Drop any in-flight gesture, e.g. before the canvas resolution changes
    pub fn cancel(&mut self, overlay: &mut DrawingOverlay) {
        if !self.state.is_idle() {
            log::debug!("Cancelling gesture {:?}", self.state);
        }
        self.finish(overlay);
    }

    fn finish(&mut self, overlay: &mut DrawingOverlay) {
        if self.state.is_drawing() {
            overlay.end_stroke();
        }
        self.state = InteractionState::Idle;
    }

    /// Cursor for the pointer hovering at `point`
    pub fn cursor_hint(&self, point: Option<Pos2>, scene: &Scene, tools: &DrawingTools) -> CursorHint {
        if tools.mode.is_drawing() {
            return CursorHint::Crosshair;
        }
        match &self.state {
            InteractionState::ResizingImage(gesture) => return CursorHint::Resize(gesture.handle),
            InteractionState::DraggingImage { .. } => return CursorHint::Grabbing,
            _ => {}
        }

        point
            .zip(scene.selected())
            .and_then(|(point, selected)| hit_test_handle(point, selected, &self.handles))
            .map_or(CursorHint::Grab, CursorHint::Resize)
    }
}
