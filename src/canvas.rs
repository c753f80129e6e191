use egui::{Pos2, Vec2};
use image::RgbaImage;
use std::sync::Arc;

use crate::config::CanvasConfig;
use crate::display::DisplayScale;
use crate::image_cache::{DecodeExecutor, ImageCache, RedrawSignal};
use crate::input::PointerEvent;
use crate::interaction::{CursorHint, InteractionController, InteractionState};
use crate::overlay::DrawingOverlay;
use crate::raster::Surface;
use crate::renderer::BackgroundRenderer;
use crate::scene::{CanvasResolution, ImageUpdate, Scene};
use crate::tools::DrawingTools;

/// Undo/redo availability for the host's buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrawingStatus {
    pub can_undo: bool,
    pub can_redo: bool,
    pub is_drawing: bool,
}

/// The drawing operations the canvas hands to its host.
///
/// Borrowed from [`CollageCanvas::drawing_actions`]; the host's toolbar calls
/// these instead of reaching into the overlay.
pub struct DrawingActions<'a> {
    canvas: &'a mut CollageCanvas,
}

impl DrawingActions<'_> {
    pub fn undo(&mut self) {
        self.canvas.undo();
    }

    pub fn redo(&mut self) {
        self.canvas.redo();
    }

    pub fn clear(&mut self) {
        self.canvas.request_clear();
    }

    pub fn can_undo(&self) -> bool {
        self.canvas.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.canvas.can_redo()
    }

    pub fn status(&self) -> DrawingStatus {
        self.canvas.status()
    }
}

/// The canvas engine: background and overlay surfaces, the interaction
/// controller, the image cache and the display scale.
///
/// The scene is owned by the host and passed in by reference to every call
/// that reads or changes it.
#[derive(Debug)]
pub struct CollageCanvas {
    config: CanvasConfig,
    /// Resolution the surfaces are currently allocated for
    resolution: CanvasResolution,
    background: BackgroundRenderer,
    overlay: DrawingOverlay,
    controller: InteractionController,
    cache: ImageCache,
    display: DisplayScale,
    clear_revision: u64,
    background_dirty: bool,
}

impl Default for CollageCanvas {
    fn default() -> Self {
        Self::new(CanvasConfig::default())
    }
}

impl CollageCanvas {
    pub fn new(config: CanvasConfig) -> Self {
        Self::with_executor(config, DecodeExecutor::Background)
    }

    pub fn with_executor(config: CanvasConfig, executor: DecodeExecutor) -> Self {
        Self {
            resolution: CanvasResolution::new(0, 0),
            background: BackgroundRenderer::new(&config),
            overlay: DrawingOverlay::new(config.history_limit),
            controller: InteractionController::new(&config),
            cache: ImageCache::new(executor, RedrawSignal::new()),
            display: DisplayScale::new(&config),
            clear_revision: 0,
            background_dirty: true,
            config,
        }
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Signal raised when an image decode finishes; register the host's
    /// repaint hook on it.
    pub fn redraw_signal(&self) -> &Arc<RedrawSignal> {
        self.cache.redraw_signal()
    }

    pub fn cache(&self) -> &ImageCache {
        &self.cache
    }

    pub fn display(&self) -> &DisplayScale {
        &self.display
    }

    pub fn interaction_state(&self) -> &InteractionState {
        self.controller.state()
    }

    pub fn background(&self) -> &Surface {
        self.background.surface()
    }

    pub fn overlay(&self) -> &Surface {
        self.overlay.surface()
    }

    /// True once after the background surface was repainted
    pub fn take_background_dirty(&mut self) -> bool {
        std::mem::take(&mut self.background_dirty)
    }

    /// True once after the overlay pixels changed
    pub fn take_overlay_dirty(&mut self) -> bool {
        self.overlay.take_dirty()
    }

    /// Bring the surfaces in line with the scene's resolution. Any gesture in
    /// flight is cancelled first, since its captured geometry refers to the
    /// old canvas.
    pub fn sync_resolution(&mut self, scene: &Scene) {
        let resolution = scene.resolution();
        if resolution == self.resolution {
            return;
        }

        self.controller.cancel(&mut self.overlay);
        self.overlay.resize(resolution);
        self.background.resize(resolution);
        self.resolution = resolution;
    }

    /// Change the canvas resolution. Drawing is stretched to the new size and
    /// undo history is discarded.
    pub fn set_resolution(&mut self, scene: &mut Scene, resolution: CanvasResolution) {
        scene.set_resolution(resolution);
        self.sync_resolution(scene);
    }

    /// Fit the canvas into `container` with its top-left corner at `origin`
    /// (screen coordinates). Returns the display scale.
    pub fn layout(&mut self, container: Vec2, origin: Pos2, scene: &Scene) -> f32 {
        self.display.set_origin(origin);
        self.display.recompute(container, scene.resolution())
    }

    /// Bring both surfaces up to date with the scene and finished decodes.
    /// Returns true if the background was repainted.
    pub fn render(&mut self, scene: &Scene) -> bool {
        self.sync_resolution(scene);
        self.cache.reconcile(scene);
        let loaded = self.cache.poll();
        self.cache.redraw_signal().take();

        if loaded {
            self.background.invalidate();
        }
        if !self.background.is_stale(scene.version()) {
            return false;
        }

        self.background.render(scene, &self.cache);
        self.background_dirty = true;
        true
    }

    pub fn handle_event(&mut self, event: PointerEvent, scene: &mut Scene, tools: &DrawingTools) {
        match event {
            PointerEvent::Down(pos) => self.pointer_down(pos, scene, tools),
            PointerEvent::Move(pos) => self.pointer_move(pos, scene, tools),
            PointerEvent::Up(_) => self.pointer_up(),
            PointerEvent::Leave => self.pointer_leave(),
        }
    }

    /// Pointer pressed at `screen`
    pub fn pointer_down(&mut self, screen: Pos2, scene: &mut Scene, tools: &DrawingTools) {
        self.sync_resolution(scene);
        let point = self.display.to_canvas(screen);
        self.controller.pointer_down(point, scene, &mut self.overlay, tools);
    }

    pub fn pointer_move(&mut self, screen: Pos2, scene: &mut Scene, tools: &DrawingTools) {
        self.sync_resolution(scene);
        let point = self.display.to_canvas(screen);
        self.controller.pointer_move(point, scene, &mut self.overlay, tools);
    }

    pub fn pointer_up(&mut self) {
        self.controller.pointer_up(&mut self.overlay);
    }

    pub fn pointer_leave(&mut self) {
        self.controller.pointer_up(&mut self.overlay);
    }

    pub fn undo(&mut self) {
        self.overlay.undo();
    }

    pub fn redo(&mut self) {
        self.overlay.redo();
    }

    pub fn can_undo(&self) -> bool {
        self.overlay.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.overlay.can_redo()
    }

    pub fn status(&self) -> DrawingStatus {
        DrawingStatus {
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
            is_drawing: self.controller.state().is_drawing(),
        }
    }

    pub fn drawing_actions(&mut self) -> DrawingActions<'_> {
        DrawingActions { canvas: self }
    }

    /// Blank the overlay as one undoable step
    pub fn request_clear(&mut self) {
        self.overlay.clear();
    }

    /// Clear when `revision` is newer than the last one seen. For hosts that
    /// signal clears with a counter.
    pub fn clear_with_revision(&mut self, revision: u64) {
        if revision > self.clear_revision {
            self.clear_revision = revision;
            self.request_clear();
        }
    }

    /// Rotate the selected image by the configured step
    pub fn rotate_selected(&mut self, scene: &mut Scene) {
        let Some(image) = scene.selected() else {
            return;
        };
        let id = image.id;
        let rotation = (image.rotation + self.config.rotation_step) % 360.0;
        scene.update_image(id, ImageUpdate::rotation(rotation));
        log::debug!("Rotated image {} to {}°", id, rotation);
    }

    /// Remove the selected image and its cached bitmap
    pub fn delete_selected(&mut self, scene: &mut Scene) {
        let Some(id) = scene.selected_id() else {
            return;
        };
        self.controller.cancel(&mut self.overlay);
        if let Some(image) = scene.remove_image(id) {
            self.cache.evict(id);
            log::info!("Deleted image {} ({})", id, image.name);
        }
    }

    /// Empty the scene and clear the drawing. The drawing clear can be undone.
    pub fn reset(&mut self, scene: &mut Scene) {
        self.controller.cancel(&mut self.overlay);
        scene.reset();
        self.overlay.clear();
        self.sync_resolution(scene);
        log::info!("Canvas reset");
    }

    /// Cursor to show for a pointer hovering at `screen`
    pub fn cursor_hint(&self, screen: Option<Pos2>, scene: &Scene, tools: &DrawingTools) -> CursorHint {
        let point = screen.map(|screen| self.display.to_canvas(screen));
        self.controller.cursor_hint(point, scene, tools)
    }

    /// The drawing composited over the background, as one image
    pub fn flatten(&self) -> RgbaImage {
        let mut flat = self.background.surface().clone();
        flat.composite_over(self.overlay.surface());
        flat.into_image()
    }
}
