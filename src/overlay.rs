use egui::Pos2;

use crate::history::SnapshotHistory;
use crate::raster::{Composite, Surface};
use crate::scene::CanvasResolution;
use crate::tools::{DrawingTools, ToolMode};

/// Freehand paint layer above the background, with snapshot undo/redo.
///
/// One snapshot is recorded per gesture (at stroke start) and per clear. The
/// overlay has no stroke list; undo swaps whole pixel buffers.
#[derive(Debug)]
pub struct DrawingOverlay {
    surface: Surface,
    history: SnapshotHistory,
    last_point: Option<Pos2>,
    /// Pixels changed since the host last uploaded the surface
    dirty: bool,
}

impl DrawingOverlay {
    pub fn new(history_limit: usize) -> Self {
        Self {
            surface: Surface::default(),
            history: SnapshotHistory::new(history_limit),
            last_point: None,
            dirty: true,
        }
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn is_drawing(&self) -> bool {
        self.last_point.is_some()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Clear and return the dirty flag
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Start a stroke: snapshot for undo, then paint a dot so a click without
    /// movement still leaves a mark. Ignored in select mode.
    pub fn begin_stroke(&mut self, point: Pos2, tools: &DrawingTools) {
        if self.surface.is_empty() || !tools.mode.is_drawing() {
            return;
        }
        self.history.push(self.surface.snapshot());
        self.last_point = Some(point);
        self.paint(point, point, tools);
    }

    /// Continue the stroke from the last point. Ignored outside a stroke.
    pub fn extend_stroke(&mut self, point: Pos2, tools: &DrawingTools) {
        let Some(last) = self.last_point else {
            return;
        };
        self.paint(last, point, tools);
        self.last_point = Some(point);
    }

    pub fn end_stroke(&mut self) {
        if self.last_point.take().is_some() {
            log::debug!("Stroke finished");
        }
    }

    fn paint(&mut self, from: Pos2, to: Pos2, tools: &DrawingTools) {
        let mode = match tools.mode {
            ToolMode::Brush => Composite::SourceOver,
            ToolMode::Eraser => Composite::DestinationOut,
            ToolMode::Select => return,
        };
        self.surface.stroke_segment(from, to, tools.size, tools.color, mode);
        self.dirty = true;
    }

    /// Restore the state before the last gesture. No-op with empty history.
    pub fn undo(&mut self) {
        if self.surface.is_empty() {
            return;
        }
        if let Some(previous) = self.history.undo(self.surface.snapshot()) {
            self.surface.restore(previous);
            self.dirty = true;
            log::debug!("Undo");
        }
    }

    pub fn redo(&mut self) {
        if self.surface.is_empty() {
            return;
        }
        if let Some(next) = self.history.redo(self.surface.snapshot()) {
            self.surface.restore(next);
            self.dirty = true;
            log::debug!("Redo");
        }
    }

    /// Blank the overlay as one undoable step
    pub fn clear(&mut self) {
        if self.surface.is_empty() {
            return;
        }
        self.history.push(self.surface.snapshot());
        self.surface.clear();
        self.dirty = true;
        log::info!("Drawing cleared");
    }

    /// Match a new canvas resolution. Existing marks are stretched to fill
    /// the new size; undo history is dropped.
    pub fn resize(&mut self, resolution: CanvasResolution) {
        if self.surface.dimensions() == (resolution.width, resolution.height) {
            return;
        }
        log::info!(
            "Overlay {}x{} -> {}",
            self.surface.width(),
            self.surface.height(),
            resolution
        );
        self.surface.resize_stretched(resolution.width, resolution.height);
        self.history.clear();
        self.last_point = None;
        self.dirty = true;
    }
}
