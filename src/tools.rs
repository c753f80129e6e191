use egui::Color32;
use serde::{Deserialize, Serialize};

/// What a pointer-down on the canvas does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ToolMode {
    /// Select, move and resize images
    #[default]
    Select,
    Brush,
    Eraser,
}

impl ToolMode {
    pub const ALL: [ToolMode; 3] = [ToolMode::Select, ToolMode::Brush, ToolMode::Eraser];

    /// Brush and eraser paint on the overlay; select manipulates images
    pub fn is_drawing(&self) -> bool {
        matches!(self, ToolMode::Brush | ToolMode::Eraser)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ToolMode::Select => "◻ Select",
            ToolMode::Brush => "🖌 Brush",
            ToolMode::Eraser => "⌫ Eraser",
        }
    }
}

/// Drawing-tool settings owned by the host. The canvas only reads them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawingTools {
    pub mode: ToolMode,
    pub color: Color32,
    /// Stroke width in canvas pixels
    pub size: f32,
}

impl Default for DrawingTools {
    fn default() -> Self {
        Self {
            mode: ToolMode::Select,
            color: Color32::from_rgb(0xff, 0x00, 0x00),
            size: 10.0,
        }
    }
}

impl DrawingTools {
    pub fn with_mode(mut self, mode: ToolMode) -> Self {
        self.mode = mode;
        self
    }
}
