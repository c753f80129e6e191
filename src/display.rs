use egui::{Pos2, Vec2};

use crate::config::CanvasConfig;
use crate::scene::CanvasResolution;

/// Fits the fixed-resolution canvas into the space the host has, and maps
/// screen positions back to canvas pixels.
///
/// Purely presentational: never persisted, never changes the resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayScale {
    scale: f32,
    origin: Pos2,
    min_scale: f32,
    padding: f32,
    min_extent: f32,
}

impl Default for DisplayScale {
    fn default() -> Self {
        Self::new(&CanvasConfig::default())
    }
}

impl DisplayScale {
    pub fn new(config: &CanvasConfig) -> Self {
        Self {
            scale: 1.0,
            origin: Pos2::ZERO,
            min_scale: config.min_display_scale,
            padding: config.layout_padding,
            min_extent: config.min_layout_extent,
        }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn origin(&self) -> Pos2 {
        self.origin
    }

    /// Screen position of the canvas' top-left corner
    pub fn set_origin(&mut self, origin: Pos2) {
        self.origin = origin;
    }

    /// Largest scale (never above 1, never below the floor) at which the
    /// whole canvas fits in `container`.
    pub fn recompute(&mut self, container: Vec2, resolution: CanvasResolution) -> f32 {
        let fit = if resolution.is_empty() {
            1.0
        } else {
            let available = (container - Vec2::splat(self.padding)).max(Vec2::splat(self.min_extent));
            let ratio = available / resolution.size();
            ratio.x.min(ratio.y).min(1.0)
        };

        let scale = if fit.is_finite() { fit.max(self.min_scale) } else { 1.0 };
        if scale != self.scale {
            log::debug!("Display scale {:.3} -> {:.3}", self.scale, scale);
            self.scale = scale;
        }
        scale
    }

    pub fn to_canvas(&self, screen: Pos2) -> Pos2 {
        Pos2::ZERO + (screen - self.origin) / self.scale
    }

    pub fn to_screen(&self, canvas: Pos2) -> Pos2 {
        self.origin + canvas.to_vec2() * self.scale
    }
}
