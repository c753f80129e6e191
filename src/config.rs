use egui::Color32;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{ConfigError, ConfigResult};
use crate::scene::CanvasResolution;

/// Tunable constants for the canvas core.
///
/// Every field has a default, so a partial JSON file only overrides what it
/// names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Smallest width/height an image can be resized to, in canvas pixels
    pub min_image_size: f32,
    /// Side length of a transform handle square
    pub handle_size: f32,
    /// Extra margin around each handle square that still counts as a hit
    pub handle_tolerance: f32,
    /// Distance between background grid lines
    pub grid_pitch: u32,
    /// Dash pattern of the grid lines: (on, off) in pixels
    pub grid_dash: (u32, u32),
    pub background_color: Color32,
    pub grid_color: Color32,
    /// Selection outline and handle fill colour
    pub highlight_color: Color32,
    /// Handle outline colour
    pub handle_outline_color: Color32,
    /// Width of the selection outline and handle outlines
    pub selection_line_width: f32,
    /// The display scale never drops below this
    pub min_display_scale: f32,
    /// Subtracted from the container size before fitting the canvas
    pub layout_padding: f32,
    /// Lower bound for the usable container extent after padding
    pub min_layout_extent: f32,
    /// Degrees added by one rotate step
    pub rotation_step: f32,
    pub default_resolution: CanvasResolution,
    /// Edge length of images added after the first one
    pub added_image_size: f32,
    /// Offset between consecutively added images
    pub cascade_step: f32,
    /// Number of cascade positions before wrapping back to the origin
    pub cascade_wrap: u32,
    /// Padding between cells and around the border in grid arrangement
    pub grid_layout_padding: f32,
    /// Maximum number of undo snapshots kept
    pub history_limit: usize,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            min_image_size: 20.0,
            handle_size: 12.0,
            handle_tolerance: 14.0,
            grid_pitch: 20,
            grid_dash: (2, 2),
            background_color: Color32::from_rgb(0x1f, 0x29, 0x37),
            grid_color: Color32::from_rgb(0x37, 0x41, 0x51),
            highlight_color: Color32::from_rgb(0x06, 0xb6, 0xd4),
            handle_outline_color: Color32::WHITE,
            selection_line_width: 2.0,
            min_display_scale: 0.15,
            layout_padding: 0.0,
            min_layout_extent: 0.0,
            rotation_step: 15.0,
            default_resolution: CanvasResolution::new(1024, 1024),
            added_image_size: 150.0,
            cascade_step: 20.0,
            cascade_wrap: 10,
            grid_layout_padding: 20.0,
            history_limit: 50,
        }
    }
}

impl CanvasConfig {
    /// Parse a config from JSON text
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a config file, falling back to defaults when it does not exist
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let json = fs::read_to_string(path).map_err(ConfigError::Read)?;
        Self::from_json_str(&json)
    }

    /// Write the config as pretty-printed JSON, creating parent directories
    pub fn save(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        let path = path.as_ref();
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(ConfigError::Write)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(ConfigError::Write)
    }
}
