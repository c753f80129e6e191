#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod canvas;
pub mod config;
pub mod display;
pub mod error;
pub mod file_handler;
pub mod geometry;
pub mod history;
pub mod image_cache;
pub mod input;
pub mod interaction;
pub mod overlay;
pub mod raster;
pub mod renderer;
pub mod scene;
pub mod tools;

pub use app::CollageApp;
pub use canvas::{CollageCanvas, DrawingActions, DrawingStatus};
pub use config::CanvasConfig;
pub use display::DisplayScale;
pub use error::{CanvasError, ConfigError};
pub use geometry::{Handle, HandleGeometry};
pub use history::SnapshotHistory;
pub use image_cache::{DecodeExecutor, ImageCache, ImageSource, RedrawSignal};
pub use input::{InputHandler, PointerEvent};
pub use interaction::{CursorHint, InteractionController, InteractionState, ResizeGesture};
pub use overlay::DrawingOverlay;
pub use raster::{Composite, Surface};
pub use renderer::BackgroundRenderer;
pub use scene::{CanvasResolution, ImageId, ImageUpdate, PlacedImage, ResolutionPreset, Scene};
pub use tools::{DrawingTools, ToolMode};
