use egui::{Color32, Vec2};

use crate::config::CanvasConfig;
use crate::geometry::{Handle, local_to_world};
use crate::image_cache::ImageCache;
use crate::raster::Surface;
use crate::scene::{CanvasResolution, PlacedImage, Scene};

/// Colours and sizes the background pass draws with
#[derive(Debug, Clone, Copy, PartialEq)]
struct RenderStyle {
    background: Color32,
    grid: Color32,
    grid_pitch: u32,
    grid_dash: (u32, u32),
    highlight: Color32,
    handle_outline: Color32,
    selection_width: f32,
    handle_size: f32,
}

impl RenderStyle {
    fn from_config(config: &CanvasConfig) -> Self {
        Self {
            background: config.background_color,
            grid: config.grid_color,
            grid_pitch: config.grid_pitch,
            grid_dash: config.grid_dash,
            highlight: config.highlight_color,
            handle_outline: config.handle_outline_color,
            selection_width: config.selection_line_width,
            handle_size: config.handle_size,
        }
    }
}

/// Composites the grid and all placed images into the background surface.
#[derive(Debug)]
pub struct BackgroundRenderer {
    surface: Surface,
    style: RenderStyle,
    rendered_version: Option<u64>,
}

impl BackgroundRenderer {
    /// Creates a renderer with an unavailable (zero-sized) surface
    ///
    /// Args:
    ///     config (CanvasConfig): Supplies colours, grid pitch and handle size
    pub fn new(config: &CanvasConfig) -> Self {
        Self {
            surface: Surface::default(),
            style: RenderStyle::from_config(config),
            rendered_version: None,
        }
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Reallocate the surface for a new canvas resolution. The old contents
    /// are discarded; the next render repaints everything.
    pub fn resize(&mut self, resolution: CanvasResolution) {
        if self.surface.dimensions() != (resolution.width, resolution.height) {
            self.surface.resize(resolution.width, resolution.height);
            self.invalidate();
        }
    }

    /// True if the surface does not show `version` of the scene yet
    pub fn is_stale(&self, version: u64) -> bool {
        self.rendered_version != Some(version)
    }

    /// Force the next render
    pub fn invalidate(&mut self) {
        self.rendered_version = None;
    }

    /// Repaints the whole surface from the scene
    ///
    /// Images whose bitmap is not decoded yet are skipped for this pass.
    ///
    /// Args:
    ///     scene (Scene): Images in paint order plus the selection
    ///     cache (ImageCache): Source of decoded bitmaps
    pub fn render(&mut self, scene: &Scene, cache: &ImageCache) {
        self.rendered_version = Some(scene.version());
        if self.surface.is_empty() {
            return;
        }

        let style = self.style;
        self.surface.fill(style.background);
        self.surface.draw_grid(style.grid_pitch, style.grid_dash, style.grid);

        for image in scene.images() {
            let center = image.center();
            let rotation = image.rotation_radians();
            if let Some(bitmap) = cache.get(image.id) {
                self.surface.draw_image_fitted(bitmap, center, image.size, rotation);
            }
            if image.is_selected() {
                self.surface
                    .stroke_rotated_rect(center, image.size, rotation, style.selection_width, style.highlight);
            }
        }

        if let Some(selected) = scene.selected() {
            self.draw_handles(selected);
        }
    }

    fn draw_handles(&mut self, image: &PlacedImage) {
        let center = image.center();
        let rotation = image.rotation_radians();
        let square = Vec2::splat(self.style.handle_size);

        for handle in Handle::ALL {
            let at = center + local_to_world(handle.local_position(image.size), rotation);
            self.surface.fill_rotated_rect(at, square, rotation, self.style.highlight);
            self.surface.stroke_rotated_rect(
                at,
                square,
                rotation,
                self.style.selection_width,
                self.style.handle_outline,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_cache::{DecodeExecutor, ImageSource, RedrawSignal};
    use crate::scene::ImageUpdate;
    use egui::Pos2;
    use image::{Rgba, RgbaImage};

    fn setup() -> (BackgroundRenderer, Scene, ImageCache) {
        let config = CanvasConfig::default();
        let mut renderer = BackgroundRenderer::new(&config);
        renderer.resize(CanvasResolution::new(200, 200));
        let scene = Scene::new(CanvasResolution::new(200, 200));
        let cache = ImageCache::new(DecodeExecutor::Inline, RedrawSignal::new());
        (renderer, scene, cache)
    }

    #[test]
    fn test_empty_scene_is_background() {
        let (mut renderer, scene, cache) = setup();
        renderer.render(&scene, &cache);

        let expected = Rgba(CanvasConfig::default().background_color.to_srgba_unmultiplied());
        assert_eq!(renderer.surface().pixel(10, 10), Some(expected));
        assert!(!renderer.is_stale(scene.version()));
    }

    #[test]
    fn test_undecoded_image_is_skipped() {
        let (mut renderer, mut scene, mut cache) = setup();
        let red = RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 255]));
        let id = scene.add_image("red", ImageSource::rgba("mem://red", red));
        scene.update_image(id, ImageUpdate::bounds(Pos2::new(50.0, 50.0), Vec2::splat(100.0)));

        cache.reconcile(&scene);
        renderer.render(&scene, &cache);
        assert_ne!(renderer.surface().pixel(100, 100), Some(Rgba([255, 0, 0, 255])));

        cache.poll();
        renderer.render(&scene, &cache);
        assert_eq!(renderer.surface().pixel(100, 100), Some(Rgba([255, 0, 0, 255])));
    }

    #[test]
    fn test_selected_image_gets_handles() {
        let (mut renderer, mut scene, cache) = setup();
        let id = scene.insert(PlacedImage::new("box", Pos2::new(50.0, 50.0), Vec2::splat(100.0)));
        scene.select(Some(id));
        renderer.render(&scene, &cache);

        let highlight = Rgba(CanvasConfig::default().highlight_color.to_srgba_unmultiplied());
        // center of the se handle
        assert_eq!(renderer.surface().pixel(150, 150), Some(highlight));
        // middle of the top edge is both outline and n handle
        assert_eq!(renderer.surface().pixel(100, 50), Some(highlight));
    }

    #[test]
    fn test_handle_outline_uses_selection_width() {
        let config = CanvasConfig {
            selection_line_width: 6.0,
            ..CanvasConfig::default()
        };
        let mut renderer = BackgroundRenderer::new(&config);
        renderer.resize(CanvasResolution::new(200, 200));
        let mut scene = Scene::new(CanvasResolution::new(200, 200));
        let cache = ImageCache::new(DecodeExecutor::Inline, RedrawSignal::new());
        let id = scene.insert(PlacedImage::new("box", Pos2::new(50.0, 50.0), Vec2::splat(100.0)));
        scene.select(Some(id));
        renderer.render(&scene, &cache);

        // se handle spans 144..156; a 6px outline reaches 3px inside its left edge
        let outline = Rgba(config.handle_outline_color.to_srgba_unmultiplied());
        assert_eq!(renderer.surface().pixel(145, 150), Some(outline));
        let highlight = Rgba(config.highlight_color.to_srgba_unmultiplied());
        assert_eq!(renderer.surface().pixel(150, 150), Some(highlight));
    }
}
