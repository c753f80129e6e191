use egui::{Pos2, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::config::CanvasConfig;
use crate::geometry::hit_test_image;
use crate::image_cache::ImageSource;

/// Stable identifier of a placed image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageId(Uuid);

impl ImageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ImageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fixed pixel resolution of the virtual canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CanvasResolution {
    pub width: u32,
    pub height: u32,
}

/// A named aspect-ratio choice offered to the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolutionPreset {
    pub label: &'static str,
    pub resolution: CanvasResolution,
}

impl CanvasResolution {
    pub const PRESETS: [ResolutionPreset; 7] = [
        ResolutionPreset { label: "1:1", resolution: CanvasResolution::new(1024, 1024) },
        ResolutionPreset { label: "4:3", resolution: CanvasResolution::new(1368, 1024) },
        ResolutionPreset { label: "3:4", resolution: CanvasResolution::new(1024, 1368) },
        ResolutionPreset { label: "16:9", resolution: CanvasResolution::new(1824, 1024) },
        ResolutionPreset { label: "9:16", resolution: CanvasResolution::new(1024, 1824) },
        ResolutionPreset { label: "3:2", resolution: CanvasResolution::new(1536, 1024) },
        ResolutionPreset { label: "2:3", resolution: CanvasResolution::new(1024, 1536) },
    ];

    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Display for CanvasResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// An image placed on the canvas.
///
/// `position` is the top-left corner of the unrotated box; `rotation` is in
/// degrees about the box center.
#[derive(Debug, Clone)]
pub struct PlacedImage {
    pub id: ImageId,
    pub name: String,
    pub source: Option<ImageSource>,
    pub position: Pos2,
    pub size: Vec2,
    pub rotation: f32,
    selected: bool,
}

impl PlacedImage {
    pub fn new(name: &str, position: Pos2, size: Vec2) -> Self {
        Self {
            id: ImageId::new(),
            name: name.to_string(),
            source: None,
            position,
            size,
            rotation: 0.0,
            selected: false,
        }
    }

    pub fn with_source(mut self, source: ImageSource) -> Self {
        self.source = Some(source);
        self
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn rotation_radians(&self) -> f32 {
        self.rotation.to_radians()
    }

    pub fn center(&self) -> Pos2 {
        self.position + self.size / 2.0
    }
}

/// A partial update of an image's transform. `None` leaves a field as is.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ImageUpdate {
    pub position: Option<Pos2>,
    pub size: Option<Vec2>,
    pub rotation: Option<f32>,
}

impl ImageUpdate {
    pub fn position(position: Pos2) -> Self {
        Self { position: Some(position), ..Default::default() }
    }

    pub fn rotation(rotation: f32) -> Self {
        Self { rotation: Some(rotation), ..Default::default() }
    }

    pub fn bounds(position: Pos2, size: Vec2) -> Self {
        Self { position: Some(position), size: Some(size), ..Default::default() }
    }
}

/// Placement rules the scene applies when images are inserted or arranged
#[derive(Debug, Clone, Copy, PartialEq)]
struct Placement {
    added_image_size: f32,
    cascade_step: f32,
    cascade_wrap: u32,
    grid_padding: f32,
    min_image_size: f32,
    default_resolution: CanvasResolution,
}

impl Placement {
    fn from_config(config: &CanvasConfig) -> Self {
        Self {
            added_image_size: config.added_image_size,
            cascade_step: config.cascade_step,
            cascade_wrap: config.cascade_wrap.max(1),
            grid_padding: config.grid_layout_padding,
            min_image_size: config.min_image_size,
            default_resolution: config.default_resolution,
        }
    }
}

/// Ordered list of placed images plus the canvas resolution.
///
/// List order is paint order: the last image is drawn on top and wins hit
/// tests. At most one image is selected at any time.
#[derive(Debug, Clone)]
pub struct Scene {
    images: Vec<PlacedImage>,
    resolution: CanvasResolution,
    version: u64,
    placement: Placement,
}

impl Default for Scene {
    fn default() -> Self {
        Self::with_config(&CanvasConfig::default())
    }
}

impl Scene {
    pub fn new(resolution: CanvasResolution) -> Self {
        let mut scene = Self::default();
        scene.resolution = resolution;
        scene
    }

    pub fn with_config(config: &CanvasConfig) -> Self {
        Self {
            images: Vec::new(),
            resolution: config.default_resolution,
            version: 0,
            placement: Placement::from_config(config),
        }
    }

    /// Bumped on every mutation; renderers compare it to skip idle frames
    pub fn version(&self) -> u64 {
        self.version
    }

    fn mark_modified(&mut self) {
        self.version += 1;
    }

    pub fn resolution(&self) -> CanvasResolution {
        self.resolution
    }

    pub fn set_resolution(&mut self, resolution: CanvasResolution) {
        if self.resolution != resolution {
            log::info!("Canvas resolution {} -> {}", self.resolution, resolution);
            self.resolution = resolution;
            self.mark_modified();
        }
    }

    pub fn images(&self) -> &[PlacedImage] {
        &self.images
    }

    pub fn image(&self, id: ImageId) -> Option<&PlacedImage> {
        self.images.iter().find(|image| image.id == id)
    }

    pub fn contains(&self, id: ImageId) -> bool {
        self.image(id).is_some()
    }

    /// Add an image on top of the stack.
    ///
    /// The first image fills the whole canvas; later ones get a fixed size at
    /// a cascaded offset so they do not stack exactly.
    pub fn add_image(&mut self, name: &str, source: ImageSource) -> ImageId {
        let (position, size) = if self.images.is_empty() {
            (Pos2::ZERO, self.resolution.size())
        } else {
            let slot = (self.images.len() as u32 - 1) % self.placement.cascade_wrap;
            let offset = slot as f32 * self.placement.cascade_step;
            (Pos2::new(offset, offset), Vec2::splat(self.placement.added_image_size))
        };

        self.insert(PlacedImage::new(name, position, size).with_source(source))
    }

    pub fn add_images<'a>(&mut self, images: impl IntoIterator<Item = (&'a str, ImageSource)>) -> Vec<ImageId> {
        images
            .into_iter()
            .map(|(name, source)| self.add_image(name, source))
            .collect()
    }

    /// Insert a fully specified image on top. Its selection flag is dropped.
    pub fn insert(&mut self, mut image: PlacedImage) -> ImageId {
        image.selected = false;
        let id = image.id;
        log::debug!("Inserted image {} ({})", id, image.name);
        self.images.push(image);
        self.mark_modified();
        id
    }

    pub fn remove_image(&mut self, id: ImageId) -> Option<PlacedImage> {
        let index = self.images.iter().position(|image| image.id == id)?;
        self.mark_modified();
        Some(self.images.remove(index))
    }

    /// Apply a partial transform update. Returns false for unknown ids.
    pub fn update_image(&mut self, id: ImageId, update: ImageUpdate) -> bool {
        let Some(image) = self.images.iter_mut().find(|image| image.id == id) else {
            return false;
        };

        if let Some(position) = update.position {
            image.position = position;
        }
        if let Some(size) = update.size {
            image.size = size;
        }
        if let Some(rotation) = update.rotation {
            image.rotation = rotation;
        }
        self.mark_modified();
        true
    }

    /// Select one image (deselecting every other) or clear the selection.
    pub fn select(&mut self, id: Option<ImageId>) {
        for image in &mut self.images {
            image.selected = Some(image.id) == id;
        }
        self.mark_modified();
    }

    pub fn selected(&self) -> Option<&PlacedImage> {
        self.images.iter().find(|image| image.selected)
    }

    pub fn selected_id(&self) -> Option<ImageId> {
        self.selected().map(|image| image.id)
    }

    /// Topmost image containing `point`
    pub fn image_at(&self, point: Pos2) -> Option<&PlacedImage> {
        self.images.iter().rev().find(|image| hit_test_image(point, image))
    }

    /// Lay out the first `rows * cols` images in equal cells, dropping the
    /// rest. Rotation and selection are reset.
    pub fn arrange_as_grid(&mut self, rows: u32, cols: u32) {
        if self.images.is_empty() || rows == 0 || cols == 0 {
            return;
        }

        let padding = self.placement.grid_padding;
        let canvas = self.resolution.size();
        let cell = Vec2::new(
            (canvas.x - padding * (cols as f32 + 1.0)) / cols as f32,
            (canvas.y - padding * (rows as f32 + 1.0)) / rows as f32,
        )
        .max(Vec2::splat(self.placement.min_image_size));

        let capacity = usize::try_from(rows.saturating_mul(cols)).unwrap_or(usize::MAX);
        self.images.truncate(capacity);
        let cols = cols as usize;
        for (index, image) in self.images.iter_mut().enumerate() {
            let row = index / cols;
            let col = index % cols;
            image.position = Pos2::new(
                padding + col as f32 * (cell.x + padding),
                padding + row as f32 * (cell.y + padding),
            );
            image.size = cell;
            image.rotation = 0.0;
            image.selected = false;
        }

        log::info!("Arranged {} images as {}x{} grid", self.images.len(), rows, cols);
        self.mark_modified();
    }

    /// Remove every image, keeping the resolution
    pub fn reset(&mut self) {
        self.images.clear();
        self.mark_modified();
    }

    /// Remove every image and go back to the default resolution
    pub fn clear(&mut self) {
        self.reset();
        self.set_resolution(self.placement.default_resolution);
    }
}
