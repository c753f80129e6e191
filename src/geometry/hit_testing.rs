use egui::{Pos2, Vec2};
use serde::{Deserialize, Serialize};

use super::transform::world_to_local;
use crate::scene::PlacedImage;

// Handle squares are this wide in canvas pixels
pub const HANDLE_SIZE: f32 = 12.0;
pub const HANDLE_TOLERANCE: f32 = 14.0;

/// One of the eight transform handles on an image's rotated bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Handle {
    N,
    S,
    E,
    W,
    NE,
    NW,
    SE,
    SW,
}

impl Handle {
    /// All handles in hit-test priority order: corners first, then edges.
    pub const ALL: [Handle; 8] = [
        Handle::NW,
        Handle::NE,
        Handle::SW,
        Handle::SE,
        Handle::N,
        Handle::S,
        Handle::W,
        Handle::E,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Handle::N => "n",
            Handle::S => "s",
            Handle::E => "e",
            Handle::W => "w",
            Handle::NE => "ne",
            Handle::NW => "nw",
            Handle::SE => "se",
            Handle::SW => "sw",
        }
    }

    /// Growth direction per axis: -1, 0 (axis untouched) or 1.
    pub fn signs(&self) -> Vec2 {
        match self {
            Handle::N => Vec2::new(0.0, -1.0),
            Handle::S => Vec2::new(0.0, 1.0),
            Handle::E => Vec2::new(1.0, 0.0),
            Handle::W => Vec2::new(-1.0, 0.0),
            Handle::NE => Vec2::new(1.0, -1.0),
            Handle::NW => Vec2::new(-1.0, -1.0),
            Handle::SE => Vec2::new(1.0, 1.0),
            Handle::SW => Vec2::new(-1.0, 1.0),
        }
    }

    /// Edge handles constrain a single axis
    pub fn is_edge(&self) -> bool {
        matches!(self, Handle::N | Handle::S | Handle::E | Handle::W)
    }

    pub fn moves_x(&self) -> bool {
        self.signs().x != 0.0
    }

    pub fn moves_y(&self) -> bool {
        self.signs().y != 0.0
    }

    /// Center of this handle relative to the image center, before rotation
    pub fn local_position(&self, size: Vec2) -> Vec2 {
        self.signs() * (size / 2.0)
    }

    /// The side or corner opposite this handle, relative to the image
    /// center, before rotation.
    pub fn anchor_local(&self, size: Vec2) -> Vec2 {
        -self.local_position(size)
    }
}

/// Size and slack of the handle hit regions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandleGeometry {
    pub size: f32,
    pub tolerance: f32,
}

impl Default for HandleGeometry {
    fn default() -> Self {
        Self {
            size: HANDLE_SIZE,
            tolerance: HANDLE_TOLERANCE,
        }
    }
}

impl HandleGeometry {
    /// Half extent of a handle's hit square, tolerance included
    fn reach(&self) -> f32 {
        self.size / 2.0 + self.tolerance
    }
}

/// Center of the image in world space
pub fn image_center(image: &PlacedImage) -> Pos2 {
    image.position + image.size / 2.0
}

/// True iff `point` lies inside the image's rotated rectangle (edges included).
pub fn hit_test_image(point: Pos2, image: &PlacedImage) -> bool {
    let local = world_to_local(point, image_center(image), image.rotation_radians());
    let half = image.size / 2.0;
    local.x.abs() <= half.x && local.y.abs() <= half.y
}

/// The first handle (in [`Handle::ALL`] order) whose hit square contains
/// `point`, evaluated in the image's local frame.
pub fn hit_test_handle(point: Pos2, image: &PlacedImage, geometry: &HandleGeometry) -> Option<Handle> {
    let local = world_to_local(point, image_center(image), image.rotation_radians());
    let reach = geometry.reach();

    Handle::ALL.into_iter().find(|handle| {
        let offset = local - handle.local_position(image.size);
        offset.x.abs() <= reach && offset.y.abs() <= reach
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::PlacedImage;

    fn image_at(position: Pos2, size: Vec2, rotation: f32) -> PlacedImage {
        let mut image = PlacedImage::new("test", position, size);
        image.rotation = rotation;
        image
    }

    #[test]
    fn test_edge_and_corner_signs() {
        assert!(Handle::E.is_edge());
        assert!(!Handle::SE.is_edge());
        assert!(Handle::N.moves_y() && !Handle::N.moves_x());
        assert_eq!(Handle::NW.anchor_local(Vec2::new(100.0, 50.0)), Vec2::new(50.0, 25.0));
        assert_eq!(Handle::W.anchor_local(Vec2::new(100.0, 50.0)), Vec2::new(50.0, 0.0));
    }

    #[test]
    fn test_unrotated_hit_includes_edges() {
        let image = image_at(Pos2::new(10.0, 10.0), Vec2::new(100.0, 50.0), 0.0);
        assert!(hit_test_image(Pos2::new(10.0, 10.0), &image));
        assert!(hit_test_image(Pos2::new(110.0, 60.0), &image));
        assert!(!hit_test_image(Pos2::new(110.5, 60.0), &image));
    }

    #[test]
    fn test_handle_found_in_rotated_frame() {
        // 90 degrees: the local +x edge ("e") now faces world +y
        let image = image_at(Pos2::new(0.0, 0.0), Vec2::new(100.0, 80.0), 90.0);
        let center = image_center(&image);
        let handle = hit_test_handle(center + Vec2::new(0.0, 50.0), &image, &HandleGeometry::default());
        assert_eq!(handle, Some(Handle::E));
    }

    #[test]
    fn test_corner_wins_over_edge_on_small_image() {
        let image = image_at(Pos2::ZERO, Vec2::new(20.0, 20.0), 0.0);
        let handle = hit_test_handle(Pos2::new(25.0, 25.0), &image, &HandleGeometry::default());
        assert_eq!(handle, Some(Handle::SE));
    }

    #[test]
    fn test_far_point_has_no_handle() {
        let image = image_at(Pos2::ZERO, Vec2::new(200.0, 200.0), 0.0);
        assert_eq!(hit_test_handle(Pos2::new(100.0, 100.0), &image, &HandleGeometry::default()), None);
    }
}
