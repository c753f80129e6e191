//! Pure math for the canvas: rotation between world and image-local space,
//! and rotation-aware hit testing of images and their transform handles.

pub mod hit_testing;
mod transform;

pub use hit_testing::{Handle, HandleGeometry, hit_test_handle, hit_test_image, image_center};
pub use transform::{local_to_world, rotate, rotated_bounds, world_to_local};
