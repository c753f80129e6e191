use collage_canvas::geometry::{
    Handle, HandleGeometry, hit_test_handle, hit_test_image, local_to_world, rotate, world_to_local,
};
use collage_canvas::PlacedImage;
use egui::{Pos2, Vec2};

/// A `size` image whose center sits at `center`
fn image_centered(center: Pos2, size: Vec2, rotation: f32) -> PlacedImage {
    let mut image = PlacedImage::new("test", center - size / 2.0, size);
    image.rotation = rotation;
    image
}

#[test]
fn test_rotated_square_hit_test() {
    let diamond = image_centered(Pos2::ZERO, Vec2::splat(100.0), 45.0);
    let square = image_centered(Pos2::ZERO, Vec2::splat(100.0), 0.0);

    // Corner region of the unrotated square is cut away by the rotation
    assert!(!hit_test_image(Pos2::new(45.0, 45.0), &diamond));
    assert!(hit_test_image(Pos2::new(45.0, 45.0), &square));

    // Along the axis the rotated corner reaches further out
    assert!(hit_test_image(Pos2::new(65.0, 0.0), &diamond));
    assert!(!hit_test_image(Pos2::new(65.0, 0.0), &square));

    assert!(hit_test_image(Pos2::new(35.0, 35.0), &diamond));
}

#[test]
fn test_hit_test_matches_unrotated_frame() {
    let rotation: f32 = 30.0;
    let rotated = image_centered(Pos2::new(200.0, 120.0), Vec2::new(160.0, 90.0), rotation);
    let unrotated = image_centered(Pos2::ZERO, Vec2::new(160.0, 90.0), 0.0);

    for x in (0..400).step_by(13) {
        for y in (0..260).step_by(11) {
            let point = Pos2::new(x as f32, y as f32);
            let local = world_to_local(point, rotated.center(), rotation.to_radians());
            // Skip points that sit on an edge within float noise
            let half = unrotated.size / 2.0;
            if (local.x.abs() - half.x).abs() < 1e-2 || (local.y.abs() - half.y).abs() < 1e-2 {
                continue;
            }
            assert_eq!(
                hit_test_image(point, &rotated),
                hit_test_image(Pos2::ZERO + local, &unrotated),
                "point {:?}",
                point
            );
        }
    }
}

#[test]
fn test_local_world_round_trip() {
    let offset = Vec2::new(37.0, -12.0);
    let back = world_to_local(Pos2::new(10.0, 10.0) + local_to_world(offset, 1.1), Pos2::new(10.0, 10.0), 1.1);
    assert!((back - offset).length() < 1e-4);
    assert!((rotate(offset, 0.0) - offset).length() < 1e-6);
}

#[test]
fn test_handles_follow_rotation() {
    let image = image_centered(Pos2::new(100.0, 100.0), Vec2::new(200.0, 100.0), 90.0);
    let geometry = HandleGeometry::default();

    // After a quarter turn the local "n" edge faces world +x
    let n_world = image.center() + local_to_world(Handle::N.local_position(image.size), 90f32.to_radians());
    assert!((n_world - Pos2::new(150.0, 100.0)).length() < 1e-3);
    assert_eq!(hit_test_handle(n_world, &image, &geometry), Some(Handle::N));

    // Unrotated position of the n handle is no longer a handle
    assert_eq!(hit_test_handle(Pos2::new(100.0, 50.0), &image, &geometry), None);
}

#[test]
fn test_handle_tolerance() {
    let image = image_centered(Pos2::new(200.0, 200.0), Vec2::splat(200.0), 0.0);
    let geometry = HandleGeometry::default();

    // se corner at (300, 300); reach is 6 + 14 on each axis
    assert_eq!(hit_test_handle(Pos2::new(319.0, 319.0), &image, &geometry), Some(Handle::SE));
    assert_eq!(hit_test_handle(Pos2::new(321.0, 300.0), &image, &geometry), None);

    let tight = HandleGeometry { size: 12.0, tolerance: 0.0 };
    assert_eq!(hit_test_handle(Pos2::new(310.0, 300.0), &image, &tight), None);
}
