use egui::{Pos2, Rect, Vec2};

/// Rotate a vector by `radians` (positive is clockwise on screen, y points down)
pub fn rotate(v: Vec2, radians: f32) -> Vec2 {
    let (sin, cos) = radians.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Express a world point relative to `center`, undoing a rotation of
/// `rotation` radians about that center.
pub fn world_to_local(point: Pos2, center: Pos2, rotation: f32) -> Vec2 {
    rotate(point - center, -rotation)
}

/// Rotate a local offset into a world-space offset. Add the center to get a
/// world point.
pub fn local_to_world(local: Vec2, rotation: f32) -> Vec2 {
    rotate(local, rotation)
}

/// Axis-aligned bounds of a `size` rectangle centered on `center` and rotated
/// by `rotation` radians.
pub fn rotated_bounds(center: Pos2, size: Vec2, rotation: f32) -> Rect {
    let half = size / 2.0;
    let corners = [
        Vec2::new(-half.x, -half.y),
        Vec2::new(half.x, -half.y),
        Vec2::new(-half.x, half.y),
        Vec2::new(half.x, half.y),
    ];

    let mut bounds = Rect::NOTHING;
    for corner in corners {
        bounds.extend_with(center + local_to_world(corner, rotation));
    }
    bounds
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn test_quarter_turn() {
        let v = rotate(Vec2::new(1.0, 0.0), FRAC_PI_2);
        assert!(approx(v, Vec2::new(0.0, 1.0)));
    }

    #[test]
    fn test_world_local_inverse() {
        let center = Pos2::new(40.0, -12.0);
        let rotation = 0.7;
        let point = Pos2::new(91.0, 33.5);

        let local = world_to_local(point, center, rotation);
        let back = center + local_to_world(local, rotation);
        assert!(approx(back.to_vec2(), point.to_vec2()));
    }

    #[test]
    fn test_rotated_bounds_grow_under_rotation() {
        let bounds = rotated_bounds(Pos2::ZERO, Vec2::splat(100.0), std::f32::consts::FRAC_PI_4);
        let half_diagonal = 50.0 * std::f32::consts::SQRT_2;
        assert!((bounds.max.x - half_diagonal).abs() < 1e-3);
        assert!((bounds.min.y + half_diagonal).abs() < 1e-3);
    }
}
