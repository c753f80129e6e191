use collage_canvas::{
    CanvasConfig, CanvasResolution, CollageCanvas, DrawingTools, ImageSource, ImageUpdate, PlacedImage, Scene, ToolMode,
};
use egui::{Pos2, Vec2};

fn source(n: usize) -> ImageSource {
    ImageSource::path(format!("photo_{n}.png"))
}

#[test]
fn test_added_images_cascade() {
    let mut scene = Scene::new(CanvasResolution::new(1024, 1024));
    let ids: Vec<_> = (0..12).map(|n| scene.add_image(&format!("photo {n}"), source(n))).collect();

    let position = |index: usize| scene.image(ids[index]).unwrap().position;
    assert_eq!(position(0), Pos2::ZERO);
    assert_eq!(position(1), Pos2::ZERO);
    assert_eq!(position(2), Pos2::new(20.0, 20.0));
    assert_eq!(position(10), Pos2::new(180.0, 180.0));
    // Wraps back after ten cascade slots
    assert_eq!(position(11), Pos2::ZERO);
    assert_eq!(scene.image(ids[11]).unwrap().size, Vec2::splat(150.0));
}

#[test]
fn test_grid_arrangement() {
    let mut scene = Scene::new(CanvasResolution::new(1024, 1024));
    let ids: Vec<_> = (0..5).map(|n| scene.add_image("photo", source(n))).collect();
    scene.update_image(ids[1], ImageUpdate::rotation(30.0));
    scene.select(Some(ids[0]));

    scene.arrange_as_grid(2, 2);

    assert_eq!(scene.images().len(), 4);
    assert!(!scene.contains(ids[4]));
    assert!(scene.selected().is_none());

    let cell = Vec2::splat((1024.0 - 60.0) / 2.0);
    let expected = [
        Pos2::new(20.0, 20.0),
        Pos2::new(40.0 + cell.x, 20.0),
        Pos2::new(20.0, 40.0 + cell.y),
        Pos2::new(40.0 + cell.x, 40.0 + cell.y),
    ];
    for (image, position) in scene.images().iter().zip(expected) {
        assert_eq!(image.position, position);
        assert_eq!(image.size, cell);
        assert_eq!(image.rotation, 0.0);
    }
}

#[test]
fn test_grid_arrangement_ignores_bad_input() {
    let mut scene = Scene::default();
    scene.arrange_as_grid(2, 2);
    assert!(scene.images().is_empty());

    scene.insert(PlacedImage::new("a", Pos2::new(5.0, 5.0), Vec2::splat(10.0)));
    let version = scene.version();
    scene.arrange_as_grid(0, 3);
    assert_eq!(scene.version(), version);
    assert_eq!(scene.images()[0].position, Pos2::new(5.0, 5.0));
}

#[test]
fn test_grid_arrangement_with_huge_dimensions() {
    let mut scene = Scene::new(CanvasResolution::new(1024, 1024));
    let id = scene.add_image("photo", source(0));

    scene.arrange_as_grid(70_000, 70_000);
    assert!(scene.contains(id));
    assert_eq!(scene.images()[0].position, Pos2::new(20.0, 20.0));
    assert_eq!(scene.images()[0].size, Vec2::splat(20.0));

    scene.arrange_as_grid(1, u32::MAX);
    scene.arrange_as_grid(u32::MAX, u32::MAX);
    assert_eq!(scene.images().len(), 1);
    assert_eq!(scene.images()[0].size, Vec2::splat(20.0));
}

#[test]
fn test_batch_add_cascades() {
    let mut scene = Scene::new(CanvasResolution::new(1024, 1024));
    let ids = scene.add_images((0..4).map(|n| ("photo", source(n))));

    assert_eq!(ids.len(), 4);
    assert_eq!(scene.images().len(), 4);
    let positions: Vec<_> = ids.iter().map(|id| scene.image(*id).unwrap().position).collect();
    assert_eq!(
        positions,
        vec![Pos2::ZERO, Pos2::ZERO, Pos2::new(20.0, 20.0), Pos2::new(40.0, 40.0)]
    );
    assert_eq!(scene.image(ids[0]).unwrap().size, Vec2::splat(1024.0));
    assert!(ids[1..].iter().all(|id| scene.image(*id).unwrap().size == Vec2::splat(150.0)));
}

#[test]
fn test_grid_cells_respect_minimum_size() {
    let mut scene = Scene::new(CanvasResolution::new(100, 100));
    for n in 0..9 {
        scene.add_image("photo", source(n));
    }
    scene.arrange_as_grid(3, 3);
    assert!(scene.images().iter().all(|image| image.size == Vec2::splat(20.0)));
}

#[test]
fn test_presets_are_distinct() {
    let presets = CanvasResolution::PRESETS;
    assert_eq!(presets[0].resolution, CanvasConfig::default().default_resolution);
    for (i, a) in presets.iter().enumerate() {
        for b in &presets[i + 1..] {
            assert_ne!(a.resolution, b.resolution);
        }
    }
}

#[test]
fn test_canvas_reset_clears_drawing_undoably() {
    let mut canvas = CollageCanvas::default();
    let mut scene = Scene::new(CanvasResolution::new(32, 32));
    scene.insert(PlacedImage::new("a", Pos2::ZERO, Vec2::splat(10.0)));
    canvas.render(&scene);
    let brush = DrawingTools::default().with_mode(ToolMode::Brush);
    canvas.pointer_down(Pos2::new(16.0, 16.0), &mut scene, &brush);
    canvas.pointer_up();
    let drawn = canvas.overlay().image().clone();

    canvas.reset(&mut scene);
    assert!(scene.images().is_empty());
    assert!(canvas.overlay().image().pixels().all(|p| p[3] == 0));
    assert_eq!(scene.resolution(), CanvasResolution::new(32, 32));

    assert!(canvas.can_undo());
    canvas.undo();
    assert_eq!(canvas.overlay().image(), &drawn);
}
