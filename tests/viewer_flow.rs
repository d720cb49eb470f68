//! End-to-end flows across the viewer crates: a glTF file on disk is loaded
//! in the background, attached to a scene and then hovered and clicked.

use std::time::Duration;

use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use sceneview_assets::{AssetLoader, LoadEvent};
use sceneview_core::{color::MAX_HEX, Color, Scene};
use sceneview_picking::{PointerController, PointerOutcome};
use sceneview_testkit::{
    facing_camera, scratch_dir, single_quad_scene, GltfFixture, PrimitiveSpec, CENTER, CORNER,
    VIEWPORT,
};

#[test]
fn single_surface_hover_reset_and_click() {
    let (mut scene, quad) = single_quad_scene();
    let camera = facing_camera();
    let mut controller = PointerController::default();
    let mut rng = StdRng::seed_from_u64(2024);
    let baseline = Color::WHITE;

    controller.on_move(&mut scene, &camera, VIEWPORT, Vec2::from(CENTER), baseline);
    assert_eq!(scene.surface(quad).unwrap().material.color, Color::GREEN);

    controller.on_move(&mut scene, &camera, VIEWPORT, Vec2::from(CORNER), baseline);
    assert_eq!(scene.surface(quad).unwrap().material.color, baseline);

    let outcome = controller.on_click(&mut scene, &camera, VIEWPORT, Vec2::from(CENTER), &mut rng);
    let PointerOutcome::Painted { surface, color } = outcome else {
        panic!("expected a paint, got {outcome:?}");
    };
    assert_eq!(surface, quad);
    assert!(color.to_hex() <= MAX_HEX);
    assert_eq!(scene.surface(quad).unwrap().material.color, color);
}

#[test]
fn loaded_asset_is_pickable_after_attach() {
    let mut fixture = GltfFixture::new();
    let red = fixture.add_material([1.0, 0.0, 0.0, 1.0], false);
    let mesh = fixture.add_mesh(&[PrimitiveSpec::quad().with_material(red)]);
    let left = fixture.add_node("left", Some(mesh), [-2.0, 0.0, 0.0], &[]);
    let center = fixture.add_node("center", Some(mesh), [0.0, 0.0, 0.0], &[]);
    let dir = scratch_dir("viewer-flow").expect("scratch dir");
    let path = fixture
        .write_gltf(&dir, "scene", &[left, center])
        .expect("fixture written");

    let mut handle = AssetLoader::spawn(&path);
    let asset = loop {
        match handle.next_event(Duration::from_secs(10)) {
            Some(LoadEvent::Progress(_)) => continue,
            Some(LoadEvent::Loaded(asset)) => break asset,
            other => panic!("unexpected load result {other:?}"),
        }
    };
    assert_eq!(asset.surfaces, 2);

    let mut scene = Scene::new();
    let root = scene.root();
    let model = scene.attach(root, asset.scene).expect("fragment attached");
    assert_eq!(scene.surface_ids_under(model).len(), 2);
    for id in scene.surface_ids() {
        assert_eq!(scene.surface(id).unwrap().material.color, Color::rgb(255, 0, 0));
    }

    let camera = facing_camera();
    let mut controller = PointerController::default();
    let outcome = controller.on_move(
        &mut scene,
        &camera,
        VIEWPORT,
        Vec2::from(CENTER),
        Color::WHITE,
    );
    let PointerOutcome::Hovered { surface } = outcome else {
        panic!("expected a hover, got {outcome:?}");
    };
    assert_eq!(scene.node(surface).unwrap().name, "center");

    let highlighted: Vec<_> = scene
        .surface_ids()
        .into_iter()
        .filter(|id| scene.surface(*id).unwrap().material.color == Color::GREEN)
        .collect();
    assert_eq!(highlighted, vec![surface]);

    controller.on_move(&mut scene, &camera, VIEWPORT, Vec2::from(CORNER), Color::WHITE);
    for id in scene.surface_ids() {
        assert_eq!(scene.surface(id).unwrap().material.color, Color::WHITE);
    }
}
