//! Property-based tests for the hover/click color policy.
//!
//! Validates:
//! - A hovering move always leaves the hit surface at the hover color
//! - A missing move always leaves every surface at the live baseline
//! - Click colors stay inside the 24-bit range
//! - A missing click never changes any color
//! - Repeating the same move is idempotent

use glam::Vec2;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use sceneview_core::{color::MAX_HEX, Color};
use sceneview_picking::{PointerController, PointerOutcome};
use sceneview_testkit::{facing_camera, single_quad_scene, CENTER, CORNER, VIEWPORT};

fn center() -> Vec2 {
    Vec2::new(CENTER.0, CENTER.1)
}

fn corner() -> Vec2 {
    Vec2::new(CORNER.0, CORNER.1)
}

proptest! {
    /// Property: hover color wins over any prior color.
    #[test]
    fn hover_overwrites_prior_color(prior in 0u32..=MAX_HEX) {
        let (mut scene, quad) = single_quad_scene();
        let camera = facing_camera();
        scene.set_surface_color(quad, Color::from_hex(prior));

        let mut controller = PointerController::default();
        let outcome = controller.on_move(&mut scene, &camera, VIEWPORT, center(), Color::WHITE);

        prop_assert_eq!(outcome, PointerOutcome::Hovered { surface: quad });
        prop_assert_eq!(scene.surface(quad).unwrap().material.color, Color::GREEN);
    }

    /// Property: a miss resets to whatever baseline is passed, even after a click.
    #[test]
    fn miss_resets_to_live_baseline(baseline in 0u32..=MAX_HEX, seed in any::<u64>()) {
        let (mut scene, quad) = single_quad_scene();
        let camera = facing_camera();
        let mut controller = PointerController::default();
        let mut rng = StdRng::seed_from_u64(seed);

        controller.on_click(&mut scene, &camera, VIEWPORT, center(), &mut rng);
        controller.on_move(&mut scene, &camera, VIEWPORT, corner(), Color::from_hex(baseline));

        prop_assert_eq!(scene.surface(quad).unwrap().material.color, Color::from_hex(baseline));
    }

    /// Property: click colors are valid 24-bit values and land on the hit surface.
    #[test]
    fn click_paints_in_range(seed in any::<u64>()) {
        let (mut scene, quad) = single_quad_scene();
        let camera = facing_camera();
        let mut controller = PointerController::default();
        let mut rng = StdRng::seed_from_u64(seed);

        let outcome = controller.on_click(&mut scene, &camera, VIEWPORT, center(), &mut rng);
        match outcome {
            PointerOutcome::Painted { surface, color } => {
                prop_assert_eq!(surface, quad);
                prop_assert!(color.to_hex() <= MAX_HEX);
                prop_assert_eq!(scene.surface(quad).unwrap().material.color, color);
            }
            other => prop_assert!(false, "expected a paint, got {:?}", other),
        }
    }

    /// Property: a click on empty space is a no-op.
    #[test]
    fn click_miss_is_noop(prior in 0u32..=MAX_HEX, seed in any::<u64>()) {
        let (mut scene, quad) = single_quad_scene();
        let camera = facing_camera();
        scene.set_surface_color(quad, Color::from_hex(prior));
        let mut controller = PointerController::default();
        let mut rng = StdRng::seed_from_u64(seed);

        let outcome = controller.on_click(&mut scene, &camera, VIEWPORT, corner(), &mut rng);
        prop_assert_eq!(outcome, PointerOutcome::Missed);
        prop_assert_eq!(scene.surface(quad).unwrap().material.color, Color::from_hex(prior));
    }

    /// Property: the same move twice leaves the same colors as once.
    #[test]
    fn repeated_moves_are_idempotent(
        x in 0.0f32..400.0,
        y in 0.0f32..400.0,
        baseline in 0u32..=MAX_HEX,
    ) {
        let (mut scene, quad) = single_quad_scene();
        let camera = facing_camera();
        let mut controller = PointerController::default();
        let pos = Vec2::new(x, y);
        let baseline = Color::from_hex(baseline);

        let first = controller.on_move(&mut scene, &camera, VIEWPORT, pos, baseline);
        let after_first = scene.surface(quad).unwrap().material.color;
        let second = controller.on_move(&mut scene, &camera, VIEWPORT, pos, baseline);

        prop_assert_eq!(first, second);
        prop_assert_eq!(scene.surface(quad).unwrap().material.color, after_first);
    }
}

#[test]
fn hover_then_leave_then_click_scenario() {
    let (mut scene, quad) = single_quad_scene();
    let camera = facing_camera();
    let mut controller = PointerController::default();
    let mut rng = StdRng::seed_from_u64(42);
    let baseline = Color::WHITE;

    controller.on_move(&mut scene, &camera, VIEWPORT, center(), baseline);
    assert_eq!(scene.surface(quad).unwrap().material.color, Color::GREEN);

    controller.on_move(&mut scene, &camera, VIEWPORT, corner(), baseline);
    assert_eq!(scene.surface(quad).unwrap().material.color, baseline);

    let outcome = controller.on_click(&mut scene, &camera, VIEWPORT, center(), &mut rng);
    let color = scene.surface(quad).unwrap().material.color;
    assert_eq!(outcome, PointerOutcome::Painted { surface: quad, color });
    assert!(color.to_hex() <= MAX_HEX);
}
