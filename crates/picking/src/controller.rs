//! Hover highlight and click recolor driven by pointer events.

use glam::Vec2;
use rand::Rng;
use sceneview_camera::Camera;
use sceneview_core::{color::MAX_HEX, Color, NodeId, Scene};
use tracing::debug;

use crate::pointer::PointerSample;
use crate::raycast::intersect_scene;

/// Color written to a surface while the pointer is over it.
pub const DEFAULT_HOVER_COLOR: Color = Color::GREEN;

/// Which surface, if any, the pointer last landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HighlightState {
    /// Pointer over empty space.
    #[default]
    Idle,
    /// Pointer over the given surface.
    Hovering(NodeId),
}

/// What a pointer event did to the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerOutcome {
    /// A move landed on a surface, which now shows the hover color.
    Hovered {
        /// Surface under the pointer.
        surface: NodeId,
    },
    /// A move hit nothing; every surface was reset to the baseline.
    Reset {
        /// Number of surfaces rewritten.
        surfaces: usize,
    },
    /// A click landed on a surface and gave it a random color.
    Painted {
        /// Surface under the pointer.
        surface: NodeId,
        /// Color written.
        color: Color,
    },
    /// A click hit nothing.
    Missed,
    /// The viewport has no area, so the event was dropped.
    Ignored,
}

/// Turns pointer moves and clicks into surface color changes.
///
/// Color policy is memoryless: a hover overwrites whatever color the surface
/// had, and moving off every surface resets all of them to the baseline.
#[derive(Debug, Clone)]
pub struct PointerController {
    hover_color: Color,
    state: HighlightState,
}

impl Default for PointerController {
    fn default() -> Self {
        Self::new(DEFAULT_HOVER_COLOR)
    }
}

impl PointerController {
    /// Create a controller highlighting with `hover_color`.
    pub fn new(hover_color: Color) -> Self {
        Self {
            hover_color,
            state: HighlightState::Idle,
        }
    }

    /// Color used for hover highlights.
    pub fn hover_color(&self) -> Color {
        self.hover_color
    }

    /// Current highlight state.
    pub fn state(&self) -> HighlightState {
        self.state
    }

    /// Surface currently under the pointer.
    pub fn hovered(&self) -> Option<NodeId> {
        match self.state {
            HighlightState::Hovering(id) => Some(id),
            HighlightState::Idle => None,
        }
    }

    /// Handle a pointer move.
    ///
    /// `baseline` is the color every surface returns to when the pointer is
    /// over empty space; callers pass the live settings value.
    pub fn on_move(
        &mut self,
        scene: &mut Scene,
        camera: &Camera,
        viewport: (u32, u32),
        screen_pos: Vec2,
        baseline: Color,
    ) -> PointerOutcome {
        let Some(sample) = PointerSample::from_screen(screen_pos, viewport) else {
            return PointerOutcome::Ignored;
        };
        let ray = camera.ray_through(sample.ndc);

        match intersect_scene(scene, &ray).first() {
            Some(hit) => {
                scene.set_surface_color(hit.surface, self.hover_color);
                self.transition(HighlightState::Hovering(hit.surface));
                PointerOutcome::Hovered {
                    surface: hit.surface,
                }
            }
            None => {
                let surfaces = scene.surface_ids();
                for id in &surfaces {
                    scene.set_surface_color(*id, baseline);
                }
                self.transition(HighlightState::Idle);
                PointerOutcome::Reset {
                    surfaces: surfaces.len(),
                }
            }
        }
    }

    /// Handle a pointer click. The hit surface gets a uniformly random
    /// 24-bit color; a miss changes nothing.
    pub fn on_click<R: Rng + ?Sized>(
        &mut self,
        scene: &mut Scene,
        camera: &Camera,
        viewport: (u32, u32),
        screen_pos: Vec2,
        rng: &mut R,
    ) -> PointerOutcome {
        let Some(sample) = PointerSample::from_screen(screen_pos, viewport) else {
            return PointerOutcome::Ignored;
        };
        let ray = camera.ray_through(sample.ndc);

        match intersect_scene(scene, &ray).first() {
            Some(hit) => {
                let color = Color::from_hex(rng.gen_range(0..=MAX_HEX));
                scene.set_surface_color(hit.surface, color);
                debug!(surface = hit.surface.index(), %color, "Surface painted");
                PointerOutcome::Painted {
                    surface: hit.surface,
                    color,
                }
            }
            None => PointerOutcome::Missed,
        }
    }

    fn transition(&mut self, next: HighlightState) {
        if self.state == next {
            return;
        }
        match next {
            HighlightState::Hovering(id) => debug!(surface = id.index(), "Hover entered"),
            HighlightState::Idle => debug!("Hover cleared"),
        }
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use sceneview_core::{Geometry, Material, Node, Surface, Transform};
    use std::sync::Arc;

    const VIEWPORT: (u32, u32) = (200, 200);
    const CENTER: Vec2 = Vec2::new(100.0, 100.0);
    const CORNER: Vec2 = Vec2::new(2.0, 2.0);

    fn setup() -> (Scene, NodeId, NodeId, Camera) {
        let geometry = Arc::new(Geometry::new(
            vec![
                Vec3::new(-0.5, -0.5, 0.0),
                Vec3::new(0.5, -0.5, 0.0),
                Vec3::new(0.5, 0.5, 0.0),
                Vec3::new(-0.5, 0.5, 0.0),
            ],
            None,
            vec![0, 1, 2, 0, 2, 3],
        ));
        let mut scene = Scene::new();
        let front = scene
            .add_child(
                scene.root(),
                Node::new("front")
                    .with_surface(Surface::new(geometry.clone(), Material::default())),
            )
            .unwrap();
        // Off to the side so the center ray never reaches it.
        let side = scene
            .add_child(
                scene.root(),
                Node::new("side")
                    .with_transform(Transform::from_translation(Vec3::new(30.0, 0.0, 0.0)))
                    .with_surface(Surface::new(geometry, Material::default())),
            )
            .unwrap();
        let mut camera = Camera::looking_at(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO);
        camera.set_viewport(VIEWPORT.0, VIEWPORT.1);
        (scene, front, side, camera)
    }

    fn color_of(scene: &Scene, id: NodeId) -> Color {
        scene.surface(id).unwrap().material.color
    }

    #[test]
    fn hover_sets_highlight_and_state() {
        let (mut scene, front, side, camera) = setup();
        let mut controller = PointerController::default();

        let outcome = controller.on_move(&mut scene, &camera, VIEWPORT, CENTER, Color::WHITE);
        assert_eq!(outcome, PointerOutcome::Hovered { surface: front });
        assert_eq!(color_of(&scene, front), Color::GREEN);
        assert_eq!(color_of(&scene, side), Color::WHITE);
        assert_eq!(controller.hovered(), Some(front));
    }

    #[test]
    fn miss_resets_every_surface_to_baseline() {
        let (mut scene, front, side, camera) = setup();
        let mut controller = PointerController::default();
        let baseline = Color::from_hex(0x336699);

        controller.on_move(&mut scene, &camera, VIEWPORT, CENTER, Color::WHITE);
        let outcome = controller.on_move(&mut scene, &camera, VIEWPORT, CORNER, baseline);

        assert_eq!(outcome, PointerOutcome::Reset { surfaces: 2 });
        assert_eq!(color_of(&scene, front), baseline);
        assert_eq!(color_of(&scene, side), baseline);
        assert_eq!(controller.state(), HighlightState::Idle);
    }

    #[test]
    fn click_paints_without_touching_hover_state() {
        let (mut scene, front, _, camera) = setup();
        let mut controller = PointerController::default();
        let mut rng = StdRng::seed_from_u64(7);

        let outcome = controller.on_click(&mut scene, &camera, VIEWPORT, CENTER, &mut rng);
        let PointerOutcome::Painted { surface, color } = outcome else {
            panic!("expected a paint, got {outcome:?}");
        };
        assert_eq!(surface, front);
        assert_eq!(color_of(&scene, front), color);
        assert!(color.to_hex() <= MAX_HEX);
        assert_eq!(controller.state(), HighlightState::Idle);
    }

    #[test]
    fn click_miss_changes_nothing() {
        let (mut scene, front, side, camera) = setup();
        scene.set_surface_color(front, Color::from_hex(0x123456));
        let mut controller = PointerController::default();
        let mut rng = StdRng::seed_from_u64(7);

        let outcome = controller.on_click(&mut scene, &camera, VIEWPORT, CORNER, &mut rng);
        assert_eq!(outcome, PointerOutcome::Missed);
        assert_eq!(color_of(&scene, front), Color::from_hex(0x123456));
        assert_eq!(color_of(&scene, side), Color::WHITE);
    }

    #[test]
    fn zero_viewport_is_ignored() {
        let (mut scene, front, _, camera) = setup();
        let mut controller = PointerController::default();
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(
            controller.on_move(&mut scene, &camera, (0, 0), CENTER, Color::BLACK),
            PointerOutcome::Ignored
        );
        assert_eq!(
            controller.on_click(&mut scene, &camera, (640, 0), CENTER, &mut rng),
            PointerOutcome::Ignored
        );
        assert_eq!(color_of(&scene, front), Color::WHITE);
    }

    #[test]
    fn custom_hover_color() {
        let (mut scene, front, _, camera) = setup();
        let amber = Color::from_hex(0xffbf00);
        let mut controller = PointerController::new(amber);
        controller.on_move(&mut scene, &camera, VIEWPORT, CENTER, Color::WHITE);
        assert_eq!(color_of(&scene, front), amber);
    }

    #[test]
    fn empty_scene_resets_nothing_and_misses_clicks() {
        let (_, _, _, camera) = setup();
        let mut scene = Scene::new();
        let mut controller = PointerController::default();
        let mut rng = StdRng::seed_from_u64(3);

        assert_eq!(
            controller.on_move(&mut scene, &camera, VIEWPORT, CENTER, Color::WHITE),
            PointerOutcome::Reset { surfaces: 0 }
        );
        assert_eq!(
            controller.on_click(&mut scene, &camera, VIEWPORT, CENTER, &mut rng),
            PointerOutcome::Missed
        );
        assert_eq!(controller.state(), HighlightState::Idle);
    }

    #[test]
    fn mirrored_surface_is_hovered_from_its_front() {
        let (mut scene, front, _, camera) = setup();
        if let Some(node) = scene.node_mut(front) {
            node.transform = Transform {
                scale: Vec3::new(-1.0, 1.0, 1.0),
                ..Transform::IDENTITY
            };
        }
        let mut controller = PointerController::default();

        let outcome = controller.on_move(&mut scene, &camera, VIEWPORT, CENTER, Color::WHITE);
        assert_eq!(outcome, PointerOutcome::Hovered { surface: front });
    }
}
