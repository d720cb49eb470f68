//! Recursive ray-cast against every surface in a scene.

use glam::{Vec2, Vec3};
use sceneview_camera::Camera;
use sceneview_core::{NodeId, Ray, Scene};

use crate::pointer::PointerSample;

/// A ray hit on a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Node carrying the surface that was hit.
    pub surface: NodeId,
    /// World-space distance from the ray origin.
    pub distance: f32,
    /// World-space hit point.
    pub point: Vec3,
}

/// Intersect `ray` with every surface in the scene, nearest first.
///
/// Each mesh is tested in its own local space: first against its bounds,
/// then triangle by triangle. Back faces are skipped unless the material is
/// double-sided. Nodes whose world matrix cannot be inverted are skipped.
pub fn intersect_scene(scene: &Scene, ray: &Ray) -> Vec<Hit> {
    let mut hits = Vec::new();

    for id in scene.descendants(scene.root()) {
        let Some(surface) = scene.surface(id) else {
            continue;
        };
        let world = scene.world_matrix(id);
        let det = world.determinant();
        if det == 0.0 || !det.is_finite() {
            continue;
        }
        let local_ray = ray.transformed(&world.inverse());

        if surface.geometry.bounds().ray_intersection(&local_ray).is_none() {
            continue;
        }

        let cull = !surface.material.double_sided;
        let nearest = surface
            .geometry
            .triangles()
            .filter_map(|[a, b, c]| local_ray.intersect_triangle(a, b, c, cull))
            .map(|tri| tri.t)
            .min_by(f32::total_cmp);

        if let Some(t) = nearest {
            let point = world.transform_point3(local_ray.at(t));
            hits.push(Hit {
                surface: id,
                distance: ray.origin.distance(point),
                point,
            });
        }
    }

    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    hits
}

/// Nearest surface under a screen position, if any.
pub fn pick(scene: &Scene, camera: &Camera, viewport: (u32, u32), screen_pos: Vec2) -> Option<Hit> {
    let sample = PointerSample::from_screen(screen_pos, viewport)?;
    let ray = camera.ray_through(sample.ndc);
    intersect_scene(scene, &ray).into_iter().next()
}
