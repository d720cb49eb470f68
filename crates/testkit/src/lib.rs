#![warn(missing_docs)]
//! Shared fixtures for scene viewer tests: tiny scenes, cameras that face
//! them, and glTF files written to scratch directories.

mod gltf;

use anyhow::{Context, Result};
use glam::Vec3;
use sceneview_camera::Camera;
use sceneview_core::{Geometry, Material, Node, NodeId, Scene, Surface};
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub use gltf::{GltfFixture, PrimitiveSpec, MODE_LINES, MODE_TRIANGLES};

/// Viewport used by [`facing_camera`] fixtures.
pub const VIEWPORT: (u32, u32) = (400, 400);

/// Pixel at the center of [`VIEWPORT`].
pub const CENTER: (f32, f32) = (200.0, 200.0);

/// Pixel near the top-left corner of [`VIEWPORT`], well clear of the quad.
pub const CORNER: (f32, f32) = (4.0, 4.0);

/// Square in the XY plane facing +Z, `size` units across.
pub fn quad_geometry(size: f32) -> Arc<Geometry> {
    let h = size * 0.5;
    Arc::new(Geometry::new(
        vec![
            Vec3::new(-h, -h, 0.0),
            Vec3::new(h, -h, 0.0),
            Vec3::new(h, h, 0.0),
            Vec3::new(-h, h, 0.0),
        ],
        None,
        vec![0, 1, 2, 0, 2, 3],
    ))
}

/// Scene holding one 2x2 white quad at the origin.
pub fn single_quad_scene() -> (Scene, NodeId) {
    let mut scene = Scene::new();
    let root = scene.root();
    let quad = scene
        .add_child(
            root,
            Node::new("quad").with_surface(Surface::new(quad_geometry(2.0), Material::default())),
        )
        .unwrap_or(root);
    (scene, quad)
}

/// Camera five units down +Z looking at the origin, sized to [`VIEWPORT`].
pub fn facing_camera() -> Camera {
    let mut camera = Camera::looking_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
    camera.set_viewport(VIEWPORT.0, VIEWPORT.1);
    camera
}

/// Create an empty, uniquely named directory under the system temp dir.
pub fn scratch_dir(label: &str) -> Result<PathBuf> {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    let dir = std::env::temp_dir().join(format!(
        "sceneview-{label}-{}-{n}",
        std::process::id()
    ));
    if dir.exists() {
        fs::remove_dir_all(&dir)
            .with_context(|| format!("Failed to clear {}", dir.display()))?;
    }
    fs::create_dir_all(&dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_scene_has_one_surface() {
        let (scene, quad) = single_quad_scene();
        assert_eq!(scene.surface_ids(), vec![quad]);
        assert_eq!(scene.surface(quad).unwrap().geometry.triangle_count(), 2);
    }

    #[test]
    fn scratch_dirs_are_unique() {
        let a = scratch_dir("unique").unwrap();
        let b = scratch_dir("unique").unwrap();
        assert_ne!(a, b);
        assert!(a.is_dir() && b.is_dir());
    }
}
